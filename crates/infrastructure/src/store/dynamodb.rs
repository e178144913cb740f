//! DynamoDB-backed document store.
//!
//! One table per document type (`{prefix}{TABLE}`) with the string hash key
//! `Id`. Secondary index lookups use global secondary indexes named after
//! [`SecondaryIndex::name`]. The version protocol is enforced with
//! conditional writes, so concurrent writers cannot overwrite each other.
//! Keys a batch read leaves unprocessed are resent with exponential backoff,
//! up to the configured number of retries.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::{
    config::{Builder, Credentials, Region},
    error::{DisplayErrorContext, SdkError},
    operation::put_item::PutItemError,
    types::{AttributeValue, KeysAndAttributes},
    Client,
};
use gala_common::{ExponentialBackoff, RetryConfig, StoreConfig};
use serde_json::{Map, Number, Value};
use std::collections::HashMap;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{
    check_version, ensure_indexed, unique_keys, Document, DocumentStore, IndexKey,
    KEY_ATTRIBUTE, VERSION_ATTRIBUTE,
};
use crate::{Error, Result};

/// Maximum keys per `BatchGetItem` request
const BATCH_GET_LIMIT: usize = 100;

type Item = HashMap<String, AttributeValue>;

/// DynamoDB [`DocumentStore`].
pub struct DynamoDbDocumentStore {
    client: Client,
    table_prefix: String,
    retry: RetryConfig,
}

impl DynamoDbDocumentStore {
    /// Create a store from configuration.
    ///
    /// In local mode the client talks to `local_service_url` with static
    /// placeholder credentials, as DynamoDB Local expects.
    #[instrument(skip(config))]
    pub async fn new(config: &StoreConfig) -> Result<Self> {
        info!(region = %config.region, local = config.local_mode, "Initializing DynamoDB store");

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        let mut builder = Builder::from(&sdk_config);
        if config.local_mode {
            builder = builder
                .endpoint_url(&config.local_service_url)
                .credentials_provider(Credentials::new("local", "local", None, None, "local"));
        }

        Ok(Self::from_client(
            Client::from_conf(builder.build()),
            config.table_prefix.clone(),
        )
        .with_retry(config.retry_config()))
    }

    /// Wrap an existing client.
    pub fn from_client(client: Client, table_prefix: impl Into<String>) -> Self {
        Self {
            client,
            table_prefix: table_prefix.into(),
            retry: RetryConfig::default(),
        }
    }

    /// Set the backoff used when resending unprocessed keys.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Physical table name for `D`.
    fn table<D: Document>(&self) -> String {
        format!("{}{}", self.table_prefix, D::TABLE)
    }

    async fn stored_version<D: Document>(&self, key: Uuid) -> Result<Option<i64>> {
        let output = self
            .client
            .get_item()
            .table_name(self.table::<D>())
            .key(KEY_ATTRIBUTE, AttributeValue::S(key.to_string()))
            .projection_expression("#ver")
            .expression_attribute_names("#ver", VERSION_ATTRIBUTE)
            .consistent_read(true)
            .send()
            .await
            .map_err(storage_error)?;

        Ok(output
            .item()
            .and_then(|item| item.get(VERSION_ATTRIBUTE))
            .and_then(|value| value.as_n().ok())
            .and_then(|n| n.parse().ok()))
    }
}

impl std::fmt::Debug for DynamoDbDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamoDbDocumentStore")
            .field("table_prefix", &self.table_prefix)
            .field("retry", &self.retry)
            .finish()
    }
}

#[async_trait]
impl DocumentStore for DynamoDbDocumentStore {
    #[instrument(skip(self), fields(table = D::TABLE))]
    async fn load<D: Document>(&self, key: D::Id) -> Result<Option<D>> {
        let key: Uuid = key.into();
        let output = self
            .client
            .get_item()
            .table_name(self.table::<D>())
            .key(KEY_ATTRIBUTE, AttributeValue::S(key.to_string()))
            .consistent_read(true)
            .send()
            .await
            .map_err(storage_error)?;

        output.item().map(from_item).transpose()
    }

    #[instrument(skip(self, document), fields(table = D::TABLE, key = %document.id()))]
    async fn save<D: Document>(&self, document: D) -> Result<D> {
        let key: Uuid = document.id().into();
        let expected = document.metadata().version_number;

        let mut value = serde_json::to_value(&document)?;
        let next = expected.map_or(0, |version| version + 1);
        if let Some(object) = value.as_object_mut() {
            object.insert(VERSION_ATTRIBUTE.to_string(), Value::from(next));
        }
        let item = to_item(&value)?;

        let request = self
            .client
            .put_item()
            .table_name(self.table::<D>())
            .set_item(Some(item));
        let request = match expected {
            None => request
                .condition_expression("attribute_not_exists(#id)")
                .expression_attribute_names("#id", KEY_ATTRIBUTE),
            Some(version) => request
                .condition_expression("#ver = :expected")
                .expression_attribute_names("#ver", VERSION_ATTRIBUTE)
                .expression_attribute_values(":expected", AttributeValue::N(version.to_string())),
        };

        match request.send().await {
            Ok(_) => {
                debug!(version = next, "Document saved");
                Ok(serde_json::from_value(value)?)
            }
            Err(e) if is_conditional_check_failure(&e) => {
                let stored = self.stored_version::<D>(key).await?;
                check_version(&document, stored)?;
                // The record changed between the failed write and the re-read.
                Err(Error::VersionConflict {
                    kind: D::KIND,
                    key: key.to_string(),
                    expected,
                    actual: stored,
                })
            }
            Err(e) => Err(storage_error(e)),
        }
    }

    #[instrument(skip(self), fields(table = D::TABLE))]
    async fn delete<D: Document>(&self, key: D::Id) -> Result<()> {
        let key: Uuid = key.into();
        self.client
            .delete_item()
            .table_name(self.table::<D>())
            .key(KEY_ATTRIBUTE, AttributeValue::S(key.to_string()))
            .send()
            .await
            .map_err(storage_error)?;

        debug!("Document deleted");
        Ok(())
    }

    #[instrument(skip(self, keys), fields(table = D::TABLE, count = keys.len()))]
    async fn batch_get<D: Document>(&self, keys: &[D::Id]) -> Result<Vec<D>> {
        let table = self.table::<D>();
        let keys: Vec<Uuid> = unique_keys(keys).into_iter().map(Into::into).collect();
        let mut found: HashMap<Uuid, D> = HashMap::with_capacity(keys.len());

        for chunk in keys.chunks(BATCH_GET_LIMIT) {
            let request_keys = chunk
                .iter()
                .map(|key| {
                    HashMap::from([(
                        KEY_ATTRIBUTE.to_string(),
                        AttributeValue::S(key.to_string()),
                    )])
                })
                .collect();
            let keys_and_attributes = KeysAndAttributes::builder()
                .set_keys(Some(request_keys))
                .consistent_read(true)
                .build()
                .map_err(|e| Error::Storage(e.to_string()))?;

            let mut backoff = ExponentialBackoff::new(self.retry.clone());
            let mut pending = Some(HashMap::from([(table.clone(), keys_and_attributes)]));
            while let Some(request_items) = pending.take() {
                let output = self
                    .client
                    .batch_get_item()
                    .set_request_items(Some(request_items))
                    .send()
                    .await
                    .map_err(storage_error)?;

                if let Some(items) = output.responses().and_then(|r| r.get(&table)) {
                    for item in items {
                        let document: D = from_item(item)?;
                        found.insert(document.id().into(), document);
                    }
                }

                pending = output
                    .unprocessed_keys()
                    .filter(|unprocessed| !unprocessed.is_empty())
                    .cloned();
                if pending.is_none() {
                    continue;
                }

                let Some(delay) = backoff.next_delay() else {
                    warn!(retries = backoff.attempts(), "Unprocessed keys remain");
                    return Err(Error::Storage(format!(
                        "{table}: keys still unprocessed after {} retries",
                        backoff.attempts()
                    )));
                };
                debug!(
                    attempt = backoff.attempts(),
                    delay_ms = delay.as_millis() as u64,
                    "Retrying unprocessed keys"
                );
                sleep(delay).await;
            }
        }

        // Requested order, not the order DynamoDB answered in
        Ok(keys.iter().filter_map(|key| found.remove(key)).collect())
    }

    #[instrument(skip(self), fields(table = D::TABLE, index = key.index.name))]
    async fn query<D: Document>(&self, key: &IndexKey) -> Result<Vec<D>> {
        ensure_indexed::<D>(key)?;
        let value = to_attribute(&key.value.to_json())?;
        let mut documents = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let output = self
                .client
                .query()
                .table_name(self.table::<D>())
                .index_name(key.index.name)
                .key_condition_expression("#attr = :value")
                .expression_attribute_names("#attr", key.index.attribute)
                .expression_attribute_values(":value", value.clone())
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(storage_error)?;

            for item in output.items() {
                documents.push(from_item(item)?);
            }

            match output.last_evaluated_key() {
                Some(last) if !last.is_empty() => start_key = Some(last.clone()),
                _ => break,
            }
        }

        debug!(found = documents.len(), "Index query complete");
        Ok(documents)
    }
}

fn storage_error<E, R>(err: SdkError<E, R>) -> Error
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    Error::Storage(DisplayErrorContext(&err).to_string())
}

fn is_conditional_check_failure<R>(err: &SdkError<PutItemError, R>) -> bool {
    err.as_service_error()
        .is_some_and(PutItemError::is_conditional_check_failed_exception)
}

fn to_item(value: &Value) -> Result<Item> {
    match to_attribute(value)? {
        AttributeValue::M(item) => Ok(item),
        _ => Err(Error::Storage("document must serialize to an object".to_string())),
    }
}

fn from_item<D: Document>(item: &Item) -> Result<D> {
    let object = item
        .iter()
        .map(|(name, value)| Ok((name.clone(), from_attribute(value)?)))
        .collect::<Result<Map<String, Value>>>()?;
    Ok(serde_json::from_value(Value::Object(object))?)
}

fn to_attribute(value: &Value) -> Result<AttributeValue> {
    Ok(match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(items) => {
            AttributeValue::L(items.iter().map(to_attribute).collect::<Result<_>>()?)
        }
        Value::Object(fields) => AttributeValue::M(
            fields
                .iter()
                .map(|(name, value)| Ok((name.clone(), to_attribute(value)?)))
                .collect::<Result<_>>()?,
        ),
    })
}

fn from_attribute(value: &AttributeValue) -> Result<Value> {
    Ok(match value {
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::N(n) => Value::Number(parse_number(n)?),
        AttributeValue::L(items) => {
            Value::Array(items.iter().map(from_attribute).collect::<Result<_>>()?)
        }
        AttributeValue::M(fields) => Value::Object(
            fields
                .iter()
                .map(|(name, value)| Ok((name.clone(), from_attribute(value)?)))
                .collect::<Result<_>>()?,
        ),
        AttributeValue::Ss(items) => {
            Value::Array(items.iter().cloned().map(Value::String).collect())
        }
        AttributeValue::Ns(items) => Value::Array(
            items
                .iter()
                .map(|n| parse_number(n).map(Value::Number))
                .collect::<Result<_>>()?,
        ),
        other => {
            return Err(Error::Storage(format!(
                "unsupported attribute value: {other:?}"
            )))
        }
    })
}

fn parse_number(n: &str) -> Result<Number> {
    if let Ok(i) = n.parse::<i64>() {
        return Ok(Number::from(i));
    }
    if let Ok(u) = n.parse::<u64>() {
        return Ok(Number::from(u));
    }
    n.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| Error::Storage(format!("invalid number attribute: {n}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attribute_conversion_preserves_document() {
        let document = json!({
            "Id": "6f1c2a4e-2f43-4b52-9a53-0b0d6c1f3e11",
            "Name": "Spring Gala",
            "Year": 2020,
            "ProgramIds": ["a", "b"],
            "IsDeleted": false,
            "VersionNumber": 3,
            "Extra": null
        });

        let item = to_item(&document).unwrap();
        assert_eq!(item.get("Year"), Some(&AttributeValue::N("2020".to_string())));

        let object = item
            .iter()
            .map(|(k, v)| (k.clone(), from_attribute(v).unwrap()))
            .collect::<Map<_, _>>();
        assert_eq!(Value::Object(object), document);
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(to_item(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("42").unwrap(), Number::from(42));
        assert_eq!(parse_number("-1").unwrap(), Number::from(-1));
        assert!(parse_number("1.5").unwrap().is_f64());
        assert!(parse_number("abc").is_err());
    }
}
