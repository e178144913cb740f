//! Extractors for list-valued query parameters.
//!
//! Lists may be given as repeated parameters (`?years=2020&years=2019`), as a
//! comma separated value (`?years=2020,2019`), or a mix of both.

use crate::error::ApiError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use gala_domain::{ChineseZodiac, PerformerId, ProgramId};
use std::convert::Infallible;
use std::str::FromStr;

/// Every comma separated item given for `key`, trimmed, empties dropped.
fn query_items<'a>(query: &'a str, key: &'a str) -> impl Iterator<Item = String> + 'a {
    url::form_urlencoded::parse(query.as_bytes())
        .filter(move |(name, _)| name == key)
        .flat_map(|(_, value)| {
            value
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
}

/// Identifier types that can be listed in a query string.
pub trait ListKey: FromStr + Send {
    /// Query parameter holding the list
    const KEY: &'static str;
}

impl ListKey for ProgramId {
    const KEY: &'static str = "programIds";
}

impl ListKey for PerformerId {
    const KEY: &'static str = "performerIds";
}

/// A required, non-empty list of identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdList<T>(pub Vec<T>);

impl<T: ListKey> IdList<T> {
    /// Parse the identifiers listed in `query`.
    pub fn parse(query: Option<&str>) -> Result<Self, ApiError> {
        let ids = query_items(query.unwrap_or_default(), T::KEY)
            .map(|item| {
                item.parse::<T>().map_err(|_| {
                    ApiError::field(T::KEY, format!("'{item}' is not a valid identifier"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if ids.is_empty() {
            return Err(ApiError::field(
                T::KEY,
                "at least one identifier is required",
            ));
        }

        Ok(Self(ids))
    }
}

#[async_trait]
impl<T, S> FromRequestParts<S> for IdList<T>
where
    T: ListKey,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::parse(parts.uri.query())
    }
}

/// The `years` filter. Unparseable and non-positive entries are ignored;
/// an empty list means no filter was given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Years(pub Vec<u32>);

impl Years {
    /// Parse the years listed in `query`.
    pub fn parse(query: Option<&str>) -> Self {
        let years = query_items(query.unwrap_or_default(), "years")
            .filter_map(|item| item.parse::<i64>().ok())
            .filter(|year| *year > 0)
            .filter_map(|year| u32::try_from(year).ok())
            .collect();
        Self(years)
    }

    /// Whether no usable year was given
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Years
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::parse(parts.uri.query()))
    }
}

/// The optional `zodiac` filter, by sign name or ordinal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Zodiac(pub Option<ChineseZodiac>);

impl Zodiac {
    /// Parse the zodiac sign given in `query`, if any.
    pub fn parse(query: Option<&str>) -> Result<Self, ApiError> {
        query_items(query.unwrap_or_default(), "zodiac")
            .next()
            .map(|item| item.parse::<ChineseZodiac>())
            .transpose()
            .map(Self)
            .map_err(ApiError::from)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Zodiac
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::parse(parts.uri.query())
    }
}
