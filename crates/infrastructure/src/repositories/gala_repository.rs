//! Gala repository implementation.
//!
//! Galas are indexed by year, so lookups by year (and by zodiac sign, which
//! resolves to a set of years) are answered from the `YearIndex` instead of a
//! table scan.

use async_trait::async_trait;
use futures::future::try_join_all;
use gala_domain::{ensure_gala_year, ChineseZodiac, Gala};
use tracing::{debug, instrument};

use super::{DocumentRepository, Repository};
use crate::store::{Document, DocumentStore, IndexKey, IndexValue, SecondaryIndex, YEAR_INDEX};
use crate::Result;

impl Document for Gala {
    const TABLE: &'static str = "Galas";
    const INDEXES: &'static [SecondaryIndex] = &[YEAR_INDEX];
}

/// Repository trait for gala operations.
#[async_trait]
pub trait GalaRepository: Repository<Gala> {
    /// Galas held in any of `years`, most recent year first, then by name.
    ///
    /// Years outside the gala range cannot match a record and are not looked up.
    async fn galas_by_years(&self, years: &[u32]) -> Result<Vec<Gala>>;

    /// Galas held in a year of the given zodiac sign.
    async fn galas_by_zodiac(&self, zodiac: ChineseZodiac) -> Result<Vec<Gala>> {
        let years = zodiac.years();
        self.galas_by_years(&years).await
    }
}

#[async_trait]
impl<S: DocumentStore> GalaRepository for DocumentRepository<Gala, S> {
    #[instrument(skip(self))]
    async fn galas_by_years(&self, years: &[u32]) -> Result<Vec<Gala>> {
        let mut years: Vec<u32> = years
            .iter()
            .filter_map(|year| ensure_gala_year(*year).ok())
            .collect();
        years.sort_unstable();
        years.dedup();

        let lookups = years.iter().map(|year| {
            let key = IndexKey::new(YEAR_INDEX, IndexValue::Number(i64::from(*year)));
            async move { self.store().query::<Gala>(&key).await }
        });

        let mut galas: Vec<Gala> = try_join_all(lookups).await?.into_iter().flatten().collect();
        galas.sort_by(|a, b| b.year.cmp(&a.year).then_with(|| a.name.cmp(&b.name)));

        debug!(found = galas.len(), "Galas loaded by year");
        Ok(galas)
    }
}
