//! Ready-made catalog data.

use gala_domain::{Gala, Performer, Program};
use gala_infrastructure::{DocumentRepository, DocumentStore, Repository, Result};
use std::sync::Arc;

use crate::builders::{GalaBuilder, PerformerBuilder, ProgramBuilder};

/// A gala with two programs sharing one performer.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub gala: Gala,
    pub programs: Vec<Program>,
    pub performers: Vec<Performer>,
}

/// Store a small linked catalog through the repositories.
///
/// Layout: gala "Spring Gala" (2020) runs "Opening Dance" then "Crosstalk";
/// "Opening Dance" lists Ann and Bo, "Crosstalk" lists Bo and Cy.
pub async fn seed_catalog<S: DocumentStore>(store: Arc<S>) -> Result<Catalog> {
    let performer_repo = DocumentRepository::<Performer, S>::new(Arc::clone(&store));
    let program_repo = DocumentRepository::<Program, S>::new(Arc::clone(&store));
    let gala_repo = DocumentRepository::<Gala, S>::new(store);

    let mut performers = Vec::new();
    for name in ["Ann", "Bo", "Cy"] {
        let performer = PerformerBuilder::new().with_name(name).build();
        performers.push(performer_repo.create_entity(performer).await?);
    }

    let opening = ProgramBuilder::new()
        .with_name("Opening Dance")
        .with_performers([performers[0].id, performers[1].id])
        .build();
    let crosstalk = ProgramBuilder::new()
        .with_name("Crosstalk")
        .with_performers([performers[1].id, performers[2].id])
        .build();
    let programs = vec![
        program_repo.create_entity(opening).await?,
        program_repo.create_entity(crosstalk).await?,
    ];

    let gala = GalaBuilder::new()
        .with_name("Spring Gala")
        .with_year(2020)
        .with_programs(programs.iter().map(|p| p.id))
        .build();
    let gala = gala_repo.create_entity(gala).await?;

    Ok(Catalog {
        gala,
        programs,
        performers,
    })
}

/// Galas for each `(name, year)` pair.
pub fn galas(entries: &[(&str, u32)]) -> Vec<Gala> {
    entries
        .iter()
        .map(|(name, year)| GalaBuilder::new().with_name(*name).with_year(*year).build())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gala_infrastructure::InMemoryDocumentStore;

    #[tokio::test]
    async fn test_seed_catalog_links_records() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let catalog = seed_catalog(Arc::clone(&store)).await.unwrap();

        assert_eq!(catalog.gala.program_ids.len(), 2);
        assert_eq!(catalog.programs[1].performer_ids[0], catalog.performers[1].id);
        assert_eq!(store.len::<Performer>(), 3);
        assert_eq!(store.len::<Program>(), 2);
        assert_eq!(store.len::<Gala>(), 1);
    }

    #[test]
    fn test_galas_helper() {
        let galas = galas(&[("A", 2020), ("B", 1982)]);
        assert_eq!(galas[1].year, 1982);
        assert_eq!(galas[0].name, "A");
    }
}
