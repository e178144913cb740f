//! Program repository implementation.

use async_trait::async_trait;
use gala_domain::{Gala, GalaId, Program};
use tracing::{debug, instrument};

use super::{DocumentRepository, Repository};
use crate::store::{Document, DocumentStore};
use crate::{Error, Result};

impl Document for Program {
    const TABLE: &'static str = "Programs";
}

/// Repository trait for program operations.
#[async_trait]
pub trait ProgramRepository: Repository<Program> {
    /// Programs of a gala, in the gala's running order.
    ///
    /// Fails with [`Error::NotFound`] if the gala does not exist.
    async fn programs_by_gala_id(&self, gala_id: GalaId) -> Result<Vec<Program>>;
}

#[async_trait]
impl<S: DocumentStore> ProgramRepository for DocumentRepository<Program, S> {
    #[instrument(skip(self))]
    async fn programs_by_gala_id(&self, gala_id: GalaId) -> Result<Vec<Program>> {
        let gala = self
            .store()
            .load::<Gala>(gala_id)
            .await?
            .ok_or_else(|| Error::not_found::<Gala>(gala_id))?;

        let programs = self.query_entities_by_keys(&gala.program_ids).await?;
        debug!(found = programs.len(), "Programs loaded for gala");
        Ok(programs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryDocumentStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_programs_follow_gala_running_order() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let programs = DocumentRepository::<Program, _>::new(Arc::clone(&store));
        let galas = DocumentRepository::<Gala, _>::new(Arc::clone(&store));

        let opening = programs
            .create_entity(Program::new("Opening", "", Vec::new()))
            .await
            .unwrap();
        let finale = programs
            .create_entity(Program::new("Finale", "", Vec::new()))
            .await
            .unwrap();
        let gala = galas
            .create_entity(Gala::new(
                "Spring",
                2020,
                vec![finale.id, gala_domain::ProgramId::new(), opening.id],
            ))
            .await
            .unwrap();

        let found = programs.programs_by_gala_id(gala.id).await.unwrap();
        let names: Vec<_> = found.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Finale", "Opening"]);
    }

    #[tokio::test]
    async fn test_programs_of_missing_gala() {
        let programs =
            DocumentRepository::<Program, _>::new(Arc::new(InMemoryDocumentStore::new()));
        let err = programs
            .programs_by_gala_id(GalaId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
