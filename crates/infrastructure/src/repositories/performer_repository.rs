//! Performer repository implementation.

use async_trait::async_trait;
use gala_domain::{Gala, GalaId, Performer, PerformerId, Program, ProgramId};
use std::collections::HashSet;
use tracing::{debug, instrument};

use super::{DocumentRepository, Repository};
use crate::store::{Document, DocumentStore};
use crate::{Error, Result};

impl Document for Performer {
    const TABLE: &'static str = "Performers";
}

/// Repository trait for performer operations.
#[async_trait]
pub trait PerformerRepository: Repository<Performer> {
    /// Performers of a program, in the program's listing order.
    async fn performers_by_program_id(&self, program_id: ProgramId) -> Result<Vec<Performer>>;

    /// Every performer appearing in any program of a gala, first appearance first.
    async fn performers_by_gala_id(&self, gala_id: GalaId) -> Result<Vec<Performer>>;
}

#[async_trait]
impl<S: DocumentStore> PerformerRepository for DocumentRepository<Performer, S> {
    #[instrument(skip(self))]
    async fn performers_by_program_id(&self, program_id: ProgramId) -> Result<Vec<Performer>> {
        let program = self
            .store()
            .load::<Program>(program_id)
            .await?
            .ok_or_else(|| Error::not_found::<Program>(program_id))?;

        let performers = self.query_entities_by_keys(&program.performer_ids).await?;
        debug!(found = performers.len(), "Performers loaded for program");
        Ok(performers)
    }

    #[instrument(skip(self))]
    async fn performers_by_gala_id(&self, gala_id: GalaId) -> Result<Vec<Performer>> {
        let gala = self
            .store()
            .load::<Gala>(gala_id)
            .await?
            .ok_or_else(|| Error::not_found::<Gala>(gala_id))?;

        let programs = self.store().batch_get::<Program>(&gala.program_ids).await?;

        let mut seen = HashSet::new();
        let keys: Vec<PerformerId> = programs
            .iter()
            .flat_map(|program| program.performer_ids.iter().copied())
            .filter(|id| seen.insert(*id))
            .collect();

        let performers = self.query_entities_by_keys(&keys).await?;
        debug!(
            programs = programs.len(),
            found = performers.len(),
            "Performers loaded for gala"
        );
        Ok(performers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryDocumentStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_performers_by_gala_are_unique_in_first_appearance_order() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let performers = DocumentRepository::<Performer, _>::new(Arc::clone(&store));
        let programs = DocumentRepository::<Program, _>::new(Arc::clone(&store));
        let galas = DocumentRepository::<Gala, _>::new(Arc::clone(&store));

        let mut people = Vec::new();
        for name in ["Ann", "Bo", "Cy"] {
            people.push(
                performers
                    .create_entity(Performer::new(name, ""))
                    .await
                    .unwrap(),
            );
        }
        let (ann, bo, cy) = (people[0].id, people[1].id, people[2].id);

        let duet = programs
            .create_entity(Program::new("Duet", "", vec![bo, ann]))
            .await
            .unwrap();
        let trio = programs
            .create_entity(Program::new("Trio", "", vec![ann, cy, bo]))
            .await
            .unwrap();
        let gala = galas
            .create_entity(Gala::new("Spring", 2020, vec![duet.id, trio.id]))
            .await
            .unwrap();

        let found = performers.performers_by_gala_id(gala.id).await.unwrap();
        let names: Vec<_> = found.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Bo", "Ann", "Cy"]);

        let found = performers.performers_by_program_id(trio.id).await.unwrap();
        let names: Vec<_> = found.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Ann", "Cy", "Bo"]);
    }

    #[tokio::test]
    async fn test_performers_of_missing_program() {
        let performers =
            DocumentRepository::<Performer, _>::new(Arc::new(InMemoryDocumentStore::new()));
        let err = performers
            .performers_by_program_id(ProgramId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
