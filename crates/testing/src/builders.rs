//! Fluent builder pattern for constructing test data.
//!
//! Builders start from randomized but valid values, so tests only spell out
//! the fields they care about.

use chrono::{DateTime, Utc};
use fake::{
    faker::{lorem::en::Sentence, name::en::Name},
    Fake,
};
use gala_domain::{
    EntityMetadata, Gala, GalaId, Performer, PerformerId, Program, ProgramId, FIRST_GALA_YEAR,
    LAST_GALA_YEAR,
};

/// Builder for creating Gala test instances
#[derive(Clone)]
pub struct GalaBuilder {
    id: GalaId,
    name: String,
    year: u32,
    program_ids: Vec<ProgramId>,
    is_deleted: bool,
    metadata: EntityMetadata,
}

impl GalaBuilder {
    pub fn new() -> Self {
        Self {
            id: GalaId::nil(),
            name: format!("{} Gala", Name().fake::<String>()),
            year: (FIRST_GALA_YEAR..=LAST_GALA_YEAR).fake(),
            program_ids: Vec::new(),
            is_deleted: false,
            metadata: EntityMetadata::default(),
        }
    }

    pub fn with_id(mut self, id: GalaId) -> Self {
        self.id = id;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_year(mut self, year: u32) -> Self {
        self.year = year;
        self
    }

    pub fn with_programs(mut self, program_ids: impl IntoIterator<Item = ProgramId>) -> Self {
        self.program_ids = program_ids.into_iter().collect();
        self
    }

    pub fn with_program(mut self, program_id: ProgramId) -> Self {
        self.program_ids.push(program_id);
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.metadata = EntityMetadata::created(at);
        self
    }

    pub fn deleted(mut self) -> Self {
        self.is_deleted = true;
        self
    }

    pub fn build(self) -> Gala {
        Gala {
            id: self.id,
            name: self.name,
            year: self.year,
            program_ids: self.program_ids,
            is_deleted: self.is_deleted,
            metadata: self.metadata,
        }
    }
}

impl Default for GalaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating Program test instances
#[derive(Clone)]
pub struct ProgramBuilder {
    id: ProgramId,
    name: String,
    introduction: String,
    performer_ids: Vec<PerformerId>,
    is_deleted: bool,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self {
            id: ProgramId::nil(),
            name: Sentence(2..4).fake(),
            introduction: Sentence(6..12).fake(),
            performer_ids: Vec::new(),
            is_deleted: false,
        }
    }

    pub fn with_id(mut self, id: ProgramId) -> Self {
        self.id = id;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_introduction(mut self, introduction: impl Into<String>) -> Self {
        self.introduction = introduction.into();
        self
    }

    pub fn with_performers(mut self, performer_ids: impl IntoIterator<Item = PerformerId>) -> Self {
        self.performer_ids = performer_ids.into_iter().collect();
        self
    }

    pub fn deleted(mut self) -> Self {
        self.is_deleted = true;
        self
    }

    pub fn build(self) -> Program {
        Program {
            id: self.id,
            name: self.name,
            introduction: self.introduction,
            performer_ids: self.performer_ids,
            is_deleted: self.is_deleted,
            metadata: EntityMetadata::default(),
        }
    }
}

impl Default for ProgramBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating Performer test instances
#[derive(Clone)]
pub struct PerformerBuilder {
    id: PerformerId,
    name: String,
    introduction: String,
    is_deleted: bool,
}

impl PerformerBuilder {
    pub fn new() -> Self {
        Self {
            id: PerformerId::nil(),
            name: Name().fake(),
            introduction: Sentence(6..12).fake(),
            is_deleted: false,
        }
    }

    pub fn with_id(mut self, id: PerformerId) -> Self {
        self.id = id;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_introduction(mut self, introduction: impl Into<String>) -> Self {
        self.introduction = introduction.into();
        self
    }

    pub fn deleted(mut self) -> Self {
        self.is_deleted = true;
        self
    }

    pub fn build(self) -> Performer {
        Performer {
            id: self.id,
            name: self.name,
            introduction: self.introduction,
            is_deleted: self.is_deleted,
            metadata: EntityMetadata::default(),
        }
    }
}

impl Default for PerformerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gala_builder_defaults_are_valid() {
        let gala = GalaBuilder::new().build();
        assert!(gala.id.is_nil());
        assert!(!gala.name.is_empty());
        assert!((FIRST_GALA_YEAR..=LAST_GALA_YEAR).contains(&gala.year));
        assert!(!gala.is_deleted);
    }

    #[test]
    fn test_gala_builder_overrides() {
        let program = ProgramId::new();
        let gala = GalaBuilder::new()
            .with_name("Spring Gala")
            .with_year(2020)
            .with_program(program)
            .deleted()
            .build();
        assert_eq!(gala.name, "Spring Gala");
        assert_eq!(gala.year, 2020);
        assert_eq!(gala.program_ids, vec![program]);
        assert!(gala.is_deleted);
    }

    #[test]
    fn test_program_and_performer_builders() {
        let performer = PerformerBuilder::new().with_name("Ann").build();
        let program = ProgramBuilder::new()
            .with_performers([performer.id])
            .build();
        assert_eq!(performer.name, "Ann");
        assert_eq!(program.performer_ids.len(), 1);
    }
}
