//! Performer records.

use crate::entity::{Assignable, Capabilities, Entity, EntityMetadata, SoftDeletable};
use crate::identifiers::PerformerId;
use serde::{Deserialize, Serialize};

/// Someone who appears in one or more programs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Performer {
    pub id: PerformerId,
    pub name: String,
    #[serde(default)]
    pub introduction: String,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

impl Performer {
    /// A performer that has not been stored yet.
    pub fn new(name: impl Into<String>, introduction: impl Into<String>) -> Self {
        Self {
            id: PerformerId::nil(),
            name: name.into(),
            introduction: introduction.into(),
            is_deleted: false,
            metadata: EntityMetadata::default(),
        }
    }
}

impl Entity for Performer {
    type Id = PerformerId;

    const KIND: &'static str = "Performer";

    fn id(&self) -> PerformerId {
        self.id
    }

    fn set_id(&mut self, id: PerformerId) {
        self.id = id;
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.metadata
    }

    fn capabilities() -> Capabilities<Self> {
        Capabilities::none().with_assign().with_soft_delete()
    }
}

impl Assignable for Performer {
    fn apply_patch(&self, patch: &Self) -> Self {
        Self {
            name: patch.name.clone(),
            introduction: patch.introduction.clone(),
            ..self.clone()
        }
    }
}

impl SoftDeletable for Performer {
    fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    fn mark_deleted(&self) -> Self {
        Self {
            is_deleted: true,
            ..self.clone()
        }
    }
}
