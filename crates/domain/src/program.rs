//! Program records.

use crate::entity::{Assignable, Capabilities, Entity, EntityMetadata, SoftDeletable};
use crate::identifiers::{PerformerId, ProgramId};
use serde::{Deserialize, Serialize};

/// A single act performed during a gala.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Program {
    /// Primary key
    pub id: ProgramId,

    /// Display name
    pub name: String,

    /// Free-form description
    #[serde(default)]
    pub introduction: String,

    /// Performers appearing in the program
    #[serde(default)]
    pub performer_ids: Vec<PerformerId>,

    /// Soft-delete marker
    #[serde(default)]
    pub is_deleted: bool,

    /// Audit fields
    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

impl Program {
    /// A program that has not been stored yet.
    pub fn new(
        name: impl Into<String>,
        introduction: impl Into<String>,
        performer_ids: Vec<PerformerId>,
    ) -> Self {
        Self {
            id: ProgramId::nil(),
            name: name.into(),
            introduction: introduction.into(),
            performer_ids,
            is_deleted: false,
            metadata: EntityMetadata::default(),
        }
    }
}

impl Entity for Program {
    type Id = ProgramId;

    const KIND: &'static str = "Program";

    fn id(&self) -> ProgramId {
        self.id
    }

    fn set_id(&mut self, id: ProgramId) {
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

impl Assignable for Program {
    fn apply_patch(&self, patch: &Self) -> Self {
        Self {
            name: patch.name.clone(),
            introduction: patch.introduction.clone(),
            performer_ids: patch.performer_ids.clone(),
            ..self.clone()
        }
    }
}

impl SoftDeletable for Program {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_patch_replaces_performers() {
        let mut original = Program::new("Origin", "Origin", vec![PerformerId::new()]);
        original.id = ProgramId::new();

        let patch = Program::new(
            "Mocked",
            "Mocked",
            vec![PerformerId::new(), PerformerId::new()],
        );
        let updated = original.apply_patch(&patch);

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.name, "Mocked");
        assert_eq!(updated.introduction, "Mocked");
        assert_eq!(updated.performer_ids.len(), 2);
        assert_eq!(updated.metadata.created_at, original.metadata.created_at);
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let json = serde_json::json!({
            "Id": ProgramId::new(),
            "Name": "Crosstalk",
            "CreatedAt": "2020-01-24T12:00:00Z",
            "UpdatedAt": "2020-01-24T12:00:00Z",
        });
        let program: Program = serde_json::from_value(json).unwrap();
        assert!(program.performer_ids.is_empty());
        assert!(program.introduction.is_empty());
        assert!(!program.is_deleted);
        assert_eq!(program.metadata.version_number, None);
    }
}
