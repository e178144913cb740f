//! Gala records.

use crate::entity::{Assignable, Capabilities, Entity, EntityMetadata, SoftDeletable};
use crate::identifiers::{GalaId, ProgramId};
use crate::zodiac::ChineseZodiac;
use serde::{Deserialize, Serialize};

/// Earliest year a gala can be held in
pub const FIRST_GALA_YEAR: u32 = 1982;

/// Latest year a gala can be scheduled for
pub const LAST_GALA_YEAR: u32 = 2050;

/// A yearly gala and the programs it is made of.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Gala {
    /// Primary key
    pub id: GalaId,

    /// Display name
    pub name: String,

    /// Year the gala is held in
    pub year: u32,

    /// Programs in running order
    #[serde(default)]
    pub program_ids: Vec<ProgramId>,

    /// Soft-delete marker
    #[serde(default)]
    pub is_deleted: bool,

    /// Audit fields
    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

impl Gala {
    /// A gala that has not been stored yet.
    pub fn new(name: impl Into<String>, year: u32, program_ids: Vec<ProgramId>) -> Self {
        Self {
            id: GalaId::nil(),
            name: name.into(),
            year,
            program_ids,
            is_deleted: false,
            metadata: EntityMetadata::default(),
        }
    }

    /// Zodiac sign of the gala's year
    pub fn zodiac(&self) -> ChineseZodiac {
        ChineseZodiac::from_year(self.year)
    }
}

impl Entity for Gala {
    type Id = GalaId;

    const KIND: &'static str = "Gala";

    fn id(&self) -> GalaId {
        self.id
    }

    fn set_id(&mut self, id: GalaId) {
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

impl Assignable for Gala {
    fn apply_patch(&self, patch: &Self) -> Self {
        Self {
            name: patch.name.clone(),
            year: patch.year,
            program_ids: patch.program_ids.clone(),
            ..self.clone()
        }
    }
}

impl SoftDeletable for Gala {
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
