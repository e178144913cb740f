//! Entity contracts shared by every stored record.
//!
//! An [`Entity`] has a typed identity and an audit block. Optional behavior is
//! expressed through the [`Assignable`] and [`SoftDeletable`] traits, and each
//! entity type publishes a [`Capabilities`] descriptor listing which of them it
//! was registered with. Generic code consults the descriptor instead of probing
//! values at runtime.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use uuid::Uuid;

/// Marker for identifier newtypes usable as primary keys.
pub trait EntityId:
    Copy + Eq + Hash + fmt::Debug + fmt::Display + From<Uuid> + Into<Uuid> + Send + Sync + 'static
{
}

/// Audit fields carried by every record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EntityMetadata {
    /// When the record was first stored
    pub created_at: DateTime<Utc>,

    /// When the record was last mutated
    pub updated_at: DateTime<Utc>,

    /// Optimistic concurrency token, owned by the document store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_number: Option<i64>,
}

impl EntityMetadata {
    /// Metadata for a record created at `now`, without a version.
    pub fn created(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            updated_at: now,
            version_number: None,
        }
    }

    /// Refresh `updated_at`, never moving it backwards past `created_at`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }
}

impl Default for EntityMetadata {
    fn default() -> Self {
        Self::created(Utc::now())
    }
}

/// A stored record with a typed identity.
pub trait Entity: Clone + fmt::Debug + Send + Sync + 'static {
    /// Primary key type
    type Id: EntityId;

    /// Type name used in diagnostics
    const KIND: &'static str;

    /// Current identity
    fn id(&self) -> Self::Id;

    /// Replace the identity; only the repository does this, on create
    fn set_id(&mut self, id: Self::Id);

    /// Audit fields
    fn metadata(&self) -> &EntityMetadata;

    /// Mutable audit fields
    fn metadata_mut(&mut self) -> &mut EntityMetadata;

    /// Optional behaviors this type was registered with
    fn capabilities() -> Capabilities<Self> {
        Capabilities::none()
    }
}

/// Records whose mutable fields can be replaced from another instance.
pub trait Assignable: Entity {
    /// Return a copy of `self` carrying every mutable field of `patch`.
    ///
    /// The identity, the audit block and the soft-delete flag always come
    /// from `self`.
    fn apply_patch(&self, patch: &Self) -> Self;
}

/// Records that support being flagged as deleted instead of removed.
pub trait SoftDeletable: Entity {
    /// Whether the record has been soft-deleted
    fn is_deleted(&self) -> bool;

    /// Return a copy of `self` flagged as deleted
    fn mark_deleted(&self) -> Self;
}

/// Patch routine published by an assignable type.
pub type AssignFn<E> = fn(&E, &E) -> E;

/// Soft-delete routine published by a soft-deletable type.
pub type SoftDeleteFn<E> = fn(&E) -> E;

/// Capability descriptor for an entity type.
pub struct Capabilities<E> {
    assign: Option<AssignFn<E>>,
    soft_delete: Option<SoftDeleteFn<E>>,
}

impl<E> Capabilities<E> {
    /// A descriptor with no optional behavior
    pub const fn none() -> Self {
        Self {
            assign: None,
            soft_delete: None,
        }
    }

    /// The patch routine, if the type is assignable
    pub fn assign(&self) -> Option<AssignFn<E>> {
        self.assign
    }

    /// The soft-delete routine, if the type is soft-deletable
    pub fn soft_delete(&self) -> Option<SoftDeleteFn<E>> {
        self.soft_delete
    }

    /// Whether the type is assignable
    pub fn is_assignable(&self) -> bool {
        self.assign.is_some()
    }

    /// Whether the type is soft-deletable
    pub fn is_soft_deletable(&self) -> bool {
        self.soft_delete.is_some()
    }
}

impl<E: Assignable> Capabilities<E> {
    /// Register the type's [`Assignable`] implementation
    pub fn with_assign(mut self) -> Self {
        self.assign = Some(E::apply_patch as AssignFn<E>);
        self
    }
}

impl<E: SoftDeletable> Capabilities<E> {
    /// Register the type's [`SoftDeletable`] implementation
    pub fn with_soft_delete(mut self) -> Self {
        self.soft_delete = Some(E::mark_deleted as SoftDeleteFn<E>);
        self
    }
}

impl<E> Clone for Capabilities<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Capabilities<E> {}

impl<E> Default for Capabilities<E> {
    fn default() -> Self {
        Self::none()
    }
}

impl<E> fmt::Debug for Capabilities<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities")
            .field("assignable", &self.is_assignable())
            .field("soft_deletable", &self.is_soft_deletable())
            .finish()
    }
}
