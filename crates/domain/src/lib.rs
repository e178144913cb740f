//! Gala Catalog Domain Types
//!
//! This crate provides the core domain model for the gala catalog: the three
//! record kinds (galas, programs, performers), their typed identifiers, the
//! capability contracts generic storage code relies on, and the zodiac
//! derivation used to look galas up by sign.
//!
//! ## Architecture
//!
//! - **identifiers**: UUID newtypes, one per record kind
//! - **entity**: the `Entity` contract, audit fields and capability descriptors
//! - **gala** / **program** / **performer**: the records themselves
//! - **zodiac**: the twelve-year cycle and its gala years
//! - **errors**: domain validation errors
//!
//! ## Usage
//!
//! ```rust
//! use gala_domain::{Assignable, ChineseZodiac, Gala, ProgramId};
//!
//! let original = Gala::new("Spring Gala", 2020, vec![ProgramId::new()]);
//! let patch = Gala::new("Spring Gala Revised", 2020, vec![]);
//!
//! let revised = original.apply_patch(&patch);
//! assert_eq!(revised.name, "Spring Gala Revised");
//! assert_eq!(revised.zodiac(), ChineseZodiac::Rat);
//! ```

#![warn(clippy::all)]

pub mod entity;
pub mod errors;
pub mod gala;
pub mod identifiers;
pub mod performer;
pub mod program;
pub mod zodiac;

// Re-export commonly used types
pub use entity::{Assignable, Capabilities, Entity, EntityId, EntityMetadata, SoftDeletable};
pub use errors::{ensure_gala_year, DomainError};
pub use gala::{Gala, FIRST_GALA_YEAR, LAST_GALA_YEAR};
pub use identifiers::*;
pub use performer::Performer;
pub use program::Program;
pub use zodiac::ChineseZodiac;
