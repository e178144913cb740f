//! Request and response shapes of the gala, program and performer endpoints.
//!
//! Every resource has a view model returned by the API plus the payloads
//! accepted inside the request envelope. Payloads never carry keys or audit
//! fields; those are assigned by the repository.

use chrono::{DateTime, Utc};
use gala_domain::{Gala, GalaId, Performer, PerformerId, Program, ProgramId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Gala as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GalaViewModel {
    #[schema(value_type = String, format = Uuid)]
    pub gala_id: GalaId,
    pub name: String,
    pub year: u32,
    #[schema(value_type = Vec<String>)]
    pub program_ids: Vec<ProgramId>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Gala> for GalaViewModel {
    fn from(gala: Gala) -> Self {
        Self {
            gala_id: gala.id,
            name: gala.name,
            year: gala.year,
            program_ids: gala.program_ids,
            is_deleted: gala.is_deleted,
            created_at: gala.metadata.created_at,
            updated_at: gala.metadata.updated_at,
        }
    }
}

/// Payload creating a gala
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GalaCreation {
    #[validate(length(min = 1, max = 4000, message = "name must be 1 to 4000 characters"))]
    pub name: String,

    #[validate(range(min = 1982, max = 2050, message = "year must be between 1982 and 2050"))]
    pub year: u32,

    #[schema(value_type = Vec<String>)]
    pub program_ids: Vec<ProgramId>,
}

impl From<GalaCreation> for Gala {
    fn from(creation: GalaCreation) -> Self {
        Gala::new(creation.name, creation.year, creation.program_ids)
    }
}

/// Payload replacing a gala's editable fields
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GalaEdit {
    #[validate(length(min = 1, max = 4000, message = "name must be 1 to 4000 characters"))]
    pub name: String,

    #[validate(range(min = 1982, max = 2050, message = "year must be between 1982 and 2050"))]
    pub year: u32,

    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub program_ids: Vec<ProgramId>,
}

impl From<GalaEdit> for Gala {
    fn from(edit: GalaEdit) -> Self {
        Gala::new(edit.name, edit.year, edit.program_ids)
    }
}

/// Program as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgramViewModel {
    #[schema(value_type = String, format = Uuid)]
    pub program_id: ProgramId,
    pub name: String,
    pub introduction: String,
    #[schema(value_type = Vec<String>)]
    pub performer_ids: Vec<PerformerId>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Program> for ProgramViewModel {
    fn from(program: Program) -> Self {
        Self {
            program_id: program.id,
            name: program.name,
            introduction: program.introduction,
            performer_ids: program.performer_ids,
            is_deleted: program.is_deleted,
            created_at: program.metadata.created_at,
            updated_at: program.metadata.updated_at,
        }
    }
}

/// Payload creating or editing a program
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgramPayload {
    #[validate(length(min = 1, max = 4000, message = "name must be 1 to 4000 characters"))]
    pub name: String,

    #[serde(default)]
    pub introduction: String,

    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub performer_ids: Vec<PerformerId>,
}

impl From<ProgramPayload> for Program {
    fn from(payload: ProgramPayload) -> Self {
        Program::new(payload.name, payload.introduction, payload.performer_ids)
    }
}

/// Performer as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PerformerViewModel {
    #[schema(value_type = String, format = Uuid)]
    pub performer_id: PerformerId,
    pub name: String,
    pub introduction: String,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Performer> for PerformerViewModel {
    fn from(performer: Performer) -> Self {
        Self {
            performer_id: performer.id,
            name: performer.name,
            introduction: performer.introduction,
            is_deleted: performer.is_deleted,
            created_at: performer.metadata.created_at,
            updated_at: performer.metadata.updated_at,
        }
    }
}

/// Payload creating or editing a performer
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PerformerPayload {
    #[validate(length(min = 1, max = 4000, message = "name must be 1 to 4000 characters"))]
    pub name: String,

    #[serde(default)]
    pub introduction: String,
}

impl From<PerformerPayload> for Performer {
    fn from(payload: PerformerPayload) -> Self {
        Performer::new(payload.name, payload.introduction)
    }
}

/// Query of the delete endpoints
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DeleteQuery {
    /// Remove the record instead of flagging it deleted
    #[serde(default)]
    pub hard_delete: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_gala_view_model_is_camel_case() {
        let gala = Gala::new("Spring Gala", 2020, vec![ProgramId::new()]);
        let json = serde_json::to_value(GalaViewModel::from(gala.clone())).unwrap();

        assert_eq!(json["galaId"], gala.id.to_string());
        assert_eq!(json["year"], 2020);
        assert_eq!(json["programIds"].as_array().unwrap().len(), 1);
        assert_eq!(json["isDeleted"], false);
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_gala_creation_validation() {
        let valid: GalaCreation =
            serde_json::from_value(json!({"name": "Spring Gala", "year": 2020, "programIds": []}))
                .unwrap();
        assert!(valid.validate().is_ok());

        let too_early = GalaCreation { year: 1981, ..valid.clone() };
        let errors = too_early.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("year"));

        let unnamed = GalaCreation { name: String::new(), ..valid.clone() };
        assert!(unnamed.validate().is_err());

        let long = GalaCreation { name: "x".repeat(4001), ..valid };
        assert!(long.validate().is_err());
    }

    #[test]
    fn test_gala_creation_requires_program_ids() {
        let result = serde_json::from_value::<GalaCreation>(json!({"name": "Spring Gala", "year": 2020}));
        assert!(result.is_err());
    }

    #[test]
    fn test_payloads_build_unsaved_entities() {
        let program: Program = ProgramPayload {
            name: "Crosstalk".to_string(),
            introduction: String::new(),
            performer_ids: vec![PerformerId::new()],
        }
        .into();
        assert!(program.id.is_nil());
        assert_eq!(program.performer_ids.len(), 1);

        let performer: Performer = serde_json::from_value::<PerformerPayload>(json!({"name": "Ann"}))
            .unwrap()
            .into();
        assert!(performer.id.is_nil());
        assert_eq!(performer.introduction, "");
    }
}
