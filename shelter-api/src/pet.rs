//! Pet entity and its invariants.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use utoipa::ToSchema;

use crate::validators::{normalize, validate_dog_breed};

/// Species accepted by the service, lower-case.
pub const VALID_SPECIES: &[&str] = &["dog", "cat", "bird", "rabbit", "hamster", "fish", "other"];

/// Adoption status of a pet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum PetStatus {
    #[default]
    Available,
    Pending,
    Adopted,
    Unavailable,
}

impl PetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PetStatus::Available => "available",
            PetStatus::Pending => "pending",
            PetStatus::Adopted => "adopted",
            PetStatus::Unavailable => "unavailable",
        }
    }
}

impl fmt::Display for PetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when a status string is not one of the four recognized
/// values. The update path propagates this instead of wrapping it in the
/// validation envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a valid pet status")]
pub struct ParseStatusError(pub String);

impl FromStr for PetStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(PetStatus::Available),
            "pending" => Ok(PetStatus::Pending),
            "adopted" => Ok(PetStatus::Adopted),
            "unavailable" => Ok(PetStatus::Unavailable),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// Errors raised by entity construction and validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PetError {
    /// An entity invariant failed; carries the human-readable message.
    #[error("{0}")]
    Validation(String),

    /// A required key was absent from an untyped representation.
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    /// A status string failed to parse.
    #[error(transparent)]
    Status(#[from] ParseStatusError),
}

/// Fields for constructing a pet, before an id has been assigned.
#[derive(Debug, Clone, Default)]
pub struct NewPet {
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub age_years: Option<f64>,
    pub description: Option<String>,
    pub status: PetStatus,
}

/// One adoptable animal.
///
/// Fields are public so the store can overwrite them in place during an
/// update; every observable state must satisfy [`Pet::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Pet {
    /// `None` until assigned by the store, then globally unique.
    pub id: Option<i64>,
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub age_years: Option<f64>,
    pub description: Option<String>,
    pub status: PetStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Serializable view of a pet, with status and timestamps as strings.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PetRepr {
    pub id: Option<i64>,
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub age_years: Option<f64>,
    pub description: Option<String>,
    /// Status as its string value, e.g. "available".
    pub status: String,
    /// ISO-8601 timestamp.
    pub created_at: String,
    /// ISO-8601 timestamp.
    pub updated_at: String,
}

impl Pet {
    /// Construct a pet and run the full invariant check.
    ///
    /// Both timestamps are set here and never touched again; mutation does
    /// not refresh `updated_at` (a known quirk, see DESIGN.md).
    pub fn new(spec: NewPet) -> Result<Self, PetError> {
        let now = Utc::now();
        let pet = Pet {
            id: None,
            name: spec.name,
            species: spec.species,
            breed: spec.breed,
            age_years: spec.age_years,
            description: spec.description,
            status: spec.status,
            created_at: now,
            updated_at: now,
        };
        pet.validate()?;
        Ok(pet)
    }

    /// Re-check all entity invariants against the current field values.
    /// The first violation wins; checks run in a fixed order.
    pub fn validate(&self) -> Result<(), PetError> {
        if self.name.trim().is_empty() {
            return Err(PetError::Validation("Pet name is required".to_string()));
        }

        if self.name.chars().count() > 100 {
            return Err(PetError::Validation(
                "Pet name must be 100 characters or less".to_string(),
            ));
        }

        if !VALID_SPECIES.contains(&normalize(&self.species).as_str()) {
            return Err(PetError::Validation(format!(
                "Species must be one of: {}",
                VALID_SPECIES.join(", ")
            )));
        }

        if let Some(age) = self.age_years
            && age < 0.0
        {
            return Err(PetError::Validation("Age cannot be negative".to_string()));
        }

        if let Some(msg) = validate_dog_breed(self.breed.as_deref(), &self.species) {
            return Err(PetError::Validation(msg));
        }

        Ok(())
    }

    /// Plain structured view of the pet.
    pub fn to_representation(&self) -> PetRepr {
        PetRepr {
            id: self.id,
            name: self.name.clone(),
            species: self.species.clone(),
            breed: self.breed.clone(),
            age_years: self.age_years,
            description: self.description.clone(),
            status: self.status.to_string(),
            created_at: self.created_at.to_rfc3339(),
            updated_at: self.updated_at.to_rfc3339(),
        }
    }

    /// Build a pet from an untyped JSON object.
    ///
    /// `name` and `species` must be present; a `status` string is parsed
    /// into the enum (and its parse error propagates); timestamps are not
    /// restored, construction stamps fresh ones.
    pub fn from_representation(data: &Map<String, Value>) -> Result<Self, PetError> {
        let name = match data.get("name") {
            None | Some(Value::Null) => return Err(PetError::MissingField("name")),
            Some(v) => v
                .as_str()
                .ok_or_else(|| PetError::Validation("name must be a string".to_string()))?
                .to_string(),
        };
        let species = match data.get("species") {
            None | Some(Value::Null) => return Err(PetError::MissingField("species")),
            Some(v) => v
                .as_str()
                .ok_or_else(|| PetError::Validation("species must be a string".to_string()))?
                .to_string(),
        };

        let status = match data.get("status") {
            None | Some(Value::Null) => PetStatus::default(),
            Some(v) => parse_status_value(v)?,
        };

        let age_years = match data.get("age_years") {
            None | Some(Value::Null) => None,
            Some(v) => Some(v.as_f64().ok_or_else(|| {
                PetError::Validation("age_years must be a number".to_string())
            })?),
        };

        let mut pet = Pet::new(NewPet {
            name,
            species,
            breed: opt_string(data.get("breed"), "breed")?,
            age_years,
            description: opt_string(data.get("description"), "description")?,
            status,
        })?;
        pet.id = data.get("id").and_then(Value::as_i64);
        Ok(pet)
    }
}

/// Parse a JSON value as a pet status. Non-strings fail the same way an
/// unrecognized string does.
pub fn parse_status_value(value: &Value) -> Result<PetStatus, ParseStatusError> {
    match value.as_str() {
        Some(s) => s.parse(),
        None => Err(ParseStatusError(value.to_string())),
    }
}

fn opt_string(value: Option<&Value>, field_name: &str) -> Result<Option<String>, PetError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| PetError::Validation(format!("{field_name} must be a string"))),
    }
}
