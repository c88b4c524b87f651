//! In-memory pet store and the response envelope contract.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::pet::{ParseStatusError, Pet, VALID_SPECIES, parse_status_value};
use crate::validators::{normalize, validate_required, validate_string_length};

/// Machine-readable error codes carried by failure envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input failed a validator or an entity invariant.
    ValidationError,
    /// Referenced id absent from the store.
    NotFound,
    /// Unrecoverable error that bypassed the validation path.
    InternalError,
}

/// Error body of a failure envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EnvelopeError {
    pub code: ErrorCode,
    pub message: String,
}

/// Uniform response wrapper returned by every store operation.
///
/// Success: `{success: true, data, message}`.
/// Failure: `{success: false, error: {code, message}}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Envelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<EnvelopeError>,
}

impl Envelope {
    pub fn success(data: Value, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(EnvelopeError {
                code,
                message: message.into(),
            }),
        }
    }

    fn not_found(id: i64) -> Self {
        Self::error(ErrorCode::NotFound, format!("Pet with ID {id} not found"))
    }
}

/// In-memory mapping from id to pet, plus the next-id counter.
///
/// Ids start at 1, increment only on successful creation, and are never
/// reused, not even after deletion.
#[derive(Debug)]
pub struct PetStore {
    pets: HashMap<i64, Pet>,
    next_id: i64,
}

impl Default for PetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PetStore {
    pub fn new() -> Self {
        Self {
            pets: HashMap::new(),
            next_id: 1,
        }
    }

    /// Clear the store and reset the counter. Test isolation only.
    pub fn reset(&mut self) {
        self.pets.clear();
        self.next_id = 1;
    }

    /// List all pets, optionally filtered by species (case-insensitive)
    /// and by status string. Always succeeds.
    pub fn list(&self, species: Option<&str>, status: Option<&str>) -> Envelope {
        let mut pets: Vec<&Pet> = self
            .pets
            .values()
            .filter(|p| {
                species.is_none_or(|s| normalize(&p.species) == normalize(s))
                    && status.is_none_or(|s| p.status.as_str() == normalize(s))
            })
            .collect();
        pets.sort_by_key(|p| p.id);

        let count = pets.len();
        let data: Vec<Value> = pets
            .iter()
            .map(|p| serde_json::to_value(p.to_representation()).unwrap_or(Value::Null))
            .collect();

        Envelope::success(Value::Array(data), format!("Found {count} pets"))
    }

    /// Fetch one pet by id.
    pub fn get(&self, id: i64) -> Envelope {
        match self.pets.get(&id) {
            Some(pet) => Envelope::success(repr_value(pet), "Success"),
            None => Envelope::not_found(id),
        }
    }

    /// Validate and store a new pet, assigning the next id.
    ///
    /// Top-level checks run in a fixed order (required name, required
    /// species, name length, species membership), then entity construction
    /// re-validates everything including breed and age. First failure wins.
    pub fn create(&mut self, data: &Map<String, Value>) -> Envelope {
        if let Some(msg) = validate_required(data.get("name"), "name") {
            return Envelope::error(ErrorCode::ValidationError, msg);
        }
        if let Some(msg) = validate_required(data.get("species"), "species") {
            return Envelope::error(ErrorCode::ValidationError, msg);
        }
        if let Some(msg) = validate_string_length(&data["name"], "name", 0, 100) {
            return Envelope::error(ErrorCode::ValidationError, msg);
        }
        let species_ok = data["species"]
            .as_str()
            .is_some_and(|s| VALID_SPECIES.contains(&normalize(s).as_str()));
        if !species_ok {
            return Envelope::error(
                ErrorCode::ValidationError,
                format!("Invalid species. Must be one of: {}", VALID_SPECIES.join(", ")),
            );
        }

        let mut pet = match Pet::from_representation(data) {
            Ok(pet) => pet,
            Err(e) => return Envelope::error(ErrorCode::ValidationError, e.to_string()),
        };

        let id = self.next_id;
        pet.id = Some(id);
        self.pets.insert(id, pet);
        self.next_id += 1;

        Envelope::success(repr_value(&self.pets[&id]), "Pet created successfully")
    }

    /// Overwrite the listed fields on a stored pet, then re-validate.
    ///
    /// Fields are mutated in place before validation runs; a failed
    /// re-validation is reported as `VALIDATION_ERROR` but the partial
    /// mutation stays (no rollback). A malformed `status` value does not
    /// take the envelope path at all: it propagates as a typed error.
    pub fn update(
        &mut self,
        id: i64,
        data: &Map<String, Value>,
    ) -> Result<Envelope, ParseStatusError> {
        let Some(pet) = self.pets.get_mut(&id) else {
            return Ok(Envelope::not_found(id));
        };

        if let Some(v) = data.get("name") {
            pet.name = v.as_str().unwrap_or_default().to_string();
        }
        if let Some(v) = data.get("species") {
            pet.species = v.as_str().unwrap_or_default().to_string();
        }
        if let Some(v) = data.get("breed") {
            match v {
                Value::Null => pet.breed = None,
                v => match v.as_str() {
                    Some(breed) => pet.breed = Some(breed.to_string()),
                    None => {
                        return Ok(Envelope::error(
                            ErrorCode::ValidationError,
                            "breed must be a string",
                        ));
                    }
                },
            }
        }
        if let Some(v) = data.get("age_years") {
            match v {
                Value::Null => pet.age_years = None,
                v => match v.as_f64() {
                    Some(age) => pet.age_years = Some(age),
                    None => {
                        return Ok(Envelope::error(
                            ErrorCode::ValidationError,
                            "age_years must be a number",
                        ));
                    }
                },
            }
        }
        if let Some(v) = data.get("description") {
            match v {
                Value::Null => pet.description = None,
                v => match v.as_str() {
                    Some(desc) => pet.description = Some(desc.to_string()),
                    None => {
                        return Ok(Envelope::error(
                            ErrorCode::ValidationError,
                            "description must be a string",
                        ));
                    }
                },
            }
        }
        if let Some(v) = data.get("status") {
            pet.status = parse_status_value(v)?;
        }

        Ok(match pet.validate() {
            Ok(()) => Envelope::success(repr_value(pet), "Pet updated successfully"),
            Err(e) => Envelope::error(ErrorCode::ValidationError, e.to_string()),
        })
    }

    /// Remove a pet by id. The id is never handed out again.
    pub fn delete(&mut self, id: i64) -> Envelope {
        if self.pets.remove(&id).is_none() {
            return Envelope::not_found(id);
        }
        Envelope::success(Value::Null, format!("Pet {id} deleted successfully"))
    }
}

fn repr_value(pet: &Pet) -> Value {
    serde_json::to_value(pet.to_representation()).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    fn code(env: &Envelope) -> ErrorCode {
        env.error.as_ref().expect("error body").code
    }

    #[test]
    fn create_assigns_id_one_and_defaults_status() {
        let mut store = PetStore::new();
        let env = store.create(&obj(json!({"name": "Buddy", "species": "dog"})));
        assert!(env.success);
        let data = env.data.unwrap();
        assert_eq!(data["id"], 1);
        assert_eq!(data["status"], "available");
        assert_eq!(env.message.as_deref(), Some("Pet created successfully"));
    }

    #[test]
    fn create_missing_name_fails_first() {
        let mut store = PetStore::new();
        let env = store.create(&obj(json!({"species": "dog"})));
        assert!(!env.success);
        assert_eq!(code(&env), ErrorCode::ValidationError);
        assert_eq!(env.error.unwrap().message, "name is required");
    }

    #[test]
    fn create_invalid_species_message() {
        let mut store = PetStore::new();
        let env = store.create(&obj(json!({"name": "Puff", "species": "dragon"})));
        assert_eq!(code(&env), ErrorCode::ValidationError);
        assert_eq!(
            env.error.unwrap().message,
            "Invalid species. Must be one of: dog, cat, bird, rabbit, hamster, fish, other"
        );
    }

    #[test]
    fn create_unrecognized_breed_fails() {
        let mut store = PetStore::new();
        let env = store.create(&obj(json!({
            "name": "Max",
            "species": "dog",
            "breed": "Flying Dragon Dog",
        })));
        assert!(!env.success);
        assert_eq!(code(&env), ErrorCode::ValidationError);
        assert!(
            env.error
                .unwrap()
                .message
                .contains("not a recognized dog breed")
        );
    }

    #[test]
    fn create_then_get_round_trips() {
        let mut store = PetStore::new();
        let created = store
            .create(&obj(json!({
                "name": "Buddy",
                "species": "dog",
                "breed": "Labrador",
                "age_years": 3,
            })))
            .data
            .unwrap();
        let fetched = store.get(created["id"].as_i64().unwrap()).data.unwrap();
        assert_eq!(created, fetched);
    }

    #[test]
    fn get_missing_id_not_found() {
        let store = PetStore::new();
        let env = store.get(999);
        assert!(!env.success);
        assert_eq!(code(&env), ErrorCode::NotFound);
        assert_eq!(env.error.unwrap().message, "Pet with ID 999 not found");
    }

    #[test]
    fn list_reports_count_and_filters() {
        let mut store = PetStore::new();
        store.create(&obj(json!({"name": "Buddy", "species": "dog"})));
        store.create(&obj(json!({"name": "Whiskers", "species": "cat"})));

        let all = store.list(None, None);
        assert!(all.success);
        assert_eq!(all.message.as_deref(), Some("Found 2 pets"));

        let dogs = store.list(Some("DOG"), None);
        let data = dogs.data.unwrap();
        let items = data.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["species"], "dog");
    }

    #[test]
    fn list_filters_by_status() {
        let mut store = PetStore::new();
        store.create(&obj(json!({"name": "Buddy", "species": "dog"})));
        store.create(&obj(json!({"name": "Rex", "species": "dog"})));
        store.update(1, &obj(json!({"status": "adopted"}))).unwrap();

        let adopted = store.list(None, Some("adopted"));
        let data = adopted.data.unwrap();
        assert_eq!(data.as_array().unwrap().len(), 1);
        assert_eq!(data[0]["name"], "Buddy");
    }

    #[test]
    fn update_status_succeeds() {
        let mut store = PetStore::new();
        store.create(&obj(json!({"name": "Buddy", "species": "dog"})));
        let env = store.update(1, &obj(json!({"status": "adopted"}))).unwrap();
        assert!(env.success);
        assert_eq!(env.data.unwrap()["status"], "adopted");
        assert_eq!(env.message.as_deref(), Some("Pet updated successfully"));
    }

    #[test]
    fn update_missing_id_not_found() {
        let mut store = PetStore::new();
        let env = store.update(42, &obj(json!({"name": "Max"}))).unwrap();
        assert_eq!(code(&env), ErrorCode::NotFound);
    }

    #[test]
    fn update_malformed_status_propagates() {
        let mut store = PetStore::new();
        store.create(&obj(json!({"name": "Buddy", "species": "dog"})));
        let err = store
            .update(1, &obj(json!({"status": "homeless"})))
            .unwrap_err();
        assert_eq!(err, ParseStatusError("homeless".to_string()));
    }

    #[test]
    fn update_non_string_breed_rejected_without_clearing() {
        let mut store = PetStore::new();
        store.create(&obj(json!({
            "name": "Buddy",
            "species": "dog",
            "breed": "Labrador",
        })));

        let env = store.update(1, &obj(json!({"breed": 123}))).unwrap();
        assert!(!env.success);
        assert_eq!(code(&env), ErrorCode::ValidationError);
        assert_eq!(env.error.unwrap().message, "breed must be a string");

        // The stored breed is untouched.
        let fetched = store.get(1).data.unwrap();
        assert_eq!(fetched["breed"], "Labrador");
    }

    #[test]
    fn update_null_breed_clears_it() {
        let mut store = PetStore::new();
        store.create(&obj(json!({
            "name": "Buddy",
            "species": "dog",
            "breed": "Labrador",
        })));

        let env = store.update(1, &obj(json!({"breed": null}))).unwrap();
        assert!(env.success);
        assert_eq!(env.data.unwrap()["breed"], Value::Null);
    }

    #[test]
    fn update_non_string_description_rejected() {
        let mut store = PetStore::new();
        store.create(&obj(json!({"name": "Buddy", "species": "dog"})));

        let env = store.update(1, &obj(json!({"description": 7}))).unwrap();
        assert!(!env.success);
        assert_eq!(code(&env), ErrorCode::ValidationError);
        assert_eq!(env.error.unwrap().message, "description must be a string");
    }

    #[test]
    fn failed_update_keeps_partial_mutation() {
        let mut store = PetStore::new();
        store.create(&obj(json!({"name": "Buddy", "species": "dog"})));

        // name is applied before the breed check fails; no rollback.
        let env = store
            .update(1, &obj(json!({"name": "Max", "breed": "Imaginary Breed"})))
            .unwrap();
        assert!(!env.success);
        assert_eq!(code(&env), ErrorCode::ValidationError);

        let fetched = store.get(1).data.unwrap();
        assert_eq!(fetched["name"], "Max");
        assert_eq!(fetched["breed"], "Imaginary Breed");
    }

    #[test]
    fn delete_then_get_not_found() {
        let mut store = PetStore::new();
        store.create(&obj(json!({"name": "Buddy", "species": "dog"})));

        let env = store.delete(1);
        assert!(env.success);
        assert_eq!(env.data, Some(Value::Null));
        assert_eq!(env.message.as_deref(), Some("Pet 1 deleted successfully"));

        assert_eq!(code(&store.get(1)), ErrorCode::NotFound);
    }

    #[test]
    fn delete_missing_id_not_found() {
        let mut store = PetStore::new();
        assert_eq!(code(&store.delete(999)), ErrorCode::NotFound);
    }

    #[test]
    fn ids_increase_and_are_never_reused() {
        let mut store = PetStore::new();
        for name in ["a", "b", "c"] {
            store.create(&obj(json!({"name": name, "species": "cat"})));
        }
        store.delete(2);
        store.delete(3);

        let env = store.create(&obj(json!({"name": "d", "species": "cat"})));
        assert_eq!(env.data.unwrap()["id"], 4);
    }

    #[test]
    fn default_store_starts_ids_at_one() {
        let mut store = PetStore::default();
        let env = store.create(&obj(json!({"name": "Buddy", "species": "dog"})));
        assert_eq!(env.data.unwrap()["id"], 1);
    }

    #[test]
    fn reset_clears_pets_and_counter() {
        let mut store = PetStore::new();
        store.create(&obj(json!({"name": "Buddy", "species": "dog"})));
        store.reset();

        let env = store.create(&obj(json!({"name": "Rex", "species": "dog"})));
        assert_eq!(env.data.unwrap()["id"], 1);
    }
}
