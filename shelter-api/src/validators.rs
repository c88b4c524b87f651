//! Field-level validators for untyped request payloads.
//!
//! Each validator returns `Some(message)` on the first violation and `None`
//! when the value is acceptable. Absent and `null` values are treated the
//! same way throughout.

use serde_json::Value;

/// Recognized dog breeds (AKC breeds plus common mixed-breed terms), stored
/// lower-case. Breed checks normalize the input before lookup.
pub const DOG_BREEDS: &[&str] = &[
    // Sporting Group
    "labrador retriever",
    "golden retriever",
    "german shorthaired pointer",
    "brittany",
    "cocker spaniel",
    "english springer spaniel",
    "vizsla",
    "weimaraner",
    "irish setter",
    "english setter",
    "pointer",
    // Hound Group
    "beagle",
    "dachshund",
    "basset hound",
    "bloodhound",
    "greyhound",
    "whippet",
    "afghan hound",
    "rhodesian ridgeback",
    "basenji",
    "coonhound",
    // Working Group
    "rottweiler",
    "boxer",
    "doberman pinscher",
    "great dane",
    "mastiff",
    "siberian husky",
    "alaskan malamute",
    "saint bernard",
    "bernese mountain dog",
    "newfoundland",
    "samoyed",
    "akita",
    "portuguese water dog",
    // Terrier Group
    "bull terrier",
    "staffordshire bull terrier",
    "american staffordshire terrier",
    "west highland white terrier",
    "scottish terrier",
    "jack russell terrier",
    "airedale terrier",
    "miniature schnauzer",
    "yorkshire terrier",
    "cairn terrier",
    // Toy Group
    "chihuahua",
    "pomeranian",
    "pug",
    "shih tzu",
    "maltese",
    "pekingese",
    "cavalier king charles spaniel",
    "papillon",
    "havanese",
    "toy poodle",
    // Non-Sporting Group
    "bulldog",
    "french bulldog",
    "poodle",
    "boston terrier",
    "bichon frise",
    "dalmatian",
    "chow chow",
    "shiba inu",
    "lhasa apso",
    "chinese shar-pei",
    // Herding Group
    "german shepherd",
    "australian shepherd",
    "border collie",
    "pembroke welsh corgi",
    "cardigan welsh corgi",
    "shetland sheepdog",
    "collie",
    "belgian malinois",
    "australian cattle dog",
    "old english sheepdog",
    // Common variations and mixed breeds
    "labrador",
    "lab",
    "golden",
    "german shepherd dog",
    "gsd",
    "pit bull",
    "pitbull",
    "husky",
    "corgi",
    "doodle",
    "goldendoodle",
    "labradoodle",
    "cockapoo",
    "schnoodle",
    "puggle",
    "mixed",
    "mixed breed",
    "mutt",
];

/// Normalization used for every case-insensitive comparison in the service
/// (species, status, breed).
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Check that a required field is present and, for strings, non-blank.
pub fn validate_required(value: Option<&Value>, field_name: &str) -> Option<String> {
    match value {
        None | Some(Value::Null) => Some(format!("{field_name} is required")),
        Some(Value::String(s)) if s.trim().is_empty() => {
            Some(format!("{field_name} is required"))
        }
        Some(_) => None,
    }
}

/// Check that a value is a string whose length is within `[min_length, max_length]`.
pub fn validate_string_length(
    value: &Value,
    field_name: &str,
    min_length: usize,
    max_length: usize,
) -> Option<String> {
    let Some(s) = value.as_str() else {
        return Some(format!("{field_name} must be a string"));
    };

    let len = s.chars().count();
    if len < min_length {
        return Some(format!(
            "{field_name} must be at least {min_length} characters"
        ));
    }
    if len > max_length {
        return Some(format!(
            "{field_name} must be at most {max_length} characters"
        ));
    }

    None
}

/// Check that an optional value is a non-negative number (or strictly
/// positive when `allow_zero` is false). Absent values pass.
pub fn validate_positive_number(
    value: Option<&Value>,
    field_name: &str,
    allow_zero: bool,
) -> Option<String> {
    let value = match value {
        None | Some(Value::Null) => return None,
        Some(v) => v,
    };

    let Some(num) = value.as_f64() else {
        return Some(format!("{field_name} must be a number"));
    };

    if allow_zero && num < 0.0 {
        return Some(format!("{field_name} must be a positive number"));
    }
    if !allow_zero && num <= 0.0 {
        return Some(format!("{field_name} must be greater than zero"));
    }

    None
}

/// Check membership in a fixed set of allowed values. String comparison is
/// case-insensitive; anything else is compared by equality (and therefore
/// never matches a string catalog). Absent values pass.
pub fn validate_enum_value(
    value: Option<&Value>,
    field_name: &str,
    allowed_values: &[&str],
) -> Option<String> {
    let value = match value {
        None | Some(Value::Null) => return None,
        Some(v) => v,
    };

    let ok = match value.as_str() {
        Some(s) => {
            let lower = s.to_lowercase();
            allowed_values.iter().any(|a| a.to_lowercase() == lower)
        }
        None => false,
    };

    if ok {
        None
    } else {
        Some(format!(
            "{field_name} must be one of: {}",
            allowed_values.join(", ")
        ))
    }
}

/// Check a breed against the catalog. Only applies when the species is
/// "dog" (case-insensitive); absent breeds and non-dog species pass.
pub fn validate_dog_breed(breed: Option<&str>, species: &str) -> Option<String> {
    let breed = breed?;

    if normalize(species) != "dog" {
        return None;
    }

    if DOG_BREEDS.contains(&normalize(breed).as_str()) {
        None
    } else {
        Some(format!("breed '{breed}' is not a recognized dog breed"))
    }
}
