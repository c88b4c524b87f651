pub mod audit;
pub mod pet;
pub mod rest;
pub mod store;
pub mod validators;

pub use audit::ApiAuditLogger;
pub use pet::{NewPet, ParseStatusError, Pet, PetError, PetRepr, PetStatus};
pub use rest::{AppState, create_router};
pub use store::{Envelope, EnvelopeError, ErrorCode, PetStore};
