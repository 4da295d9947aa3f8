//! `gatehouse-core` — shared value objects.
//!
//! This crate contains **pure** primitives (no transport or storage concerns).

pub mod error;
pub mod path;
pub mod username;
pub mod value_object;

pub use error::DomainError;
pub use path::RequestPath;
pub use username::Username;
pub use value_object::ValueObject;
