//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two usernames
/// spelled the same are the same username, two normalized paths with the same
/// segments are the same path. To "modify" one, build a new one.
///
/// The trait requires:
/// - **Clone**: values are passed around freely between request stages
/// - **PartialEq**: comparison is by attribute values
/// - **Debug**: values show up in tracing fields and test failures
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
