//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. A set of
/// tax identifiers is the canonical example here: two sets holding the same taxes
/// are the same set, whatever order they were collected in.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
