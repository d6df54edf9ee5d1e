//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable**, **self-validating** and **compared by value**.
/// The only way to obtain one is through its validating constructor, so an
/// invalid instance can never exist. To "modify" a value object, derive a new one.
///
/// ```ignore
/// let a = Money::of("10.5")?;
/// let b = Money::of("10.50")?;
/// assert_eq!(a, b);
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
