//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**. They are defined entirely by their
//! attribute values, so two value objects with the same values are equal.

/// Marker trait for value objects.
///
/// ## Value Object vs Entity
///
/// - **Value Object**: no identity (`Terms { value: 100.0, currency: "USD", .. }`)
/// - **Entity**: has identity (`Contract { id: ContractId("C-1"), .. }`)
///
/// Value objects embedded in an entity are persisted together with it (for
/// example as an embedded JSON document in the entity's row), never on their own.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct Money {
///     amount: f64,
///     currency: String,
/// }
///
/// impl ValueObject for Money {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

/// An ordered list of value objects is compared element-wise, so it is one too.
impl<T: ValueObject> ValueObject for Vec<T> {}
