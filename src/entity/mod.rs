//! Typed entity views over form entries.
//!
//! An entity wraps one [`Entry`] and projects named properties onto record
//! keys through a per-type property map. Mapped access is compile-time
//! checked through the entity's field enum; a by-name path exists for filter
//! building and host interop.

mod macros;
mod property_map;

pub use property_map::{MetaField, PropertyMap, RESERVED_PROPERTIES};

use crate::entry::{Entry, EntryId, Value};
use thiserror::Error;

/// Errors from by-name property access.
#[derive(Debug, Error)]
pub enum EntityError {
    #[error("Cannot set unknown property: {property}")]
    UnknownProperty { property: String },
}

/// One entity variant's fields: a fixed enum carrying the property table as a
/// compile-time constant. Implemented by [`entity_fields!`](crate::entity_fields).
pub trait EntityField: Copy + Eq + 'static {
    /// Every field of the variant.
    const ALL: &'static [Self];
    /// `(property name, record key)` pairs, one per field, in declaration order.
    const PAIRS: &'static [(&'static str, &'static str)];

    /// Logical property name ("first_name").
    fn name(self) -> &'static str;

    /// Record key the field maps to ("1.3").
    fn key(self) -> &'static str;

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }
}

/// A typed view over one form entry.
///
/// Implementors hold an [`Entry`] and declare their field enum; everything
/// else is provided. Construction never validates: a malformed record
/// surfaces only when a mapped property is read.
pub trait Entity: Sized {
    type Field: EntityField;

    /// Wrap a raw record. An empty entry represents a "new" entity that has
    /// not been persisted yet.
    fn from_entry(entry: Entry) -> Self;

    fn entry(&self) -> &Entry;

    fn entry_mut(&mut self) -> &mut Entry;

    /// The merged property map for this entity type (child pairs plus the
    /// reserved defaults).
    #[must_use]
    fn property_map() -> PropertyMap {
        PropertyMap::new(Self::Field::PAIRS)
    }

    /// Resolve a property name to its record key without an instance.
    ///
    /// Used for building query filters against a property rather than a raw
    /// field key.
    #[must_use]
    fn field_key(property: &str) -> Option<&'static str> {
        Self::property_map().resolve(property)
    }

    /// Typed read; resolution cannot fail. `None` means the key is unset in
    /// the record.
    #[must_use]
    fn get_field(&self, field: Self::Field) -> Option<&Value> {
        self.entry().get(field.key())
    }

    /// Typed write.
    fn set_field(&mut self, field: Self::Field, value: impl Into<Value>) {
        self.entry_mut().set(field.key(), value);
    }

    /// By-name read. Returns `None` for an unmapped property or an unset
    /// key; never fails.
    #[must_use]
    fn get(&self, property: &str) -> Option<&Value> {
        Self::field_key(property).and_then(|key| self.entry().get(key))
    }

    /// By-name write. Fails with [`EntityError::UnknownProperty`] when the
    /// property is not in the merged map.
    fn set(&mut self, property: &str, value: impl Into<Value>) -> Result<(), EntityError> {
        match Self::field_key(property) {
            Some(key) => {
                self.entry_mut().set(key, value);
                Ok(())
            }
            None => Err(EntityError::UnknownProperty {
                property: property.to_string(),
            }),
        }
    }

    /// Read a reserved metadata property (always resolvable).
    #[must_use]
    fn meta(&self, field: MetaField) -> Option<&Value> {
        self.entry().get(field.key())
    }

    /// Write a reserved metadata property.
    fn set_meta(&mut self, field: MetaField, value: impl Into<Value>) {
        self.entry_mut().set(field.key(), value);
    }

    /// The persisted entry id, if any.
    #[must_use]
    fn id(&self) -> Option<EntryId> {
        self.entry().id()
    }
}
