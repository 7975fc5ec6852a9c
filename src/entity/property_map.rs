//! Property-name → field-key resolution.
//!
//! Each entity variant declares its own property pairs as a compile-time
//! constant; resolution merges them with the fixed reserved map below.
//! Reserved properties always win: a child entry that tries to redefine
//! `id` (or any other reserved name) is ignored.

use crate::entry::keys;

/// The fixed default map shared by every entity type. These properties are
/// always resolvable, with or without a child map.
pub const RESERVED_PROPERTIES: &[(&str, &str)] = &[
    ("id", keys::ID),
    ("form_id", keys::FORM_ID),
    ("created_by", keys::CREATED_BY),
    ("date_created", keys::DATE_CREATED),
    ("date_updated", keys::DATE_UPDATED),
    ("source_url", keys::SOURCE_URL),
    ("user_agent", keys::USER_AGENT),
    ("parent_entry", keys::PARENT_ENTRY_ID),
    ("parent_form", keys::PARENT_FORM_ID),
    ("nested_form_field", keys::NESTED_FORM_FIELD_ID),
];

/// Reserved metadata properties available on every entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaField {
    Id,
    FormId,
    CreatedBy,
    DateCreated,
    DateUpdated,
    SourceUrl,
    UserAgent,
    ParentEntry,
    ParentForm,
    NestedFormField,
}

impl MetaField {
    pub const ALL: &'static [Self] = &[
        Self::Id,
        Self::FormId,
        Self::CreatedBy,
        Self::DateCreated,
        Self::DateUpdated,
        Self::SourceUrl,
        Self::UserAgent,
        Self::ParentEntry,
        Self::ParentForm,
        Self::NestedFormField,
    ];

    /// Logical property name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::FormId => "form_id",
            Self::CreatedBy => "created_by",
            Self::DateCreated => "date_created",
            Self::DateUpdated => "date_updated",
            Self::SourceUrl => "source_url",
            Self::UserAgent => "user_agent",
            Self::ParentEntry => "parent_entry",
            Self::ParentForm => "parent_form",
            Self::NestedFormField => "nested_form_field",
        }
    }

    /// Record key the property resolves to.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Id => keys::ID,
            Self::FormId => keys::FORM_ID,
            Self::CreatedBy => keys::CREATED_BY,
            Self::DateCreated => keys::DATE_CREATED,
            Self::DateUpdated => keys::DATE_UPDATED,
            Self::SourceUrl => keys::SOURCE_URL,
            Self::UserAgent => keys::USER_AGENT,
            Self::ParentEntry => keys::PARENT_ENTRY_ID,
            Self::ParentForm => keys::PARENT_FORM_ID,
            Self::NestedFormField => keys::NESTED_FORM_FIELD_ID,
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.name() == name)
    }
}

/// Merged view over one entity type's property pairs and the reserved map.
///
/// Cheap to construct: it borrows the child table, which the
/// [`entity_fields!`](crate::entity_fields) macro emits as a `'static` constant,
/// so there is one table per entity type, built at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyMap {
    child: &'static [(&'static str, &'static str)],
}

impl PropertyMap {
    /// A map with no child entries; only reserved properties resolve.
    pub const EMPTY: Self = Self::new(&[]);

    #[must_use]
    pub const fn new(child: &'static [(&'static str, &'static str)]) -> Self {
        Self { child }
    }

    /// Resolve a property name to its record key.
    ///
    /// Reserved properties take precedence; a child entry shadowing a
    /// reserved name is ignored (logged at debug level).
    #[must_use]
    pub fn resolve(&self, property: &str) -> Option<&'static str> {
        if let Some(meta) = MetaField::from_name(property) {
            if self.child_lookup(property).is_some() {
                tracing::debug!(
                    property,
                    "child property map shadows a reserved property; reserved mapping wins"
                );
            }
            return Some(meta.key());
        }
        self.child_lookup(property)
    }

    #[must_use]
    pub fn contains(&self, property: &str) -> bool {
        self.resolve(property).is_some()
    }

    /// Whether `property` belongs to the fixed reserved map.
    #[must_use]
    pub fn is_reserved(property: &str) -> bool {
        MetaField::from_name(property).is_some()
    }

    /// Merged pairs: reserved first, then child entries that do not shadow a
    /// reserved name.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        RESERVED_PROPERTIES.iter().copied().chain(
            self.child
                .iter()
                .copied()
                .filter(|(name, _)| !Self::is_reserved(name)),
        )
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        false // the reserved map is always present
    }

    fn child_lookup(&self, property: &str) -> Option<&'static str> {
        self.child
            .iter()
            .find(|(name, _)| *name == property)
            .map(|(_, key)| *key)
    }
}

impl Default for PropertyMap {
    fn default() -> Self {
        Self::EMPTY
    }
}
