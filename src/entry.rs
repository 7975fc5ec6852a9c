//! The raw form-entry record: a flat key-value map owned by the external store.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use serde_json::Value;

/// Numeric identifier of a single entry.
pub type EntryId = u64;
/// Numeric identifier of a form (one external record collection).
pub type FormId = u64;
/// Numeric identifier of a host user account.
pub type UserId = u64;
/// Key of one field inside an entry ("1.3", "id", "created_by", ...).
pub type FieldKey = String;

/// Well-known field keys present on every entry.
pub mod keys {
    pub const ID: &str = "id";
    pub const FORM_ID: &str = "form_id";
    pub const CREATED_BY: &str = "created_by";
    pub const DATE_CREATED: &str = "date_created";
    pub const DATE_UPDATED: &str = "date_updated";
    pub const SOURCE_URL: &str = "source_url";
    pub const USER_AGENT: &str = "user_agent";
    pub const STATUS: &str = "status";
    pub const PARENT_ENTRY_ID: &str = "parent_entry_id";
    pub const PARENT_FORM_ID: &str = "parent_form_id";
    pub const NESTED_FORM_FIELD_ID: &str = "nested_form_field_id";
}

/// Lifecycle status of an entry. Queries are scoped to [`EntryStatus::Active`];
/// trashed entries are invisible to repositories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    #[default]
    Active,
    Trash,
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryStatus::Active => write!(f, "active"),
            EntryStatus::Trash => write!(f, "trash"),
        }
    }
}

impl std::str::FromStr for EntryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(EntryStatus::Active),
            "trash" => Ok(EntryStatus::Trash),
            _ => Err(format!("Unknown entry status: {s}")),
        }
    }
}

/// One external form submission: an ordered map from field key to scalar value.
///
/// The store owns the schema; an `Entry` makes no assumptions about which keys
/// are present. Typed access happens one level up, through
/// [`Entity`](crate::entity::Entity).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entry {
    fields: BTreeMap<FieldKey, Value>,
}

impl Entry {
    /// Create an empty entry (a "new" record not yet persisted).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Value stored at `key`, or `None` if the key is unset.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Store `value` at `key`, replacing any previous value.
    pub fn set(&mut self, key: impl Into<FieldKey>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Remove `key`, returning its previous value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &Value)> {
        self.fields.iter()
    }

    /// The entry id, if the record has been persisted.
    ///
    /// The store reports ids as numbers or numeric strings; both parse.
    #[must_use]
    pub fn id(&self) -> Option<EntryId> {
        self.get(keys::ID).and_then(value_as_u64)
    }

    pub fn set_id(&mut self, id: EntryId) {
        self.set(keys::ID, id);
    }

    #[must_use]
    pub fn form_id(&self) -> Option<FormId> {
        self.get(keys::FORM_ID).and_then(value_as_u64)
    }

    pub fn set_form_id(&mut self, form_id: FormId) {
        self.set(keys::FORM_ID, form_id);
    }

    #[must_use]
    pub fn created_by(&self) -> Option<UserId> {
        self.get(keys::CREATED_BY).and_then(value_as_u64)
    }

    /// Entry status; unset is treated as active, matching the store.
    #[must_use]
    pub fn status(&self) -> EntryStatus {
        self.get(keys::STATUS)
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    pub fn set_status(&mut self, status: EntryStatus) {
        self.set(keys::STATUS, status.to_string());
    }
}

impl FromIterator<(FieldKey, Value)> for Entry {
    fn from_iter<I: IntoIterator<Item = (FieldKey, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Parse a scalar as a u64, accepting numbers and numeric strings.
pub(crate) fn value_as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
