//! Query criteria: the filter builder and the wire shapes the external store
//! understands.

use crate::entity::EntityField;
use crate::entry::{EntryStatus, FieldKey, Value};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sort direction for query results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

/// One equality clause in the store's query format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldFilter {
    pub key: FieldKey,
    pub value: Value,
}

/// The store's search-criteria shape.
///
/// Equality clauses go into `field_filters`; date bounds are separate range
/// keys, never equality clauses. Every criteria is scoped to active-status
/// records: trashed entries are invisible by design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub status: EntryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub field_filters: Vec<FieldFilter>,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            status: EntryStatus::Active,
            start_date: None,
            end_date: None,
            field_filters: Vec::new(),
        }
    }
}

/// The store's sort shape. Repositories always sort by numeric entry id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sorting {
    pub key: FieldKey,
    pub direction: Direction,
    pub is_numeric: bool,
}

impl Sorting {
    /// Numeric id sort in the given direction.
    #[must_use]
    pub fn by_id(direction: Direction) -> Self {
        Self {
            key: crate::entry::keys::ID.to_string(),
            direction,
            is_numeric: true,
        }
    }
}

/// The store's paging shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    pub offset: u64,
    pub page_size: u64,
}

impl Paging {
    /// "Unpaged" fetch. The store has no true unpaged mode, so all is
    /// simulated with a maximal page size.
    pub const ALL: Self = Self {
        offset: 0,
        page_size: u64::MAX,
    };

    /// First result only.
    pub const ONE: Self = Self {
        offset: 0,
        page_size: 1,
    };

    #[must_use]
    pub const fn new(offset: u64, page_size: u64) -> Self {
        Self { offset, page_size }
    }
}

/// Equality and date-range predicates, built caller-side and translated into
/// [`SearchCriteria`] when a query is issued.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    fields: Vec<(FieldKey, Value)>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

impl Filter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `key == value`.
    #[must_use]
    pub fn eq(mut self, key: impl Into<FieldKey>, value: impl Into<Value>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }

    /// Require equality against a typed entity field. The field's record key
    /// is resolved at compile time.
    #[must_use]
    pub fn eq_field<F: EntityField>(self, field: F, value: impl Into<Value>) -> Self {
        self.eq(field.key(), value)
    }

    /// Bound results to `start..=end` on the entry creation date.
    #[must_use]
    pub fn between(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    #[must_use]
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    #[must_use]
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.start_date.is_none() && self.end_date.is_none()
    }

    /// Translate into the store's criteria shape.
    #[must_use]
    pub fn criteria(&self) -> SearchCriteria {
        SearchCriteria {
            status: EntryStatus::Active,
            start_date: self.start_date,
            end_date: self.end_date,
            field_filters: self
                .fields
                .iter()
                .map(|(key, value)| FieldFilter {
                    key: key.clone(),
                    value: value.clone(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_equality_criteria_shape() {
        let criteria = Filter::new().eq("created_by", 42).eq("7", "yes").criteria();
        let wire = serde_json::to_value(&criteria).unwrap();
        assert_eq!(
            wire,
            json!({
                "status": "active",
                "field_filters": [
                    {"key": "created_by", "value": 42},
                    {"key": "7", "value": "yes"},
                ],
            })
        );
    }

    #[test]
    fn test_date_range_criteria_has_no_field_filters_key() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 22).unwrap();
        let criteria = Filter::new().between(start, end).criteria();
        let wire = serde_json::to_value(&criteria).unwrap();
        assert_eq!(
            wire,
            json!({
                "status": "active",
                "start_date": "2024-03-01",
                "end_date": "2024-03-22",
            })
        );
    }

    #[test]
    fn test_range_and_equality_combine() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 22).unwrap();
        let criteria = Filter::new().eq("created_by", 7).between(start, end).criteria();
        let wire = serde_json::to_value(&criteria).unwrap();
        assert_eq!(
            wire,
            json!({
                "status": "active",
                "start_date": "2024-03-01",
                "end_date": "2024-03-22",
                "field_filters": [{"key": "created_by", "value": 7}],
            })
        );
    }

    #[test]
    fn test_empty_filter_criteria_is_status_only() {
        let wire = serde_json::to_value(Filter::new().criteria()).unwrap();
        assert_eq!(wire, json!({"status": "active"}));
    }

    #[test]
    fn test_sorting_shape() {
        let wire = serde_json::to_value(Sorting::by_id(Direction::Desc)).unwrap();
        assert_eq!(
            wire,
            json!({"key": "id", "direction": "DESC", "is_numeric": true})
        );
    }

    #[test]
    fn test_paging_shape() {
        let wire = serde_json::to_value(Paging::new(40, 20)).unwrap();
        assert_eq!(wire, json!({"offset": 40, "page_size": 20}));
        assert_eq!(Paging::ALL.offset, 0);
        assert_eq!(Paging::ALL.page_size, u64::MAX);
    }

    #[test]
    fn test_eq_field_resolves_typed_key() {
        crate::entity_fields! {
            pub enum NoteField {
                Body("body") => "4",
            }
        }

        let criteria = Filter::new().eq_field(NoteField::Body, "hello").criteria();
        assert_eq!(criteria.field_filters[0].key, "4");
    }
}
