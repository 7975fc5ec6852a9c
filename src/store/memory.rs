//! In-memory reference store.
//!
//! Faithful to the hosted store's observable semantics: string-typed field
//! equality, active-status scoping, creation-date ranges, numeric id sort,
//! offset/page-size paging. Useful for tests and for embedding dependents'
//! test suites without a live backend.

use super::{FormsApi, StoreError};
use crate::entry::{keys, Entry, EntryId, FormId, Value};
use crate::repository::{Direction, Paging, SearchCriteria, Sorting};
use crate::utils::now_store_timestamp;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

struct Inner {
    entries: BTreeMap<EntryId, Entry>,
    next_id: EntryId,
}

/// Thread-safe in-memory implementation of [`FormsApi`].
pub struct MemoryFormsApi {
    inner: RwLock<Inner>,
}

impl Default for MemoryFormsApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFormsApi {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                entries: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Number of stored entries, regardless of form or status.
    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.entries.is_empty()
    }
}

#[async_trait]
impl FormsApi for MemoryFormsApi {
    async fn add_entry(&self, entry: &Entry) -> Result<EntryId, StoreError> {
        if entry.form_id().is_none() {
            return Err(StoreError::InvalidEntry(
                "entry is missing a form id".to_string(),
            ));
        }

        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id += 1;

        let mut stored = entry.clone();
        stored.set_id(id);
        if stored.get(keys::STATUS).is_none() {
            stored.set_status(crate::entry::EntryStatus::Active);
        }
        if stored.get(keys::DATE_CREATED).is_none() {
            stored.set(keys::DATE_CREATED, now_store_timestamp());
        }
        inner.entries.insert(id, stored);
        Ok(id)
    }

    async fn update_entry(&self, entry: &Entry) -> Result<(), StoreError> {
        let Some(id) = entry.id() else {
            return Err(StoreError::InvalidEntry(
                "entry is missing an id".to_string(),
            ));
        };

        let mut inner = self.inner.write().await;
        if !inner.entries.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        let mut stored = entry.clone();
        stored.set(keys::DATE_UPDATED, now_store_timestamp());
        inner.entries.insert(id, stored);
        Ok(())
    }

    async fn delete_entry(&self, entry_id: EntryId) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner.entries.remove(&entry_id).is_none() {
            return Err(StoreError::NotFound(entry_id));
        }
        Ok(())
    }

    async fn get_entries(
        &self,
        form_id: FormId,
        criteria: &SearchCriteria,
        sorting: &Sorting,
        paging: &Paging,
    ) -> Result<Vec<Entry>, StoreError> {
        let inner = self.inner.read().await;
        let mut matched: Vec<Entry> = inner
            .entries
            .values()
            .filter(|entry| entry.form_id() == Some(form_id) && matches(entry, criteria))
            .cloned()
            .collect();

        sort_entries(&mut matched, sorting);

        let offset = usize::try_from(paging.offset).unwrap_or(usize::MAX);
        let page_size = usize::try_from(paging.page_size).unwrap_or(usize::MAX);
        Ok(matched.into_iter().skip(offset).take(page_size).collect())
    }

    async fn count_entries(
        &self,
        form_id: FormId,
        criteria: &SearchCriteria,
    ) -> Result<u64, StoreError> {
        let inner = self.inner.read().await;
        let count = inner
            .entries
            .values()
            .filter(|entry| entry.form_id() == Some(form_id) && matches(entry, criteria))
            .count();
        Ok(count as u64)
    }
}

fn matches(entry: &Entry, criteria: &SearchCriteria) -> bool {
    if entry.status() != criteria.status {
        return false;
    }

    for filter in &criteria.field_filters {
        let Some(value) = entry.get(&filter.key) else {
            return false;
        };
        if scalar_repr(value) != scalar_repr(&filter.value) {
            return false;
        }
    }

    if criteria.start_date.is_some() || criteria.end_date.is_some() {
        let Some(created) = entry.get(keys::DATE_CREATED).and_then(date_part) else {
            return false;
        };
        if criteria.start_date.is_some_and(|start| created < start) {
            return false;
        }
        if criteria.end_date.is_some_and(|end| created > end) {
            return false;
        }
    }

    true
}

fn sort_entries(entries: &mut [Entry], sorting: &Sorting) {
    if sorting.key == keys::ID && sorting.is_numeric {
        entries.sort_by_key(|e| e.id().unwrap_or(0));
    } else {
        let key = sorting.key.clone();
        entries.sort_by_key(|e| e.get(&key).map(scalar_repr).unwrap_or_default());
    }
    if sorting.direction == Direction::Desc {
        entries.reverse();
    }
}

/// The hosted store compares field values as strings; mirror that here so
/// numeric filters match string-typed records and vice versa.
fn scalar_repr(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Date part of a store timestamp ("2024-03-15 10:22:01" or bare date).
fn date_part(value: &Value) -> Option<NaiveDate> {
    let s = value.as_str()?;
    let date = s.split_whitespace().next()?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}
