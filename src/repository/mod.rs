//! Generic data access over one external form.
//!
//! A [`Repository`] binds one entity type to one form id and translates
//! filters into the store's query format. Every operation is a stateless
//! round-trip against the store; results are hydrated through the entity's
//! [`from_entry`](crate::entity::Entity::from_entry) constructor without
//! validation.

mod criteria;
mod error;

pub use criteria::{Direction, FieldFilter, Filter, Paging, SearchCriteria, Sorting};
pub use error::RepositoryError;

use crate::entity::Entity;
use crate::entry::{EntryId, FormId, UserId};
use crate::session::Session;
use crate::store::FormsApi;
use chrono::NaiveDate;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// CRUD and query façade bound to one entity type and one form.
///
/// The binding is static configuration: construct one repository per entity
/// variant and share it. Concurrent updates to the same entry are a
/// lost-update hazard inherited from the store; nothing here mitigates it.
pub struct Repository<E: Entity> {
    api: Arc<dyn FormsApi>,
    form_id: FormId,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            form_id: self.form_id,
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Repository<E> {
    #[must_use]
    pub fn new(api: Arc<dyn FormsApi>, form_id: FormId) -> Self {
        Self {
            api,
            form_id,
            _entity: PhantomData,
        }
    }

    /// The bound form id.
    #[must_use]
    pub fn form_id(&self) -> FormId {
        self.form_id
    }

    /// Persist a new entity, returning the id assigned by the store.
    ///
    /// Stamps the bound form id into the record and writes the new id back
    /// into the entity. An entity that already carries an id is rejected.
    pub async fn add(&self, entity: &mut E) -> Result<EntryId, RepositoryError> {
        if let Some(id) = entity.entry().id() {
            return Err(RepositoryError::validation(format!(
                "entity already has id {id}; use update"
            )));
        }
        entity.entry_mut().set_form_id(self.form_id);
        let id = self.api.add_entry(entity.entry()).await?;
        entity.entry_mut().set_id(id);
        debug!(form_id = self.form_id, entry_id = id, "added entry");
        Ok(id)
    }

    /// Persist the entity's entire record over the stored one.
    pub async fn update(&self, entity: &E) -> Result<(), RepositoryError> {
        let Some(id) = entity.entry().id() else {
            return Err(RepositoryError::validation(
                "cannot update an entity without an id",
            ));
        };
        self.api.update_entry(entity.entry()).await?;
        debug!(form_id = self.form_id, entry_id = id, "updated entry");
        Ok(())
    }

    /// Delete an entry by id. Forwards the store's outcome; no retry.
    pub async fn delete(&self, id: EntryId) -> Result<(), RepositoryError> {
        self.api.delete_entry(id).await?;
        debug!(form_id = self.form_id, entry_id = id, "deleted entry");
        Ok(())
    }

    /// First entry matching the filter, in ascending id order, or `None`.
    pub async fn get_one(&self, filter: &Filter) -> Result<Option<E>, RepositoryError> {
        let mut entries = self.get(filter, Direction::Asc, Paging::ONE).await?;
        Ok(if entries.is_empty() {
            None
        } else {
            Some(entries.remove(0))
        })
    }

    /// First entry whose id matches.
    pub async fn get_one_by_id(&self, id: EntryId) -> Result<Option<E>, RepositoryError> {
        self.get_one(&Filter::new().eq(crate::entry::keys::ID, id))
            .await
    }

    /// First entry created by the given user.
    pub async fn get_one_for_user(&self, user_id: UserId) -> Result<Option<E>, RepositoryError> {
        self.get_one(&Filter::new().eq(crate::entry::keys::CREATED_BY, user_id))
            .await
    }

    /// First entry created by the session's acting user. A session without a
    /// user resolves to no match.
    pub async fn get_one_for_current_user(
        &self,
        session: &dyn Session,
    ) -> Result<Option<E>, RepositoryError> {
        match session.current_user_id() {
            Some(user_id) => self.get_one_for_user(user_id).await,
            None => Ok(None),
        }
    }

    /// All entries matching the filter, sorted by id in `direction`.
    pub async fn get_all(
        &self,
        filter: &Filter,
        direction: Direction,
    ) -> Result<Vec<E>, RepositoryError> {
        self.get(filter, direction, Paging::ALL).await
    }

    /// All entries created between `start` and `end` (inclusive) that match
    /// the filter.
    pub async fn get_all_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        filter: &Filter,
        direction: Direction,
    ) -> Result<Vec<E>, RepositoryError> {
        if start > end {
            return Err(RepositoryError::validation(format!(
                "start date {start} is after end date {end}"
            )));
        }
        let bounded = filter.clone().between(start, end);
        self.get_all(&bounded, direction).await
    }

    /// Number of entries matching the filter, using the same criteria shape
    /// as the fetch operations.
    pub async fn count(&self, filter: &Filter) -> Result<u64, RepositoryError> {
        Ok(self
            .api
            .count_entries(self.form_id, &filter.criteria())
            .await?)
    }

    /// Query primitive shared by the fetch operations: translate the filter,
    /// round-trip to the store, hydrate each raw record into `E`.
    async fn get(
        &self,
        filter: &Filter,
        direction: Direction,
        paging: Paging,
    ) -> Result<Vec<E>, RepositoryError> {
        let criteria = filter.criteria();
        let sorting = Sorting::by_id(direction);
        let entries = self
            .api
            .get_entries(self.form_id, &criteria, &sorting, &paging)
            .await?;
        Ok(entries.into_iter().map(E::from_entry).collect())
    }
}
