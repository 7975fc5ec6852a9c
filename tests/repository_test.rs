//! End-to-end repository tests against the in-memory store.

use async_trait::async_trait;
use chrono::NaiveDate;
use formcore::{
    Direction, Entity, Entry, EntryId, Filter, FixedSession, FormsApi, MemoryFormsApi, Paging,
    Repository, RepositoryError, SearchCriteria, Sorting, StoreError, Value,
};
use std::sync::Arc;

formcore::entity_fields! {
    pub enum OrderField {
        CustomerName("customer_name") => "1.3",
        Total("total") => "5",
        Status("order_status") => "7",
    }
}

#[derive(Debug)]
struct Order {
    entry: Entry,
}

impl Entity for Order {
    type Field = OrderField;

    fn from_entry(entry: Entry) -> Self {
        Self { entry }
    }

    fn entry(&self) -> &Entry {
        &self.entry
    }

    fn entry_mut(&mut self) -> &mut Entry {
        &mut self.entry
    }
}

impl Order {
    fn new() -> Self {
        Self::from_entry(Entry::new())
    }
}

const ORDERS_FORM: u64 = 12;

fn repo(api: Arc<MemoryFormsApi>) -> Repository<Order> {
    Repository::new(api, ORDERS_FORM)
}

async fn seed_order(repo: &Repository<Order>, customer: &str, status: &str) -> EntryId {
    let mut order = Order::new();
    order.set_field(OrderField::CustomerName, customer);
    order.set_field(OrderField::Status, status);
    repo.add(&mut order).await.unwrap()
}

#[tokio::test]
async fn test_add_assigns_id_and_stamps_form_id() {
    let api = Arc::new(MemoryFormsApi::new());
    let repo = repo(api);

    let mut order = Order::new();
    order.set_field(OrderField::CustomerName, "Ada");
    let id = repo.add(&mut order).await.unwrap();

    assert_eq!(order.id(), Some(id));
    assert_eq!(order.entry().form_id(), Some(ORDERS_FORM));
}

#[tokio::test]
async fn test_add_rejects_entity_with_id() {
    let api = Arc::new(MemoryFormsApi::new());
    let repo = repo(api);

    let mut order = Order::new();
    order.entry_mut().set_id(44);
    let err = repo.add(&mut order).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Validation(_)));
}

#[tokio::test]
async fn test_get_one_by_id_roundtrip() {
    let api = Arc::new(MemoryFormsApi::new());
    let repo = repo(api);
    let id = seed_order(&repo, "Ada", "open").await;

    let found = repo.get_one_by_id(id).await.unwrap().unwrap();
    assert_eq!(
        found.get_field(OrderField::CustomerName),
        Some(&Value::from("Ada"))
    );
}

#[tokio::test]
async fn test_get_one_empty_result_is_none() {
    let api = Arc::new(MemoryFormsApi::new());
    let repo = repo(api);

    let found = repo.get_one(&Filter::new()).await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_get_one_returns_first_in_store_order() {
    let api = Arc::new(MemoryFormsApi::new());
    let repo = repo(api);
    let first = seed_order(&repo, "Ada", "open").await;
    seed_order(&repo, "Grace", "open").await;
    seed_order(&repo, "Edsger", "open").await;

    let found = repo
        .get_one(&Filter::new().eq_field(OrderField::Status, "open"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id(), Some(first));
}

#[tokio::test]
async fn test_update_persists_changes() {
    let api = Arc::new(MemoryFormsApi::new());
    let repo = repo(api);
    let id = seed_order(&repo, "Ada", "open").await;

    let mut order = repo.get_one_by_id(id).await.unwrap().unwrap();
    order.set_field(OrderField::Status, "shipped");
    repo.update(&order).await.unwrap();

    let reloaded = repo.get_one_by_id(id).await.unwrap().unwrap();
    assert_eq!(
        reloaded.get_field(OrderField::Status),
        Some(&Value::from("shipped"))
    );
}

#[tokio::test]
async fn test_update_without_id_is_validation_error() {
    let api = Arc::new(MemoryFormsApi::new());
    let repo = repo(api);

    let err = repo.update(&Order::new()).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Validation(_)));
}

#[tokio::test]
async fn test_delete_then_lookup_is_none() {
    let api = Arc::new(MemoryFormsApi::new());
    let repo = repo(api);
    let id = seed_order(&repo, "Ada", "open").await;

    repo.delete(id).await.unwrap();
    assert!(repo.get_one_by_id(id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_missing_is_not_found() {
    let api = Arc::new(MemoryFormsApi::new());
    let repo = repo(api);

    let err = repo.delete(999).await.unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound(999)));
}

#[tokio::test]
async fn test_get_all_filters_and_sorts() {
    let api = Arc::new(MemoryFormsApi::new());
    let repo = repo(api);
    let a = seed_order(&repo, "Ada", "open").await;
    seed_order(&repo, "Grace", "shipped").await;
    let c = seed_order(&repo, "Edsger", "open").await;

    let open = repo
        .get_all(
            &Filter::new().eq_field(OrderField::Status, "open"),
            Direction::Desc,
        )
        .await
        .unwrap();
    let ids: Vec<_> = open.iter().map(|o| o.id().unwrap()).collect();
    assert_eq!(ids, vec![c, a]);
}

#[tokio::test]
async fn test_get_all_between_bounds_results() {
    let api = Arc::new(MemoryFormsApi::new());
    let repo = repo(api.clone());

    for date in ["2024-02-20 08:00:00", "2024-03-05 12:00:00", "2024-04-01 09:30:00"] {
        let mut order = Order::new();
        order.entry_mut().set("date_created", date);
        repo.add(&mut order).await.unwrap();
    }

    let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 3, 22).unwrap();
    let march = repo
        .get_all_between(start, end, &Filter::new(), Direction::Asc)
        .await
        .unwrap();
    assert_eq!(march.len(), 1);
    assert_eq!(march[0].id(), Some(2));
}

#[tokio::test]
async fn test_get_all_between_rejects_inverted_range() {
    let api = Arc::new(MemoryFormsApi::new());
    let repo = repo(api);

    let start = NaiveDate::from_ymd_opt(2024, 3, 22).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let err = repo
        .get_all_between(start, end, &Filter::new(), Direction::Asc)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Validation(_)));
}

#[tokio::test]
async fn test_count_matches_get_all() {
    let api = Arc::new(MemoryFormsApi::new());
    let repo = repo(api);
    seed_order(&repo, "Ada", "open").await;
    seed_order(&repo, "Grace", "open").await;
    seed_order(&repo, "Edsger", "shipped").await;

    let filter = Filter::new().eq_field(OrderField::Status, "open");
    let all = repo.get_all(&filter, Direction::Asc).await.unwrap();
    let count = repo.count(&filter).await.unwrap();
    assert_eq!(count, all.len() as u64);
    assert_eq!(count, 2);
}

#[tokio::test]
async fn test_get_one_for_user_and_current_user() {
    let api = Arc::new(MemoryFormsApi::new());
    let repo = repo(api);

    let mut order = Order::new();
    order.entry_mut().set("created_by", 42);
    repo.add(&mut order).await.unwrap();

    let found = repo.get_one_for_user(42).await.unwrap();
    assert!(found.is_some());
    assert!(repo.get_one_for_user(7).await.unwrap().is_none());

    let session = FixedSession::user(42);
    assert!(repo.get_one_for_current_user(&session).await.unwrap().is_some());
    let anonymous = FixedSession::anonymous();
    assert!(repo
        .get_one_for_current_user(&anonymous)
        .await
        .unwrap()
        .is_none());
}

/// Store stub whose every operation fails, for error-propagation tests.
struct UnavailableApi;

#[async_trait]
impl FormsApi for UnavailableApi {
    async fn add_entry(&self, _entry: &Entry) -> Result<EntryId, StoreError> {
        Err(StoreError::Backend("store offline".to_string()))
    }

    async fn update_entry(&self, _entry: &Entry) -> Result<(), StoreError> {
        Err(StoreError::Backend("store offline".to_string()))
    }

    async fn delete_entry(&self, _entry_id: EntryId) -> Result<(), StoreError> {
        Err(StoreError::Backend("store offline".to_string()))
    }

    async fn get_entries(
        &self,
        _form_id: u64,
        _criteria: &SearchCriteria,
        _sorting: &Sorting,
        _paging: &Paging,
    ) -> Result<Vec<Entry>, StoreError> {
        Err(StoreError::Backend("store offline".to_string()))
    }

    async fn count_entries(
        &self,
        _form_id: u64,
        _criteria: &SearchCriteria,
    ) -> Result<u64, StoreError> {
        Err(StoreError::Backend("store offline".to_string()))
    }
}

#[tokio::test]
async fn test_backend_failure_propagates_not_empty() {
    let repo: Repository<Order> = Repository::new(Arc::new(UnavailableApi), ORDERS_FORM);

    // A failing backend is an error, never an empty result set.
    let err = repo.get_all(&Filter::new(), Direction::Asc).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Backend(_)));

    let err = repo.get_one(&Filter::new()).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Backend(_)));

    let err = repo.count(&Filter::new()).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Backend(_)));
}

#[tokio::test]
async fn test_hydration_is_lazy_for_malformed_records() {
    let api = Arc::new(MemoryFormsApi::new());
    let repo = repo(api);

    let mut order = Order::new();
    order.entry_mut().set("5", "not-a-number");
    let id = repo.add(&mut order).await.unwrap();

    // Hydration itself never fails; the odd value is simply visible.
    let loaded = repo.get_one_by_id(id).await.unwrap().unwrap();
    assert_eq!(
        loaded.get_field(OrderField::Total),
        Some(&Value::from("not-a-number"))
    );
}
