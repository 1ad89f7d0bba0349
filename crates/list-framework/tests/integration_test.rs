use async_trait::async_trait;
use list_framework::mock::{create_mock_endpoint, expect_list, MockEndpoint};
use list_framework::{
    CollectionEndpoint, EndpointError, FetchOutcome, FilterConfig, FilterController, FilterCriteria, ResourceItem,
    ResourceList, StoreActor, StoreError,
};
use std::time::Duration;

// --- Test Entity ---

#[derive(Clone, Debug, PartialEq)]
struct Row {
    id: u32,
    name: String,
}

#[derive(Debug)]
#[allow(dead_code)]
struct RowCreate {
    name: String,
}

#[derive(Debug)]
#[allow(dead_code)]
struct RowUpdate {
    name: String,
}

impl ResourceItem for Row {
    type Id = u32;
    type Create = RowCreate;
    type Update = RowUpdate;
    type Query = String;

    fn id(&self) -> &u32 {
        &self.id
    }
}

fn row(id: u32, name: &str) -> Row {
    Row {
        id,
        name: name.into(),
    }
}

fn rows(n: u32) -> Vec<Row> {
    (1..=n).map(|id| row(id, &format!("row {id}"))).collect()
}

// --- Fetch sequencing ---

#[tokio::test]
async fn test_late_response_of_older_fetch_is_discarded() {
    let (endpoint, mut requests) = create_mock_endpoint::<Row>(8);
    let (actor, client) = StoreActor::new(8);
    tokio::spawn(actor.run(endpoint));

    let fetch_a = client.begin_fetch("a".into()).await.unwrap();
    let (query_a, answer_a) = expect_list(&mut requests).await.unwrap();
    assert_eq!(query_a, "a");

    let fetch_b = client.begin_fetch("b".into()).await.unwrap();
    let (query_b, answer_b) = expect_list(&mut requests).await.unwrap();
    assert_eq!(query_b, "b");

    // B resolves first, then A.
    answer_b.send(Ok(vec![row(2, "bravo")])).unwrap();
    assert_eq!(
        fetch_b.outcome().await.unwrap(),
        FetchOutcome::Applied { count: 1 }
    );

    answer_a
        .send(Ok(vec![row(1, "alpha"), row(3, "charlie")]))
        .unwrap();
    assert_eq!(fetch_a.outcome().await.unwrap(), FetchOutcome::Superseded);

    let state = client.state();
    assert_eq!(state.items, vec![row(2, "bravo")]);
    assert!(!state.loading);
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn test_stale_failure_does_not_touch_state() {
    let (endpoint, mut requests) = create_mock_endpoint::<Row>(8);
    let (actor, client) = StoreActor::new(8);
    tokio::spawn(actor.run(endpoint));

    let fetch_a = client.begin_fetch("a".into()).await.unwrap();
    let (_, answer_a) = expect_list(&mut requests).await.unwrap();
    let fetch_b = client.begin_fetch("b".into()).await.unwrap();
    let (_, answer_b) = expect_list(&mut requests).await.unwrap();

    answer_b.send(Ok(rows(2))).unwrap();
    fetch_b.outcome().await.unwrap();

    answer_a.send(Err(EndpointError::Timeout)).unwrap();
    assert_eq!(fetch_a.outcome().await.unwrap(), FetchOutcome::Superseded);

    let state = client.state();
    assert_eq!(state.items, rows(2));
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn test_loading_stays_set_until_latest_fetch_completes() {
    let (endpoint, mut requests) = create_mock_endpoint::<Row>(8);
    let (actor, client) = StoreActor::new(8);
    tokio::spawn(actor.run(endpoint));

    let fetch_a = client.begin_fetch("a".into()).await.unwrap();
    let (_, answer_a) = expect_list(&mut requests).await.unwrap();
    let fetch_b = client.begin_fetch("b".into()).await.unwrap();
    let (_, answer_b) = expect_list(&mut requests).await.unwrap();

    answer_a.send(Ok(rows(5))).unwrap();
    assert_eq!(fetch_a.outcome().await.unwrap(), FetchOutcome::Superseded);
    assert!(client.state().loading);
    assert!(client.state().items.is_empty());

    answer_b.send(Ok(rows(1))).unwrap();
    fetch_b.outcome().await.unwrap();
    assert!(!client.state().loading);
}

#[tokio::test]
async fn test_fetch_timeout_sets_error_and_keeps_items() {
    let (endpoint, mut requests) = create_mock_endpoint::<Row>(8);
    let (actor, client) = StoreActor::new(8);
    tokio::spawn(actor.run(endpoint));

    let first = client.begin_fetch(String::new()).await.unwrap();
    let (_, answer) = expect_list(&mut requests).await.unwrap();
    answer.send(Ok(rows(3))).unwrap();
    first.outcome().await.unwrap();

    let mut observer = client.subscribe();
    let second = client.begin_fetch("x".into()).await.unwrap();
    let (_, answer) = expect_list(&mut requests).await.unwrap();
    assert!(observer.borrow_and_update().loading);

    answer.send(Err(EndpointError::Timeout)).unwrap();
    let err = second.outcome().await.unwrap_err();
    assert_eq!(err, StoreError::Endpoint(EndpointError::Timeout));

    let state = client.state();
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("timeout"));
    assert_eq!(state.items, rows(3));

    // The next fetch clears the error as soon as it is issued.
    let third = client.begin_fetch(String::new()).await.unwrap();
    let (_, answer) = expect_list(&mut requests).await.unwrap();
    assert_eq!(client.state().error, None);
    answer.send(Ok(rows(3))).unwrap();
    third.outcome().await.unwrap();
}

// --- Mutations ---

#[tokio::test]
async fn test_create_prepends_then_fetch_is_authoritative() {
    let mut mock = MockEndpoint::<Row>::new();
    mock.expect_list().return_ok(rows(2));
    mock.expect_create().return_ok(row(3, "new"));
    mock.expect_list().return_ok(rows(2));

    let (actor, client) = StoreActor::new(8);
    tokio::spawn(actor.run(mock.endpoint()));

    client.fetch(String::new()).await.unwrap();
    let created = client
        .create(RowCreate { name: "new".into() })
        .await
        .unwrap();
    assert_eq!(created.id, 3);
    assert_eq!(client.state().items[0], row(3, "new"));
    assert_eq!(client.state().items.len(), 3);

    // The server list does not contain the new row (e.g. filtered out).
    client.fetch(String::new()).await.unwrap();
    assert_eq!(client.state().items, rows(2));

    mock.verify();
}

#[tokio::test]
async fn test_update_replaces_in_place() {
    let mut mock = MockEndpoint::<Row>::new();
    mock.expect_list().return_ok(rows(3));
    mock.expect_update(2).return_ok(row(2, "renamed"));
    mock.expect_update(7).return_ok(row(7, "elsewhere"));

    let (actor, client) = StoreActor::new(8);
    tokio::spawn(actor.run(mock.endpoint()));
    client.fetch(String::new()).await.unwrap();

    let updated = client
        .update(2, RowUpdate { name: "renamed".into() })
        .await
        .unwrap();
    assert_eq!(updated.name, "renamed");
    assert_eq!(
        client.state().items,
        vec![row(1, "row 1"), row(2, "renamed"), row(3, "row 3")]
    );

    // Not listed locally: benign, list unchanged.
    client
        .update(7, RowUpdate { name: "elsewhere".into() })
        .await
        .unwrap();
    assert_eq!(client.state().items.len(), 3);

    mock.verify();
}

#[tokio::test]
async fn test_delete_of_absent_id_is_a_no_op() {
    let mut mock = MockEndpoint::<Row>::new();
    mock.expect_list().return_ok(rows(2));
    mock.expect_delete(9).return_ok(());
    mock.expect_delete(8)
        .return_err(EndpointError::NotFound("row 8".into()));
    mock.expect_delete(1).return_ok(());

    let (actor, client) = StoreActor::new(8);
    tokio::spawn(actor.run(mock.endpoint()));
    client.fetch(String::new()).await.unwrap();

    client.delete(9).await.unwrap();
    client.delete(8).await.unwrap();
    let state = client.state();
    assert_eq!(state.items, rows(2));
    assert_eq!(state.error, None);

    client.delete(1).await.unwrap();
    assert_eq!(client.state().items, vec![row(2, "row 2")]);

    mock.verify();
}

#[tokio::test]
async fn test_failed_mutation_reports_error() {
    let mut mock = MockEndpoint::<Row>::new();
    mock.expect_create().return_err(EndpointError::Rejected {
        status: 422,
        message: "name is required".into(),
    });

    let (actor, client) = StoreActor::new(8);
    tokio::spawn(actor.run(mock.endpoint()));

    let err = client
        .create(RowCreate {
            name: String::new(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "rejected (422): name is required");

    let state = client.state();
    assert_eq!(state.error.as_deref(), Some("rejected (422): name is required"));
    assert!(state.items.is_empty());
    assert!(!state.loading);

    mock.verify();
}

#[tokio::test(start_paused = true)]
async fn test_mutation_does_not_wait_for_slow_fetch() {
    let mut mock = MockEndpoint::<Row>::new();
    mock.expect_list()
        .after(Duration::from_secs(5))
        .return_ok(rows(2));
    mock.expect_delete(1).return_ok(());

    let (actor, client) = StoreActor::new(8);
    tokio::spawn(actor.run(mock.endpoint()));

    let pending = client.begin_fetch(String::new()).await.unwrap();
    client.delete(1).await.unwrap();
    assert!(client.state().loading);

    // The fetch is authoritative once it lands.
    pending.outcome().await.unwrap();
    assert_eq!(client.state().items, rows(2));
    assert!(!client.state().loading);

    mock.verify();
}

// --- Lifecycle ---

#[tokio::test]
async fn test_store_drains_in_flight_calls_before_exit() {
    let (endpoint, mut requests) = create_mock_endpoint::<Row>(8);
    let (actor, client) = StoreActor::new(8);
    let handle = tokio::spawn(actor.run(endpoint));

    let pending = client.begin_fetch(String::new()).await.unwrap();
    drop(client);

    let (_, answer) = expect_list(&mut requests).await.unwrap();
    tokio::task::yield_now().await;
    assert!(!handle.is_finished());

    answer.send(Ok(rows(1))).unwrap();
    assert_eq!(
        pending.outcome().await.unwrap(),
        FetchOutcome::Applied { count: 1 }
    );
    handle.await.unwrap();
}

/// Endpoint whose `list` panics, as a decoding bug in a real client would.
struct PanickingEndpoint;

#[async_trait]
impl CollectionEndpoint<Row> for PanickingEndpoint {
    async fn list(&self, _query: &String) -> Result<Vec<Row>, EndpointError> {
        panic!("decode bug");
    }

    async fn create(&self, _payload: RowCreate) -> Result<Row, EndpointError> {
        Err(EndpointError::Timeout)
    }

    async fn update(&self, _id: &u32, _patch: RowUpdate) -> Result<Row, EndpointError> {
        Err(EndpointError::Timeout)
    }

    async fn delete(&self, _id: &u32) -> Result<(), EndpointError> {
        Err(EndpointError::Timeout)
    }
}

#[tokio::test]
async fn test_panicking_endpoint_fails_the_fetch_and_store_still_exits() {
    let (actor, client) = StoreActor::new(8);
    let handle = tokio::spawn(actor.run(PanickingEndpoint));

    let err = client.fetch(String::new()).await.unwrap_err();
    assert!(
        matches!(&err, StoreError::Endpoint(EndpointError::Transport(_))),
        "unexpected error: {err:?}"
    );

    let state = client.state();
    assert!(!state.loading);
    assert_eq!(state.error, Some(err.to_string()));

    drop(client);
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("store exits once clients are gone")
        .unwrap();
}

#[tokio::test]
async fn test_fetch_keeps_first_copy_of_repeated_id() {
    let mut mock = MockEndpoint::<Row>::new();
    mock.expect_list()
        .return_ok(vec![row(1, "first"), row(2, "two"), row(1, "again")]);

    let (actor, client) = StoreActor::new(8);
    tokio::spawn(actor.run(mock.endpoint()));

    assert_eq!(
        client.fetch(String::new()).await.unwrap(),
        FetchOutcome::Applied { count: 2 }
    );
    assert_eq!(client.state().items, vec![row(1, "first"), row(2, "two")]);

    mock.verify();
}

// --- Resource list ---

fn search_only(criteria: &FilterCriteria) -> String {
    criteria.search.clone()
}

#[tokio::test(start_paused = true)]
async fn test_resource_list_resets_page_on_new_criteria() {
    let mut mock = MockEndpoint::<Row>::new();
    mock.expect_list().return_ok(rows(25));
    mock.expect_list().return_ok(rows(24));

    let (actor, client) = StoreActor::new(8);
    tokio::spawn(actor.run(mock.endpoint()));

    let filters = FilterController::new(FilterConfig::default());
    let list = ResourceList::new(filters, search_only, client.clone(), 10);

    assert_eq!(
        list.load().await.unwrap(),
        FetchOutcome::Applied { count: 25 }
    );
    list.set_page(3);
    let view = list.page();
    assert_eq!(view.page, 3);
    assert_eq!(view.total_pages, 3);
    assert_eq!(view.rows.len(), 5);

    let mut observer = client.subscribe();
    list.filters().set_search("row");
    list.filters().set_search("row 1");

    tokio::time::advance(Duration::from_millis(500)).await;
    observer
        .wait_for(|state| state.items.len() == 24)
        .await
        .unwrap();

    // Page 3 still exists for 24 rows; the new criteria moved the view back anyway.
    let view = list.page();
    assert_eq!(view.page, 1);
    assert_eq!(view.total_pages, 3);
    assert_eq!(view.rows[0], row(1, "row 1"));
    assert_eq!(list.active_criteria().search, "row 1");

    list.shutdown();
    mock.verify();
}

#[tokio::test]
async fn test_resource_list_clamps_page_after_delete() {
    let mut mock = MockEndpoint::<Row>::new();
    mock.expect_list().return_ok(rows(21));
    mock.expect_delete(21).return_ok(());

    let (actor, client) = StoreActor::new(8);
    tokio::spawn(actor.run(mock.endpoint()));

    let filters = FilterController::new(FilterConfig::default());
    let list = ResourceList::new(filters, search_only, client, 10);
    list.load().await.unwrap();

    list.set_page(3);
    assert_eq!(list.page().rows, vec![row(21, "row 21")]);

    list.store().delete(21).await.unwrap();
    let view = list.page();
    assert_eq!(view.page, 2);
    assert_eq!(view.total_pages, 2);
    assert_eq!(view.total_items, 20);

    mock.verify();
}
