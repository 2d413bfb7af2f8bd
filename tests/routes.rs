mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use common::{user, Call, StubStore, User};
use crud_sdk::query::QueryOption;
use crud_sdk::{resource_routes, ConfigError, ResourceConfig, SharedStore};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn router(store: Arc<StubStore>, resource: ResourceConfig) -> Router {
    let shared: SharedStore<User> = store;
    resource_routes(shared, &resource).unwrap()
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn list_end_to_end_with_total() {
    let store = StubStore::new(vec![user(1, "John"), user(2, "John"), user(3, "John")])
        .with_count(Ok(42))
        .shared();
    let app = router(store.clone(), ResourceConfig::new("users"));

    let (status, body) = get_json(
        app,
        "/users?limit=10&offset=0&order_by=id&desc=true&filter_by=name&filter_value=John&total=true",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
    assert_eq!(body["total"], 42);
    assert!(body.get("totalError").is_none());
    assert_eq!(
        store.calls()[0],
        Call::FetchMany(vec![
            QueryOption::page(10, 0),
            QueryOption::order_by("id", true),
            QueryOption::filter_by("name", "John"),
        ])
    );
}

#[tokio::test]
async fn malformed_parameter_is_bad_request() {
    let store = StubStore::new(vec![user(1, "John")]).shared();
    let app = router(store.clone(), ResourceConfig::new("users"));

    let (status, body) = get_json(app, "/users?limit=ten").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
    assert_eq!(body["error"]["details"]["parameter"], "limit");
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn repeated_preload_keeps_order() {
    let store = StubStore::new(vec![user(1, "John")]).shared();
    let app = router(store.clone(), ResourceConfig::new("users"));

    let (status, _) = get_json(app, "/users/1?preload=Orders.Product&preload=BestFriend&limit=3").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        store.calls(),
        vec![Call::FetchById(
            "1".into(),
            vec![QueryOption::preload("Orders.Product"), QueryOption::preload("BestFriend")]
        )]
    );
}

#[tokio::test]
async fn get_missing_record_is_process_failed() {
    let store = StubStore::new(vec![]).shared();
    let app = router(store, ResourceConfig::new("users"));

    let (status, body) = get_json(app, "/users/404").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "process_failed");
}

#[tokio::test]
async fn nested_route_returns_field_with_total() {
    let store = StubStore::new(vec![user(5, "Eve")]).with_count(Ok(2)).shared();
    let mut resource = ResourceConfig::new("users").nested("orders");
    resource.id_param = "user_id".into();
    let app = router(store.clone(), resource);

    let (status, body) = get_json(app, "/users/5/orders?preload=Product&total=true").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"][0]["product"]["title"], "Lamp");
    assert_eq!(body["total"], 2);
    assert!(matches!(&store.calls()[1], Call::CountAssociation(field, None) if field == "Orders"));
}

#[tokio::test]
async fn nested_route_fetch_failure_is_server_error() {
    let store = StubStore::new(vec![user(5, "Eve")]).with_count(Ok(2)).failing_fetch().shared();
    let app = router(store.clone(), ResourceConfig::new("users").nested("orders"));

    let (status, body) = get_json(app, "/users/5/orders?total=true").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "process_failed");
    assert!(body.get("total").is_none());
    assert!(store.calls().iter().all(|c| !matches!(c, Call::CountAssociation(..))));
}

#[tokio::test]
async fn preload_names_fold_to_declared_fields() {
    let store = StubStore::new(vec![user(1, "John")]).shared();
    let app = router(store.clone(), ResourceConfig::new("users"));

    let (status, _) = get_json(app, "/users/1?preload=ORDERS.Product&preload=best-friend").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        store.calls(),
        vec![Call::FetchById(
            "1".into(),
            vec![QueryOption::preload("Orders.Product"), QueryOption::preload("BestFriend")]
        )]
    );
}

#[tokio::test]
async fn omit_and_disabled_routes_follow_config() {
    let store = StubStore::new(vec![user(1, "John")]).shared();
    let mut resource = ResourceConfig::new("users");
    resource.get.omit = vec!["password".into()];
    resource.list.enable = false;
    let app = router(store, resource);

    let (status, body) = get_json(app.clone(), "/users/1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].get("password").is_none());

    let response = app
        .oneshot(Request::builder().uri("/users").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn unknown_nested_field_fails_registration() {
    let shared: SharedStore<User> = StubStore::new(vec![]).shared();
    let resource = ResourceConfig::new("users").nested("bogus");
    let err = resource_routes(shared, &resource).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownField { record: "user", ref field } if field == "bogus"));
}
