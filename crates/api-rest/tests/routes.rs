use api_rest::{router, AppState};
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use diversity_core::{
    CoreConfig, CustomerRecord, DiversityService, DiversityStore, MemoryStore, ResourceId,
    StoreBackend, TracingPublisher,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

const TOUCHPOINT: &str = "0000000001";

struct TestApp {
    app: Router,
    store: Arc<MemoryStore>,
    customer: ResourceId,
}

fn test_app() -> TestApp {
    let cfg = Arc::new(
        CoreConfig::new(PathBuf::from("unused"), StoreBackend::Memory, None).unwrap(),
    );
    let store = Arc::new(MemoryStore::new());
    let customer = ResourceId::new();
    store.put_customer(&CustomerRecord::new(customer)).unwrap();

    let service = DiversityService::new(cfg, store.clone(), Arc::new(TracingPublisher));
    let app = router(AppState {
        service: Arc::new(service),
    });

    TestApp {
        app,
        store,
        customer,
    }
}

fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("TouchpointId", TOUCHPOINT)
        .header("content-type", "application/json");
    match body {
        Some(json) => builder.body(Body::from(json.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

fn collection_uri(customer: &ResourceId) -> String {
    format!("/customers/{customer}/diversitydetails")
}

fn valid_body() -> Value {
    json!({
        "ConsentToCollectLLDDHealth": true,
        "LearningDifficultyOrDisabilityDeclaration": 1,
        "PrimaryLearningDifficultyOrDisability": 5,
        "ConsentToCollectEthnicity": true,
        "Ethnicity": 39
    })
}

async fn create(t: &TestApp) -> Value {
    let (status, body) = send(
        &t.app,
        request(Method::POST, &collection_uri(&t.customer), Some(valid_body())),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn health_reports_alive() {
    let t = test_app();
    let (status, body) = send(&t.app, request(Method::GET, "/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["ok"], json!(true));
}

#[tokio::test]
async fn create_returns_created_record() {
    let t = test_app();
    let created = create(&t).await;

    assert_eq!(created["CustomerId"], json!(t.customer.to_string()));
    assert_eq!(created["LastModifiedBy"], json!(TOUCHPOINT));
    assert_eq!(created["SecondaryLearningDifficultyOrDisability"], json!(99));
    assert!(ResourceId::parse(created["DiversityId"].as_str().unwrap()).is_ok());
}

#[tokio::test]
async fn second_create_conflicts() {
    let t = test_app();
    create(&t).await;
    let (status, _) = send(
        &t.app,
        request(Method::POST, &collection_uri(&t.customer), Some(valid_body())),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn create_with_invalid_body_lists_failures() {
    let t = test_app();
    let (status, body) = send(
        &t.app,
        request(
            Method::POST,
            &collection_uri(&t.customer),
            Some(json!({ "LearningDifficultyOrDisabilityDeclaration": 100 })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let failures: Vec<Value> = serde_json::from_slice(&body).unwrap();
    assert!(failures
        .iter()
        .any(|f| f["MemberNames"][0] == json!("LearningDifficultyOrDisabilityDeclaration")));
    assert!(failures
        .iter()
        .any(|f| f["MemberNames"][0] == json!("ConsentToCollectLLDDHealth")));
}

#[tokio::test]
async fn create_with_malformed_json_is_unprocessable() {
    let t = test_app();
    let req = Request::builder()
        .method(Method::POST)
        .uri(collection_uri(&t.customer))
        .header("TouchpointId", TOUCHPOINT)
        .body(Body::from("{ not json"))
        .unwrap();
    let (status, _) = send(&t.app, req).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn create_without_touchpoint_is_bad_request() {
    let t = test_app();
    let req = Request::builder()
        .method(Method::POST)
        .uri(collection_uri(&t.customer))
        .body(Body::from(valid_body().to_string()))
        .unwrap();
    let (status, _) = send(&t.app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_customer_id_is_bad_request() {
    let t = test_app();
    let (status, _) = send(
        &t.app,
        request(Method::GET, "/customers/not-a-uuid/diversitydetails", None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_customer_is_no_content() {
    let t = test_app();
    let (status, _) = send(
        &t.app,
        request(
            Method::POST,
            &collection_uri(&ResourceId::new()),
            Some(valid_body()),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn terminated_customer_is_forbidden() {
    let t = test_app();
    let terminated = ResourceId::new();
    t.store
        .put_customer(&CustomerRecord {
            customer_id: terminated,
            date_of_termination: Some(chrono_now()),
        })
        .unwrap();

    let (status, _) = send(
        &t.app,
        request(Method::POST, &collection_uri(&terminated), Some(valid_body())),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

fn chrono_now() -> chrono::DateTime<chrono::Utc> {
    chrono::Utc::now()
}

#[tokio::test]
async fn list_is_no_content_until_created() {
    let t = test_app();
    let (status, _) = send(
        &t.app,
        request(Method::GET, &collection_uri(&t.customer), None),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    create(&t).await;
    let (status, body) = send(
        &t.app,
        request(Method::GET, &collection_uri(&t.customer), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let records: Vec<Value> = serde_json::from_slice(&body).unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn get_by_id_returns_record_or_no_content() {
    let t = test_app();
    let created = create(&t).await;
    let id = created["DiversityId"].as_str().unwrap();

    let uri = format!("{}/{id}", collection_uri(&t.customer));
    let (status, body) = send(&t.app, request(Method::GET, &uri, None)).await;
    assert_eq!(status, StatusCode::OK);
    let fetched: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(fetched, created);

    let missing = format!("{}/{}", collection_uri(&t.customer), ResourceId::new());
    let (status, _) = send(&t.app, request(Method::GET, &missing, None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn patch_updates_only_supplied_fields() {
    let t = test_app();
    let created = create(&t).await;
    let id = created["DiversityId"].as_str().unwrap();
    let uri = format!("{}/{id}", collection_uri(&t.customer));

    let (status, body) = send(
        &t.app,
        request(Method::PATCH, &uri, Some(json!({ "Ethnicity": 40 }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let updated: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(updated["Ethnicity"], json!(40));
    assert_eq!(
        updated["PrimaryLearningDifficultyOrDisability"],
        created["PrimaryLearningDifficultyOrDisability"]
    );
    assert_eq!(updated["DiversityId"], created["DiversityId"]);
}

#[tokio::test]
async fn patch_breaking_consent_rule_is_unprocessable() {
    let t = test_app();
    let created = create(&t).await;
    let id = created["DiversityId"].as_str().unwrap();
    let uri = format!("{}/{id}", collection_uri(&t.customer));

    let (status, body) = send(
        &t.app,
        request(
            Method::PATCH,
            &uri,
            Some(json!({ "ConsentToCollectEthnicity": false })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let failures: Vec<Value> = serde_json::from_slice(&body).unwrap();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0]["MemberNames"], json!(["Ethnicity"]));
}

#[tokio::test]
async fn patch_of_missing_record_is_not_found() {
    let t = test_app();
    let uri = format!("{}/{}", collection_uri(&t.customer), ResourceId::new());
    let (status, _) = send(
        &t.app,
        request(Method::PATCH, &uri, Some(json!({ "Ethnicity": 99 }))),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn openapi_document_lists_routes() {
    let t = test_app();
    let (status, body) = send(&t.app, request(Method::GET, "/api-docs/openapi.json", None)).await;
    assert_eq!(status, StatusCode::OK);
    let doc: Value = serde_json::from_slice(&body).unwrap();
    assert!(doc["paths"]
        .get("/customers/{customer_id}/diversitydetails/{diversity_id}")
        .is_some());
}
