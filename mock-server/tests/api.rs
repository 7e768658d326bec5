use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, failing_app, BulkResponse};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn bulk(students: Value) -> String {
    json!({"students": {"student": students}}).to_string()
}

// --- post ---

#[tokio::test]
async fn insert_returns_success_per_record() {
    let app = app();
    let resp = app
        .oneshot(json_request(
            "POST",
            "/ws/v1/student",
            &bulk(json!([
                {"action": "INSERT", "client_uid": "1", "local_id": 1},
                {"action": "INSERT", "client_uid": "2", "local_id": 2}
            ])),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: BulkResponse = body_json(resp).await;
    assert_eq!(body.results.update_count, 2);
    assert_eq!(body.results.result.len(), 2);
    assert!(body.results.result.iter().all(|r| r.status == "SUCCESS"));
    let message = body.results.result[0].success_message.as_ref().unwrap();
    assert_eq!(message.reference, format!("/ws/v1/student/{}", message.id));
}

#[tokio::test]
async fn insert_without_local_id_is_reported_not_rejected() {
    let app = app();
    let resp = app
        .oneshot(json_request(
            "POST",
            "/ws/v1/student",
            &bulk(json!([{"action": "INSERT", "client_uid": "1"}])),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: BulkResponse = body_json(resp).await;
    assert_eq!(body.results.update_count, 0);
    assert_eq!(body.results.result[0].status, "ERROR");
}

#[tokio::test]
async fn malformed_envelope_returns_422() {
    let app = app();
    let resp = app
        .oneshot(json_request("POST", "/ws/v1/student", r#"{"students":[]}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- get ---

#[tokio::test]
async fn get_student_not_found() {
    let app = app();
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/ws/v1/student/4242")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_student_bad_id_returns_400() {
    let app = app();
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/ws/v1/student/not-a-number")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- failing server ---

#[tokio::test]
async fn failing_app_answers_500_with_body() {
    let app = failing_app("Server Error");
    let resp = app
        .oneshot(json_request("POST", "/ws/v1/student", &bulk(json!([]))))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(&body_bytes(resp).await[..], b"Server Error");
}

// --- insert then update ---

#[tokio::test]
async fn insert_update_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // insert
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/ws/v1/student",
            &bulk(json!([{
                "action": "INSERT", "client_uid": "23456", "local_id": 23456,
                "name": {"first_name": "Jane", "last_name": "Doe"}
            }])),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: BulkResponse = body_json(resp).await;
    let id = body.results.result[0].success_message.as_ref().unwrap().id;

    // update, partial name
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/ws/v1/student",
            &bulk(json!([{
                "action": "UPDATE", "client_uid": "23456", "id": id,
                "name": {"middle_name": "Q"}
            }])),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: BulkResponse = body_json(resp).await;
    assert_eq!(body.results.update_count, 1);
    assert_eq!(body.results.result[0].action, "UPDATE");

    // get reflects both writes
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .uri(&format!("/ws/v1/student/{id}"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let stored: Value = body_json(resp).await;
    assert_eq!(stored["local_id"], 23456);
    assert_eq!(
        stored["name"],
        json!({"first_name": "Jane", "middle_name": "Q", "last_name": "Doe"})
    );

    // update of an unknown id
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/ws/v1/student",
            &bulk(json!([{"action": "UPDATE", "client_uid": "1", "id": 1}])),
        ))
        .await
        .unwrap();
    let body: BulkResponse = body_json(resp).await;
    assert_eq!(body.results.update_count, 0);
    assert!(body.results.result[0].error_message.is_some());
}
