use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::app;
use serde_json::Value;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder()
        .uri(uri)
        .header("host", "api.test")
        .body(String::new())
        .unwrap()
}

// --- events ---

#[tokio::test]
async fn list_events_wraps_payload_in_envelope() {
    let resp = app().oneshot(get("/v2.1/events")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let events = body["events"].as_array().unwrap();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0]["uri"], "http://api.test/v2.1/events/1");
    assert!(events[0].get("id").is_none());
    assert_eq!(body["meta"]["total"], 3);
    assert_eq!(body["meta"]["count"], 3);
}

#[tokio::test]
async fn list_events_pages() {
    let resp = app()
        .oneshot(get("/v2.1/events?resultsperpage=1&start=1"))
        .await
        .unwrap();

    let body = body_json(resp).await;
    assert_eq!(body["events"].as_array().unwrap().len(), 1);
    assert_eq!(body["events"][0]["name"], "PHP UK Conference");
    assert_eq!(
        body["meta"]["next_page"],
        "http://api.test/v2.1/events?resultsperpage=1&start=2"
    );
}

#[tokio::test]
async fn list_events_filters_by_tag() {
    let resp = app().oneshot(get("/v2.1/events?tags=rust")).await.unwrap();

    let body = body_json(resp).await;
    let events = body["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["name"], "RustFest");
}

#[tokio::test]
async fn get_event_verbose_is_single_element_list() {
    let resp = app().oneshot(get("/v2.1/events/2?verbose=yes")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let events = body["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["location"], "London");
}

#[tokio::test]
async fn get_event_not_found() {
    let resp = app().oneshot(get("/v2.1/events/404")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await, serde_json::json!(["Event not found"]));
}

#[tokio::test]
async fn get_event_bad_id_returns_400() {
    let resp = app().oneshot(get("/v2.1/events/phpbnl")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn event_comments_and_talks() {
    let resp = app().oneshot(get("/v2.1/events/1/comments")).await.unwrap();
    let body = body_json(resp).await;
    let comments = body["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["event_uri"], "http://api.test/v2.1/events/1");
    assert_eq!(comments[0]["user_display_name"], "Derick Rethans");

    let resp = app().oneshot(get("/v2.1/events/3/talks")).await.unwrap();
    let body = body_json(resp).await;
    let talks = body["talks"].as_array().unwrap();
    assert_eq!(talks.len(), 2);
    assert_eq!(talks[1]["uri"], "http://api.test/v2.1/talks/14");
}

#[tokio::test]
async fn event_talks_for_missing_event_is_404() {
    let resp = app().oneshot(get("/v2.1/events/99/talks")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- talks ---

#[tokio::test]
async fn get_talk_and_comments() {
    let resp = app().oneshot(get("/v2.1/talks/10?verbose=yes")).await.unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["talks"][0]["talk_title"], "Static analysis in anger");
    assert_eq!(body["talks"][0]["comment_count"], 2);

    let resp = app().oneshot(get("/v2.1/talks/10/comments")).await.unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["comments"].as_array().unwrap().len(), 2);
    assert_eq!(body["comments"][0]["talk_uri"], "http://api.test/v2.1/talks/10");
}

#[tokio::test]
async fn get_talk_not_found() {
    let resp = app().oneshot(get("/v2.1/talks/1")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await, serde_json::json!(["Talk not found"]));
}

// --- users ---

#[tokio::test]
async fn user_detail_attended_and_talks() {
    let resp = app().oneshot(get("/v2.1/users/100?verbose=yes")).await.unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["users"][0]["username"], "lornajane");
    assert!(body["users"][0]["gravatar_hash"].is_string());

    let resp = app().oneshot(get("/v2.1/users/100/attended-events")).await.unwrap();
    let body = body_json(resp).await;
    let names: Vec<&str> = body["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["PHP Benelux", "PHP UK Conference"]);

    let resp = app().oneshot(get("/v2.1/users/100/talks")).await.unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["talks"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn unknown_user_is_404() {
    let resp = app().oneshot(get("/v2.1/users/7/talks")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await, serde_json::json!(["User not found"]));
}

#[tokio::test]
async fn routes_outside_api_version_are_404() {
    let resp = app().oneshot(get("/v2.0/events")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
