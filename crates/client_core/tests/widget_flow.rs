use std::{collections::HashSet, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use client_core::{HttpRecommendationApi, WidgetController, EMPTY_TAG_MESSAGE};
use serde_json::{json, Value};
use shared::domain::Recommendation;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone, Default)]
struct Backend {
    users: Arc<Mutex<HashSet<String>>>,
    create_requests: Arc<Mutex<u32>>,
}

async fn create_user(State(backend): State<Backend>, Json(body): Json<Value>) -> Response {
    *backend.create_requests.lock().await += 1;
    let Some(tag) = body.get("tag").and_then(Value::as_str) else {
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "detail": [{ "msg": "field required" }] })))
            .into_response();
    };
    backend.users.lock().await.insert(tag.to_string());
    (StatusCode::CREATED, Json(json!({ "status": "ok", "tag": tag }))).into_response()
}

async fn recommend(State(backend): State<Backend>, Path(tag): Path<String>) -> Response {
    if !backend.users.lock().await.contains(&tag) {
        return (StatusCode::BAD_REQUEST, Json(json!({ "detail": "user not found" }))).into_response();
    }
    Json(json!({
        "recommendations": [{ "title": "X", "artist": "Y", "uri": "http://z" }]
    }))
    .into_response()
}

async fn spawn_backend() -> (String, Backend) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let backend = Backend::default();
    let app = Router::new()
        .route("/users/", post(create_user))
        .route("/recommend/:tag", get(recommend))
        .with_state(backend.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), backend)
}

#[tokio::test]
async fn register_select_and_recommend_against_http_backend() {
    let (base_url, backend) = spawn_backend().await;
    let api = HttpRecommendationApi::new(&base_url).expect("api");
    let controller = WidgetController::new(Arc::new(api));

    controller.set_tag("  ");
    controller.add_user().await.expect_err("blank tag");
    assert_eq!(controller.state().error.as_deref(), Some(EMPTY_TAG_MESSAGE));
    assert_eq!(*backend.create_requests.lock().await, 0);

    controller.select_user("alice");
    controller
        .get_recommendations()
        .await
        .expect_err("alice is not registered yet");
    let state = controller.state();
    assert_eq!(state.error.as_deref(), Some("user not found"));
    assert!(state.recommendations.is_empty());

    controller.set_tag("alice");
    controller.add_user().await.expect("register alice");
    controller.add_user().await.expect("register alice again");
    let state = controller.state();
    assert_eq!(state.users.iter().collect::<Vec<_>>(), vec!["alice"]);
    assert_eq!(state.error, None);
    assert_eq!(*backend.create_requests.lock().await, 2);

    controller.get_recommendations().await.expect("recommendations");
    let state = controller.state();
    assert_eq!(
        state.recommendations,
        vec![Recommendation::new("X", "Y", "http://z")]
    );
    assert_eq!(state.error, None);
    assert!(!state.loading);
}
