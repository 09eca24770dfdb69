use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use clima_lab::gateway::HttpGateway;
use serde_json::{json, Value};

/// Serves `router` on an ephemeral port and returns the measurements URL.
pub async fn spawn_service(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Should bind test listener");
    let addr = listener.local_addr().expect("Should have a local address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Test service failed");
    });
    format!("http://{}/api/mediciones", addr)
}

pub fn gateway(url: String) -> HttpGateway {
    HttpGateway::with_client(reqwest::Client::new(), url)
}

async fn lookup(Json(body): Json<Value>) -> Response {
    match body["ciudad"].as_str() {
        Some("Rosario") => (
            StatusCode::CREATED,
            Json(json!({
                "id_medicion": 7,
                "ciudad": { "id_ciudad": 3, "nombre": "Rosario", "pais": "AR" },
                "temperatura": 18,
                "humedad": "64",
                "presion": "1013",
                "sensacion_termica": "17",
                "descripcion": "Parcialmente nublado"
            })),
        )
            .into_response(),
        Some("Bare") => (StatusCode::CREATED, Json(json!({ "temperatura": 31.4 }))).into_response(),
        Some("Null") => (StatusCode::OK, Json(Value::Null)).into_response(),
        Some("Empty") => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "" })),
        )
            .into_response(),
        Some("Coded") => (StatusCode::NOT_FOUND, Json(json!({ "error": 404 }))).into_response(),
        Some("Plain") => (StatusCode::BAD_GATEWAY, "upstream down").into_response(),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "city not found" })),
        )
            .into_response(),
    }
}

/// Measurement service stub with a fixed history.
pub fn measurement_service(history: Value) -> Router {
    Router::new().route(
        "/api/mediciones",
        get(move || {
            let history = history.clone();
            async move { Json(history) }
        })
        .post(lookup),
    )
}

/// Measurement service whose history endpoint fails.
pub fn failing_history_service() -> Router {
    Router::new().route(
        "/api/mediciones",
        get(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "No se pudieron obtener las mediciones" })),
            )
        })
        .post(lookup),
    )
}

/// A URL nothing listens on.
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Should bind test listener");
    let addr = listener.local_addr().expect("Should have a local address");
    drop(listener);
    format!("http://{}/api/mediciones", addr)
}
