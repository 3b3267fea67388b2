use axum::body;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::Value;

/// Renders a handler result and splits it into its status and JSON body
pub async fn status_and_json(response: impl IntoResponse) -> (StatusCode, Value) {
    let response = response.into_response();
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not read data from response body!");

    let json = serde_json::from_slice(&bytes)
        .unwrap_or_else(|err| panic!("Response body was not JSON! Error: {err}, Received body: {bytes:?}"));
    (status, json)
}

/// Status and `error_code` of an API error response. The code is empty when the body has none.
pub async fn error_code_of(response: impl IntoResponse) -> (StatusCode, String) {
    let (status, body) = status_and_json(response).await;

    (status, body["error_code"].as_str().unwrap_or_default().to_owned())
}
