//! Fake upstream providers served on an ephemeral local port
//!
//! One axum server answers all three provider APIs so a test can point
//! every upstream base URL at it. The last Gemini request body is kept
//! for inspection.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use vibesync_common::config::UpstreamConfig;

/// Canned upstream behavior
#[derive(Clone)]
pub struct FakeReplies {
    /// Text returned by the vision model; `None` answers 503
    pub gemini_text: Option<String>,
    /// Number of songs the catalog holds for any term
    pub catalog_size: usize,
}

impl Default for FakeReplies {
    fn default() -> Self {
        Self {
            gemini_text: Some("neon, rainy, moody".to_string()),
            catalog_size: 20,
        }
    }
}

#[derive(Clone)]
struct FakeState {
    replies: FakeReplies,
    last_gemini_request: Arc<Mutex<Option<Value>>>,
    last_gemini_key: Arc<Mutex<Option<String>>>,
}

/// Running fake upstream
pub struct FakeUpstream {
    base_url: String,
    state: FakeState,
}

impl FakeUpstream {
    pub async fn start(replies: FakeReplies) -> Self {
        let state = FakeState {
            replies,
            last_gemini_request: Arc::new(Mutex::new(None)),
            last_gemini_key: Arc::new(Mutex::new(None)),
        };

        let router = Router::new()
            .route("/v1beta/models/:model", post(gemini_generate))
            .route("/data/2.5/weather", get(openweather))
            .route("/search", get(itunes_search))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Should bind fake upstream");
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn upstream_config(&self) -> UpstreamConfig {
        UpstreamConfig {
            gemini_base_url: format!("{}/v1beta", self.base_url),
            gemini_model: "gemini-2.5-flash".to_string(),
            openweather_base_url: self.base_url.clone(),
            itunes_base_url: self.base_url.clone(),
        }
    }

    pub fn last_gemini_request(&self) -> Option<Value> {
        self.state.last_gemini_request.lock().unwrap().clone()
    }

    pub fn last_gemini_key(&self) -> Option<String> {
        self.state.last_gemini_key.lock().unwrap().clone()
    }
}

async fn gemini_generate(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    *state.last_gemini_request.lock().unwrap() = Some(body);
    *state.last_gemini_key.lock().unwrap() = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    match &state.replies.gemini_text {
        Some(text) => Json(json!({
            "candidates": [{"content": {"parts": [{"text": text}], "role": "model"}}]
        }))
        .into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "model overloaded").into_response(),
    }
}

async fn openweather(Query(params): Query<HashMap<String, String>>) -> Response {
    if params.get("appid").map(String::as_str) == Some("rejected-key") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"cod": 401, "message": "Invalid API key"})),
        )
            .into_response();
    }
    if params.get("units").map(String::as_str) != Some("metric") {
        return (StatusCode::BAD_REQUEST, "units must be metric").into_response();
    }

    Json(json!({
        "coord": {"lat": params.get("lat"), "lon": params.get("lon")},
        "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
        "main": {"temp": 11.6, "feels_like": 10.2, "humidity": 87},
        "name": "Leeds"
    }))
    .into_response()
}

async fn itunes_search(
    State(state): State<FakeState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let term = params.get("term").cloned().unwrap_or_default();
    if term == "explode" {
        return (StatusCode::SERVICE_UNAVAILABLE, "catalog down").into_response();
    }
    if params.get("entity").map(String::as_str) != Some("song") {
        return (StatusCode::BAD_REQUEST, "entity must be song").into_response();
    }

    // The real API honors limit too, but the proxy must not rely on it
    let mut results: Vec<Value> = (1..=state.replies.catalog_size as i64)
        .map(|id| {
            json!({
                "wrapperType": "track",
                "trackId": id,
                "trackName": format!("{} #{}", term, id),
                "artistName": "Fake Artist",
                "artworkUrl100": format!("https://art.example/{}.jpg", id),
                "previewUrl": format!("https://preview.example/{}.m4a", id),
                "trackViewUrl": format!("https://music.example/{}", id)
            })
        })
        .collect();
    // One malformed entry that validation must drop
    results.insert(0, json!({"wrapperType": "artist", "artistName": "Not A Song"}));

    // iTunes serves JSON as text/javascript
    (
        [("content-type", "text/javascript; charset=utf-8")],
        json!({"resultCount": results.len(), "results": results}).to_string(),
    )
        .into_response()
}
