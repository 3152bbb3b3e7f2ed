//! Integration tests for the status endpoint.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use playstatus_core::EventAggregator;
use playstatus_core::config::GameConfig;
use playstatus_server::router::build_router;
use playstatus_server::{AppState, BroadcastHub};
use playstatus_types::{BeatmapEvent, DomainEvent, LightColorEvent, SongStart};
use serde_json::Value;
use tower::ServiceExt;

fn make_state(aggregator: &EventAggregator) -> Arc<AppState> {
    let store = aggregator.store();
    let hub = Arc::new(BroadcastHub::new(store.clone(), 1));
    Arc::new(AppState::new(store, hub))
}

async fn get(state: Arc<AppState>, path: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = build_router(state)
        .oneshot(Request::get(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_owned());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, content_type, bytes.to_vec())
}

#[tokio::test]
async fn test_initial_status_is_revision_zero() {
    let aggregator = EventAggregator::new(&GameConfig::default()).unwrap();
    let (status, content_type, body) = get(make_state(&aggregator), "/status.json").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json; charset=utf-8"));
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["revision"], 0);
    assert_eq!(json["type"], "Idle");
}

#[tokio::test]
async fn test_light_color_scenario() {
    let mut aggregator = EventAggregator::new(&GameConfig::default()).unwrap();
    let state = make_state(&aggregator);

    aggregator
        .apply(&DomainEvent::SongStart(Box::new(SongStart::default())))
        .unwrap();
    aggregator
        .apply(&DomainEvent::Beatmap(BeatmapEvent::BpmChange { bpm: 120.0 }))
        .unwrap();
    aggregator
        .apply(&DomainEvent::Beatmap(BeatmapEvent::LightColor(
            LightColorEvent {
                group_id: 1,
                element_id: 2,
                brightness: 0.5,
                ..LightColorEvent::default()
            },
        )))
        .unwrap();

    let (status, _, body) = get(state, "/status.json").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["type"], "LightColor");
    assert_eq!(json["groupId"], 1);
    assert_eq!(json["elementId"], 2);
    assert_eq!(json["brightness"], 0.5);
    assert_eq!(json["revision"], 3);
    assert!(json.get("bpm").is_none());
}

#[tokio::test]
async fn test_body_matches_snapshot_bytes() {
    let mut aggregator = EventAggregator::new(&GameConfig::default()).unwrap();
    let state = make_state(&aggregator);
    let snapshot = aggregator.apply(&DomainEvent::Menu).unwrap();

    let (_, _, body) = get(state, "/status.json").await;
    assert_eq!(body, snapshot.body().as_bytes());
}

#[tokio::test]
async fn test_unknown_event_still_served() {
    let mut aggregator = EventAggregator::new(&GameConfig::default()).unwrap();
    let state = make_state(&aggregator);
    aggregator.apply(&DomainEvent::Unknown).unwrap();

    let (status, _, body) = get(state, "/status.json").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["type"], "Unknown");
    assert_eq!(json["revision"], 1);
    assert!(json.get("groupId").is_none());
}

#[tokio::test]
async fn test_unknown_path_is_empty_404() {
    let aggregator = EventAggregator::new(&GameConfig::default()).unwrap();
    for path in ["/nonexistent", "/", "/status", "/status.json/extra"] {
        let (status, _, body) = get(make_state(&aggregator), path).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "path {path}");
        assert!(body.is_empty(), "path {path}");
    }
}

#[tokio::test]
async fn test_pull_ignores_stalled_subscribers() {
    let mut aggregator = EventAggregator::new(&GameConfig::default()).unwrap();
    let state = make_state(&aggregator);
    let _stalled: Vec<_> = (0..8).map(|_| state.hub.subscribe()).collect();

    for combo in 1..=5 {
        let snapshot = aggregator
            .apply(&DomainEvent::ComboChanged { combo })
            .unwrap();
        state.hub.on_snapshot(&snapshot);
    }

    let (status, _, body) = get(state, "/status.json").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["revision"], 5);
}
