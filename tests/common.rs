#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum_test::TestServer;
use serde_json::{json, Value};

use conference_go::enrichment::{
    Coordinates, EnrichmentError, ImageSearch, Weather, WeatherLookup,
};
use conference_go::{build_router, AppState, MemoryStore};

pub const IMAGE_URL: &str = "https://images.example/city.jpeg";

/// Image search that always finds the same picture
pub struct FixedImage;

#[async_trait]
impl ImageSearch for FixedImage {
    async fn resolve_image(&self, city: &str, _state: &str) -> Result<String, EnrichmentError> {
        if city == "Nowhere" {
            return Err(EnrichmentError::NotFound(city.to_string()));
        }
        Ok(IMAGE_URL.to_string())
    }
}

/// Weather lookup that only knows Philadelphia
pub struct FixedWeather;

#[async_trait]
impl WeatherLookup for FixedWeather {
    async fn resolve_coordinates(
        &self,
        city: &str,
        _state: &str,
    ) -> Result<Option<Coordinates>, EnrichmentError> {
        Ok((city == "Philadelphia").then_some(Coordinates {
            lat: 39.95,
            lon: -75.16,
        }))
    }

    async fn resolve_weather(&self, _at: Coordinates) -> Result<Option<Weather>, EnrichmentError> {
        Ok(Some(Weather {
            main: "Clear".to_string(),
            description: "clear sky".to_string(),
        }))
    }
}

/// Create the application router for testing, backed by a fresh in-memory store
pub fn create_test_app() -> Router {
    let state = AppState::new(
        Arc::new(MemoryStore::new()),
        Arc::new(FixedImage),
        Arc::new(FixedWeather),
    )
    .expect("encoder specs should build");
    build_router(state)
}

pub fn setup() -> TestServer {
    TestServer::new(create_test_app()).unwrap()
}

pub async fn create_location(server: &TestServer, name: &str, city: &str) -> Value {
    let response = server
        .post("/api/locations")
        .json(&json!({
            "name": name,
            "city": city,
            "room_count": 8,
            "state": "PA",
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json()
}

pub async fn create_conference(server: &TestServer, location_id: &str, name: &str) -> Value {
    let response = server
        .post("/api/conferences")
        .json(&json!({
            "name": name,
            "starts": "2025-05-01T09:00:00Z",
            "ends": "2025-05-03T17:00:00Z",
            "description": "Three days of talks",
            "max_presentations": 30,
            "max_attendees": 400,
            "location": location_id,
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json()
}

/// The id at the end of an `href`.
pub fn id_of(record: &Value) -> String {
    record["href"]
        .as_str()
        .and_then(|href| href.rsplit('/').next())
        .expect("record should carry an href")
        .to_string()
}
