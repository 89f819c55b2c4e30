use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{Coordinates, EnrichmentError, Weather, WeatherLookup};

const GEOCODE_URL: &str = "http://api.openweathermap.org/geo/1.0/direct";
const WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Geocoding plus current conditions from OpenWeather
pub struct OpenWeather {
    api_key: String,
    geocode_url: String,
    weather_url: String,
    http_client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    #[serde(default)]
    weather: Vec<Weather>,
}

impl OpenWeather {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            api_key: api_key.into(),
            geocode_url: GEOCODE_URL.to_string(),
            weather_url: WEATHER_URL.to_string(),
            http_client,
        }
    }

    pub fn with_urls(mut self, geocode_url: impl Into<String>, weather_url: impl Into<String>) -> Self {
        self.geocode_url = geocode_url.into();
        self.weather_url = weather_url.into();
        self
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, EnrichmentError> {
        let response = self
            .http_client
            .get(url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EnrichmentError::Upstream {
                service: "openweather",
                status: response.status(),
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl WeatherLookup for OpenWeather {
    async fn resolve_coordinates(
        &self,
        city: &str,
        state: &str,
    ) -> Result<Option<Coordinates>, EnrichmentError> {
        debug!(city, state, "Geocoding city");
        let places: Vec<Coordinates> = self
            .get(
                &self.geocode_url,
                &[("q", format!("{city},{state},US")), ("limit", "1".to_string())],
            )
            .await?;
        Ok(places.into_iter().next())
    }

    async fn resolve_weather(&self, at: Coordinates) -> Result<Option<Weather>, EnrichmentError> {
        let conditions: CurrentConditions = self
            .get(
                &self.weather_url,
                &[("lat", at.lat.to_string()), ("lon", at.lon.to_string())],
            )
            .await?;
        Ok(conditions.weather.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    type Seen = Arc<Mutex<Vec<HashMap<String, String>>>>;

    async fn geocode(
        State(seen): State<Seen>,
        Query(query): Query<HashMap<String, String>>,
    ) -> Json<Value> {
        let known = query.get("q").map(String::as_str) == Some("Philadelphia,PA,US");
        seen.lock().unwrap().push(query);
        if known {
            Json(json!([{"name": "Philadelphia", "lat": 39.95, "lon": -75.16}]))
        } else {
            Json(json!([]))
        }
    }

    async fn current(
        State(seen): State<Seen>,
        Query(query): Query<HashMap<String, String>>,
    ) -> Json<Value> {
        seen.lock().unwrap().push(query);
        Json(json!({"weather": [{"main": "Clear", "description": "clear sky"}]}))
    }

    /// Serves stand-in geocoding and weather APIs on an ephemeral port.
    async fn serve(seen: Seen) -> String {
        let router = Router::new()
            .route("/geo", get(geocode))
            .route("/weather", get(current))
            .route("/broken", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
            .with_state(seen);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        format!("http://{addr}")
    }

    fn client(base: &str, geocode_path: &str, weather_path: &str) -> OpenWeather {
        OpenWeather::new("secret-key", Duration::from_secs(5))
            .with_urls(format!("{base}{geocode_path}"), format!("{base}{weather_path}"))
    }

    fn param<'a>(query: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
        query.get(key).map(String::as_str)
    }

    #[tokio::test]
    async fn test_lookup_request_shape() {
        let seen = Seen::default();
        let base = serve(seen.clone()).await;
        let lookup = client(&base, "/geo", "/weather");

        let at = lookup
            .resolve_coordinates("Philadelphia", "PA")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(at, Coordinates { lat: 39.95, lon: -75.16 });
        let weather = lookup.resolve_weather(at).await.unwrap();
        assert_eq!(
            weather,
            Some(Weather {
                main: "Clear".to_string(),
                description: "clear sky".to_string(),
            })
        );

        let requests = seen.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(param(&requests[0], "q"), Some("Philadelphia,PA,US"));
        assert_eq!(param(&requests[0], "limit"), Some("1"));
        assert_eq!(param(&requests[0], "appid"), Some("secret-key"));
        assert_eq!(param(&requests[1], "lat"), Some("39.95"));
        assert_eq!(param(&requests[1], "lon"), Some("-75.16"));
        assert_eq!(param(&requests[1], "appid"), Some("secret-key"));
    }

    #[tokio::test]
    async fn test_unknown_city_has_no_coordinates() {
        let base = serve(Seen::default()).await;

        let found = client(&base, "/geo", "/weather")
            .resolve_coordinates("Nowhere", "PA")
            .await
            .unwrap();
        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn test_server_error_is_upstream() {
        let base = serve(Seen::default()).await;
        let lookup = client(&base, "/broken", "/broken");

        let err = lookup.resolve_coordinates("Philadelphia", "PA").await.unwrap_err();
        assert!(matches!(
            err,
            EnrichmentError::Upstream { service: "openweather", status }
                if status == reqwest::StatusCode::INTERNAL_SERVER_ERROR
        ));
        let err = lookup
            .resolve_weather(Coordinates { lat: 39.95, lon: -75.16 })
            .await
            .unwrap_err();
        assert!(matches!(err, EnrichmentError::Upstream { .. }));
    }

    #[test]
    fn test_geocode_result_decodes() {
        let body = r#"[{"name": "Philadelphia", "lat": 39.95, "lon": -75.16, "country": "US"}]"#;
        let places: Vec<Coordinates> = serde_json::from_str(body).unwrap();
        assert_eq!(places, vec![Coordinates { lat: 39.95, lon: -75.16 }]);
    }

    #[test]
    fn test_current_conditions_take_first_entry() {
        let body = r#"{
            "coord": {"lon": -75.16, "lat": 39.95},
            "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
            "main": {"temp": 281.2}
        }"#;
        let conditions: CurrentConditions = serde_json::from_str(body).unwrap();
        let weather = conditions.weather.into_iter().next().unwrap();
        assert_eq!(weather.main, "Rain");
        assert_eq!(weather.description, "light rain");
    }
}
