//! Third-party lookups that decorate locations and conferences.
//!
//! Neither lookup is allowed to fail a request: [`image_for`] and
//! [`weather_for`] log the failure and hand back `None`.

pub mod open_weather;
pub mod pexels;

pub use open_weather::OpenWeather;
pub use pexels::Pexels;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use utoipa::ToSchema;

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("{0} lookups are not configured")]
    NotConfigured(&'static str),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status} from {service}")]
    Upstream {
        service: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("no result for {0}")]
    NotFound(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Current conditions, as reported by the weather service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Weather {
    pub main: String,
    pub description: String,
}

#[async_trait]
pub trait ImageSearch: Send + Sync {
    /// URL of a picture of the city.
    async fn resolve_image(&self, city: &str, state: &str) -> Result<String, EnrichmentError>;
}

#[async_trait]
pub trait WeatherLookup: Send + Sync {
    async fn resolve_coordinates(
        &self,
        city: &str,
        state: &str,
    ) -> Result<Option<Coordinates>, EnrichmentError>;

    async fn resolve_weather(&self, at: Coordinates) -> Result<Option<Weather>, EnrichmentError>;
}

/// Stand-in used when no API key is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct Disabled;

#[async_trait]
impl ImageSearch for Disabled {
    async fn resolve_image(&self, _city: &str, _state: &str) -> Result<String, EnrichmentError> {
        Err(EnrichmentError::NotConfigured("image"))
    }
}

#[async_trait]
impl WeatherLookup for Disabled {
    async fn resolve_coordinates(
        &self,
        _city: &str,
        _state: &str,
    ) -> Result<Option<Coordinates>, EnrichmentError> {
        Err(EnrichmentError::NotConfigured("weather"))
    }

    async fn resolve_weather(&self, _at: Coordinates) -> Result<Option<Weather>, EnrichmentError> {
        Err(EnrichmentError::NotConfigured("weather"))
    }
}

fn log_failure(lookup: &'static str, city: &str, state: &str, err: &EnrichmentError) {
    match err {
        EnrichmentError::NotConfigured(_) => debug!(lookup, city, state, "Lookup skipped"),
        _ => warn!(lookup, city, state, error = %err, "Lookup failed"),
    }
}

/// Image for a location, or `None` when the search fails.
pub async fn image_for(images: &dyn ImageSearch, city: &str, state: &str) -> Option<String> {
    match images.resolve_image(city, state).await {
        Ok(url) => Some(url),
        Err(err) => {
            log_failure("image", city, state, &err);
            None
        }
    }
}

/// Current weather for a city, or `None` when either step comes back empty or fails.
pub async fn weather_for(weather: &dyn WeatherLookup, city: &str, state: &str) -> Option<Weather> {
    let at = match weather.resolve_coordinates(city, state).await {
        Ok(Some(at)) => at,
        Ok(None) => {
            warn!(city, state, "No coordinates for city");
            return None;
        }
        Err(err) => {
            log_failure("coordinates", city, state, &err);
            return None;
        }
    };

    match weather.resolve_weather(at).await {
        Ok(found) => found,
        Err(err) => {
            log_failure("weather", city, state, &err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        coordinates: Option<Coordinates>,
        weather: Option<Weather>,
    }

    #[async_trait]
    impl WeatherLookup for Fixed {
        async fn resolve_coordinates(
            &self,
            _city: &str,
            _state: &str,
        ) -> Result<Option<Coordinates>, EnrichmentError> {
            Ok(self.coordinates)
        }

        async fn resolve_weather(
            &self,
            _at: Coordinates,
        ) -> Result<Option<Weather>, EnrichmentError> {
            Ok(self.weather.clone())
        }
    }

    fn sunny() -> Weather {
        Weather {
            main: "Clear".to_string(),
            description: "clear sky".to_string(),
        }
    }

    #[tokio::test]
    async fn test_weather_for_both_steps() {
        let lookup = Fixed {
            coordinates: Some(Coordinates { lat: 39.9, lon: -75.1 }),
            weather: Some(sunny()),
        };
        assert_eq!(weather_for(&lookup, "Philadelphia", "PA").await, Some(sunny()));
    }

    #[tokio::test]
    async fn test_weather_for_without_coordinates() {
        let lookup = Fixed {
            coordinates: None,
            weather: Some(sunny()),
        };
        assert_eq!(weather_for(&lookup, "Nowhere", "PA").await, None);
    }

    #[tokio::test]
    async fn test_disabled_lookups_degrade() {
        assert_eq!(image_for(&Disabled, "Philadelphia", "PA").await, None);
        assert_eq!(weather_for(&Disabled, "Philadelphia", "PA").await, None);
    }

    #[test]
    fn test_weather_ignores_extra_fields() {
        let body = r#"{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}"#;
        let weather: Weather = serde_json::from_str(body).unwrap();
        assert_eq!(weather, sunny());
        assert_eq!(
            serde_json::to_value(&weather).unwrap(),
            serde_json::json!({"main": "Clear", "description": "clear sky"})
        );
    }
}
