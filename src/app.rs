use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::encoder::{Encoders, SpecError};
use crate::enrichment::{Disabled, ImageSearch, OpenWeather, Pexels, Weather, WeatherLookup};
use crate::handlers;
use crate::models::{
    CreateAttendee, CreateConference, CreateLocation, CreatePresentation, UpdateAttendee,
    UpdateConference, UpdateLocation, UpdatePresentation,
};
use crate::store::{MemoryStore, PgStore, Store};

/// Shared handler state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub images: Arc<dyn ImageSearch>,
    pub weather: Arc<dyn WeatherLookup>,
    pub encoders: Arc<Encoders>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        images: Arc<dyn ImageSearch>,
        weather: Arc<dyn WeatherLookup>,
    ) -> Result<Self, SpecError> {
        Ok(Self {
            store,
            images,
            weather,
            encoders: Arc::new(Encoders::build()?),
        })
    }

    /// Wire up the store and lookup clients the configuration asks for.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let store: Arc<dyn Store> = match &config.database_url {
            Some(url) => Arc::new(PgStore::connect(url, config.database_max_connections).await?),
            None => {
                tracing::warn!("DATABASE_URL not set, records will be kept in memory");
                Arc::new(MemoryStore::new())
            }
        };

        let timeout = config.enrichment_timeout();
        let images: Arc<dyn ImageSearch> = match &config.pexels_api_key {
            Some(key) => Arc::new(Pexels::new(key.clone(), timeout)),
            None => Arc::new(Disabled),
        };
        let weather: Arc<dyn WeatherLookup> = match &config.open_weather_api_key {
            Some(key) => Arc::new(OpenWeather::new(key.clone(), timeout)),
            None => Arc::new(Disabled),
        };

        Ok(Self::new(store, images, weather)?)
    }
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Conference GO", description = "Locations, conferences, attendees and presentations"),
    paths(
        handlers::list_states,
        handlers::list_locations,
        handlers::create_location,
        handlers::get_location,
        handlers::update_location,
        handlers::delete_location,
        handlers::list_conferences,
        handlers::create_conference,
        handlers::get_conference,
        handlers::update_conference,
        handlers::delete_conference,
        handlers::list_attendees,
        handlers::create_attendee,
        handlers::get_attendee,
        handlers::update_attendee,
        handlers::delete_attendee,
        handlers::list_presentations,
        handlers::create_presentation,
        handlers::get_presentation,
        handlers::update_presentation,
        handlers::delete_presentation,
        handlers::approve_presentation,
        handlers::reject_presentation,
    ),
    components(schemas(
        CreateLocation,
        UpdateLocation,
        CreateConference,
        UpdateConference,
        CreateAttendee,
        UpdateAttendee,
        CreatePresentation,
        UpdatePresentation,
        Weather,
    )),
    tags(
        (name = "states", description = "US states"),
        (name = "locations", description = "Conference venues"),
        (name = "conferences", description = "Conferences"),
        (name = "attendees", description = "Conference attendees"),
        (name = "presentations", description = "Presentation submissions"),
    )
)]
pub struct ApiDoc;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/states", get(handlers::list_states))
        // Location routes
        .route(
            "/api/locations",
            get(handlers::list_locations).post(handlers::create_location),
        )
        .route(
            "/api/locations/{id}",
            get(handlers::get_location)
                .put(handlers::update_location)
                .delete(handlers::delete_location),
        )
        // Conference routes
        .route(
            "/api/conferences",
            get(handlers::list_conferences).post(handlers::create_conference),
        )
        .route(
            "/api/conferences/{id}",
            get(handlers::get_conference)
                .put(handlers::update_conference)
                .delete(handlers::delete_conference),
        )
        // Attendee routes
        .route(
            "/api/conferences/{conference_id}/attendees",
            get(handlers::list_attendees).post(handlers::create_attendee),
        )
        .route(
            "/api/attendees/{id}",
            get(handlers::get_attendee)
                .put(handlers::update_attendee)
                .delete(handlers::delete_attendee),
        )
        // Presentation routes
        .route(
            "/api/conferences/{conference_id}/presentations",
            get(handlers::list_presentations).post(handlers::create_presentation),
        )
        .route(
            "/api/presentations/{id}",
            get(handlers::get_presentation)
                .put(handlers::update_presentation)
                .delete(handlers::delete_presentation),
        )
        .route(
            "/api/presentations/{id}/approval",
            put(handlers::approve_presentation),
        )
        .route(
            "/api/presentations/{id}/rejection",
            put(handlers::reject_presentation),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
