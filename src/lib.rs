pub mod app;
pub mod config;
pub mod encoder;
pub mod enrichment;
pub mod error;
pub mod handlers;
pub mod models;
pub mod store;

pub use app::{build_router, ApiDoc, AppState};
pub use config::Config;
pub use encoder::{encode, Encodable, EncodeError, Encoder, EncoderSpec, Encoders, Record};
pub use error::ApiError;
pub use store::{MemoryStore, PgStore, Store, StoreError};
