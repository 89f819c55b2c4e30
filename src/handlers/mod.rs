pub mod attendees;
pub mod conferences;
pub mod locations;
pub mod presentations;
pub mod states;

pub use attendees::*;
pub use conferences::*;
pub use locations::*;
pub use presentations::*;
pub use states::*;

use axum::Json;
use serde_json::{json, Value};

/// `{"deleted": bool}` body shared by every DELETE route.
fn deleted(count: u64) -> Json<Value> {
    Json(json!({ "deleted": count > 0 }))
}
