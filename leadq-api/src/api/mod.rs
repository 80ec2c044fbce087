//! HTTP API handlers for leadq-api

pub mod docs;
pub mod events;
pub mod health;
pub mod leads;

pub use docs::docs_routes;
pub use events::event_routes;
pub use health::health_routes;
pub use leads::lead_routes;
