//! Database schema, seed import and typed accessors

pub mod events;
pub mod init;
pub mod leads;
pub mod models;
pub mod seed;

pub use events::{count_events, get_event, record_event};
pub use init::{create_schema, init_database};
pub use leads::{count_leads, list_leads, LeadFilter};
pub use models::{Event, Lead, NewEvent};
pub use seed::{seed_leads_from_csv, SeedOutcome, SkipReason};
