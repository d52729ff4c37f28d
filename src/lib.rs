//! In-memory bookkeeping units: word counts, inventory, sales totals, task
//! status and a toy authenticator. The units share nothing; each tracker owns
//! its state exclusively and is meant for a single caller at a time.

pub mod auth;
pub mod config;
pub mod error;
pub mod inventory;
pub mod sales;
pub mod tasks;
pub mod text;
pub mod types;

pub use error::TrackerError;
