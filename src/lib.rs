//! Property search, gated report aggregation and lead capture.

pub mod catalog;
pub mod config;
pub mod email;
pub mod error;
pub mod gate;
pub mod lead;
pub mod models;
pub mod report;
pub mod search;
pub mod view;

pub use config::Config;
pub use error::{DetailError, DispatchError, FieldError, LeadError};
