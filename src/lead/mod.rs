pub mod pipeline;
pub mod validation;

pub use pipeline::{LeadPipeline, LeadReceipt, SettlementPolicy};
pub use validation::{is_valid_email, validate_contact, validate_lead};
