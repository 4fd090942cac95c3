pub mod dispatcher;
pub mod http;
pub mod message;
pub mod mock;
pub mod provider;
pub mod templates;

pub use dispatcher::{DispatchReceipt, EmailDispatcher};
pub use http::HttpEmailDispatcher;
pub use message::{ContactEmail, EmailMessage, LeadEmail, ReportEmail};
pub use mock::MockEmailDispatcher;
pub use provider::{ProviderDispatcher, ProviderSettings};
