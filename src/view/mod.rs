//! Headless page controllers: the state a UI would render, without the UI.

pub mod detail;
pub mod render;
pub mod search;
pub mod token;

pub use detail::{DetailState, DetailView, ReportView, DEFAULT_PROMPT_DELAY};
pub use render::{RenderMode, RenderPlan, Section, SectionView};
pub use search::{SearchOutcome, SearchSession, SearchState, DEFAULT_DEBOUNCE};
pub use token::{LatestRequest, RequestToken};
