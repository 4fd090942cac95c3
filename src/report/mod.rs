pub mod aggregator;
pub mod synthesis;

pub use aggregator::Aggregator;
pub use synthesis::{SynthesisMode, Synthesizer};
