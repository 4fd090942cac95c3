pub mod memory;
pub mod seed;
pub mod traits;

pub use memory::{CatalogData, InMemoryCatalog, SuburbEntry};
pub use traits::PropertyCatalog;
