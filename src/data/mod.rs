//! Data module - CSV loading and aggregation

mod loader;
mod model;
mod processor;

pub use loader::{DataLoader, LoaderError};
pub use model::GroupedTable;
pub use processor::{DataProcessor, ProcessorError};
