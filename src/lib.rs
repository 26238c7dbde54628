pub mod coerce;
pub mod config;
pub mod error;
pub mod key;
pub mod loaders;
pub mod output;
pub mod period;
pub mod premiums;
pub mod readers;
pub mod summary;

pub use config::DataLayout;
pub use error::{IngestError, Result};
pub use period::Period;
