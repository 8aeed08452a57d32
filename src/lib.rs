pub mod api;
pub mod app;
pub mod config;
pub mod container;
pub mod converter;
pub mod error;
pub mod rpl;

pub use converter::RplConverter;
pub use error::ConversionError;
