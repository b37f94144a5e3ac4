pub mod config;
pub mod logging;

pub use config::*;
pub use logging::init_logging_from_config;
