pub mod app_error;
pub mod config_error;

pub use app_error::AppError;
pub use config_error::ConfigError;
