pub mod config;
pub mod logging;
pub mod paths;

pub mod content_log;
pub mod estimator;
pub mod format;
pub mod library;
pub mod locate;
pub mod manifest;
pub mod monitor;
pub mod record;
pub mod staging;
