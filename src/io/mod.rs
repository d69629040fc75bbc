/// Command-line interface and batch processing
pub mod cli;
/// Defaults and generation configuration
pub mod configuration;
/// Error types
pub mod error;
/// PNG rendering
pub mod image;
/// Terminal progress bars
pub mod progress;
/// Collapse animation capture
pub mod visualization;
