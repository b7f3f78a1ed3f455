/// Command-line parsing and batch file processing
pub mod cli;
/// Shared constants and defaults
pub mod configuration;
/// Error types for input parsing and the reordering pipeline
pub mod error;
/// PNG preview export
pub mod image;
/// ASCII graymap reading and writing
pub mod pgm;
/// Terminal progress display for batch runs
pub mod progress;
