//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - JSON or pretty console output on stderr
//! - Optional rolling JSON log files
//! - Secret scrubbing

pub mod logger;
pub mod secret_scrubbing;

pub use logger::{parse_log_level, LoggerImpl};
pub use secret_scrubbing::{redact_token, scrub_secrets, ScrubbingMakeWriter, SecretScrubber};
