//! HTTP adapter for the calling platform's agent API.

pub mod client;

pub use client::{PlatformClient, PlatformClientConfig};
