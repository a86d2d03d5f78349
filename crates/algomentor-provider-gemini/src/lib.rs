//! # Algomentor Provider - Gemini
//!
//! Google Gemini completion client for the helper runtime.

mod client;
mod types;

pub use client::{GeminiClient, DEFAULT_MODEL};
pub use types::*;
