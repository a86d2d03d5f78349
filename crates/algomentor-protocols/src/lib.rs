//! # Algomentor Protocols
//!
//! Core definitions for the Algomentor helper runtime.
//! Contains the shared data model, trait seams, and error taxonomy -
//! no implementations.
//!
//! ## Trait seams
//!
//! - [`KeyValueStore`] - durable key-value storage
//! - [`CompletionProvider`] - remote completion API
//! - [`WidgetSurface`] - host-page widget rendering

pub mod error;
pub mod provider;
pub mod store;
pub mod surface;
pub mod types;

pub use error::{CompletionError, StoreError};
pub use provider::{CompletionPayload, CompletionProvider, GenerationSettings, TranscriptTurn, TurnRole};
pub use store::KeyValueStore;
pub use surface::WidgetSurface;
pub use types::*;
