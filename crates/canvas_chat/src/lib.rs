//! # canvas_chat - Conversational Client Core
//!
//! This crate implements the message composition and delivery pipeline for
//! a multi-modal chat client:
//! - In-memory conversation log (single source of truth for display)
//! - Composer state for staged text, images and one audio clip
//! - Single-flight send coordination with an optimistic typing placeholder
//! - Multi-part request/response lifecycle with timeout and classified failures
//!
//! ## Key Guarantees
//!
//! - **Single-flight**: at most one send operation is in flight; a second
//!   send while one is running is dropped, not queued
//! - **Fixed ordering**: a multi-modal send always drains as text, then
//!   images in selection order, then audio
//! - **No limbo**: every send operation terminates in a success resolution
//!   or an in-conversation failure message - the placeholder is never left
//!   pending and the guard is never left held
//! - **Session-scoped**: no persistence; the log lives and dies with the
//!   coordinator instance
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────┐  take()   ┌──────────────────┐  deliver()  ┌───────────────────┐
//! │ ComposerDraft  │──────────▶│ SendCoordinator  │────────────▶│ TransportGateway  │
//! └────────────────┘           └────────┬─────────┘             └───────────────────┘
//!                                       │ append / placeholder / resolve
//!                                       ▼
//!                              ┌──────────────────┐   notify    ┌───────────────────┐
//!                              │ ConversationLog  │────────────▶│   presentation    │
//!                              └──────────────────┘             └───────────────────┘
//! ```

pub mod composer;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod gateway;
pub mod http;
pub mod ids;
pub mod log;
pub mod types;

pub use composer::*;
pub use config::*;
pub use coordinator::*;
pub use error::*;
pub use gateway::*;
pub use http::*;
pub use ids::*;
pub use log::*;
pub use types::*;
