// SPDX-License-Identifier: MPL-2.0

//! COSMIC Camera Capture - an embeddable photo capture view for the
//! COSMIC desktop environment
//!
//! Presents a live camera preview with a shutter button; a captured
//! photo is frozen for review and delivered to the host through a
//! callback when the user saves it.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: Capture view UI and state
//! - [`session`]: Capture session controller and the PipeWire backend
//! - [`config`]: User configuration handling
//! - [`errors`]: Capture error types
//!
//! # Example
//!
//! ```ignore
//! // This is a GUI component, typically run via:
//! // cosmic-camera-capture
//! ```

pub mod app;
pub mod config;
pub mod constants;
pub mod errors;
pub mod i18n;
pub mod session;

// Re-export commonly used types
pub use app::{
    AppModel, CaptureActivity, CaptureFlags, Labels, Message, PhotoCapturedCallback, ViewState,
};
pub use config::Config;
pub use errors::CaptureError;
pub use session::{CaptureController, CaptureStatus, CapturedImage};
