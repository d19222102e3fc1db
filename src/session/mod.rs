// SPDX-License-Identifier: GPL-3.0-only

//! Camera capture session
//!
//! Layering, top to bottom:
//!
//! ```text
//! +---------------------------------------------+
//! |   CaptureController (controller.rs)         |
//! |   authorization, guard chain, photo slot    |
//! +---------------------------------------------+
//! |   CaptureBackend trait (backend.rs)         |
//! +---------------------------------------------+
//! |   PipeWireSession (pipewire.rs)             |
//! |   GStreamer pipeline + appsink              |
//! +---------------------------------------------+
//! |   XDG portal (authorization.rs)             |
//! +---------------------------------------------+
//! ```
//!
//! The controller is the only type the UI layer talks to. It is cheap to
//! clone and safe to share across tasks.

pub mod authorization;
pub mod backend;
pub mod controller;
pub mod pipewire;
pub mod types;

pub use backend::{get_backend, CaptureBackend};
pub use controller::CaptureController;
pub use types::{
    AuthorizationStatus, BackendError, BackendResult, CameraDevice, CaptureStatus, CapturedImage,
    FrameReceiver, FrameSender, PhotoCallback, PreviewFrame, SessionInput,
};
