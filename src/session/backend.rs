// SPDX-License-Identifier: GPL-3.0-only

//! Capture backend trait
//!
//! The platform camera stack is treated as a capability provider behind this
//! trait so the [`CaptureController`](super::CaptureController) stays
//! testable with a mock implementation.

use super::types::*;
use futures::future::BoxFuture;

/// Platform camera boundary
///
/// Implementations provide authorization, device discovery, session
/// configuration, preview streaming, and delegate-style photo capture.
pub trait CaptureBackend: Send + Sync {
    // ===== Authorization =====

    /// Current permission state for camera access
    fn authorization_status(&self) -> AuthorizationStatus;

    /// Prompt the user for camera access
    ///
    /// May require out-of-band user interaction (a portal dialog); the
    /// returned future suspends the caller instead of blocking a thread.
    /// Resolves `true` when access was granted.
    fn request_access(&self) -> BoxFuture<'static, bool>;

    // ===== Discovery =====

    /// Discover the default capture device, if any
    fn default_device(&self) -> Option<CameraDevice>;

    /// Open an input from a device
    ///
    /// Returns `None` when the device cannot be opened for capture.
    fn open_input(&self, device: &CameraDevice) -> Option<SessionInput>;

    // ===== Session lifecycle =====

    /// Check whether the session can accept this input
    fn can_add_input(&self, input: &SessionInput) -> bool;

    /// Check whether the session can accept a photo output sink
    fn can_add_output(&self) -> bool;

    /// Attach input and photo output under one configuration transaction
    ///
    /// Either the whole configuration commits, or the session is left
    /// unconfigured. A failed configure never leaves a partial session
    /// running. Preview frames are delivered through `frames` once the
    /// session is started.
    fn configure(&mut self, input: SessionInput, frames: FrameSender) -> BackendResult<()>;

    /// Start the configured session
    fn start(&mut self) -> BackendResult<()>;

    /// Stop the session and release the device
    fn stop(&mut self);

    /// Check if the session is configured and running
    fn is_running(&self) -> bool;

    // ===== Capture =====

    /// Request a still photo with default settings
    ///
    /// `on_complete` is invoked exactly once with the encoded image bytes or
    /// an error. Stopping the session completes any outstanding request with
    /// an error rather than dropping it.
    fn take_photo(&self, on_complete: PhotoCallback);
}

/// Get the platform backend (PipeWire via GStreamer)
pub fn get_backend() -> Box<dyn CaptureBackend> {
    Box::new(super::pipewire::PipeWireSession::new())
}
