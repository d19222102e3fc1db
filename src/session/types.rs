// SPDX-License-Identifier: GPL-3.0-only
// Shared types for the capture session layer

//! Shared types for capture backends and the session controller

use std::sync::Arc;
use std::time::Instant;

/// OS-level permission state for camera access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthorizationStatus {
    /// Permission has never been requested
    #[default]
    NotDetermined,
    /// Access blocked by system policy, prompting is pointless
    Restricted,
    /// The user denied access
    Denied,
    /// Access granted
    Authorized,
}

/// Capture session status published to the view layer
///
/// Starts `Initializing`. Becomes `NotAvailable` when permission is denied
/// or any configuration step fails, `Ready` once the session is configured
/// and running. There is no transition out of `NotAvailable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureStatus {
    /// Permission denied or no usable camera
    NotAvailable,
    /// Authorization and session configuration in progress
    #[default]
    Initializing,
    /// Session configured and streaming
    Ready,
}

/// A camera device discovered on the system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    pub name: String,
    /// Capture node path (PipeWire node id). Empty = let PipeWire auto-select.
    pub path: String,
}

/// An input opened from a device, ready to be attached to a session
#[derive(Debug, Clone)]
pub struct SessionInput {
    pub device: CameraDevice,
}

/// A single RGBA frame from the live preview stream
#[derive(Clone)]
pub struct PreviewFrame {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA pixels (`width * height * 4` bytes)
    pub data: Arc<[u8]>,
    /// When the frame left the pipeline (latency diagnostics)
    pub captured_at: Instant,
}

impl std::fmt::Debug for PreviewFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PreviewFrame({}x{}, {} bytes)",
            self.width,
            self.height,
            self.data.len()
        )
    }
}

/// A decoded still photo
///
/// Owned by the controller until handed to the view, then by the host
/// application once passed through the save callback.
#[derive(Clone)]
pub struct CapturedImage {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA pixels
    pub data: Arc<[u8]>,
}

impl PartialEq for CapturedImage {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && (Arc::ptr_eq(&self.data, &other.data) || self.data == other.data)
    }
}

impl Eq for CapturedImage {}

impl std::fmt::Debug for CapturedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CapturedImage({}x{}, {} bytes)",
            self.width,
            self.height,
            self.data.len()
        )
    }
}

/// Frame sender type for preview streams
pub type FrameSender = futures::channel::mpsc::Sender<PreviewFrame>;

/// Frame receiver type for preview streams
pub type FrameReceiver = futures::channel::mpsc::Receiver<PreviewFrame>;

/// Completion callback for a photo request
///
/// Mirrors the delegate contract of the platform photo output: invoked at
/// most once, with encoded image bytes, an error, or neither (which the
/// controller maps to [`CaptureError::FailedToCreateImage`]).
///
/// [`CaptureError::FailedToCreateImage`]: crate::errors::CaptureError
pub type PhotoCallback = Box<dyn FnOnce(Option<Vec<u8>>, Option<BackendError>) + Send>;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Error types for backend operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Backend is not available on this system
    NotAvailable(String),
    /// Failed to initialize the session pipeline
    InitializationFailed(String),
    /// Camera device not found
    DeviceNotFound(String),
    /// Photo capture failed
    CaptureFailed(String),
    /// Other errors
    Other(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::NotAvailable(msg) => write!(f, "Backend not available: {}", msg),
            BackendError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            BackendError::DeviceNotFound(msg) => write!(f, "Device not found: {}", msg),
            BackendError::CaptureFailed(msg) => write!(f, "Capture failed: {}", msg),
            BackendError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}
