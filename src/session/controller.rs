// SPDX-License-Identifier: GPL-3.0-only

//! Capture session controller
//!
//! Owns the capture backend and drives it through authorization, session
//! configuration, and photo capture. Cloning the controller is cheap; all
//! clones share the same backend and state.

use super::backend::{get_backend, CaptureBackend};
use super::types::*;
use crate::errors::CaptureError;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

type PendingCapture = oneshot::Sender<(Option<Vec<u8>>, Option<BackendError>)>;

/// Controller for a single camera capture session
#[derive(Clone)]
pub struct CaptureController {
    backend: Arc<Mutex<Box<dyn CaptureBackend>>>,
    status: Arc<Mutex<CaptureStatus>>,
    pending: Arc<Mutex<Option<PendingCapture>>>,
    captured_photo: Arc<Mutex<Option<CapturedImage>>>,
}

impl CaptureController {
    pub fn new() -> Self {
        Self::with_backend(get_backend())
    }

    /// Build a controller over a specific backend
    pub fn with_backend(backend: Box<dyn CaptureBackend>) -> Self {
        Self {
            backend: Arc::new(Mutex::new(backend)),
            status: Arc::new(Mutex::new(CaptureStatus::Initializing)),
            pending: Arc::new(Mutex::new(None)),
            captured_photo: Arc::new(Mutex::new(None)),
        }
    }

    /// Current session status
    pub fn status(&self) -> CaptureStatus {
        *self.status.lock().unwrap()
    }

    /// The most recently captured photo, if any
    pub fn captured_photo(&self) -> Option<CapturedImage> {
        self.captured_photo.lock().unwrap().clone()
    }

    /// Resolve camera authorization.
    ///
    /// Returns `true` only when access is (or becomes) authorized. An
    /// undetermined status triggers the system access prompt.
    pub async fn check_authorization(&self) -> bool {
        let status = self.backend.lock().unwrap().authorization_status();
        debug!(status = ?status, "Camera authorization status");

        match status {
            AuthorizationStatus::Authorized => true,
            AuthorizationStatus::NotDetermined => {
                // The future must not hold the backend lock while awaiting
                // the user's answer
                let request = self.backend.lock().unwrap().request_access();
                request.await
            }
            AuthorizationStatus::Denied | AuthorizationStatus::Restricted => false,
        }
    }

    /// Configure and start the capture session.
    ///
    /// Walks the full guard chain: authorization, device discovery, input
    /// attachment, output attachment, then pipeline start. Any failure
    /// resolves the session to [`CaptureStatus::NotAvailable`]; there is no
    /// retry. Preview frames flow through `frames` once the session is
    /// running.
    pub async fn configure_session(&self, frames: FrameSender) -> CaptureStatus {
        let current = self.status();
        if current != CaptureStatus::Initializing {
            // The session resolves exactly once
            debug!(status = ?current, "Session already resolved");
            return current;
        }

        if !self.check_authorization().await {
            warn!("Camera access not authorized");
            return self.resolve(CaptureStatus::NotAvailable);
        }

        let mut backend = self.backend.lock().unwrap();

        let Some(device) = backend.default_device() else {
            warn!("No camera device available");
            drop(backend);
            return self.resolve(CaptureStatus::NotAvailable);
        };
        info!(device = %device.name, "Using camera device");

        let Some(input) = backend.open_input(&device) else {
            warn!(device = %device.name, "Failed to open camera input");
            drop(backend);
            return self.resolve(CaptureStatus::NotAvailable);
        };

        if !backend.can_add_input(&input) || !backend.can_add_output() {
            warn!("Session cannot accept the camera input and photo output");
            drop(backend);
            return self.resolve(CaptureStatus::NotAvailable);
        }

        if let Err(err) = backend.configure(input, frames) {
            warn!(error = %err, "Failed to configure capture session");
            drop(backend);
            return self.resolve(CaptureStatus::NotAvailable);
        }

        if let Err(err) = backend.start() {
            warn!(error = %err, "Failed to start capture session");
            // Tear the configured session back down so nothing partial runs
            backend.stop();
            drop(backend);
            return self.resolve(CaptureStatus::NotAvailable);
        }

        drop(backend);
        info!("Capture session running");
        self.resolve(CaptureStatus::Ready)
    }

    /// Capture a single photo from the running session.
    ///
    /// At most one capture can be in flight; a second call while the first
    /// is still pending fails with [`CaptureError::CaptureInProgress`].
    pub async fn capture_photo(&self) -> Result<CapturedImage, CaptureError> {
        if self.status() != CaptureStatus::Ready {
            return Err(CaptureError::NotReady);
        }

        let (tx, rx) = oneshot::channel();
        {
            let mut pending = self.pending.lock().unwrap();
            if pending.is_some() {
                return Err(CaptureError::CaptureInProgress);
            }
            *pending = Some(tx);
        }

        let pending = Arc::clone(&self.pending);
        let on_complete: PhotoCallback = Box::new(move |data, error| {
            // Taking from the slot guarantees the result is delivered at
            // most once and frees the slot for the next capture
            if let Some(tx) = pending.lock().unwrap().take() {
                let _ = tx.send((data, error));
            }
        });

        self.backend.lock().unwrap().take_photo(on_complete);

        let (data, error) = match rx.await {
            Ok(result) => result,
            Err(_) => {
                // Callback dropped without being invoked
                self.pending.lock().unwrap().take();
                return Err(CaptureError::FailedToCreateImage);
            }
        };

        if let Some(error) = error {
            warn!(error = %error, "Photo capture failed");
            return Err(CaptureError::Capture(error));
        }

        let Some(bytes) = data else {
            warn!("Photo capture completed without data or error");
            return Err(CaptureError::FailedToCreateImage);
        };

        let image = decode_photo(&bytes)?;
        info!(width = image.width, height = image.height, "Photo captured");
        *self.captured_photo.lock().unwrap() = Some(image.clone());
        Ok(image)
    }

    /// Stop the capture session.
    ///
    /// Any in-flight capture is completed with an error so its caller
    /// resolves.
    pub fn stop(&self) {
        self.backend.lock().unwrap().stop();
    }

    fn resolve(&self, status: CaptureStatus) -> CaptureStatus {
        *self.status.lock().unwrap() = status;
        status
    }
}

impl Default for CaptureController {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_photo(bytes: &[u8]) -> Result<CapturedImage, CaptureError> {
    let decoded = image::load_from_memory(bytes).map_err(|err| {
        warn!(error = %err, "Captured photo data did not decode");
        CaptureError::FailedToCreateImage
    })?;

    let rgba = decoded.into_rgba8();
    Ok(CapturedImage {
        width: rgba.width(),
        height: rgba.height(),
        data: Arc::from(rgba.into_raw().as_slice()),
    })
}
