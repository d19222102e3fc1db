// SPDX-License-Identifier: MPL-2.0

//! Error types for photo capture

use crate::session::BackendError;
use std::fmt;

/// Errors produced while capturing a photo
#[derive(Debug, Clone)]
pub enum CaptureError {
    /// The backend completed but produced no usable image data
    FailedToCreateImage,
    /// A capture is already in flight
    CaptureInProgress,
    /// The session is not ready for capture
    NotReady,
    /// The backend reported a capture error
    Capture(BackendError),
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::FailedToCreateImage => write!(f, "Failed to create image from capture"),
            CaptureError::CaptureInProgress => write!(f, "A capture is already in progress"),
            CaptureError::NotReady => write!(f, "The capture session is not ready"),
            CaptureError::Capture(err) => write!(f, "Capture failed: {}", err),
        }
    }
}

impl std::error::Error for CaptureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CaptureError::Capture(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BackendError> for CaptureError {
    fn from(err: BackendError) -> Self {
        CaptureError::Capture(err)
    }
}
