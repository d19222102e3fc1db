// SPDX-License-Identifier: GPL-3.0-only

//! Application state management

use crate::config::Config;
use crate::errors::CaptureError;
use crate::fl;
use crate::session::{CaptureController, CaptureStatus, CapturedImage, PreviewFrame};
use cosmic::cosmic_config;
use std::sync::Arc;

/// Callback invoked when a captured photo is accepted
pub type PhotoCapturedCallback = Arc<dyn Fn(CapturedImage) + Send + Sync>;

/// Localized labels for the capture UI
#[derive(Clone, Debug)]
pub struct Labels {
    pub save: String,
    pub cancel: String,
    pub initializing: String,
    pub not_available: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            save: fl!("save"),
            cancel: fl!("cancel"),
            initializing: fl!("initializing-camera"),
            not_available: fl!("camera-not-available"),
        }
    }
}

/// Startup flags for the capture view
#[derive(Default)]
pub struct CaptureFlags {
    /// UI labels; defaults are the bundled localizations
    pub labels: Labels,
    /// Called exactly once per accepted photo
    pub on_photo_captured: Option<PhotoCapturedCallback>,
}

/// Shutter activity state machine
///
/// A capture stays in flight until the controller resolves it; the press
/// animation is a short visual phase at the start of that window. The
/// shutter button re-enables only when the capture finishes, not when the
/// animation does.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CaptureActivity {
    /// No capture in flight
    #[default]
    Idle,
    /// Capture in flight, press animation still playing
    Animating,
    /// Capture in flight, press animation finished
    Pending,
}

impl CaptureActivity {
    /// Check if a capture is in flight
    pub fn is_capturing(&self) -> bool {
        !matches!(self, CaptureActivity::Idle)
    }

    /// Check if the press animation is playing
    pub fn is_animating(&self) -> bool {
        matches!(self, CaptureActivity::Animating)
    }

    /// A capture was issued
    pub fn press(&mut self) {
        *self = CaptureActivity::Animating;
    }

    /// The press animation timer fired
    ///
    /// Only ends the visual phase; a capture still awaiting its result
    /// stays in flight.
    pub fn animation_done(&mut self) {
        if matches!(self, CaptureActivity::Animating) {
            *self = CaptureActivity::Pending;
        }
    }

    /// The capture resolved, successfully or not
    pub fn finish(&mut self) {
        *self = CaptureActivity::Idle;
    }
}

/// What the main surface is showing
///
/// Two-state design: either the live preview or a frozen captured photo
/// awaiting the user's save/discard decision.
#[derive(Debug, Default)]
pub enum ViewState {
    /// Showing the live camera preview
    #[default]
    LivePreview,
    /// Showing a captured photo pending confirmation
    CapturedPhoto(CapturedImage),
}

impl ViewState {
    /// Check if the live preview is showing
    pub fn is_live_preview(&self) -> bool {
        matches!(self, ViewState::LivePreview)
    }

    /// A photo can be saved only while one is being reviewed
    pub fn can_save(&self) -> bool {
        matches!(self, ViewState::CapturedPhoto(_))
    }

    /// Freeze the view on a captured photo
    pub fn photo_taken(&mut self, image: CapturedImage) {
        *self = ViewState::CapturedPhoto(image);
    }

    /// Drop the reviewed photo and return to the live preview
    pub fn discard(&mut self) {
        *self = ViewState::LivePreview;
    }

    /// Deliver the reviewed photo through `callback` and return to the live
    /// preview. Returns `true` if a photo was delivered.
    ///
    /// Taking the image out of the state guarantees the callback fires at
    /// most once per captured photo.
    pub fn save(&mut self, callback: Option<&PhotoCapturedCallback>) -> bool {
        match std::mem::take(self) {
            ViewState::LivePreview => false,
            ViewState::CapturedPhoto(image) => {
                if let Some(callback) = callback {
                    callback(image);
                }
                true
            }
        }
    }
}

/// Main application state
pub struct AppModel {
    /// COSMIC runtime core
    pub core: cosmic::Core,
    /// Persistent configuration
    pub config: Config,
    pub config_handler: Option<cosmic_config::Config>,
    /// Capture session controller shared with async tasks
    pub controller: CaptureController,
    /// Session status as last published by the subscription
    pub status: CaptureStatus,
    /// Latest preview frame
    pub current_frame: Option<Arc<PreviewFrame>>,
    /// Live preview or captured photo review
    pub view_state: ViewState,
    /// Shutter activity, gates the capture button
    pub capture_activity: CaptureActivity,
    /// Error text shown in a dialog, if any
    pub capture_error: Option<String>,
    /// Localized UI labels
    pub labels: Labels,
    /// Host callback for accepted photos
    pub on_photo_captured: Option<PhotoCapturedCallback>,
}

/// All messages the capture view handles
#[derive(Clone, Debug)]
pub enum Message {
    /// The session resolved to Ready or NotAvailable
    SessionStatus(CaptureStatus),
    /// A new preview frame arrived
    PreviewFrame(Arc<PreviewFrame>),
    /// The capture button was pressed
    Capture,
    /// A capture completed
    PhotoCaptured(Result<CapturedImage, CaptureError>),
    /// The shutter animation finished
    ClearCaptureAnimation,
    /// The capture error dialog was dismissed
    DismissCaptureError,
    /// Discard the reviewed photo
    Discard,
    /// Accept the reviewed photo
    Save,
    /// Dismiss the capture view without a photo
    Cancel,
    /// Configuration changed on disk
    UpdateConfig(Config),
}
