// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! The main `update()` function routes each message to a focused handler
//! method, keeping the dispatcher itself short.

use crate::app::state::{AppModel, Message};
use crate::config::Config;
use crate::constants::ui;
use crate::errors::CaptureError;
use crate::session::{CaptureStatus, CapturedImage, PreviewFrame};
use cosmic::Task;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

impl AppModel {
    /// Main message handler - routes messages to handler methods
    pub fn update(&mut self, message: Message) -> Task<cosmic::Action<Message>> {
        match message {
            Message::SessionStatus(status) => self.handle_session_status(status),
            Message::PreviewFrame(frame) => self.handle_preview_frame(frame),
            Message::Capture => self.handle_capture(),
            Message::PhotoCaptured(result) => self.handle_photo_captured(result),
            Message::ClearCaptureAnimation => {
                self.capture_activity.animation_done();
                Task::none()
            }
            Message::DismissCaptureError => {
                self.capture_error = None;
                Task::none()
            }
            Message::Discard => {
                self.view_state.discard();
                Task::none()
            }
            Message::Save => self.handle_save(),
            Message::Cancel => self.handle_cancel(),
            Message::UpdateConfig(config) => self.handle_update_config(config),
        }
    }

    fn handle_update_config(&mut self, config: Config) -> Task<cosmic::Action<Message>> {
        let theme_changed = self.config.app_theme != config.app_theme;
        self.config = config;

        if theme_changed {
            info!(theme = ?self.config.app_theme, "Applying application theme");
            return cosmic::command::set_theme(self.config.app_theme.theme());
        }
        Task::none()
    }

    fn handle_session_status(&mut self, status: CaptureStatus) -> Task<cosmic::Action<Message>> {
        info!(status = ?status, "Capture session status");
        self.status = status;
        Task::none()
    }

    fn handle_preview_frame(
        &mut self,
        frame: Arc<PreviewFrame>,
    ) -> Task<cosmic::Action<Message>> {
        self.current_frame = Some(frame);
        Task::none()
    }

    fn handle_capture(&mut self) -> Task<cosmic::Action<Message>> {
        // Capture only runs against a ready session while the live preview
        // is showing, and never while another capture is in flight
        if self.status != CaptureStatus::Ready {
            debug!(status = ?self.status, "Capture ignored, session not ready");
            return Task::none();
        }
        if self.capture_activity.is_capturing() || !self.view_state.is_live_preview() {
            debug!("Capture ignored, capture or review already in progress");
            return Task::none();
        }

        self.capture_activity.press();

        let controller = self.controller.clone();
        let capture = Task::perform(
            async move { controller.capture_photo().await },
            |result| cosmic::Action::App(Message::PhotoCaptured(result)),
        );

        let animation = Task::perform(
            tokio::time::sleep(Duration::from_millis(ui::CAPTURE_ANIMATION_MS)),
            |_| cosmic::Action::App(Message::ClearCaptureAnimation),
        );

        Task::batch([capture, animation])
    }

    fn handle_photo_captured(
        &mut self,
        result: Result<CapturedImage, CaptureError>,
    ) -> Task<cosmic::Action<Message>> {
        self.capture_activity.finish();
        match result {
            Ok(image) => {
                info!(width = image.width, height = image.height, "Photo ready for review");
                self.view_state.photo_taken(image);
            }
            Err(err) => {
                warn!(error = %err, "Photo capture failed");
                self.capture_error = Some(err.to_string());
            }
        }
        Task::none()
    }

    fn handle_save(&mut self) -> Task<cosmic::Action<Message>> {
        if !self.view_state.save(self.on_photo_captured.as_ref()) {
            warn!("Save requested without a photo under review");
            return Task::none();
        }
        self.close_view()
    }

    fn handle_cancel(&mut self) -> Task<cosmic::Action<Message>> {
        info!("Capture cancelled");
        self.close_view()
    }

    fn close_view(&mut self) -> Task<cosmic::Action<Message>> {
        self.controller.stop();
        match self.core.main_window_id() {
            Some(id) => cosmic::iced::window::close(id),
            None => Task::none(),
        }
    }
}
