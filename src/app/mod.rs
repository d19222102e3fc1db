// SPDX-License-Identifier: MPL-2.0

//! Capture view application
//!
//! This module contains the application state, message handling, and UI
//! for the photo capture view.
//!
//! # Architecture
//!
//! - `state`: Application state types (AppModel, Message, ViewState)
//! - `preview`: Preview surface (live frames, placeholders, review)
//! - `controls`: Cancel, shutter, and save controls
//! - `view`: Main view composition
//! - `update`: Message handling
//!
//! The session itself runs in a subscription: the controller configures
//! and starts the capture session once, then forwards preview frames to
//! the UI for as long as the view is alive.

mod controls;
mod preview;
mod state;
mod update;
mod view;

use crate::config::Config;
use crate::constants::pipeline;
use crate::fl;
use crate::session::{CaptureController, CaptureStatus};
use cosmic::cosmic_config::{self, CosmicConfigEntry};
use cosmic::iced::Subscription;
use cosmic::widget;
use cosmic::{Element, Task};
pub use state::{
    AppModel, CaptureActivity, CaptureFlags, Labels, Message, PhotoCapturedCallback, ViewState,
};
use std::sync::Arc;
use tracing::{debug, error, info};

impl cosmic::Application for AppModel {
    /// The async executor that will be used to run your application's commands.
    type Executor = cosmic::executor::Default;

    /// Data that your application receives to its init method.
    type Flags = CaptureFlags;

    /// Messages which the application and its widgets will emit.
    type Message = Message;

    /// Unique identifier in RDNN (reverse domain name notation) format.
    const APP_ID: &'static str = "io.github.cosmic-utils.cosmic-camera-capture";

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    /// Initializes the application with any given flags and startup commands.
    fn init(core: cosmic::Core, flags: Self::Flags) -> (Self, Task<cosmic::Action<Self::Message>>) {
        // Load configuration
        let (config_handler, config) =
            match cosmic_config::Config::new(Self::APP_ID, Config::VERSION) {
                Ok(handler) => {
                    let config = match Config::get_entry(&handler) {
                        Ok(config) => config,
                        Err((errors, config)) => {
                            error!(?errors, "Errors loading config");
                            config
                        }
                    };
                    (Some(handler), config)
                }
                Err(err) => {
                    error!(%err, "Failed to create config handler");
                    (None, Config::default())
                }
            };

        // Initialize GStreamer early (required before any GStreamer calls)
        if let Err(e) = gstreamer::init() {
            error!(error = %e, "Failed to initialize GStreamer");
        }

        let app = AppModel {
            core,
            config,
            config_handler,
            controller: CaptureController::new(),
            status: CaptureStatus::Initializing,
            current_frame: None,
            view_state: ViewState::default(),
            capture_activity: state::CaptureActivity::default(),
            capture_error: None,
            labels: flags.labels,
            on_photo_captured: flags.on_photo_captured,
        };

        // Apply the configured theme straight away
        let theme_task = cosmic::command::set_theme(app.config.app_theme.theme());

        (app, theme_task)
    }

    /// Describes the interface based on the current state of the application model.
    fn view(&self) -> Element<'_, Self::Message> {
        self.view()
    }

    /// Display a dialog when a capture fails.
    fn dialog(&self) -> Option<Element<'_, Self::Message>> {
        let error = self.capture_error.as_ref()?;

        Some(
            widget::dialog()
                .title(fl!("capture-failed"))
                .body(error.clone())
                .primary_action(
                    widget::button::suggested(fl!("ok")).on_press(Message::DismissCaptureError),
                )
                .into(),
        )
    }

    /// Register subscriptions for this application.
    fn subscription(&self) -> Subscription<Self::Message> {
        use cosmic::iced::futures::{SinkExt, StreamExt};

        let config_sub = self
            .core()
            .watch_config::<Config>(Self::APP_ID)
            .map(|update| Message::UpdateConfig(update.config));

        let controller = self.controller.clone();

        // The session resolves exactly once, so a static id keeps this
        // subscription alive across updates
        let session_sub = Subscription::run_with_id(
            "capture-session",
            cosmic::iced::stream::channel(
                pipeline::PREVIEW_CHANNEL_CAPACITY,
                move |mut output| async move {
                    info!("Capture session subscription started");

                    let (sender, mut receiver) = cosmic::iced::futures::channel::mpsc::channel(
                        pipeline::PREVIEW_CHANNEL_CAPACITY,
                    );

                    let status = controller.configure_session(sender).await;
                    if output.send(Message::SessionStatus(status)).await.is_err() {
                        info!("Session subscription closed before status delivery");
                        return;
                    }

                    if status != CaptureStatus::Ready {
                        info!(status = ?status, "Session did not reach ready, no frames to forward");
                        return;
                    }

                    let mut frame_count = 0u64;
                    while let Some(frame) = receiver.next().await {
                        frame_count += 1;

                        if frame_count.is_multiple_of(30) {
                            info!(
                                frame = frame_count,
                                width = frame.width,
                                height = frame.height,
                                latency_ms =
                                    frame.captured_at.elapsed().as_micros() as f64 / 1000.0,
                                "Forwarding preview frame"
                            );
                        }

                        // Use try_send to avoid blocking when the UI is busy;
                        // dropping frames is fine for live preview
                        if let Err(e) = output.try_send(Message::PreviewFrame(Arc::new(frame))) {
                            if e.is_disconnected() {
                                info!("Preview output channel closed");
                                break;
                            }
                            debug!(frame = frame_count, "Preview frame dropped (UI busy)");
                        }
                    }

                    info!("Capture session subscription ended");
                },
            ),
        );

        Subscription::batch([config_sub, session_sub])
    }

    /// Handles messages emitted by the application and its widgets.
    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        self.update(message)
    }
}
