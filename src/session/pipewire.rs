// SPDX-License-Identifier: GPL-3.0-only

//! PipeWire capture session
//!
//! GStreamer pipeline implementation using `pipewiresrc` for camera capture.
//! Preview frames are converted to RGBA and streamed through an appsink;
//! photo requests are serviced from the same stream by encoding the next
//! frame.

use super::authorization;
use super::backend::CaptureBackend;
use super::types::*;
use crate::constants::{pipeline as pipeline_consts, timing};
use futures::future::BoxFuture;
use gstreamer::prelude::*;
use gstreamer_app::AppSink;
use gstreamer_video::VideoInfo;
use std::io::Cursor;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, error, info, warn};

static FRAME_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Pending photo request shared with the appsink callback
type PhotoRequestSlot = Arc<Mutex<Option<PhotoCallback>>>;

/// PipeWire capture session
pub struct PipeWireSession {
    pipeline: Option<gstreamer::Pipeline>,
    appsink: Option<AppSink>,
    photo_request: PhotoRequestSlot,
    authorization: Arc<Mutex<AuthorizationStatus>>,
    running: bool,
}

impl PipeWireSession {
    pub fn new() -> Self {
        Self {
            pipeline: None,
            appsink: None,
            photo_request: Arc::new(Mutex::new(None)),
            authorization: Arc::new(Mutex::new(AuthorizationStatus::NotDetermined)),
            running: false,
        }
    }

    /// Complete an outstanding photo request with an error, if one exists
    fn fail_pending_photo(&self, reason: &str) {
        if let Some(on_complete) = self.photo_request.lock().unwrap().take() {
            warn!(reason, "Completing outstanding photo request with error");
            on_complete(None, Some(BackendError::CaptureFailed(reason.to_string())));
        }
    }
}

impl Default for PipeWireSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureBackend for PipeWireSession {
    fn authorization_status(&self) -> AuthorizationStatus {
        *self.authorization.lock().unwrap()
    }

    fn request_access(&self) -> BoxFuture<'static, bool> {
        let authorization = Arc::clone(&self.authorization);
        Box::pin(async move {
            let granted = authorization::request_camera_access().await;
            *authorization.lock().unwrap() = if granted {
                AuthorizationStatus::Authorized
            } else {
                AuthorizationStatus::Denied
            };
            granted
        })
    }

    fn default_device(&self) -> Option<CameraDevice> {
        debug!("Probing for a default PipeWire camera");

        if let Err(err) = gstreamer::init() {
            warn!(error = %err, "GStreamer init failed");
            return None;
        }

        // pipewiresrc availability is the device probe - PipeWire negotiates
        // the actual camera node at pipeline start
        if gstreamer::ElementFactory::make("pipewiresrc")
            .build()
            .is_err()
        {
            debug!("pipewiresrc not available");
            return None;
        }

        Some(CameraDevice {
            name: "Default Camera (PipeWire)".to_string(),
            path: String::new(), // Empty path = PipeWire auto-selects
        })
    }

    fn open_input(&self, device: &CameraDevice) -> Option<SessionInput> {
        // The node is opened lazily at pipeline start; an input is just the
        // validated device reference
        Some(SessionInput {
            device: device.clone(),
        })
    }

    fn can_add_input(&self, _input: &SessionInput) -> bool {
        self.pipeline.is_none()
    }

    fn can_add_output(&self) -> bool {
        self.pipeline.is_none()
    }

    fn configure(&mut self, input: SessionInput, frames: FrameSender) -> BackendResult<()> {
        info!(device = %input.device.name, "Configuring PipeWire session");

        gstreamer::init().map_err(|e| BackendError::InitializationFailed(e.to_string()))?;

        let source = if input.device.path.is_empty() {
            "pipewiresrc".to_string()
        } else {
            format!("pipewiresrc path={}", input.device.path)
        };

        // Single parse_launch keeps attach-input and attach-output in one
        // transaction: either the whole description builds or nothing runs
        let description = format!(
            "{} ! queue ! videoconvert ! video/x-raw,format=RGBA ! appsink name=sink",
            source
        );

        let pipeline = gstreamer::parse::launch(&description)
            .map_err(|e| BackendError::InitializationFailed(e.to_string()))?
            .downcast::<gstreamer::Pipeline>()
            .map_err(|_| {
                BackendError::InitializationFailed("parsed element is not a pipeline".to_string())
            })?;

        let appsink = pipeline
            .by_name("sink")
            .ok_or_else(|| BackendError::InitializationFailed("failed to get appsink".to_string()))?
            .dynamic_cast::<AppSink>()
            .map_err(|_| BackendError::InitializationFailed("failed to cast appsink".to_string()))?;

        appsink.set_property("emit-signals", true);
        appsink.set_property("sync", false); // Lowest latency for live preview
        appsink.set_property("max-buffers", pipeline_consts::MAX_BUFFERS);
        appsink.set_property("drop", true); // Drop old frames if the UI is slow
        appsink.set_property("enable-last-sample", false);

        let photo_request = Arc::clone(&self.photo_request);
        let frame_sender = frames;

        appsink.set_callbacks(
            gstreamer_app::AppSinkCallbacks::builder()
                .new_sample(move |appsink| {
                    let frame_start = Instant::now();
                    let frame_num = FRAME_COUNTER.fetch_add(1, Ordering::Relaxed);

                    let sample = appsink.pull_sample().map_err(|e| {
                        if frame_num % timing::FRAME_LOG_INTERVAL == 0 {
                            error!(frame = frame_num, error = ?e, "Failed to pull sample");
                        }
                        gstreamer::FlowError::Eos
                    })?;

                    let buffer = sample.buffer().ok_or(gstreamer::FlowError::Error)?;
                    let caps = sample.caps().ok_or(gstreamer::FlowError::Error)?;
                    let video_info =
                        VideoInfo::from_caps(caps).map_err(|_| gstreamer::FlowError::Error)?;
                    let map = buffer
                        .map_readable()
                        .map_err(|_| gstreamer::FlowError::Error)?;

                    let width = video_info.width();
                    let height = video_info.height();
                    let stride = video_info.stride()[0] as u32;

                    let frame = PreviewFrame {
                        width,
                        height,
                        data: packed_rgba(map.as_slice(), width, height, stride),
                        captured_at: frame_start,
                    };

                    // Service a pending photo request from the live stream
                    if let Some(on_complete) = photo_request.lock().unwrap().take() {
                        info!(width, height, "Encoding captured photo");
                        match encode_png(&frame) {
                            Ok(bytes) => on_complete(Some(bytes), None),
                            Err(err) => on_complete(None, Some(err)),
                        }
                    }

                    // Non-blocking send - dropping frames is fine for live
                    // preview, we want the latest frame
                    let mut sender = frame_sender.clone();
                    match sender.try_send(frame) {
                        Ok(_) => {
                            if frame_num % timing::FRAME_LOG_INTERVAL == 0 {
                                debug!(
                                    frame = frame_num,
                                    width,
                                    height,
                                    total_us = frame_start.elapsed().as_micros(),
                                    "Frame forwarded to preview"
                                );
                            }
                        }
                        Err(e) => {
                            if e.is_disconnected() {
                                debug!(frame = frame_num, "Preview channel closed");
                                return Err(gstreamer::FlowError::Eos);
                            }
                            if frame_num % timing::FRAME_LOG_INTERVAL == 0 {
                                debug!(frame = frame_num, "Frame dropped (channel full)");
                            }
                        }
                    }

                    Ok(gstreamer::FlowSuccess::Ok)
                })
                .build(),
        );

        self.appsink = Some(appsink);
        self.pipeline = Some(pipeline);

        info!("PipeWire session configured");
        Ok(())
    }

    fn start(&mut self) -> BackendResult<()> {
        let pipeline = self
            .pipeline
            .as_ref()
            .ok_or_else(|| BackendError::Other("session not configured".to_string()))?;

        debug!("Setting pipeline to PLAYING state");
        pipeline.set_state(gstreamer::State::Playing).map_err(|e| {
            BackendError::InitializationFailed(format!("failed to start pipeline: {}", e))
        })?;

        let (result, state, pending) = pipeline.state(gstreamer::ClockTime::from_seconds(
            timing::START_TIMEOUT_SECS,
        ));
        debug!(result = ?result, state = ?state, pending = ?pending, "Pipeline state");
        if state != gstreamer::State::Playing {
            warn!("Pipeline is not in PLAYING state yet");
        }

        self.running = true;
        info!("PipeWire session started");
        Ok(())
    }

    fn stop(&mut self) {
        info!("Stopping PipeWire session");
        self.running = false;

        self.fail_pending_photo("session stopped");

        if let Some(appsink) = self.appsink.take() {
            // Clear callbacks to release the frame sender
            appsink.set_callbacks(gstreamer_app::AppSinkCallbacks::builder().build());
        }

        if let Some(pipeline) = self.pipeline.take() {
            if let Err(err) = pipeline.set_state(gstreamer::State::Null) {
                warn!(error = %err, "Failed to stop pipeline");
            }
            let (_, state, _) = pipeline.state(gstreamer::ClockTime::from_seconds(
                timing::STOP_TIMEOUT_SECS,
            ));
            info!(state = ?state, "PipeWire session stopped");
        }
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn take_photo(&self, on_complete: PhotoCallback) {
        if !self.running {
            on_complete(
                None,
                Some(BackendError::Other("session not running".to_string())),
            );
            return;
        }

        let mut slot = self.photo_request.lock().unwrap();
        if slot.is_some() {
            // The controller serializes captures; this is a backend-level
            // guard against misuse
            drop(slot);
            on_complete(
                None,
                Some(BackendError::CaptureFailed(
                    "a capture is already pending".to_string(),
                )),
            );
            return;
        }
        *slot = Some(on_complete);
    }
}

impl Drop for PipeWireSession {
    fn drop(&mut self) {
        if self.pipeline.is_some() {
            debug!("Dropping PipeWire session - explicitly stopping");
            self.stop();
        }
    }
}

/// Copy frame data into a tightly packed RGBA buffer, removing row padding
fn packed_rgba(data: &[u8], width: u32, height: u32, stride: u32) -> Arc<[u8]> {
    let row_bytes = width as usize * 4;
    if stride as usize == row_bytes {
        return Arc::from(data);
    }

    let mut packed = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let start = row * stride as usize;
        packed.extend_from_slice(&data[start..start + row_bytes]);
    }
    Arc::from(packed.as_slice())
}

/// Encode an RGBA frame as PNG for the photo completion callback
fn encode_png(frame: &PreviewFrame) -> BackendResult<Vec<u8>> {
    let pixels = frame.data.to_vec();
    let image = image::RgbaImage::from_raw(frame.width, frame.height, pixels)
        .ok_or_else(|| BackendError::CaptureFailed("frame buffer size mismatch".to_string()))?;

    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .map_err(|e| BackendError::CaptureFailed(e.to_string()))?;

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_rgba_strips_row_padding() {
        // 2x2 RGBA with 4 bytes of padding per row
        let stride = 12usize;
        let mut data = vec![0u8; stride * 2];
        for row in 0..2 {
            for col in 0..8 {
                data[row * stride + col] = (row * 8 + col) as u8;
            }
        }

        let packed = packed_rgba(&data, 2, 2, stride as u32);
        assert_eq!(packed.len(), 16);
        assert_eq!(&packed[..8], &[0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(&packed[8..], &[8, 9, 10, 11, 12, 13, 14, 15]);
    }

    #[test]
    fn packed_rgba_keeps_tight_buffers() {
        let data: Vec<u8> = (0..16).collect();
        let packed = packed_rgba(&data, 2, 2, 8);
        assert_eq!(packed.as_ref(), data.as_slice());
    }

    #[test]
    fn encode_png_round_trips_dimensions() {
        let frame = PreviewFrame {
            width: 3,
            height: 2,
            data: Arc::from(vec![128u8; 24].as_slice()),
            captured_at: Instant::now(),
        };

        let bytes = encode_png(&frame).expect("encoding failed");
        let decoded = image::load_from_memory(&bytes).expect("decoding failed");
        assert_eq!(decoded.width(), 3);
        assert_eq!(decoded.height(), 2);
    }
}
