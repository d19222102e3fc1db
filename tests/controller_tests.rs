// SPDX-License-Identifier: MPL-2.0

//! Integration tests for the capture session controller
//!
//! Drives a `CaptureController` over a scriptable mock backend covering
//! authorization outcomes, the session guard chain, and the photo
//! capture completion contract.

use cosmic_camera_capture::errors::CaptureError;
use cosmic_camera_capture::session::{
    AuthorizationStatus, BackendError, BackendResult, CameraDevice, CaptureBackend,
    CaptureController, CaptureStatus, FrameSender, PhotoCallback, SessionInput,
};
use futures::future::BoxFuture;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How a mock photo request completes
#[derive(Clone)]
enum Completion {
    /// Complete immediately with these bytes
    Bytes(Vec<u8>),
    /// Complete immediately with neither data nor error
    NoData,
    /// Complete immediately with an error
    Error(BackendError),
    /// Park the callback until the test releases it
    Hold,
}

struct MockState {
    authorization: AuthorizationStatus,
    grant_on_request: bool,
    access_requests: u32,
    device: Option<CameraDevice>,
    accepts_input: bool,
    accepts_output: bool,
    configure_fails: bool,
    configure_calls: u32,
    start_fails: bool,
    start_calls: u32,
    running: bool,
    completion: Completion,
    held: Option<PhotoCallback>,
}

#[derive(Clone)]
struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                authorization: AuthorizationStatus::Authorized,
                grant_on_request: true,
                access_requests: 0,
                device: Some(CameraDevice {
                    name: "Mock Camera".to_string(),
                    path: "/dev/mock0".to_string(),
                }),
                accepts_input: true,
                accepts_output: true,
                configure_fails: false,
                configure_calls: 0,
                start_fails: false,
                start_calls: 0,
                running: false,
                completion: Completion::NoData,
                held: None,
            })),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut MockState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    /// Take the parked photo callback, if the backend is holding one
    fn take_held(&self) -> Option<PhotoCallback> {
        self.state.lock().unwrap().held.take()
    }
}

impl CaptureBackend for MockBackend {
    fn authorization_status(&self) -> AuthorizationStatus {
        self.state.lock().unwrap().authorization
    }

    fn request_access(&self) -> BoxFuture<'static, bool> {
        let state = Arc::clone(&self.state);
        Box::pin(async move {
            let mut state = state.lock().unwrap();
            state.access_requests += 1;
            state.authorization = if state.grant_on_request {
                AuthorizationStatus::Authorized
            } else {
                AuthorizationStatus::Denied
            };
            state.grant_on_request
        })
    }

    fn default_device(&self) -> Option<CameraDevice> {
        self.state.lock().unwrap().device.clone()
    }

    fn open_input(&self, device: &CameraDevice) -> Option<SessionInput> {
        Some(SessionInput {
            device: device.clone(),
        })
    }

    fn can_add_input(&self, _input: &SessionInput) -> bool {
        self.state.lock().unwrap().accepts_input
    }

    fn can_add_output(&self) -> bool {
        self.state.lock().unwrap().accepts_output
    }

    fn configure(&mut self, _input: SessionInput, _frames: FrameSender) -> BackendResult<()> {
        let mut state = self.state.lock().unwrap();
        state.configure_calls += 1;
        if state.configure_fails {
            Err(BackendError::InitializationFailed("mock failure".to_string()))
        } else {
            Ok(())
        }
    }

    fn start(&mut self) -> BackendResult<()> {
        let mut state = self.state.lock().unwrap();
        state.start_calls += 1;
        if state.start_fails {
            Err(BackendError::Other("mock start failure".to_string()))
        } else {
            state.running = true;
            Ok(())
        }
    }

    fn stop(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.running = false;
        if let Some(held) = state.held.take() {
            held(None, Some(BackendError::Other("session stopped".to_string())));
        }
    }

    fn is_running(&self) -> bool {
        self.state.lock().unwrap().running
    }

    fn take_photo(&self, on_complete: PhotoCallback) {
        let completion = self.state.lock().unwrap().completion.clone();
        match completion {
            Completion::Bytes(bytes) => on_complete(Some(bytes), None),
            Completion::NoData => on_complete(None, None),
            Completion::Error(err) => on_complete(None, Some(err)),
            Completion::Hold => {
                self.state.lock().unwrap().held = Some(on_complete);
            }
        }
    }
}

fn controller_over(mock: &MockBackend) -> CaptureController {
    CaptureController::with_backend(Box::new(mock.clone()))
}

fn frame_sender() -> FrameSender {
    futures::channel::mpsc::channel(4).0
}

/// Encode a small real PNG so the controller's decode path is exercised
fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("png encoding failed");
    bytes
}

/// Wait up to a second for the mock to park a callback
async fn wait_for_held(mock: &MockBackend) -> PhotoCallback {
    for _ in 0..100 {
        if let Some(held) = mock.take_held() {
            return held;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("backend never received the photo request");
}

#[tokio::test]
async fn test_authorized_session_becomes_ready() {
    let mock = MockBackend::new();
    let controller = controller_over(&mock);

    let status = controller.configure_session(frame_sender()).await;
    assert_eq!(status, CaptureStatus::Ready);
    assert_eq!(controller.status(), CaptureStatus::Ready);
    assert!(mock.with(|s| s.running));
    // No prompt when access is already authorized
    assert_eq!(mock.with(|s| s.access_requests), 0);
}

#[tokio::test]
async fn test_denied_authorization_resolves_not_available() {
    let mock = MockBackend::new();
    mock.with(|s| s.authorization = AuthorizationStatus::Denied);
    let controller = controller_over(&mock);

    let status = controller.configure_session(frame_sender()).await;
    assert_eq!(status, CaptureStatus::NotAvailable);
    // A denied status never triggers the prompt
    assert_eq!(mock.with(|s| s.access_requests), 0);
    assert_eq!(mock.with(|s| s.configure_calls), 0);
}

#[tokio::test]
async fn test_restricted_authorization_resolves_not_available() {
    let mock = MockBackend::new();
    mock.with(|s| s.authorization = AuthorizationStatus::Restricted);
    let controller = controller_over(&mock);

    let status = controller.configure_session(frame_sender()).await;
    assert_eq!(status, CaptureStatus::NotAvailable);
    assert_eq!(mock.with(|s| s.access_requests), 0);
}

#[tokio::test]
async fn test_undetermined_authorization_prompts_and_proceeds() {
    let mock = MockBackend::new();
    mock.with(|s| s.authorization = AuthorizationStatus::NotDetermined);
    let controller = controller_over(&mock);

    let status = controller.configure_session(frame_sender()).await;
    assert_eq!(status, CaptureStatus::Ready);
    assert_eq!(mock.with(|s| s.access_requests), 1);
}

#[tokio::test]
async fn test_undetermined_authorization_refused() {
    let mock = MockBackend::new();
    mock.with(|s| {
        s.authorization = AuthorizationStatus::NotDetermined;
        s.grant_on_request = false;
    });
    let controller = controller_over(&mock);

    let status = controller.configure_session(frame_sender()).await;
    assert_eq!(status, CaptureStatus::NotAvailable);
    assert_eq!(mock.with(|s| s.access_requests), 1);
    assert_eq!(mock.with(|s| s.configure_calls), 0);
}

#[tokio::test]
async fn test_missing_device_resolves_not_available() {
    let mock = MockBackend::new();
    mock.with(|s| s.device = None);
    let controller = controller_over(&mock);

    let status = controller.configure_session(frame_sender()).await;
    assert_eq!(status, CaptureStatus::NotAvailable);
    assert_eq!(mock.with(|s| s.configure_calls), 0);
}

#[tokio::test]
async fn test_rejected_input_resolves_not_available() {
    let mock = MockBackend::new();
    mock.with(|s| s.accepts_input = false);
    let controller = controller_over(&mock);

    let status = controller.configure_session(frame_sender()).await;
    assert_eq!(status, CaptureStatus::NotAvailable);
    assert_eq!(mock.with(|s| s.configure_calls), 0);
}

#[tokio::test]
async fn test_rejected_output_resolves_not_available() {
    let mock = MockBackend::new();
    mock.with(|s| s.accepts_output = false);
    let controller = controller_over(&mock);

    let status = controller.configure_session(frame_sender()).await;
    assert_eq!(status, CaptureStatus::NotAvailable);
    assert_eq!(mock.with(|s| s.configure_calls), 0);
}

#[tokio::test]
async fn test_configure_failure_resolves_not_available() {
    let mock = MockBackend::new();
    mock.with(|s| s.configure_fails = true);
    let controller = controller_over(&mock);

    let status = controller.configure_session(frame_sender()).await;
    assert_eq!(status, CaptureStatus::NotAvailable);
    assert_eq!(mock.with(|s| s.start_calls), 0);
}

#[tokio::test]
async fn test_start_failure_resolves_not_available() {
    let mock = MockBackend::new();
    mock.with(|s| s.start_fails = true);
    let controller = controller_over(&mock);

    let status = controller.configure_session(frame_sender()).await;
    assert_eq!(status, CaptureStatus::NotAvailable);
}

#[tokio::test]
async fn test_session_resolves_exactly_once() {
    let mock = MockBackend::new();
    mock.with(|s| s.authorization = AuthorizationStatus::NotDetermined);
    let controller = controller_over(&mock);

    assert_eq!(
        controller.configure_session(frame_sender()).await,
        CaptureStatus::Ready
    );
    // A second call returns the resolved status without re-running the
    // guard chain
    assert_eq!(
        controller.configure_session(frame_sender()).await,
        CaptureStatus::Ready
    );
    assert_eq!(mock.with(|s| s.access_requests), 1);
    assert_eq!(mock.with(|s| s.configure_calls), 1);
}

#[tokio::test]
async fn test_not_available_is_terminal() {
    let mock = MockBackend::new();
    mock.with(|s| s.device = None);
    let controller = controller_over(&mock);

    assert_eq!(
        controller.configure_session(frame_sender()).await,
        CaptureStatus::NotAvailable
    );

    // Restoring the device does not revive the session
    mock.with(|s| {
        s.device = Some(CameraDevice {
            name: "Mock Camera".to_string(),
            path: "/dev/mock0".to_string(),
        })
    });
    assert_eq!(
        controller.configure_session(frame_sender()).await,
        CaptureStatus::NotAvailable
    );
    assert_eq!(mock.with(|s| s.configure_calls), 0);
}

#[tokio::test]
async fn test_capture_before_ready_fails() {
    let mock = MockBackend::new();
    let controller = controller_over(&mock);

    let result = controller.capture_photo().await;
    assert!(matches!(result, Err(CaptureError::NotReady)));
}

#[tokio::test]
async fn test_capture_decodes_photo() {
    let mock = MockBackend::new();
    mock.with(|s| s.completion = Completion::Bytes(png_bytes(4, 3)));
    let controller = controller_over(&mock);
    controller.configure_session(frame_sender()).await;

    let image = controller.capture_photo().await.expect("capture failed");
    assert_eq!(image.width, 4);
    assert_eq!(image.height, 3);
    assert_eq!(controller.captured_photo(), Some(image));
}

#[tokio::test]
async fn test_capture_without_data_or_error_fails() {
    let mock = MockBackend::new();
    mock.with(|s| s.completion = Completion::NoData);
    let controller = controller_over(&mock);
    controller.configure_session(frame_sender()).await;

    let result = controller.capture_photo().await;
    assert!(matches!(result, Err(CaptureError::FailedToCreateImage)));
}

#[tokio::test]
async fn test_capture_backend_error_is_surfaced() {
    let mock = MockBackend::new();
    mock.with(|s| {
        s.completion = Completion::Error(BackendError::CaptureFailed("mock".to_string()));
    });
    let controller = controller_over(&mock);
    controller.configure_session(frame_sender()).await;

    let result = controller.capture_photo().await;
    assert!(matches!(
        result,
        Err(CaptureError::Capture(BackendError::CaptureFailed(_)))
    ));
}

#[tokio::test]
async fn test_capture_with_undecodable_data_fails() {
    let mock = MockBackend::new();
    mock.with(|s| s.completion = Completion::Bytes(vec![0u8; 32]));
    let controller = controller_over(&mock);
    controller.configure_session(frame_sender()).await;

    let result = controller.capture_photo().await;
    assert!(matches!(result, Err(CaptureError::FailedToCreateImage)));
}

#[tokio::test]
async fn test_overlapping_capture_is_rejected() {
    let mock = MockBackend::new();
    mock.with(|s| s.completion = Completion::Hold);
    let controller = controller_over(&mock);
    controller.configure_session(frame_sender()).await;

    let first_controller = controller.clone();
    let first = tokio::spawn(async move { first_controller.capture_photo().await });

    let held = wait_for_held(&mock).await;

    // A second capture while the first is pending fails fast
    let second = controller.capture_photo().await;
    assert!(matches!(second, Err(CaptureError::CaptureInProgress)));

    // The first capture still resolves normally once the backend completes
    held(Some(png_bytes(2, 2)), None);
    let image = first
        .await
        .expect("capture task panicked")
        .expect("first capture failed");
    assert_eq!(image.width, 2);
}

#[tokio::test]
async fn test_capture_allowed_again_after_completion() {
    let mock = MockBackend::new();
    mock.with(|s| s.completion = Completion::Bytes(png_bytes(2, 2)));
    let controller = controller_over(&mock);
    controller.configure_session(frame_sender()).await;

    controller.capture_photo().await.expect("first capture failed");
    controller
        .capture_photo()
        .await
        .expect("second capture failed");
}

#[tokio::test]
async fn test_stop_resolves_pending_capture() {
    let mock = MockBackend::new();
    mock.with(|s| s.completion = Completion::Hold);
    let controller = controller_over(&mock);
    controller.configure_session(frame_sender()).await;

    let pending_controller = controller.clone();
    let pending = tokio::spawn(async move { pending_controller.capture_photo().await });

    // Wait for the backend to park the callback, then put it back so
    // stop() finds it
    let held = wait_for_held(&mock).await;
    mock.with(|s| s.held = Some(held));

    controller.stop();
    assert!(!mock.with(|s| s.running));

    let result = pending.await.expect("capture task panicked");
    assert!(matches!(result, Err(CaptureError::Capture(_))));
}
