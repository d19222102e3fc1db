// SPDX-License-Identifier: GPL-3.0-only

//! Camera access through the XDG desktop portal
//!
//! Talks to `org.freedesktop.portal.Camera` over the session bus. When no
//! portal is present (plain X11 sessions, containers without a portal) we
//! treat access as granted and let PipeWire itself reject the stream.

use std::collections::HashMap;
use futures::StreamExt;
use tracing::{debug, info, warn};
use zbus::zvariant::{OwnedObjectPath, OwnedValue, Value};

const PORTAL_SERVICE: &str = "org.freedesktop.portal.Desktop";
const PORTAL_PATH: &str = "/org/freedesktop/portal/desktop";
const HANDLE_TOKEN: &str = "cosmic_camera_capture";

#[zbus::proxy(
    interface = "org.freedesktop.portal.Camera",
    default_service = "org.freedesktop.portal.Desktop",
    default_path = "/org/freedesktop/portal/desktop"
)]
trait Camera {
    fn access_camera(
        &self,
        options: HashMap<&str, Value<'_>>,
    ) -> zbus::Result<OwnedObjectPath>;

    #[zbus(property)]
    fn is_camera_present(&self) -> zbus::Result<bool>;
}

/// Ask the desktop portal for camera access.
///
/// Returns `true` when access is granted, and also when no portal is
/// reachable so that portal-less sessions still work.
pub async fn request_camera_access() -> bool {
    match request_via_portal().await {
        Ok(granted) => {
            info!(granted, "Camera portal responded");
            granted
        }
        Err(err) => {
            info!(error = %err, "Camera portal unavailable, assuming access is granted");
            true
        }
    }
}

async fn request_via_portal() -> zbus::Result<bool> {
    let connection = zbus::Connection::session().await?;
    let camera = CameraProxy::new(&connection).await?;

    match camera.is_camera_present().await {
        Ok(present) => debug!(present, "Portal camera presence"),
        Err(err) => debug!(error = %err, "Could not query camera presence"),
    }

    // The portal replies on a Request object whose path is derived from our
    // unique bus name and the handle token. Subscribe there before calling
    // AccessCamera so the response cannot be missed.
    let request_path = expected_request_path(&connection)?;
    let request = zbus::Proxy::new(
        &connection,
        PORTAL_SERVICE,
        request_path.as_str(),
        "org.freedesktop.portal.Request",
    )
    .await?;
    let mut responses = request.receive_signal("Response").await?;

    let mut options = HashMap::new();
    options.insert("handle_token", Value::from(HANDLE_TOKEN));
    let handle = camera.access_camera(options).await?;

    if handle.as_str() != request_path {
        // Older portals return a different handle than the token-derived
        // path; re-subscribe on the returned one
        debug!(handle = %handle, "Portal returned a different request path");
        let request = zbus::Proxy::new(
            &connection,
            PORTAL_SERVICE,
            handle.as_str().to_owned(),
            "org.freedesktop.portal.Request",
        )
        .await?;
        responses = request.receive_signal("Response").await?;
    }

    let Some(message) = responses.next().await else {
        warn!("Portal request closed without a response");
        return Ok(false);
    };

    let (code, _results): (u32, HashMap<String, OwnedValue>) = message.body().deserialize()?;
    debug!(code, "Portal access response");

    // 0 = granted, 1 = cancelled by the user, 2 = other failure
    Ok(code == 0)
}

fn expected_request_path(connection: &zbus::Connection) -> zbus::Result<String> {
    let unique = connection
        .unique_name()
        .ok_or_else(|| zbus::Error::Failure("connection has no unique name".to_string()))?;
    let sender = unique.as_str().trim_start_matches(':').replace('.', "_");
    Ok(format!(
        "{}/request/{}/{}",
        PORTAL_PATH, sender, HANDLE_TOKEN
    ))
}
