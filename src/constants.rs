// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// UI layout constants
pub mod ui {
    /// Capture button outer circle diameter
    pub const CAPTURE_BUTTON_OUTER: f32 = 64.0;

    /// Capture button inner circle diameter
    pub const CAPTURE_BUTTON_INNER: f32 = 48.0;

    /// Capture button border radius (half of outer for circular shape)
    pub const CAPTURE_BUTTON_RADIUS: f32 = 32.0;

    /// Fixed width of the cancel and save control slots, keeps the capture
    /// button centered
    pub const CONTROL_SLOT_WIDTH: f32 = 100.0;

    /// How long the shutter animation dims the capture button
    pub const CAPTURE_ANIMATION_MS: u64 = 150;

    /// Minimum window size
    pub const MIN_WINDOW_WIDTH: f32 = 600.0;
    pub const MIN_WINDOW_HEIGHT: f32 = 400.0;
}

/// GStreamer pipeline configuration
pub mod pipeline {
    /// Maximum buffers queued in the appsink before old frames are dropped
    pub const MAX_BUFFERS: u32 = 2;

    /// Preview frame channel capacity
    pub const PREVIEW_CHANNEL_CAPACITY: usize = 100;
}

/// Timing constants
pub mod timing {
    /// Log a preview statistic every this many frames
    pub const FRAME_LOG_INTERVAL: u64 = 30;

    /// How long to wait for the pipeline to reach PLAYING
    pub const START_TIMEOUT_SECS: u64 = 5;

    /// How long to wait for the pipeline to reach NULL
    pub const STOP_TIMEOUT_SECS: u64 = 2;
}
