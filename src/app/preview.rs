// SPDX-License-Identifier: GPL-3.0-only

//! Preview surface
//!
//! Builds the main surface of the capture view: a localized placeholder
//! while the session is unresolved or unavailable, the mirrored live
//! preview once frames flow, or the frozen captured photo during review.

use crate::app::state::{AppModel, Message, ViewState};
use crate::session::{CaptureStatus, CapturedImage, PreviewFrame};
use cosmic::Element;
use cosmic::iced::{Background, Length};
use cosmic::widget;
use tracing::info;

impl AppModel {
    /// Build the preview surface for the current session and view state
    pub fn build_preview_surface(&self) -> Element<'_, Message> {
        if let ViewState::CapturedPhoto(image) = &self.view_state {
            return captured_photo(image);
        }

        match self.status {
            CaptureStatus::Initializing => placeholder(&self.labels.initializing),
            CaptureStatus::NotAvailable => placeholder(&self.labels.not_available),
            CaptureStatus::Ready => match &self.current_frame {
                Some(frame) => self.live_frame(frame),
                None => blank_surface(),
            },
        }
    }

    fn live_frame(&self, frame: &PreviewFrame) -> Element<'_, Message> {
        static VIEW_FRAME_COUNT: std::sync::atomic::AtomicU64 =
            std::sync::atomic::AtomicU64::new(0);
        let count = VIEW_FRAME_COUNT.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        if count.is_multiple_of(30) {
            info!(
                frame = count,
                width = frame.width,
                height = frame.height,
                "Rendering preview frame"
            );
        }

        let pixels = if self.config.mirror_preview {
            mirror_rgba(&frame.data, frame.width, frame.height)
        } else {
            frame.data.to_vec()
        };

        let handle = widget::image::Handle::from_rgba(frame.width, frame.height, pixels);

        widget::container(
            widget::image(handle)
                .content_fit(cosmic::iced::ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(cosmic::iced::alignment::Horizontal::Center)
        .align_y(cosmic::iced::alignment::Vertical::Center)
        .into()
    }
}

/// The frozen photo under review, unmirrored
fn captured_photo(image: &CapturedImage) -> Element<'_, Message> {
    let handle = widget::image::Handle::from_rgba(image.width, image.height, image.data.to_vec());

    widget::container(
        widget::image(handle)
            .content_fit(cosmic::iced::ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fill),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .align_x(cosmic::iced::alignment::Horizontal::Center)
    .align_y(cosmic::iced::alignment::Vertical::Center)
    .into()
}

/// Themed placeholder with a status label
fn placeholder(label: &str) -> Element<'_, Message> {
    widget::container(widget::text(label.to_string()).size(20))
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(cosmic::iced::alignment::Horizontal::Center)
        .align_y(cosmic::iced::alignment::Vertical::Center)
        .style(|theme: &cosmic::Theme| widget::container::Style {
            background: Some(Background::Color(theme.cosmic().bg_color().into())),
            text_color: Some(theme.cosmic().on_bg_color().into()),
            ..Default::default()
        })
        .into()
}

/// Themed canvas while the session is ready but no frame has arrived yet
fn blank_surface() -> Element<'static, Message> {
    widget::container(widget::Space::new(Length::Fill, Length::Fill))
        .width(Length::Fill)
        .height(Length::Fill)
        .style(|theme: &cosmic::Theme| widget::container::Style {
            background: Some(Background::Color(theme.cosmic().bg_color().into())),
            ..Default::default()
        })
        .into()
}

/// Flip an RGBA buffer horizontally for the selfie-style preview
fn mirror_rgba(data: &[u8], width: u32, height: u32) -> Vec<u8> {
    let row_bytes = width as usize * 4;
    let mut mirrored = vec![0u8; data.len()];

    for row in 0..height as usize {
        let src_row = &data[row * row_bytes..(row + 1) * row_bytes];
        let dst_row = &mut mirrored[row * row_bytes..(row + 1) * row_bytes];
        for col in 0..width as usize {
            let src = col * 4;
            let dst = (width as usize - 1 - col) * 4;
            dst_row[dst..dst + 4].copy_from_slice(&src_row[src..src + 4]);
        }
    }

    mirrored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirror_swaps_columns() {
        // 2x1: red pixel then blue pixel
        let data = vec![255, 0, 0, 255, 0, 0, 255, 255];
        let mirrored = mirror_rgba(&data, 2, 1);
        assert_eq!(&mirrored[..4], &[0, 0, 255, 255]);
        assert_eq!(&mirrored[4..], &[255, 0, 0, 255]);
    }

    #[test]
    fn mirror_preserves_rows() {
        // 1x2: rows must stay in place
        let data = vec![1, 2, 3, 4, 5, 6, 7, 8];
        let mirrored = mirror_rgba(&data, 1, 2);
        assert_eq!(mirrored, data);
    }

    #[test]
    fn double_mirror_is_identity() {
        let data: Vec<u8> = (0..48).collect(); // 3x4
        let once = mirror_rgba(&data, 3, 4);
        let twice = mirror_rgba(&once, 3, 4);
        assert_eq!(twice, data);
    }
}
