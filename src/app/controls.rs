// SPDX-License-Identifier: MPL-2.0

//! Capture controls row
//!
//! Cancel on the left, the shutter button in the center, Save on the
//! right. The side slots share a fixed width so the shutter stays
//! centered regardless of label length.

use crate::app::state::{AppModel, Message};
use crate::constants::ui;
use crate::session::CaptureStatus;
use cosmic::Element;
use cosmic::iced::{Background, Color, Length};
use cosmic::widget;

impl AppModel {
    /// Build the bottom controls row
    pub fn build_controls(&self) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let cancel = widget::container(
            widget::button::text(self.labels.cancel.clone()).on_press(Message::Cancel),
        )
        .width(Length::Fixed(ui::CONTROL_SLOT_WIDTH))
        .align_x(cosmic::iced::alignment::Horizontal::Left);

        let center = if self.view_state.can_save() {
            self.build_discard_button()
        } else {
            self.build_capture_button()
        };

        let save = widget::container(
            widget::button::suggested(self.labels.save.clone())
                .on_press_maybe(self.view_state.can_save().then_some(Message::Save)),
        )
        .width(Length::Fixed(ui::CONTROL_SLOT_WIDTH))
        .align_x(cosmic::iced::alignment::Horizontal::Right);

        widget::container(
            widget::row()
                .push(cancel)
                .push(
                    widget::container(center)
                        .width(Length::Fill)
                        .center_x(Length::Fill),
                )
                .push(save)
                .align_y(cosmic::iced::alignment::Vertical::Center),
        )
        .width(Length::Fill)
        .padding([spacing.space_s, spacing.space_m])
        .into()
    }

    /// Build the circular shutter button
    ///
    /// White circle normally, gray and pressed-down while a capture is in
    /// flight, grayed out and non-interactive until the session is ready.
    fn build_capture_button(&self) -> Element<'_, Message> {
        let enabled =
            self.status == CaptureStatus::Ready && !self.capture_activity.is_capturing();

        let color = if self.capture_activity.is_capturing() {
            Color::from_rgb(0.7, 0.7, 0.7) // Gray until the capture resolves
        } else if !enabled {
            Color::from_rgba(0.5, 0.5, 0.5, 0.3) // Grayed out until ready
        } else {
            Color::WHITE
        };

        // Press down effect during the shutter animation
        let (inner_size, outer_size) = if self.capture_activity.is_animating() {
            (
                ui::CAPTURE_BUTTON_INNER * 0.85,
                ui::CAPTURE_BUTTON_OUTER * 0.85,
            )
        } else {
            (ui::CAPTURE_BUTTON_INNER, ui::CAPTURE_BUTTON_OUTER)
        };

        let button = circle_button(color, inner_size, outer_size);
        let button = if enabled {
            button.on_press(Message::Capture)
        } else {
            // No on_press handler when disabled (non-clickable)
            button
        };

        // Fixed-size wrapper prevents layout shift when the button shrinks
        widget::container(button)
            .width(Length::Fixed(ui::CAPTURE_BUTTON_OUTER))
            .height(Length::Fixed(ui::CAPTURE_BUTTON_OUTER))
            .center_x(ui::CAPTURE_BUTTON_OUTER)
            .center_y(ui::CAPTURE_BUTTON_OUTER)
            .into()
    }

    /// Build the discard button shown while reviewing a photo
    fn build_discard_button(&self) -> Element<'_, Message> {
        circle_button(
            Color::from_rgb(0.45, 0.45, 0.45),
            ui::CAPTURE_BUTTON_INNER,
            ui::CAPTURE_BUTTON_OUTER,
        )
        .on_press(Message::Discard)
        .into()
    }
}

fn circle_button(
    color: Color,
    inner_size: f32,
    outer_size: f32,
) -> widget::button::Button<'static, Message> {
    let inner = widget::container(widget::Space::new(
        Length::Fixed(inner_size),
        Length::Fixed(inner_size),
    ))
    .style(move |_theme| widget::container::Style {
        background: Some(Background::Color(color)),
        border: cosmic::iced::Border {
            radius: [ui::CAPTURE_BUTTON_RADIUS * (inner_size / ui::CAPTURE_BUTTON_INNER); 4].into(),
            ..Default::default()
        },
        ..Default::default()
    });

    widget::button::custom(inner)
        .padding(0)
        .width(Length::Fixed(outer_size))
        .height(Length::Fixed(outer_size))
}
