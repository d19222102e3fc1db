// SPDX-License-Identifier: GPL-3.0-only

//! Main capture view
//!
//! Composes the preview surface (preview module) and the controls row
//! (controls module) on a black background.

use crate::app::state::{AppModel, Message};
use cosmic::Element;
use cosmic::iced::{Background, Color, Length};
use cosmic::widget;

impl AppModel {
    /// Build the main capture view
    pub fn view(&self) -> Element<'_, Message> {
        let preview = self.build_preview_surface();
        let controls = self.build_controls();

        widget::container(
            widget::column()
                .push(
                    widget::container(preview)
                        .width(Length::Fill)
                        .height(Length::Fill),
                )
                .push(controls),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .style(|_theme| widget::container::Style {
            background: Some(Background::Color(Color::BLACK)),
            ..Default::default()
        })
        .into()
    }
}
