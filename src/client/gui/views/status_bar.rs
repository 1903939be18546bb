use iced::{Element, Length};
use iced::widget::{Container, Space, Text};
use crate::client::models::messages::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusLevel {
    #[default]
    Idle,
    Info,
    Success,
    Warning,
    Error,
}

/// The single status line of the view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

impl StatusMessage {
    pub fn new(level: StatusLevel, text: impl Into<String>) -> Self {
        Self { level, text: text.into() }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn color(&self) -> iced::Color {
        match self.level {
            StatusLevel::Idle => iced::Color::from_rgb(0.3, 0.3, 0.4),
            StatusLevel::Success => iced::Color::from_rgb(0.2, 0.8, 0.4),
            StatusLevel::Error => iced::Color::from_rgb(1.0, 0.2, 0.2),
            StatusLevel::Info => iced::Color::from_rgb(0.2, 0.6, 1.0),
            StatusLevel::Warning => iced::Color::from_rgb(1.0, 0.8, 0.0),
        }
    }
}

pub fn status_bar_view(status: &StatusMessage) -> Element<'_, Message> {
    if status.is_empty() {
        return Space::new(Length::Fill, Length::Fixed(0.0)).into();
    }
    let bg_color = status.color();
    Container::new(Text::new(&status.text).size(16).style(iced::Color::WHITE))
        .padding([12, 16])
        .width(Length::Fill)
        .style(iced::theme::Container::Custom(Box::new(move |_: &iced::Theme| {
            iced::widget::container::Appearance {
                background: Some(iced::Background::Color(bg_color)),
                text_color: Some(iced::Color::WHITE),
                border: iced::Border {
                    radius: 8.0.into(),
                    ..Default::default()
                },
                shadow: iced::Shadow {
                    offset: iced::Vector::new(0.0, 4.0),
                    blur_radius: 12.0,
                    color: iced::Color::from_rgba(0.0, 0.0, 0.0, 0.3),
                },
            }
        })))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_status_is_empty_and_idle() {
        let status = StatusMessage::default();
        assert!(status.is_empty());
        assert_eq!(status.level, StatusLevel::Idle);
    }
}
