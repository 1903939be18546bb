use iced::{Element, Length, Alignment, Color, Font};
use iced::widget::{Column, Row, Text, TextInput, Button, Container, Space};
use crate::client::models::messages::Message;
use crate::client::models::app_state::UploadViewState;
use crate::client::models::extraction::ExtractionResponse;
use crate::client::services::export_service::ExportFormat;
use crate::client::gui::views::status_bar::status_bar_view;

const BG_MAIN: Color = Color::from_rgb(0.06, 0.07, 0.18); // Deep navy
const CARD_BG: Color = Color::from_rgb(0.18, 0.19, 0.36); // Muted indigo
const INPUT_BG: Color = Color::from_rgb(0.12, 0.13, 0.26);
const ACCENT_COLOR: Color = Color::from_rgb(0.0, 0.7, 0.3);
const TEXT_PRIMARY: Color = Color::WHITE;
const TEXT_SECONDARY: Color = Color::from_rgb(0.7, 0.7, 0.7);

const EMOJI_FONT: Font = Font::with_name("Segoe UI Emoji");
const BOLD_FONT: Font = Font {
    family: iced::font::Family::SansSerif,
    weight: iced::font::Weight::Bold,
    ..Font::DEFAULT
};

const SPINNER_FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];
const ERROR_GLYPH: &str = "❌";
const OK_GLYPH: &str = "✅";

fn bg_main_appearance(_: &iced::Theme) -> iced::widget::container::Appearance {
    iced::widget::container::Appearance {
        background: Some(iced::Background::Color(BG_MAIN)),
        text_color: Some(TEXT_PRIMARY),
        ..Default::default()
    }
}

fn card_appearance(_: &iced::Theme) -> iced::widget::container::Appearance {
    iced::widget::container::Appearance {
        background: Some(iced::Background::Color(CARD_BG)),
        text_color: Some(TEXT_PRIMARY),
        border: iced::Border {
            width: 0.0,
            color: Color::TRANSPARENT,
            radius: 16.0.into(),
        },
        shadow: iced::Shadow {
            offset: iced::Vector::new(0.0, 4.0),
            blur_radius: 12.0,
            color: Color::from_rgba(0.0, 0.0, 0.0, 0.3),
        },
    }
}

fn table_header_appearance(_: &iced::Theme) -> iced::widget::container::Appearance {
    iced::widget::container::Appearance {
        background: Some(iced::Background::Color(INPUT_BG)),
        text_color: Some(TEXT_PRIMARY),
        border: iced::Border {
            width: 0.0,
            color: Color::TRANSPARENT,
            radius: 8.0.into(),
        },
        ..Default::default()
    }
}

/// Button that is only pressable when `enabled`.
fn action_button<'a>(label: &'a str, style: iced::theme::Button, action: Message, enabled: bool) -> Button<'a, Message> {
    let button = Button::new(Text::new(label).font(BOLD_FONT).size(14))
        .style(style)
        .padding(12);
    if enabled {
        button.on_press(action)
    } else {
        button
    }
}

fn table_row<'a>(label: String, value: String, marker: Element<'a, Message>) -> Element<'a, Message> {
    Row::new()
        .spacing(12)
        .align_items(Alignment::Center)
        .push(Text::new(label).size(14).width(Length::FillPortion(2)))
        .push(Text::new(value).size(14).width(Length::FillPortion(3)))
        .push(Container::new(marker).width(Length::FillPortion(1)).center_x())
        .into()
}

fn results_table(response: &ExtractionResponse) -> Element<'_, Message> {
    let header = Container::new(
        Row::new()
            .spacing(12)
            .push(Text::new("Campo").font(BOLD_FONT).size(14).width(Length::FillPortion(2)))
            .push(Text::new("Valor").font(BOLD_FONT).size(14).width(Length::FillPortion(3)))
            .push(
                Container::new(Text::new("Error").font(BOLD_FONT).size(14))
                    .width(Length::FillPortion(1))
                    .center_x(),
            ),
    )
    .padding([8, 12])
    .width(Length::Fill)
    .style(iced::theme::Container::Custom(Box::new(table_header_appearance)));

    let rows: Vec<Element<Message>> = response.rows().into_iter().map(|row| {
        let glyph = if row.has_error { ERROR_GLYPH } else { OK_GLYPH };
        let marker: Element<Message> = Text::new(glyph).font(EMOJI_FONT).size(16).into();
        Container::new(table_row(row.label, row.value, marker))
            .padding([6, 12])
            .into()
    }).collect();

    let summary_color = if response.error_count() == 0 { ACCENT_COLOR } else { TEXT_SECONDARY };

    Column::new()
        .spacing(4)
        .push(Text::new("Resultado:").font(BOLD_FONT).size(18))
        .push(header)
        .push(Column::with_children(rows).spacing(2))
        .push(Space::new(Length::Fill, Length::Fixed(8.0)))
        .push(Text::new(response.error_summary()).size(13).style(summary_color))
        .into()
}

pub fn view(state: &UploadViewState, allow_cancel: bool) -> Element<Message> {
    let loading = state.is_loading;

    let title = Text::new("Subir Factura PDF").font(BOLD_FONT).size(30).style(TEXT_PRIMARY);

    let mut path_input = TextInput::new("Ruta del archivo PDF (o arrastra el archivo aquí)", &state.path_input)
        .width(Length::Fill)
        .padding(12)
        .size(14);
    if !loading {
        path_input = path_input
            .on_input(Message::PathInputChanged)
            .on_submit(Message::SelectPath);
    }

    let file_row = Row::new()
        .spacing(8)
        .align_items(Alignment::Center)
        .push(action_button(
            "Seleccionar",
            iced::theme::Button::Primary,
            Message::BrowseFile,
            !loading,
        ))
        .push(path_input)
        .push(action_button(
            "Usar ruta",
            iced::theme::Button::Secondary,
            Message::SelectPath,
            !loading && !state.path_input.trim().is_empty(),
        ));

    let selected: Element<Message> = match &state.selected_file {
        Some(file) => Row::new()
            .spacing(8)
            .push(Text::new("📄").font(EMOJI_FONT).size(14))
            .push(Text::new("Archivo seleccionado:").size(14).style(TEXT_SECONDARY))
            .push(Text::new(&file.name).font(BOLD_FONT).size(14).style(ACCENT_COLOR))
            .into(),
        None => Space::new(Length::Fill, Length::Fixed(0.0)).into(),
    };

    let mut submit_row = Row::new()
        .spacing(12)
        .align_items(Alignment::Center)
        .push(action_button(
            "Enviar al agente",
            iced::theme::Button::Primary,
            Message::Submit,
            !loading,
        ));
    if loading && allow_cancel {
        submit_row = submit_row.push(action_button(
            "Cancelar",
            iced::theme::Button::Destructive,
            Message::CancelUpload,
            true,
        ));
    }

    let spinner: Element<Message> = if loading {
        let frame = SPINNER_FRAMES[state.spinner_frame % SPINNER_FRAMES.len()];
        Row::new()
            .spacing(8)
            .align_items(Alignment::Center)
            .push(Text::new(frame).size(20).style(ACCENT_COLOR))
            .push(Text::new("Procesando...").size(14).style(TEXT_SECONDARY))
            .into()
    } else {
        Space::new(Length::Fill, Length::Fixed(0.0)).into()
    };

    let mut form = Column::new()
        .spacing(16)
        .padding(24)
        .push(title)
        .push(file_row)
        .push(selected)
        .push(submit_row)
        .push(status_bar_view(&state.status))
        .push(spinner);

    if let Some(response) = &state.response {
        if response.resultado.is_some() {
            form = form.push(results_table(response));
        }

        let export_row = Row::new()
            .spacing(12)
            .push(action_button(
                "Exportar CSV",
                iced::theme::Button::Secondary,
                Message::Export(ExportFormat::Csv),
                !loading && response.resultado.is_some(),
            ))
            .push(action_button(
                "Exportar JSON",
                iced::theme::Button::Secondary,
                Message::Export(ExportFormat::Json),
                !loading,
            ));
        form = form.push(export_row);

        if let Some(path) = &state.last_export {
            form = form.push(
                Text::new(format!("Guardado en {}", path.display()))
                    .size(12)
                    .style(TEXT_SECONDARY),
            );
        }
        if let Some(err) = &state.export_error {
            form = form.push(
                Text::new(format!("No se pudo exportar: {}", err))
                    .size(12)
                    .style(Color::from_rgb(1.0, 0.2, 0.2)),
            );
        }
    }

    let card = Container::new(form)
        .width(Length::Fill)
        .style(iced::theme::Container::Custom(Box::new(card_appearance)));

    Container::new(
        iced::widget::scrollable(Container::new(card).padding(24).width(Length::Fill))
            .width(Length::Fill)
            .height(Length::Fill),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .style(iced::theme::Container::Custom(Box::new(bg_main_appearance)))
    .into()
}
