use std::time::Duration;
use futures_util::future::AbortHandle;
use iced::{Application, Command, Element, Subscription, Theme};
use log::{error, info};
use crate::client::config::ClientConfig;
use crate::client::models::app_state::{UploadViewState, ViewEvent};
use crate::client::models::messages::Message;
use crate::client::models::selected_file::SelectedFile;
use crate::client::services::export_service;
use crate::client::services::extraction_service::ExtractionService;

pub struct AppFlags {
    pub config: ClientConfig,
    pub service: ExtractionService,
}

pub struct FacturaApp {
    pub state: UploadViewState,
    pub config: ClientConfig,
    pub service: ExtractionService,
    abort_handle: Option<AbortHandle>,
}

impl FacturaApp {
    fn select(&mut self, path: std::path::PathBuf) {
        self.state.path_input = path.display().to_string();
        self.state.apply(ViewEvent::FileSelected(SelectedFile::from_path(path)));
    }
}

impl Application for FacturaApp {
    type Message = Message;
    type Theme = Theme;
    type Executor = iced::executor::Default;
    type Flags = AppFlags;

    fn new(flags: AppFlags) -> (Self, Command<Message>) {
        info!("[APP_START] Extraction endpoint: {}", flags.service.endpoint());
        let app = FacturaApp {
            state: UploadViewState::default(),
            config: flags.config,
            service: flags.service,
            abort_handle: None,
        };
        (app, Command::none())
    }

    fn title(&self) -> String {
        "Subir Factura PDF".to_string()
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::BrowseFile => {
                if self.state.is_loading {
                    return Command::none();
                }
                return Command::perform(
                    async {
                        rfd::AsyncFileDialog::new()
                            .set_title("Selecciona una factura PDF")
                            .add_filter("PDF", &["pdf"])
                            .pick_file()
                            .await
                            .map(|handle| handle.path().to_path_buf())
                    },
                    Message::FilePicked,
                );
            }
            Message::FilePicked(picked) => {
                if let Some(path) = picked.filter(|_| !self.state.is_loading) {
                    self.select(path);
                }
            }
            Message::PathInputChanged(path) => {
                self.state.path_input = path;
            }
            Message::SelectPath => {
                let path = self.state.path_input.trim().to_string();
                if !path.is_empty() && !self.state.is_loading {
                    self.select(path.into());
                }
            }
            Message::FileDropped(path) => {
                // input disabilitato durante l'upload
                if !self.state.is_loading {
                    self.select(path);
                }
            }
            Message::Submit => {
                let Some(request) = self.state.apply(ViewEvent::SubmitStart) else {
                    return Command::none();
                };
                let service = self.service.clone();
                let (handle, registration) = AbortHandle::new_pair();
                self.abort_handle = Some(handle);
                return Command::perform(
                    async move { service.upload_abortable(&request, registration).await },
                    Message::UploadFinished,
                );
            }
            Message::CancelUpload => {
                if let Some(handle) = self.abort_handle.take() {
                    handle.abort();
                }
            }
            Message::UploadFinished(outcome) => {
                self.abort_handle = None;
                if let Err(e) = &outcome {
                    error!("[APP] Upload failed: {}", e);
                }
                self.state.finish(outcome);
            }
            Message::SpinnerTick => {
                self.state.spinner_frame = self.state.spinner_frame.wrapping_add(1);
            }
            Message::Export(format) => {
                if self.state.is_loading {
                    return Command::none();
                }
                let dir = self.config.export_dir.clone();
                let response = self.state.response.clone();
                let source = self.state.source_name().map(str::to_string);
                return Command::perform(
                    async move {
                        export_service::write_export(&dir, response.as_ref(), source.as_deref(), format)
                            .await
                            .map_err(|e| e.to_string())
                    },
                    Message::ExportFinished,
                );
            }
            Message::ExportFinished(result) => match result {
                Ok(Some(path)) => {
                    self.state.export_error = None;
                    self.state.last_export = Some(path);
                }
                Ok(None) => {}
                Err(e) => {
                    error!("[APP] Export failed: {}", e);
                    self.state.export_error = Some(e);
                }
            },
        }
        Command::none()
    }

    fn view(&self) -> Element<Message> {
        crate::client::gui::views::upload::view(&self.state, self.config.allow_cancel)
    }

    fn subscription(&self) -> Subscription<Message> {
        let drops = iced::event::listen_with(|event, _status| match event {
            iced::Event::Window(_, iced::window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
            _ => None,
        });
        if self.state.is_loading {
            Subscription::batch(vec![
                drops,
                iced::time::every(Duration::from_millis(120)).map(|_| Message::SpinnerTick),
            ])
        } else {
            drops
        }
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::models::app_state::{INVALID_FILE_MESSAGE, PROCESSING_MESSAGE};
    use std::path::PathBuf;

    fn app() -> FacturaApp {
        let config = ClientConfig::default();
        let service = ExtractionService::new(&config).unwrap();
        FacturaApp::new(AppFlags { config, service }).0
    }

    #[test]
    fn picked_pdf_becomes_the_selection() {
        let mut app = app();
        let _ = app.update(Message::FilePicked(Some(PathBuf::from("/tmp/inv.pdf"))));
        assert_eq!(app.state.source_name(), Some("inv.pdf"));
        assert_eq!(app.state.path_input, "/tmp/inv.pdf");
        assert!(app.state.status.is_empty());
    }

    #[test]
    fn dismissed_dialog_keeps_the_selection() {
        let mut app = app();
        let _ = app.update(Message::FilePicked(Some(PathBuf::from("/tmp/inv.pdf"))));
        let _ = app.update(Message::FilePicked(None));
        assert_eq!(app.state.source_name(), Some("inv.pdf"));
    }

    #[test]
    fn picked_non_pdf_is_rejected() {
        let mut app = app();
        let _ = app.update(Message::FilePicked(Some(PathBuf::from("/tmp/scan.png"))));
        assert_eq!(app.state.source_name(), None);
        assert_eq!(app.state.status.text, INVALID_FILE_MESSAGE);
    }

    #[test]
    fn typed_path_is_a_fallback_selection() {
        let mut app = app();
        let _ = app.update(Message::PathInputChanged(" /tmp/typed.pdf ".to_string()));
        let _ = app.update(Message::SelectPath);
        assert_eq!(app.state.source_name(), Some("typed.pdf"));
    }

    #[test]
    fn picks_are_ignored_while_uploading() {
        let mut app = app();
        let _ = app.update(Message::FilePicked(Some(PathBuf::from("/tmp/inv.pdf"))));
        app.state.apply(ViewEvent::SubmitStart);
        assert_eq!(app.state.status.text, PROCESSING_MESSAGE);
        let _ = app.update(Message::FilePicked(Some(PathBuf::from("/tmp/other.pdf"))));
        assert_eq!(app.state.source_name(), Some("inv.pdf"));
        assert!(app.state.is_loading);
    }
}
