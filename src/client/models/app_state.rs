use std::path::PathBuf;
use log::debug;
use crate::client::gui::views::status_bar::{StatusLevel, StatusMessage};
use crate::client::models::extraction::{ExtractionError, ExtractionResponse, UNKNOWN_ERROR};
use crate::client::models::selected_file::SelectedFile;

pub const INVALID_FILE_MESSAGE: &str = "Por favor selecciona un archivo PDF válido.";
pub const NO_FILE_MESSAGE: &str = "Primero selecciona un archivo.";
pub const PROCESSING_MESSAGE: &str = "Procesando archivo...";
pub const SUCCESS_MESSAGE: &str = "Respuesta recibida del agente ✅";
pub const FAILURE_MESSAGE: &str = "Ocurrió un error al procesar el archivo ❌";
pub const CANCELLED_MESSAGE: &str = "Solicitud cancelada.";

/// Transitions of the upload view. Every change to [`UploadViewState`] that
/// touches file, status, response or loading flag goes through one of these.
#[derive(Debug, Clone)]
pub enum ViewEvent {
    FileSelected(SelectedFile),
    SubmitStart,
    SubmitSuccess(ExtractionResponse),
    SubmitError(ExtractionError),
    SubmitSettled,
}

/// What the caller has to send after a successful `SubmitStart`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub path: PathBuf,
    pub file_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct UploadViewState {
    pub selected_file: Option<SelectedFile>,
    pub status: StatusMessage,
    pub response: Option<ExtractionResponse>,
    pub is_loading: bool,
    // stato solo GUI
    pub path_input: String,
    pub last_export: Option<PathBuf>,
    pub export_error: Option<String>,
    pub spinner_frame: usize,
}

impl UploadViewState {
    /// Apply one transition. Returns the request to issue when a submit is accepted.
    pub fn apply(&mut self, event: ViewEvent) -> Option<UploadRequest> {
        debug!("[VIEW] {:?}", event);
        match event {
            ViewEvent::FileSelected(file) => {
                if file.is_pdf() {
                    self.selected_file = Some(file);
                    self.status = StatusMessage::default();
                    self.response = None;
                    self.last_export = None;
                    self.export_error = None;
                } else {
                    self.status = StatusMessage::new(StatusLevel::Error, INVALID_FILE_MESSAGE);
                }
                None
            }
            ViewEvent::SubmitStart => {
                if self.is_loading {
                    return None;
                }
                let Some(file) = &self.selected_file else {
                    self.status = StatusMessage::new(StatusLevel::Warning, NO_FILE_MESSAGE);
                    return None;
                };
                let request = UploadRequest {
                    path: file.path.clone(),
                    file_name: file.name.clone(),
                };
                self.is_loading = true;
                self.spinner_frame = 0;
                self.status = StatusMessage::new(StatusLevel::Info, PROCESSING_MESSAGE);
                Some(request)
            }
            ViewEvent::SubmitSuccess(response) => {
                self.response = Some(response);
                self.status = StatusMessage::new(StatusLevel::Success, SUCCESS_MESSAGE);
                None
            }
            ViewEvent::SubmitError(err) => {
                let text = match &err {
                    ExtractionError::Rejected { message } => {
                        format!("Error: {}", message.as_deref().unwrap_or(UNKNOWN_ERROR))
                    }
                    ExtractionError::Transport(_) => FAILURE_MESSAGE.to_string(),
                    ExtractionError::Cancelled => CANCELLED_MESSAGE.to_string(),
                };
                let level = match err {
                    ExtractionError::Cancelled => StatusLevel::Warning,
                    _ => StatusLevel::Error,
                };
                self.status = StatusMessage::new(level, text);
                None
            }
            ViewEvent::SubmitSettled => {
                self.is_loading = false;
                None
            }
        }
    }

    /// Record the outcome of an upload and release the loading flag.
    pub fn finish(&mut self, outcome: Result<ExtractionResponse, ExtractionError>) {
        let event = match outcome {
            Ok(response) => ViewEvent::SubmitSuccess(response),
            Err(err) => ViewEvent::SubmitError(err),
        };
        self.apply(event);
        self.apply(ViewEvent::SubmitSettled);
    }

    /// Select `file` and submit it in one step. A rejected candidate stops here
    /// with the validation status instead of the missing-file prompt.
    pub fn submit_file(&mut self, file: SelectedFile) -> Option<UploadRequest> {
        let accepted = file.is_pdf();
        self.apply(ViewEvent::FileSelected(file));
        if !accepted {
            return None;
        }
        self.apply(ViewEvent::SubmitStart)
    }

    /// Name used in export file names.
    pub fn source_name(&self) -> Option<&str> {
        self.selected_file.as_ref().map(|f| f.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn with_pdf() -> UploadViewState {
        let mut state = UploadViewState::default();
        state.apply(ViewEvent::FileSelected(SelectedFile::from_path("/tmp/inv.pdf")));
        state
    }

    fn received() -> ExtractionResponse {
        ExtractionResponse::from_body(json!({
            "status": "received",
            "resultado": {"pdf_total": "100"},
            "errores": {}
        }))
        .unwrap()
    }

    #[test]
    fn pdf_selection_clears_status_and_response() {
        let mut state = with_pdf();
        state.finish(Ok(received()));
        assert!(state.response.is_some());

        state.apply(ViewEvent::FileSelected(SelectedFile::from_path("/tmp/other.pdf")));
        assert_eq!(state.selected_file.as_ref().map(|f| f.name.as_str()), Some("other.pdf"));
        assert!(state.status.is_empty());
        assert!(state.response.is_none());
    }

    #[test]
    fn non_pdf_selection_keeps_previous_file_and_response() {
        let mut state = with_pdf();
        state.finish(Ok(received()));

        state.apply(ViewEvent::FileSelected(SelectedFile::from_path("/tmp/photo.png")));
        assert_eq!(state.status.text, INVALID_FILE_MESSAGE);
        assert_eq!(state.selected_file.as_ref().map(|f| f.name.as_str()), Some("inv.pdf"));
        assert!(state.response.is_some());
    }

    #[test]
    fn submit_without_file_issues_no_request() {
        let mut state = UploadViewState::default();
        assert_eq!(state.apply(ViewEvent::SubmitStart), None);
        assert_eq!(state.status.text, NO_FILE_MESSAGE);
        assert!(!state.is_loading);
    }

    #[test]
    fn submit_file_reports_invalid_type_not_missing_file() {
        let mut state = UploadViewState::default();
        assert_eq!(state.submit_file(SelectedFile::from_path("/tmp/scan.png")), None);
        assert_eq!(state.status.text, INVALID_FILE_MESSAGE);
        assert!(state.selected_file.is_none());
        assert!(!state.is_loading);
    }

    #[test]
    fn submit_file_starts_upload_for_pdf() {
        let mut state = UploadViewState::default();
        let request = state.submit_file(SelectedFile::from_path("/tmp/inv.pdf")).unwrap();
        assert_eq!(request.file_name, "inv.pdf");
        assert!(state.is_loading);
        assert_eq!(state.status.text, PROCESSING_MESSAGE);
    }

    #[test]
    fn submit_sets_loading_and_returns_request() {
        let mut state = with_pdf();
        assert!(!state.is_loading);
        let request = state.apply(ViewEvent::SubmitStart).unwrap();
        assert_eq!(request.file_name, "inv.pdf");
        assert_eq!(request.path, PathBuf::from("/tmp/inv.pdf"));
        assert!(state.is_loading);
        assert_eq!(state.status.text, PROCESSING_MESSAGE);
        // a second submit while in flight is ignored
        assert_eq!(state.apply(ViewEvent::SubmitStart), None);
    }

    #[test]
    fn loading_is_released_on_every_outcome() {
        let outcomes = vec![
            Ok(received()),
            Err(ExtractionError::Rejected { message: Some("bad scan".into()) }),
            Err(ExtractionError::Transport("connection refused".into())),
            Err(ExtractionError::Cancelled),
        ];
        for outcome in outcomes {
            let mut state = with_pdf();
            state.apply(ViewEvent::SubmitStart);
            assert!(state.is_loading);
            state.finish(outcome);
            assert!(!state.is_loading);
        }
    }

    #[test]
    fn success_stores_response() {
        let mut state = with_pdf();
        state.apply(ViewEvent::SubmitStart);
        state.finish(Ok(received()));
        assert_eq!(state.status.text, SUCCESS_MESSAGE);
        assert_eq!(state.response, Some(received()));
    }

    #[test]
    fn rejected_status_uses_server_message_or_default() {
        let mut state = with_pdf();
        state.apply(ViewEvent::SubmitStart);
        state.finish(Err(ExtractionError::Rejected { message: Some("bad scan".into()) }));
        assert!(state.status.text.contains("bad scan"));

        state.apply(ViewEvent::SubmitStart);
        state.finish(Err(ExtractionError::Rejected { message: None }));
        assert!(state.status.text.contains("desconocido"));
        assert!(state.response.is_none());
    }

    #[test]
    fn transport_failure_uses_generic_message() {
        let mut state = with_pdf();
        state.apply(ViewEvent::SubmitStart);
        state.finish(Err(ExtractionError::Transport("dns error".into())));
        assert_eq!(state.status.text, FAILURE_MESSAGE);
        assert_eq!(state.status.level, StatusLevel::Error);
        assert!(!state.is_loading);
    }

    #[test]
    fn failed_upload_keeps_previous_response() {
        let mut state = with_pdf();
        state.apply(ViewEvent::SubmitStart);
        state.finish(Ok(received()));
        state.apply(ViewEvent::SubmitStart);
        state.finish(Err(ExtractionError::Transport("timeout".into())));
        assert!(state.response.is_some());
    }
}
