use std::path::PathBuf;
use crate::client::models::extraction::{ExtractionError, ExtractionResponse};
use crate::client::services::export_service::ExportFormat;

#[derive(Debug, Clone)]
pub enum Message {
    // Selezione file
    BrowseFile,
    FilePicked(Option<PathBuf>),
    PathInputChanged(String),
    SelectPath,
    FileDropped(PathBuf),
    // Upload
    Submit,
    CancelUpload,
    UploadFinished(Result<ExtractionResponse, ExtractionError>),
    SpinnerTick,
    // Export
    Export(ExportFormat),
    ExportFinished(Result<Option<PathBuf>, String>),
}
