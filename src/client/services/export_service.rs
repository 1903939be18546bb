use std::path::{Path, PathBuf};
use log::info;
use crate::client::models::extraction::ExtractionResponse;

const CSV_HEADER: [&str; 3] = ["Campo", "Valor", "Error"];
const DEFAULT_SOURCE_NAME: &str = "resultado";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Json => "JSON",
        };
        write!(f, "{}", s)
    }
}

/// `factura_<source>.<ext>`, with `resultado` when no file name is known.
pub fn export_file_name(source_name: Option<&str>, format: ExportFormat) -> String {
    let source = source_name.filter(|s| !s.is_empty()).unwrap_or(DEFAULT_SOURCE_NAME);
    format!("factura_{}.{}", source, format.extension())
}

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

/// Quoted CSV of the extracted fields, `None` when the response has no `resultado`.
pub fn to_csv(response: &ExtractionResponse) -> Option<String> {
    response.resultado.as_ref()?;
    let mut lines = Vec::with_capacity(response.rows().len() + 1);
    lines.push(CSV_HEADER.iter().map(|h| quote(h)).collect::<Vec<_>>().join(","));
    for row in response.rows() {
        let flag = if row.has_error { "True" } else { "False" };
        lines.push([quote(&row.label), quote(&row.value), quote(flag)].join(","));
    }
    Some(lines.join("\n"))
}

/// `{status, resultado, errores}` with two-space indentation.
pub fn to_json(response: &ExtractionResponse) -> serde_json::Result<String> {
    serde_json::to_string_pretty(response)
}

/// Serialized export, or `None` when there is nothing to export in this format.
pub fn render(response: &ExtractionResponse, format: ExportFormat) -> anyhow::Result<Option<String>> {
    match format {
        ExportFormat::Csv => Ok(to_csv(response)),
        ExportFormat::Json => Ok(Some(to_json(response)?)),
    }
}

/// Write the export into `dir`. Returns the written path, `None` for a no-op.
pub async fn write_export(
    dir: &Path,
    response: Option<&ExtractionResponse>,
    source_name: Option<&str>,
    format: ExportFormat,
) -> anyhow::Result<Option<PathBuf>> {
    let Some(response) = response else {
        return Ok(None);
    };
    let Some(content) = render(response, format)? else {
        return Ok(None);
    };
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(export_file_name(source_name, format));
    tokio::fs::write(&path, content).await?;
    info!("📄 Exported {} to {}", format, path.display());
    Ok(Some(path))
}
