use std::path::PathBuf;
use std::process::ExitCode;
use clap::Parser;
use factura_client::client::config::ClientConfig;
use factura_client::client::models::app_state::UploadViewState;
use factura_client::client::models::selected_file::SelectedFile;
use factura_client::client::services::export_service::{self, ExportFormat};
use factura_client::client::services::extraction_service::ExtractionService;
use factura_client::utils::logger::FacturaLogger;

/// Upload one PDF invoice to the extraction service and print the extracted fields.
#[derive(Parser, Debug)]
#[command(name = "factura-cli", version, about)]
struct Args {
    /// PDF invoice to upload
    file: PathBuf,
    /// Write factura_<name>.csv
    #[arg(long)]
    csv: bool,
    /// Write factura_<name>.json
    #[arg(long)]
    json: bool,
    /// Export directory (defaults to EXPORT_DIR or the download folder)
    #[arg(long)]
    out: Option<PathBuf>,
    /// Extraction service base URL (defaults to EXTRACTION_BASE_URL)
    #[arg(long)]
    url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    let _ = dotenvy::dotenv();
    FacturaLogger::init_from_env()?;
    let mut config = ClientConfig::from_env();
    if let Some(url) = args.url {
        config.base_url = url;
    }
    if let Some(out) = args.out {
        config.export_dir = out;
    }
    let service = ExtractionService::new(&config)?;

    let mut state = UploadViewState::default();
    let Some(request) = state.submit_file(SelectedFile::from_path(&args.file)) else {
        eprintln!("[CLIENT] {}", state.status.text);
        return Ok(ExitCode::FAILURE);
    };
    println!("[CLIENT] {}", state.status.text);

    let outcome = service.upload(&request).await;
    let failed = outcome.is_err();
    state.finish(outcome);

    let Some(response) = state.response.as_ref().filter(|_| !failed) else {
        eprintln!("[CLIENT] {}", state.status.text);
        return Ok(ExitCode::FAILURE);
    };
    println!("[CLIENT] {}", state.status.text);

    let rows = response.rows();
    if !rows.is_empty() {
        let width = rows.iter().map(|r| r.label.chars().count()).max().unwrap_or(0).max(5);
        println!("\n{:<width$}  {}", "Campo", "Valor", width = width);
        for row in &rows {
            let marker = if row.has_error { "❌" } else { "✅" };
            println!("{:<width$}  {} {}", row.label, row.value, marker, width = width);
        }
        println!("\n{}", response.error_summary());
        for field in response.failed_fields() {
            println!("- {}", field);
        }
    }

    let mut formats = Vec::new();
    if args.csv {
        formats.push(ExportFormat::Csv);
    }
    if args.json {
        formats.push(ExportFormat::Json);
    }
    for format in formats {
        match export_service::write_export(&config.export_dir, Some(response), state.source_name(), format).await? {
            Some(path) => println!("[CLIENT] {} guardado en {}", format, path.display()),
            None => println!("[CLIENT] Nada que exportar en {}", format),
        }
    }
    Ok(ExitCode::SUCCESS)
}
