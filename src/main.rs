use iced::Application;
use factura_client::client::config::ClientConfig;
use factura_client::client::gui::app::{AppFlags, FacturaApp};
use factura_client::client::services::extraction_service::ExtractionService;
use factura_client::utils::logger::FacturaLogger;

fn main() -> anyhow::Result<()> {
    // load environment from .env (optional)
    let _ = dotenvy::dotenv();
    FacturaLogger::init_from_env()?;

    let config = ClientConfig::from_env();
    let service = ExtractionService::new(&config)?;
    FacturaApp::run(iced::Settings::with_flags(AppFlags { config, service }))?;
    Ok(())
}
