pub mod export_service;
pub mod extraction_service;
