pub mod app_state;
pub mod extraction;
pub mod messages;
pub mod selected_file;
