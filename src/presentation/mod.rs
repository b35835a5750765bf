// Presentation layer - HTTP handlers and panel views
pub mod app_state;
pub mod handlers;
pub mod render;
