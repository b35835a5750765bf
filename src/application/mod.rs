// Application layer - Panel lifecycle, navigation and the dashboard use cases
pub mod dashboard_service;
pub mod date_navigation;
pub mod panel_controller;
pub mod panel_source;
pub mod polling;
pub mod shell;
pub mod streaming_service;
