// Infrastructure layer - External dependencies and adapters
pub mod chunked_json;
pub mod config;
pub mod http_client;
pub mod http_response;
pub mod iss_client;
pub mod nasa_client;
pub mod synthetic;
