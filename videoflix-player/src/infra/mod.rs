//! Infrastructure: collaborator seams, HTTP client, configuration and
//! testing fakes.

pub mod api_client;
pub mod config;
pub mod constants;
pub mod media;
pub mod services;
pub mod testing;
