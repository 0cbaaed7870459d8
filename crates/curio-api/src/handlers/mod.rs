pub mod file_redirect;
pub mod gateways;
pub mod migration;
