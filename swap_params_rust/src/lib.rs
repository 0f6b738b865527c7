pub mod config;
pub mod error;
pub mod models;
pub mod routers;
pub mod session;
#[cfg(test)]
pub mod tests;
pub mod utils;
