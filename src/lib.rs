pub mod config;
pub mod db;
pub mod server;
pub mod services;
pub mod storage;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod testing;
