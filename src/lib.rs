pub mod accounts;
pub mod admin;
pub mod app;
pub mod config;
pub mod error;
pub mod mining;
pub mod simulator;
pub mod state;
pub mod telemetry;
