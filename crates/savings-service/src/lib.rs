//! HTTP REST API over in-memory device energy-saving datasets.
//!
//! This crate provides a service that:
//! - Loads the device and savings CSV tables once at startup
//! - Refuses to serve data until both tables are loaded
//! - Exposes read-only endpoints for listing devices and filtering savings
//!
//! # REST API Endpoints
//!
//! - `GET /api/health` - Dataset readiness and record counts
//! - `GET /api/devices` - All device records, in file order
//! - `GET /api/savings?device_id=..&start_date=..&end_date=..` - Savings
//!   records for one device within an inclusive date range
//!
//! Cross-origin requests are allowed from any origin.
//!
//! # Configuration
//!
//! The service reads configuration from `~/.config/energy-savings/server.toml`:
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 3000
//!
//! [data]
//! devices = "./data/devices.csv"
//! savings = "./data/device-saving.csv"
//! ```
//!
//! The port can also be set with the `PORT` environment variable or `--port`.

pub mod api;
pub mod config;
pub mod middleware;
pub mod state;

pub use api::{AppError, app};
pub use config::{Config, ConfigError, DataConfig, ServerConfig};
pub use state::AppState;
