//! AquaOps Server - operations backend for a sachet/bottled water business
//!
//! # Module structure
//!
//! ```text
//! ops-server/src/
//! ├── core/      # configuration, state, HTTP server
//! ├── api/       # HTTP routes and handlers
//! ├── db/        # SQLite pool and repositories
//! ├── pricing/   # tier pricing policy (pure)
//! └── utils/     # errors, logging, validation, time helpers
//! ```
//!
//! The heart of the system is the driver dispatch & settlement workflow:
//! a driver is loaded with inventory (dispatch order + settlement pair,
//! created atomically and gated on the driver's outstanding balance),
//! reports sales (settlement engine, tier-priced reconciliation), returns
//! unsold bags (warehouse review queue), and once fully settled earns a
//! manager-reviewed commission candidate.

pub mod api;
pub mod core;
pub mod db;
pub mod pricing;
pub mod utils;

pub use crate::core::{Config, Server, ServerState};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load .env and initialize logging. Call once at startup.
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    let log_dir = config.log_dir();
    if config.is_production() && log_dir.exists() {
        init_logger_with_file(Some(&config.log_level), log_dir.to_str());
    } else {
        init_logger_with_file(Some(&config.log_level), None);
    }

    Ok(())
}
