//! Clinicore — relational data layer for a clinic booking and billing
//! system.
//!
//! Everything lives in one SQLite database: staff accounts, patients,
//! doctors and their specialties, rooms, the service catalog, scheduled
//! appointments with billed service lines, prescriptions, the medication
//! catalog with stock levels, and invoices. The schema is applied through
//! versioned migrations; entity access goes through the repository
//! functions in [`db::repository`].

pub mod config;
pub mod db;
pub mod models;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for binaries and tools embedding this crate.
///
/// Respects `RUST_LOG` when set, otherwise falls back to the default
/// filter from [`config::default_log_filter`].
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
