#![doc(test(attr(deny(warnings))))]

//! Refectory Core implements the serving-session engine behind a school
//! cafeteria registration frontend: eligibility rosters, the served-students
//! ledger, bulk reconciliation against external snapshots, and session
//! resume across restarts.

pub mod core;
pub mod domain;
pub mod errors;
pub mod registry;
pub mod state;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Refectory Core tracing initialized.");
    });
}
