//! Per-user session state kept in the shared cache.

pub mod record;
pub mod stats;
pub mod sync;
pub mod token;
