//! Cache directory cleanup.
//!
//! Removes dependency caches such as `node_modules/` wherever they appear
//! under the scan root, crediting each removal to the shared progress state.

mod purge;

pub use purge::{CachePurger, PurgeOptions, PurgeResult, PurgeSummary};
