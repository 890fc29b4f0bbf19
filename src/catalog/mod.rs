//! Reference set storage.
//!
//! A [`ReferenceSet`] holds the named reference signals that experimental
//! signals are matched against. It can be loaded from:
//!
//! - a directory of `Time,Intensity` CSV/TSV files, one reference per file
//! - a JSON catalog previously exported with `signal-solver catalog export`
//!
//! ## Catalog Format
//!
//! ```json
//! {
//!   "version": "1.0.0",
//!   "created_at": "2024-01-01T00:00:00Z",
//!   "references": [
//!     { "name": "ref_signal0.csv", "samples": [{ "time": 0.0, "intensity": 1.2 }] }
//!   ]
//! }
//! ```

pub mod store;

pub use store::{CatalogError, ReferenceSet, ReferenceSignal};
