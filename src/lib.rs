//! bibtrack - runtime citation tracking.
//!
//! bibtrack lets a codebase declare, per function, which bibliographic
//! references justify that function's behavior, and records at runtime
//! which references a given run actually exercised. The minimal
//! "works-cited" bibliography then falls out of the record instead of being
//! maintained by hand.
//!
//! # Architecture
//!
//! - `bib`: BibTeX store - parsed entries, key lookup, subset serialization
//! - `cite`: citation specs - static key sets and dynamic citation functions
//! - `check`: registration-time validation of specs against the store
//! - `registry`: registration plus the invocation-tracking adapter
//! - `log`: the citation record
//! - `active`: derives the minimal bibliography from the record
//!
//! Specs are validated exhaustively at registration, so every unknown key,
//! arity mismatch, or malformed spec fails before the function can be
//! called. Tracking is per call shape: repeat calls with the same signature
//! label overwrite their log entry rather than accumulating.
//!
//! # Example
//!
//! ```
//! use bibtrack::{Bibliography, CiteSpec, Registry, TargetSpec};
//!
//! let bib = Bibliography::parse("@book{knuth97, title = {TAOCP}}").unwrap();
//! let registry = Registry::new(bib);
//!
//! let double = registry
//!     .register(
//!         TargetSpec::new("double", 1),
//!         CiteSpec::key("knuth97"),
//!         |&(x,): &(i32,)| 2 * x,
//!     )
//!     .unwrap();
//!
//! assert!(registry.active_bibliography().is_empty());
//! assert_eq!(double.call((21,)), 42);
//! assert!(registry.active_bibliography().contains("knuth97"));
//! ```

pub mod active;
pub mod bib;
pub mod check;
pub mod cite;
pub mod error;
pub mod log;
pub mod registry;

pub use bib::{Bibliography, Entry, ParseError};
pub use cite::{flatten_keys, Arity, CiteFn, CiteMap, CiteSpec, DynamicCite, KeySet, TargetSpec};
pub use error::RegisterError;
pub use log::CitationLog;
pub use registry::{Registry, Tracked};
