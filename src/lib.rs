//! # gvt
//!
//! Generation-based file versioning. The `gvt` binary lives in `gvt-cli`;
//! this package re-exports the engine for library users.

pub use gvt_core::*;
