//! # rtn
//!
//! Parse, gate and rank media release names against a user policy.
//!
//! This crate re-exports [`rtn_core`]; see its documentation for the full API.
//!
//! ```rust
//! let release = rtn::parse("The.Walking.Dead.S05E03.720p.HDTV.x264-ASAP").unwrap();
//! assert_eq!(release.seasons, vec![5]);
//! assert_eq!(release.episodes, vec![3]);
//! ```

pub use rtn_core::*;
