//! # rtn core
//!
//! Release-name ranking engine. Parses free-text release names into
//! structured metadata, checks them against a configurable acquisition
//! policy, scores them with an additive ranking model and orders the
//! survivors by resolution tier.
//!
//! ## Quick Start
//!
//! ```rust
//! use rtn_core::{RankOptions, RankingModel, Rtn, Settings};
//!
//! let rtn = Rtn::new(Settings::default(), RankingModel::default()).unwrap();
//! let ranked = rtn
//!     .rank_one(
//!         "The.Matrix.1999.1080p.BluRay.x264-GROUP",
//!         "c08a9ee8ce3a5c2c08865e2b05406273cabc97e7",
//!         &RankOptions::default().with_correct_title("The Matrix"),
//!     )
//!     .unwrap();
//!
//! assert_eq!(ranked.data.title, "The Matrix");
//! assert!(ranked.admitted);
//! ```
pub mod error;
pub mod fetch;
pub mod mapping;
pub mod normalize;
pub mod parser;
pub mod rtn;
pub mod scoring;
pub mod settings;
pub mod similarity;
pub mod sort;
pub mod types;

// Re-export primary API
pub use error::{GarbageRelease, Result, RtnError};
pub use fetch::{FetchVerdict, check_fetch};
pub use mapping::{Category, RankKey};
pub use normalize::{normalize, normalize_with};
pub use parser::{ReleaseParser, parse};
pub use rtn::{INFOHASH_LEN, RankOptions, Rtn};
pub use scoring::{RankingModel, rank};
pub use settings::{CustomRank, Settings, create_settings};
pub use similarity::{Aliases, lev_ratio, title_match};
pub use sort::sort_releases;
pub use types::{
    AudioFormat, BitDepth, ChannelLayout, HdrFormat, MediaType, ParsedRelease, Quality,
    RankedRelease, Resolution, VideoCodec,
};
