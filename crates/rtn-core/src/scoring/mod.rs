pub mod model;
pub mod rank;

pub use model::{DEFAULT_WEIGHTS, RankingModel};
pub use rank::{PREFERRED_LANGUAGE_BONUS, PREFERRED_PATTERN_BONUS, rank};
