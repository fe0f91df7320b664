use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::media::MediaType;
use super::quality::{AudioFormat, BitDepth, ChannelLayout, HdrFormat, Quality, Resolution, VideoCodec};
use crate::normalize::normalize;

/// Structured metadata extracted from a raw release name.
///
/// `normalized_title` and `media_type` are derived from `title` and the
/// season/episode lists; call [`ParsedRelease::refresh`] after editing
/// those fields by hand. Deserialization ignores both and recomputes them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct ParsedRelease {
    /// Verbatim input.
    pub raw_title: String,

    /// Best-effort display title.
    pub title: String,

    #[serde(skip_deserializing)]
    pub(crate) normalized_title: String,

    /// Release year.
    pub year: Option<u16>,

    pub resolution: Resolution,
    pub quality: Option<Quality>,
    pub codec: Option<VideoCodec>,
    pub bit_depth: Option<BitDepth>,

    /// Audio formats in order of first appearance.
    pub audio: Vec<AudioFormat>,
    pub channels: Vec<ChannelLayout>,
    pub hdr: Vec<HdrFormat>,

    /// ISO 639-1 codes. Empty means the language is unknown.
    pub languages: Vec<String>,

    /// Season numbers, ascending and unique.
    pub seasons: Vec<u32>,
    /// Episode numbers, ascending and unique.
    pub episodes: Vec<u32>,

    pub proper: bool,
    pub repack: bool,
    pub retail: bool,
    pub extended: bool,
    pub remastered: bool,
    pub unrated: bool,
    pub uncensored: bool,
    pub documentary: bool,
    pub commentary: bool,
    #[serde(rename = "threeD")]
    pub three_d: bool,
    pub converted: bool,
    pub dubbed: bool,
    pub subbed: bool,
    pub hardcoded: bool,
    pub upscaled: bool,
    pub scene: bool,
    pub trash: bool,
    pub adult: bool,
    pub complete: bool,
    pub ppv: bool,

    /// Release group, e.g. `"SPARKS"`.
    pub group: Option<String>,
    pub edition: Option<String>,
    /// Streaming network or broadcaster.
    pub network: Option<String>,
    pub region: Option<String>,
    pub site: Option<String>,
    pub container: Option<String>,
    pub extension: Option<String>,
    /// CRC32 checksum tag (hex string).
    pub episode_code: Option<String>,
    /// Size as written in the name, e.g. `"1.4GB"`.
    pub size: Option<String>,
    /// Air date as `YYYY-MM-DD`.
    pub date: Option<String>,

    #[serde(skip_deserializing)]
    pub(crate) media_type: MediaType,
}

impl Serialize for ParsedRelease {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Self::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for ParsedRelease {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut release = Self::deserialize(deserializer)?;
        release.refresh();
        Ok(release)
    }
}

impl ParsedRelease {
    /// Creates an empty `ParsedRelease` for the given raw title.
    #[must_use]
    pub fn new(raw_title: impl Into<String>) -> Self {
        Self {
            raw_title: raw_title.into(),
            ..Self::default()
        }
    }

    /// Title folded by [`normalize`](crate::normalize::normalize).
    #[must_use]
    pub fn normalized_title(&self) -> &str {
        &self.normalized_title
    }

    /// Movie, episode, season or show.
    #[must_use]
    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    /// Recomputes the derived fields from `title`, `seasons` and `episodes`.
    pub fn refresh(&mut self) {
        self.normalized_title = normalize(&self.title);
        self.media_type = MediaType::from_numbers(&self.seasons, &self.episodes);
    }

    /// Returns `true` if the flag (or optional field, for presence flags) is set.
    #[must_use]
    pub fn is_set(&self, flag: Flag) -> bool {
        match flag {
            Flag::ThreeD => self.three_d,
            Flag::Converted => self.converted,
            Flag::Documentary => self.documentary,
            Flag::Dubbed => self.dubbed,
            Flag::Edition => self.edition.is_some(),
            Flag::Hardcoded => self.hardcoded,
            Flag::Network => self.network.is_some(),
            Flag::Proper => self.proper,
            Flag::Repack => self.repack,
            Flag::Retail => self.retail,
            Flag::Subbed => self.subbed,
            Flag::Upscaled => self.upscaled,
            Flag::Site => self.site.is_some(),
            Flag::Size => self.size.is_some(),
            Flag::BitDepth => self.bit_depth.is_some(),
            Flag::Scene => self.scene,
            Flag::Uncensored => self.uncensored,
        }
    }

    /// Returns `true` if any season or episode was found.
    #[must_use]
    pub fn is_series(&self) -> bool {
        !self.seasons.is_empty() || !self.episodes.is_empty()
    }
}

impl std::fmt::Display for ParsedRelease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ParsedRelease(title={:?}", self.title)?;
        if let Some(year) = self.year {
            write!(f, ", year={year}")?;
        }
        write!(f, ", res={}", self.resolution)?;
        if let Some(quality) = self.quality {
            write!(f, ", quality={quality}")?;
        }
        write!(f, ", type={})", self.media_type)
    }
}

/// Release attributes that gate and score through the `extras`, `trash` and
/// `hdr` categories without carrying a value of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    ThreeD,
    Converted,
    Documentary,
    Dubbed,
    Edition,
    Hardcoded,
    Network,
    Proper,
    Repack,
    Retail,
    Subbed,
    Upscaled,
    Site,
    Size,
    BitDepth,
    Scene,
    Uncensored,
}

/// The facade's verdict for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedRelease {
    /// 40-character content hash.
    pub infohash: String,
    pub raw_title: String,
    pub data: ParsedRelease,
    /// Additive desirability score, unbounded in both directions.
    pub rank: i64,
    /// Whether every fetch gate passed.
    pub admitted: bool,
    /// Reason codes of failed gates, in evaluation order.
    pub failed_checks: Vec<String>,
    /// Similarity to the expected title, `0.0` when none was given.
    pub title_similarity: f64,
}
