//! Static taxonomy shared by the fetch gates and the ranker.
//!
//! Every parsed attribute that can be denied or scored resolves to exactly
//! one [`RankKey`], and every key belongs to exactly one [`Category`]. The
//! reason code of a denied attribute is `"<category>_<key>"`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{AudioFormat, ChannelLayout, Flag, HdrFormat, ParsedRelease, Quality, Resolution, VideoCodec};

/// Policy category grouping related keys in `customRanks`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Quality,
    Rips,
    Hdr,
    Audio,
    Extras,
    Trash,
}

impl Category {
    /// Key used in settings and reason codes.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Rips => "rips",
            Self::Hdr => "hdr",
            Self::Audio => "audio",
            Self::Extras => "extras",
            Self::Trash => "trash",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! rank_keys {
    ($( $category:ident => { $( $variant:ident = $name:literal ),+ $(,)? } )+) => {
        /// Attribute key within a [`Category`], shared by `customRanks` and
        /// the ranking model.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum RankKey {
            $( $( #[serde(rename = $name)] $variant, )+ )+
        }

        impl RankKey {
            /// Every key, grouped by category.
            pub const ALL: &'static [RankKey] = &[ $( $( RankKey::$variant, )+ )+ ];

            /// The category this key belongs to.
            #[must_use]
            pub fn category(self) -> Category {
                match self {
                    $( $( RankKey::$variant )|+ => Category::$category, )+
                }
            }

            /// Key used in settings and reason codes, e.g. `"dolbyVision"`.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $( RankKey::$variant => $name, )+ )+
                }
            }
        }
    };
}

rank_keys! {
    Quality => {
        Av1 = "av1", Avc = "avc", Bluray = "bluray", Dvd = "dvd", Hdtv = "hdtv",
        Hevc = "hevc", Mpeg = "mpeg", Remux = "remux", Vhs = "vhs", Web = "web",
        WebDl = "webdl", WebMux = "webmux", Xvid = "xvid",
    }
    Rips => {
        BdRip = "bdrip", BrRip = "brrip", DvdRip = "dvdrip", HdRip = "hdrip",
        PpvRip = "ppvrip", SatRip = "satrip", TvRip = "tvrip", UhdRip = "uhdrip",
        VhsRip = "vhsrip", WebDlRip = "webdlrip", WebRip = "webrip",
    }
    Hdr => {
        Bit10 = "bit10", DolbyVision = "dolbyVision", Hdr = "hdr",
        Hdr10Plus = "hdr10plus", Sdr = "sdr",
    }
    Audio => {
        Aac = "aac", Atmos = "atmos", DolbyDigital = "dolbyDigital",
        DolbyDigitalPlus = "dolbyDigitalPlus", DtsLossy = "dtsLossy",
        DtsLossless = "dtsLossless", Flac = "flac", Mono = "mono", Mp3 = "mp3",
        Stereo = "stereo", Surround = "surround", TrueHd = "truehd",
    }
    Extras => {
        ThreeD = "threeD", Converted = "converted", Documentary = "documentary",
        Dubbed = "dubbed", Edition = "edition", Hardcoded = "hardcoded",
        Network = "network", Proper = "proper", Repack = "repack", Retail = "retail",
        Site = "site", Subbed = "subbed", Upscaled = "upscaled", Scene = "scene",
        Uncensored = "uncensored",
    }
    Trash => {
        Cam = "cam", CleanAudio = "cleanAudio", Pdtv = "pdtv", R5 = "r5",
        Screener = "screener", Size = "size", Telecine = "telecine",
        Telesync = "telesync",
    }
}

impl RankKey {
    /// Reason code used when the fetch gate for this key denies a release.
    #[must_use]
    pub fn reason(self) -> String {
        format!("{}_{}", self.category(), self.as_str())
    }
}

impl fmt::Display for RankKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source labels rejected outright when `removeAllTrash` is set.
pub const TRASH_QUALITIES: &[Quality] = &[
    Quality::CAM,
    Quality::PDTV,
    Quality::R5,
    Quality::Screener,
    Quality::TeleCine,
    Quality::TeleSync,
];

/// Returns `true` for audio labels rejected outright when `removeAllTrash` is set.
#[must_use]
pub fn is_trash_audio(audio: &AudioFormat) -> bool {
    matches!(audio, AudioFormat::HQCleanAudio)
}

/// Flag attributes in fetch-gate order.
pub const FLAGS: &[Flag] = &[
    Flag::ThreeD,
    Flag::Converted,
    Flag::Documentary,
    Flag::Dubbed,
    Flag::Edition,
    Flag::Hardcoded,
    Flag::Network,
    Flag::Proper,
    Flag::Repack,
    Flag::Retail,
    Flag::Subbed,
    Flag::Upscaled,
    Flag::Site,
    Flag::Size,
    Flag::BitDepth,
    Flag::Scene,
    Flag::Uncensored,
];

/// Returns `true` for flags the ranker scores only when the release carries
/// bit depth, HDR, season or episode information. Bit depth itself is
/// always scored with the HDR attributes.
#[must_use]
pub fn is_gated_flag(flag: Flag) -> bool {
    flag != Flag::BitDepth
}

#[must_use]
pub fn quality_key(quality: Quality) -> RankKey {
    match quality {
        Quality::WEB => RankKey::Web,
        Quality::WEBDL => RankKey::WebDl,
        Quality::BluRay => RankKey::Bluray,
        Quality::HDTV => RankKey::Hdtv,
        Quality::VHS => RankKey::Vhs,
        Quality::WEBMux => RankKey::WebMux,
        Quality::BluRayRemux | Quality::Remux => RankKey::Remux,
        Quality::DVD => RankKey::Dvd,
        Quality::WEBRip => RankKey::WebRip,
        Quality::WEBDLRip => RankKey::WebDlRip,
        Quality::UHDRip => RankKey::UhdRip,
        Quality::HDRip => RankKey::HdRip,
        Quality::DVDRip => RankKey::DvdRip,
        Quality::BDRip => RankKey::BdRip,
        Quality::BRRip => RankKey::BrRip,
        Quality::VHSRip => RankKey::VhsRip,
        Quality::PPVRip => RankKey::PpvRip,
        Quality::SATRip => RankKey::SatRip,
        Quality::TVRip => RankKey::TvRip,
        Quality::TeleCine => RankKey::Telecine,
        Quality::TeleSync => RankKey::Telesync,
        Quality::Screener => RankKey::Screener,
        Quality::R5 => RankKey::R5,
        Quality::CAM => RankKey::Cam,
        Quality::PDTV => RankKey::Pdtv,
    }
}

/// DivX has no policy key and is neither gated nor scored.
#[must_use]
pub fn codec_key(codec: VideoCodec) -> Option<RankKey> {
    match codec {
        VideoCodec::AVC => Some(RankKey::Avc),
        VideoCodec::HEVC => Some(RankKey::Hevc),
        VideoCodec::AV1 => Some(RankKey::Av1),
        VideoCodec::XviD => Some(RankKey::Xvid),
        VideoCodec::MPEG => Some(RankKey::Mpeg),
        VideoCodec::DivX => None,
    }
}

#[must_use]
pub fn hdr_key(hdr: HdrFormat) -> RankKey {
    match hdr {
        HdrFormat::DolbyVision => RankKey::DolbyVision,
        HdrFormat::HDR => RankKey::Hdr,
        HdrFormat::HDR10Plus => RankKey::Hdr10Plus,
        HdrFormat::SDR => RankKey::Sdr,
    }
}

#[must_use]
pub fn audio_key(audio: &AudioFormat) -> Option<RankKey> {
    match audio {
        AudioFormat::AAC => Some(RankKey::Aac),
        AudioFormat::Atmos => Some(RankKey::Atmos),
        AudioFormat::DolbyDigital => Some(RankKey::DolbyDigital),
        AudioFormat::DolbyDigitalPlus => Some(RankKey::DolbyDigitalPlus),
        AudioFormat::DTSLossy => Some(RankKey::DtsLossy),
        AudioFormat::DTSLossless => Some(RankKey::DtsLossless),
        AudioFormat::FLAC => Some(RankKey::Flac),
        AudioFormat::MP3 => Some(RankKey::Mp3),
        AudioFormat::TrueHD => Some(RankKey::TrueHd),
        AudioFormat::HQCleanAudio => Some(RankKey::CleanAudio),
        AudioFormat::DualAudio | AudioFormat::Other(_) => None,
    }
}

#[must_use]
pub fn channel_key(channels: ChannelLayout) -> RankKey {
    match channels {
        ChannelLayout::Surround51 | ChannelLayout::Surround71 => RankKey::Surround,
        ChannelLayout::Stereo20 | ChannelLayout::Stereo => RankKey::Stereo,
        ChannelLayout::Mono => RankKey::Mono,
    }
}

#[must_use]
pub fn flag_key(flag: Flag) -> RankKey {
    match flag {
        Flag::ThreeD => RankKey::ThreeD,
        Flag::Converted => RankKey::Converted,
        Flag::Documentary => RankKey::Documentary,
        Flag::Dubbed => RankKey::Dubbed,
        Flag::Edition => RankKey::Edition,
        Flag::Hardcoded => RankKey::Hardcoded,
        Flag::Network => RankKey::Network,
        Flag::Proper => RankKey::Proper,
        Flag::Repack => RankKey::Repack,
        Flag::Retail => RankKey::Retail,
        Flag::Subbed => RankKey::Subbed,
        Flag::Upscaled => RankKey::Upscaled,
        Flag::Site => RankKey::Site,
        Flag::Size => RankKey::Size,
        Flag::BitDepth => RankKey::Bit10,
        Flag::Scene => RankKey::Scene,
        Flag::Uncensored => RankKey::Uncensored,
    }
}

/// Where an attribute key came from, so the ranker can apply the
/// historical extras gate without re-deriving it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Quality,
    Codec,
    Hdr,
    Audio,
    Channels,
    Flag(Flag),
}

/// Enumerates every attribute key present on a release in fetch-gate order:
/// quality, audio, HDR, codec, then flags. Channels are scored but never
/// gated, so they come last.
#[must_use]
pub fn slots(data: &ParsedRelease) -> Vec<(SlotKind, RankKey)> {
    let mut slots = Vec::new();
    if let Some(quality) = data.quality {
        slots.push((SlotKind::Quality, quality_key(quality)));
    }
    slots.extend(
        data.audio
            .iter()
            .filter_map(audio_key)
            .map(|key| (SlotKind::Audio, key)),
    );
    slots.extend(data.hdr.iter().map(|&hdr| (SlotKind::Hdr, hdr_key(hdr))));
    if let Some(key) = data.codec.and_then(codec_key) {
        slots.push((SlotKind::Codec, key));
    }
    slots.extend(
        FLAGS
            .iter()
            .filter(|&&flag| data.is_set(flag))
            .map(|&flag| (SlotKind::Flag(flag), flag_key(flag))),
    );
    slots.extend(
        data.channels
            .iter()
            .map(|&layout| (SlotKind::Channels, channel_key(layout))),
    );
    slots
}

/// Maps a resolution token (`"1080p"`, `"4k"`, `"1920x1080"` ...) to its tier.
#[must_use]
pub fn resolution_from_token(token: &str) -> Resolution {
    match token.to_ascii_lowercase().as_str() {
        "2160p" | "4k" | "uhd" | "3840x2160" => Resolution::UHD2160,
        "1440p" | "1080p" | "1080i" | "1920x1080" => Resolution::FHD1080,
        "720p" | "720i" | "1280x720" => Resolution::HD720,
        "576p" | "576i" | "480p" | "480i" => Resolution::SD480,
        "360p" | "240p" => Resolution::SD360,
        _ => Resolution::Unknown,
    }
}

const ANIME_LANGUAGES: &[&str] = &["ja", "zh", "ko"];

const NON_ANIME_LANGUAGES: &[&str] = &[
    "de", "es", "hi", "ta", "ru", "ua", "th", "it", "ar", "pt", "fr", "pa", "mr", "gu", "te",
    "kn", "ml", "vi", "id", "tr", "he", "fa", "el", "lt", "lv", "et", "pl", "cs", "sk", "hu",
    "ro", "bg", "sr", "hr", "sl", "nl", "da", "fi", "sv", "no", "ms",
];

const COMMON_LANGUAGES: &[&str] = &["de", "es", "hi", "ta", "ru", "ua", "th", "it", "zh", "ar", "fr"];

/// Expands a named language group (`anime`, `non_anime`, `common`, `all`).
#[must_use]
pub fn language_group(name: &str) -> Option<Vec<&'static str>> {
    match name {
        "anime" => Some(ANIME_LANGUAGES.to_vec()),
        "non_anime" => Some(NON_ANIME_LANGUAGES.to_vec()),
        "common" => Some(COMMON_LANGUAGES.to_vec()),
        "all" => Some(
            ANIME_LANGUAGES
                .iter()
                .chain(NON_ANIME_LANGUAGES)
                .copied()
                .collect(),
        ),
        _ => None,
    }
}
