use std::fmt;

use serde::{Deserialize, Serialize};

/// Video resolution tier.
///
/// Ordered from worst to best so that `max()` and sorting pick the higher
/// tier; `Unknown` sorts below every detected resolution.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Resolution {
    /// No resolution token was found.
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
    /// 360p (also 240p)
    #[serde(rename = "360p")]
    SD360,
    /// 480p (also 576p)
    #[serde(rename = "480p")]
    SD480,
    /// 720p: High Definition
    #[serde(rename = "720p")]
    HD720,
    /// 1080p: Full HD (also 1440p)
    #[serde(rename = "1080p")]
    FHD1080,
    /// 2160p: Ultra HD / 4K
    #[serde(rename = "2160p")]
    UHD2160,
}

impl Resolution {
    /// All tiers, best first.
    pub const ALL: [Resolution; 6] = [
        Self::UHD2160,
        Self::FHD1080,
        Self::HD720,
        Self::SD480,
        Self::SD360,
        Self::Unknown,
    ];

    /// Canonical label, e.g. `"1080p"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::SD360 => "360p",
            Self::SD480 => "480p",
            Self::HD720 => "720p",
            Self::FHD1080 => "1080p",
            Self::UHD2160 => "2160p",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Acquisition source claimed by a release.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quality {
    #[serde(rename = "WEB")]
    WEB,
    #[serde(rename = "WEB-DL")]
    WEBDL,
    BluRay,
    #[serde(rename = "BluRay REMUX")]
    BluRayRemux,
    #[serde(rename = "REMUX")]
    Remux,
    HDTV,
    VHS,
    WEBMux,
    DVD,
    WEBRip,
    #[serde(rename = "WEB-DLRip")]
    WEBDLRip,
    UHDRip,
    HDRip,
    DVDRip,
    BDRip,
    BRRip,
    VHSRip,
    PPVRip,
    SATRip,
    TVRip,
    TeleCine,
    TeleSync,
    #[serde(rename = "SCR")]
    Screener,
    R5,
    CAM,
    PDTV,
}

impl Quality {
    /// Canonical label, e.g. `"WEB-DL"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WEB => "WEB",
            Self::WEBDL => "WEB-DL",
            Self::BluRay => "BluRay",
            Self::BluRayRemux => "BluRay REMUX",
            Self::Remux => "REMUX",
            Self::HDTV => "HDTV",
            Self::VHS => "VHS",
            Self::WEBMux => "WEBMux",
            Self::DVD => "DVD",
            Self::WEBRip => "WEBRip",
            Self::WEBDLRip => "WEB-DLRip",
            Self::UHDRip => "UHDRip",
            Self::HDRip => "HDRip",
            Self::DVDRip => "DVDRip",
            Self::BDRip => "BDRip",
            Self::BRRip => "BRRip",
            Self::VHSRip => "VHSRip",
            Self::PPVRip => "PPVRip",
            Self::SATRip => "SATRip",
            Self::TVRip => "TVRip",
            Self::TeleCine => "TeleCine",
            Self::TeleSync => "TeleSync",
            Self::Screener => "SCR",
            Self::R5 => "R5",
            Self::CAM => "CAM",
            Self::PDTV => "PDTV",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Video codec, canonicalized (`x264` and `H.264` both become `AVC`).
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VideoCodec {
    AVC,
    HEVC,
    AV1,
    XviD,
    DivX,
    MPEG,
}

impl fmt::Display for VideoCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AVC => write!(f, "AVC"),
            Self::HEVC => write!(f, "HEVC"),
            Self::AV1 => write!(f, "AV1"),
            Self::XviD => write!(f, "XviD"),
            Self::DivX => write!(f, "DivX"),
            Self::MPEG => write!(f, "MPEG"),
        }
    }
}

/// Colour bit depth. Only the depths seen in release names are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BitDepth {
    #[serde(rename = "8bit")]
    Bit8,
    #[serde(rename = "10bit")]
    Bit10,
    #[serde(rename = "12bit")]
    Bit12,
}

impl fmt::Display for BitDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bit8 => write!(f, "8bit"),
            Self::Bit10 => write!(f, "10bit"),
            Self::Bit12 => write!(f, "12bit"),
        }
    }
}

/// Dynamic range format.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HdrFormat {
    #[serde(rename = "DV")]
    DolbyVision,
    #[serde(rename = "HDR10+")]
    HDR10Plus,
    HDR,
    SDR,
}

impl fmt::Display for HdrFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DolbyVision => write!(f, "DV"),
            Self::HDR10Plus => write!(f, "HDR10+"),
            Self::HDR => write!(f, "HDR"),
            Self::SDR => write!(f, "SDR"),
        }
    }
}

/// Audio channel layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelLayout {
    #[serde(rename = "7.1")]
    Surround71,
    #[serde(rename = "5.1")]
    Surround51,
    #[serde(rename = "2.0")]
    Stereo20,
    #[serde(rename = "stereo")]
    Stereo,
    #[serde(rename = "mono")]
    Mono,
}

impl fmt::Display for ChannelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surround71 => write!(f, "7.1"),
            Self::Surround51 => write!(f, "5.1"),
            Self::Stereo20 => write!(f, "2.0"),
            Self::Stereo => write!(f, "stereo"),
            Self::Mono => write!(f, "mono"),
        }
    }
}

/// Audio format. Tokens without a canonical name are kept uppercased in
/// [`AudioFormat::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AudioFormat {
    AAC,
    Atmos,
    DolbyDigital,
    DolbyDigitalPlus,
    DTSLossy,
    DTSLossless,
    FLAC,
    MP3,
    TrueHD,
    HQCleanAudio,
    DualAudio,
    Other(String),
}

impl AudioFormat {
    /// Maps a canonical label back to its variant.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "AAC" => Self::AAC,
            "Atmos" => Self::Atmos,
            "Dolby Digital" => Self::DolbyDigital,
            "Dolby Digital Plus" => Self::DolbyDigitalPlus,
            "DTS Lossy" => Self::DTSLossy,
            "DTS Lossless" => Self::DTSLossless,
            "FLAC" => Self::FLAC,
            "MP3" => Self::MP3,
            "TrueHD" => Self::TrueHD,
            "HQ Clean Audio" => Self::HQCleanAudio,
            "Dual Audio" => Self::DualAudio,
            other => Self::Other(other.to_uppercase()),
        }
    }

    /// Canonical label, e.g. `"Dolby Digital Plus"`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::AAC => "AAC",
            Self::Atmos => "Atmos",
            Self::DolbyDigital => "Dolby Digital",
            Self::DolbyDigitalPlus => "Dolby Digital Plus",
            Self::DTSLossy => "DTS Lossy",
            Self::DTSLossless => "DTS Lossless",
            Self::FLAC => "FLAC",
            Self::MP3 => "MP3",
            Self::TrueHD => "TrueHD",
            Self::HQCleanAudio => "HQ Clean Audio",
            Self::DualAudio => "Dual Audio",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for AudioFormat {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<AudioFormat> for String {
    fn from(format: AudioFormat) -> Self {
        format.as_str().to_string()
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
