use regex::Captures;

use super::language::language_rules;
use super::pipeline::{Claim, ParseState, Rule, TITLE_END, number, push_unique, title_end};
use crate::error::{Result, RtnError};
use crate::mapping::resolution_from_token;
use crate::types::{
    AudioFormat, BitDepth, ChannelLayout, HdrFormat, ParsedRelease, Quality, Resolution, VideoCodec,
};

/// Widest episode or season range accepted from an implicit `01-05` form.
const MAX_RANGE_SPAN: u32 = 50;

const SITE_TLDS: &str = "com|org|net|to|tv|mx|ms|nu|vip|info|cc|ws|li|io|me|se|co|ru|lol|one|xyz";

/// Release-name parser built from an ordered table of regex rules.
///
/// Rules run as a fold over `(remaining text, fields)`: detection rules for
/// adult, site and trash tags first, then technical attributes, numbering,
/// tags and languages. Accepted matches are claimed in the working copy so
/// later rules do not see them, and the title is whatever precedes the
/// first claimed span.
pub struct ReleaseParser {
    rules: Vec<Rule>,
}

impl ReleaseParser {
    /// Compiles the rule table.
    ///
    /// # Errors
    ///
    /// Returns `RtnError::RegexError` if any pattern fails to compile
    /// (should never happen with the static patterns defined here).
    pub fn new() -> Result<Self> {
        let mut rules = Vec::new();
        rules.extend(detection_rules()?);
        rules.extend(technical_rules()?);
        rules.extend(quality_rules()?);
        rules.extend(tag_rules()?);
        rules.extend(audio_rules()?);
        rules.extend(episode_rules()?);
        rules.extend(season_rules()?);
        rules.extend(trailing_rules()?);
        rules.extend(language_rules()?);
        Ok(Self { rules })
    }

    /// Parses one raw release name.
    ///
    /// # Errors
    ///
    /// Returns `RtnError::InvalidInput` if the input is empty or whitespace-only.
    pub fn parse(&self, raw_title: &str) -> Result<ParsedRelease> {
        let trimmed = raw_title.trim();
        if trimmed.is_empty() {
            return Err(RtnError::InvalidInput("raw title is empty".into()));
        }

        let state = self
            .rules
            .iter()
            .fold(ParseState::new(trimmed), |state, rule| rule.apply(state));

        let mut release = finish(state);
        release.raw_title = raw_title.to_string();
        tracing::debug!(raw = raw_title, parsed = %release, "parsed release");
        Ok(release)
    }

    /// Number of compiled rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

/// Parses `raw_title` with a freshly compiled [`ReleaseParser`].
///
/// Prefer holding a parser when parsing many names.
///
/// # Errors
///
/// Same as [`ReleaseParser::parse`].
pub fn parse(raw_title: &str) -> Result<ParsedRelease> {
    ReleaseParser::new()?.parse(raw_title)
}

fn detection_rules() -> Result<Vec<Rule>> {
    Ok(vec![
        Rule::new("extension", r"(?i)\.(3g2|3gp|avi|flv|mkv|mk3d|mov|mp2|mp4|m4v|mpe|mpeg|mpg|mpv|webm|wmv|ogm|divx|ts|m2ts|iso|vob|srt|ssa|ass|vtt|sub|idx|nfo|txt)$", |c, _, r| {
            let extension = c[1].to_ascii_lowercase();
            if matches!(extension.as_str(), "mkv" | "avi" | "mp4" | "wmv" | "mpg" | "mpeg" | "m4v" | "webm" | "mov") {
                r.container = Some(extension.to_ascii_uppercase());
            }
            r.extension = Some(extension);
            true
        })?,
        Rule::flag(
            "adult",
            r"(?i)\b(?:xxx|porn|pornhub|xvideos|brazzers|bangbros|realitykings|naughty[ .]?america|onlyfans|hentai)\b",
            |r| r.adult = true,
        )?
        .claim(Claim::Keep),
        Rule::new("site", &format!(r"(?i)^\s*((?:www\.)?[\w\-]+\.(?:{SITE_TLDS}))\s*[-–|:]\s*"), |c, _, r| {
            r.site = Some(c[1].to_string());
            true
        })?
        .claim(Claim::Strip),
        Rule::new("site", &format!(r"(?i)[\[(]\s*((?:www\.)?[\w\-]+\.(?:{SITE_TLDS}))\s*[\])]"), |c, _, r| {
            r.site.get_or_insert_with(|| c[1].to_string());
            true
        })?
        .claim(Claim::Strip)
        .every(),
        Rule::new("site", r"(?i)\b(rarbg|torrentleech|thepiratebay|piratebay|eztv|ettv)\b", |c, _, r| {
            r.site = Some(c[1].to_ascii_lowercase());
            true
        })?
        .claim(Claim::Keep)
        .skip_if(|r| r.site.is_some()),
        Rule::flag(
            "scene",
            r"-(?:CAKES|GGEZ|GGWP|GLHF|GOSSIP|NAISU|KOGI|PECULATE|SLOT|EDITH|ETHEL|ELEANOR|B2B|SPAMnEGGS|FTP|DiRT|SYNCOPY|BAE|SuccessfulCrab|NHTFS|SURCODE|B0MBARDIERS)\b",
            |r| r.scene = true,
        )?
        .claim(Claim::Keep),
        Rule::new("scene", r"(?i)\b\d{3,4}p\b.*[ ._]WEB[ ._](DL)?", |c, _, r| {
            if c.get(1).is_some() {
                return false;
            }
            r.scene = true;
            true
        })?
        .claim(Claim::Keep)
        .skip_if(|r| r.scene),
        Rule::flag(
            "trash",
            r"(?i)\b(?:(?:H[DQ][ .\-]*)?CAM(?:H[DQ])?(?:[ .\-]*Rip|Rp)?|(?:HD[ .\-]*)?T(?:ELE)?S(?:YNC)?(?:Rip)?|(?:HD[ .\-]*)?T(?:ELE)?C(?:INE)?(?:Rip)?|P(?:re)?DVD(?:Rip)?|(?:DVD|BD|BR)?[ .\-]?SCR(?:EENER)?S?|DVB[ .\-]?(?:Rip)?|SAT[ .\-]?Rips?|Leaked|R[56]|HQ[ .\-]*Clean[ .\-]*Audio)\b",
            |r| r.trash = true,
        )?
        .claim(Claim::Keep),
        Rule::new("group", r"^\s*\[([^\[\]]+)\]", |c, _, r| {
            let group = c[1].trim();
            if !looks_like_group(group) {
                return false;
            }
            r.group = Some(group.to_string());
            true
        })?
        .claim(Claim::Strip),
    ])
}

fn looks_like_group(text: &str) -> bool {
    !text.is_empty()
        && !text.chars().all(|c| c.is_ascii_digit())
        && resolution_from_token(text) == Resolution::Unknown
}

fn technical_rules() -> Result<Vec<Rule>> {
    Ok(vec![
        Rule::new("episode_code", r"[\[(]([A-Fa-f0-9]{8})[\])][\s\x00]*$", |c, _, r| {
            r.episode_code = Some(c[1].to_ascii_uppercase());
            true
        })?,
        Rule::new("size", r"(?i)\b\d+(?:[.,]\d+)?[ ]?(?:GB|GiB|MB|MiB|TB|TiB)\b", |c, _, r| {
            r.size = Some(c[0].replace(' ', ""));
            true
        })?,
        Rule::new("bit_depth", r"(?i)\b(8|10|12)[ .\-]?bits?\b", |c, _, r| {
            r.bit_depth = match &c[1] {
                "8" => Some(BitDepth::Bit8),
                "12" => Some(BitDepth::Bit12),
                _ => Some(BitDepth::Bit10),
            };
            true
        })?,
        Rule::flag("bit_depth", r"(?i)\b(?:hi10p?|hevc[ .\-]?10|hdr10)", |r| {
            r.bit_depth = Some(BitDepth::Bit10);
        })?
        .claim(Claim::Keep)
        .skip_if(|r| r.bit_depth.is_some()),
        Rule::flag(
            "complete",
            r"(?i)\b(?:the[ ._])?complete[ ._\-]+(?:series|seasons?|collection|box[ ._]?set|pack|trilogy|saga|movies)\b",
            |r| r.complete = true,
        )?,
        Rule::new(
            "resolution",
            r"(?i)\b(2160p|1440p|1080[pi]|720[pi]|576[pi]|480[pi]|360p|240p|4k|3840x2160|1920x1080|1280x720)\b",
            |c, _, r| {
                r.resolution = resolution_from_token(&c[1]);
                true
            },
        )?,
        Rule::flag("resolution", r"\bUHD\b", |r| r.resolution = Resolution::UHD2160)?
            .claim(Claim::Keep)
            .skip_if(|r| r.resolution != Resolution::Unknown),
        Rule::new(
            "date",
            r"\b((?:19|20)\d{2})[.\-_ ](0[1-9]|1[0-2])[.\-_ ](0[1-9]|[12]\d|3[01])\b",
            |c, _, r| {
                r.date = Some(format!("{}-{}-{}", &c[1], &c[2], &c[3]));
                true
            },
        )?,
        Rule::new("year", r"[\[(]\s*((?:19|20)\d{2})\s*[\])]", set_year)?,
        Rule::new(
            "year",
            r"\b((?:19|20)\d{2})[ ]?[-–][ ]?(?:19|20)\d{2}\b",
            set_year,
        )?
        .skip_if(|r| r.year.is_some()),
        // Greedy prefix: the last year that does not open the name.
        Rule::new("year", r"^.+\b((?:19|20)\d{2})\b", set_year)?
            .group(1)
            .skip_if(|r| r.year.is_some()),
    ])
}

fn set_year(caps: &Captures<'_>, _: &str, release: &mut ParsedRelease) -> bool {
    match caps[1].parse() {
        Ok(year) => {
            release.year = Some(year);
            true
        }
        Err(_) => false,
    }
}

/// First match wins; earlier entries shadow the looser patterns below them.
const QUALITIES: &[(&str, Quality)] = &[
    (r"(?i)\b(?:Blu[ .\-]?Ray|BD|UHD)[ .\-]?REMUX\b|\bBDREMUX\b", Quality::BluRayRemux),
    (r"(?i)\bREMUX(?:ED)?\b", Quality::Remux),
    (r"(?i)\bWEB[ .\-]?DL[ .\-]?Rip\b", Quality::WEBDLRip),
    (r"(?i)\bWEB[ .\-]?Rip\b", Quality::WEBRip),
    (r"(?i)\bWEB[ .\-]?(?:DL|HD)\b", Quality::WEBDL),
    (r"(?i)\b(?:DL|WEB|BD|BR)MUX\b", Quality::WEBMux),
    (r"(?i)\bBD[ .\-]?Rip\b|\bBDR\b", Quality::BDRip),
    (r"(?i)\bUHD[ .\-]?Rip\b", Quality::UHDRip),
    (r"(?i)\b(?:BR|Blu[ .\-]?Ray)[ .\-]?Rip\b", Quality::BRRip),
    (r"(?i)\bHD[ .\-]?Rip\b", Quality::HDRip),
    (r"(?i)\bDVD[ .\-]?Rip\b", Quality::DVDRip),
    (r"(?i)\b(?:HD)?TV[ .\-]?Rip\b", Quality::TVRip),
    (r"(?i)\bPPV[ .\-]?Rip\b", Quality::PPVRip),
    (r"(?i)\b(?:SAT|DVB)[ .\-]?Rips?\b", Quality::SATRip),
    (r"(?i)\bVHS[ .\-]?Rip\b", Quality::VHSRip),
    (r"(?i)\b(?:DVD|BD|BR)?[ .\-]?SCR(?:EENER)?S?\b|\bP(?:re)?DVD(?:Rip)?\b", Quality::Screener),
    (r"(?i)\b(?:HD[ .\-]?)?(?:TS|TELESYNC|TSRip)\b", Quality::TeleSync),
    (r"(?i)\b(?:HD[ .\-]?)?(?:TC|TELECINE|TCRip)\b", Quality::TeleCine),
    (r"(?i)\b(?:H[DQ][ .\-]?)?CAM(?:H[DQ])?(?:[ .\-]?Rip|Rp)?\b", Quality::CAM),
    (r"\bR5\b", Quality::R5),
    (r"(?i)\bPDTV\b", Quality::PDTV),
    (r"(?i)\bBlu[ .\-]?Ray\b|\bBD(?:25|50|5|9)?\b|\bBDMV\b", Quality::BluRay),
    (r"(?i)\bHD[ .\-]?TV\b", Quality::HDTV),
    (r"(?i)\bDVD(?:R|5|9)?\b|\bVIDEO[ ._]TS\b", Quality::DVD),
    (r"(?i)\bVHS\b", Quality::VHS),
];

fn quality_rules() -> Result<Vec<Rule>> {
    let mut rules = Vec::with_capacity(QUALITIES.len() + 3);

    // BluRay and REMUX apart from each other: only the REMUX tag is claimed.
    for pattern in [
        r"(?i)\bBlu[ .\-]?Ray\b.*\b(REMUX)\b",
        r"(?i)\b(REMUX)\b.*\bBlu[ .\-]?Ray\b",
    ] {
        rules.push(
            Rule::flag("quality", pattern, |r| r.quality = Some(Quality::BluRayRemux))?
                .group(1)
                .skip_if(|r| r.quality.is_some()),
        );
    }

    for &(pattern, quality) in QUALITIES {
        rules.push(
            Rule::new("quality", pattern, move |_, _, r| {
                r.quality = Some(quality);
                true
            })?
            .skip_if(|r| r.quality.is_some()),
        );
    }

    // A bare WEB is a common title word.
    rules.push(
        Rule::flag("quality", r"(?i)\bWEB\b", |r| r.quality = Some(Quality::WEB))?
            .tail_only()
            .skip_if(|r| r.quality.is_some()),
    );

    rules.push(Rule::new(
        "codec",
        r"(?i)\b([xh][ .]?26[45]|avc|hevc(?:10)?|av1|xvid|divx|mpeg[ \-]?2?)\b",
        |c, _, r| {
            r.codec = codec_from_token(&c[1]);
            r.codec.is_some()
        },
    )?);
    Ok(rules)
}

fn codec_from_token(token: &str) -> Option<VideoCodec> {
    let token = token.to_ascii_lowercase();
    if token.ends_with("264") || token == "avc" {
        Some(VideoCodec::AVC)
    } else if token.ends_with("265") || token.starts_with("hevc") {
        Some(VideoCodec::HEVC)
    } else if token.starts_with("mpeg") {
        Some(VideoCodec::MPEG)
    } else {
        match token.as_str() {
            "av1" => Some(VideoCodec::AV1),
            "xvid" => Some(VideoCodec::XviD),
            "divx" => Some(VideoCodec::DivX),
            _ => None,
        }
    }
}

fn tag_rules() -> Result<Vec<Rule>> {
    Ok(vec![
        Rule::new(
            "edition",
            r"(?i)\b(?:(?:director'?s|extended|collector'?s|theatrical|ultimate|special|final|anniversary|diamond|criterion|imax)[ .\-_]+(?:cut|edition|version|collection)|\d{2,3}th[ .\-_]+anniversary[ .\-_]+edition|imax)\b",
            |c, _, r| {
                let edition = edition_label(&c[0]);
                if edition.starts_with("Extended") {
                    r.extended = true;
                }
                r.edition = Some(edition);
                true
            },
        )?
        .tail_only(),
        Rule::flag("extended", r"(?i)\bEXTENDED\b", |r| r.extended = true)?.tail_only(),
        Rule::flag("remastered", r"(?i)\bRemaster(?:ed)?\b", |r| r.remastered = true)?.tail_only(),
        Rule::flag("unrated", r"(?i)\b(?:unrated|uncut)\b", |r| r.unrated = true)?.tail_only(),
        Rule::flag("uncensored", r"(?i)\buncensored\b", |r| r.uncensored = true)?.tail_only(),
        Rule::flag("proper", r"(?i)\b(?:REAL[ .])?PROPER\b", |r| r.proper = true)?.tail_only(),
        Rule::flag("repack", r"(?i)\b(?:REPACK|RERIP)\b", |r| r.repack = true)?.tail_only(),
        Rule::flag("retail", r"(?i)\bRetail\b", |r| r.retail = true)?.tail_only(),
        Rule::flag("documentary", r"(?i)\bDOCU(?:mentary)?\b", |r| r.documentary = true)?.tail_only(),
        Rule::flag("commentary", r"(?i)\bcommentary\b", |r| r.commentary = true)?.tail_only(),
        Rule::flag("converted", r"(?i)\bCONVERT(?:ED)?\b", |r| r.converted = true)?.tail_only(),
        Rule::flag("hardcoded", r"(?i)\b(?:HC|HARDCODED|HARDSUBS?)\b", |r| r.hardcoded = true)?.tail_only(),
        Rule::flag(
            "upscaled",
            r"(?i)\b(?:AI[ .\-]?)?(?:Upscal(?:ed?|ing)|Enhanced)\b",
            |r| r.upscaled = true,
        )?
        .tail_only(),
        Rule::flag(
            "three_d",
            r"(?i)\b(?:3D|(?:H|Half|Full)[ .\-]?(?:SBS|OU|TAB)|SBS|HSBS|HOU)\b",
            |r| r.three_d = true,
        )?
        .tail_only(),
        Rule::flag("ppv", r"(?i)\bPPV\b", |r| r.ppv = true)?.tail_only(),
        Rule::new("region", r"\bR([0-46-9])\b", |c, _, r| {
            r.region = Some(format!("R{}", &c[1]));
            true
        })?
        .tail_only(),
    ])
}

fn edition_label(text: &str) -> String {
    text.replace(['\'', '’'], "")
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            if word.eq_ignore_ascii_case("imax") {
                return "IMAX".to_string();
            }
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn audio_rules() -> Result<Vec<Rule>> {
    Ok(vec![
        Rule::new(
            "channels",
            r"(?:^|[^\d.]|[A-Za-z]\.)([257][ .][01])(?:ch)?(?:[^\d]|$)",
            |c, _, r| match &c[1][..1] {
                "7" if c[1].ends_with('1') => {
                    push_unique(&mut r.channels, ChannelLayout::Surround71);
                    true
                }
                "5" if c[1].ends_with('1') => {
                    push_unique(&mut r.channels, ChannelLayout::Surround51);
                    true
                }
                "2" if c[1].ends_with('0') => {
                    push_unique(&mut r.channels, ChannelLayout::Stereo20);
                    true
                }
                _ => false,
            },
        )?
        .group(1)
        .every(),
        Rule::new("channels", r"(?i)\b([268])ch\b", |c, _, r| {
            let layout = match &c[1] {
                "8" => ChannelLayout::Surround71,
                "6" => ChannelLayout::Surround51,
                _ => ChannelLayout::Stereo20,
            };
            push_unique(&mut r.channels, layout);
            true
        })?
        .every(),
        Rule::flag("channels", r"(?i)\bstereo\b", |r| push_unique(&mut r.channels, ChannelLayout::Stereo))?
            .tail_only(),
        Rule::flag("channels", r"(?i)\bmono\b", |r| push_unique(&mut r.channels, ChannelLayout::Mono))?
            .tail_only(),
        Rule::new(
            "audio",
            r"(?i)\b(DD\+|(?:DTS[ .\-]?HD[ .\-]?MA|DTS[ .\-]?X|DTS[ .\-]?Lossless|True[ .\-]?HD|Atmos|E[ .\-]?AC[ .\-]?3|DDP|Dolby[ .\-]?Digital[ .\-]?Plus|AC[ .\-]?3|DD|Dolby[ .\-]?Digital|DTS[ .\-]?HD(?:[ .\-]?HRA?)?|DTS[ .\-]?ES|DTS|HE[ .\-]?AAC|AAC(?:[ .\-]?LC)?|FLAC|MP3|OPUS|L?PCM|HQ[ .\-]?Clean[ .\-]?Audio|Dual[ .\-]?Audio)\b)",
            |c, _, r| {
                push_unique(&mut r.audio, audio_from_token(&c[1]));
                true
            },
        )?
        .every(),
        Rule::flag("hdr", r"(?i)\b(?:DV|DoVi|Dolby[ .\-]?Vision)\b", |r| {
            push_unique(&mut r.hdr, HdrFormat::DolbyVision);
        })?
        .every()
        .tail_only(),
        Rule::flag("hdr", r"(?i)\bHDR10(?:\+|[ .\-]?Plus\b|P\b)", |r| {
            push_unique(&mut r.hdr, HdrFormat::HDR10Plus);
        })?
        .every(),
        Rule::flag("hdr", r"(?i)\bHDR(?:10)?\b", |r| push_unique(&mut r.hdr, HdrFormat::HDR))?.every(),
        Rule::flag("hdr", r"(?i)\bSDR\b", |r| push_unique(&mut r.hdr, HdrFormat::SDR))?.every(),
    ])
}

fn audio_from_token(token: &str) -> AudioFormat {
    let key: String = token
        .chars()
        .filter(|c| !matches!(c, ' ' | '.' | '-'))
        .flat_map(char::to_lowercase)
        .collect();
    match key.as_str() {
        "dtshdma" | "dtsx" | "dtslossless" => AudioFormat::DTSLossless,
        "truehd" => AudioFormat::TrueHD,
        "atmos" => AudioFormat::Atmos,
        "eac3" | "ddp" | "dd+" | "dolbydigitalplus" => AudioFormat::DolbyDigitalPlus,
        "ac3" | "dd" | "dolbydigital" => AudioFormat::DolbyDigital,
        "dtshd" | "dtshdhr" | "dtshdhra" | "dtses" | "dts" => AudioFormat::DTSLossy,
        "aac" | "aaclc" | "heaac" => AudioFormat::AAC,
        "flac" => AudioFormat::FLAC,
        "mp3" => AudioFormat::MP3,
        "hqcleanaudio" => AudioFormat::HQCleanAudio,
        "dualaudio" => AudioFormat::DualAudio,
        _ => AudioFormat::Other(token.to_ascii_uppercase()),
    }
}

/// `(?:S01)?` prefix shared by the `E..` forms; capture 1 feeds the seasons.
const SEASON_PREFIX: &str = r"(?:\bS(\d{1,3})[ .\-_]?|\b)";

fn add_range(values: &mut Vec<u32>, start: u32, end: u32) {
    values.extend(start..=end);
}

fn valid_range(start: u32, end: u32) -> bool {
    start < end && end - start <= MAX_RANGE_SPAN
}

fn add_season(caps: &Captures<'_>, release: &mut ParsedRelease) {
    if let Some(season) = number(caps, 1) {
        push_unique(&mut release.seasons, season);
    }
}

fn episode_rules() -> Result<Vec<Rule>> {
    Ok(vec![
        Rule::new(
            "episodes",
            &format!(r"(?i){SEASON_PREFIX}E(\d{{1,4}})((?:E\d{{1,4}})+)\b"),
            |c, _, r| {
                add_season(c, r);
                r.episodes.extend(number(c, 2));
                r.episodes.extend(
                    c[3].split(['E', 'e'])
                        .filter_map(|n| n.parse::<u32>().ok()),
                );
                true
            },
        )?
        .every(),
        Rule::new(
            "episodes",
            &format!(r"(?i){SEASON_PREFIX}E(\d{{1,4}})[ ]?[-~][ ]?E(\d{{1,4}})\b"),
            |c, _, r| {
                let (Some(start), Some(end)) = (number(c, 2), number(c, 3)) else {
                    return false;
                };
                if start > end {
                    return false;
                }
                add_season(c, r);
                add_range(&mut r.episodes, start, end);
                true
            },
        )?
        .every(),
        Rule::new(
            "episodes",
            &format!(r"(?i){SEASON_PREFIX}E(\d{{1,4}})[ ]?[-~][ ]?(\d{{1,4}})\b"),
            |c, _, r| {
                let (Some(start), Some(end)) = (number(c, 2), number(c, 3)) else {
                    return false;
                };
                if !valid_range(start, end) {
                    return false;
                }
                add_season(c, r);
                add_range(&mut r.episodes, start, end);
                true
            },
        )?
        .every(),
        Rule::new(
            "episodes",
            &format!(r"(?i){SEASON_PREFIX}E(\d{{1,4}})\b"),
            |c, _, r| {
                add_season(c, r);
                r.episodes.extend(number(c, 2));
                true
            },
        )?
        .every(),
        Rule::new("episodes", r"(?i)\b(\d{1,2})x(\d{1,3})\b", |c, _, r| {
            add_season(c, r);
            r.episodes.extend(number(c, 2));
            true
        })?
        .every(),
        Rule::new(
            "episodes",
            r"(?i)\bEpisodes?[ .\-_]?(\d{1,4})[ ]?[-~][ ]?(\d{1,4})\b",
            |c, _, r| {
                let (Some(start), Some(end)) = (number(c, 1), number(c, 2)) else {
                    return false;
                };
                if start > end {
                    return false;
                }
                add_range(&mut r.episodes, start, end);
                true
            },
        )?,
        Rule::new("episodes", r"(?i)\b(?:Episode|Ep)[ .\-_]?(\d{1,4})\b", |c, _, r| {
            r.episodes.extend(number(c, 1));
            true
        })?
        .skip_if(|r| !r.episodes.is_empty()),
        // Anime numbering: `Title - 087 [1080p]`, `Title - 01-12`.
        Rule::new(
            "episodes",
            r"(?:^|\s)-\s(\d{1,4})(?:-(\d{1,4}))?(?:v\d)?(?:\s|$|[\[(\x00])",
            |c, remaining, r| {
                let start = c.get(0).map_or(0, |m| m.start());
                if remaining[..start].to_lowercase().contains("movie") {
                    return false;
                }
                let Some(first) = number(c, 1) else {
                    return false;
                };
                match number(c, 2) {
                    Some(last) if valid_range(first, last) => add_range(&mut r.episodes, first, last),
                    Some(_) => return false,
                    None => r.episodes.push(first),
                }
                true
            },
        )?
        .skip_if(|r| !r.episodes.is_empty()),
        Rule::new("episodes", r"(?i)\b(\d{1,2})[ ]?of[ ]?\d{1,2}\b", |c, _, r| {
            r.episodes.extend(number(c, 1));
            true
        })?
        .skip_if(|r| !r.episodes.is_empty()),
    ])
}

fn season_rules() -> Result<Vec<Rule>> {
    let range = |c: &Captures<'_>, _: &str, r: &mut ParsedRelease| {
        let (Some(start), Some(end)) = (number(c, 1), number(c, 2)) else {
            return false;
        };
        if !valid_range(start, end) {
            return false;
        }
        add_range(&mut r.seasons, start, end);
        true
    };

    Ok(vec![
        Rule::new("seasons", r"(?i)\bS(\d{1,2})[ ]?[-~][ ]?S?(\d{1,2})\b", range)?.every(),
        Rule::new(
            "seasons",
            r"(?i)\bSeasons?[ .\-_]*(\d{1,2})[ .\-_]*(?:-|~|to|&|and)[ .\-_]*(\d{1,2})\b",
            range,
        )?
        .every(),
        Rule::new(
            "seasons",
            r"(?i)\b(?:Seasons?|Saison|Temporada|Staffel|Stagione)[ .\-_]*(\d{1,3})\b",
            |c, _, r| {
                add_season(c, r);
                true
            },
        )?
        .every(),
        Rule::new("seasons", r"(?i)\bS(\d{1,3})\b", |c, _, r| {
            add_season(c, r);
            true
        })?
        .every(),
        Rule::flag("complete", r"(?i)\bcomplete\b", |r| r.complete = true)?.tail_only(),
    ])
}

fn trailing_rules() -> Result<Vec<Rule>> {
    Ok(vec![
        Rule::new(
            "network",
            r"\b(AMZN|NF|DSNP|HMAX|ATVP|PCOK|PMTP|HULU|CRAV|STAN|iT|iP|CR|FUNi|Netflix|Amazon|Hulu|Disney)\b",
            |c, _, r| {
                r.network = Some(network_name(&c[1]).to_string());
                true
            },
        )?
        .tail_only(),
        Rule::new(
            "group",
            r"-\s?([A-Za-z0-9](?:[\w.@]*?[A-Za-z0-9])?)\s*(?:\[[^\[\]]*\]|\([^()]*\))?[\s\x00.]*$",
            |c, remaining, r| {
                let start = c.get(0).map_or(0, |m| m.start());
                let group = &c[1];
                if title_end(remaining).is_none_or(|end| end > start)
                    || group.chars().all(|ch| ch.is_ascii_digit())
                {
                    return false;
                }
                r.group = Some(group.to_string());
                true
            },
        )?
        .skip_if(|r| r.group.is_some()),
        Rule::flag(
            "subbed",
            r"(?i)\b(?:SUBBED|SUBS?|E-?SUBS?|MULTi[ .\-]?SUBS?|VOSTFR|SOFTSUBS?)\b",
            |r| r.subbed = true,
        )?
        .claim(Claim::Keep)
        .tail_only(),
        Rule::flag(
            "dubbed",
            r"(?i)\b(?:DUBBED|DUB|DUAL(?:[ .\-]?AUDIO)?|MULTi(?:[ .\-]?(?:AUDIO|LANG))?|DUBLADO)\b",
            |r| r.dubbed = true,
        )?
        .claim(Claim::Keep)
        .tail_only(),
    ])
}

fn network_name(tag: &str) -> &'static str {
    match tag {
        "AMZN" | "Amazon" => "Amazon",
        "NF" | "Netflix" => "Netflix",
        "DSNP" | "Disney" => "Disney",
        "HMAX" => "HBO Max",
        "ATVP" => "Apple TV",
        "PCOK" => "Peacock",
        "PMTP" => "Paramount+",
        "HULU" | "Hulu" => "Hulu",
        "CRAV" => "Crave",
        "STAN" => "Stan",
        "iT" => "iTunes",
        "iP" => "BBC iPlayer",
        "CR" => "Crunchyroll",
        "FUNi" => "Funimation",
        _ => "Unknown",
    }
}

/// Derives the title and normalizes list fields once every rule has run.
fn finish(state: ParseState) -> ParsedRelease {
    let ParseState { remaining, mut release } = state;

    release.title = extract_title(&remaining);
    if release.title.is_empty() {
        if let Some(year) = release.year.take() {
            release.title = year.to_string();
        }
    }

    release.seasons.sort_unstable();
    release.seasons.dedup();
    release.episodes.sort_unstable();
    release.episodes.dedup();
    if release.audio.contains(&AudioFormat::DualAudio) {
        release.dubbed = true;
    }
    release.refresh();
    release
}

fn extract_title(remaining: &str) -> String {
    let title = clean_title(remaining.split(TITLE_END).next().unwrap_or(""));
    if !title.is_empty() {
        return title;
    }
    remaining
        .split(TITLE_END)
        .map(clean_title)
        .find(|segment| segment.chars().any(char::is_alphabetic))
        .unwrap_or_default()
}

/// Drops bracketed text and separators, collapsing whitespace.
fn clean_title(region: &str) -> String {
    let mut depth = 0usize;
    let mut kept = String::with_capacity(region.len());
    for c in region.chars() {
        match c {
            '[' | '(' | '{' => depth += 1,
            ']' | ')' | '}' => depth = depth.saturating_sub(1),
            '.' | '_' if depth == 0 => kept.push(' '),
            _ if depth == 0 => kept.push(c),
            _ => {}
        }
    }
    kept.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| matches!(c, '-' | ' ' | ':' | ',' | '+' | '|'))
        .to_string()
}
