pub mod media;
pub mod quality;
pub mod result;

pub use media::MediaType;
pub use quality::{AudioFormat, BitDepth, ChannelLayout, HdrFormat, Quality, Resolution, VideoCodec};
pub use result::{Flag, ParsedRelease, RankedRelease};
