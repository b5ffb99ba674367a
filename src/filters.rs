//! Filter pipeline policy notes (§4.2/§2 Non-goals).
//!
//! `lopdf::Stream::decompressed_content` already runs the full Flate/LZW/RunLength/ASCII85/
//! ASCIIHex chain declared in a stream's `/Filter` entry (chained, in declaration order, via
//! its own `flate2`/`weezl` dependencies — the same two crates this crate also depends on, so
//! no filter is reimplemented here). This module only names which filters are handled where,
//! and documents the two image codecs deliberately left unimplemented.
//!
//! Grounded on `deserialize.rs`'s stream-decompression call sites (`contents_obj.as_stream()...
//! decompressed_content()`), which lean on the same `lopdf` behavior rather than hand-rolling
//! decompression.

/// One of the filters `lopdf` applies internally before this crate ever sees a stream's bytes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StreamFilter {
    FlateDecode,
    LzwDecode,
    RunLengthDecode,
    Ascii85Decode,
    AsciiHexDecode,
    /// Baseline/progressive JPEG. Not decompressed by `lopdf`; `image_decode::decode_dct` runs
    /// against the still-encoded bytes.
    DctDecode,
    /// Group 3/4 fax compression. Out of scope (§2 Non-goals): images using it are skipped
    /// with a [`crate::errors::ConversionWarning`] rather than decoded.
    CcittFaxDecode,
    /// JBIG2. Out of scope for the same reason as CCITT.
    Jbig2Decode,
    /// JPEG 2000. Out of scope for the same reason as CCITT.
    Jpx,
}

impl StreamFilter {
    /// Parses one `/Filter` array entry's PDF name (without the leading `/`).
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "FlateDecode" | "Fl" => Self::FlateDecode,
            "LZWDecode" | "LZW" => Self::LzwDecode,
            "RunLengthDecode" | "RL" => Self::RunLengthDecode,
            "ASCII85Decode" | "A85" => Self::Ascii85Decode,
            "ASCIIHexDecode" | "AHx" => Self::AsciiHexDecode,
            "DCTDecode" | "DCT" => Self::DctDecode,
            "CCITTFaxDecode" | "CCF" => Self::CcittFaxDecode,
            "JBIG2Decode" => Self::Jbig2Decode,
            "JPXDecode" => Self::Jpx,
            _ => return None,
        })
    }

    /// Whether decoding this filter's payload into pixels is implemented by this crate.
    /// Flate/LZW/RunLength/ASCII filters aren't pixel codecs themselves (they decompress to raw
    /// samples, which `image_decode::decode_raw_samples` then interprets); DCT is the only
    /// compressed pixel codec this crate decodes directly.
    pub fn is_supported_image_codec(self) -> bool {
        matches!(self, Self::DctDecode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_standard_and_abbreviated_names() {
        assert_eq!(StreamFilter::from_name("FlateDecode"), Some(StreamFilter::FlateDecode));
        assert_eq!(StreamFilter::from_name("Fl"), Some(StreamFilter::FlateDecode));
        assert_eq!(StreamFilter::from_name("DCTDecode"), Some(StreamFilter::DctDecode));
    }

    #[test]
    fn unknown_filter_name_is_none() {
        assert_eq!(StreamFilter::from_name("Unknown"), None);
    }

    #[test]
    fn only_dct_is_a_supported_image_codec() {
        assert!(StreamFilter::DctDecode.is_supported_image_codec());
        assert!(!StreamFilter::CcittFaxDecode.is_supported_image_codec());
        assert!(!StreamFilter::FlateDecode.is_supported_image_codec());
    }
}
