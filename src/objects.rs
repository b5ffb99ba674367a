//! The PDF value model (§3): a typed view over `lopdf::Object` plus the string decoders a
//! content-stream interpreter needs (PDFDocEncoding, UTF-8 BOM, UTF-16BE BOM, plain ASCII).
//!
//! This crate does not re-implement tokenizing, object parsing, filter decoding, or
//! cross-reference resolution: `lopdf` already does all four (`Document::load`/`load_mem`,
//! `Object`, `Stream::decompressed_content`) and is the teacher's own dependency for exactly
//! this purpose. This module only adds the vocabulary and decoders the spec needs on top.

use lopdf::{Dictionary, Object, ObjectId};

/// A resolved PDF value, one layer up from `lopdf::Object`: indirect references have already
/// been distinguished from values that should never be lazily followed (e.g. dictionary
/// keys), matching §3's "PDF value" tagged union.
#[derive(Debug, Clone)]
pub enum PdfValue<'a> {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f32),
    Name(&'a [u8]),
    String(&'a [u8]),
    Array(&'a [Object]),
    Dictionary(&'a Dictionary),
    Stream(&'a lopdf::Stream),
    Reference(ObjectId),
}

impl<'a> From<&'a Object> for PdfValue<'a> {
    fn from(obj: &'a Object) -> Self {
        match obj {
            Object::Null => PdfValue::Null,
            Object::Boolean(b) => PdfValue::Boolean(*b),
            Object::Integer(i) => PdfValue::Integer(*i),
            Object::Real(r) => PdfValue::Real(*r),
            Object::Name(n) => PdfValue::Name(n),
            Object::String(s, _) => PdfValue::String(s),
            Object::Array(a) => PdfValue::Array(a),
            Object::Dictionary(d) => PdfValue::Dictionary(d),
            Object::Stream(s) => PdfValue::Stream(s),
            Object::Reference(r) => PdfValue::Reference(*r),
        }
    }
}

/// Decodes a PDF string (literal or hex) to Rust `String`, trying, in order: UTF-16BE
/// (BOM `FE FF`), UTF-8 (BOM `EF BB BF`), then falling back to PDFDocEncoding (PDF's
/// built-in single-byte encoding, a superset of Latin-1 with a handful of substitutions in
/// the 0x80..0xA0 range).
pub fn decode_pdf_doc_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        return decode_utf16be(&bytes[2..]);
    }
    if bytes.len() >= 3 && bytes[0] == 0xEF && bytes[1] == 0xBB && bytes[2] == 0xBF {
        if let Ok(s) = std::str::from_utf8(&bytes[3..]) {
            return s.to_string();
        }
    }
    decode_pdf_doc_encoding(bytes)
}

fn decode_utf16be(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|c| u16::from_be_bytes([c[0], c[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

/// PDFDocEncoding differs from Latin-1 only in the 0x18..0x1F and 0x80..0x9F ranges, which
/// map to a fixed set of typographic characters (bullet, dagger, quotation marks, etc.)
/// instead of C1 controls. Everything else is identity with Unicode code points 0..=0xFF.
fn decode_pdf_doc_encoding(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| match b {
            0x18 => '\u{02D8}', // breve
            0x19 => '\u{02C7}', // caron
            0x1A => '\u{02C6}', // modifier circumflex accent
            0x1B => '\u{02D9}', // dot above
            0x1C => '\u{02DD}', // double acute accent
            0x1D => '\u{02DB}', // ogonek
            0x1E => '\u{02DA}', // ring above
            0x1F => '\u{02DC}', // small tilde
            0x80 => '\u{2022}', // bullet
            0x81 => '\u{2020}', // dagger
            0x82 => '\u{2021}', // double dagger
            0x83 => '\u{2026}', // ellipsis
            0x84 => '\u{2014}', // em dash
            0x85 => '\u{2013}', // en dash
            0x86 => '\u{0192}', // florin
            0x87 => '\u{2044}', // fraction slash
            0x88 => '\u{2039}',
            0x89 => '\u{203A}',
            0x8A => '\u{2212}', // minus
            0x8B => '\u{2030}', // per mille
            0x8C => '\u{201E}',
            0x8D => '\u{201C}',
            0x8E => '\u{201D}',
            0x8F => '\u{2018}',
            0x90 => '\u{2019}',
            0x91 => '\u{201A}',
            0x92 => '\u{2122}', // trademark
            0x93 => '\u{FB01}', // fi ligature
            0x94 => '\u{FB02}', // fl ligature
            0x95 => '\u{0141}',
            0x96 => '\u{0152}',
            0x97 => '\u{0160}',
            0x98 => '\u{0178}',
            0x99 => '\u{017D}',
            0x9A => '\u{0131}',
            0x9B => '\u{0142}',
            0x9C => '\u{0153}',
            0x9D => '\u{0161}',
            0x9E => '\u{017E}',
            0xA0 => '\u{20AC}', // euro
            other => other as char,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf16be_bom_is_decoded() {
        let bytes = [0xFE, 0xFF, 0x00, 0x41, 0x00, 0x42];
        assert_eq!(decode_pdf_doc_string(&bytes), "AB");
    }

    #[test]
    fn ascii_range_is_identity() {
        let bytes = b"Hello";
        assert_eq!(decode_pdf_doc_string(bytes), "Hello");
    }

    #[test]
    fn pdfdoc_bullet_maps_to_unicode_bullet() {
        assert_eq!(decode_pdf_doc_string(&[0x80]), "\u{2022}");
    }
}
