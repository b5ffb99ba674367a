//! Builds the per-font `CharMap` described in §4.6/§3: the mapping a shown-text code uses to
//! produce output Unicode and, for embedded fonts, a collision-free glyph identifier.
//!
//! Grounded on `font.rs` (`ParsedFont::lookup_glyph_index`, for priority 3) and `cmap.rs`
//! (`ToUnicodeCMap`, for priorities 1 and 4). The Adobe Glyph List (priority 5) is a small
//! process-wide static table, matching SPEC_FULL §9's "globally shared state" note.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::cmap::ToUnicodeCMap;
use crate::font::ParsedFont;

const PUA_START: u32 = 0xE000;
const PUA_END: u32 = 0xF8FF;
const NOTDEF: char = '\u{FFFD}';

/// One resolved entry in a [`CharMap`]: the Unicode text a code should produce, and — for
/// embedded fonts only — the glyph index it should reference in the SVG output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharMapEntry {
    pub unicode: String,
    pub glyph_index: Option<u16>,
}

/// Population mode, replacing the boolean flag SPEC_FULL §9 flags as worth splitting into
/// two constructors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Mode {
    /// Used when the SVG will reference embedded glyph outlines directly: output code points
    /// must be collision-free per glyph index (invariant (b) of §3).
    Embedding,
    /// Used for plain text extraction: no PUA remap, no single-character preference,
    /// duplicate codes keep the first mapping found.
    Extraction,
}

/// A fully populated code -> (Unicode, glyph) map for one font resource.
#[derive(Debug, Clone)]
pub struct CharMap {
    entries: BTreeMap<u32, CharMapEntry>,
}

impl CharMap {
    /// Builds a `CharMap` intended for embedding: applies the full 6-priority chain plus the
    /// PUA collision remap (invariant (b)), stopping the allocator at U+F8FF.
    pub fn for_embedding(
        codes: impl IntoIterator<Item = u32>,
        to_unicode: Option<&ToUnicodeCMap>,
        simple_encoding: Option<&BTreeMap<u32, &str>>,
        font: Option<&ParsedFont>,
    ) -> Self {
        Self::build(codes, to_unicode, simple_encoding, font, Mode::Embedding)
    }

    /// Builds a `CharMap` intended for text extraction: the priority chain omits the
    /// single-character ToUnicode preference and never remaps into the PUA; duplicate output
    /// code points are left as-is (first wins is automatic since the map is keyed by input
    /// code, not output).
    pub fn for_extraction(
        codes: impl IntoIterator<Item = u32>,
        to_unicode: Option<&ToUnicodeCMap>,
        simple_encoding: Option<&BTreeMap<u32, &str>>,
        font: Option<&ParsedFont>,
    ) -> Self {
        Self::build(codes, to_unicode, simple_encoding, font, Mode::Extraction)
    }

    fn build(
        codes: impl IntoIterator<Item = u32>,
        to_unicode: Option<&ToUnicodeCMap>,
        simple_encoding: Option<&BTreeMap<u32, &str>>,
        font: Option<&ParsedFont>,
        mode: Mode,
    ) -> Self {
        let mut entries = BTreeMap::new();
        let mut used_glyphs: BTreeMap<u16, char> = BTreeMap::new();
        let mut next_pua = PUA_START;

        for code in codes {
            let unicode = resolve_unicode(code, to_unicode, simple_encoding, mode);
            let glyph_index = font.and_then(|f| {
                unicode
                    .chars()
                    .next()
                    .and_then(|c| f.lookup_glyph_index(c as u32))
            });

            let unicode = if mode == Mode::Embedding {
                if let Some(gi) = glyph_index {
                    match used_glyphs.get(&gi) {
                        // First time we see this glyph: its preferred Unicode wins outright
                        // (invariant (b): unique per glyph index).
                        None => {
                            used_glyphs.insert(gi, unicode.chars().next().unwrap_or(NOTDEF));
                            unicode
                        }
                        // Collision: a different code already claimed this glyph index under
                        // a different Unicode value. Allocate a fresh PUA code point instead.
                        Some(existing) if *existing == unicode.chars().next().unwrap_or(NOTDEF) => {
                            unicode
                        }
                        Some(_) => allocate_pua(&mut next_pua)
                            .map(|c| c.to_string())
                            .unwrap_or_else(|| NOTDEF.to_string()),
                    }
                } else {
                    unicode
                }
            } else {
                unicode
            };

            entries.insert(code, CharMapEntry { unicode, glyph_index });
        }

        CharMap { entries }
    }

    pub fn get(&self, code: u32) -> Option<&CharMapEntry> {
        self.entries.get(&code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn resolve_unicode(
    code: u32,
    to_unicode: Option<&ToUnicodeCMap>,
    simple_encoding: Option<&BTreeMap<u32, &str>>,
    mode: Mode,
) -> String {
    // Priority 1 (embedding only): single-character ToUnicode mapping.
    if mode == Mode::Embedding {
        if let Some(cmap) = to_unicode {
            if let Some(unis) = cmap.mappings.get(&code) {
                if unis.len() == 1 {
                    if let Some(c) = char::from_u32(unis[0]) {
                        return if c.is_control() {
                            NOTDEF.to_string()
                        } else {
                            normalize_ligature(c)
                        };
                    }
                }
            }
        }
    }

    // Priority 2: explicit single-byte encoding, via glyph name -> AGL.
    if let Some(enc) = simple_encoding {
        if let Some(name) = enc.get(&code) {
            if let Some(c) = adobe_glyph_list().get(*name) {
                return if c.is_control() { NOTDEF.to_string() } else { c.to_string() };
            }
        }
    }

    // Priority 4: multi-character (or, in extraction mode, any-length) ToUnicode mapping.
    if let Some(cmap) = to_unicode {
        if let Some(unis) = cmap.mappings.get(&code) {
            let s: String = unis
                .iter()
                .filter_map(|&u| char::from_u32(u))
                .map(|c| if c.is_control() { NOTDEF } else { c })
                .collect();
            if !s.is_empty() {
                return s;
            }
            // ToUnicode explicitly mapping to nothing is itself a valid boundary case.
            return String::new();
        }
    }

    // Priority 6: fallback.
    NOTDEF.to_string()
}

fn normalize_ligature(c: char) -> String {
    ligature_table()
        .get(&c)
        .map(|s| s.to_string())
        .unwrap_or_else(|| c.to_string())
}

fn allocate_pua(next: &mut u32) -> Option<char> {
    while *next <= PUA_END {
        let candidate = char::from_u32(*next);
        *next += 1;
        if let Some(c) = candidate {
            return Some(c);
        }
    }
    None
}

fn ligature_table() -> &'static BTreeMap<char, &'static str> {
    static TABLE: OnceLock<BTreeMap<char, &'static str>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut m = BTreeMap::new();
        m.insert('\u{FB00}', "ff");
        m.insert('\u{FB01}', "fi");
        m.insert('\u{FB02}', "fl");
        m.insert('\u{FB03}', "ffi");
        m.insert('\u{FB04}', "ffl");
        m.insert('\u{FB05}', "st");
        m.insert('\u{FB06}', "st");
        m
    })
}

/// A small, commonly-used subset of the Adobe Glyph List, sufficient for standard Latin text
/// encodings (WinAnsi/MacRoman/StandardEncoding differences). Loaded once per process.
fn adobe_glyph_list() -> &'static BTreeMap<&'static str, char> {
    static TABLE: OnceLock<BTreeMap<&'static str, char>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut m = BTreeMap::new();
        m.insert("space", ' ');
        m.insert("exclam", '!');
        m.insert("quotedbl", '"');
        m.insert("numbersign", '#');
        m.insert("dollar", '$');
        m.insert("percent", '%');
        m.insert("ampersand", '&');
        m.insert("quotesingle", '\'');
        m.insert("parenleft", '(');
        m.insert("parenright", ')');
        m.insert("asterisk", '*');
        m.insert("plus", '+');
        m.insert("comma", ',');
        m.insert("hyphen", '-');
        m.insert("period", '.');
        m.insert("slash", '/');
        for d in 0..=9u8 {
            let name: &'static str = match d {
                0 => "zero",
                1 => "one",
                2 => "two",
                3 => "three",
                4 => "four",
                5 => "five",
                6 => "six",
                7 => "seven",
                8 => "eight",
                _ => "nine",
            };
            m.insert(name, (b'0' + d) as char);
        }
        m.insert("colon", ':');
        m.insert("semicolon", ';');
        m.insert("less", '<');
        m.insert("equal", '=');
        m.insert("greater", '>');
        m.insert("question", '?');
        m.insert("at", '@');
        for c in b'A'..=b'Z' {
            let s: &'static str = Box::leak(((c as char).to_string()).into_boxed_str());
            m.insert(s, c as char);
        }
        for c in b'a'..=b'z' {
            let s: &'static str = Box::leak(((c as char).to_string()).into_boxed_str());
            m.insert(s, c as char);
        }
        m.insert("bracketleft", '[');
        m.insert("backslash", '\\');
        m.insert("bracketright", ']');
        m.insert("asciicircum", '^');
        m.insert("underscore", '_');
        m.insert("grave", '`');
        m.insert("braceleft", '{');
        m.insert("bar", '|');
        m.insert("braceright", '}');
        m.insert("asciitilde", '~');
        m.insert("bullet", '\u{2022}');
        m.insert("endash", '\u{2013}');
        m.insert("emdash", '\u{2014}');
        m.insert("quoteleft", '\u{2018}');
        m.insert("quoteright", '\u{2019}');
        m.insert("quotedblleft", '\u{201C}');
        m.insert("quotedblright", '\u{201D}');
        m.insert("fi", '\u{FB01}');
        m.insert("fl", '\u{FB02}');
        m.insert("notdef", NOTDEF);
        m
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notdef_fallback_when_nothing_resolves() {
        let map = CharMap::for_extraction([0x41], None, None, None);
        assert_eq!(map.get(0x41).unwrap().unicode, NOTDEF.to_string());
    }

    #[test]
    fn simple_encoding_resolves_through_agl() {
        let mut enc = BTreeMap::new();
        enc.insert(0x41, "A");
        let map = CharMap::for_extraction([0x41], None, Some(&enc), None);
        assert_eq!(map.get(0x41).unwrap().unicode, "A");
    }

    #[test]
    fn to_unicode_empty_string_is_preserved() {
        let mut cmap = ToUnicodeCMap {
            mappings: BTreeMap::new(),
        };
        cmap.mappings.insert(0x01, vec![]);
        let map = CharMap::for_extraction([0x01], Some(&cmap), None, None);
        assert_eq!(map.get(0x01).unwrap().unicode, "");
    }

    #[test]
    fn pua_allocation_stays_in_range() {
        let c = allocate_pua(&mut PUA_START.clone());
        assert!(c.unwrap() as u32 >= PUA_START);
    }

    #[test]
    fn pua_allocator_stops_at_hard_limit() {
        let mut next = PUA_END;
        assert!(allocate_pua(&mut next).is_some());
        assert!(allocate_pua(&mut next).is_none());
    }

    #[test]
    fn control_character_single_mapping_falls_back_to_notdef() {
        let mut cmap = ToUnicodeCMap {
            mappings: BTreeMap::new(),
        };
        cmap.mappings.insert(0x01, vec![0x0007]);
        let map = CharMap::for_embedding([0x01], Some(&cmap), None, None);
        assert_eq!(map.get(0x01).unwrap().unicode, NOTDEF.to_string());
    }

    #[test]
    fn control_character_in_multi_char_mapping_is_replaced() {
        let mut cmap = ToUnicodeCMap {
            mappings: BTreeMap::new(),
        };
        cmap.mappings.insert(0x01, vec!['a' as u32, 0x07, 'b' as u32]);
        let map = CharMap::for_extraction([0x01], Some(&cmap), None, None);
        assert_eq!(map.get(0x01).unwrap().unicode, format!("a{NOTDEF}b"));
    }
}
