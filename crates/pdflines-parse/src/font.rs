//! Font loading: code decoding and glyph widths.
//!
//! A [`LoadedFont`] turns the bytes of a text-showing operator into glyphs
//! (character code plus Unicode text) and reports each glyph's advance
//! width. Text comes from the font's `/ToUnicode` CMap when present, and
//! otherwise from its simple `/Encoding` decoded through [`encoding_rs`].

use std::collections::HashMap;

use encoding_rs::Encoding;

use crate::cmap::CMap;
use crate::error::BackendError;
use crate::lopdf_backend::{decode_stream, object_to_f64, resolve_ref};

/// Advance width used when a simple font does not list a code.
pub const DEFAULT_SIMPLE_WIDTH: f64 = 500.0;
/// Advance width used when a CID font has no `/DW`.
pub const DEFAULT_CID_WIDTH: f64 = 1000.0;

/// One decoded glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    /// The character code read from the string operand.
    pub code: u32,
    /// Unicode text for the code. May be empty or hold several chars.
    pub text: String,
}

/// Glyph widths in glyph space (1/1000 of text space).
#[derive(Debug, Clone, PartialEq)]
enum Widths {
    Simple {
        first_char: u32,
        widths: Vec<f64>,
        missing: f64,
    },
    Cid {
        widths: HashMap<u32, f64>,
        default: f64,
    },
}

/// A font resolved from a page or form resource dictionary.
#[derive(Debug, Clone)]
pub struct LoadedFont {
    /// `/BaseFont` with any subset prefix (`ABCDEF+`) removed.
    pub base_name: String,
    /// Whether codes are two bytes wide (Type0 fonts).
    pub two_byte: bool,
    to_unicode: Option<CMap>,
    encoding: &'static Encoding,
    differences: HashMap<u8, char>,
    widths: Widths,
}

impl LoadedFont {
    /// A single-byte font with WinAnsi decoding and default widths, used when
    /// a font resource cannot be found.
    pub fn fallback(name: &str) -> Self {
        Self {
            base_name: name.to_string(),
            two_byte: false,
            to_unicode: None,
            encoding: encoding_rs::WINDOWS_1252,
            differences: HashMap::new(),
            widths: Widths::Simple {
                first_char: 0,
                widths: Vec::new(),
                missing: DEFAULT_SIMPLE_WIDTH,
            },
        }
    }

    /// Load a font from its font dictionary.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Font`] if the `/ToUnicode` stream exists but
    /// cannot be decoded or parsed.
    pub fn load(doc: &lopdf::Document, font: &lopdf::Dictionary) -> Result<Self, BackendError> {
        let base_name = font
            .get(b"BaseFont")
            .ok()
            .and_then(|o| o.as_name().ok())
            .map(|n| strip_subset_prefix(&String::from_utf8_lossy(n)).to_string())
            .unwrap_or_default();

        let to_unicode = match font.get(b"ToUnicode") {
            Ok(obj) => match resolve_ref(doc, obj).as_stream() {
                Ok(stream) => Some(CMap::parse(&decode_stream(stream)?)?),
                Err(_) => None,
            },
            Err(_) => None,
        };

        let two_byte = font
            .get(b"Subtype")
            .ok()
            .and_then(|o| o.as_name().ok())
            .is_some_and(|n| n == b"Type0");

        let (encoding, differences) = if two_byte {
            (encoding_rs::WINDOWS_1252, HashMap::new())
        } else {
            simple_encoding(doc, font)
        };

        let widths = if two_byte {
            cid_widths(doc, font)
        } else {
            simple_widths(doc, font)
        };

        Ok(Self {
            base_name,
            two_byte,
            to_unicode,
            encoding,
            differences,
            widths,
        })
    }

    /// Split string bytes into glyphs.
    pub fn decode(&self, bytes: &[u8]) -> Vec<Glyph> {
        if self.two_byte {
            bytes
                .chunks(2)
                .map(|pair| {
                    let code = pair
                        .iter()
                        .fold(0u32, |acc, &b| (acc << 8) | u32::from(b));
                    Glyph {
                        code,
                        text: self.code_text(code),
                    }
                })
                .collect()
        } else {
            bytes
                .iter()
                .map(|&b| Glyph {
                    code: u32::from(b),
                    text: self.code_text(u32::from(b)),
                })
                .collect()
        }
    }

    fn code_text(&self, code: u32) -> String {
        if let Some(text) = self.to_unicode.as_ref().and_then(|c| c.lookup(code)) {
            return text.to_string();
        }
        if self.two_byte {
            // Without a ToUnicode map, Identity-encoded codes are the best guess.
            return char::from_u32(code)
                .map(String::from)
                .unwrap_or_else(|| '\u{FFFD}'.to_string());
        }
        let byte = (code & 0xFF) as u8;
        if let Some(&ch) = self.differences.get(&byte) {
            return ch.to_string();
        }
        let buf = [byte];
        let (text, _) = self.encoding.decode_without_bom_handling(&buf);
        text.into_owned()
    }

    /// Advance width of `code` in glyph space units.
    pub fn width(&self, code: u32) -> f64 {
        match &self.widths {
            Widths::Simple {
                first_char,
                widths,
                missing,
            } => code
                .checked_sub(*first_char)
                .and_then(|i| widths.get(i as usize))
                .copied()
                .unwrap_or(*missing),
            Widths::Cid { widths, default } => widths.get(&code).copied().unwrap_or(*default),
        }
    }
}

fn strip_subset_prefix(name: &str) -> &str {
    match name.split_once('+') {
        Some((prefix, rest))
            if prefix.len() == 6 && prefix.bytes().all(|b| b.is_ascii_uppercase()) =>
        {
            rest
        }
        _ => name,
    }
}

fn named_encoding(name: &[u8]) -> Option<&'static Encoding> {
    match name {
        b"WinAnsiEncoding" | b"StandardEncoding" | b"PDFDocEncoding" => {
            Some(encoding_rs::WINDOWS_1252)
        }
        b"MacRomanEncoding" => Some(encoding_rs::MACINTOSH),
        _ => None,
    }
}

fn simple_encoding(
    doc: &lopdf::Document,
    font: &lopdf::Dictionary,
) -> (&'static Encoding, HashMap<u8, char>) {
    let mut encoding = encoding_rs::WINDOWS_1252;
    let mut differences = HashMap::new();

    let Ok(obj) = font.get(b"Encoding") else {
        return (encoding, differences);
    };
    let obj = resolve_ref(doc, obj);

    if let Ok(name) = obj.as_name() {
        if let Some(enc) = named_encoding(name) {
            encoding = enc;
        }
    } else if let Ok(dict) = obj.as_dict() {
        if let Some(enc) = dict
            .get(b"BaseEncoding")
            .ok()
            .and_then(|o| o.as_name().ok())
            .and_then(named_encoding)
        {
            encoding = enc;
        }
        if let Ok(diffs) = dict
            .get(b"Differences")
            .map(|o| resolve_ref(doc, o))
            .and_then(|o| o.as_array())
        {
            differences = parse_differences(diffs);
        }
    }

    (encoding, differences)
}

/// `[code /name /name ... code /name ...]`: each integer starts a run of
/// consecutive codes.
fn parse_differences(array: &[lopdf::Object]) -> HashMap<u8, char> {
    let mut out = HashMap::new();
    let mut next: Option<u32> = None;
    for obj in array {
        match obj {
            lopdf::Object::Integer(i) => next = u32::try_from(*i).ok(),
            lopdf::Object::Name(name) => {
                if let Some(code) = next {
                    if let (Ok(byte), Some(ch)) =
                        (u8::try_from(code), glyph_name_to_char(&String::from_utf8_lossy(name)))
                    {
                        out.insert(byte, ch);
                    }
                    next = Some(code + 1);
                }
            }
            _ => {}
        }
    }
    out
}

/// Resolve the glyph names that show up in practice: `uniXXXX`, `uXXXX`,
/// single-character names, and a handful of common punctuation names.
pub(crate) fn glyph_name_to_char(name: &str) -> Option<char> {
    let mut chars = name.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        return Some(ch);
    }
    if let Some(hex) = name.strip_prefix("uni").filter(|h| h.len() == 4) {
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }
    if let Some(hex) = name
        .strip_prefix('u')
        .filter(|h| (4..=6).contains(&h.len()))
    {
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }
    let ch = match name {
        "space" | "nbspace" => ' ',
        "period" => '.',
        "comma" => ',',
        "colon" => ':',
        "semicolon" => ';',
        "hyphen" | "minus" => '-',
        "endash" => '\u{2013}',
        "emdash" => '\u{2014}',
        "degree" => '\u{00B0}',
        "minute" | "quoteright" => '\u{2019}',
        "second" | "quotedblright" => '\u{201D}',
        "quoteleft" => '\u{2018}',
        "quotedblleft" => '\u{201C}',
        "quotesingle" => '\'',
        "quotedbl" => '"',
        "parenleft" => '(',
        "parenright" => ')',
        "slash" => '/',
        "plus" => '+',
        "equal" => '=',
        "asterisk" => '*',
        "percent" => '%',
        "bullet" => '\u{2022}',
        "zero" => '0',
        "one" => '1',
        "two" => '2',
        "three" => '3',
        "four" => '4',
        "five" => '5',
        "six" => '6',
        "seven" => '7',
        "eight" => '8',
        "nine" => '9',
        _ => return None,
    };
    Some(ch)
}

fn simple_widths(doc: &lopdf::Document, font: &lopdf::Dictionary) -> Widths {
    let first_char = font
        .get(b"FirstChar")
        .ok()
        .and_then(|o| object_to_f64(o).ok())
        .map_or(0, |v| v.max(0.0) as u32);

    let widths = font
        .get(b"Widths")
        .map(|o| resolve_ref(doc, o))
        .and_then(|o| o.as_array())
        .map(|arr| {
            arr.iter()
                .map(|o| object_to_f64(resolve_ref(doc, o)).unwrap_or(0.0))
                .collect()
        })
        .unwrap_or_default();

    let missing = font
        .get(b"FontDescriptor")
        .map(|o| resolve_ref(doc, o))
        .and_then(|o| o.as_dict())
        .ok()
        .and_then(|fd| fd.get(b"MissingWidth").ok())
        .and_then(|o| object_to_f64(o).ok())
        .filter(|w| *w > 0.0)
        .unwrap_or(DEFAULT_SIMPLE_WIDTH);

    Widths::Simple {
        first_char,
        widths,
        missing,
    }
}

fn cid_widths(doc: &lopdf::Document, font: &lopdf::Dictionary) -> Widths {
    let descendant = font
        .get(b"DescendantFonts")
        .map(|o| resolve_ref(doc, o))
        .and_then(|o| o.as_array())
        .ok()
        .and_then(|arr| arr.first())
        .map(|o| resolve_ref(doc, o))
        .and_then(|o| o.as_dict().ok());

    let Some(descendant) = descendant else {
        return Widths::Cid {
            widths: HashMap::new(),
            default: DEFAULT_CID_WIDTH,
        };
    };

    let default = descendant
        .get(b"DW")
        .ok()
        .and_then(|o| object_to_f64(o).ok())
        .unwrap_or(DEFAULT_CID_WIDTH);

    let widths = descendant
        .get(b"W")
        .map(|o| resolve_ref(doc, o))
        .and_then(|o| o.as_array())
        .map(|arr| parse_w_array(doc, arr))
        .unwrap_or_default();

    Widths::Cid { widths, default }
}

/// Highest CID a two-byte code can address.
const MAX_CID: u32 = u16::MAX as u32;

fn cid_index(value: f64) -> Option<u32> {
    (value.is_finite() && (0.0..=f64::from(MAX_CID)).contains(&value)).then_some(value as u32)
}

/// `/W` entries are either `c [w1 w2 ...]` or `c_first c_last w`.
///
/// CIDs past [`MAX_CID`] are dropped and ranges are clipped to it.
fn parse_w_array(doc: &lopdf::Document, array: &[lopdf::Object]) -> HashMap<u32, f64> {
    let mut out = HashMap::new();
    let mut i = 0;
    while i < array.len() {
        let Ok(start) = object_to_f64(resolve_ref(doc, &array[i])) else {
            break;
        };
        let start = cid_index(start);
        match array.get(i + 1).map(|o| resolve_ref(doc, o)) {
            Some(lopdf::Object::Array(ws)) => {
                if let Some(start) = start {
                    for (cid, w) in (start..=MAX_CID).zip(ws) {
                        if let Ok(w) = object_to_f64(resolve_ref(doc, w)) {
                            out.insert(cid, w);
                        }
                    }
                }
                i += 2;
            }
            Some(end) => {
                let (Ok(end), Some(Ok(w))) = (
                    object_to_f64(end),
                    array.get(i + 2).map(|o| object_to_f64(resolve_ref(doc, o))),
                ) else {
                    break;
                };
                if let Some(start) = start {
                    let end = if end.is_nan() { 0.0 } else { end.clamp(0.0, f64::from(MAX_CID)) };
                    for cid in start..=end as u32 {
                        out.insert(cid, w);
                    }
                }
                i += 3;
            }
            None => break,
        }
    }
    out
}
