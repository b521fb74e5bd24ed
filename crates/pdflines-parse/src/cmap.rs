//! ToUnicode CMap parser.
//!
//! Maps character codes to Unicode strings using the `beginbfchar` and
//! `beginbfrange` sections of an embedded `/ToUnicode` stream. Destinations
//! are UTF-16BE, so ligatures and surrogate pairs map to multi-char strings.

use std::collections::HashMap;

use crate::error::BackendError;

/// A parsed ToUnicode CMap.
#[derive(Debug, Clone, Default)]
pub struct CMap {
    mappings: HashMap<u32, String>,
}

impl CMap {
    /// Parse a ToUnicode CMap from its raw stream content.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Font`] if a mapping holds an invalid hex code
    /// or an undecodable UTF-16BE destination.
    pub fn parse(data: &[u8]) -> Result<Self, BackendError> {
        let text = String::from_utf8_lossy(data);
        let mut mappings = HashMap::new();

        for section in sections(&text, "beginbfchar", "endbfchar") {
            let tokens = hex_tokens(section);
            for pair in tokens.chunks_exact(2) {
                let code = parse_code(pair[0])?;
                mappings.insert(code, decode_utf16be(pair[1])?);
            }
        }

        for section in sections(&text, "beginbfrange", "endbfrange") {
            parse_bfrange(section, &mut mappings)?;
        }

        Ok(Self { mappings })
    }

    /// The Unicode string for `code`, if mapped.
    pub fn lookup(&self, code: u32) -> Option<&str> {
        self.mappings.get(&code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

/// Bodies between every `begin`/`end` keyword pair.
fn sections<'a>(text: &'a str, begin: &str, end: &str) -> Vec<&'a str> {
    let mut out = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find(begin) {
        let body = &rest[start + begin.len()..];
        let Some(stop) = body.find(end) else {
            break;
        };
        out.push(&body[..stop]);
        rest = &body[stop + end.len()..];
    }
    out
}

/// Token in a bfrange section: a `<hex>` string or an `[...]` array of them.
#[derive(Debug)]
enum RangeToken<'a> {
    Hex(&'a str),
    Array(Vec<&'a str>),
}

fn range_tokens(section: &str) -> Vec<RangeToken<'_>> {
    let mut tokens = Vec::new();
    let mut rest = section;
    loop {
        let next_hex = rest.find('<');
        let next_array = rest.find('[');
        match (next_hex, next_array) {
            (Some(h), a) if a.is_none_or(|a| h < a) => {
                let Some(end) = rest[h + 1..].find('>') else {
                    break;
                };
                tokens.push(RangeToken::Hex(&rest[h + 1..h + 1 + end]));
                rest = &rest[h + 2 + end..];
            }
            (_, Some(a)) => {
                let Some(end) = rest[a..].find(']') else {
                    break;
                };
                tokens.push(RangeToken::Array(hex_tokens(&rest[a + 1..a + end])));
                rest = &rest[a + end + 1..];
            }
            _ => break,
        }
    }
    tokens
}

fn hex_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find('<') {
        let Some(end) = rest[start + 1..].find('>') else {
            break;
        };
        tokens.push(&rest[start + 1..start + 1 + end]);
        rest = &rest[start + end + 2..];
    }
    tokens
}

fn parse_bfrange(section: &str, mappings: &mut HashMap<u32, String>) -> Result<(), BackendError> {
    let tokens = range_tokens(section);
    for triple in tokens.chunks_exact(3) {
        let (RangeToken::Hex(low), RangeToken::Hex(high)) = (&triple[0], &triple[1]) else {
            continue;
        };
        let low = parse_code(low)?;
        let high = parse_code(high)?;
        if high < low {
            continue;
        }

        match &triple[2] {
            RangeToken::Hex(dst) => {
                let units = utf16_units(dst)?;
                let Some((&last, prefix)) = units.split_last() else {
                    continue;
                };
                for offset in 0..=(high - low) {
                    let Ok(bumped) = u16::try_from(u32::from(last) + offset) else {
                        break;
                    };
                    let mut current = prefix.to_vec();
                    current.push(bumped);
                    if let Ok(s) = String::from_utf16(&current) {
                        mappings.insert(low + offset, s);
                    }
                }
            }
            RangeToken::Array(dsts) => {
                for (code, dst) in (low..=high).zip(dsts) {
                    mappings.insert(code, decode_utf16be(dst)?);
                }
            }
        }
    }
    Ok(())
}

fn parse_code(hex: &str) -> Result<u32, BackendError> {
    let digits: String = hex.chars().filter(|c| !c.is_whitespace()).collect();
    u32::from_str_radix(&digits, 16)
        .map_err(|e| BackendError::Font(format!("invalid CMap code '{hex}': {e}")))
}

fn utf16_units(hex: &str) -> Result<Vec<u16>, BackendError> {
    let mut digits: Vec<char> = hex.chars().filter(|c| !c.is_whitespace()).collect();
    // A bare byte such as <41> stands for U+0041.
    if digits.len() == 2 {
        digits.splice(0..0, ['0', '0']);
    }
    if digits.len() % 4 != 0 {
        return Err(BackendError::Font(format!(
            "UTF-16BE destination '{hex}' has {} hex digits",
            digits.len()
        )));
    }
    digits
        .chunks(4)
        .map(|chunk| {
            let s: String = chunk.iter().collect();
            u16::from_str_radix(&s, 16)
                .map_err(|e| BackendError::Font(format!("invalid UTF-16BE unit '{s}': {e}")))
        })
        .collect()
}

fn decode_utf16be(hex: &str) -> Result<String, BackendError> {
    let units = utf16_units(hex)?;
    String::from_utf16(&units)
        .map_err(|e| BackendError::Font(format!("invalid UTF-16BE sequence '{hex}': {e}")))
}
