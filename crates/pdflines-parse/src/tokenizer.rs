//! Content stream tokenizer.
//!
//! Parses raw PDF content stream bytes into a sequence of [`Operator`]s,
//! each carrying its [`Operand`] arguments. Inline image data (`BI ... ID
//! ... EI`) is skipped, since it never carries text.

use crate::error::BackendError;

/// A PDF content stream operand value.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Integer number (e.g., `42`, `-7`).
    Integer(i64),
    /// Real number (e.g., `3.14`, `.5`).
    Real(f64),
    /// Name object, stored without the leading `/`.
    Name(String),
    /// Literal string `( ... )`, stored as raw bytes after escape processing.
    LiteralString(Vec<u8>),
    /// Hexadecimal string `< ... >`, stored as decoded bytes.
    HexString(Vec<u8>),
    /// Array of operands.
    Array(Vec<Operand>),
    /// Boolean value.
    Boolean(bool),
    /// The null object.
    Null,
    /// Inline dictionary (`<< /Key value >>`), as used by `BDC`.
    Dictionary(Vec<(String, Operand)>),
}

impl Operand {
    /// Numeric value of an `Integer` or `Real` operand.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Operand::Integer(i) => Some(*i as f64),
            Operand::Real(f) => Some(*f),
            _ => None,
        }
    }

    /// Byte content of a literal or hex string operand.
    pub fn as_string_bytes(&self) -> Option<&[u8]> {
        match self {
            Operand::LiteralString(s) | Operand::HexString(s) => Some(s),
            _ => None,
        }
    }
}

/// A PDF content stream operator with its preceding operands.
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    /// Operator name (e.g., `"BT"`, `"Tf"`, `"Tj"`).
    pub name: String,
    /// Operands that preceded this operator.
    pub operands: Vec<Operand>,
}

/// Parse PDF content stream bytes into a sequence of operators.
///
/// # Errors
///
/// Returns [`BackendError::Interpreter`] for malformed content streams
/// (unterminated strings, arrays, or dictionaries).
pub fn tokenize(input: &[u8]) -> Result<Vec<Operator>, BackendError> {
    let mut ops = Vec::new();
    let mut operands: Vec<Operand> = Vec::new();
    let mut pos = 0;

    loop {
        skip_whitespace_and_comments(input, &mut pos);
        let Some(&b) = input.get(pos) else {
            break;
        };

        match b {
            b'a'..=b'z' | b'A'..=b'Z' | b'*' | b'\'' | b'"' => {
                let keyword = parse_keyword(input, &mut pos);
                match keyword.as_str() {
                    "true" => operands.push(Operand::Boolean(true)),
                    "false" => operands.push(Operand::Boolean(false)),
                    "null" => operands.push(Operand::Null),
                    "BI" => {
                        skip_inline_image(input, &mut pos)?;
                        operands.clear();
                    }
                    _ => ops.push(Operator {
                        name: keyword,
                        operands: std::mem::take(&mut operands),
                    }),
                }
            }
            b']' | b')' | b'>' | b'{' | b'}' => {
                // Stray delimiter; skip it like other tolerant readers do.
                pos += 1;
            }
            _ => operands.push(parse_operand(input, &mut pos)?),
        }
    }

    Ok(ops)
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | 0x0C | 0x00)
}

fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

fn skip_whitespace_and_comments(input: &[u8], pos: &mut usize) {
    while let Some(&b) = input.get(*pos) {
        if is_whitespace(b) {
            *pos += 1;
        } else if b == b'%' {
            while *pos < input.len() && input[*pos] != b'\n' && input[*pos] != b'\r' {
                *pos += 1;
            }
        } else {
            break;
        }
    }
}

/// Parse one operand starting at `pos`. Keywords inside arrays and
/// dictionaries are kept as names.
fn parse_operand(input: &[u8], pos: &mut usize) -> Result<Operand, BackendError> {
    let b = input[*pos];
    match b {
        b'(' => Ok(Operand::LiteralString(parse_literal_string(input, pos)?)),
        b'<' if input.get(*pos + 1) == Some(&b'<') => {
            Ok(Operand::Dictionary(parse_dictionary(input, pos)?))
        }
        b'<' => Ok(Operand::HexString(parse_hex_string(input, pos)?)),
        b'[' => {
            *pos += 1;
            Ok(Operand::Array(parse_array(input, pos)?))
        }
        b'/' => Ok(Operand::Name(parse_name(input, pos))),
        b'0'..=b'9' | b'+' | b'-' | b'.' => Ok(parse_number(input, pos)),
        b'a'..=b'z' | b'A'..=b'Z' => {
            let keyword = parse_keyword(input, pos);
            Ok(match keyword.as_str() {
                "true" => Operand::Boolean(true),
                "false" => Operand::Boolean(false),
                "null" => Operand::Null,
                _ => Operand::Name(keyword),
            })
        }
        _ => {
            *pos += 1;
            Ok(Operand::Null)
        }
    }
}

fn parse_literal_string(input: &[u8], pos: &mut usize) -> Result<Vec<u8>, BackendError> {
    *pos += 1; // '('
    let mut result = Vec::new();
    let mut depth = 1u32;

    while let Some(&b) = input.get(*pos) {
        *pos += 1;
        match b {
            b'(' => {
                depth += 1;
                result.push(b);
            }
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(result);
                }
                result.push(b);
            }
            b'\\' => {
                let Some(&escaped) = input.get(*pos) else {
                    break;
                };
                *pos += 1;
                match escaped {
                    b'n' => result.push(b'\n'),
                    b'r' => result.push(b'\r'),
                    b't' => result.push(b'\t'),
                    b'b' => result.push(0x08),
                    b'f' => result.push(0x0C),
                    b'\r' => {
                        // Line continuation (CR or CRLF).
                        if input.get(*pos) == Some(&b'\n') {
                            *pos += 1;
                        }
                    }
                    b'\n' => {}
                    b'0'..=b'7' => {
                        let mut val = u32::from(escaped - b'0');
                        for _ in 0..2 {
                            match input.get(*pos) {
                                Some(&d @ b'0'..=b'7') => {
                                    val = val * 8 + u32::from(d - b'0');
                                    *pos += 1;
                                }
                                _ => break,
                            }
                        }
                        result.push((val & 0xFF) as u8);
                    }
                    other => result.push(other),
                }
            }
            _ => result.push(b),
        }
    }

    Err(BackendError::Interpreter(
        "unterminated literal string".to_string(),
    ))
}

fn parse_hex_string(input: &[u8], pos: &mut usize) -> Result<Vec<u8>, BackendError> {
    *pos += 1; // '<'
    let mut digits = Vec::new();
    loop {
        let Some(&b) = input.get(*pos) else {
            return Err(BackendError::Interpreter(
                "unterminated hex string".to_string(),
            ));
        };
        *pos += 1;
        if b == b'>' {
            break;
        }
        if let Some(d) = hex_digit(b) {
            digits.push(d);
        }
    }
    if digits.len() % 2 != 0 {
        digits.push(0);
    }
    Ok(digits.chunks(2).map(|c| (c[0] << 4) | c[1]).collect())
}

pub(crate) fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Parse an array until `]`. Assumes `[` already consumed.
fn parse_array(input: &[u8], pos: &mut usize) -> Result<Vec<Operand>, BackendError> {
    let mut elements = Vec::new();
    loop {
        skip_whitespace_and_comments(input, pos);
        match input.get(*pos) {
            None => return Err(BackendError::Interpreter("unterminated array".to_string())),
            Some(b']') => {
                *pos += 1;
                return Ok(elements);
            }
            Some(_) => elements.push(parse_operand(input, pos)?),
        }
    }
}

/// Parse a dictionary `<< ... >>`. Assumes `pos` is at the first `<`.
fn parse_dictionary(
    input: &[u8],
    pos: &mut usize,
) -> Result<Vec<(String, Operand)>, BackendError> {
    *pos += 2;
    let mut entries = Vec::new();
    loop {
        skip_whitespace_and_comments(input, pos);
        match input.get(*pos) {
            None => {
                return Err(BackendError::Interpreter(
                    "unterminated dictionary".to_string(),
                ));
            }
            Some(b'>') if input.get(*pos + 1) == Some(&b'>') => {
                *pos += 2;
                return Ok(entries);
            }
            Some(b'/') => {
                let key = parse_name(input, pos);
                skip_whitespace_and_comments(input, pos);
                if *pos >= input.len() {
                    return Err(BackendError::Interpreter(
                        "unterminated dictionary".to_string(),
                    ));
                }
                entries.push((key, parse_operand(input, pos)?));
            }
            Some(_) => {
                return Err(BackendError::Interpreter(
                    "expected name key in dictionary".to_string(),
                ));
            }
        }
    }
}

/// Parse a `/Name` token, decoding `#XX` escapes.
fn parse_name(input: &[u8], pos: &mut usize) -> String {
    *pos += 1; // '/'
    let start = *pos;
    while *pos < input.len() && !is_whitespace(input[*pos]) && !is_delimiter(input[*pos]) {
        *pos += 1;
    }

    let raw = &input[start..*pos];
    let mut name = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == b'#' && i + 2 < raw.len() {
            if let (Some(hi), Some(lo)) = (hex_digit(raw[i + 1]), hex_digit(raw[i + 2])) {
                name.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        name.push(raw[i]);
        i += 1;
    }
    String::from_utf8_lossy(&name).into_owned()
}

/// Parse a number. Malformed numbers (e.g. a lone `-`) read as zero.
fn parse_number(input: &[u8], pos: &mut usize) -> Operand {
    let start = *pos;
    if matches!(input.get(*pos), Some(b'+' | b'-')) {
        *pos += 1;
    }
    let mut has_dot = false;
    while let Some(&b) = input.get(*pos) {
        if b == b'.' && !has_dot {
            has_dot = true;
        } else if !b.is_ascii_digit() {
            break;
        }
        *pos += 1;
    }

    let token = String::from_utf8_lossy(&input[start..*pos]);
    if has_dot {
        Operand::Real(token.parse().unwrap_or(0.0))
    } else {
        token
            .parse()
            .map(Operand::Integer)
            .unwrap_or(Operand::Integer(0))
    }
}

fn parse_keyword(input: &[u8], pos: &mut usize) -> String {
    let start = *pos;
    while let Some(&b) = input.get(*pos) {
        if b.is_ascii_alphanumeric() || b == b'*' || b == b'\'' || b == b'"' {
            *pos += 1;
        } else {
            break;
        }
    }
    String::from_utf8_lossy(&input[start..*pos]).into_owned()
}

/// Skip `<dict entries> ID <data> EI`. Called after `BI` has been consumed.
fn skip_inline_image(input: &[u8], pos: &mut usize) -> Result<(), BackendError> {
    // Dictionary entries up to the ID keyword.
    loop {
        skip_whitespace_and_comments(input, pos);
        if *pos >= input.len() {
            return Err(BackendError::Interpreter(
                "unterminated inline image (missing ID)".to_string(),
            ));
        }
        if input[*pos..].starts_with(b"ID")
            && input.get(*pos + 2).is_none_or(|&b| is_whitespace(b))
        {
            *pos += 3;
            break;
        }
        parse_operand(input, pos)?;
    }

    // Binary data up to a whitespace-delimited EI.
    while *pos + 1 < input.len() {
        if input[*pos] == b'E'
            && input[*pos + 1] == b'I'
            && is_whitespace(input[*pos - 1])
            && input
                .get(*pos + 2)
                .is_none_or(|&b| is_whitespace(b) || is_delimiter(b))
        {
            *pos += 2;
            return Ok(());
        }
        *pos += 1;
    }

    Err(BackendError::Interpreter(
        "unterminated inline image (missing EI)".to_string(),
    ))
}
