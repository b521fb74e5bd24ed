//! Content stream interpreter.
//!
//! Walks the operators of a page (or form XObject) content stream, keeps the
//! graphics and text state up to date, and reports one [`TextRunEvent`] per
//! text-showing operator to a [`ContentHandler`].

use std::collections::HashMap;

use pdflines_core::Ctm;

use crate::error::BackendError;
use crate::font::LoadedFont;
use crate::handler::{ContentHandler, TextRunEvent};
use crate::lopdf_backend::{decode_stream, object_to_f64, resolve_ref};
use crate::text_state::{TextParams, TextState};
use crate::tokenizer::{Operand, tokenize};

/// Maximum nesting of form XObjects before interpretation fails.
pub const MAX_FORM_DEPTH: usize = 16;

/// A `TJ` kerning adjustment more negative than this (in thousandths of
/// text space) is a visual word gap and becomes a space in the run text.
pub const TJ_SPACE_THRESHOLD: f64 = -250.0;

/// Graphics state: the CTM plus the `q`/`Q` stack.
#[derive(Debug, Clone, Default)]
pub struct GraphicsState {
    ctm: Ctm,
    stack: Vec<(Ctm, TextParams)>,
}

impl GraphicsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ctm(&self) -> &Ctm {
        &self.ctm
    }

    /// `cm`: pre-multiply the operand matrix onto the CTM.
    pub fn concat_matrix(&mut self, m: Ctm) {
        self.ctm = m.concat(&self.ctm);
    }

    /// `q`.
    pub fn save(&mut self, text: TextParams) {
        self.stack.push((self.ctm, text));
    }

    /// `Q`. An unbalanced `Q` leaves the state untouched.
    pub fn restore(&mut self) -> Option<TextParams> {
        let (ctm, text) = self.stack.pop()?;
        self.ctm = ctm;
        Some(text)
    }
}

/// A string or kerning element of a `TJ` array.
enum TjElement<'a> {
    Bytes(&'a [u8]),
    Adjustment(f64),
}

/// Interpret one content stream.
///
/// `depth` is 0 for a page and grows by one per nested form XObject.
///
/// # Errors
///
/// Returns [`BackendError::Interpreter`] if the stream cannot be tokenized,
/// or if form XObjects nest deeper than [`MAX_FORM_DEPTH`].
pub fn interpret_content_stream(
    doc: &lopdf::Document,
    stream_bytes: &[u8],
    resources: &lopdf::Dictionary,
    handler: &mut dyn ContentHandler,
    depth: usize,
    gstate: &mut GraphicsState,
    tstate: &mut TextState,
) -> Result<(), BackendError> {
    if depth > MAX_FORM_DEPTH {
        return Err(BackendError::Interpreter(format!(
            "form XObject nesting depth {depth} exceeds limit {MAX_FORM_DEPTH}"
        )));
    }

    let operators = tokenize(stream_bytes)?;
    let mut fonts: HashMap<String, LoadedFont> = HashMap::new();

    for op in &operators {
        let operands = op.operands.as_slice();
        match op.name.as_str() {
            "q" => gstate.save(tstate.params.clone()),
            "Q" => {
                if let Some(params) = gstate.restore() {
                    tstate.params = params;
                }
            }
            "cm" => {
                if let Some([a, b, c, d, e, f]) = numbers::<6>(operands) {
                    gstate.concat_matrix(Ctm::new(a, b, c, d, e, f));
                }
            }

            "BT" => tstate.begin(),
            "ET" => tstate.end(),
            "Tf" => {
                if let (Some(Operand::Name(name)), Some(size)) =
                    (operands.first(), operands.get(1).and_then(Operand::as_f64))
                {
                    if !fonts.contains_key(name) {
                        let font = load_font(doc, resources, name, handler);
                        fonts.insert(name.clone(), font);
                    }
                    tstate.set_font(name.clone(), size);
                }
            }
            "Tm" => {
                if let Some([a, b, c, d, e, f]) = numbers::<6>(operands) {
                    tstate.set_matrix(Ctm::new(a, b, c, d, e, f));
                }
            }
            "Td" => {
                if let Some([tx, ty]) = numbers::<2>(operands) {
                    tstate.next_line(tx, ty);
                }
            }
            "TD" => {
                if let Some([tx, ty]) = numbers::<2>(operands) {
                    tstate.next_line_setting_leading(tx, ty);
                }
            }
            "T*" => tstate.next_line_by_leading(),
            "TL" => set_number(operands, &mut tstate.params.leading),
            "Tc" => set_number(operands, &mut tstate.params.char_spacing),
            "Tw" => set_number(operands, &mut tstate.params.word_spacing),
            "Tz" => set_number(operands, &mut tstate.params.h_scaling),
            "Ts" => set_number(operands, &mut tstate.params.rise),

            "Tj" => {
                if let Some(bytes) = operands.first().and_then(Operand::as_string_bytes) {
                    show_text(tstate, gstate, &fonts, &[TjElement::Bytes(bytes)], handler);
                }
            }
            "'" => {
                tstate.next_line_by_leading();
                if let Some(bytes) = operands.first().and_then(Operand::as_string_bytes) {
                    show_text(tstate, gstate, &fonts, &[TjElement::Bytes(bytes)], handler);
                }
            }
            "\"" => {
                if let [aw, ac, string] = operands {
                    if let (Some(aw), Some(ac)) = (aw.as_f64(), ac.as_f64()) {
                        tstate.params.word_spacing = aw;
                        tstate.params.char_spacing = ac;
                    }
                    tstate.next_line_by_leading();
                    if let Some(bytes) = string.as_string_bytes() {
                        show_text(tstate, gstate, &fonts, &[TjElement::Bytes(bytes)], handler);
                    }
                }
            }
            "TJ" => {
                if let Some(Operand::Array(array)) = operands.first() {
                    let elements: Vec<TjElement<'_>> = array
                        .iter()
                        .filter_map(|o| match o {
                            Operand::LiteralString(s) | Operand::HexString(s) => {
                                Some(TjElement::Bytes(s.as_slice()))
                            }
                            other => other.as_f64().map(TjElement::Adjustment),
                        })
                        .collect();
                    show_text(tstate, gstate, &fonts, &elements, handler);
                }
            }

            "Do" => {
                if let Some(Operand::Name(name)) = operands.first() {
                    handle_do(doc, resources, handler, depth, gstate, tstate, name)?;
                }
            }
            _ => {}
        }
    }

    Ok(())
}

fn numbers<const N: usize>(operands: &[Operand]) -> Option<[f64; N]> {
    let tail = operands.get(operands.len().checked_sub(N)?..)?;
    let mut out = [0.0; N];
    for (slot, operand) in out.iter_mut().zip(tail) {
        *slot = operand.as_f64()?;
    }
    Some(out)
}

fn set_number(operands: &[Operand], target: &mut f64) {
    if let Some(v) = operands.first().and_then(Operand::as_f64) {
        *target = v;
    }
}

fn warn(handler: &mut dyn ContentHandler, message: String) {
    #[cfg(feature = "tracing")]
    tracing::warn!("{message}");
    handler.on_warning(message);
}

fn load_font(
    doc: &lopdf::Document,
    resources: &lopdf::Dictionary,
    name: &str,
    handler: &mut dyn ContentHandler,
) -> LoadedFont {
    let font_dict = resources
        .get(b"Font")
        .map(|o| resolve_ref(doc, o))
        .and_then(|o| o.as_dict())
        .and_then(|fonts| fonts.get(name.as_bytes()))
        .map(|o| resolve_ref(doc, o))
        .and_then(|o| o.as_dict());

    match font_dict {
        Ok(dict) => LoadedFont::load(doc, dict).unwrap_or_else(|e| {
            warn(handler, format!("font /{name}: {e}; using default decoding"));
            LoadedFont::fallback(name)
        }),
        Err(_) => {
            warn(handler, format!("font /{name} not found in resources"));
            LoadedFont::fallback(name)
        }
    }
}

fn show_text(
    tstate: &mut TextState,
    gstate: &GraphicsState,
    fonts: &HashMap<String, LoadedFont>,
    elements: &[TjElement<'_>],
    handler: &mut dyn ContentHandler,
) {
    let fallback;
    let font = match fonts.get(&tstate.params.font_name) {
        Some(font) => font,
        None => {
            fallback = LoadedFont::fallback(&tstate.params.font_name);
            &fallback
        }
    };

    let matrix = tstate.rendering_matrix(gstate.ctm()).to_array();
    let h_scale = tstate.params.horizontal_scale();
    let size = tstate.params.font_size;
    let mut text = String::new();

    for element in elements {
        match element {
            TjElement::Bytes(bytes) => {
                for glyph in font.decode(bytes) {
                    let mut advance =
                        font.width(glyph.code) / 1000.0 * size + tstate.params.char_spacing;
                    if !font.two_byte && glyph.code == 32 {
                        advance += tstate.params.word_spacing;
                    }
                    tstate.advance(advance * h_scale);
                    text.push_str(&glyph.text);
                }
            }
            TjElement::Adjustment(adj) => {
                if *adj < TJ_SPACE_THRESHOLD
                    && !text.is_empty()
                    && !text.ends_with(char::is_whitespace)
                {
                    text.push(' ');
                }
                tstate.advance(-adj / 1000.0 * size * h_scale);
            }
        }
    }

    handler.on_text_run(TextRunEvent {
        text,
        matrix,
        font_name: font.base_name.clone(),
        font_size: size,
    });
}

fn handle_do(
    doc: &lopdf::Document,
    resources: &lopdf::Dictionary,
    handler: &mut dyn ContentHandler,
    depth: usize,
    gstate: &mut GraphicsState,
    tstate: &mut TextState,
    name: &str,
) -> Result<(), BackendError> {
    let stream = resources
        .get(b"XObject")
        .map(|o| resolve_ref(doc, o))
        .and_then(|o| o.as_dict())
        .and_then(|xobjects| xobjects.get(name.as_bytes()))
        .map(|o| resolve_ref(doc, o))
        .and_then(|o| o.as_stream());

    let Ok(stream) = stream else {
        warn(handler, format!("XObject /{name} not found in resources"));
        return Ok(());
    };

    let is_form = stream
        .dict
        .get(b"Subtype")
        .and_then(|o| o.as_name())
        .is_ok_and(|n| n == b"Form");
    if !is_form {
        return Ok(());
    }

    let content = decode_stream(stream)?;
    let form_resources = stream
        .dict
        .get(b"Resources")
        .map(|o| resolve_ref(doc, o))
        .and_then(|o| o.as_dict())
        .unwrap_or(resources);

    gstate.save(tstate.params.clone());
    if let Ok(matrix) = stream.dict.get(b"Matrix").and_then(|o| o.as_array()) {
        let values: Result<Vec<f64>, _> = matrix.iter().map(object_to_f64).collect();
        if let Ok([a, b, c, d, e, f]) = values.as_deref() {
            gstate.concat_matrix(Ctm::new(*a, *b, *c, *d, *e, *f));
        }
    }

    let result = interpret_content_stream(
        doc,
        &content,
        form_resources,
        handler,
        depth + 1,
        gstate,
        tstate,
    );

    if let Some(params) = gstate.restore() {
        tstate.params = params;
    }
    result
}
