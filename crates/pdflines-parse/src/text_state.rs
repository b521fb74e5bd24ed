//! Text positioning for the content stream interpreter.
//!
//! [`TextParams`] holds the values that live in the graphics state and
//! travel with `q`/`Q`. [`TextState`] adds the per-text-object matrices
//! moved by `BT`, `Tm`, `Td`, `TD`, `T*` and by glyph advances.

use pdflines_core::Ctm;

/// Text parameters set by `Tc Tw Tz TL Tf Ts`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextParams {
    /// `Tc`, added after every glyph.
    pub char_spacing: f64,
    /// `Tw`, added after each single-byte code 32.
    pub word_spacing: f64,
    /// `Tz`, in percent.
    pub h_scaling: f64,
    /// `TL`.
    pub leading: f64,
    /// Resource name from the last `Tf`.
    pub font_name: String,
    pub font_size: f64,
    /// `Ts`.
    pub rise: f64,
}

impl Default for TextParams {
    fn default() -> Self {
        Self {
            char_spacing: 0.0,
            word_spacing: 0.0,
            h_scaling: 100.0,
            leading: 0.0,
            font_name: String::new(),
            font_size: 0.0,
            rise: 0.0,
        }
    }
}

impl TextParams {
    /// `Tz` as a factor.
    pub fn horizontal_scale(&self) -> f64 {
        self.h_scaling / 100.0
    }
}

/// Text parameters plus the text matrix (`Tm`) and line matrix (`Tlm`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextState {
    pub params: TextParams,
    in_text: bool,
    matrix: Ctm,
    line_start: Ctm,
}

impl TextState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_text(&self) -> bool {
        self.in_text
    }

    /// Current text matrix.
    pub fn matrix(&self) -> &Ctm {
        &self.matrix
    }

    /// Matrix at the start of the current line.
    pub fn line_start(&self) -> &Ctm {
        &self.line_start
    }

    /// `BT`.
    pub fn begin(&mut self) {
        self.in_text = true;
        self.set_matrix(Ctm::identity());
    }

    /// `ET`.
    pub fn end(&mut self) {
        self.in_text = false;
    }

    /// `Tf`.
    pub fn set_font(&mut self, name: String, size: f64) {
        self.params.font_name = name;
        self.params.font_size = size;
    }

    /// `Tm`. Replaces both matrices.
    pub fn set_matrix(&mut self, m: Ctm) {
        self.matrix = m;
        self.line_start = m;
    }

    /// `Td`. The offset is taken from the start of the current line.
    pub fn next_line(&mut self, tx: f64, ty: f64) {
        let start = Ctm::new(1.0, 0.0, 0.0, 1.0, tx, ty).concat(&self.line_start);
        self.set_matrix(start);
    }

    /// `TD`: `Td` that also sets the leading to `-ty`.
    pub fn next_line_setting_leading(&mut self, tx: f64, ty: f64) {
        self.params.leading = -ty;
        self.next_line(tx, ty);
    }

    /// `T*`.
    pub fn next_line_by_leading(&mut self) {
        self.next_line(0.0, -self.params.leading);
    }

    /// Move along the baseline by `tx` unscaled text space units.
    pub fn advance(&mut self, tx: f64) {
        self.matrix = Ctm::new(1.0, 0.0, 0.0, 1.0, tx, 0.0).concat(&self.matrix);
    }

    /// `[Tfs*Th 0 0 Tfs 0 Trise] × Tm × CTM`.
    pub fn rendering_matrix(&self, ctm: &Ctm) -> Ctm {
        let p = &self.params;
        Ctm::new(
            p.font_size * p.horizontal_scale(),
            0.0,
            0.0,
            p.font_size,
            0.0,
            p.rise,
        )
        .concat(&self.matrix)
        .concat(ctm)
    }
}
