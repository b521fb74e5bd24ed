use std::cmp::Ordering;

/// Index of the horizontal translation component in a 6-element transform.
const TRANSFORM_X: usize = 4;
/// Index of the vertical translation component in a 6-element transform.
const TRANSFORM_Y: usize = 5;

/// An untrusted text item as handed over by an extraction backend.
///
/// Backends do not validate anything: `content` is `None` when the source
/// value was not a string, `transform` is `None` when position data is
/// absent, and individual transform components are `None` when the source
/// value was not numeric. [`filter_fragments`] turns these into
/// [`TextFragment`]s.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawItem {
    /// Text content, if the source value was a string.
    pub content: Option<String>,
    /// Affine transform `[a, b, c, d, x, y]`, if present.
    pub transform: Option<Vec<Option<f64>>>,
}

impl RawItem {
    /// Create an item with string content and a fully numeric transform.
    pub fn new(content: impl Into<String>, transform: [f64; 6]) -> Self {
        Self {
            content: Some(content.into()),
            transform: Some(transform.iter().copied().map(Some).collect()),
        }
    }

    /// Create an item positioned at `(x, y)` with an identity scale.
    pub fn at(content: impl Into<String>, x: f64, y: f64) -> Self {
        Self::new(content, [1.0, 0.0, 0.0, 1.0, x, y])
    }
}

/// A positioned text fragment that survived filtering.
///
/// `content` is trimmed and never empty. `x` and `y` are finite.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextFragment {
    /// Trimmed, non-empty text.
    pub content: String,
    /// Horizontal position (transform component 4).
    pub x: f64,
    /// Vertical position (transform component 5). Larger is higher on the page.
    pub y: f64,
}

impl TextFragment {
    pub fn new(content: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            content: content.into(),
            x,
            y,
        }
    }

    /// Validate a raw item.
    ///
    /// Returns `None` if the content is missing or blank after trimming, or
    /// if the item carries no transform at all. Missing, non-numeric, or
    /// non-finite position components default to `0.0`.
    pub fn from_raw(item: &RawItem) -> Option<Self> {
        let content = item.content.as_deref()?.trim();
        if content.is_empty() {
            return None;
        }
        let transform = item.transform.as_ref()?;
        Some(Self {
            content: content.to_string(),
            x: component(transform, TRANSFORM_X),
            y: component(transform, TRANSFORM_Y),
        })
    }
}

fn component(transform: &[Option<f64>], index: usize) -> f64 {
    transform
        .get(index)
        .copied()
        .flatten()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Keep the items that carry real text and a position, in input order.
pub fn filter_fragments(items: &[RawItem]) -> Vec<TextFragment> {
    items.iter().filter_map(TextFragment::from_raw).collect()
}

/// Sort fragments into reading order: top-to-bottom (y descending), then
/// left-to-right (x ascending).
///
/// The sort is stable, so fragments sharing the same `(y, x)` keep their
/// relative input order.
pub fn sort_fragments(fragments: &mut [TextFragment]) {
    fragments.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
    });
}
