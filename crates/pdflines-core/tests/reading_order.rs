//! End-to-end checks of the reconstruction pipeline on raw items.

use pdflines_core::{Document, PAGE_SEPARATOR, Page, RawItem, ReflowOptions, normalize_text};

fn page(number: u32, specs: &[(&str, f64, f64)]) -> Page {
    let items: Vec<RawItem> = specs
        .iter()
        .map(|&(content, x, y)| RawItem::at(content, x, y))
        .collect();
    Page::from_items(number, &items, &ReflowOptions::default())
}

fn line_of(page: &Page, needle: &str) -> usize {
    page.lines
        .iter()
        .position(|l| l.split(' ').any(|w| w == needle))
        .unwrap_or_else(|| panic!("{needle} not found in {:?}", page.lines))
}

#[test]
fn scenario_a_same_line() {
    let p = page(1, &[("Lot", 10.0, 100.0), ("1", 50.0, 100.0)]);
    assert_eq!(p.lines, vec!["Lot 1"]);
}

#[test]
fn scenario_b_two_lines() {
    let p = page(1, &[("Line1", 0.0, 100.0), ("Line2", 0.0, 50.0)]);
    assert_eq!(p.lines, vec!["Line1", "Line2"]);
}

#[test]
fn scenario_c_whitespace_only() {
    let p = page(1, &[("  ", 0.0, 100.0)]);
    assert!(p.lines.is_empty());
}

#[test]
fn scenario_d_four_newlines() {
    assert_eq!(normalize_text("top\n\n\n\nbottom"), "top\n\nbottom");
}

#[test]
fn scenario_e_two_pages() {
    let doc = Document::new(
        "doc.pdf",
        vec![page(1, &[("A", 0.0, 10.0)]), page(2, &[("B", 0.0, 10.0)])],
    );
    assert_eq!(doc.raw_text, "A\n\n---\n\nB");
    assert_eq!(doc.raw_text.matches(PAGE_SEPARATOR).count(), 1);
}

#[test]
fn tolerance_boundary() {
    let together = page(1, &[("a", 0.0, 100.0), ("b", 10.0, 98.0)]);
    assert_eq!(together.lines, vec!["a b"]);

    let apart = page(1, &[("a", 0.0, 100.0), ("b", 10.0, 97.999)]);
    assert_eq!(apart.lines, vec!["a", "b"]);
}

#[test]
fn ordering_property_holds_for_shuffled_grid() {
    // A 5x4 grid of cells, fed in a scrambled order.
    let mut specs = Vec::new();
    for row in 0..5 {
        for col in 0..4 {
            specs.push((row, col));
        }
    }
    specs.sort_by_key(|&(r, c)| (c * 7 + r * 3) % 11);
    let names: Vec<String> = specs.iter().map(|(r, c)| format!("r{r}c{c}")).collect();
    let spec_refs: Vec<(&str, f64, f64)> = specs
        .iter()
        .zip(&names)
        .map(|(&(r, c), name)| {
            (
                name.as_str(),
                10.0 + c as f64 * 40.0,
                700.0 - r as f64 * 14.0,
            )
        })
        .collect();
    let p = page(1, &spec_refs);

    assert_eq!(p.lines.len(), 5);
    for row in 0..5 {
        assert_eq!(
            p.lines[row],
            format!("r{row}c0 r{row}c1 r{row}c2 r{row}c3")
        );
    }
    assert!(line_of(&p, "r0c3") < line_of(&p, "r1c0"));
}

#[test]
fn blank_fragments_never_reach_output() {
    let p = page(
        1,
        &[("Sun", 0.0, 100.0), (" ", 20.0, 100.0), ("\t", 40.0, 100.0), ("Moon", 60.0, 100.0)],
    );
    assert_eq!(p.lines, vec!["Sun Moon"]);
}

#[test]
fn raw_text_is_reproducible() {
    let doc = Document::new(
        "doc.pdf",
        vec![
            page(1, &[("a  b", 0.0, 10.0), ("c", 50.0, 10.0)]),
            page(2, &[]),
            page(3, &[("z", 0.0, 10.0)]),
        ],
    );
    assert!(doc.verify_raw_text());
    assert_eq!(normalize_text(&doc.raw_text), doc.raw_text);
}
