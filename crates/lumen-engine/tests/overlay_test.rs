mod common;

use common::FakeDocument;
use lumen_engine::inspector::{HighlightOverlay, Marker, ScrollOptions};

fn document() -> FakeDocument {
    FakeDocument::new()
        .with("#a", 1)
        .with("#b", 1)
        .with(".row", 3)
        .with_invalid("div[[")
}

#[tokio::test]
async fn test_select_is_exclusive_across_any_sequence() {
    let mut doc = document();
    let mut overlay = HighlightOverlay::new();

    for selector in ["#a", "#ghost", "#b", "div[[", ".row", "#ghost", "#a", "#a"] {
        overlay.select(&mut doc, selector).await.unwrap();
        assert!(
            doc.with_marker(Marker::Selected).len() <= 1,
            "more than one selected after {}",
            selector
        );
    }

    let a = doc.elements("#a")[0];
    assert_eq!(doc.with_marker(Marker::Selected), vec![a]);
    assert_eq!(overlay.selection().current(), Some(a));
}

#[tokio::test]
async fn test_select_ghost_leaves_state_unchanged() {
    let mut doc = document();
    let mut overlay = HighlightOverlay::new();

    assert_eq!(overlay.select(&mut doc, "#ghost").await.unwrap(), None);
    assert_eq!(overlay.selection().current(), None);

    let b = doc.elements("#b")[0];
    overlay.select(&mut doc, "#b").await.unwrap();
    let before = overlay.selection();

    assert_eq!(overlay.select(&mut doc, "#ghost").await.unwrap(), None);
    assert_eq!(overlay.selection(), before);
    assert!(doc.has_marker(b, Marker::Selected));
}

#[tokio::test]
async fn test_select_uses_first_match_and_scrolls_it_to_center() {
    let mut doc = document();
    let mut overlay = HighlightOverlay::new();

    let rows = doc.elements(".row");
    let selected = overlay.select(&mut doc, ".row").await.unwrap();

    assert_eq!(selected, Some(rows[0]));
    assert_eq!(doc.with_marker(Marker::Selected), vec![rows[0]]);
    assert_eq!(doc.scrolls, vec![(rows[0], ScrollOptions::smooth_center())]);
}

#[tokio::test]
async fn test_mark_flagged_is_idempotent() {
    let mut doc = document();
    let mut overlay = HighlightOverlay::new();

    assert_eq!(overlay.mark_flagged(&mut doc, ".row", "tip").await.unwrap(), 3);
    assert_eq!(overlay.mark_flagged(&mut doc, ".row", "tip").await.unwrap(), 3);

    for el in doc.elements(".row") {
        let markers = &doc.markers[&el];
        assert_eq!(markers.iter().filter(|m| **m == Marker::Flagged).count(), 1);
        assert_eq!(doc.tooltips[&el], "tip");
    }
}

#[tokio::test]
async fn test_flagged_and_selected_coexist() {
    let mut doc = document();
    let mut overlay = HighlightOverlay::new();
    let a = doc.elements("#a")[0];
    let b = doc.elements("#b")[0];

    overlay.mark_flagged(&mut doc, "#a", "a").await.unwrap();
    overlay.mark_flagged(&mut doc, "#b", "b").await.unwrap();
    overlay.select(&mut doc, "#a").await.unwrap();
    assert!(doc.has_marker(a, Marker::Flagged));
    assert!(doc.has_marker(a, Marker::Selected));

    overlay.select(&mut doc, "#b").await.unwrap();
    assert!(doc.has_marker(a, Marker::Flagged));
    assert!(!doc.has_marker(a, Marker::Selected));
    assert!(doc.has_marker(b, Marker::Selected));
}

#[tokio::test]
async fn test_unmatched_and_invalid_selectors_mark_nothing() {
    let mut doc = document();
    let mut overlay = HighlightOverlay::new();

    assert_eq!(overlay.mark_flagged(&mut doc, "#ghost", "x").await.unwrap(), 0);
    assert_eq!(overlay.mark_flagged(&mut doc, "div[[", "x").await.unwrap(), 0);
    assert!(doc.markers.is_empty());
}

#[tokio::test]
async fn test_select_survives_removed_previous_selection() {
    let mut doc = document();
    let mut overlay = HighlightOverlay::new();
    let a = doc.elements("#a")[0];
    let b = doc.elements("#b")[0];

    overlay.select(&mut doc, "#a").await.unwrap();
    doc.remove(a);

    assert_eq!(overlay.select(&mut doc, "#b").await.unwrap(), Some(b));
    assert_eq!(overlay.selection().current(), Some(b));
}

#[tokio::test]
async fn test_lost_document_is_an_error() {
    let mut doc = document();
    let mut overlay = HighlightOverlay::new();
    doc.lost = true;

    assert!(overlay.select(&mut doc, "#a").await.is_err());
    assert!(overlay.mark_flagged(&mut doc, "#a", "x").await.is_err());
}

#[tokio::test]
async fn test_stale_target_keeps_previous_selection() {
    let mut doc = document();
    let mut overlay = HighlightOverlay::new();
    let a = doc.elements("#a")[0];
    let b = doc.elements("#b")[0];

    overlay.select(&mut doc, "#a").await.unwrap();
    doc.detach(b);

    assert_eq!(overlay.select(&mut doc, "#b").await.unwrap(), None);
    assert_eq!(overlay.selection().current(), Some(a));
    assert_eq!(doc.with_marker(Marker::Selected), vec![a]);
}
