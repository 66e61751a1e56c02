//! Rendering of the chart, card and profile views.

use tui_dispatch::testing::*;
use tui_dispatch_components::SelectList;
use typedex::{
    catalog::{CatalogOrigin, TypeCatalog},
    matrix::EffectivenessMatrix,
    state::AppState,
    types::TypeName,
    ui::{render_cards_view, render_chart_view, render_profile_view},
};

fn loaded_state(catalog: TypeCatalog) -> AppState {
    let matrix = EffectivenessMatrix::build(&catalog).expect("matrix");
    AppState {
        catalog: Some(catalog),
        matrix: Some(matrix),
        ..Default::default()
    }
}

#[test]
fn chart_shows_headers_and_labels() {
    let mut render = RenderHarness::new(110, 24);
    let state = loaded_state(TypeCatalog::fallback());

    let output = render.render_to_string_plain(|frame| {
        render_chart_view(frame, frame.area(), &state);
    });

    assert!(output.contains("NOR"), "column headers use short names");
    assert!(output.contains("FAI"));
    assert!(output.contains("Fighting"), "rows use full names");
    assert!(output.contains("2x"));
    assert!(output.contains("0.5x"));
    assert!(output.contains("0x"));
    assert!(!output.contains("?"));
}

#[test]
fn chart_marks_missing_rows() {
    let mut render = RenderHarness::new(110, 24);
    let relations = TypeCatalog::fallback()
        .relations()
        .iter()
        .filter(|relation| relation.attacking != TypeName::Dragon)
        .cloned()
        .collect();
    let state = loaded_state(TypeCatalog::new(CatalogOrigin::Remote, relations));

    let output = render.render_to_string_plain(|frame| {
        render_chart_view(frame, frame.area(), &state);
    });

    let dragon_row = output
        .lines()
        .find(|line| line.contains("Dragon"))
        .expect("dragon row");
    assert_eq!(dragon_row.matches('?').count(), 18);
}

#[test]
fn chart_shows_loading_and_error_states() {
    let mut render = RenderHarness::new(60, 12);

    let loading = AppState {
        loading: true,
        ..Default::default()
    };
    let output = render.render_to_string_plain(|frame| {
        render_chart_view(frame, frame.area(), &loading);
    });
    assert!(output.contains("Loading type data..."));

    let failed = AppState {
        load_error: Some("all requests failed".into()),
        ..Default::default()
    };
    let output = render.render_to_string_plain(|frame| {
        render_chart_view(frame, frame.area(), &failed);
    });
    assert!(output.contains("Type data unavailable"));
    assert!(output.contains("Press r to retry."));
}

#[test]
fn cards_show_selected_type() {
    let mut render = RenderHarness::new(100, 24);
    let mut list = SelectList::new();
    let state = loaded_state(TypeCatalog::fallback());

    let output = render.render_to_string_plain(|frame| {
        render_cards_view(frame, frame.area(), &state, &mut list);
    });

    assert!(output.contains("BUG"));
    assert!(output.contains("Weak to"));
    assert!(output.contains("Fire, Flying, Rock"));
    assert!(output.contains("Water"), "list shows every type");
}

#[test]
fn profile_shows_compound_weakness() {
    let mut render = RenderHarness::new(100, 30);
    let mut state = loaded_state(TypeCatalog::fallback());
    state.primary = TypeName::Fire;
    state.secondary = Some(TypeName::Flying);

    let output = render.render_to_string_plain(|frame| {
        render_profile_view(frame, frame.area(), &state);
    });

    assert!(output.contains("DEFENSE: Fire / Flying"));
    assert!(output.contains("Weak 4x"));
    assert!(output.contains("Immune"));
    assert!(output.contains("OFFENSE"));
    assert!(output.contains("Strong 2x"));
}
