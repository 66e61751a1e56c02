//! Store-level flows: startup load, fallback, retry and selection.

use tui_dispatch::testing::*;
use tui_dispatch::EffectStore;
use typedex::{
    action::Action,
    catalog::{CatalogOrigin, TypeCatalog},
    config::{AppSettings, SourceMode},
    effect::Effect,
    profile::AggregationMode,
    reducer::reducer,
    state::{AppState, View},
    types::TypeName,
};

fn partial_catalog(without: &[TypeName]) -> TypeCatalog {
    let relations = TypeCatalog::fallback()
        .relations()
        .iter()
        .filter(|relation| !without.contains(&relation.attacking))
        .cloned()
        .collect();
    TypeCatalog::new(CatalogOrigin::Remote, relations)
}

#[test]
fn init_emits_load_with_configured_loader() {
    let mut settings = AppSettings::default();
    settings.loader.source = SourceMode::Static;
    let mut store = EffectStore::new(AppState::new(settings.clone()), reducer);

    let result = store.dispatch(Action::Init);
    assert!(result.changed);
    assert!(store.state().loading);
    assert_eq!(
        result.effects,
        vec![Effect::LoadCatalog {
            loader: settings.loader
        }]
    );
}

#[test]
fn load_flow_builds_matrix() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::Init);
    harness.assert_state(|s| s.loading && s.matrix.is_none());
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::LoadCatalog { .. }));

    harness.complete_action(Action::CatalogDidLoad(partial_catalog(&[])));
    let (changed, total) = harness.process_emitted();
    assert_eq!((changed, total), (1, 1));

    harness.assert_state(|s| !s.loading);
    harness.assert_state(|s| s.matrix.as_ref().map(|m| m.entry_count()) == Some(324));
    harness.assert_state(|s| s.status_line() == "18/18 types from PokeAPI");
}

#[test]
fn partial_catalog_marks_unknown_rows() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::Init);
    harness.complete_action(Action::CatalogDidLoad(partial_catalog(&[
        TypeName::Ice,
        TypeName::Ghost,
        TypeName::Fairy,
    ])));
    harness.process_emitted();

    harness.assert_state(|s| {
        s.matrix
            .as_ref()
            .map(|m| m.known_types().len() == 15)
            .unwrap_or(false)
    });
    harness.assert_state(|s| {
        s.message.as_deref() == Some("15/18 types loaded, missing Ice, Ghost, Fairy")
    });
}

#[test]
fn total_failure_falls_back_to_builtin_data() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::Init);
    harness.complete_action(Action::CatalogDidError("all requests failed".into()));
    harness.process_emitted();

    harness.assert_state(|s| s.matrix.is_some());
    harness.assert_state(|s| {
        s.catalog.as_ref().map(|c| c.origin()) == Some(CatalogOrigin::Fallback)
    });
    harness.assert_state(|s| s.status_line().contains("using built-in data"));
}

#[test]
fn total_failure_without_fallback_then_retry() {
    let settings = AppSettings {
        fallback_on_error: false,
        ..AppSettings::default()
    };
    let mut harness = EffectStoreTestHarness::new(AppState::new(settings), reducer);
    harness.dispatch_collect(Action::Init);
    harness.drain_effects();
    harness.complete_action(Action::CatalogDidError("all requests failed".into()));
    harness.process_emitted();

    harness.assert_state(|s| s.matrix.is_none() && s.catalog.is_none());
    harness.assert_state(|s| s.status_line() == "all requests failed (press r to retry)");

    harness.dispatch_collect(Action::CatalogRetry);
    harness.assert_state(|s| s.loading && s.load_error.is_none());
    harness
        .drain_effects()
        .effects_first_matches(|e| matches!(e, Effect::LoadCatalog { .. }));

    harness.complete_action(Action::CatalogDidLoad(TypeCatalog::fallback()));
    harness.process_emitted();
    harness.assert_state(|s| s.matrix.is_some() && s.load_error.is_none());
}

#[test]
fn retry_replaces_catalog_wholesale() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::CatalogDidLoad(partial_catalog(&[TypeName::Dragon])));
    assert_eq!(store.state().catalog.as_ref().map(|c| c.len()), Some(17));

    store.dispatch(Action::CatalogRetry);
    store.dispatch(Action::CatalogDidLoad(partial_catalog(&[])));
    assert_eq!(store.state().catalog.as_ref().map(|c| c.len()), Some(18));
    assert!(store
        .state()
        .matrix
        .as_ref()
        .map(|m| m.is_known(TypeName::Dragon))
        .unwrap_or(false));
    assert_eq!(store.state().message, None);
}

#[test]
fn selection_drives_profile() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::CatalogDidLoad(TypeCatalog::fallback()));
    store.dispatch(Action::ViewNext);
    store.dispatch(Action::ViewNext);
    assert_eq!(store.state().view, View::Profile);

    // Normal -> Fire, then Flying as secondary.
    store.dispatch(Action::PrimaryTypeNext);
    for _ in 0..8 {
        store.dispatch(Action::SecondaryTypeNext);
    }
    assert_eq!(
        store.state().selected_types(),
        vec![TypeName::Fire, TypeName::Flying]
    );

    let profile = store
        .state()
        .profile()
        .and_then(Result::ok)
        .expect("profile");
    assert_eq!(profile.weakness_to(TypeName::Rock), Some(4.0));

    store.dispatch(Action::AggregationToggle);
    assert_eq!(store.state().aggregation, AggregationMode::LegacyUnion);
    let profile = store
        .state()
        .profile()
        .and_then(Result::ok)
        .expect("profile");
    assert_eq!(profile.weakness_to(TypeName::Rock), Some(2.0));

    let result = store.dispatch(Action::SecondaryTypeClear);
    assert!(result.changed);
    assert_eq!(store.state().selected_types(), vec![TypeName::Fire]);
    assert!(!store.dispatch(Action::SecondaryTypeClear).changed);
}

#[test]
fn cursor_moves_are_clamped() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    let results = harness.dispatch_all([
        Action::CursorMove(-1),
        Action::CursorMove(3),
        Action::CursorSet(usize::MAX),
        Action::CursorMove(1),
    ]);
    assert_eq!(results, vec![false, true, true, false]);
    harness.assert_state(|s| s.cursor == 17);
}
