use log::{info, warn};
use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::catalog::TypeCatalog;
use crate::effect::Effect;
use crate::matrix::EffectivenessMatrix;
use crate::profile::normalize_types;
use crate::state::AppState;
use crate::types::{TypeName, TYPE_COUNT};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            let result = start_load(state);
            apply_initial_types(state);
            result
        }

        Action::CatalogRetry => {
            info!("retrying type catalog load");
            start_load(state)
        }

        Action::CatalogDidLoad(catalog) => {
            state.loading = false;
            match EffectivenessMatrix::build(&catalog) {
                Ok(matrix) => {
                    state.message = catalog_notice(&catalog);
                    install(state, catalog, matrix);
                }
                Err(error) => catalog_failed(state, error.to_string()),
            }
            DispatchResult::changed()
        }

        Action::CatalogDidError(error) => {
            state.loading = false;
            catalog_failed(state, error);
            DispatchResult::changed()
        }

        Action::ViewNext => {
            state.view = state.view.next();
            DispatchResult::changed()
        }

        Action::ViewPrev => {
            state.view = state.view.prev();
            DispatchResult::changed()
        }

        Action::CursorMove(delta) => {
            let index = (state.cursor as i16 + delta).max(0);
            if !state.set_cursor(index as usize) {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::CursorSet(index) => {
            if !state.set_cursor(index) {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::PrimaryTypeNext => cycle_primary(state, TypeName::next),
        Action::PrimaryTypePrev => cycle_primary(state, TypeName::prev),
        Action::SecondaryTypeNext => cycle_secondary(state, TypeName::next),
        Action::SecondaryTypePrev => cycle_secondary(state, TypeName::prev),

        Action::SecondaryTypeClear => {
            if state.secondary.is_none() {
                return DispatchResult::unchanged();
            }
            state.secondary = None;
            DispatchResult::changed()
        }

        Action::AggregationToggle => {
            state.aggregation = state.aggregation.toggle();
            state.message = Some(format!("Aggregation: {}", state.aggregation.label()));
            DispatchResult::changed()
        }

        Action::UiTerminalResize(width, height) => {
            if state.terminal_size != (width, height) {
                state.terminal_size = (width, height);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn start_load(state: &mut AppState) -> DispatchResult<Effect> {
    state.loading = true;
    state.load_error = None;
    state.message = None;
    DispatchResult::changed_with(Effect::LoadCatalog {
        loader: state.settings.loader.clone(),
    })
}

fn install(state: &mut AppState, catalog: TypeCatalog, matrix: EffectivenessMatrix) {
    state.catalog = Some(catalog);
    state.matrix = Some(matrix);
    state.load_error = None;
}

fn catalog_failed(state: &mut AppState, error: String) {
    if state.settings.fallback_on_error {
        warn!("type catalog unavailable ({error}), switching to built-in data");
        let catalog = TypeCatalog::fallback();
        match EffectivenessMatrix::build(&catalog) {
            Ok(matrix) => {
                install(state, catalog, matrix);
                state.message = Some(format!("PokeAPI unavailable, using built-in data: {error}"));
                return;
            }
            Err(build_error) => warn!("built-in data rejected: {build_error}"),
        }
    }
    state.catalog = None;
    state.matrix = None;
    state.load_error = Some(error);
}

fn catalog_notice(catalog: &TypeCatalog) -> Option<String> {
    let missing = catalog.missing();
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|ty| ty.name()).collect();
        return Some(format!(
            "{}/{} types loaded, missing {}",
            catalog.len(),
            TYPE_COUNT,
            names.join(", ")
        ));
    }
    None
}

fn apply_initial_types(state: &mut AppState) {
    if state.settings.initial_types.is_empty() {
        return;
    }
    match normalize_types(&state.settings.initial_types) {
        Ok(types) => {
            state.primary = types[0];
            state.secondary = types.get(1).copied();
            state.view = crate::state::View::Profile;
        }
        Err(error) => {
            warn!("ignoring initial type selection: {error}");
            state.message = Some(format!("Ignoring --types: {error}"));
        }
    }
}

fn cycle_primary(state: &mut AppState, step: fn(TypeName) -> TypeName) -> DispatchResult<Effect> {
    let mut next = step(state.primary);
    if state.secondary == Some(next) {
        next = step(next);
    }
    state.primary = next;
    DispatchResult::changed()
}

/// Walks the secondary slot through every type except the primary one.
fn cycle_secondary(
    state: &mut AppState,
    step: fn(TypeName) -> TypeName,
) -> DispatchResult<Effect> {
    let mut next = step(state.secondary.unwrap_or(state.primary));
    if next == state.primary {
        next = step(next);
    }
    state.secondary = Some(next);
    DispatchResult::changed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogOrigin;
    use crate::profile::AggregationMode;
    use crate::state::View;

    #[test]
    fn init_starts_loading() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::Init);
        assert!(result.changed);
        assert!(state.loading);
        assert_eq!(result.effects.len(), 1);
        assert!(matches!(result.effects[0], Effect::LoadCatalog { .. }));
    }

    #[test]
    fn loaded_catalog_builds_matrix() {
        let mut state = AppState {
            loading: true,
            ..Default::default()
        };
        reducer(&mut state, Action::CatalogDidLoad(TypeCatalog::fallback()));
        assert!(!state.loading);
        assert!(state.matrix.is_some());
        assert!(state.load_error.is_none());
    }

    #[test]
    fn partial_catalog_reports_missing_types() {
        let relations = TypeCatalog::fallback()
            .relations()
            .iter()
            .filter(|relation| relation.attacking != TypeName::Ice)
            .cloned()
            .collect();
        let mut state = AppState::default();
        reducer(
            &mut state,
            Action::CatalogDidLoad(TypeCatalog::new(CatalogOrigin::Remote, relations)),
        );
        assert_eq!(
            state.message.as_deref(),
            Some("17/18 types loaded, missing Ice")
        );
    }

    #[test]
    fn error_without_fallback_leaves_no_matrix() {
        let mut state = AppState::default();
        state.settings.fallback_on_error = false;
        state.matrix = EffectivenessMatrix::build(&TypeCatalog::fallback()).ok();
        reducer(&mut state, Action::CatalogDidError("offline".into()));
        assert!(state.matrix.is_none());
        assert!(state.catalog.is_none());
        assert_eq!(state.load_error.as_deref(), Some("offline"));
    }

    #[test]
    fn error_with_fallback_uses_builtin_data() {
        let mut state = AppState::default();
        reducer(&mut state, Action::CatalogDidError("offline".into()));
        assert!(state.matrix.is_some());
        assert_eq!(
            state.catalog.as_ref().map(|catalog| catalog.origin()),
            Some(CatalogOrigin::Fallback)
        );
        assert!(state.load_error.is_none());
    }

    #[test]
    fn secondary_skips_primary() {
        let mut state = AppState::default();
        state.primary = TypeName::Normal;
        reducer(&mut state, Action::SecondaryTypeNext);
        assert_eq!(state.secondary, Some(TypeName::Fire));
        reducer(&mut state, Action::SecondaryTypeClear);
        reducer(&mut state, Action::SecondaryTypePrev);
        assert_eq!(state.secondary, Some(TypeName::Fairy));

        state.secondary = Some(TypeName::Fire);
        reducer(&mut state, Action::PrimaryTypeNext);
        assert_eq!(state.primary, TypeName::Water);
    }

    #[test]
    fn initial_types_select_profile() {
        let mut state = AppState::default();
        state.settings.initial_types = vec![TypeName::Fire, TypeName::Flying];
        reducer(&mut state, Action::Init);
        assert_eq!(state.view, View::Profile);
        assert_eq!(state.selected_types(), vec![TypeName::Fire, TypeName::Flying]);

        let mut state = AppState::default();
        state.settings.initial_types = vec![TypeName::Fire, TypeName::Water, TypeName::Grass];
        reducer(&mut state, Action::Init);
        assert_eq!(state.view, View::Chart);
        assert_eq!(state.primary, TypeName::Normal);
    }

    #[test]
    fn aggregation_toggles() {
        let mut state = AppState::default();
        reducer(&mut state, Action::AggregationToggle);
        assert_eq!(state.aggregation, AggregationMode::LegacyUnion);
        reducer(&mut state, Action::AggregationToggle);
        assert_eq!(state.aggregation, AggregationMode::Product);
    }
}
