use serde::{Deserialize, Serialize};
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::catalog::TypeCatalog;
use crate::chart::{render_chart, ChartGrid};
use crate::config::AppSettings;
use crate::matrix::EffectivenessMatrix;
use crate::profile::{
    aggregate, coverage, type_cards, AggregationMode, OffenseCoverage, PokemonTypeProfile,
    TypeCard,
};
use crate::types::{TypeError, TypeName, TYPE_COUNT};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum View {
    #[default]
    Chart,
    Cards,
    Profile,
}

impl View {
    pub const ALL: [View; 3] = [View::Chart, View::Cards, View::Profile];

    pub fn title(self) -> &'static str {
        match self {
            View::Chart => "Chart",
            View::Cards => "Type Cards",
            View::Profile => "Profile",
        }
    }

    pub fn index(self) -> usize {
        match self {
            View::Chart => 0,
            View::Cards => 1,
            View::Profile => 2,
        }
    }

    pub fn next(self) -> View {
        View::ALL[(self.index() + 1) % View::ALL.len()]
    }

    pub fn prev(self) -> View {
        View::ALL[(self.index() + View::ALL.len() - 1) % View::ALL.len()]
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub terminal_size: (u16, u16),
    pub settings: AppSettings,

    pub loading: bool,
    pub catalog: Option<TypeCatalog>,
    pub matrix: Option<EffectivenessMatrix>,
    pub load_error: Option<String>,

    pub view: View,
    /// Highlighted row in the chart and selected card; both list 18 types.
    pub cursor: usize,
    pub primary: TypeName,
    pub secondary: Option<TypeName>,
    pub aggregation: AggregationMode,

    pub message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppSettings::default())
    }
}

impl AppState {
    pub fn new(settings: AppSettings) -> Self {
        let aggregation = settings.aggregation;
        Self {
            terminal_size: (80, 24),
            settings,
            loading: false,
            catalog: None,
            matrix: None,
            load_error: None,
            view: View::Chart,
            cursor: 0,
            primary: TypeName::Normal,
            secondary: None,
            aggregation,
            message: None,
        }
    }

    pub fn selected_types(&self) -> Vec<TypeName> {
        let mut types = vec![self.primary];
        if let Some(secondary) = self.secondary.filter(|ty| *ty != self.primary) {
            types.push(secondary);
        }
        types
    }

    pub fn set_cursor(&mut self, index: usize) -> bool {
        let bounded = index.min(TYPE_COUNT - 1);
        if bounded != self.cursor {
            self.cursor = bounded;
            return true;
        }
        false
    }

    /// Chart rows and columns in canonical order.
    pub fn chart(&self) -> Option<ChartGrid> {
        self.matrix
            .as_ref()
            .map(|matrix| render_chart(matrix, &TypeName::ALL))
    }

    /// Cards are listed alphabetically.
    pub fn cards(&self) -> Vec<TypeCard> {
        self.matrix.as_ref().map(type_cards).unwrap_or_default()
    }

    pub fn selected_card(&self) -> Option<TypeCard> {
        self.cards().into_iter().nth(self.cursor)
    }

    pub fn profile(&self) -> Option<Result<PokemonTypeProfile, TypeError>> {
        let matrix = self.matrix.as_ref()?;
        Some(aggregate(&self.selected_types(), matrix, self.aggregation))
    }

    pub fn coverage(&self) -> Option<Result<OffenseCoverage, TypeError>> {
        let matrix = self.matrix.as_ref()?;
        Some(coverage(&self.selected_types(), matrix))
    }

    pub fn status_line(&self) -> String {
        if self.loading {
            return "Loading type data...".to_string();
        }
        if let Some(error) = &self.load_error {
            return format!("{error} (press r to retry)");
        }
        if let Some(message) = &self.message {
            return message.clone();
        }
        match &self.catalog {
            Some(catalog) => format!(
                "{}/{} types from {}",
                catalog.len(),
                TYPE_COUNT,
                catalog.origin().label()
            ),
            None => "No type data".to_string(),
        }
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        vec![
            DebugSection::new("Catalog")
                .entry(
                    "origin",
                    ron_string(&self.catalog.as_ref().map(|catalog| catalog.origin())),
                )
                .entry(
                    "loaded",
                    ron_string(&self.catalog.as_ref().map(|catalog| catalog.len())),
                )
                .entry(
                    "missing",
                    ron_string(
                        &self
                            .catalog
                            .as_ref()
                            .map(|catalog| catalog.missing())
                            .unwrap_or_default(),
                    ),
                )
                .entry("matrix", ron_string(&self.matrix.is_some()))
                .entry("loading", ron_string(&self.loading))
                .entry("error", ron_string(&self.load_error)),
            DebugSection::new("Selection")
                .entry("view", ron_string(&self.view))
                .entry("cursor", ron_string(&self.cursor))
                .entry("types", ron_string(&self.selected_types()))
                .entry("aggregation", ron_string(&self.aggregation)),
            DebugSection::new("Status").entry("message", ron_string(&self.message)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn views_cycle_both_ways() {
        assert_eq!(View::Chart.next(), View::Cards);
        assert_eq!(View::Profile.next(), View::Chart);
        assert_eq!(View::Chart.prev(), View::Profile);
    }

    #[test]
    fn duplicate_secondary_is_ignored() {
        let mut state = AppState::default();
        state.primary = TypeName::Fire;
        state.secondary = Some(TypeName::Fire);
        assert_eq!(state.selected_types(), vec![TypeName::Fire]);
        state.secondary = Some(TypeName::Flying);
        assert_eq!(state.selected_types(), vec![TypeName::Fire, TypeName::Flying]);
    }

    #[test]
    fn derived_views_need_a_matrix() {
        let mut state = AppState::default();
        assert!(state.chart().is_none());
        assert!(state.cards().is_empty());
        assert!(state.profile().is_none());

        state.matrix = EffectivenessMatrix::build(&TypeCatalog::fallback()).ok();
        state.cursor = 1;
        assert_eq!(state.cards().len(), TYPE_COUNT);
        assert_eq!(state.selected_card().map(|card| card.ty), Some(TypeName::Dark));
        assert!(matches!(state.profile(), Some(Ok(_))));
    }

    #[test]
    fn cursor_is_clamped() {
        let mut state = AppState::default();
        assert!(state.set_cursor(40));
        assert_eq!(state.cursor, TYPE_COUNT - 1);
        assert!(!state.set_cursor(40));
    }
}
