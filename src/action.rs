use serde::{Deserialize, Serialize};

use crate::catalog::TypeCatalog;

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[action(infer_categories)]
pub enum Action {
    Init,
    CatalogDidLoad(TypeCatalog),
    CatalogDidError(String),
    CatalogRetry,

    ViewNext,
    ViewPrev,
    CursorMove(i16),
    CursorSet(usize),

    PrimaryTypeNext,
    PrimaryTypePrev,
    SecondaryTypeNext,
    SecondaryTypePrev,
    SecondaryTypeClear,
    AggregationToggle,

    UiTerminalResize(u16, u16),
    Quit,
}
