//! Projection of the matrix into a grid of display cells.

use serde::{Deserialize, Serialize};

use crate::matrix::EffectivenessMatrix;
use crate::types::{format_multiplier, Multiplier, TypeName};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellClass {
    Neutral,
    SuperEffective,
    Resisted,
    Immune,
    Unknown,
}

impl CellClass {
    pub fn of(multiplier: Multiplier) -> Self {
        match multiplier {
            Multiplier::Neutral => CellClass::Neutral,
            Multiplier::Double => CellClass::SuperEffective,
            Multiplier::Half => CellClass::Resisted,
            Multiplier::Immune => CellClass::Immune,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartCell {
    pub defending: TypeName,
    pub multiplier: Option<Multiplier>,
    pub class: CellClass,
}

impl ChartCell {
    /// Neutral cells stay blank to keep the grid readable.
    pub fn label(&self) -> String {
        match (self.class, self.multiplier) {
            (CellClass::Unknown, _) | (_, None) => "?".to_string(),
            (CellClass::Neutral, _) => String::new(),
            (_, Some(multiplier)) => format_multiplier(multiplier.value()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartRow {
    pub attacking: TypeName,
    pub cells: Vec<ChartCell>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartGrid {
    pub columns: Vec<TypeName>,
    pub rows: Vec<ChartRow>,
}

impl ChartGrid {
    pub fn cell(&self, attacking: TypeName, defending: TypeName) -> Option<&ChartCell> {
        self.rows
            .iter()
            .find(|row| row.attacking == attacking)?
            .cells
            .iter()
            .find(|cell| cell.defending == defending)
    }
}

/// Rows are attackers and columns defenders, both in `order`.
pub fn render_chart(matrix: &EffectivenessMatrix, order: &[TypeName]) -> ChartGrid {
    let rows = order
        .iter()
        .map(|&attacking| ChartRow {
            attacking,
            cells: order
                .iter()
                .map(|&defending| match matrix.multiplier(attacking, defending) {
                    Ok(multiplier) => ChartCell {
                        defending,
                        multiplier: Some(multiplier),
                        class: CellClass::of(multiplier),
                    },
                    Err(_) => ChartCell {
                        defending,
                        multiplier: None,
                        class: CellClass::Unknown,
                    },
                })
                .collect(),
        })
        .collect();
    ChartGrid {
        columns: order.to_vec(),
        rows,
    }
}
