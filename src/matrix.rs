//! Dense attacking x defending multiplier table.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::catalog::TypeCatalog;
use crate::types::{Multiplier, TypeError, TypeName, TYPE_COUNT};

/// Every (attacking, defending) pair has a value; unlisted pairs are neutral.
///
/// Rows whose attacking type had no relation record stay neutral in storage
/// but are reported as unknown by [`EffectivenessMatrix::multiplier`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectivenessMatrix {
    cells: [[Multiplier; TYPE_COUNT]; TYPE_COUNT],
    known: [bool; TYPE_COUNT],
}

impl EffectivenessMatrix {
    pub fn build(catalog: &TypeCatalog) -> Result<Self, TypeError> {
        if catalog.is_empty() {
            return Err(TypeError::EmptyCatalog);
        }

        let mut cells = [[Multiplier::Neutral; TYPE_COUNT]; TYPE_COUNT];
        let mut known = [false; TYPE_COUNT];
        for relation in catalog.relations() {
            let conflicts = relation.conflicts();
            if !conflicts.is_empty() {
                warn!(
                    "{} lists {:?} in more than one damage list, applying precedence",
                    relation.attacking, conflicts
                );
            }
            let row = &mut cells[relation.attacking.index()];
            for defending in TypeName::ALL {
                row[defending.index()] = relation.multiplier_against(defending);
            }
            known[relation.attacking.index()] = true;
        }
        Ok(Self { cells, known })
    }

    pub fn multiplier(
        &self,
        attacking: TypeName,
        defending: TypeName,
    ) -> Result<Multiplier, TypeError> {
        if !self.is_known(attacking) {
            return Err(TypeError::UnknownType(attacking.name().to_string()));
        }
        Ok(self.cells[attacking.index()][defending.index()])
    }

    /// Name-based lookup for callers holding raw strings.
    pub fn lookup(&self, attacking: &str, defending: &str) -> Result<Multiplier, TypeError> {
        self.multiplier(attacking.parse()?, defending.parse()?)
    }

    pub fn is_known(&self, attacking: TypeName) -> bool {
        self.known[attacking.index()]
    }

    pub fn known_types(&self) -> Vec<TypeName> {
        TypeName::ALL
            .into_iter()
            .filter(|ty| self.is_known(*ty))
            .collect()
    }

    pub fn entry_count(&self) -> usize {
        self.cells.iter().map(|row| row.len()).sum()
    }

    /// All 324 stored entries in chart order.
    pub fn entries(&self) -> impl Iterator<Item = (TypeName, TypeName, Multiplier)> + '_ {
        TypeName::ALL.into_iter().flat_map(move |attacking| {
            TypeName::ALL.into_iter().map(move |defending| {
                (
                    attacking,
                    defending,
                    self.cells[attacking.index()][defending.index()],
                )
            })
        })
    }
}
