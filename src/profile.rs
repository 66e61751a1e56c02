//! Per-creature weaknesses, resistances and immunities, plus the per-type
//! cards and offensive coverage built from the same matrix.

use serde::{Deserialize, Serialize};

use crate::matrix::EffectivenessMatrix;
use crate::types::{Multiplier, TypeError, TypeName};

/// How two defending types combine.
///
/// `Product` multiplies the per-type multipliers, so a 0x from either type
/// wins. `LegacyUnion` lists every per-type weakness, resistance and immunity
/// side by side, the way the old detail page did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregationMode {
    #[default]
    Product,
    LegacyUnion,
}

impl AggregationMode {
    pub fn toggle(self) -> Self {
        match self {
            AggregationMode::Product => AggregationMode::LegacyUnion,
            AggregationMode::LegacyUnion => AggregationMode::Product,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AggregationMode::Product => "product",
            AggregationMode::LegacyUnion => "legacy union",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    pub attacking: TypeName,
    pub multiplier: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PokemonTypeProfile {
    pub types: Vec<TypeName>,
    pub weaknesses: Vec<Matchup>,
    pub resistances: Vec<Matchup>,
    pub immunities: Vec<Matchup>,
    /// Attackers whose matrix row is unknown.
    pub unresolved: Vec<TypeName>,
}

impl PokemonTypeProfile {
    pub fn weakness_to(&self, attacking: TypeName) -> Option<f32> {
        find(&self.weaknesses, attacking)
    }

    pub fn resistance_to(&self, attacking: TypeName) -> Option<f32> {
        find(&self.resistances, attacking)
    }

    pub fn is_immune_to(&self, attacking: TypeName) -> bool {
        find(&self.immunities, attacking).is_some()
    }
}

fn find(list: &[Matchup], attacking: TypeName) -> Option<f32> {
    list.iter()
        .find(|matchup| matchup.attacking == attacking)
        .map(|matchup| matchup.multiplier)
}

/// One or two distinct types; a repeated type counts once.
pub fn normalize_types(types: &[TypeName]) -> Result<Vec<TypeName>, TypeError> {
    if types.is_empty() || types.len() > 2 {
        return Err(TypeError::InvalidTypeCount(types.len()));
    }
    let mut unique = Vec::with_capacity(2);
    for ty in types {
        if !unique.contains(ty) {
            unique.push(*ty);
        }
    }
    Ok(unique)
}

pub fn parse_types<S: AsRef<str>>(names: &[S]) -> Result<Vec<TypeName>, TypeError> {
    let types = names
        .iter()
        .map(|name| name.as_ref().parse())
        .collect::<Result<Vec<TypeName>, TypeError>>()?;
    normalize_types(&types)
}

/// Reads the matrix transposed: the creature is always the defender.
pub fn aggregate(
    types: &[TypeName],
    matrix: &EffectivenessMatrix,
    mode: AggregationMode,
) -> Result<PokemonTypeProfile, TypeError> {
    let types = normalize_types(types)?;
    let mut profile = PokemonTypeProfile {
        types: types.clone(),
        weaknesses: Vec::new(),
        resistances: Vec::new(),
        immunities: Vec::new(),
        unresolved: Vec::new(),
    };

    for attacking in TypeName::alphabetical() {
        let factors: Result<Vec<Multiplier>, TypeError> = types
            .iter()
            .map(|defending| matrix.multiplier(attacking, *defending))
            .collect();
        let Ok(factors) = factors else {
            profile.unresolved.push(attacking);
            continue;
        };

        match mode {
            AggregationMode::Product => {
                let net: f32 = factors.iter().map(|factor| factor.value()).product();
                let matchup = Matchup {
                    attacking,
                    multiplier: net,
                };
                if net == 0.0 {
                    profile.immunities.push(matchup);
                } else if net > 1.0 {
                    profile.weaknesses.push(matchup);
                } else if net < 1.0 {
                    profile.resistances.push(matchup);
                }
            }
            AggregationMode::LegacyUnion => {
                for factor in factors {
                    let list = match factor {
                        Multiplier::Double => &mut profile.weaknesses,
                        Multiplier::Half => &mut profile.resistances,
                        Multiplier::Immune => &mut profile.immunities,
                        Multiplier::Neutral => continue,
                    };
                    if find(list, attacking).is_none() {
                        list.push(Matchup {
                            attacking,
                            multiplier: factor.value(),
                        });
                    }
                }
            }
        }
    }
    Ok(profile)
}

/// Defensive summary of a single type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeCard {
    pub ty: TypeName,
    pub weak_to: Vec<TypeName>,
    pub resists: Vec<TypeName>,
    pub immune_to: Vec<TypeName>,
    pub incomplete: bool,
}

pub fn type_card(ty: TypeName, matrix: &EffectivenessMatrix) -> TypeCard {
    let mut card = TypeCard {
        ty,
        weak_to: Vec::new(),
        resists: Vec::new(),
        immune_to: Vec::new(),
        incomplete: false,
    };
    for attacking in TypeName::alphabetical() {
        match matrix.multiplier(attacking, ty) {
            Ok(Multiplier::Double) => card.weak_to.push(attacking),
            Ok(Multiplier::Half) => card.resists.push(attacking),
            Ok(Multiplier::Immune) => card.immune_to.push(attacking),
            Ok(Multiplier::Neutral) => {}
            Err(_) => card.incomplete = true,
        }
    }
    card
}

pub fn type_cards(matrix: &EffectivenessMatrix) -> Vec<TypeCard> {
    TypeName::alphabetical()
        .into_iter()
        .map(|ty| type_card(ty, matrix))
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageEntry {
    pub defending: TypeName,
    pub multiplier: Multiplier,
}

/// Best multiplier any of the creature's own types reaches per defender.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OffenseCoverage {
    pub entries: Vec<CoverageEntry>,
}

impl OffenseCoverage {
    pub fn with(&self, multiplier: Multiplier) -> Vec<TypeName> {
        self.entries
            .iter()
            .filter(|entry| entry.multiplier == multiplier)
            .map(|entry| entry.defending)
            .collect()
    }
}

pub fn coverage(
    types: &[TypeName],
    matrix: &EffectivenessMatrix,
) -> Result<OffenseCoverage, TypeError> {
    let types = normalize_types(types)?;
    let known: Vec<TypeName> = types
        .iter()
        .copied()
        .filter(|ty| matrix.is_known(*ty))
        .collect();
    let Some(first) = known.first() else {
        return Err(TypeError::UnknownType(types[0].name().to_string()));
    };

    let mut entries = Vec::new();
    for defending in TypeName::alphabetical() {
        let mut best = matrix.multiplier(*first, defending)?;
        for attacking in &known[1..] {
            let candidate = matrix.multiplier(*attacking, defending)?;
            if candidate.value() > best.value() {
                best = candidate;
            }
        }
        entries.push(CoverageEntry {
            defending,
            multiplier: best,
        });
    }
    Ok(OffenseCoverage { entries })
}
