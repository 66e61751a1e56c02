//! The closed set of Pokemon types and the damage multipliers between them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const TYPE_COUNT: usize = 18;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeName {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
}

impl TypeName {
    /// Canonical chart order.
    pub const ALL: [TypeName; TYPE_COUNT] = [
        TypeName::Normal,
        TypeName::Fire,
        TypeName::Water,
        TypeName::Electric,
        TypeName::Grass,
        TypeName::Ice,
        TypeName::Fighting,
        TypeName::Poison,
        TypeName::Ground,
        TypeName::Flying,
        TypeName::Psychic,
        TypeName::Bug,
        TypeName::Rock,
        TypeName::Ghost,
        TypeName::Dragon,
        TypeName::Dark,
        TypeName::Steel,
        TypeName::Fairy,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Lower-case identifier used by the remote catalog.
    pub fn api_name(self) -> &'static str {
        match self {
            TypeName::Normal => "normal",
            TypeName::Fire => "fire",
            TypeName::Water => "water",
            TypeName::Electric => "electric",
            TypeName::Grass => "grass",
            TypeName::Ice => "ice",
            TypeName::Fighting => "fighting",
            TypeName::Poison => "poison",
            TypeName::Ground => "ground",
            TypeName::Flying => "flying",
            TypeName::Psychic => "psychic",
            TypeName::Bug => "bug",
            TypeName::Rock => "rock",
            TypeName::Ghost => "ghost",
            TypeName::Dragon => "dragon",
            TypeName::Dark => "dark",
            TypeName::Steel => "steel",
            TypeName::Fairy => "fairy",
        }
    }

    /// Capitalised display name.
    pub fn name(self) -> &'static str {
        match self {
            TypeName::Normal => "Normal",
            TypeName::Fire => "Fire",
            TypeName::Water => "Water",
            TypeName::Electric => "Electric",
            TypeName::Grass => "Grass",
            TypeName::Ice => "Ice",
            TypeName::Fighting => "Fighting",
            TypeName::Poison => "Poison",
            TypeName::Ground => "Ground",
            TypeName::Flying => "Flying",
            TypeName::Psychic => "Psychic",
            TypeName::Bug => "Bug",
            TypeName::Rock => "Rock",
            TypeName::Ghost => "Ghost",
            TypeName::Dragon => "Dragon",
            TypeName::Dark => "Dark",
            TypeName::Steel => "Steel",
            TypeName::Fairy => "Fairy",
        }
    }

    /// Three-letter column header for the chart.
    pub fn short_name(self) -> &'static str {
        match self {
            TypeName::Normal => "NOR",
            TypeName::Fire => "FIR",
            TypeName::Water => "WAT",
            TypeName::Electric => "ELE",
            TypeName::Grass => "GRA",
            TypeName::Ice => "ICE",
            TypeName::Fighting => "FIG",
            TypeName::Poison => "POI",
            TypeName::Ground => "GRO",
            TypeName::Flying => "FLY",
            TypeName::Psychic => "PSY",
            TypeName::Bug => "BUG",
            TypeName::Rock => "ROC",
            TypeName::Ghost => "GHO",
            TypeName::Dragon => "DRA",
            TypeName::Dark => "DAR",
            TypeName::Steel => "STE",
            TypeName::Fairy => "FAI",
        }
    }

    pub fn color(self) -> (u8, u8, u8) {
        match self {
            TypeName::Normal => (0xA8, 0xA8, 0x78),
            TypeName::Fire => (0xF0, 0x80, 0x30),
            TypeName::Water => (0x68, 0x90, 0xF0),
            TypeName::Electric => (0xF8, 0xD0, 0x30),
            TypeName::Grass => (0x78, 0xC8, 0x50),
            TypeName::Ice => (0x98, 0xD8, 0xD8),
            TypeName::Fighting => (0xC0, 0x30, 0x28),
            TypeName::Poison => (0xA0, 0x40, 0xA0),
            TypeName::Ground => (0xE0, 0xC0, 0x68),
            TypeName::Flying => (0xA8, 0x90, 0xF0),
            TypeName::Psychic => (0xF8, 0x58, 0x88),
            TypeName::Bug => (0xA8, 0xB8, 0x20),
            TypeName::Rock => (0xB8, 0xA0, 0x38),
            TypeName::Ghost => (0x70, 0x58, 0x98),
            TypeName::Dragon => (0x70, 0x38, 0xF8),
            TypeName::Dark => (0x70, 0x58, 0x48),
            TypeName::Steel => (0xB8, 0xB8, 0xD0),
            TypeName::Fairy => (0xEE, 0x99, 0xAC),
        }
    }

    /// All types sorted by display name.
    pub fn alphabetical() -> Vec<TypeName> {
        let mut types = TypeName::ALL.to_vec();
        types.sort_by_key(|ty| ty.name());
        types
    }

    pub fn next(self) -> TypeName {
        TypeName::ALL[(self.index() + 1) % TYPE_COUNT]
    }

    pub fn prev(self) -> TypeName {
        TypeName::ALL[(self.index() + TYPE_COUNT - 1) % TYPE_COUNT]
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TypeName {
    type Err = TypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let key = value.trim().to_ascii_lowercase();
        TypeName::ALL
            .into_iter()
            .find(|ty| ty.api_name() == key)
            .ok_or_else(|| TypeError::UnknownType(value.trim().to_string()))
    }
}

#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown type: {0}")]
    UnknownType(String),
    #[error("a creature has one or two types, got {0}")]
    InvalidTypeCount(usize),
    #[error("cannot build an effectiveness matrix from an empty catalog")]
    EmptyCatalog,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Multiplier {
    Immune,
    Half,
    #[default]
    Neutral,
    Double,
}

impl Multiplier {
    pub fn value(self) -> f32 {
        match self {
            Multiplier::Immune => 0.0,
            Multiplier::Half => 0.5,
            Multiplier::Neutral => 1.0,
            Multiplier::Double => 2.0,
        }
    }
}

/// Formats a net multiplier the way the chart and profile label it: `4x`, `0.25x`.
pub fn format_multiplier(value: f32) -> String {
    format!("{value}x")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("FIRE".parse::<TypeName>(), Ok(TypeName::Fire));
        assert_eq!(" psychic ".parse::<TypeName>(), Ok(TypeName::Psychic));
        assert_eq!("Fairy".parse::<TypeName>(), Ok(TypeName::Fairy));
    }

    #[test]
    fn rejects_unknown_names() {
        assert_eq!(
            "stellar".parse::<TypeName>(),
            Err(TypeError::UnknownType("stellar".to_string()))
        );
        assert!("".parse::<TypeName>().is_err());
    }

    #[test]
    fn index_matches_chart_order() {
        for (index, ty) in TypeName::ALL.iter().enumerate() {
            assert_eq!(ty.index(), index);
            assert_eq!(ty.api_name().parse::<TypeName>(), Ok(*ty));
        }
    }

    #[test]
    fn alphabetical_order_starts_with_bug() {
        let sorted = TypeName::alphabetical();
        assert_eq!(sorted.first(), Some(&TypeName::Bug));
        assert_eq!(sorted.last(), Some(&TypeName::Water));
        assert_eq!(sorted.len(), TYPE_COUNT);
    }

    #[test]
    fn cycling_wraps_around() {
        assert_eq!(TypeName::Fairy.next(), TypeName::Normal);
        assert_eq!(TypeName::Normal.prev(), TypeName::Fairy);
    }

    #[test]
    fn multiplier_labels() {
        assert_eq!(format_multiplier(Multiplier::Double.value()), "2x");
        assert_eq!(format_multiplier(Multiplier::Half.value()), "0.5x");
        assert_eq!(format_multiplier(0.25), "0.25x");
        assert_eq!(format_multiplier(4.0), "4x");
        assert_eq!(format_multiplier(0.0), "0x");
    }
}
