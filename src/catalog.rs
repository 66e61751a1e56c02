//! Per-type damage relations and the loader that collects them into a catalog.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;

use crate::types::{Multiplier, TypeName, TYPE_COUNT};

/// How one attacking type fares against defenders. Unlisted defenders take 1x.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRelation {
    pub attacking: TypeName,
    pub double_damage_to: BTreeSet<TypeName>,
    pub half_damage_to: BTreeSet<TypeName>,
    pub no_damage_to: BTreeSet<TypeName>,
}

impl DamageRelation {
    pub fn new(attacking: TypeName) -> Self {
        Self {
            attacking,
            double_damage_to: BTreeSet::new(),
            half_damage_to: BTreeSet::new(),
            no_damage_to: BTreeSet::new(),
        }
    }

    pub fn with_lists(
        attacking: TypeName,
        double: &[TypeName],
        half: &[TypeName],
        none: &[TypeName],
    ) -> Self {
        Self {
            attacking,
            double_damage_to: double.iter().copied().collect(),
            half_damage_to: half.iter().copied().collect(),
            no_damage_to: none.iter().copied().collect(),
        }
    }

    /// Multiplier against `defending`. A defender listed more than once
    /// resolves as no damage, then half, then double.
    pub fn multiplier_against(&self, defending: TypeName) -> Multiplier {
        if self.no_damage_to.contains(&defending) {
            Multiplier::Immune
        } else if self.half_damage_to.contains(&defending) {
            Multiplier::Half
        } else if self.double_damage_to.contains(&defending) {
            Multiplier::Double
        } else {
            Multiplier::Neutral
        }
    }

    /// Defenders that appear in more than one list.
    pub fn conflicts(&self) -> Vec<TypeName> {
        TypeName::ALL
            .into_iter()
            .filter(|ty| {
                let hits = [
                    self.double_damage_to.contains(ty),
                    self.half_damage_to.contains(ty),
                    self.no_damage_to.contains(ty),
                ];
                hits.iter().filter(|hit| **hit).count() > 1
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.double_damage_to.is_empty()
            && self.half_damage_to.is_empty()
            && self.no_damage_to.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogOrigin {
    Remote,
    Fallback,
}

impl CatalogOrigin {
    pub fn label(self) -> &'static str {
        match self {
            CatalogOrigin::Remote => "PokeAPI",
            CatalogOrigin::Fallback => "built-in data",
        }
    }
}

/// Loaded relations, at most one per type, sorted by type name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeCatalog {
    origin: CatalogOrigin,
    relations: Vec<DamageRelation>,
}

impl TypeCatalog {
    pub fn new(origin: CatalogOrigin, relations: Vec<DamageRelation>) -> Self {
        let mut unique: Vec<DamageRelation> = Vec::with_capacity(relations.len());
        for relation in relations {
            if unique.iter().any(|kept| kept.attacking == relation.attacking) {
                warn!(
                    "duplicate relation record for {}, keeping the first",
                    relation.attacking
                );
                continue;
            }
            unique.push(relation);
        }
        unique.sort_by_key(|relation| relation.attacking.name());
        Self {
            origin,
            relations: unique,
        }
    }

    /// The built-in table used when the remote catalog is out of reach.
    pub fn fallback() -> Self {
        Self::new(CatalogOrigin::Fallback, fallback_relations())
    }

    pub fn origin(&self) -> CatalogOrigin {
        self.origin
    }

    pub fn relations(&self) -> &[DamageRelation] {
        &self.relations
    }

    pub fn get(&self, ty: TypeName) -> Option<&DamageRelation> {
        self.relations.iter().find(|relation| relation.attacking == ty)
    }

    pub fn contains(&self, ty: TypeName) -> bool {
        self.get(ty).is_some()
    }

    /// Types with no relation record, in chart order.
    pub fn missing(&self) -> Vec<TypeName> {
        TypeName::ALL
            .into_iter()
            .filter(|ty| !self.contains(*ty))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.relations.len() == TYPE_COUNT
    }
}

#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("response parse error: {0}")]
    Parse(String),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("no relation data for {0}")]
    Missing(TypeName),
}

#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum CatalogError {
    #[error("type catalog unavailable: all {} type requests failed", .failures.len())]
    Unavailable {
        failures: Vec<(TypeName, SourceError)>,
    },
}

#[async_trait]
pub trait TypeSource: Send + Sync {
    async fn fetch_relation(&self, ty: TypeName) -> Result<DamageRelation, SourceError>;
}

/// Serves the built-in table. Never touches the network.
#[derive(Clone, Copy, Debug, Default)]
pub struct StaticSource;

#[async_trait]
impl TypeSource for StaticSource {
    async fn fetch_relation(&self, ty: TypeName) -> Result<DamageRelation, SourceError> {
        fallback_relations()
            .into_iter()
            .find(|relation| relation.attacking == ty)
            .ok_or(SourceError::Missing(ty))
    }
}

/// Requests every type concurrently and keeps whatever arrives.
///
/// Each request is bounded by `timeout`; a failed or slow type is logged and
/// left out. Only when nothing loads does this return an error.
pub async fn load_catalog(
    source: Arc<dyn TypeSource>,
    origin: CatalogOrigin,
    timeout: Duration,
) -> Result<TypeCatalog, CatalogError> {
    let mut join_set = JoinSet::new();
    for ty in TypeName::ALL {
        let source = Arc::clone(&source);
        join_set.spawn(async move {
            let result = match tokio::time::timeout(timeout, source.fetch_relation(ty)).await {
                Ok(Ok(relation)) if relation.attacking != ty => Err(SourceError::Parse(format!(
                    "asked for {ty}, got relations for {}",
                    relation.attacking
                ))),
                Ok(result) => result,
                Err(_) => Err(SourceError::Timeout(timeout)),
            };
            (ty, result)
        });
    }

    let mut relations = Vec::with_capacity(TYPE_COUNT);
    let mut failures = Vec::new();
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((ty, Ok(relation))) => {
                debug!("loaded relations for {ty}");
                relations.push(relation);
            }
            Ok((ty, Err(error))) => {
                warn!("type {ty} left out of catalog: {error}");
                failures.push((ty, error));
            }
            Err(error) => warn!("type request task failed: {error}"),
        }
    }

    if relations.is_empty() {
        failures.sort_by_key(|(ty, _)| ty.index());
        return Err(CatalogError::Unavailable { failures });
    }

    let catalog = TypeCatalog::new(origin, relations);
    info!(
        "type catalog loaded from {}: {}/{} types",
        origin.label(),
        catalog.len(),
        TYPE_COUNT
    );
    Ok(catalog)
}

fn fallback_relations() -> Vec<DamageRelation> {
    use TypeName::*;
    vec![
        DamageRelation::with_lists(Normal, &[], &[Rock, Steel], &[Ghost]),
        DamageRelation::with_lists(
            Fire,
            &[Grass, Ice, Bug, Steel],
            &[Fire, Water, Rock, Dragon],
            &[],
        ),
        DamageRelation::with_lists(Water, &[Fire, Ground, Rock], &[Water, Grass, Dragon], &[]),
        DamageRelation::with_lists(
            Electric,
            &[Water, Flying],
            &[Grass, Electric, Dragon],
            &[Ground],
        ),
        DamageRelation::with_lists(
            Grass,
            &[Water, Ground, Rock],
            &[Fire, Grass, Poison, Flying, Bug, Dragon, Steel],
            &[],
        ),
        DamageRelation::with_lists(
            Ice,
            &[Grass, Ground, Flying, Dragon],
            &[Fire, Water, Ice, Steel],
            &[],
        ),
        DamageRelation::with_lists(
            Fighting,
            &[Normal, Ice, Rock, Dark, Steel],
            &[Poison, Flying, Psychic, Bug, Fairy],
            &[Ghost],
        ),
        DamageRelation::with_lists(
            Poison,
            &[Grass, Fairy],
            &[Poison, Ground, Rock, Ghost],
            &[Steel],
        ),
        DamageRelation::with_lists(
            Ground,
            &[Fire, Electric, Poison, Rock, Steel],
            &[Grass, Bug],
            &[Flying],
        ),
        DamageRelation::with_lists(
            Flying,
            &[Grass, Fighting, Bug],
            &[Electric, Rock, Steel],
            &[],
        ),
        DamageRelation::with_lists(Psychic, &[Fighting, Poison], &[Psychic, Steel], &[Dark]),
        DamageRelation::with_lists(
            Bug,
            &[Grass, Psychic, Dark],
            &[Fire, Fighting, Poison, Flying, Ghost, Steel, Fairy],
            &[],
        ),
        DamageRelation::with_lists(
            Rock,
            &[Fire, Ice, Flying, Bug],
            &[Fighting, Ground, Steel],
            &[],
        ),
        DamageRelation::with_lists(Ghost, &[Psychic, Ghost], &[Dark], &[Normal]),
        DamageRelation::with_lists(Dragon, &[Dragon], &[Steel], &[Fairy]),
        DamageRelation::with_lists(Dark, &[Psychic, Ghost], &[Fighting, Dark, Fairy], &[]),
        DamageRelation::with_lists(
            Steel,
            &[Ice, Rock, Fairy],
            &[Fire, Water, Electric, Steel],
            &[],
        ),
        DamageRelation::with_lists(
            Fairy,
            &[Fighting, Dragon, Dark],
            &[Fire, Poison, Steel],
            &[],
        ),
    ]
}
