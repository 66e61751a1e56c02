//! PokeAPI client for type damage relations.

use std::sync::OnceLock;

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;

use crate::cache::HttpCache;
use crate::catalog::{DamageRelation, SourceError, TypeSource};
use crate::types::TypeName;

pub const API_BASE: &str = "https://pokeapi.co/api/v2";

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
}

#[derive(Clone, Debug, Deserialize)]
struct TypeDetailResponse {
    damage_relations: DamageRelationsResponse,
}

#[derive(Clone, Debug, Deserialize)]
struct DamageRelationsResponse {
    double_damage_to: Vec<NamedResource>,
    half_damage_to: Vec<NamedResource>,
    no_damage_to: Vec<NamedResource>,
}

#[derive(Clone, Debug)]
pub struct PokeApiSource {
    base_url: String,
    cache: Option<HttpCache>,
}

impl PokeApiSource {
    pub fn new(base_url: impl Into<String>, cache: Option<HttpCache>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, cache }
    }

    pub fn type_url(&self, ty: TypeName) -> String {
        format!("{}/type/{}", self.base_url, ty.api_name())
    }

    async fn fetch_bytes_cached(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        if let Some(cache) = &self.cache {
            if let Some(bytes) = cache.read(url).await {
                debug!("cache hit for {url}");
                return Ok(bytes);
            }
        }

        let response = http_client()
            .get(url)
            .send()
            .await
            .map_err(|err| SourceError::Request(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|err| SourceError::Request(err.to_string()))?
            .to_vec();
        if let Some(cache) = &self.cache {
            cache.write(url, &bytes).await;
        }
        Ok(bytes)
    }
}

#[async_trait]
impl TypeSource for PokeApiSource {
    async fn fetch_relation(&self, ty: TypeName) -> Result<DamageRelation, SourceError> {
        let url = self.type_url(ty);
        let bytes = self.fetch_bytes_cached(&url).await?;
        match parse_relation(ty, &bytes) {
            Ok(relation) => Ok(relation),
            Err(err) => {
                if let Some(cache) = &self.cache {
                    cache.evict(&url).await;
                }
                Err(err)
            }
        }
    }
}

/// Maps a `/type/{name}` payload into a relation, dropping defender names
/// outside the 18 known types.
pub fn parse_relation(ty: TypeName, bytes: &[u8]) -> Result<DamageRelation, SourceError> {
    let response: TypeDetailResponse =
        serde_json::from_slice(bytes).map_err(|err| SourceError::Parse(err.to_string()))?;
    let relations = response.damage_relations;
    Ok(DamageRelation {
        attacking: ty,
        double_damage_to: known_types(ty, relations.double_damage_to),
        half_damage_to: known_types(ty, relations.half_damage_to),
        no_damage_to: known_types(ty, relations.no_damage_to),
    })
}

fn known_types<C: FromIterator<TypeName>>(ty: TypeName, entries: Vec<NamedResource>) -> C {
    entries
        .into_iter()
        .filter_map(|entry| match entry.name.parse::<TypeName>() {
            Ok(defending) => Some(defending),
            Err(err) => {
                debug!("{ty}: ignoring relation entry ({err})");
                None
            }
        })
        .collect()
}

fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(reqwest::Client::new)
}
