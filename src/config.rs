//! Command-line options and the plain settings derived from them.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::{PokeApiSource, API_BASE};
use crate::cache::{HttpCache, DEFAULT_TTL};
use crate::catalog::{CatalogOrigin, StaticSource, TypeSource};
use crate::profile::AggregationMode;
use crate::types::TypeName;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(clap::Args, Debug, Clone)]
pub struct AppArgs {
    /// Use the built-in type table and never touch the network
    #[arg(long)]
    pub offline: bool,

    /// Base URL of the PokeAPI catalog
    #[arg(long, default_value = API_BASE)]
    pub api_base: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Disable the on-disk HTTP cache
    #[arg(long)]
    pub no_cache: bool,

    #[arg(long, default_value_t = 24)]
    pub cache_ttl_hours: u64,

    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Show the error instead of switching to built-in data when every request fails
    #[arg(long)]
    pub no_fallback: bool,

    /// List per-type weaknesses side by side instead of multiplying them
    #[arg(long)]
    pub legacy_union: bool,

    /// Initial profile selection, e.g. `fire,flying`
    #[arg(long, value_delimiter = ',')]
    pub types: Vec<TypeName>,

    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[arg(long, default_value = "info")]
    pub log_level: log::LevelFilter,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceMode {
    Remote { base_url: String },
    Static,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    pub dir: PathBuf,
    pub ttl: Duration,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    pub source: SourceMode,
    pub timeout: Duration,
    pub cache: Option<CacheConfig>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            source: SourceMode::Remote {
                base_url: API_BASE.to_string(),
            },
            timeout: DEFAULT_TIMEOUT,
            cache: None,
        }
    }
}

impl LoaderConfig {
    pub fn offline() -> Self {
        Self {
            source: SourceMode::Static,
            ..Self::default()
        }
    }

    pub fn build_source(&self) -> (Arc<dyn TypeSource>, CatalogOrigin) {
        match &self.source {
            SourceMode::Remote { base_url } => {
                let cache = self
                    .cache
                    .as_ref()
                    .map(|cache| HttpCache::new(&cache.dir, cache.ttl));
                (
                    Arc::new(PokeApiSource::new(base_url.clone(), cache)),
                    CatalogOrigin::Remote,
                )
            }
            SourceMode::Static => (Arc::new(StaticSource), CatalogOrigin::Fallback),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    pub loader: LoaderConfig,
    pub fallback_on_error: bool,
    pub aggregation: AggregationMode,
    pub initial_types: Vec<TypeName>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            loader: LoaderConfig::default(),
            fallback_on_error: true,
            aggregation: AggregationMode::Product,
            initial_types: Vec::new(),
        }
    }
}

pub fn default_cache_dir() -> PathBuf {
    dirs_next::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("typedex")
}

impl AppArgs {
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(default_cache_dir)
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.cache_dir().join("typedex.log"))
    }

    pub fn settings(&self) -> AppSettings {
        let source = if self.offline {
            SourceMode::Static
        } else {
            SourceMode::Remote {
                base_url: self.api_base.clone(),
            }
        };
        let cache = (!self.no_cache).then(|| CacheConfig {
            dir: self.cache_dir(),
            ttl: ttl_from_hours(self.cache_ttl_hours),
        });
        let aggregation = if self.legacy_union {
            AggregationMode::LegacyUnion
        } else {
            AggregationMode::Product
        };
        AppSettings {
            loader: LoaderConfig {
                source,
                timeout: Duration::from_secs(self.timeout_secs.max(1)),
                cache,
            },
            fallback_on_error: !self.no_fallback,
            aggregation,
            initial_types: self.types.clone(),
        }
    }
}

fn ttl_from_hours(hours: u64) -> Duration {
    if hours == 24 {
        DEFAULT_TTL
    } else {
        Duration::from_secs(hours.saturating_mul(60 * 60))
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        app: AppArgs,
    }

    fn parse(args: &[&str]) -> AppArgs {
        let mut argv = vec!["typedex"];
        argv.extend_from_slice(args);
        TestCli::try_parse_from(argv).expect("valid args").app
    }

    #[test]
    fn defaults_use_remote_with_cache_and_fallback() {
        let args = parse(&["--cache-dir", "/tmp/typedex-test"]);
        let settings = args.settings();
        assert_eq!(
            settings.loader.source,
            SourceMode::Remote {
                base_url: API_BASE.to_string()
            }
        );
        assert_eq!(settings.loader.timeout, DEFAULT_TIMEOUT);
        assert_eq!(
            settings.loader.cache,
            Some(CacheConfig {
                dir: PathBuf::from("/tmp/typedex-test"),
                ttl: DEFAULT_TTL,
            })
        );
        assert!(settings.fallback_on_error);
        assert_eq!(settings.aggregation, AggregationMode::Product);
        assert_eq!(args.log_level, log::LevelFilter::Info);
        assert_eq!(args.log_file(), PathBuf::from("/tmp/typedex-test/typedex.log"));
    }

    #[test]
    fn flags_map_onto_settings() {
        let args = parse(&[
            "--offline",
            "--no-cache",
            "--no-fallback",
            "--legacy-union",
            "--timeout-secs",
            "3",
            "--types",
            "Fire,flying",
            "--log-level",
            "debug",
        ]);
        let settings = args.settings();
        assert_eq!(settings.loader.source, SourceMode::Static);
        assert_eq!(settings.loader.cache, None);
        assert_eq!(settings.loader.timeout, Duration::from_secs(3));
        assert!(!settings.fallback_on_error);
        assert_eq!(settings.aggregation, AggregationMode::LegacyUnion);
        assert_eq!(settings.initial_types, vec![TypeName::Fire, TypeName::Flying]);
        assert_eq!(args.log_level, log::LevelFilter::Debug);
    }

    #[test]
    fn unknown_type_is_rejected_at_parse_time() {
        let result = TestCli::try_parse_from(["typedex", "--types", "fire,wind"]);
        assert!(result.is_err());
    }

    #[test]
    fn static_mode_builds_fallback_origin() {
        let (_, origin) = LoaderConfig::offline().build_source();
        assert_eq!(origin, CatalogOrigin::Fallback);
        let (_, origin) = LoaderConfig::default().build_source();
        assert_eq!(origin, CatalogOrigin::Remote);
    }
}
