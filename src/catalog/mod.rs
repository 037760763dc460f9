//! Topic catalogs keyed by technology.
//!
//! Catalogs come from TOML documents, either embedded (see [`builtin`]) or
//! read from a directory. A catalog may derive its topics from another one by
//! category, which is how `sql` and `mongodb` are cut out of `databases`.
//! Once built, the registry is read-only and hands out `Arc<CatalogEntry>`.
//!
//! ```toml
//! key = "sql"
//! title = "SQL"
//! description = "Relational databases, queries, joins, and transactions"
//! parent = "databases"
//!
//! [derive]
//! from = "databases"
//! category = "SQL"
//! ```

pub mod builtin;
mod error;
mod route;

pub use builtin::DEFAULT_CATALOG_KEY;
pub use error::{CatalogError, CatalogResult, RouteError};
pub use route::TopicRoute;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use crate::config::CatalogsConfig;
use crate::types::Topic;

/// Catalog document as written on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub key: String,
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derive: Option<DeriveSpec>,

    #[serde(default)]
    pub topics: Vec<Topic>,
}

/// Take the topics of catalog `from` whose category equals `category`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeriveSpec {
    pub from: String,
    pub category: String,
}

impl CatalogFile {
    pub fn parse(origin: &str, source: &str) -> CatalogResult<Self> {
        toml::from_str(source).map_err(|e| CatalogError::Parse {
            origin: origin.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn read(path: &Path) -> CatalogResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&path.display().to_string(), &source)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentRef {
    pub key: String,
    pub title: String,
}

/// One resolved catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub key: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentRef>,
    pub topics: Vec<Topic>,
}

impl CatalogEntry {
    pub fn route(&self) -> TopicRoute {
        match &self.parent {
            Some(parent) => TopicRoute {
                category: Some(parent.key.clone()),
                subcategory: Some(self.key.clone()),
            },
            None => TopicRoute::for_key(self.key.clone()),
        }
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

/// Read-only set of catalogs with a fallback default.
#[derive(Debug, Clone)]
pub struct CatalogRegistry {
    entries: IndexMap<String, Arc<CatalogEntry>>,
    default_key: String,
}

impl CatalogRegistry {
    /// Registry of the embedded catalogs.
    pub fn builtin() -> CatalogResult<Self> {
        Self::from_files(builtin_files()?, DEFAULT_CATALOG_KEY)
    }

    /// Registry as configured: built-ins (unless disabled) overlaid with
    /// every `*.toml` file of `config.dir`. A file replaces a built-in with
    /// the same key.
    pub fn from_config(config: &CatalogsConfig) -> CatalogResult<Self> {
        let mut files = if config.include_builtin {
            builtin_files()?
        } else {
            Vec::new()
        };
        if let Some(dir) = &config.dir {
            files.extend(read_dir(dir)?);
        }
        Self::from_files(files, &config.default_key)
    }

    /// Build and validate a registry. Later files win over earlier ones
    /// with the same key but keep the earlier position.
    pub fn from_files(files: Vec<CatalogFile>, default_key: &str) -> CatalogResult<Self> {
        if files.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut declared: IndexMap<String, CatalogFile> = IndexMap::new();
        for file in files {
            if declared.contains_key(&file.key) {
                crate::debug_event!("catalog", "override", "{}", file.key);
            }
            declared.insert(file.key.clone(), file);
        }

        let mut entries = IndexMap::with_capacity(declared.len());
        for (key, file) in &declared {
            let mut topics = Vec::new();
            if let Some(derive) = &file.derive {
                let source = declared
                    .get(&derive.from)
                    .filter(|source| source.derive.is_none())
                    .ok_or_else(|| CatalogError::UnknownDeriveSource {
                        catalog: key.clone(),
                        source_key: derive.from.clone(),
                    })?;
                topics.extend(
                    source
                        .topics
                        .iter()
                        .filter(|t| t.category == derive.category)
                        .cloned(),
                );
            }
            topics.extend(file.topics.iter().cloned());
            validate_topics(key, &topics)?;

            let parent = match &file.parent {
                Some(parent_key) => {
                    let parent =
                        declared
                            .get(parent_key)
                            .ok_or_else(|| CatalogError::UnknownParent {
                                catalog: key.clone(),
                                parent: parent_key.clone(),
                            })?;
                    Some(ParentRef {
                        key: parent.key.clone(),
                        title: parent.title.clone(),
                    })
                }
                None => None,
            };

            entries.insert(
                key.clone(),
                Arc::new(CatalogEntry {
                    key: key.clone(),
                    title: file.title.clone(),
                    description: file.description.clone(),
                    parent,
                    topics,
                }),
            );
        }

        if !entries.contains_key(default_key) {
            return Err(CatalogError::UnknownDefault(default_key.to_string()));
        }

        crate::debug_event!(
            "catalog",
            "loaded",
            "{} catalogs, default={default_key}",
            entries.len()
        );
        Ok(Self {
            entries,
            default_key: default_key.to_string(),
        })
    }

    pub fn get(&self, key: &str) -> Option<&Arc<CatalogEntry>> {
        self.entries.get(key)
    }

    pub fn default_key(&self) -> &str {
        &self.default_key
    }

    pub fn default_entry(&self) -> &Arc<CatalogEntry> {
        // Presence checked in `from_files`.
        &self.entries[self.default_key.as_str()]
    }

    /// Catalog for `key`, falling back to the default for missing or unknown keys.
    pub fn resolve(&self, key: Option<&str>) -> &Arc<CatalogEntry> {
        match key {
            Some(key) => match self.entries.get(key) {
                Some(entry) => entry,
                None => {
                    crate::debug_event!(
                        "catalog",
                        "fallback",
                        "unknown key '{key}', using '{}'",
                        self.default_key
                    );
                    self.default_entry()
                }
            },
            None => self.default_entry(),
        }
    }

    pub fn resolve_route(&self, route: &TopicRoute) -> &Arc<CatalogEntry> {
        self.resolve(route.key())
    }

    /// Resolve a user-supplied target: a route path (leading `/`) or a bare key.
    pub fn resolve_target(&self, target: &str) -> Result<&Arc<CatalogEntry>, RouteError> {
        if target.starts_with('/') {
            let route = TopicRoute::parse(target)?;
            Ok(self.resolve_route(&route))
        } else {
            Ok(self.resolve(Some(target.trim()).filter(|k| !k.is_empty())))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<CatalogEntry>> {
        self.entries.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn builtin_files() -> CatalogResult<Vec<CatalogFile>> {
    builtin::BUILTIN_CATALOGS
        .iter()
        .map(|(origin, source)| CatalogFile::parse(origin, source))
        .collect()
}

/// Read every `*.toml` file in `dir`, sorted by file name.
pub fn read_dir(dir: &Path) -> CatalogResult<Vec<CatalogFile>> {
    let io_err = |source| CatalogError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "toml") {
            paths.push(path);
        }
    }
    paths.sort();

    paths.iter().map(|path| CatalogFile::read(path)).collect()
}

fn validate_topics(catalog: &str, topics: &[Topic]) -> CatalogResult<()> {
    let mut seen = HashSet::with_capacity(topics.len());
    for topic in topics {
        if topic.id.is_empty() {
            return Err(CatalogError::EmptyTopicId {
                catalog: catalog.to_string(),
            });
        }
        if !seen.insert(topic.id.as_str()) {
            return Err(CatalogError::DuplicateTopicId {
                catalog: catalog.to_string(),
                id: topic.id.to_string(),
            });
        }
    }
    Ok(())
}
