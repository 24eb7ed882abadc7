//! Process-wide texture cache

use async_trait::async_trait;
use futures_util::future::join_all;
use image::RgbaImage;
use parking_lot::RwLock;
use roomtint_core::{Error, Result};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

/// Source of texture images
#[async_trait]
pub trait AssetLoader: Send + Sync {
    async fn load(&self, reference: &str) -> Result<RgbaImage>;
}

/// Loads texture references relative to a root directory
#[derive(Debug, Clone)]
pub struct FsAssetLoader {
    root: PathBuf,
}

impl FsAssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a reference such as `/textures/brick.png` under the root
    pub fn resolve(&self, reference: &str) -> Result<PathBuf> {
        let relative = Path::new(reference.trim_start_matches('/'));
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if reference.trim().is_empty() || !safe {
            return Err(Error::AssetLoadFailure {
                reference: reference.to_string(),
                reason: "reference must stay inside the texture root".to_string(),
            });
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl AssetLoader for FsAssetLoader {
    async fn load(&self, reference: &str) -> Result<RgbaImage> {
        let path = self.resolve(reference)?;
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| Error::AssetLoadFailure {
                reference: reference.to_string(),
                reason: format!("{}: {}", path.display(), e),
            })?;
        let image = image::load_from_memory(&bytes).map_err(|e| Error::AssetLoadFailure {
            reference: reference.to_string(),
            reason: e.to_string(),
        })?;
        Ok(image.to_rgba8())
    }
}

/// Result of a cache lookup
#[derive(Debug, Clone)]
pub enum AssetLookup {
    Image(Arc<RgbaImage>),
    Missing,
}

impl AssetLookup {
    pub fn is_missing(&self) -> bool {
        matches!(self, AssetLookup::Missing)
    }
}

#[derive(Debug, Clone)]
enum AssetEntry {
    Loaded(Arc<RgbaImage>),
    Failed(String),
}

/// Outcome of one preload call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreloadReport {
    pub loaded: usize,
    pub failed: usize,
    /// References already cached (or already failed) before this call
    pub skipped: usize,
}

/// Decoded textures keyed by reference, shared read-only
#[derive(Debug, Default)]
pub struct AssetCache {
    entries: RwLock<HashMap<String, AssetEntry>>,
}

static GLOBAL_CACHE: OnceLock<Arc<AssetCache>> = OnceLock::new();

impl AssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache shared by the whole process
    pub fn global() -> Arc<AssetCache> {
        GLOBAL_CACHE
            .get_or_init(|| Arc::new(AssetCache::new()))
            .clone()
    }

    /// Load every reference not attempted yet. Failures are recorded and
    /// logged, never returned: the affected materials render as placeholders.
    pub async fn preload<L>(&self, references: &[String], loader: &L) -> PreloadReport
    where
        L: AssetLoader + ?Sized,
    {
        let mut pending: Vec<&str> = Vec::new();
        let mut report = PreloadReport::default();
        {
            let entries = self.entries.read();
            for reference in references {
                if entries.contains_key(reference) || pending.contains(&reference.as_str()) {
                    report.skipped += 1;
                } else {
                    pending.push(reference.as_str());
                }
            }
        }

        let results = join_all(pending.iter().map(|r| loader.load(r))).await;

        let mut entries = self.entries.write();
        for (reference, result) in pending.into_iter().zip(results) {
            match result {
                Ok(image) => {
                    debug!("Loaded texture '{}' ({}x{})", reference, image.width(), image.height());
                    entries.insert(reference.to_string(), AssetEntry::Loaded(Arc::new(image)));
                    report.loaded += 1;
                }
                Err(e) => {
                    warn!("{}", e);
                    entries.insert(reference.to_string(), AssetEntry::Failed(e.to_string()));
                    report.failed += 1;
                }
            }
        }

        info!(
            "Texture preload: {} loaded, {} failed, {} already cached",
            report.loaded, report.failed, report.skipped
        );
        report
    }

    pub fn insert(&self, reference: impl Into<String>, image: RgbaImage) {
        self.entries
            .write()
            .insert(reference.into(), AssetEntry::Loaded(Arc::new(image)));
    }

    pub fn lookup(&self, reference: &str) -> AssetLookup {
        match self.entries.read().get(reference) {
            Some(AssetEntry::Loaded(image)) => AssetLookup::Image(image.clone()),
            Some(AssetEntry::Failed(_)) | None => AssetLookup::Missing,
        }
    }

    /// References that failed to load, with the reason
    pub fn failures(&self) -> Vec<(String, String)> {
        let mut failures: Vec<(String, String)> = self
            .entries
            .read()
            .iter()
            .filter_map(|(r, e)| match e {
                AssetEntry::Failed(reason) => Some((r.clone(), reason.clone())),
                AssetEntry::Loaded(_) => None,
            })
            .collect();
        failures.sort();
        failures
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
