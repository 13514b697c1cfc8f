//! One poll of the Steam directories per call, turning staging folder sizes,
//! manifests and content-log hints into `DownloadRecord`s.
//!
//! The monitor owns the estimator and is the only holder of observation
//! state; nothing is global and nothing outlives the process.

use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::EstimatorConfig;
use crate::content_log::{self, LogHint};
use crate::estimator::SpeedEstimator;
use crate::library;
use crate::manifest::{self, AppManifest};
use crate::record::{
    fallback_name, AppId, DownloadRecord, DownloadStatus, ItemSummary, SpeedSample,
};
use crate::staging::{self, StagingItem};

#[derive(Debug)]
pub struct Monitor {
    root: PathBuf,
    libraries: Vec<PathBuf>,
    estimator: SpeedEstimator,
    names: HashMap<AppId, String>,
    /// Apps whose staging folder was present on the last poll, with their library.
    tracked: BTreeMap<AppId, PathBuf>,
    log_tail_lines: usize,
}

impl Monitor {
    pub fn new(root: PathBuf, libraries: Vec<PathBuf>, cfg: &EstimatorConfig) -> Self {
        Self {
            root,
            libraries,
            estimator: SpeedEstimator::new(cfg),
            names: HashMap::new(),
            tracked: BTreeMap::new(),
            log_tail_lines: content_log::DEFAULT_TAIL_LINES,
        }
    }

    /// Monitor for `root` and every library listed in its `libraryfolders.vdf`.
    pub fn open(root: PathBuf, cfg: &EstimatorConfig) -> Self {
        let libraries = library::library_roots(&root);
        tracing::info!("monitoring {} steam libraries under {}", libraries.len(), root.display());
        Self::new(root, libraries, cfg)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn libraries(&self) -> &[PathBuf] {
        &self.libraries
    }

    pub fn estimator(&self) -> &SpeedEstimator {
        &self.estimator
    }

    /// Sample every staging folder at `now` and build this tick's records.
    ///
    /// Apps that had a staging folder on the previous poll but not on this one
    /// get one last record (`Completed` if the manifest is fully downloaded,
    /// otherwise `Idle`) and are then dropped from tracking.
    pub fn poll(&mut self, now: Instant) -> Vec<DownloadRecord> {
        let items = staging::list_staging(&self.libraries);
        self.poll_items(now, &items)
    }

    /// `poll` over an already listed set of staging folders.
    ///
    /// A folder that is gone by the time it is measured counts as absent, so
    /// it is reported through the vanished path once at most.
    pub fn poll_items(&mut self, now: Instant, items: &[StagingItem]) -> Vec<DownloadRecord> {
        let hints: HashMap<AppId, LogHint> =
            content_log::scan_content_log(&self.root, self.log_tail_lines)
                .into_iter()
                .map(|h| (h.app_id, h))
                .collect();

        let mut records = Vec::with_capacity(items.len());
        let mut present: BTreeMap<AppId, PathBuf> = BTreeMap::new();

        for item in items {
            if present.contains_key(&item.app_id) {
                tracing::debug!(
                    "app {} also staged in {}, using the first library",
                    item.app_id,
                    item.library.display()
                );
                continue;
            }

            let sample = match staging::directory_size(&item.path) {
                Ok(bytes) => self.estimator.observe(item.app_id, now, bytes),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    tracing::debug!("{} removed before it was measured", item.path.display());
                    continue;
                }
                Err(e) => {
                    tracing::warn!("could not measure {}: {}", item.path.display(), e);
                    self.estimator.mark_gone(item.app_id, DownloadStatus::Idle)
                }
            };
            present.insert(item.app_id, item.library.clone());
            let manifest = self.load_manifest(&item.library, item.app_id);
            records.push(self.build_record(
                item.app_id,
                &item.library,
                sample,
                manifest.as_ref(),
                hints.get(&item.app_id),
            ));
        }

        let vanished: Vec<(AppId, PathBuf)> = self
            .tracked
            .iter()
            .filter(|(id, _)| !present.contains_key(*id))
            .map(|(id, lib)| (*id, lib.clone()))
            .collect();
        for (app_id, library) in vanished {
            let manifest = self.load_manifest(&library, app_id);
            let status = if manifest.as_ref().is_some_and(AppManifest::is_fully_downloaded) {
                DownloadStatus::Completed
            } else {
                DownloadStatus::Idle
            };
            tracing::info!(app_id, %status, "staging folder gone");
            let sample = self.estimator.mark_gone(app_id, status);
            records.push(self.build_record(app_id, &library, sample, manifest.as_ref(), None));
        }

        self.tracked = present;
        records
    }

    /// Display name: manifest name if one was ever read, else `App <id>`.
    pub fn name(&self, app_id: AppId) -> String {
        self.names
            .get(&app_id)
            .cloned()
            .unwrap_or_else(|| fallback_name(app_id))
    }

    /// Last sample and retained-history statistics for every app seen.
    pub fn summary(&self) -> Vec<ItemSummary> {
        self.estimator
            .app_ids()
            .into_iter()
            .filter_map(|app_id| {
                let last = self.estimator.last(app_id)?;
                Some(ItemSummary {
                    app_id,
                    name: self.name(app_id),
                    last,
                    stats: self.estimator.stats(app_id),
                })
            })
            .collect()
    }

    fn load_manifest(&mut self, library: &Path, app_id: AppId) -> Option<AppManifest> {
        match manifest::find_manifest(&self.libraries, library, app_id) {
            Ok(Some(m)) => {
                self.names.insert(app_id, m.name.clone());
                Some(m)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("{}", e);
                None
            }
        }
    }

    fn build_record(
        &self,
        app_id: AppId,
        library: &Path,
        sample: SpeedSample,
        manifest: Option<&AppManifest>,
        hint: Option<&LogHint>,
    ) -> DownloadRecord {
        let progress = manifest
            .and_then(AppManifest::progress)
            .or_else(|| hint.and_then(|h| h.progress));
        DownloadRecord {
            app_id,
            name: self.name(app_id),
            status: sample.status,
            bytes_per_sec: sample.bytes_per_sec,
            progress,
            bytes_downloaded: manifest.and_then(|m| m.bytes_downloaded),
            bytes_total: manifest.and_then(AppManifest::bytes_total),
            reported_bytes_per_sec: hint.and_then(|h| h.bytes_per_sec),
            library: library.to_path_buf(),
        }
    }
}
