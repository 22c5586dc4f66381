//! Background change detection
//!
//! [`ChangeMonitor`] polls the watched files on its own thread and sends a
//! [`ChangeEvent`] over a channel whenever the watched file set changes or a
//! file's modification time is newer than the last scan. Every poll holds
//! the [`SessionLock`], so polling is suspended while a mutation runs.

use crate::session::{SessionLock, resource_sources};
use crate::settings::Settings;
use crate::Result;
use iconreg_fs::{NormalizedPath, PluginLayout};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime};

/// Modification time per watched file
pub type Fingerprint = BTreeMap<PathBuf, SystemTime>;

/// Files and directories to watch
#[derive(Debug, Clone, Default)]
pub struct WatchSet {
    /// Flat directories; only files with `extension` count
    pub dirs: Vec<NormalizedPath>,
    pub extension: String,
    /// Individual files (artifacts, configs)
    pub files: Vec<NormalizedPath>,
}

impl WatchSet {
    /// Resource directories plus every artifact of `layout`.
    pub fn for_layout(layout: &PluginLayout, settings: &Settings) -> Self {
        Self {
            dirs: resource_sources(layout, settings)
                .into_iter()
                .map(|(dir, _)| dir)
                .collect(),
            extension: settings.icon_extension.clone(),
            files: layout.artifact_files(),
        }
    }

    /// Stat everything currently present. Unreadable entries are absent.
    pub fn fingerprint(&self) -> Fingerprint {
        let mut found = Fingerprint::new();

        for dir in &self.dirs {
            let Ok(entries) = fs::read_dir(dir.to_native()) else {
                continue;
            };
            for entry in entries.filter_map(|e| e.ok()) {
                let path = entry.path();
                let matches = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case(&self.extension));
                if matches && let Ok(modified) = entry.metadata().and_then(|m| m.modified()) {
                    found.insert(path, modified);
                }
            }
        }

        for file in &self.files {
            let native = file.to_native();
            if let Ok(modified) = fs::metadata(&native).and_then(|m| m.modified()) {
                found.insert(native, modified);
            }
        }

        found
    }
}

/// What changed since the last scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeEvent {
    pub added: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
    pub modified: Vec<PathBuf>,
}

impl ChangeEvent {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }
}

/// Compare `current` with the `previous` file set and the time of the last
/// scan. `None` when nothing changed.
///
/// A file is modified when its mtime is newer than `last_scan`; equal is
/// unchanged. Added and removed are relative to `previous`.
pub fn detect_changes(
    previous: &Fingerprint,
    current: &Fingerprint,
    last_scan: SystemTime,
) -> Option<ChangeEvent> {
    let mut event = ChangeEvent::default();

    for (path, modified) in current {
        if !previous.contains_key(path) {
            event.added.push(path.clone());
        } else if *modified > last_scan {
            event.modified.push(path.clone());
        }
    }
    event.removed = previous
        .keys()
        .filter(|path| !current.contains_key(*path))
        .cloned()
        .collect();

    (!event.is_empty()).then_some(event)
}

/// Handle to the polling thread; stops it on drop.
pub struct ChangeMonitor {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
    events: Receiver<ChangeEvent>,
}

impl ChangeMonitor {
    /// Start polling `watch` every `interval`.
    ///
    /// `last_scan` is when the caller's state was captured: a file written
    /// after it is reported on the first poll, even if that happened before
    /// `spawn`. The file-set baseline is taken before this returns.
    pub fn spawn(
        watch: WatchSet,
        interval: Duration,
        lock: SessionLock,
        last_scan: SystemTime,
    ) -> Result<Self> {
        let (event_tx, events) = mpsc::channel();
        let (stop, stop_rx) = mpsc::channel::<()>();
        let baseline = {
            let _guard = lock.acquire();
            watch.fingerprint()
        };

        let handle = thread::Builder::new()
            .name("iconreg-monitor".into())
            .spawn(move || {
                poll_loop(watch, interval, lock, baseline, last_scan, event_tx, stop_rx)
            })?;

        tracing::debug!(interval_ms = interval.as_millis() as u64, "change monitor started");
        Ok(Self {
            stop: Some(stop),
            handle: Some(handle),
            events,
        })
    }

    pub fn events(&self) -> &Receiver<ChangeEvent> {
        &self.events
    }

    pub fn try_next(&self) -> Option<ChangeEvent> {
        self.events.try_recv().ok()
    }

    pub fn next_timeout(&self, timeout: Duration) -> Option<ChangeEvent> {
        self.events.recv_timeout(timeout).ok()
    }

    /// Stop polling and wait for the thread to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.take();
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::warn!("change monitor thread panicked");
        }
    }
}

impl Drop for ChangeMonitor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn poll_loop(
    watch: WatchSet,
    interval: Duration,
    lock: SessionLock,
    mut baseline: Fingerprint,
    mut last_scan: SystemTime,
    events: Sender<ChangeEvent>,
    stop: Receiver<()>,
) {
    loop {
        match stop.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {}
            // explicit stop or handle dropped
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }

        let (polled_at, current) = {
            let _guard = lock.acquire();
            (SystemTime::now(), watch.fingerprint())
        };
        if let Some(event) = detect_changes(&baseline, &current, last_scan) {
            tracing::info!(
                added = event.added.len(),
                removed = event.removed.len(),
                modified = event.modified.len(),
                "detected external changes"
            );
            if events.send(event).is_err() {
                break;
            }
            // receivers rescan on every event
            last_scan = polled_at;
        }
        baseline = current;
    }
    tracing::debug!("change monitor stopped");
}
