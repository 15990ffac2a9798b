//! File watcher for store and config hot reload.
//!
//! Watches a single file for changes made by other processes and reports them
//! through a channel. Uses debouncing to avoid bursts of events while an
//! editor or another tabtree view is saving.

use anyhow::{Context, Result};
use notify::{Config as NotifyConfig, Event, PollWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::{Duration, Instant};

/// Event indicating the watched file has changed on disk.
#[derive(Debug, Clone)]
pub struct FileChangeEvent {
    /// Path to the file that changed.
    pub path: PathBuf,
}

/// Watches one file and sends change events.
pub struct FileWatcher {
    /// The file system watcher (kept alive to maintain watching).
    _watcher: Box<dyn Watcher + Send>,
    /// Receiver for change events.
    event_receiver: Receiver<FileChangeEvent>,
}

impl std::fmt::Debug for FileWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWatcher").finish_non_exhaustive()
    }
}

/// Debounce bookkeeping shared by the handler and its flush thread.
#[derive(Debug, Default)]
struct DebounceState {
    last_event: Option<Instant>,
    flush_pending: bool,
}

/// Build the shared event-handler closure used by both watcher backends.
///
/// Filters events to `filename` and debounces on the trailing edge: a
/// `FileChangeEvent` is sent once no matching event has arrived for
/// `debounce_delay`, so the last write of a burst is always reported.
fn make_event_handler(
    filename: OsString,
    canonical_path: PathBuf,
    debounce_delay: Duration,
    tx: Sender<FileChangeEvent>,
    state: Arc<Mutex<DebounceState>>,
) -> impl Fn(std::result::Result<Event, notify::Error>) + Send + 'static {
    move |result: std::result::Result<Event, notify::Error>| {
        let Ok(event) = result else {
            return;
        };

        // Create covers atomic saves (write temp file, rename over target)
        if !matches!(
            event.kind,
            notify::EventKind::Modify(_) | notify::EventKind::Create(_)
        ) {
            return;
        }

        let matches_file = event
            .paths
            .iter()
            .any(|p| p.file_name().map(|f| f == filename).unwrap_or(false));
        if !matches_file {
            return;
        }

        let schedule_flush = {
            let mut debounce = state.lock();
            debounce.last_event = Some(Instant::now());
            if debounce.flush_pending {
                log::trace!("Debouncing file change event");
                false
            } else {
                debounce.flush_pending = true;
                true
            }
        };

        if schedule_flush {
            spawn_flush(
                canonical_path.clone(),
                debounce_delay,
                tx.clone(),
                Arc::clone(&state),
            );
        }
    }
}

/// Wait until the watched file has been quiet for `debounce_delay`, then send one event.
fn spawn_flush(
    path: PathBuf,
    debounce_delay: Duration,
    tx: Sender<FileChangeEvent>,
    state: Arc<Mutex<DebounceState>>,
) {
    let flush_state = Arc::clone(&state);
    let spawned = std::thread::Builder::new()
        .name("tabtree-watch-debounce".to_string())
        .spawn(move || {
            loop {
                let remaining = {
                    let mut debounce = flush_state.lock();
                    let quiet_at = debounce
                        .last_event
                        .map_or_else(Instant::now, |last| last + debounce_delay);
                    let now = Instant::now();
                    if now >= quiet_at {
                        debounce.flush_pending = false;
                        None
                    } else {
                        Some(quiet_at - now)
                    }
                };
                match remaining {
                    Some(wait) => std::thread::sleep(wait),
                    None => break,
                }
            }

            log::info!("Watched file changed: {}", path.display());
            if let Err(e) = tx.send(FileChangeEvent { path }) {
                log::error!("Failed to send file change event: {}", e);
            }
        });

    if let Err(e) = spawned {
        log::error!("Failed to start watcher debounce thread: {}", e);
        state.lock().flush_pending = false;
    }
}

impl FileWatcher {
    /// Create a new watcher for `path`.
    ///
    /// Tries the platform's native watcher first and falls back to a
    /// `PollWatcher` checking every 500 ms when the native backend is
    /// unavailable (containers, network filesystems).
    ///
    /// # Errors
    /// Returns an error if the file doesn't exist or watching fails on both backends.
    pub fn new(path: &Path, debounce_delay_ms: u64) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Watched file not found: {}", path.display());
        }

        let canonical = path
            .canonicalize()
            .unwrap_or_else(|_| path.to_path_buf());

        let filename = canonical
            .file_name()
            .context("Watched path has no filename")?
            .to_os_string();

        let parent_dir = canonical
            .parent()
            .context("Watched path has no parent directory")?
            .to_path_buf();

        let (tx, rx) = channel::<FileChangeEvent>();
        let debounce_delay = Duration::from_millis(debounce_delay_ms);
        let state = Arc::new(Mutex::new(DebounceState::default()));

        let mut watcher =
            Self::create_watcher(filename, canonical.clone(), debounce_delay, tx, state)?;

        watcher
            .watch(&parent_dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch directory: {}", parent_dir.display()))?;

        log::info!("Hot reload: watching {}", canonical.display());

        Ok(Self {
            _watcher: watcher,
            event_receiver: rx,
        })
    }

    fn create_watcher(
        filename: OsString,
        canonical_path: PathBuf,
        debounce_delay: Duration,
        tx: Sender<FileChangeEvent>,
        state: Arc<Mutex<DebounceState>>,
    ) -> Result<Box<dyn Watcher + Send>> {
        let handler = make_event_handler(
            filename.clone(),
            canonical_path.clone(),
            debounce_delay,
            tx.clone(),
            Arc::clone(&state),
        );

        match notify::recommended_watcher(handler) {
            Ok(w) => {
                log::debug!("File watcher: using native (RecommendedWatcher) backend");
                Ok(Box::new(w))
            }
            Err(e) => {
                log::warn!(
                    "File watcher: native backend unavailable ({}); falling back to PollWatcher",
                    e
                );
                let fallback_handler = make_event_handler(
                    filename,
                    canonical_path,
                    debounce_delay,
                    tx,
                    state,
                );
                let poll_watcher = PollWatcher::new(
                    fallback_handler,
                    NotifyConfig::default().with_poll_interval(Duration::from_millis(500)),
                )
                .context("Failed to create fallback PollWatcher")?;
                Ok(Box::new(poll_watcher))
            }
        }
    }

    /// Check for a pending change event (non-blocking).
    pub fn try_recv(&self) -> Option<FileChangeEvent> {
        self.event_receiver.try_recv().ok()
    }

    /// Wait up to `timeout` for the next change event.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<FileChangeEvent> {
        self.event_receiver.recv_timeout(timeout).ok()
    }
}
