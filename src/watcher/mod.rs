//! Debounced directory watching for re-conversion.
//!
//! Uses notify crate for cross-platform file system events.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use anyhow::Result;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, warn};

use crate::scan;

/// How long the run loop blocks on the event channel between debounce
/// checks.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Watches the input root recursively and emits debounced per-file change
/// notifications.
///
/// Each markdown path debounces independently: rapid edits to one file
/// collapse into a single notification while edits to other files keep
/// their own quiet periods. Dotfile paths and non-markdown files are
/// ignored entirely.
pub struct WatchController {
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    input_root: PathBuf,
    debounce: Duration,
    pending: HashMap<PathBuf, Instant>,
}

impl WatchController {
    /// Create a recursive watcher over `input_root`.
    ///
    /// # Errors
    /// Returns an error if the file watcher cannot be created or the root
    /// cannot be watched.
    pub fn new(input_root: impl AsRef<Path>, debounce: Duration) -> notify::Result<Self> {
        // Canonicalize so event paths from the OS (which are always
        // absolute and canonical) match our stored root.
        let input_root = input_root
            .as_ref()
            .canonicalize()
            .unwrap_or_else(|_| input_root.as_ref().to_path_buf());

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;
        watcher.watch(&input_root, RecursiveMode::Recursive)?;

        Ok(Self {
            _watcher: watcher,
            rx,
            input_root,
            debounce,
            pending: HashMap::new(),
        })
    }

    /// The canonical root being watched.
    pub fn input_root(&self) -> &Path {
        &self.input_root
    }

    /// Record a filesystem event, starting or restarting the quiet period
    /// for each relevant path it names.
    fn note_event(&mut self, event: &Event) {
        if !matches!(
            event.kind,
            EventKind::Any | EventKind::Create(_) | EventKind::Modify(_)
        ) {
            return;
        }
        for path in &event.paths {
            if !scan::is_markdown(path) || self.is_hidden(path) {
                debug!("Ignoring event for {}", path.display());
                continue;
            }
            self.pending.insert(path.clone(), Instant::now());
        }
    }

    /// True if any path component below the input root starts with a dot.
    fn is_hidden(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.input_root).unwrap_or(path);
        relative.components().any(|component| {
            component
                .as_os_str()
                .to_str()
                .is_some_and(|name| name.starts_with('.'))
        })
    }

    /// Drain queued events and return every path whose quiet period has
    /// elapsed, removing it from the pending set.
    pub fn take_ready(&mut self) -> Vec<PathBuf> {
        while let Ok(result) = self.rx.try_recv() {
            match result {
                Ok(event) => self.note_event(&event),
                Err(err) => warn!("Watch error: {err}"),
            }
        }

        let now = Instant::now();
        let ready: Vec<PathBuf> = self
            .pending
            .iter()
            .filter(|(_, since)| now.duration_since(**since) >= self.debounce)
            .map(|(path, _)| path.clone())
            .collect();
        for path in &ready {
            self.pending.remove(path);
        }
        ready
    }

    /// Watch until `stop` is set, invoking `on_change` once per debounced
    /// file change.
    ///
    /// The loop is single-threaded: an in-flight `on_change` call always
    /// finishes before the stop flag is checked again, so shutdown waits
    /// for the current conversion.
    ///
    /// # Errors
    /// Propagates the first error returned by `on_change`.
    pub fn run(
        &mut self,
        stop: &AtomicBool,
        mut on_change: impl FnMut(&Path) -> Result<()>,
    ) -> Result<()> {
        while !stop.load(Ordering::SeqCst) {
            match self.rx.recv_timeout(POLL_INTERVAL) {
                Ok(Ok(event)) => self.note_event(&event),
                Ok(Err(err)) => warn!("Watch error: {err}"),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            for path in self.take_ready() {
                on_change(&path)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, EventAttributes, ModifyKind};
    use tempfile::tempdir;

    fn modify_event(path: PathBuf) -> Event {
        Event {
            kind: EventKind::Modify(ModifyKind::Any),
            paths: vec![path],
            attrs: EventAttributes::new(),
        }
    }

    fn controller(root: &Path, debounce: Duration) -> WatchController {
        WatchController::new(root, debounce).expect("watcher")
    }

    #[test]
    fn test_burst_of_events_collapses_to_one_notification() {
        let dir = tempdir().expect("tempdir");
        let mut watcher = controller(dir.path(), Duration::from_millis(20));
        let path = watcher.input_root().join("a.md");

        for _ in 0..3 {
            watcher.note_event(&modify_event(path.clone()));
        }
        assert!(watcher.take_ready().is_empty(), "quiet period not elapsed yet");

        std::thread::sleep(Duration::from_millis(40));
        assert_eq!(watcher.take_ready(), vec![path]);
        assert!(watcher.take_ready().is_empty(), "already taken");
    }

    #[test]
    fn test_distinct_files_debounce_independently() {
        let dir = tempdir().expect("tempdir");
        let mut watcher = controller(dir.path(), Duration::from_millis(20));
        let first = watcher.input_root().join("a.md");
        let second = watcher.input_root().join("sub").join("b.md");

        watcher.note_event(&modify_event(first.clone()));
        watcher.note_event(&modify_event(second.clone()));

        std::thread::sleep(Duration::from_millis(40));
        let mut ready = watcher.take_ready();
        ready.sort();
        let mut expected = vec![first, second];
        expected.sort();
        assert_eq!(ready, expected);
    }

    #[test]
    fn test_renewed_event_restarts_the_quiet_period() {
        let dir = tempdir().expect("tempdir");
        let mut watcher = controller(dir.path(), Duration::from_millis(60));
        let path = watcher.input_root().join("a.md");

        watcher.note_event(&modify_event(path.clone()));
        std::thread::sleep(Duration::from_millis(40));
        watcher.note_event(&modify_event(path.clone()));
        assert!(
            watcher.take_ready().is_empty(),
            "second event should have restarted the quiet period"
        );
    }

    #[test]
    fn test_non_markdown_events_are_ignored() {
        let dir = tempdir().expect("tempdir");
        let mut watcher = controller(dir.path(), Duration::from_millis(1));
        watcher.note_event(&modify_event(watcher.input_root().join("image.png")));

        std::thread::sleep(Duration::from_millis(10));
        assert!(watcher.take_ready().is_empty());
    }

    #[test]
    fn test_dotfile_events_are_ignored() {
        let dir = tempdir().expect("tempdir");
        let mut watcher = controller(dir.path(), Duration::from_millis(1));
        watcher.note_event(&modify_event(watcher.input_root().join(".draft.md")));
        watcher.note_event(&modify_event(
            watcher.input_root().join(".hidden").join("inner.md"),
        ));

        std::thread::sleep(Duration::from_millis(10));
        assert!(watcher.take_ready().is_empty());
    }

    #[test]
    fn test_create_events_count_as_changes() {
        let dir = tempdir().expect("tempdir");
        let mut watcher = controller(dir.path(), Duration::from_millis(1));
        let path = watcher.input_root().join("new.md");
        watcher.note_event(&Event {
            kind: EventKind::Create(CreateKind::File),
            paths: vec![path.clone()],
            attrs: EventAttributes::new(),
        });

        std::thread::sleep(Duration::from_millis(10));
        assert_eq!(watcher.take_ready(), vec![path]);
    }

    #[test]
    fn test_run_returns_when_stop_is_set() {
        let dir = tempdir().expect("tempdir");
        let mut watcher = controller(dir.path(), Duration::from_millis(1));
        let stop = AtomicBool::new(true);
        watcher
            .run(&stop, |_| panic!("no changes expected"))
            .expect("run");
    }

    #[test]
    fn test_real_file_modification_detected() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("watched.md");
        std::fs::write(&path, "original").expect("write");

        let mut watcher = controller(dir.path(), Duration::from_millis(50));

        // Give the backend time to register the watch
        std::thread::sleep(Duration::from_millis(500));
        std::fs::write(&path, "modified").expect("write");

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut detected = false;
        while Instant::now() < deadline {
            if !watcher.take_ready().is_empty() {
                detected = true;
                break;
            }
            std::thread::sleep(Duration::from_millis(50));
        }

        assert!(detected, "watcher should detect a real modification within 5 seconds");
    }
}
