use crate::hot_reload::events::ConfigEvent;
use crate::{ConfigError, ConfigResult};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::mpsc;
use tokio::time::{interval, Instant};
use tracing::{debug, error, info, warn};

/// Changes reported closer together than this are folded into one event
const DEBOUNCE: Duration = Duration::from_millis(100);

type WatchedFiles = Arc<Mutex<HashMap<PathBuf, FileMetadata>>>;

/// Polling watcher for configuration file changes
pub struct FileWatcher {
    watched_files: WatchedFiles,
    event_sender: mpsc::UnboundedSender<ConfigEvent>,
    poll_interval: Duration,
    stop_sender: Option<mpsc::UnboundedSender<()>>,
}

/// Metadata about a watched file
#[derive(Debug, Clone)]
struct FileMetadata {
    last_modified: SystemTime,
    last_size: u64,
    last_change: Option<Instant>,
    /// Set once a missing file has been reported
    missing: bool,
}

impl FileWatcher {
    pub fn new(event_sender: mpsc::UnboundedSender<ConfigEvent>) -> Self {
        Self {
            watched_files: Arc::new(Mutex::new(HashMap::new())),
            event_sender,
            poll_interval: Duration::from_millis(250),
            stop_sender: None,
        }
    }

    pub fn set_poll_interval(&mut self, interval: Duration) {
        self.poll_interval = interval;
    }

    /// Start watching a file for changes
    pub fn watch_file<P: AsRef<Path>>(&mut self, path: P) -> ConfigResult<()> {
        let path = path.as_ref().to_path_buf();

        info!(path = %path.display(), "Starting to watch config file");

        let metadata = read_metadata(&path)?;
        self.watched_files.lock().insert(path.clone(), metadata);

        if let Err(e) = self.event_sender.send(ConfigEvent::watcher_started(path)) {
            warn!("Failed to send watcher started event: {}", e);
        }

        if !self.is_running() {
            self.start_polling();
        }

        Ok(())
    }

    /// Stop watching a specific file
    pub fn unwatch_file<P: AsRef<Path>>(&mut self, path: P) {
        let path = path.as_ref();
        info!(path = %path.display(), "Stopping watch for config file");

        let now_empty = {
            let mut files = self.watched_files.lock();
            files.remove(path);
            files.is_empty()
        };

        if now_empty {
            self.stop_polling();
        }
    }

    fn start_polling(&mut self) {
        debug!("Starting file watcher polling loop");

        let (stop_sender, mut stop_receiver) = mpsc::unbounded_channel();
        self.stop_sender = Some(stop_sender);

        let event_sender = self.event_sender.clone();
        let watched_files = Arc::clone(&self.watched_files);
        let poll_interval = self.poll_interval;

        tokio::spawn(async move {
            let mut ticker = interval(poll_interval);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        check_files_for_changes(&watched_files, &event_sender);
                    }
                    _ = stop_receiver.recv() => {
                        debug!("File watcher polling loop stopped");
                        break;
                    }
                }
            }
        });
    }

    fn stop_polling(&mut self) {
        let Some(sender) = self.stop_sender.take() else {
            return;
        };

        debug!("Stopping file watcher polling loop");
        if let Err(e) = sender.send(()) {
            warn!("Failed to send stop signal to file watcher: {}", e);
        }

        if let Err(e) = self.event_sender.send(ConfigEvent::watcher_stopped()) {
            warn!("Failed to send watcher stopped event: {}", e);
        }
    }

    /// Stop watching all files and shut down
    pub fn stop(&mut self) {
        info!("Stopping file watcher");
        self.watched_files.lock().clear();
        self.stop_polling();
    }

    pub fn watched_files(&self) -> Vec<PathBuf> {
        self.watched_files.lock().keys().cloned().collect()
    }

    pub fn is_watching(&self, path: &Path) -> bool {
        self.watched_files.lock().contains_key(path)
    }

    pub fn is_running(&self) -> bool {
        self.stop_sender.is_some()
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

impl Drop for FileWatcher {
    fn drop(&mut self) {
        if let Some(sender) = self.stop_sender.take() {
            let _ = sender.send(());
        }
    }
}

fn read_metadata(path: &Path) -> ConfigResult<FileMetadata> {
    let metadata = fs::metadata(path)?;
    Ok(FileMetadata {
        last_modified: metadata.modified()?,
        last_size: metadata.len(),
        last_change: None,
        missing: false,
    })
}

fn check_files_for_changes(
    watched_files: &WatchedFiles,
    event_sender: &mpsc::UnboundedSender<ConfigEvent>,
) {
    let mut files = watched_files.lock();

    for (path, file_metadata) in files.iter_mut() {
        match check_single_file(path, file_metadata) {
            Ok(true) => {
                debug!(path = %path.display(), "Detected change in config file");
                if let Err(e) = event_sender.send(ConfigEvent::file_modified(path.clone())) {
                    warn!("Failed to send file modified event: {}", e);
                }
            }
            Ok(false) => {}
            Err(e) => {
                error!(path = %path.display(), "Error checking file: {}", e);
                let event =
                    ConfigEvent::watcher_error(format!("Error checking file {:?}: {}", path, e));
                if let Err(send_err) = event_sender.send(event) {
                    warn!("Failed to send watcher error event: {}", send_err);
                }
            }
        }
    }
}

/// Returns whether the file changed since the last observation, updating `current`
fn check_single_file(path: &Path, current: &mut FileMetadata) -> ConfigResult<bool> {
    if let Some(last_change) = current.last_change {
        if last_change.elapsed() < DEBOUNCE {
            return Ok(false);
        }
    }

    if !path.exists() {
        if current.missing {
            return Ok(false);
        }
        current.missing = true;
        return Err(ConfigError::FileNotFound(format!(
            "Watched file no longer exists: {}",
            path.display()
        )));
    }

    let fs_metadata = fs::metadata(path)?;
    let modified = fs_metadata.modified()?;
    let size = fs_metadata.len();

    let reappeared = std::mem::take(&mut current.missing);
    if reappeared {
        info!(path = %path.display(), "Watched file is back");
    }

    if reappeared || modified != current.last_modified || size != current.last_size {
        current.last_modified = modified;
        current.last_size = size;
        current.last_change = Some(Instant::now());
        Ok(true)
    } else {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hot_reload::events::ConfigEventType;
    use tempfile::{tempdir, NamedTempFile};
    use tokio::time::{sleep, timeout};

    #[tokio::test]
    async fn test_file_watcher_creation() {
        let (event_sender, _event_receiver) = mpsc::unbounded_channel();
        let watcher = FileWatcher::new(event_sender);

        assert!(!watcher.is_running());
        assert_eq!(watcher.poll_interval(), Duration::from_millis(250));
        assert!(watcher.watched_files().is_empty());
    }

    #[tokio::test]
    async fn test_watch_and_unwatch() {
        let temp_file = NamedTempFile::new().unwrap();
        let file_path = temp_file.path().to_path_buf();

        let (event_sender, mut event_receiver) = mpsc::unbounded_channel();
        let mut watcher = FileWatcher::new(event_sender);

        watcher.watch_file(&file_path).unwrap();
        assert!(watcher.is_watching(&file_path));
        assert!(watcher.is_running());

        let event = event_receiver.recv().await.unwrap();
        assert_eq!(event.event_type, ConfigEventType::WatcherStarted);

        watcher.unwatch_file(&file_path);
        assert!(!watcher.is_running());

        let event = event_receiver.recv().await.unwrap();
        assert_eq!(event.event_type, ConfigEventType::WatcherStopped);
    }

    #[tokio::test]
    async fn test_watch_missing_file_fails() {
        let (event_sender, _event_receiver) = mpsc::unbounded_channel();
        let mut watcher = FileWatcher::new(event_sender);
        assert!(watcher.watch_file("/path/that/does/not/exist.toml").is_err());
        assert!(!watcher.is_running());
    }

    #[tokio::test]
    async fn test_file_change_detection() {
        let temp_file = NamedTempFile::new().unwrap();
        let file_path = temp_file.path().to_path_buf();
        fs::write(&file_path, "a = 1").unwrap();

        let (event_sender, mut event_receiver) = mpsc::unbounded_channel();
        let mut watcher = FileWatcher::new(event_sender);
        watcher.set_poll_interval(Duration::from_millis(20));
        watcher.watch_file(&file_path).unwrap();

        let started = event_receiver.recv().await.unwrap();
        assert_eq!(started.event_type, ConfigEventType::WatcherStarted);

        sleep(Duration::from_millis(50)).await;
        // Size changes too, so coarse mtime resolution cannot hide the edit
        fs::write(&file_path, "a = 1\nb = 22\n").unwrap();

        let event = timeout(Duration::from_secs(5), event_receiver.recv())
            .await
            .expect("no change event within timeout")
            .unwrap();
        assert_eq!(event.event_type, ConfigEventType::FileModified);
        assert_eq!(event.path.as_deref(), Some(file_path.as_path()));

        watcher.stop();
    }

    #[tokio::test]
    async fn test_missing_file_reported_once() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("webwallet.toml");
        fs::write(&file_path, "a = 1").unwrap();

        let (event_sender, mut event_receiver) = mpsc::unbounded_channel();
        let mut watcher = FileWatcher::new(event_sender);
        watcher.set_poll_interval(Duration::from_millis(20));
        watcher.watch_file(&file_path).unwrap();

        let started = event_receiver.recv().await.unwrap();
        assert_eq!(started.event_type, ConfigEventType::WatcherStarted);

        fs::remove_file(&file_path).unwrap();

        // Many poll ticks pass while the file is gone
        let mut errors = 0;
        while let Ok(Some(event)) =
            timeout(Duration::from_millis(400), event_receiver.recv()).await
        {
            if event.event_type == ConfigEventType::WatcherError {
                errors += 1;
            }
        }
        assert_eq!(errors, 1);

        fs::write(&file_path, "a = 1").unwrap();
        let event = timeout(Duration::from_secs(5), event_receiver.recv())
            .await
            .expect("no event after the file came back")
            .unwrap();
        assert_eq!(event.event_type, ConfigEventType::FileModified);

        watcher.stop();
    }
}
