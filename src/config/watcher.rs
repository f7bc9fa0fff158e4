//! Route file watcher for hot reload.
//!
//! # Design Decisions
//! - Watches the parent directory, so editors that save by renaming a
//!   temporary file over the route file are still seen
//! - Sends a configuration only when it differs from the last one sent;
//!   a single save usually raises several events
//! - An invalid file is logged and skipped; the receiver keeps its routes

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::RouterConfig;

/// Monitors the route file and sends each valid new version.
pub struct ConfigWatcher {
    reloader: Reloader,
}

impl ConfigWatcher {
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<RouterConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let reloader = Reloader {
            path: path.to_path_buf(),
            last: None,
            update_tx,
        };
        (Self { reloader }, update_rx)
    }

    /// Treat `config` as already applied, so an unchanged file isn't resent.
    pub fn with_current(mut self, config: RouterConfig) -> Self {
        self.reloader.last = Some(config);
        self
    }

    /// Start watching. Dropping the returned watcher stops it.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let mut reloader = self.reloader;
        let dir = watch_dir(&reloader.path);
        let path = reloader.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    reloader.handle(&event);
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?path, "Route file watcher started");
        Ok(watcher)
    }
}

/// Turns file events into configuration updates.
struct Reloader {
    path: PathBuf,
    last: Option<RouterConfig>,
    update_tx: mpsc::UnboundedSender<RouterConfig>,
}

impl Reloader {
    /// Returns whether a new configuration was sent.
    fn handle(&mut self, event: &Event) -> bool {
        if !(event.kind.is_modify() || event.kind.is_create()) {
            return false;
        }
        let file_name = self.path.file_name();
        if !event.paths.iter().any(|p| p.file_name() == file_name) {
            return false;
        }

        let config = match load_config(&self.path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("Failed to reload routes: {}. Keeping current routes.", e);
                return false;
            }
        };
        if self.last.as_ref() == Some(&config) {
            tracing::debug!("Route file unchanged, skipping reload");
            return false;
        }

        tracing::info!(routes = config.routes.len(), "Route file change detected");
        self.last = Some(config.clone());
        self.update_tx.send(config).is_ok()
    }
}

fn watch_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, DataChange, EventKind, ModifyKind};

    const ONE_ROUTE: &str = "[[routes]]\npath = \"posts\"\nto = \"posts#index\"\n";
    const TWO_ROUTES: &str = "[[routes]]\npath = \"posts\"\nto = \"posts#index\"\n\
                              [[routes]]\npath = \"about\"\nto = \"pages#about\"\n";

    fn modified(path: &Path) -> Event {
        Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
            .add_path(path.to_path_buf())
    }

    #[test]
    fn test_sends_changed_config_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.toml");
        std::fs::write(&path, ONE_ROUTE).unwrap();

        let (watcher, mut rx) = ConfigWatcher::new(&path);
        let mut reloader = watcher.reloader;

        assert!(reloader.handle(&modified(&path)));
        assert_eq!(rx.try_recv().unwrap().routes.len(), 1);

        // Same content again: nothing new to apply.
        assert!(!reloader.handle(&modified(&path)));
        assert!(rx.try_recv().is_err());

        std::fs::write(&path, TWO_ROUTES).unwrap();
        let created = Event::new(EventKind::Create(CreateKind::File)).add_path(path.clone());
        assert!(reloader.handle(&created));
        assert_eq!(rx.try_recv().unwrap().routes.len(), 2);
    }

    #[test]
    fn test_ignores_unrelated_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.toml");
        std::fs::write(&path, ONE_ROUTE).unwrap();

        let (watcher, mut rx) = ConfigWatcher::new(&path);
        let mut reloader = watcher.reloader;

        assert!(!reloader.handle(&modified(&dir.path().join("other.toml"))));
        let access = Event::new(EventKind::Access(AccessKind::Any)).add_path(path.clone());
        assert!(!reloader.handle(&access));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_invalid_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.toml");
        std::fs::write(&path, "[[routes]]\npath = \"posts\"\n").unwrap();

        let (watcher, mut rx) = ConfigWatcher::new(&path);
        let mut reloader = watcher.with_current(RouterConfig::default()).reloader;

        assert!(!reloader.handle(&modified(&path)));
        assert!(rx.try_recv().is_err());
        assert_eq!(reloader.last, Some(RouterConfig::default()));
    }

    #[test]
    fn test_watch_dir() {
        assert_eq!(watch_dir(Path::new("routes.toml")), PathBuf::from("."));
        assert_eq!(
            watch_dir(Path::new("/etc/app/routes.toml")),
            PathBuf::from("/etc/app")
        );
    }
}
