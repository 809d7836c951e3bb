use crate::index::Index;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::{Duration, SystemTime};

/// Holds the index currently being served.
///
/// Readers take an `Arc` snapshot and keep using it for the whole query even
/// if a reload installs a new index in the meantime.
#[derive(Debug, Default)]
pub struct IndexHandle {
	current: RwLock<Arc<Index>>,
}

impl IndexHandle {
	pub fn new(index: Index) -> Self {
		Self {
			current: RwLock::new(Arc::new(index)),
		}
	}

	pub fn current(&self) -> Arc<Index> {
		Arc::clone(&self.current.read().unwrap())
	}

	/// Installs `index` and returns the snapshot it replaced.
	pub fn replace(&self, index: Index) -> Arc<Index> {
		let index = Arc::new(index);
		let mut current = self.current.write().unwrap();
		std::mem::replace(&mut *current, index)
	}

	/// Loads `path` off the async runtime and swaps it in. On failure the
	/// current index stays in place.
	pub async fn reload_from(&self, path: &Path) -> Result<(), anyhow::Error> {
		let owned = path.to_path_buf();
		let index = tokio::task::spawn_blocking(move || Index::open(owned)).await??;
		log::info!("loaded index from {}: {} shows", path.display(), index.len());
		self.replace(index);
		Ok(())
	}

	/// Reloads when the modification time of `path` differs from `last`.
	/// Returns whether a new index was installed.
	pub async fn reload_if_changed(&self, path: &Path, last: &mut Option<SystemTime>) -> bool {
		let modified = modified(path);
		if modified.is_none() || modified == *last {
			return false;
		}
		match self.reload_from(path).await {
			Ok(()) => {
				*last = modified;
				true
			}
			Err(err) => {
				log::error!("cannot reload index from {}: {:#}", path.display(), err);
				false
			}
		}
	}

	/// Polls `path` every `period` and reloads the index when it changes.
	pub fn watch(self: Arc<Self>, path: PathBuf, period: Duration) -> tokio::task::JoinHandle<()> {
		tokio::spawn(async move {
			let mut last = modified(&path);
			let mut interval = tokio::time::interval(period);
			interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
			// the first tick completes immediately
			interval.tick().await;
			loop {
				interval.tick().await;
				self.reload_if_changed(&path, &mut last).await;
			}
		})
	}
}

fn modified(path: &Path) -> Option<SystemTime> {
	std::fs::metadata(path).and_then(|meta| meta.modified()).ok()
}
