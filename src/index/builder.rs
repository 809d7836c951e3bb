use super::setlist::{normalize_name, Setlist, ShowId};
use super::{FormatError, Index};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Collects setlists and catalog entries from an ingestion run and freezes
/// them into an immutable [`Index`].
///
/// Only values the text format can encode are accepted, so every built
/// index can be saved and loaded back unchanged.
#[derive(Debug, Default, Clone)]
pub struct IndexBuilder {
	songs: BTreeMap<String, String>,
	setlists: BTreeMap<ShowId, Setlist>,
}

impl IndexBuilder {
	/// A later setlist with the same id replaces the earlier one.
	pub fn add_setlist(&mut self, setlist: Setlist) -> Result<(), FormatError> {
		setlist.check().map_err(|reason| FormatError::MalformedSetlist {
			reason,
			content: setlist.to_string(),
		})?;
		if let Some(old) = self.setlists.insert(setlist.id, setlist) {
			log::debug!("setlist {} replaced", old.id);
		}
		Ok(())
	}

	pub fn add_song(
		&mut self,
		name: impl Into<String>,
		token: impl Into<String>,
	) -> Result<(), FormatError> {
		let (name, token) = (name.into(), token.into());
		let unencodable = |s: &str| s.contains(|c: char| matches!(c, '|' | '\n' | '\r'));
		if unencodable(&name) || unencodable(&token) {
			return Err(FormatError::InvalidSong { name, token });
		}
		self.songs.insert(name, token);
		Ok(())
	}

	/// Adds a catalog entry whose token is derived from the display name.
	pub fn add_song_named(&mut self, name: &str) -> Result<String, FormatError> {
		let token = normalize_name(name);
		self.add_song(name, token.clone())?;
		Ok(token)
	}

	pub fn len(&self) -> usize {
		self.setlists.len()
	}

	pub fn is_empty(&self) -> bool {
		self.setlists.is_empty()
	}

	pub fn build(self) -> Index {
		let mut reverse: HashMap<String, BTreeSet<ShowId>> = HashMap::new();
		for setlist in self.setlists.values() {
			for song in setlist.songs() {
				reverse
					.entry(song.to_string())
					.or_default()
					.insert(setlist.id);
			}
		}
		log::debug!(
			"built index: {} setlists, {} songs, {} catalog entries",
			self.setlists.len(),
			reverse.len(),
			self.songs.len()
		);
		Index {
			songs: self.songs,
			setlists: self.setlists,
			reverse,
		}
	}
}

/// Setlists that cannot be encoded are logged and skipped.
impl Extend<Setlist> for IndexBuilder {
	fn extend<I: IntoIterator<Item = Setlist>>(&mut self, iter: I) {
		for setlist in iter {
			if let Err(err) = self.add_setlist(setlist) {
				log::warn!("skipping setlist: {}", err);
			}
		}
	}
}
