//! In-memory setlist index: documents, the song catalog and the reverse
//! (song token -> show ids) index.
//!
//! An [`Index`] is never modified after it is built. Reloading produces a
//! whole new instance, see [`crate::handle::IndexHandle`].

mod builder;
mod evaluate;
pub mod format;
mod setlist;

pub use builder::IndexBuilder;
pub use evaluate::{evaluate, QueryContext, QueryError};
pub use format::FormatError;
pub use setlist::{normalize_name, Set, Setlist, ShowId};

use crate::parser;
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Index {
	/// display name -> song token
	songs: BTreeMap<String, String>,
	setlists: BTreeMap<ShowId, Setlist>,
	reverse: HashMap<String, BTreeSet<ShowId>>,
}

impl Index {
	/// Song catalog sorted by display name. Several names may share a token.
	pub fn songs(&self) -> &BTreeMap<String, String> {
		&self.songs
	}

	/// Setlists in ascending id order.
	pub fn setlists(&self) -> impl Iterator<Item = &Setlist> {
		self.setlists.values()
	}

	pub fn setlist(&self, id: ShowId) -> Option<&Setlist> {
		self.setlists.get(&id)
	}

	pub fn show_date(&self, id: ShowId) -> Option<&str> {
		self.setlists.get(&id).map(|setlist| setlist.date.as_str())
	}

	pub fn show_url(&self, id: ShowId) -> Option<&str> {
		self.setlists.get(&id).and_then(|setlist| setlist.url.as_deref())
	}

	pub fn shows_with(&self, token: &str) -> Option<&BTreeSet<ShowId>> {
		self.reverse.get(token)
	}

	/// Every loaded show id, ascending.
	pub fn universe(&self) -> impl Iterator<Item = ShowId> + '_ {
		self.setlists.keys().copied()
	}

	pub fn len(&self) -> usize {
		self.setlists.len()
	}

	pub fn is_empty(&self) -> bool {
		self.setlists.is_empty()
	}

	/// Parses and evaluates `query`, returning matching show ids in
	/// ascending order.
	pub fn query(&self, ctx: &QueryContext, query: &str) -> Result<Vec<ShowId>, QueryError> {
		let query = parser::parse(query)?;
		let shows = evaluate(ctx, &query, self)?;
		Ok(shows.into_iter().collect())
	}
}

#[cfg(test)]
#[path = "tests/query.rs"]
mod query_test;
