use super::format::FormatError;
use std::fmt;
use std::str::FromStr;

pub type ShowId = u64;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Set {
	pub songs: Vec<String>,
}

impl<S: Into<String>> FromIterator<S> for Set {
	fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
		Set {
			songs: iter.into_iter().map(Into::into).collect(),
		}
	}
}

/// One show. Song order inside every set is kept exactly as played.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Setlist {
	pub id: ShowId,
	pub date: String,
	pub url: Option<String>,
	pub sets: Vec<Set>,
	pub encore: Option<Set>,
}

impl Setlist {
	/// All song tokens: every set in order, then the encore.
	pub fn songs(&self) -> impl Iterator<Item = &str> {
		self.sets
			.iter()
			.chain(self.encore.iter())
			.flat_map(|set| set.songs.iter().map(String::as_str))
	}

	/// Checks that the line encoding of this setlist parses back to it.
	/// Returns the reason it would not.
	pub fn check(&self) -> Result<(), &'static str> {
		let breaks_field = |s: &str| s.contains(|c: char| matches!(c, '{' | '}' | '\n' | '\r'));
		if self.sets.is_empty() {
			return Err("no sets");
		}
		if breaks_field(&self.date) {
			return Err("date cannot be encoded");
		}
		if self.url.as_deref().map_or(false, breaks_field) {
			return Err("url cannot be encoded");
		}
		for song in self.songs() {
			if song.is_empty() {
				return Err("empty song token");
			}
			if breaks_field(song) || song.contains(',') {
				return Err("song token cannot be encoded");
			}
		}
		Ok(())
	}
}

// ID{1249948108}DATE{2000-09-17}URL{...}SET1{a,b}SET2{c}ENCORE{d}
impl fmt::Display for Setlist {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ID{{{}}}DATE{{{}}}", self.id, self.date)?;
		if let Some(url) = &self.url {
			write!(f, "URL{{{}}}", url)?;
		}
		for (i, set) in self.sets.iter().enumerate() {
			write!(f, "SET{}{{{}}}", i + 1, set.songs.join(","))?;
		}
		if let Some(encore) = &self.encore {
			write!(f, "ENCORE{{{}}}", encore.songs.join(","))?;
		}
		Ok(())
	}
}

impl FromStr for Setlist {
	type Err = FormatError;

	/// Accepts fields only in the order `Display` writes them, so a parsed
	/// line always re-encodes to the same text.
	fn from_str(line: &str) -> Result<Self, Self::Err> {
		let malformed = |reason| FormatError::MalformedSetlist {
			reason,
			content: line.to_string(),
		};

		let mut fields = Vec::new();
		let mut rest = line;
		while !rest.is_empty() {
			let open = rest.find('{').ok_or_else(|| malformed("expected `{`"))?;
			let close = rest[open..]
				.find('}')
				.map(|i| open + i)
				.ok_or_else(|| malformed("expected `}`"))?;
			fields.push((&rest[..open], &rest[open + 1..close]));
			rest = &rest[close + 1..];
		}
		let mut fields = fields.into_iter().peekable();

		let id = match fields.next() {
			Some(("ID", value)) if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) => {
				value.parse::<ShowId>().map_err(|_| malformed("show id out of range"))?
			}
			Some(("ID", _)) => return Err(malformed("show id is not a number")),
			_ => return Err(malformed("missing ID")),
		};
		let date = match fields.next() {
			Some(("DATE", value)) => value.to_string(),
			_ => return Err(malformed("missing DATE")),
		};
		let url = match fields.peek() {
			Some(&("URL", value)) => {
				fields.next();
				Some(value.to_string())
			}
			_ => None,
		};
		let mut sets = Vec::new();
		while let Some(&(tag, value)) = fields.peek() {
			if tag != format!("SET{}", sets.len() + 1) {
				break;
			}
			fields.next();
			sets.push(split_songs(value));
		}
		let encore = match fields.peek() {
			Some(&("ENCORE", value)) => {
				fields.next();
				Some(split_songs(value))
			}
			_ => None,
		};
		if fields.next().is_some() {
			return Err(malformed("unexpected field"));
		}

		let setlist = Setlist {
			id,
			date,
			url,
			sets,
			encore,
		};
		setlist.check().map_err(malformed)?;
		Ok(setlist)
	}
}

fn split_songs(csv: &str) -> Set {
	if csv.is_empty() {
		return Set::default();
	}
	csv.split(',').collect()
}

/// Turns a display name into its song token: `Mike's Song` -> `mikes-song`.
///
/// Only uppercase letters are lowered, one character for one.
pub fn normalize_name(name: &str) -> String {
	name.chars()
		.filter(|c| !matches!(c, '.' | ',' | ';' | ':' | '\''))
		.map(|c| match c {
			' ' => '-',
			c if c.is_uppercase() => c.to_lowercase().next().unwrap_or(c),
			c => c,
		})
		.collect()
}
