//! Text encoding of an [`Index`].
//!
//! ```text
//! setsearcher index 1
//! [SONGS]
//! Chalk Dust Torture|chalk-dust-torture
//! [END]
//! [SETLISTS]
//! ID{1249948108}DATE{2000-09-17}SET1{guyute,bathtub-gin}ENCORE{contact}
//! [END]
//! ```
//!
//! Songs are sorted by display name and setlists by show id. The final
//! `[END]` has no trailing newline. Reading and then writing a file that was
//! produced by [`write`] reproduces it byte for byte.

use super::{Index, IndexBuilder, Setlist};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

pub const HEADER: &str = "setsearcher index 1";
const SONGS: &str = "[SONGS]";
const SETLISTS: &str = "[SETLISTS]";
const END: &str = "[END]";

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
	#[error("cannot read index: {0}")]
	Io(#[from] io::Error),
	#[error("bad header: index is empty")]
	MissingHeader,
	#[error("bad header: {found:?}")]
	BadHeader { found: String },
	#[error("line {line}: expected section {expected}")]
	MissingSection { expected: &'static str, line: usize },
	#[error("unterminated section {section}")]
	UnterminatedSection { section: &'static str },
	#[error("line {line}: malformed song entry {content:?}")]
	MalformedSong { line: usize, content: String },
	/// A catalog entry that cannot be written as a `name|token` line.
	#[error("song entry {name:?} -> {token:?} cannot be encoded")]
	InvalidSong { name: String, token: String },
	#[error("malformed setlist ({reason}): {content:?}")]
	MalformedSetlist {
		reason: &'static str,
		content: String,
	},
	#[error("line {line}: unexpected data after last section")]
	TrailingData { line: usize },
}

struct NumberedLines<R> {
	lines: io::Lines<R>,
	number: usize,
}

impl<R: BufRead> NumberedLines<R> {
	fn next_line(&mut self) -> Result<Option<(usize, String)>, FormatError> {
		match self.lines.next() {
			None => Ok(None),
			Some(line) => {
				self.number += 1;
				Ok(Some((self.number, line?)))
			}
		}
	}

	fn expect_marker(&mut self, expected: &'static str) -> Result<(), FormatError> {
		match self.next_line()? {
			Some((_, line)) if line == expected => Ok(()),
			Some((line, _)) => Err(FormatError::MissingSection { expected, line }),
			None => Err(FormatError::MissingSection {
				expected,
				line: self.number + 1,
			}),
		}
	}

	fn read_section(
		&mut self,
		section: &'static str,
		mut f: impl FnMut(usize, String) -> Result<(), FormatError>,
	) -> Result<(), FormatError> {
		self.expect_marker(section)?;
		loop {
			match self.next_line()? {
				None => return Err(FormatError::UnterminatedSection { section }),
				Some((_, line)) if line == END => return Ok(()),
				// a section cannot contain another section marker
				Some((_, line)) if line == SONGS || line == SETLISTS => {
					return Err(FormatError::UnterminatedSection { section })
				}
				Some((number, line)) => f(number, line)?,
			}
		}
	}
}

pub fn read(input: impl BufRead) -> Result<Index, FormatError> {
	let mut lines = NumberedLines {
		lines: input.lines(),
		number: 0,
	};

	match lines.next_line()? {
		None => return Err(FormatError::MissingHeader),
		Some((_, line)) if line != HEADER => return Err(FormatError::BadHeader { found: line }),
		Some(_) => {}
	}

	let mut builder = IndexBuilder::default();
	lines.read_section(SONGS, |line, content| {
		let song = content
			.split_once('|')
			.filter(|(_, token)| !token.contains('|'));
		if let Some((name, token)) = song {
			return builder.add_song(name, token);
		}
		Err(FormatError::MalformedSong { line, content })
	})?;
	lines.read_section(SETLISTS, |_, content| {
		builder.add_setlist(content.parse::<Setlist>()?)
	})?;

	if let Some((line, _)) = lines.next_line()? {
		return Err(FormatError::TrailingData { line });
	}
	Ok(builder.build())
}

pub fn write(index: &Index, mut output: impl Write) -> io::Result<()> {
	writeln!(output, "{}", HEADER)?;
	writeln!(output, "{}", SONGS)?;
	for (name, token) in index.songs() {
		writeln!(output, "{}|{}", name, token)?;
	}
	writeln!(output, "{}", END)?;
	writeln!(output, "{}", SETLISTS)?;
	for setlist in index.setlists() {
		writeln!(output, "{}", setlist)?;
	}
	write!(output, "{}", END)?;
	output.flush()
}

impl Index {
	pub fn open(path: impl AsRef<Path>) -> Result<Index, FormatError> {
		let file = File::open(path)?;
		read(BufReader::new(file))
	}

	/// Writes next to `path` first and renames over it, so readers never
	/// see a half-written index.
	pub fn save(&self, path: impl AsRef<Path>) -> io::Result<()> {
		let path = path.as_ref();
		let mut tmp = path.as_os_str().to_owned();
		tmp.push(".tmp");
		{
			let file = File::create(&tmp)?;
			write(self, BufWriter::new(file))?;
		}
		std::fs::rename(&tmp, path)
	}

	pub fn to_bytes(&self) -> Vec<u8> {
		let mut buf = Vec::new();
		// Writing into a Vec cannot fail.
		let _ = write(self, &mut buf);
		buf
	}
}

#[cfg(test)]
#[path = "tests/format.rs"]
mod format_test;
