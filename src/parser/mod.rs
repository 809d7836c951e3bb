//! Query language: `song-a AND (song-b OR NOT song-c)`.
//!
//! Keywords are the uppercase words `AND`, `OR` and `NOT`; every other run
//! of characters that is neither whitespace nor a parenthesis names a song
//! token. `AND` and `OR` have equal precedence and group left to right, so
//! `a OR b AND c` means `(a OR b) AND c`. Parsed trees are at most
//! [`MAX_DEPTH`] levels deep.

mod data;
mod lexer;
mod shunting;

use std::fmt;
use std::str::FromStr;

pub use data::{OperatorKind, Result, SyntaxError, Token};
pub use lexer::{tokenize, Tokenizer};
pub use shunting::MAX_DEPTH;

pub fn parse(query: &str) -> Result<Query> {
	Query::try_from(Tokenizer::from(query))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
	/// A song token, resolved against the index only at evaluation.
	Term(String),
	Not(Box<Query>),
	And(Box<Query>, Box<Query>),
	Or(Box<Query>, Box<Query>),
}

impl<'a> TryFrom<Tokenizer<'a>> for Query {
	type Error = SyntaxError;

	fn try_from(value: Tokenizer<'a>) -> Result<Self> {
		shunting::parse(value)
	}
}

impl FromStr for Query {
	type Err = SyntaxError;

	fn from_str(s: &str) -> Result<Self> {
		parse(s)
	}
}

impl Query {
	/// Depth-first traversal. Children of a node are visited only when `f`
	/// returns true for it.
	pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Query) -> bool) {
		if !f(self) {
			return;
		}
		match self {
			Query::Term(_) => {}
			Query::Not(inner) => inner.walk(f),
			Query::And(left, right) | Query::Or(left, right) => {
				left.walk(f);
				right.walk(f);
			}
		}
	}

	/// Song tokens in the order they appear, duplicates included.
	pub fn terms(&self) -> Vec<&str> {
		let mut terms = Vec::new();
		self.walk(&mut |node| {
			if let Query::Term(token) = node {
				terms.push(token.as_str());
			}
			true
		});
		terms
	}
}

impl fmt::Display for Query {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Query::Term(token) => f.write_str(token),
			Query::Not(inner) => write!(f, "NOT({})", inner),
			Query::And(left, right) => write!(f, "({} AND {})", left, right),
			Query::Or(left, right) => write!(f, "({} OR {})", left, right),
		}
	}
}

#[cfg(test)]
mod tests;
