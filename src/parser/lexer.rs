use super::data::*;

/// Lazy, infallible scanner over a query string.
///
/// Every input produces tokens: anything that is not whitespace or a
/// parenthesis becomes part of an identifier, and the stream always ends
/// with a single [`Token::End`].
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
	tail: &'a str,
	position: usize,
	done: bool,
}

impl<'a> From<&'a str> for Tokenizer<'a> {
	fn from(input: &'a str) -> Self {
		Self {
			tail: input,
			position: 0,
			done: false,
		}
	}
}

impl<'a> Iterator for Tokenizer<'a> {
	type Item = Token<'a>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.done {
			return None;
		}
		let position = self.position;
		let c = match self.tail.chars().next() {
			Some(c) => c,
			None => {
				self.done = true;
				return Some(Token::End { position });
			}
		};
		let token = if c.is_whitespace() {
			self.advance_bytes(self.try_chars(|c| c.is_whitespace()));
			Token::Whitespace {
				start: position,
				end: self.position,
			}
		} else if let Some(kind) = self.next_paren(c) {
			Token::Operator { kind, position }
		} else {
			let value = self.advance_bytes(self.try_chars(|&c| !is_delimiter(c)));
			match OperatorKind::keyword(value) {
				Some(kind) => Token::Operator { kind, position },
				None => Token::Ident {
					value,
					start: position,
					end: self.position,
				},
			}
		};
		Some(token)
	}
}

fn is_delimiter(c: char) -> bool {
	c == '(' || c == ')' || c.is_whitespace()
}

impl<'a> Tokenizer<'a> {
	fn next_paren(&mut self, c: char) -> Option<OperatorKind> {
		let kind = match c {
			'(' => OperatorKind::LeftParen,
			')' => OperatorKind::RightParen,
			_ => return None,
		};
		self.advance_bytes(1);
		Some(kind)
	}

	fn try_chars(&self, f: impl FnMut(&char) -> bool) -> usize {
		self.tail.chars().take_while(f).map(char::len_utf8).sum()
	}

	fn advance_bytes(&mut self, count: usize) -> &'a str {
		let (word, tail) = self.tail.split_at(count);
		self.position += count;
		self.tail = tail;
		word
	}
}

pub fn tokenize(query: &str) -> Vec<Token> {
	Tokenizer::from(query).collect()
}
