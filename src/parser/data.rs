use std::fmt;

pub type Result<T> = std::result::Result<T, SyntaxError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
	#[error("unmatched right parenthesis at {position}")]
	UnmatchedRightParen { position: usize },
	#[error("mismatched parentheses: `(` at {position} is never closed")]
	MismatchedParens { position: usize },
	#[error("insufficient operands for operator {operator} at {position}")]
	InsufficientOperands {
		operator: OperatorKind,
		position: usize,
	},
	/// Reduction left `fragments` expressions on the stack instead of one.
	#[error("malformed expression: expected a single expression, found {fragments}")]
	Malformed { fragments: usize },
	/// The operator at `position` would nest the expression deeper than `limit`.
	#[error("expression nested too deeply: operator at {position} exceeds {limit} levels")]
	TooDeep { limit: usize, position: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
	Ident {
		value: &'a str,
		start: usize,
		end: usize,
	},
	Operator {
		kind: OperatorKind,
		position: usize,
	},
	Whitespace {
		start: usize,
		end: usize,
	},
	End {
		position: usize,
	},
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperatorKind {
	LeftParen,
	RightParen,
	Not,
	And,
	Or,
}

impl OperatorKind {
	pub fn keyword(word: &str) -> Option<Self> {
		match word {
			"AND" => Some(OperatorKind::And),
			"OR" => Some(OperatorKind::Or),
			"NOT" => Some(OperatorKind::Not),
			_ => None,
		}
	}

	/// Parentheses group, everything else combines operands.
	pub fn is_operator(self) -> bool {
		matches!(self, OperatorKind::Not | OperatorKind::And | OperatorKind::Or)
	}
}

impl fmt::Display for OperatorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			OperatorKind::LeftParen => "(",
			OperatorKind::RightParen => ")",
			OperatorKind::Not => "NOT",
			OperatorKind::And => "AND",
			OperatorKind::Or => "OR",
		})
	}
}
