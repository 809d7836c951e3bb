use super::data::*;
use super::Query;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Item<'a> {
	Operand(&'a str),
	Operator { kind: OperatorKind, position: usize },
}

pub fn parse<'a>(tokens: impl Iterator<Item = Token<'a>>) -> Result<Query> {
	reduce(to_postfix(tokens)?)
}

// AND and OR share one precedence level: any operator already on the stack
// is popped before the new one is pushed, so unparenthesised chains group
// strictly left to right.
fn to_postfix<'a>(tokens: impl Iterator<Item = Token<'a>>) -> Result<Vec<Item<'a>>> {
	let mut output = Vec::new();
	let mut stack: Vec<(OperatorKind, usize)> = Vec::new();
	for token in tokens {
		let (kind, position) = match token {
			Token::Whitespace { .. } => continue,
			Token::End { .. } => break,
			Token::Ident { value, .. } => {
				output.push(Item::Operand(value));
				continue;
			}
			Token::Operator { kind, position } => (kind, position),
		};
		match kind {
			OperatorKind::Not | OperatorKind::LeftParen => stack.push((kind, position)),
			OperatorKind::And | OperatorKind::Or => {
				while let Some(&(top, top_position)) = stack.last() {
					if !top.is_operator() {
						break;
					}
					stack.pop();
					output.push(Item::Operator {
						kind: top,
						position: top_position,
					});
				}
				stack.push((kind, position));
			}
			OperatorKind::RightParen => loop {
				match stack.pop() {
					Some((OperatorKind::LeftParen, _)) => break,
					Some((kind, position)) => output.push(Item::Operator { kind, position }),
					None => return Err(SyntaxError::UnmatchedRightParen { position }),
				}
			},
		}
	}
	while let Some((kind, position)) = stack.pop() {
		if kind == OperatorKind::LeftParen {
			return Err(SyntaxError::MismatchedParens { position });
		}
		output.push(Item::Operator { kind, position });
	}
	Ok(output)
}

/// Deepest tree `reduce` builds. Evaluation, printing and dropping a
/// [`Query`] all recurse once per level.
pub const MAX_DEPTH: usize = 512;

fn reduce(postfix: Vec<Item>) -> Result<Query> {
	// each operand carries the depth of its tree
	let mut operands: Vec<(Query, usize)> = Vec::with_capacity(postfix.len());
	for item in postfix {
		let (kind, position) = match item {
			Item::Operand(value) => {
				operands.push((Query::Term(value.to_string()), 1));
				continue;
			}
			Item::Operator { kind, position } => (kind, position),
		};
		let insufficient = || SyntaxError::InsufficientOperands {
			operator: kind,
			position,
		};
		let (node, depth) = match kind {
			OperatorKind::Not => {
				let (inner, depth) = operands.pop().ok_or_else(insufficient)?;
				(Query::Not(Box::new(inner)), depth + 1)
			}
			OperatorKind::And | OperatorKind::Or => {
				let (right, right_depth) = operands.pop().ok_or_else(insufficient)?;
				let (left, left_depth) = operands.pop().ok_or_else(insufficient)?;
				let (left, right) = (Box::new(left), Box::new(right));
				let node = if kind == OperatorKind::And {
					Query::And(left, right)
				} else {
					Query::Or(left, right)
				};
				(node, left_depth.max(right_depth) + 1)
			}
			OperatorKind::LeftParen | OperatorKind::RightParen => {
				unreachable!("parentheses never reach the output queue")
			}
		};
		if depth > MAX_DEPTH {
			return Err(SyntaxError::TooDeep {
				limit: MAX_DEPTH,
				position,
			});
		}
		operands.push((node, depth));
	}
	if operands.len() != 1 {
		return Err(SyntaxError::Malformed {
			fragments: operands.len(),
		});
	}
	Ok(operands.remove(0).0)
}
