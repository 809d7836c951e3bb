use super::*;

fn term(value: &str) -> Box<Query> {
	Box::new(Query::Term(value.to_string()))
}

fn not(inner: Box<Query>) -> Box<Query> {
	Box::new(Query::Not(inner))
}

fn and(left: Box<Query>, right: Box<Query>) -> Box<Query> {
	Box::new(Query::And(left, right))
}

fn or(left: Box<Query>, right: Box<Query>) -> Box<Query> {
	Box::new(Query::Or(left, right))
}

#[test]
fn trees() {
	let cases = [
		("a", term("a")),
		("NOT a", not(term("a"))),
		("a AND b", and(term("a"), term("b"))),
		("a OR b", or(term("a"), term("b"))),
		("a OR NOT b", or(term("a"), not(term("b")))),
		(
			"a OR (b AND NOT c)",
			or(term("a"), and(term("b"), not(term("c")))),
		),
		("NOT a AND b", and(not(term("a")), term("b"))),
		("NOT NOT a", not(not(term("a")))),
		("NOT (a OR b)", not(or(term("a"), term("b")))),
		("((a))", term("a")),
		("  a\tAND\nb  ", and(term("a"), term("b"))),
	];
	for (query, expected) in cases {
		assert_eq!(parse(query), Ok(*expected), "query {:?}", query);
	}
}

#[test]
fn and_or_group_left_to_right() {
	assert_eq!(
		parse("a AND b OR c"),
		Ok(*or(and(term("a"), term("b")), term("c")))
	);
	assert_eq!(
		parse("a OR b AND c"),
		Ok(*and(or(term("a"), term("b")), term("c")))
	);
	assert_eq!(
		parse("a OR b AND c OR d"),
		Ok(*or(and(or(term("a"), term("b")), term("c")), term("d")))
	);
}

#[test]
fn errors() {
	let cases = [
		("(a", SyntaxError::MismatchedParens { position: 0 }),
		("a)", SyntaxError::UnmatchedRightParen { position: 1 }),
		("(a))", SyntaxError::UnmatchedRightParen { position: 3 }),
		(
			"AND a",
			SyntaxError::InsufficientOperands {
				operator: OperatorKind::And,
				position: 0,
			},
		),
		(
			"NOT",
			SyntaxError::InsufficientOperands {
				operator: OperatorKind::Not,
				position: 0,
			},
		),
		("a b", SyntaxError::Malformed { fragments: 2 }),
		("", SyntaxError::Malformed { fragments: 0 }),
		("()", SyntaxError::Malformed { fragments: 0 }),
	];
	for (query, expected) in cases {
		assert_eq!(parse(query), Err(expected), "query {:?}", query);
	}
}

#[test]
fn error_messages() {
	let err = parse("a)").unwrap_err();
	assert!(err.to_string().starts_with("unmatched right parenthesis"));
	let err = parse("(a").unwrap_err();
	assert!(err.to_string().starts_with("mismatched parentheses"));
	let err = parse("OR").unwrap_err();
	assert!(err.to_string().starts_with("insufficient operands for operator OR"));
	let err = parse("a b c").unwrap_err();
	assert!(err.to_string().starts_with("malformed expression"));
}

#[test]
fn display_reparses() -> Result<()> {
	let query = parse("a OR (b AND NOT c)")?;
	assert_eq!(query.to_string(), "(a OR (b AND NOT(c)))");
	assert_eq!(parse(&query.to_string())?, query);

	let query: Query = "NOT x AND y OR z".parse()?;
	assert_eq!(query.to_string(), "((NOT(x) AND y) OR z)");
	assert_eq!(parse(&query.to_string())?, query);
	Ok(())
}

#[test]
fn walk() -> Result<()> {
	let query = parse("a AND (b OR NOT a)")?;
	assert_eq!(query.terms(), vec!["a", "b", "a"]);

	let mut visited = 0;
	query.walk(&mut |node| {
		visited += 1;
		!matches!(node, Query::Or(..))
	});
	// And, a, Or; the Or subtree is skipped.
	assert_eq!(visited, 3);
	Ok(())
}
