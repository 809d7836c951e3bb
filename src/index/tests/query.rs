use super::*;
use crate::parser::{Query, SyntaxError, MAX_DEPTH};
use crate::tests;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

fn query(index: &Index, q: &str) -> Vec<ShowId> {
	index
		.query(&QueryContext::background(), q)
		.unwrap_or_else(|err| panic!("query {:?} failed: {}", q, err))
}

#[test]
fn fixture_queries() {
	let index = tests::phish_index();
	let cases: [(&str, &[ShowId]); 8] = [
		("bathtub-gin", &[1249948108, 1250387629]),
		("bathtub-gin AND you-enjoy-myself", &[1250387629]),
		(
			"bathtub-gin OR nellie-kane",
			&[1249948108, 1250387629, 1250458591, 1250458932],
		),
		("harry-hood AND NOT cavern", &[1250387629]),
		("wolfmans-brother", &[1250454896, 1250458932]),
		(
			"NOT fluffhead",
			&[1249948445, 1250024745, 1250387629, 1250454896, 1250458932],
		),
		// encore songs count like any other
		("rocky-top", &[1249948108]),
		("nonexistent-song-xyz", &[]),
	];
	for (q, expected) in cases {
		assert_eq!(query(&index, q), expected, "query {:?}", q);
	}
}

#[test]
fn grouping_changes_results() {
	let index = tests::phish_index();
	// (bathtub-gin OR harry-hood) AND cavern
	assert_eq!(
		query(&index, "bathtub-gin OR harry-hood AND cavern"),
		vec![1250454896]
	);
	assert_eq!(
		query(&index, "bathtub-gin OR (harry-hood AND cavern)"),
		vec![1249948108, 1250387629, 1250454896]
	);
	assert_eq!(
		query(&index, "(bathtub-gin OR harry-hood) AND cavern"),
		query(&index, "bathtub-gin OR harry-hood AND cavern")
	);
}

#[test]
fn not_covers_shows_without_songs() -> Result<(), FormatError> {
	let mut builder = IndexBuilder::default();
	builder.add_setlist("ID{1}DATE{a}SET1{x}".parse()?)?;
	builder.add_setlist("ID{2}DATE{b}SET1{}ENCORE{}".parse()?)?;
	builder.add_setlist("ID{3}DATE{c}SET1{}".parse()?)?;
	let index = builder.build();
	assert_eq!(query(&index, "NOT x"), vec![2, 3]);
	assert_eq!(query(&index, "NOT unknown"), vec![1, 2, 3]);
	assert_eq!(query(&index, "x AND NOT x"), Vec::<ShowId>::new());
	Ok(())
}

#[test]
fn syntax_errors_surface() {
	let index = tests::phish_index();
	let ctx = QueryContext::background();
	for q in ["(bathtub-gin", "bathtub-gin)", "AND", "a b", ""] {
		match index.query(&ctx, q) {
			Err(QueryError::Syntax(_)) => {}
			other => panic!("query {:?} returned {:?}", q, other),
		}
	}
}

#[test]
fn future_deadline_does_not_cancel() -> Result<(), QueryError> {
	let index = tests::phish_index();
	let ctx = QueryContext::with_timeout(Duration::from_secs(3600));
	assert_eq!(
		index.query(&ctx, "harry-hood AND NOT cavern")?,
		vec![1250387629]
	);
	Ok(())
}

#[test]
fn expired_deadline_cancels() {
	let index = tests::phish_index();
	let ctx = QueryContext::with_timeout(Duration::ZERO);
	assert_eq!(index.query(&ctx, "bathtub-gin"), Err(QueryError::Cancelled));

	let ctx = QueryContext::with_deadline(Instant::now());
	assert_eq!(
		index.query(&ctx, "NOT (a OR b)"),
		Err(QueryError::Cancelled)
	);
}

#[test]
fn cancel_is_shared_between_clones() {
	let index = tests::phish_index();
	let ctx = QueryContext::background();
	let other = ctx.clone();
	assert!(index.query(&ctx, "cavern").is_ok());
	other.cancel();
	assert!(ctx.is_done());
	assert_eq!(index.query(&ctx, "cavern"), Err(QueryError::Cancelled));
}

#[test]
fn show_metadata() -> Result<(), FormatError> {
	let mut builder = IndexBuilder::default();
	builder.add_setlist("ID{5}DATE{1993-08-14}URL{http://example.com/5}SET1{a}".parse()?)?;
	builder.add_setlist("ID{6}DATE{1993-08-15}SET1{a}".parse()?)?;
	let index = builder.build();
	assert_eq!(index.show_date(5), Some("1993-08-14"));
	assert_eq!(index.show_url(5), Some("http://example.com/5"));
	assert_eq!(index.show_date(6), Some("1993-08-15"));
	assert_eq!(index.show_url(6), None);
	assert_eq!(index.show_date(7), None);
	assert_eq!(index.show_url(7), None);
	Ok(())
}

#[test]
fn deeply_nested_queries_are_rejected() {
	let index = tests::phish_index();
	let ctx = QueryContext::with_timeout(Duration::from_secs(60));
	let too_deep = |q: &str| {
		matches!(
			index.query(&ctx, q),
			Err(QueryError::Syntax(SyntaxError::TooDeep { .. }))
		)
	};

	let not_chain = format!("{}cavern", "NOT ".repeat(100_000));
	assert!(too_deep(&not_chain));
	let and_chain = format!("cavern{}", " AND cavern".repeat(100_000));
	assert!(too_deep(&and_chain));
	let parens = format!("{}cavern{}", "(".repeat(100_000), ")".repeat(100_000));
	assert_eq!(query(&index, &parens), vec![1250454896, 1250458932]);

	// just under the limit still evaluates
	let even = format!("{}cavern", "NOT ".repeat(MAX_DEPTH - 1 - (MAX_DEPTH - 1) % 2));
	assert_eq!(query(&index, &even), vec![1250454896, 1250458932]);
}

const VOCABULARY: [&str; 6] = ["a", "b", "c", "d", "e", "missing"];

fn random_index(rng: &mut StdRng, shows: u64) -> Result<Index, FormatError> {
	let mut builder = IndexBuilder::default();
	for id in 0..shows {
		let sets = (0..rng.gen_range(1..3))
			.map(|_| {
				(0..rng.gen_range(0..4))
					.filter_map(|_| VOCABULARY[..5].choose(rng).copied())
					.collect()
			})
			.collect();
		builder.add_setlist(Setlist {
			id: id * 7 + 1,
			date: format!("day-{}", id),
			url: None,
			sets,
			encore: None,
		})?;
	}
	Ok(builder.build())
}

fn random_query(rng: &mut StdRng, depth: usize) -> Query {
	if depth == 0 || rng.gen_bool(0.3) {
		let token = VOCABULARY.choose(rng).copied().unwrap_or("a");
		return Query::Term(token.to_string());
	}
	match rng.gen_range(0..3) {
		0 => Query::Not(Box::new(random_query(rng, depth - 1))),
		1 => Query::And(
			Box::new(random_query(rng, depth - 1)),
			Box::new(random_query(rng, depth - 1)),
		),
		_ => Query::Or(
			Box::new(random_query(rng, depth - 1)),
			Box::new(random_query(rng, depth - 1)),
		),
	}
}

#[test]
fn generated_properties() -> Result<(), anyhow::Error> {
	let mut rng = StdRng::seed_from_u64(0x5e75);
	let ctx = QueryContext::background();
	for _ in 0..50 {
		let index = random_index(&mut rng, 20)?;
		let universe: Vec<ShowId> = index.universe().collect();
		for _ in 0..20 {
			let q = random_query(&mut rng, 4);
			let shows = evaluate(&ctx, &q, &index)?;
			assert!(shows.iter().all(|id| index.setlist(*id).is_some()));

			let double = Query::Not(Box::new(Query::Not(Box::new(q.clone()))));
			assert_eq!(evaluate(&ctx, &double, &index)?, shows, "query {}", q);

			let complement = evaluate(&ctx, &Query::Not(Box::new(q.clone())), &index)?;
			assert_eq!(shows.len() + complement.len(), universe.len());

			// printing and re-parsing keeps the meaning
			let text = q.to_string();
			let first = index.query(&ctx, &text)?;
			assert_eq!(first, shows.iter().copied().collect::<Vec<_>>());
			assert_eq!(index.query(&ctx, &text)?, first);
		}
	}
	Ok(())
}
