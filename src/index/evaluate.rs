use super::setlist::ShowId;
use super::Index;
use crate::parser::{Query, SyntaxError};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Deadline and cancellation signal for one query.
///
/// Clones share the cancellation flag, so a clone handed to another task
/// can stop an evaluation that is already running.
#[derive(Debug, Clone, Default)]
pub struct QueryContext {
	deadline: Option<Instant>,
	cancelled: Arc<AtomicBool>,
}

impl QueryContext {
	/// Never expires unless cancelled.
	pub fn background() -> Self {
		Self::default()
	}

	pub fn with_deadline(deadline: Instant) -> Self {
		Self {
			deadline: Some(deadline),
			..Self::default()
		}
	}

	pub fn with_timeout(timeout: Duration) -> Self {
		Self::with_deadline(Instant::now() + timeout)
	}

	pub fn deadline(&self) -> Option<Instant> {
		self.deadline
	}

	pub fn cancel(&self) {
		self.cancelled.store(true, Ordering::Relaxed);
	}

	/// True once cancel was requested or the deadline has passed. A deadline
	/// still in the future never stops evaluation.
	pub fn is_done(&self) -> bool {
		self.cancelled.load(Ordering::Relaxed)
			|| self.deadline.map_or(false, |deadline| Instant::now() >= deadline)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
	#[error("bad query: {0}")]
	Syntax(#[from] SyntaxError),
	#[error("evaluation cancelled")]
	Cancelled,
}

pub fn evaluate(
	ctx: &QueryContext,
	query: &Query,
	index: &Index,
) -> Result<BTreeSet<ShowId>, QueryError> {
	if ctx.is_done() {
		return Err(QueryError::Cancelled);
	}
	let shows = match query {
		Query::Term(token) => index.shows_with(token).cloned().unwrap_or_default(),
		Query::And(left, right) => {
			let left = evaluate(ctx, left, index)?;
			let right = evaluate(ctx, right, index)?;
			&left & &right
		}
		Query::Or(left, right) => {
			let left = evaluate(ctx, left, index)?;
			let right = evaluate(ctx, right, index)?;
			&left | &right
		}
		// Complement against every loaded show, not only shows that
		// appear in the reverse index.
		Query::Not(inner) => {
			let excluded = evaluate(ctx, inner, index)?;
			index.universe().filter(|id| !excluded.contains(id)).collect()
		}
	};
	Ok(shows)
}
