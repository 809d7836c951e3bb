use setsearch::config::Config;
use setsearch::handle::IndexHandle;
use setsearch::index::{self, Index, QueryContext};
use setsearch::parser;
use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

const USAGE: &str = "usage: setsearch [serve | query [expression] | check]

The index is read from $SETSEARCHERINDEX, or else $HOME/.setsearcherindex.
Without an expression, query reads one expression per line from stdin.";

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let config = Config::from_env()?;

	let mut args = std::env::args().skip(1);
	match args.next().as_deref() {
		None | Some("serve") => serve(config).await,
		Some("query") => query(&config, &args.collect::<Vec<_>>().join(" ")),
		Some("check") => check(&config),
		Some(other) => Err(anyhow::anyhow!("unknown command {:?}\n{}", other, USAGE)),
	}
}

async fn serve(config: Config) -> Result<(), anyhow::Error> {
	let location = config.index_location.clone();
	let index = tokio::task::spawn_blocking(move || Index::open(location)).await??;
	log::info!(
		"loaded index from {}: {} shows, {} songs",
		config.index_location.display(),
		index.len(),
		index.songs().len()
	);
	let handle = Arc::new(IndexHandle::new(index));
	if let Some(period) = config.reload_period {
		Arc::clone(&handle).watch(config.index_location.clone(), period);
	}
	setsearch::server::serve(&config, handle).await
}

fn query(config: &Config, expression: &str) -> Result<(), anyhow::Error> {
	let index = Index::open(&config.index_location)?;
	let timeout = config.query_timeout;
	if expression.trim().is_empty() {
		return prompt(&index, timeout, std::io::stdin().lock(), std::io::stdout());
	}
	run_query(&index, timeout, expression, &mut std::io::stdout())
}

/// Answers one expression per input line until EOF.
fn prompt(
	index: &Index,
	timeout: Duration,
	mut input: impl BufRead,
	mut output: impl Write,
) -> Result<(), anyhow::Error> {
	let mut line = String::new();
	loop {
		write!(output, "> ")?;
		output.flush()?;
		line.clear();
		if input.read_line(&mut line)? == 0 {
			return Ok(());
		}
		let expression = line.trim();
		if expression.is_empty() {
			continue;
		}
		// keep reading after a bad expression
		if let Err(err) = run_query(index, timeout, expression, &mut output) {
			writeln!(output, "error: {:#}", err)?;
		}
	}
}

fn run_query(
	index: &Index,
	timeout: Duration,
	expression: &str,
	output: &mut impl Write,
) -> Result<(), anyhow::Error> {
	let query = parser::parse(expression)?;
	for term in query.terms() {
		if index.shows_with(term).is_none() {
			log::warn!("no show contains {:?}", term);
		}
	}
	let shows = index.query(&QueryContext::with_timeout(timeout), expression)?;
	log::info!("{} matched {} shows", query, shows.len());
	for id in shows {
		writeln!(
			output,
			"{}\t{}\t{}",
			id,
			index.show_date(id).unwrap_or_default(),
			index.show_url(id).unwrap_or_default()
		)?;
	}
	Ok(())
}

fn check(config: &Config) -> Result<(), anyhow::Error> {
	let bytes = std::fs::read(&config.index_location)?;
	let index = index::format::read(bytes.as_slice())?;
	if index.to_bytes() != bytes {
		anyhow::bail!(
			"{} does not re-encode to the same bytes",
			config.index_location.display()
		);
	}
	log::info!(
		"{} ok: {} shows, {} songs",
		config.index_location.display(),
		index.len(),
		index.songs().len()
	);
	Ok(())
}
