use anyhow::Context;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	/// `SETSEARCHERINDEX`, or `$HOME/.setsearcherindex`.
	pub index_location: PathBuf,
	/// `SETSEARCHER_HTTP`
	pub http_addr: SocketAddr,
	/// `SETSEARCHER_QUERY_TIMEOUT_MS`
	pub query_timeout: Duration,
	/// `SETSEARCHER_RELOAD_SECS`; zero turns reloading off.
	pub reload_period: Option<Duration>,
}

const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_QUERY_TIMEOUT_MS: u64 = 2000;
const DEFAULT_RELOAD_SECS: u64 = 30;

impl Config {
	pub fn from_env() -> Result<Self, anyhow::Error> {
		Self::from_vars(|key| std::env::var(key).ok())
	}

	pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, anyhow::Error> {
		let index_location = match var("SETSEARCHERINDEX").filter(|v| !v.is_empty()) {
			Some(location) => PathBuf::from(location),
			None => PathBuf::from(var("HOME").unwrap_or_default()).join(".setsearcherindex"),
		};
		let http_addr = var("SETSEARCHER_HTTP")
			.unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string())
			.parse()
			.context("SETSEARCHER_HTTP is not a socket address")?;
		let query_timeout = match var("SETSEARCHER_QUERY_TIMEOUT_MS") {
			Some(ms) => ms.parse().context("SETSEARCHER_QUERY_TIMEOUT_MS is not a number")?,
			None => DEFAULT_QUERY_TIMEOUT_MS,
		};
		let reload_secs = match var("SETSEARCHER_RELOAD_SECS") {
			Some(secs) => secs.parse().context("SETSEARCHER_RELOAD_SECS is not a number")?,
			None => DEFAULT_RELOAD_SECS,
		};
		Ok(Config {
			index_location,
			http_addr,
			query_timeout: Duration::from_millis(query_timeout),
			reload_period: (reload_secs > 0).then(|| Duration::from_secs(reload_secs)),
		})
	}
}
