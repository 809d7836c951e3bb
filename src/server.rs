//! JSON API over the current index.
//!
//! * `GET|POST /api/search?query=...` -> `{"count": 2, "dates": [...]}`
//! * `GET /api/searchboxconfig` -> keywords, parentheses and the song catalog
//!   for the search box autocomplete.

use crate::config::Config;
use crate::handle::IndexHandle;
use crate::index::{Index, QueryContext, QueryError};
use hyper::header::{HeaderValue, CACHE_CONTROL, CONTENT_TYPE};
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, Response, Server, StatusCode};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub async fn serve(config: &Config, handle: Arc<IndexHandle>) -> Result<(), anyhow::Error> {
	let timeout = config.query_timeout;
	let make_service = make_service_fn(move |_conn| {
		let handle = Arc::clone(&handle);
		async move {
			Ok::<_, Infallible>(service_fn(move |req| route(Arc::clone(&handle), timeout, req)))
		}
	});

	let server = Server::try_bind(&config.http_addr)?.serve(make_service);
	log::info!("listening on http://{}", config.http_addr);
	server
		.with_graceful_shutdown(async {
			if let Err(err) = tokio::signal::ctrl_c().await {
				log::error!("cannot listen for ctrl-c: {}", err);
				// without a signal handler, run until the process is killed
				std::future::pending::<()>().await;
			}
			log::info!("shutting down");
		})
		.await?;
	Ok(())
}

pub async fn route(
	handle: Arc<IndexHandle>,
	timeout: Duration,
	req: Request<Body>,
) -> Result<Response<Body>, Infallible> {
	log::debug!("{} {}", req.method(), req.uri());
	let response = match (req.method(), req.uri().path()) {
		(&Method::GET, "/api/search") | (&Method::POST, "/api/search") => {
			search(handle.current(), timeout, req).await
		}
		(&Method::GET, "/api/searchboxconfig") => searchbox_config(&handle.current()),
		_ => Err(ApiError::NotFound),
	};
	Ok(response.unwrap_or_else(ApiError::into_response))
}

#[derive(Debug)]
enum ApiError {
	BadRequest(String),
	NotFound,
	Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
	message: &'a str,
}

impl ApiError {
	fn into_response(self) -> Response<Body> {
		let (status, message) = match &self {
			ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message.as_str()),
			ApiError::NotFound => (StatusCode::NOT_FOUND, "Not Found"),
			ApiError::Internal(message) => {
				log::error!("internal error: {}", message);
				(StatusCode::INTERNAL_SERVER_ERROR, "Internal Error")
			}
		};
		let body = serde_json::to_vec(&ErrorBody { message }).unwrap_or_default();
		let mut response = Response::new(Body::from(body));
		*response.status_mut() = status;
		response
			.headers_mut()
			.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		response
	}
}

fn json_response<T: Serialize>(value: &T) -> Result<Response<Body>, ApiError> {
	let body = serde_json::to_vec(value).map_err(|err| ApiError::Internal(err.to_string()))?;
	Response::builder()
		.status(StatusCode::OK)
		.header(CONTENT_TYPE, "application/json")
		.body(Body::from(body))
		.map_err(|err| ApiError::Internal(err.to_string()))
}

#[derive(Debug, Default, Deserialize)]
struct SearchRequest {
	#[serde(default)]
	query: String,
}

#[derive(Debug, Serialize)]
struct SearchResults {
	count: usize,
	dates: Vec<String>,
}

/// The `query` URL parameter wins over the same field in a JSON body.
async fn search(
	index: Arc<Index>,
	timeout: Duration,
	req: Request<Body>,
) -> Result<Response<Body>, ApiError> {
	let param = req.uri().query().and_then(|query| {
		url::form_urlencoded::parse(query.as_bytes())
			.find(|(key, _)| key == "query")
			.map(|(_, value)| value.into_owned())
	});
	let body = hyper::body::to_bytes(req.into_body())
		.await
		.map_err(|err| ApiError::BadRequest(format!("cannot read body: {}", err)))?;

	let mut request = if body.is_empty() {
		SearchRequest::default()
	} else {
		serde_json::from_slice::<SearchRequest>(&body)
			.map_err(|_| ApiError::BadRequest("Invalid request".to_string()))?
	};
	if let Some(param) = param.filter(|param| !param.is_empty()) {
		request.query = param;
	}
	if request.query.is_empty() {
		return Err(ApiError::BadRequest("Missing query param".to_string()));
	}

	let start = Instant::now();
	let ctx = QueryContext::with_timeout(timeout);
	let shows = match index.query(&ctx, &request.query) {
		Ok(shows) => shows,
		Err(QueryError::Syntax(err)) => return Err(ApiError::BadRequest(err.to_string())),
		Err(err @ QueryError::Cancelled) => {
			return Err(ApiError::Internal(format!("{:?}: {}", request.query, err)))
		}
	};
	log::debug!(
		"query {:?} matched {} shows in {:.2?}",
		request.query,
		shows.len(),
		start.elapsed()
	);

	let mut dates: Vec<String> = shows
		.iter()
		.filter_map(|id| index.show_date(*id))
		.map(str::to_string)
		.collect();
	dates.sort();
	json_response(&SearchResults {
		count: shows.len(),
		dates,
	})
}

#[derive(Debug, Serialize)]
struct Value<'a> {
	data: &'a str,
	#[serde(skip_serializing_if = "Option::is_none")]
	text: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct ValueKind<'a> {
	name: &'static str,
	color: &'static str,
	values: Vec<Value<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchboxConfig<'a> {
	value_kinds: Vec<ValueKind<'a>>,
}

fn plain(data: &'static str) -> Value<'static> {
	Value { data, text: None }
}

fn searchbox_config(index: &Index) -> Result<Response<Body>, ApiError> {
	let songs = index
		.songs()
		.iter()
		.map(|(name, token)| Value {
			data: token.as_str(),
			text: Some(name.as_str()),
		})
		.collect();
	let config = SearchboxConfig {
		value_kinds: vec![
			ValueKind {
				name: "special-characters",
				color: "green",
				values: vec![plain(")"), plain("(")],
			},
			ValueKind {
				name: "keywords",
				color: "blue",
				values: vec![plain("AND"), plain("OR"), plain("NOT")],
			},
			ValueKind {
				name: "songs",
				color: "red",
				values: songs,
			},
		],
	};
	let mut response = json_response(&config)?;
	// changes only when the index is rebuilt
	response.headers_mut().insert(
		CACHE_CONTROL,
		HeaderValue::from_static("private, max-age=86400"),
	);
	Ok(response)
}

#[cfg(test)]
#[path = "tests/server.rs"]
mod server_test;
