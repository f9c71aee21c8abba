//! Transport primitives for backend API calls.
//!
//! The module exposes [`ApiTransport`] alongside the owned [`ApiRequest`] and
//! [`ApiResponse`] values so downstream crates can plug in custom HTTP stacks (or scripted
//! fakes in tests) without touching the authorizer. Requests are plain data and cheap to
//! clone, which is what lets the authorizer replay a request after a token refresh.

// std
use std::time::Duration as StdDuration;
// crates.io
use http::{
	HeaderMap, HeaderValue, Method, StatusCode,
	header::{AUTHORIZATION, CONTENT_TYPE},
};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, DecodeError, StatusError},
};

/// Boxed future returned by [`ApiTransport::send`].
pub type TransportFuture<'a, E> = Pin<Box<dyn Future<Output = Result<ApiResponse, E>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing backend API calls.
///
/// The trait is the client's only dependency on an HTTP stack. Implementations must be
/// `Send + Sync + 'static` so they can be shared behind an `Arc` by the authorizer and every
/// clone of the client. A transport reports any HTTP status as `Ok`; only failures to obtain a
/// response (DNS, TCP, TLS, timeouts) are errors.
pub trait ApiTransport
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Sends the request and buffers the full response body.
	fn send(&self, request: ApiRequest) -> TransportFuture<'_, Self::TransportError>;
}

/// Owned HTTP request understood by every [`ApiTransport`].
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: Method,
	/// Absolute target URL, including any query string.
	pub url: Url,
	/// Request headers.
	pub headers: HeaderMap,
	/// Optional request body.
	pub body: Option<Vec<u8>>,
	/// Optional per-request timeout enforced by the transport.
	pub timeout: Option<StdDuration>,
}
impl ApiRequest {
	/// Creates a request without headers or body.
	pub fn new(method: Method, url: Url) -> Self {
		Self { method, url, headers: HeaderMap::new(), body: None, timeout: None }
	}

	/// Shorthand for a `GET` request.
	pub fn get(url: Url) -> Self {
		Self::new(Method::GET, url)
	}

	/// Shorthand for a `POST` request.
	pub fn post(url: Url) -> Self {
		Self::new(Method::POST, url)
	}

	/// Shorthand for a `DELETE` request.
	pub fn delete(url: Url) -> Self {
		Self::new(Method::DELETE, url)
	}

	/// Serializes `payload` as the JSON body.
	pub fn json<T>(mut self, payload: &T) -> Result<Self>
	where
		T: ?Sized + Serialize,
	{
		let body = serde_json::to_vec(payload)
			.map_err(|source| ConfigError::RequestEncode { source })?;

		self.headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		self.body = Some(body);

		Ok(self)
	}

	/// Appends query parameters to the URL.
	pub fn query<'a, I>(mut self, pairs: I) -> Self
	where
		I: IntoIterator<Item = (&'a str, String)>,
	{
		{
			let mut query = self.url.query_pairs_mut();

			for (name, value) in pairs {
				query.append_pair(name, &value);
			}
		}

		self
	}

	/// Sets the transport-enforced timeout.
	pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = Some(timeout);

		self
	}

	/// Sets (or replaces) the `Authorization: Bearer <token>` header.
	pub fn with_bearer(mut self, token: &str) -> Result<Self> {
		let mut value =
			HeaderValue::from_str(&format!("Bearer {token}")).map_err(ConfigError::from)?;

		value.set_sensitive(true);
		self.headers.insert(AUTHORIZATION, value);

		Ok(self)
	}

	/// Returns the bearer token carried by the request, if any.
	pub fn bearer_token(&self) -> Option<&str> {
		self.headers.get(AUTHORIZATION)?.to_str().ok()?.strip_prefix("Bearer ")
	}
}

/// Fully buffered HTTP response.
#[derive(Clone, Debug)]
pub struct ApiResponse {
	/// Response status.
	pub status: StatusCode,
	/// Response headers.
	pub headers: HeaderMap,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Creates a response with empty headers.
	pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
		Self { status, headers: HeaderMap::new(), body: body.into() }
	}

	/// Decodes the body as JSON, reporting the failing field path on mismatch.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut de = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut de)
			.map_err(|source| DecodeError { source, status: self.status }.into())
	}

	/// Returns the body as lossy UTF-8.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}

	/// Turns any non-2xx response into [`StatusError`].
	pub fn error_for_status(self) -> Result<Self> {
		if self.status.is_success() {
			Ok(self)
		} else {
			Err(StatusError { status: self.status, body: self.text() }.into())
		}
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiTransport for ReqwestTransport {
	type TransportError = ReqwestError;

	fn send(&self, request: ApiRequest) -> TransportFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let ApiRequest { method, url, headers, body, timeout } = request;
			let mut builder = client.request(method, url).headers(headers);

			if let Some(body) = body {
				builder = builder.body(body);
			}
			if let Some(timeout) = timeout {
				builder = builder.timeout(timeout);
			}

			let response = builder.send().await?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let body = response.bytes().await?.to_vec();

			Ok(ApiResponse { status, headers, body })
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::Error;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Failed to parse request URL fixture.")
	}

	#[test]
	fn with_bearer_replaces_existing_header() {
		let request = ApiRequest::get(url("https://api.example.com/dashboard/"))
			.with_bearer("first")
			.and_then(|r| r.with_bearer("second"))
			.expect("Bearer tokens should produce valid headers.");

		assert_eq!(request.bearer_token(), Some("second"));
		assert_eq!(request.headers.get_all(AUTHORIZATION).iter().count(), 1);
		assert!(request.headers[AUTHORIZATION].is_sensitive());
	}

	#[test]
	fn with_bearer_rejects_control_characters() {
		let err = ApiRequest::get(url("https://api.example.com/"))
			.with_bearer("bad\ntoken")
			.expect_err("Newlines cannot appear in header values.");

		assert!(matches!(err, Error::Config(ConfigError::InvalidHeader(_))));
	}

	#[test]
	fn query_and_json_helpers_compose() {
		let request = ApiRequest::post(url("https://api.example.com/dashboard/articles/"))
			.query([("page", "2".to_string()), ("category", "science".to_string())])
			.json(&serde_json::json!({ "article_id": 7 }))
			.expect("JSON payload should encode.");

		assert_eq!(request.url.query(), Some("page=2&category=science"));
		assert_eq!(request.headers[CONTENT_TYPE], "application/json");
		assert_eq!(request.body.as_deref(), Some(&b"{\"article_id\":7}"[..]));
		assert_eq!(request.bearer_token(), None);
	}

	#[test]
	fn json_decode_reports_field_path() {
		#[derive(Debug, Deserialize)]
		struct Count {
			#[allow(dead_code)]
			bookmark_count: u64,
		}

		let response = ApiResponse::new(StatusCode::OK, &b"{\"bookmark_count\":\"many\"}"[..]);
		let err = response.json::<Count>().expect_err("Strings are not counts.");

		match err {
			Error::Decode(decode) => {
				assert_eq!(decode.source.path().to_string(), "bookmark_count");
				assert_eq!(decode.status, StatusCode::OK);
			},
			other => panic!("Unexpected error: {other:?}."),
		}
	}

	#[test]
	fn error_for_status_keeps_body() {
		let ok = ApiResponse::new(StatusCode::NO_CONTENT, Vec::new()).error_for_status();

		assert!(ok.is_ok());

		let err = ApiResponse::new(StatusCode::NOT_FOUND, &b"{\"error\":\"Bookmark not found\"}"[..])
			.error_for_status()
			.expect_err("404 should become an error.");

		assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
		assert!(matches!(err, Error::Status(ref s) if s.body.contains("Bookmark not found")));
	}
}
