//! Client-level error types shared across the authorizer, flows, resources, and stores.

// crates.io
use http::StatusCode;
// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Credential store failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeouts).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response body did not match the expected JSON shape.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// Backend answered with a non-success status that was not recovered.
	#[error(transparent)]
	Status(#[from] StatusError),
	/// Session refresh failed; every request waiting on that refresh receives a clone.
	#[error(transparent)]
	Refresh(#[from] RefreshError),

	/// Login or registration was rejected with field-level detail.
	#[error("{message}")]
	Validation {
		/// Human-readable message distilled from the backend's field errors.
		message: String,
	},
	/// No refresh token is stored, so the session cannot be renewed.
	#[error("Refresh token not available.")]
	MissingRefreshToken,
	/// The caller requires a signed-in session but no access token is stored.
	#[error("No authenticated session is available.")]
	NotAuthenticated,
	/// Bookmark removal targeted an article that is not bookmarked.
	#[error("Bookmark for article {article_id} not found or already removed.")]
	BookmarkNotFound {
		/// Article identifier supplied by the caller.
		article_id: u64,
	},
}
impl Error {
	/// Returns the HTTP status carried by [`Error::Status`], if any.
	pub fn status(&self) -> Option<StatusCode> {
		match self {
			Self::Status(err) => Some(err.status),
			_ => None,
		}
	}

	/// Returns `true` for a raw 401 response.
	pub fn is_unauthorized(&self) -> bool {
		self.status() == Some(StatusCode::UNAUTHORIZED)
	}
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// API descriptor failed validation.
	#[error(transparent)]
	InvalidDescriptor(#[from] crate::endpoint::ApiDescriptorError),
	/// A route could not be resolved against the base URL.
	#[error("Route `{route}` cannot be resolved against the base URL.")]
	InvalidRoute {
		/// Route that failed to resolve.
		route: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request payload could not be serialized.
	#[error("Request payload could not be encoded as JSON.")]
	RequestEncode {
		/// Underlying serialization failure.
		#[source]
		source: serde_json::Error,
	},
	/// Header value contains characters that HTTP forbids.
	#[error("Header value is not valid HTTP.")]
	InvalidHeader(#[from] http::header::InvalidHeaderValue),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// JSON decoding failure, including the path of the offending field.
#[derive(Debug, ThisError)]
#[error("Response body is not valid JSON at `{}`.", .source.path())]
pub struct DecodeError {
	/// Structured parsing failure.
	#[source]
	pub source: serde_path_to_error::Error<serde_json::Error>,
	/// HTTP status of the response that failed to decode.
	pub status: StatusCode,
}

/// Non-success HTTP response surfaced to the caller.
#[derive(Clone, Debug, ThisError)]
#[error("Backend responded with HTTP {status}.")]
pub struct StatusError {
	/// Response status.
	pub status: StatusCode,
	/// Response body decoded as lossy UTF-8.
	pub body: String,
}
impl StatusError {
	/// Parses the body as JSON, returning `None` for empty or non-JSON bodies.
	pub fn json_body(&self) -> Option<serde_json::Value> {
		serde_json::from_str(&self.body).ok()
	}
}

/// Outcome of a failed refresh, shared by the initiating request and every waiter.
#[derive(Clone, Debug, ThisError)]
#[error("Session refresh failed: {source}")]
pub struct RefreshError {
	source: Arc<Error>,
}
impl RefreshError {
	/// Wraps the error that made the refresh fail.
	pub fn new(cause: Error) -> Self {
		Self { source: Arc::new(cause) }
	}

	/// Returns the underlying cause.
	pub fn cause(&self) -> &Error {
		&self.source
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn refresh_error_clones_share_the_cause() {
		let err = RefreshError::new(Error::MissingRefreshToken);
		let copy = err.clone();

		assert!(matches!(copy.cause(), Error::MissingRefreshToken));
		assert_eq!(err.to_string(), "Session refresh failed: Refresh token not available.");

		let wrapped: Error = copy.into();
		let source = StdError::source(&wrapped)
			.expect("Refresh errors should expose their cause as a source.");

		assert_eq!(source.to_string(), "Refresh token not available.");
	}

	#[test]
	fn only_raw_401_counts_as_unauthorized() {
		let unauthorized: Error =
			StatusError { status: StatusCode::UNAUTHORIZED, body: String::new() }.into();
		let forbidden: Error =
			StatusError { status: StatusCode::FORBIDDEN, body: String::new() }.into();
		let refresh: Error = RefreshError::new(unauthorized_status()).into();

		assert!(unauthorized.is_unauthorized());
		assert!(!forbidden.is_unauthorized());
		assert!(!refresh.is_unauthorized());
	}

	#[test]
	fn status_error_exposes_json_body() {
		let err = StatusError {
			status: StatusCode::BAD_REQUEST,
			body: "{\"error\":\"Article ID is required\"}".into(),
		};

		assert_eq!(
			err.json_body().and_then(|v| v["error"].as_str().map(str::to_owned)),
			Some("Article ID is required".into()),
		);
		assert!(StatusError { status: StatusCode::BAD_GATEWAY, body: "<html>".into() }
			.json_body()
			.is_none());
	}

	fn unauthorized_status() -> Error {
		StatusError { status: StatusCode::UNAUTHORIZED, body: String::new() }.into()
	}
}
