//! Shared helpers for flow implementations (validation messages, JSON resource calls).

// crates.io
use serde::de::DeserializeOwned;
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	flows::NewsClient,
	http::{ApiRequest, ApiTransport},
};

/// Message used when a rejection carries no readable detail.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred!";

/// Distills a login/register rejection body into one human-readable message.
///
/// A bare string body (JSON string or plain text) is the message. For a JSON object, the
/// first `email` message wins, then the first `password` message; otherwise every message is
/// flattened and joined with a space.
pub fn validation_message(body: &str) -> String {
	let trimmed = body.trim();
	let value = match serde_json::from_str::<Value>(trimmed) {
		Ok(value) => value,
		Err(_) if trimmed.is_empty() => return UNKNOWN_ERROR_MESSAGE.into(),
		Err(_) => return trimmed.to_owned(),
	};
	let message = match &value {
		Value::String(message) => Some(message.clone()),
		Value::Object(fields) => ["email", "password"]
			.into_iter()
			.find_map(|field| fields.get(field).and_then(first_message))
			.or_else(|| {
				let joined = fields.values().flat_map(messages).collect::<Vec<_>>().join(" ");

				Some(joined)
			}),
		_ => None,
	};

	message.filter(|m| !m.is_empty()).unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.into())
}

/// Turns a 4xx status into [`Error::Validation`]; every other error passes through.
pub fn into_validation_error(err: Error) -> Error {
	match err {
		Error::Status(status) if status.status.is_client_error() =>
			Error::Validation { message: validation_message(&status.body) },
		other => other,
	}
}

fn first_message(value: &Value) -> Option<String> {
	messages(value).into_iter().next()
}

fn messages(value: &Value) -> Vec<String> {
	match value {
		Value::String(message) => vec![message.clone()],
		Value::Array(items) => items
			.iter()
			.filter_map(|item| match item {
				Value::String(message) => Some(message.clone()),
				Value::Null => None,
				other => Some(other.to_string()),
			})
			.collect(),
		Value::Null => Vec::new(),
		other => vec![other.to_string()],
	}
}

impl<C> NewsClient<C>
where
	C: ?Sized + ApiTransport,
{
	/// Dispatches an authorized request and decodes the JSON response.
	pub(crate) async fn fetch_json<T>(&self, request: ApiRequest) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.authorizer.dispatch(request).await?.json()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::StatusError;

	#[test]
	fn email_errors_win_over_password_errors() {
		let body = r#"{"password":["Too short."],"email":["Enter a valid email address."]}"#;

		assert_eq!(validation_message(body), "Enter a valid email address.");
	}

	#[test]
	fn password_errors_win_over_other_fields() {
		let body = r#"{"name":["Required."],"password":["This field may not be blank."]}"#;

		assert_eq!(validation_message(body), "This field may not be blank.");
	}

	#[test]
	fn other_fields_are_flattened() {
		let body = r#"{"error":"Invalid credentials","detail":["Account locked.","Retry later."]}"#;

		assert_eq!(validation_message(body), "Invalid credentials Account locked. Retry later.");
	}

	#[test]
	fn string_bodies_are_used_verbatim() {
		assert_eq!(validation_message("\"Email already registered\""), "Email already registered");
		assert_eq!(validation_message("Bad Request"), "Bad Request");
	}

	#[test]
	fn empty_bodies_fall_back_to_unknown() {
		assert_eq!(validation_message(""), UNKNOWN_ERROR_MESSAGE);
		assert_eq!(validation_message("{}"), UNKNOWN_ERROR_MESSAGE);
		assert_eq!(validation_message("null"), UNKNOWN_ERROR_MESSAGE);
	}

	#[test]
	fn only_client_errors_become_validation_errors() {
		let rejected = into_validation_error(
			StatusError {
				status: http::StatusCode::BAD_REQUEST,
				body: r#"{"email":["Taken."]}"#.into(),
			}
			.into(),
		);

		assert!(matches!(rejected, Error::Validation { ref message } if message == "Taken."));

		let outage = into_validation_error(
			StatusError { status: http::StatusCode::BAD_GATEWAY, body: String::new() }.into(),
		);

		assert_eq!(outage.status(), Some(http::StatusCode::BAD_GATEWAY));
	}
}
