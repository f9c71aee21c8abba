//! Access/refresh credential pair and the token payloads returned by the backend.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Credentials persisted for a signed-in session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
	/// Short-lived token attached to protected requests.
	pub access: TokenSecret,
	/// Longer-lived token used solely to mint a new access token.
	pub refresh: TokenSecret,
}
impl CredentialPair {
	/// Creates a pair from raw token strings.
	pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
		Self { access: TokenSecret::new(access), refresh: TokenSecret::new(refresh) }
	}
}

/// Payload returned by the refresh endpoint.
///
/// Backends that do not rotate refresh tokens omit `refresh`; the previous refresh token then
/// stays in use.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
	/// Newly minted access token.
	pub access: TokenSecret,
	/// Rotated refresh token, when the backend rotates.
	#[serde(default)]
	pub refresh: Option<TokenSecret>,
}
impl TokenResponse {
	/// Builds the pair to persist, keeping `previous_refresh` when no rotation happened.
	pub fn into_pair(self, previous_refresh: TokenSecret) -> CredentialPair {
		CredentialPair { access: self.access, refresh: self.refresh.unwrap_or(previous_refresh) }
	}
}
