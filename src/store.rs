//! Storage contracts and built-in store implementations for persisted credentials.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::_prelude::*;

/// Boxed future returned by [`CredentialStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Persisted key-value backend that holds the session's credential pair.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Reads the value stored under `key`, if present.
	fn get(&self, key: CredentialKey) -> StoreFuture<'_, Option<String>>;

	/// Persists or replaces the value stored under `key`.
	fn set(&self, key: CredentialKey, value: String) -> StoreFuture<'_, ()>;

	/// Removes the value stored under `key`; removing a missing key is not an error.
	fn remove(&self, key: CredentialKey) -> StoreFuture<'_, ()>;
}

/// Well-known keys under which the credential pair is persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CredentialKey {
	/// Short-lived access token.
	#[serde(rename = "accessToken")]
	AccessToken,
	/// Longer-lived refresh token.
	#[serde(rename = "refreshToken")]
	RefreshToken,
}
impl CredentialKey {
	/// Both keys, in the order they are written.
	pub const ALL: [Self; 2] = [Self::AccessToken, Self::RefreshToken];

	/// Returns the persisted key name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::AccessToken => "accessToken",
			Self::RefreshToken => "refreshToken",
		}
	}
}
impl Display for CredentialKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
