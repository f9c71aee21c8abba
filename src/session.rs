//! Session state shared by the authorizer and client flows.
//!
//! A [`Session`] owns the handle to the persisted credential pair, the cached signed-in flag,
//! and the [`SignOutHook`] that stands in for navigation to the sign-in surface. Every writer
//! goes through this type, so the credential pair has a single owner even when the client is
//! cloned across tasks.

// std
use std::sync::atomic::{AtomicBool, Ordering};
// self
use crate::{
	_prelude::*,
	auth::{CredentialPair, TokenSecret},
	obs::{self, FlowKind},
	store::{CredentialKey, CredentialStore},
};

/// Why a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignOutReason {
	/// The user asked to sign out.
	Logout,
	/// The refresh endpoint rejected the refresh token or could not be reached.
	RefreshFailed,
	/// A guarded operation found no stored access token.
	Unauthenticated,
}
impl SignOutReason {
	/// Returns a stable label suitable for logs.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Logout => "logout",
			Self::RefreshFailed => "refresh_failed",
			Self::Unauthenticated => "unauthenticated",
		}
	}
}

/// Navigation seam invoked after credentials are cleared.
///
/// Implementations typically route the user to the sign-in surface. The hook may run several
/// times for one session (every request that was waiting on a failed refresh signs out), so it
/// must be idempotent.
pub trait SignOutHook
where
	Self: Send + Sync,
{
	/// Called after the credential pair has been cleared.
	fn on_sign_out(&self, reason: SignOutReason);
}

/// Hook that only records the sign-out as a trace step.
#[derive(Clone, Copy, Debug, Default)]
pub struct TraceSignOutHook;
impl SignOutHook for TraceSignOutHook {
	fn on_sign_out(&self, reason: SignOutReason) {
		obs::trace_step(FlowKind::Logout, reason.as_str());
	}
}

/// Credential pair owner plus the signed-in flag.
pub struct Session {
	store: Arc<dyn CredentialStore>,
	hook: Arc<dyn SignOutHook>,
	signed_in: AtomicBool,
}
impl Session {
	/// Creates a session over `store` that notifies `hook` on sign-out.
	pub fn new(store: Arc<dyn CredentialStore>, hook: Arc<dyn SignOutHook>) -> Self {
		Self { store, hook, signed_in: AtomicBool::new(false) }
	}

	/// Creates a session whose sign-out hook only traces.
	pub fn with_store(store: Arc<dyn CredentialStore>) -> Self {
		Self::new(store, Arc::new(TraceSignOutHook))
	}

	/// Returns the stored access token; empty values count as absent.
	pub async fn access_token(&self) -> Result<Option<TokenSecret>> {
		self.read(CredentialKey::AccessToken).await
	}

	/// Returns the stored refresh token; empty values count as absent.
	pub async fn refresh_token(&self) -> Result<Option<TokenSecret>> {
		self.read(CredentialKey::RefreshToken).await
	}

	/// Persists both tokens and marks the session signed in.
	pub async fn store_credentials(&self, pair: &CredentialPair) -> Result<()> {
		self.store.set(CredentialKey::AccessToken, pair.access.expose().to_owned()).await?;
		self.store.set(CredentialKey::RefreshToken, pair.refresh.expose().to_owned()).await?;
		self.signed_in.store(true, Ordering::Release);

		Ok(())
	}

	/// Removes both tokens without notifying the hook.
	pub async fn clear_credentials(&self) -> Result<()> {
		self.signed_in.store(false, Ordering::Release);

		for key in CredentialKey::ALL {
			self.store.remove(key).await?;
		}

		Ok(())
	}

	/// Reads the store and refreshes the cached signed-in flag.
	pub async fn is_authenticated(&self) -> Result<bool> {
		let authenticated = self.access_token().await?.is_some();

		self.signed_in.store(authenticated, Ordering::Release);

		Ok(authenticated)
	}

	/// Cached signed-in flag as of the last credential write, clear, or
	/// [`is_authenticated`](Self::is_authenticated) check.
	pub fn signed_in(&self) -> bool {
		self.signed_in.load(Ordering::Acquire)
	}

	/// Clears credentials and notifies the hook. Calling it repeatedly is harmless.
	pub async fn sign_out(&self, reason: SignOutReason) -> Result<()> {
		let cleared = self.clear_credentials().await;

		self.hook.on_sign_out(reason);

		cleared
	}

	async fn read(&self, key: CredentialKey) -> Result<Option<TokenSecret>> {
		let value = self.store.get(key).await?;

		Ok(value.filter(|v| !v.is_empty()).map(TokenSecret::new))
	}
}
impl Debug for Session {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Session").field("signed_in", &self.signed_in()).finish()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::AtomicUsize;
	// self
	use super::*;
	use crate::store::MemoryStore;

	#[derive(Default)]
	struct CountingHook(AtomicUsize);
	impl SignOutHook for CountingHook {
		fn on_sign_out(&self, _reason: SignOutReason) {
			self.0.fetch_add(1, Ordering::SeqCst);
		}
	}

	fn session() -> (Session, Arc<MemoryStore>, Arc<CountingHook>) {
		let store = Arc::new(MemoryStore::default());
		let hook = Arc::new(CountingHook::default());

		(Session::new(store.clone(), hook.clone()), store, hook)
	}

	#[tokio::test]
	async fn stored_credentials_round_trip() {
		let (session, _, _) = session();

		session
			.store_credentials(&CredentialPair::new("T1", "R1"))
			.await
			.expect("Credential writes should succeed.");

		assert_eq!(
			session.access_token().await.expect("Reads should succeed.").map(|t| t.into_inner()),
			Some("T1".into()),
		);
		assert_eq!(
			session.refresh_token().await.expect("Reads should succeed.").map(|t| t.into_inner()),
			Some("R1".into()),
		);
		assert!(session.signed_in());

		session.clear_credentials().await.expect("Clearing should succeed.");

		assert!(session.access_token().await.expect("Reads should succeed.").is_none());
		assert!(!session.signed_in());
	}

	#[tokio::test]
	async fn empty_tokens_count_as_absent() {
		let (session, store, _) = session();

		store
			.set(CredentialKey::AccessToken, String::new())
			.await
			.expect("Memory store writes should succeed.");

		assert!(!session.is_authenticated().await.expect("Reads should succeed."));
	}

	#[tokio::test]
	async fn repeated_sign_out_is_harmless() {
		let (session, store, hook) = session();

		session
			.store_credentials(&CredentialPair::new("T1", "R1"))
			.await
			.expect("Credential writes should succeed.");

		for _ in 0..3 {
			session
				.sign_out(SignOutReason::RefreshFailed)
				.await
				.expect("Sign-out should succeed.");
		}

		assert!(store.is_empty());
		assert!(!session.signed_in());
		assert_eq!(hook.0.load(Ordering::SeqCst), 3);
	}
}
