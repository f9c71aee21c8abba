//! High-level client flows powered by the request authorizer.

pub mod common;

mod login;
mod logout;

pub use login::{LoginRequest, RegisterRequest};

// self
use crate::{
	_prelude::*,
	authorizer::{AuthorizerConfig, RefreshMetrics, RequestAuthorizer},
	endpoint::ApiDescriptor,
	http::ApiTransport,
	session::{Session, SignOutHook},
	store::CredentialStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestNewsClient = NewsClient<ReqwestTransport>;

/// Entry point for the news reader backend.
///
/// The client owns a [`RequestAuthorizer`] (and through it the [`Session`]) so every flow and
/// resource call shares one credential pair and one in-flight refresh slot. Clones are cheap
/// and share all state.
pub struct NewsClient<C>
where
	C: ?Sized + ApiTransport,
{
	/// Authorizer every call is dispatched through.
	pub authorizer: RequestAuthorizer<C>,
}
impl<C> NewsClient<C>
where
	C: ?Sized + ApiTransport,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_transport(
		descriptor: ApiDescriptor,
		store: Arc<dyn CredentialStore>,
		hook: Arc<dyn SignOutHook>,
		transport: impl Into<Arc<C>>,
	) -> Self {
		let session = Session::new(store, hook);

		Self { authorizer: RequestAuthorizer::new(transport, descriptor, session) }
	}

	/// Replaces the recovery protocol tunables.
	pub fn with_config(mut self, config: AuthorizerConfig) -> Self {
		self.authorizer = self.authorizer.with_config(config);

		self
	}

	/// Session shared with the authorizer.
	pub fn session(&self) -> &Session {
		&self.authorizer.session
	}

	/// Backend routes.
	pub fn descriptor(&self) -> &ApiDescriptor {
		&self.authorizer.descriptor
	}

	/// Refresh counters.
	pub fn refresh_metrics(&self) -> &RefreshMetrics {
		&self.authorizer.refresh_metrics
	}
}
#[cfg(feature = "reqwest")]
impl NewsClient<ReqwestTransport> {
	/// Creates a client that provisions its own reqwest-backed transport.
	pub fn new(
		descriptor: ApiDescriptor,
		store: Arc<dyn CredentialStore>,
		hook: Arc<dyn SignOutHook>,
	) -> Self {
		Self::with_transport(descriptor, store, hook, ReqwestTransport::default())
	}
}
impl<C> Clone for NewsClient<C>
where
	C: ?Sized + ApiTransport,
{
	fn clone(&self) -> Self {
		Self { authorizer: self.authorizer.clone() }
	}
}
impl<C> Debug for NewsClient<C>
where
	C: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("NewsClient").field("authorizer", &self.authorizer).finish()
	}
}
