//! Async API client for the Newsdesk news reader: bearer authorization with singleflight token
//! refresh, persisted credentials, and typed dashboard, article, bookmark, and weather resources.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod authorizer;
pub mod endpoint;
pub mod error;
pub mod flows;
pub mod http;
pub mod obs;
pub mod session;
pub mod store;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::CredentialPair,
		endpoint::ApiDescriptor,
		flows::NewsClient,
		http::ReqwestTransport,
		session::{SignOutHook, SignOutReason},
		store::{CredentialKey, CredentialStore, MemoryStore},
	};

	/// Client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = NewsClient<ReqwestTransport>;

	/// Sign-out hook that records every notification it receives.
	#[derive(Debug, Default)]
	pub struct RecordingSignOutHook {
		reasons: Mutex<Vec<SignOutReason>>,
	}
	impl RecordingSignOutHook {
		/// Number of sign-out notifications observed so far.
		pub fn count(&self) -> usize {
			self.reasons.lock().len()
		}

		/// Reasons observed so far, in arrival order.
		pub fn reasons(&self) -> Vec<SignOutReason> {
			self.reasons.lock().clone()
		}
	}
	impl SignOutHook for RecordingSignOutHook {
		fn on_sign_out(&self, reason: SignOutReason) {
			self.reasons.lock().push(reason);
		}
	}

	/// Builds a descriptor rooted at a mock server's base URL.
	pub fn test_descriptor(base_url: &str) -> ApiDescriptor {
		let base_url = Url::parse(base_url).expect("Mock server base URL should parse.");

		ApiDescriptor::new(base_url).expect("Default descriptor should build.")
	}

	/// Constructs a [`NewsClient`] backed by an in-memory store, a recording sign-out hook, and
	/// the reqwest transport used across integration tests.
	pub fn build_reqwest_test_client(
		base_url: &str,
	) -> (ReqwestTestClient, Arc<MemoryStore>, Arc<RecordingSignOutHook>) {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn CredentialStore> = store_backend.clone();
		let hook = Arc::new(RecordingSignOutHook::default());
		let client = NewsClient::new(test_descriptor(base_url), store, hook.clone());

		(client, store_backend, hook)
	}

	/// Seeds the store with a credential pair, as a previous login would have.
	pub async fn seed_credentials(store: &dyn CredentialStore, pair: &CredentialPair) {
		store
			.set(CredentialKey::AccessToken, pair.access.expose().to_owned())
			.await
			.expect("Seeding the access token should succeed.");
		store
			.set(CredentialKey::RefreshToken, pair.refresh.expose().to_owned())
			.await
			.expect("Seeding the refresh token should succeed.");
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use ::http as http_types;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
