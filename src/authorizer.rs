//! Bearer authorization with singleflight token refresh and request replay.
//!
//! [`RequestAuthorizer::dispatch`] attaches the stored access token to every request that
//! does not target an auth endpoint. When such a request comes back 401 the authorizer runs
//! the recovery protocol: the first 401 starts a refresh call, every 401 that arrives while
//! that call is outstanding attaches to it, and once it settles each participant either
//! replays its request with the fresh token or fails with the shared [`RefreshError`] and
//! signs the session out.

mod flight;
mod metrics;

pub use metrics::RefreshMetrics;

// std
use std::time::Duration as StdDuration;
// self
use crate::{
	_prelude::*,
	auth::{TokenResponse, TokenSecret},
	endpoint::{ApiDescriptor, ApiRoute},
	error::{RefreshError, TransportError},
	http::{ApiRequest, ApiResponse, ApiTransport},
	obs::{self, FlowKind, FlowOutcome, FlowSpan, RecoveryPath},
	session::{Session, SignOutReason},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;
use flight::{FlightOutcome, RefreshFlight};

#[cfg(feature = "reqwest")]
/// Authorizer specialized for the crate's default reqwest transport.
pub type ReqwestAuthorizer = RequestAuthorizer<ReqwestTransport>;

/// Tunables for the recovery protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthorizerConfig {
	/// Upper bound on a single refresh call; expiry counts as a refresh failure.
	pub refresh_timeout: StdDuration,
}
impl AuthorizerConfig {
	const DEFAULT_REFRESH_TIMEOUT: StdDuration = StdDuration::from_secs(30);

	/// Overrides the refresh timeout (defaults to 30 seconds).
	pub fn with_refresh_timeout(mut self, timeout: StdDuration) -> Self {
		self.refresh_timeout = timeout;

		self
	}
}
impl Default for AuthorizerConfig {
	fn default() -> Self {
		Self { refresh_timeout: Self::DEFAULT_REFRESH_TIMEOUT }
	}
}

/// Attaches bearer credentials to outgoing calls and recovers from expired access tokens.
///
/// The authorizer owns the in-flight refresh slot; clones share it, so every clone observes
/// the same at-most-one-refresh guarantee.
pub struct RequestAuthorizer<C>
where
	C: ?Sized + ApiTransport,
{
	/// HTTP transport used for every outbound request.
	pub transport: Arc<C>,
	/// Backend routes and auth endpoint list.
	pub descriptor: Arc<ApiDescriptor>,
	/// Credential pair owner.
	pub session: Arc<Session>,
	/// Recovery protocol tunables.
	pub config: AuthorizerConfig,
	/// Shared counters for refresh outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
	flight: Arc<Mutex<Option<Arc<RefreshFlight>>>>,
}
impl<C> RequestAuthorizer<C>
where
	C: ?Sized + ApiTransport,
{
	/// Creates an authorizer over the provided transport, descriptor, and session.
	pub fn new(
		transport: impl Into<Arc<C>>,
		descriptor: impl Into<Arc<ApiDescriptor>>,
		session: impl Into<Arc<Session>>,
	) -> Self {
		Self {
			transport: transport.into(),
			descriptor: descriptor.into(),
			session: session.into(),
			config: AuthorizerConfig::default(),
			refresh_metrics: Default::default(),
			flight: Default::default(),
		}
	}

	/// Replaces the recovery protocol tunables.
	pub fn with_config(mut self, config: AuthorizerConfig) -> Self {
		self.config = config;

		self
	}

	/// Returns `true` while a refresh call is outstanding.
	pub fn refresh_in_flight(&self) -> bool {
		matches!(&*self.flight.lock(), Some(flight) if flight.outcome().is_none())
	}

	/// Adds `Authorization: Bearer <access>` unless the request targets an auth endpoint.
	///
	/// Without a stored access token the request is returned unchanged and left for the
	/// backend to reject.
	pub async fn authorize(&self, request: ApiRequest) -> Result<ApiRequest> {
		if self.descriptor.is_auth_endpoint(&request.url) {
			return Ok(request);
		}

		match self.session.access_token().await? {
			Some(token) => request.with_bearer(token.expose()),
			None => Ok(request),
		}
	}

	/// Sends the request, recovering transparently from a 401 on protected routes.
	///
	/// Any non-2xx response surfaces as [`Error::Status`]; transport failures surface as
	/// [`Error::Transport`]. Neither is retried, except for the 401 recovery described in
	/// the module docs.
	pub async fn dispatch(&self, request: ApiRequest) -> Result<ApiResponse> {
		const KIND: FlowKind = FlowKind::Request;

		let span = FlowSpan::new(KIND, "dispatch");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				if self.descriptor.is_auth_endpoint(&request.url) {
					return self.send(request).await;
				}

				let authorized = self.authorize(request).await?;

				match self.send(authorized.clone()).await {
					Err(err) if err.is_unauthorized() => self.recover(authorized).await,
					result => result,
				}
			})
			.await;

		obs::record_result(KIND, &result);

		result
	}

	/// Refreshes the access token now, joining a refresh that is already in flight.
	///
	/// A failed refresh signs the session out, exactly as it does inside the recovery
	/// protocol.
	pub async fn refresh(&self) -> Result<TokenSecret> {
		let flight = match self.claim(None, false) {
			Claim::Replay(token) => return Ok(token),
			Claim::Started(flight) | Claim::Joined(flight) => flight,
		};

		self.settle(&flight).await
	}

	/// Clears credentials, forgets the last settled refresh, and notifies the sign-out hook.
	pub async fn sign_out(&self, reason: SignOutReason) -> Result<()> {
		self.forget_settled_flight();
		self.session.sign_out(reason).await
	}

	/// Drops a settled refresh outcome so it can never be replayed into a new session.
	pub(crate) fn forget_settled_flight(&self) {
		let mut slot = self.flight.lock();

		if matches!(&*slot, Some(flight) if flight.outcome().is_some()) {
			*slot = None;
		}
	}

	async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
		let response = self.transport.send(request).await.map_err(TransportError::network)?;

		response.error_for_status()
	}

	async fn recover(&self, failed: ApiRequest) -> Result<ApiResponse> {
		let flight = match self.claim(failed.bearer_token(), true) {
			Claim::Replay(token) => {
				obs::trace_step(FlowKind::Refresh, "replay_with_newer_token");
				obs::record_recovery(RecoveryPath::Replayed);

				return self.send(failed.with_bearer(token.expose())?).await;
			},
			Claim::Joined(flight) => {
				obs::trace_step(FlowKind::Refresh, "join_in_flight_refresh");
				obs::record_recovery(RecoveryPath::Joined);

				flight
			},
			Claim::Started(flight) => {
				obs::trace_step(FlowKind::Refresh, "start_refresh");
				obs::record_recovery(RecoveryPath::Started);

				flight
			},
		};
		let token = self.settle(&flight).await?;

		self.send(failed.with_bearer(token.expose())?).await
	}

	/// Decides, under the slot lock, how a 401 is recovered.
	///
	/// The check and the set happen in one critical section, so two 401s can never both
	/// start a refresh.
	fn claim(&self, sent_with: Option<&str>, reuse_settled: bool) -> Claim {
		let mut slot = self.flight.lock();

		if let Some(flight) = &*slot {
			match flight.outcome() {
				None => {
					self.refresh_metrics.record_join();

					return Claim::Joined(flight.clone());
				},
				Some(Ok(token)) if reuse_settled && sent_with != Some(token.expose()) => {
					self.refresh_metrics.record_stale_replay();

					return Claim::Replay(token.clone());
				},
				Some(_) => {},
			}
		}

		let flight = Arc::new(RefreshFlight::default());

		*slot = Some(flight.clone());

		Claim::Started(flight)
	}

	/// Waits for the flight and applies the failure branch when it did not succeed.
	///
	/// Only a flight that still occupies the slot signs the session out. A participant that
	/// resumes after a login has forgotten its flight fails without touching the new
	/// credentials.
	async fn settle(&self, flight: &Arc<RefreshFlight>) -> Result<TokenSecret> {
		match flight.resolve(|| self.run_refresh()).await {
			Ok(token) => Ok(token),
			Err(err) => {
				if !self.is_current(flight) {
					obs::trace_step(FlowKind::Refresh, "skip_sign_out_for_forgotten_flight");

					return Err(err.into());
				}
				if let Err(sign_out_err) = self.session.sign_out(SignOutReason::RefreshFailed).await
				{
					obs::trace_failure(FlowKind::Refresh, "sign_out", &sign_out_err);
				}

				Err(err.into())
			},
		}
	}

	fn is_current(&self, flight: &Arc<RefreshFlight>) -> bool {
		matches!(&*self.flight.lock(), Some(current) if Arc::ptr_eq(current, flight))
	}

	async fn run_refresh(&self) -> FlightOutcome {
		const KIND: FlowKind = FlowKind::Refresh;

		let span = FlowSpan::new(KIND, "run_refresh");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);
		self.refresh_metrics.record_attempt();

		let result = span.instrument(self.request_new_credentials()).await;

		obs::record_result(KIND, &result);

		match result {
			Ok(token) => {
				self.refresh_metrics.record_success();

				Ok(token)
			},
			Err(err) => {
				self.refresh_metrics.record_failure();
				obs::trace_failure(KIND, "refresh_call", &err);

				Err(RefreshError::new(err))
			},
		}
	}

	async fn request_new_credentials(&self) -> Result<TokenSecret> {
		let refresh = self.session.refresh_token().await?.ok_or(Error::MissingRefreshToken)?;
		let request = ApiRequest::post(self.descriptor.url(ApiRoute::Refresh)?)
			.json(&serde_json::json!({}))?
			.with_bearer(refresh.expose())?
			.with_timeout(self.config.refresh_timeout);
		let response = self.send(request).await?;
		let pair = response.json::<TokenResponse>()?.into_pair(refresh);

		self.session.store_credentials(&pair).await?;

		Ok(pair.access)
	}
}
#[cfg(feature = "reqwest")]
impl RequestAuthorizer<ReqwestTransport> {
	/// Creates an authorizer that provisions its own reqwest-backed transport.
	pub fn with_reqwest(descriptor: ApiDescriptor, session: Session) -> Self {
		Self::new(ReqwestTransport::default(), descriptor, session)
	}
}
impl<C> Clone for RequestAuthorizer<C>
where
	C: ?Sized + ApiTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			descriptor: self.descriptor.clone(),
			session: self.session.clone(),
			config: self.config,
			refresh_metrics: self.refresh_metrics.clone(),
			flight: self.flight.clone(),
		}
	}
}
impl<C> Debug for RequestAuthorizer<C>
where
	C: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RequestAuthorizer")
			.field("base_url", &self.descriptor.base_url.as_str())
			.field("session", &self.session)
			.field("config", &self.config)
			.field("refresh_in_flight", &self.refresh_in_flight())
			.finish()
	}
}

enum Claim {
	/// A refresh settled after the failed request was sent; replay with its token.
	Replay(TokenSecret),
	/// A refresh is outstanding; wait for it.
	Joined(Arc<RefreshFlight>),
	/// This caller owns the new refresh.
	Started(Arc<RefreshFlight>),
}

#[cfg(test)]
mod tests {
	// std
	use std::io;
	// self
	use super::*;
	use crate::{
		auth::CredentialPair, http::TransportFuture, session::SignOutHook, store::MemoryStore,
	};

	struct Unreachable;
	impl ApiTransport for Unreachable {
		type TransportError = io::Error;

		fn send(&self, _request: ApiRequest) -> TransportFuture<'_, Self::TransportError> {
			Box::pin(async {
				Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset"))
			})
		}
	}

	#[derive(Default)]
	struct RecordingHook(Mutex<Vec<SignOutReason>>);
	impl SignOutHook for RecordingHook {
		fn on_sign_out(&self, reason: SignOutReason) {
			self.0.lock().push(reason);
		}
	}

	fn authorizer() -> (RequestAuthorizer<Unreachable>, Arc<RecordingHook>) {
		let store = Arc::new(MemoryStore::default());
		let hook = Arc::new(RecordingHook::default());
		let descriptor = ApiDescriptor::new(
			Url::parse("http://backend.test/").expect("Fixture URL should parse."),
		)
		.expect("Default descriptor should build.");

		(RequestAuthorizer::new(Unreachable, descriptor, Session::new(store, hook.clone())), hook)
	}

	#[tokio::test]
	async fn forgotten_flight_does_not_sign_out_a_new_session() {
		let (authorizer, hook) = authorizer();

		authorizer
			.session
			.store_credentials(&CredentialPair::new("T1", "R1"))
			.await
			.expect("Credential writes should succeed.");

		let Claim::Started(flight) = authorizer.claim(Some("T1"), true) else {
			panic!("The first 401 should start a refresh.");
		};
		let Claim::Joined(late) = authorizer.claim(Some("T1"), true) else {
			panic!("A second 401 should join the outstanding refresh.");
		};

		authorizer.settle(&flight).await.expect_err("The refresh call cannot reach the backend.");

		assert_eq!(*hook.0.lock(), vec![SignOutReason::RefreshFailed]);

		// A login completes before the joined participant resumes.
		authorizer
			.session
			.store_credentials(&CredentialPair::new("T3", "R3"))
			.await
			.expect("Credential writes should succeed.");
		authorizer.forget_settled_flight();

		let err = authorizer
			.settle(&late)
			.await
			.expect_err("The joined participant shares the failure.");

		assert!(matches!(
			err,
			Error::Refresh(ref refresh) if matches!(refresh.cause(), Error::Transport(_))
		));
		assert_eq!(*hook.0.lock(), vec![SignOutReason::RefreshFailed]);
		assert_eq!(
			authorizer
				.session
				.access_token()
				.await
				.expect("Reads should succeed.")
				.map(|token| token.into_inner()),
			Some("T3".into()),
		);
	}

	#[tokio::test]
	async fn current_flight_failure_signs_out() {
		let (authorizer, hook) = authorizer();

		authorizer
			.session
			.store_credentials(&CredentialPair::new("T1", "R1"))
			.await
			.expect("Credential writes should succeed.");
		authorizer.refresh().await.expect_err("The refresh call cannot reach the backend.");

		assert_eq!(*hook.0.lock(), vec![SignOutReason::RefreshFailed]);
		assert!(authorizer.session.access_token().await.expect("Reads should succeed.").is_none());
	}
}
