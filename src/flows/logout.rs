//! Sign-out, the auth guard, and explicit credential refresh.

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	endpoint::ApiRoute,
	flows::NewsClient,
	http::{ApiRequest, ApiTransport},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	session::SignOutReason,
};

impl<C> NewsClient<C>
where
	C: ?Sized + ApiTransport,
{
	/// Ends the session.
	///
	/// When an access token is stored the logout endpoint is notified first. That call is best
	/// effort: its failures are traced and never surfaced, and local credentials are cleared
	/// regardless.
	pub async fn logout(&self) -> Result<()> {
		const KIND: FlowKind = FlowKind::Logout;

		let span = FlowSpan::new(KIND, "logout");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let notified = match self.session().access_token().await? {
					Some(access) => self.notify_logout(&access).await,
					None => Ok(()),
				};

				if let Err(err) = notified {
					obs::trace_failure(KIND, "server_logout", &err);
				}

				self.authorizer.sign_out(SignOutReason::Logout).await
			})
			.await;

		obs::record_result(KIND, &result);

		result
	}

	/// Auth guard: succeeds when an access token is stored, otherwise signs out and fails with
	/// [`Error::NotAuthenticated`].
	pub async fn require_session(&self) -> Result<()> {
		if self.session().is_authenticated().await? {
			return Ok(());
		}

		self.authorizer.sign_out(SignOutReason::Unauthenticated).await?;

		Err(Error::NotAuthenticated)
	}

	/// Refreshes the access token now, sharing any refresh already in flight.
	pub async fn refresh_credentials(&self) -> Result<TokenSecret> {
		self.authorizer.refresh().await
	}

	async fn notify_logout(&self, access: &TokenSecret) -> Result<()> {
		// Logout is an auth endpoint, so the authorizer will not attach the token itself.
		let request = ApiRequest::post(self.descriptor().url(ApiRoute::Logout)?)
			.json(&serde_json::json!({}))?
			.with_bearer(access.expose())?;

		self.authorizer.dispatch(request).await.map(|_| ())
	}
}
