//! Credential exchange flows: sign-in and account creation.

// self
use crate::{
	_prelude::*,
	api::User,
	auth::CredentialPair,
	endpoint::ApiRoute,
	flows::{NewsClient, common},
	http::{ApiRequest, ApiTransport},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

/// Body posted to the login endpoint.
#[derive(Clone, Serialize)]
pub struct LoginRequest<'a> {
	/// Account email.
	pub email: &'a str,
	/// Account password.
	pub password: &'a str,
}
impl Debug for LoginRequest<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoginRequest")
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Body posted to the registration endpoint.
#[derive(Clone, Serialize)]
pub struct RegisterRequest<'a> {
	/// Display name.
	pub name: &'a str,
	/// Account email.
	pub email: &'a str,
	/// Account password.
	pub password: &'a str,
}
impl Debug for RegisterRequest<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RegisterRequest")
			.field("name", &self.name)
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.finish()
	}
}

impl<C> NewsClient<C>
where
	C: ?Sized + ApiTransport,
{
	/// Exchanges email and password for a credential pair and stores it.
	///
	/// A 4xx rejection surfaces as [`Error::Validation`] carrying the most relevant field
	/// message; other failures pass through unchanged.
	pub async fn login(&self, email: &str, password: &str) -> Result<CredentialPair> {
		const KIND: FlowKind = FlowKind::Login;

		let span = FlowSpan::new(KIND, "login");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let request = ApiRequest::post(self.descriptor().url(ApiRoute::Login)?)
					.json(&LoginRequest { email, password })?;
				let pair = self
					.authorizer
					.dispatch(request)
					.await
					.map_err(common::into_validation_error)?
					.json::<CredentialPair>()?;

				self.session().store_credentials(&pair).await?;
				self.authorizer.forget_settled_flight();

				Ok(pair)
			})
			.await;

		obs::record_result(KIND, &result);

		result
	}

	/// Creates an account; no credentials are stored.
	pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User> {
		const KIND: FlowKind = FlowKind::Register;

		let span = FlowSpan::new(KIND, "register");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let request = ApiRequest::post(self.descriptor().url(ApiRoute::Register)?)
					.json(&RegisterRequest { name, email, password })?;

				self.authorizer
					.dispatch(request)
					.await
					.map_err(common::into_validation_error)?
					.json::<User>()
			})
			.await;

		obs::record_result(KIND, &result);

		result
	}
}
