//! Single refresh call whose outcome is published once to every participant.

// crates.io
use async_lock::OnceCell;
// self
use crate::{_prelude::*, auth::TokenSecret, error::RefreshError};

pub(crate) type FlightOutcome = Result<TokenSecret, RefreshError>;

/// One refresh attempt shared by the request that started it and every request that hit a
/// 401 while it was outstanding.
#[derive(Debug, Default)]
pub(crate) struct RefreshFlight {
	outcome: OnceCell<FlightOutcome>,
}
impl RefreshFlight {
	/// Returns the published outcome, or `None` while the refresh is outstanding.
	pub(crate) fn outcome(&self) -> Option<&FlightOutcome> {
		self.outcome.get()
	}

	/// Drives the refresh (first caller) or waits for it (everyone else).
	///
	/// If the driving caller is dropped before the refresh settles, the next waiter runs
	/// `refresh` instead, so waiters never hang on an abandoned flight.
	pub(crate) async fn resolve<F, Fut>(&self, refresh: F) -> FlightOutcome
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = FlightOutcome>,
	{
		self.outcome.get_or_init(refresh).await.clone()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::Error;

	#[tokio::test]
	async fn outcome_is_published_once() {
		let flight = RefreshFlight::default();

		assert!(flight.outcome().is_none());

		let first = flight.resolve(|| async { Ok(TokenSecret::new("T2")) }).await;
		let second = flight
			.resolve(|| async { Err(RefreshError::new(Error::MissingRefreshToken)) })
			.await;

		assert_eq!(first.expect("First outcome should succeed.").expose(), "T2");
		assert_eq!(second.expect("Second caller should see the first outcome.").expose(), "T2");
		assert!(matches!(flight.outcome(), Some(Ok(_))));
	}

	#[tokio::test]
	async fn failures_are_shared() {
		let flight = RefreshFlight::default();
		let first = flight
			.resolve(|| async { Err(RefreshError::new(Error::MissingRefreshToken)) })
			.await;
		let second = flight.resolve(|| async { Ok(TokenSecret::new("never")) }).await;

		assert!(first.is_err());
		assert!(matches!(
			second.expect_err("Failures should be shared.").cause(),
			Error::MissingRefreshToken
		));
	}
}
