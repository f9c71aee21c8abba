// self
use crate::{
	_prelude::*,
	obs::{FlowKind, FlowOutcome},
};

/// How a 401 on a protected route was recovered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecoveryPath {
	/// The request started a new refresh call.
	Started,
	/// The request attached to a refresh already in flight.
	Joined,
	/// A refresh had settled after the request was sent; replayed without refreshing.
	Replayed,
}
impl RecoveryPath {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Started => "started",
			Self::Joined => "joined",
			Self::Replayed => "replayed",
		}
	}
}

/// Records a flow outcome via the global metrics recorder (when enabled).
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"newsdesk_client_flow_total",
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records which recovery path a 401 took (`newsdesk_client_recovery_total{path}`).
pub fn record_recovery(path: RecoveryPath) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("newsdesk_client_recovery_total", "path" => path.as_str()).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = path;
	}
}

/// Records the terminal outcome of a flow result.
pub(crate) fn record_result<T>(kind: FlowKind, result: &Result<T>) {
	match result {
		Ok(_) => record_flow_outcome(kind, FlowOutcome::Success),
		Err(_) => record_flow_outcome(kind, FlowOutcome::Failure),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recorders_noop_without_metrics() {
		record_flow_outcome(FlowKind::Refresh, FlowOutcome::Failure);
		record_recovery(RecoveryPath::Joined);
		record_result(FlowKind::Request, &Err::<(), _>(Error::NotAuthenticated));
	}
}
