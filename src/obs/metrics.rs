//! `portal_bridge_op_total` counter.

// self
use crate::obs::{OpKind, OpOutcome};

/// Counter incremented once per adapter call stage.
pub const OP_COUNTER: &str = "portal_bridge_op_total";

/// Counts an adapter call stage, labeled `op` (for example `resolve_consumer`) and `outcome`.
///
/// Without the `metrics` feature this does nothing.
pub fn record_op_outcome(kind: OpKind, outcome: OpOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(OP_COUNTER, "op" => kind.as_str(), "outcome" => outcome.as_str())
		.increment(1);

	#[cfg(not(feature = "metrics"))]
	let _ = (kind, outcome);
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn wizard_and_oauth_outcomes_record_without_a_recorder() {
		for kind in [OpKind::ResolveConsumer, OpKind::StoreToken, OpKind::WizardSubmit] {
			record_op_outcome(kind, OpOutcome::Attempt);
			record_op_outcome(kind, OpOutcome::Failure);
		}

		assert_eq!(OP_COUNTER, "portal_bridge_op_total");
	}
}
