//! `portal_bridge.op` spans and the crate's event macros.
//!
//! Each adapter call runs inside one span carrying `op` (the [`OpKind`] label) and `stage` (the
//! public method that started it). Fallback events such as the default consumer substitution or a
//! skipped ticket submission are emitted inside that span.

// self
use crate::{_prelude::*, obs::OpKind};

/// Span name shared by every adapter call.
pub const OP_SPAN: &str = "portal_bridge.op";

/// Future returned by [`OpSpan::instrument`]; the future itself without the `tracing` feature.
#[cfg(feature = "tracing")]
pub type InstrumentedOp<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`OpSpan::instrument`]; the future itself without the `tracing` feature.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOp<F> = F;

/// `portal_bridge.op` span for one adapter call.
#[derive(Clone, Debug)]
pub struct OpSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OpSpan {
	/// Opens the span for `kind`, started from the `stage` method.
	pub fn new(kind: OpKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			Self { span: tracing::info_span!(OP_SPAN, op = kind.as_str(), stage) }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Runs `fut` inside the span. Store and tracker awaits happen inside it, so their events nest
	/// under the adapter call.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOp<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// `tracing::debug!` when the `tracing` feature is on; nothing otherwise.
macro_rules! debug_event {
	($($arg:tt)*) => {{
		#[cfg(feature = "tracing")]
		{
			::tracing::debug!($($arg)*);
		}
	}};
}

/// `tracing::warn!` when the `tracing` feature is on; nothing otherwise.
macro_rules! warn_event {
	($($arg:tt)*) => {{
		#[cfg(feature = "tracing")]
		{
			::tracing::warn!($($arg)*);
		}
	}};
}

pub(crate) use {debug_event, warn_event};
