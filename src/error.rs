//! Crate-level error types shared by the OAuth adapter and the ticket wizard.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Issue tracker call failed while driving the wizard.
	#[error("{0}")]
	Tracker(
		#[from]
		#[source]
		crate::tracker::TrackerError,
	),
	/// Ticket draft or wizard input failed validation.
	#[error(transparent)]
	Validation(#[from] crate::wizard::ValidationErrors),

	/// No active issue tracker session is held by the caller.
	#[error("Portlet is not connected to the issue tracker.")]
	NotConnected,
	/// Opaque failure surfaced at the adapter boundary.
	///
	/// Collaborator failures (directories, stores) are wrapped here with the original cause
	/// attached as the error source.
	#[error("{message}")]
	Internal {
		/// Human-readable summary.
		message: String,
		/// Underlying collaborator failure, when one exists.
		#[source]
		source: Option<BoxError>,
	},
}
impl Error {
	/// Builds an [`Error::Internal`] without an underlying cause.
	pub fn internal(message: impl Into<String>) -> Self {
		Self::Internal { message: message.into(), source: None }
	}

	/// Builds an [`Error::Internal`] that carries the collaborator failure as its source.
	pub fn internal_from(
		message: impl Into<String>,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Internal { message: message.into(), source: Some(Box::new(src)) }
	}

	/// Returns `true` for [`Error::Internal`].
	pub fn is_internal(&self) -> bool {
		matches!(self, Self::Internal { .. })
	}
}

/// Configuration and validation failures raised while assembling adapters.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Callback URL template is blank.
	#[error("Callback URL template cannot be empty.")]
	EmptyCallbackUrl,
	/// Default consumer is unusable.
	#[error("Default consumer is invalid: {reason}.")]
	InvalidDefaultConsumer {
		/// What made the consumer unusable.
		reason: &'static str,
	},
	/// Configuration document could not be parsed.
	#[error("Configuration document is malformed.")]
	Parse {
		/// Structured parsing failure including the offending field path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
