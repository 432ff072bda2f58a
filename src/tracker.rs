//! Issue tracker contract and the caller-held connection the wizard runs against.

pub mod memory;
pub mod model;

pub use memory::MemoryTracker;
pub use model::*;

// self
use crate::{
	_prelude::*,
	auth::{ProjectKey, TicketKey},
};

/// Boxed future returned by tracker calls.
pub type TrackerFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, TrackerError>> + 'a + Send>>;

/// Issue tracker proxy.
///
/// Every call is authorized by the opaque security token obtained when the caller connected.
pub trait IssueTracker
where
	Self: Send + Sync,
{
	/// Lists projects visible to the session.
	fn projects<'a>(&'a self, security_token: &'a str) -> TrackerFuture<'a, Vec<Project>>;

	/// Lists issue types.
	fn issue_types<'a>(&'a self, security_token: &'a str) -> TrackerFuture<'a, Vec<IssueType>>;

	/// Lists priorities.
	fn priorities<'a>(&'a self, security_token: &'a str) -> TrackerFuture<'a, Vec<Priority>>;

	/// Lists the components of a project.
	fn components<'a>(
		&'a self,
		security_token: &'a str,
		project: &'a ProjectKey,
	) -> TrackerFuture<'a, Vec<Component>>;

	/// Lists the versions of a project.
	fn versions<'a>(
		&'a self,
		security_token: &'a str,
		project: &'a ProjectKey,
	) -> TrackerFuture<'a, Vec<Version>>;

	/// Creates a ticket and returns its tracker-assigned key.
	fn create_issue<'a>(
		&'a self,
		security_token: &'a str,
		draft: &'a TicketDraft,
	) -> TrackerFuture<'a, TicketKey>;
}

/// Error type produced by [`IssueTracker`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum TrackerError {
	/// Security token is unknown or expired.
	#[error("Issue tracker rejected the security token.")]
	Unauthorized,
	/// Tracker refused the request.
	#[error("Issue tracker rejected the request: {message}.")]
	Rejected {
		/// Tracker-supplied reason.
		message: String,
	},
	/// Transport or backend failure.
	#[error("Issue tracker backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Tracker connection held in the caller's session.
#[derive(Clone, Default)]
pub struct TrackerSession {
	/// Connected tracker proxy.
	pub tracker: Option<Arc<dyn IssueTracker>>,
	/// Security token obtained at connect time.
	pub security_token: Option<String>,
}
impl TrackerSession {
	/// Creates a connected session.
	pub fn connected(tracker: Arc<dyn IssueTracker>, security_token: impl Into<String>) -> Self {
		Self { tracker: Some(tracker), security_token: Some(security_token.into()) }
	}

	/// Returns the proxy and token when both are present and the token is non-empty.
	pub fn connection(&self) -> Option<(&dyn IssueTracker, &str)> {
		let tracker = self.tracker.as_deref()?;
		let token = self.security_token.as_deref().filter(|token| !token.is_empty())?;

		Some((tracker, token))
	}

	/// Returns `true` when [`TrackerSession::connection`] would succeed.
	pub fn is_connected(&self) -> bool {
		self.connection().is_some()
	}
}
impl Debug for TrackerSession {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TrackerSession")
			.field("tracker_set", &self.tracker.is_some())
			.field("security_token", &self.security_token.as_ref().map(|_| "<redacted>"))
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn connection_requires_tracker_and_non_empty_token() {
		let tracker: Arc<dyn IssueTracker> = Arc::new(MemoryTracker::new("token"));

		assert!(!TrackerSession::default().is_connected());
		assert!(
			!TrackerSession { tracker: Some(tracker.clone()), security_token: None }.is_connected()
		);
		assert!(!TrackerSession::connected(tracker.clone(), "").is_connected());
		assert!(
			!TrackerSession { tracker: None, security_token: Some("token".into()) }.is_connected()
		);
		assert!(TrackerSession::connected(tracker, "token").is_connected());
	}

	#[test]
	fn session_debug_redacts_token() {
		let session = TrackerSession::connected(Arc::new(MemoryTracker::new("abc123")), "abc123");

		assert!(!format!("{session:?}").contains("abc123"));
	}
}
