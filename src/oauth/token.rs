//! Stored access token records and the request-scoped view handed to the signing layer.

// self
use crate::{
	_prelude::*,
	auth::{GadgetId, ModuleId, Secret, ServiceName, TokenName, UserId},
};

/// Unique key of a stored access token.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenKey {
	/// User the token was granted to.
	pub user_id: UserId,
	/// Gadget holding the token.
	pub gadget_id: GadgetId,
	/// External service the token is valid for.
	pub service_name: ServiceName,
	/// Gadget instance that requested the token.
	pub module_id: ModuleId,
	/// Token name within the service.
	pub token_name: TokenName,
}

/// Previously granted token as persisted by a [`TokenStore`](crate::store::TokenStore).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenRecord {
	/// Lookup key.
	pub key: TokenKey,
	/// Access token value.
	pub access_token: Secret,
	/// Token secret paired with the access token.
	pub token_secret: Secret,
	/// Session handle for providers that support token renewal.
	pub session_handle: Option<String>,
	/// Expiry instant, if the provider supplied one.
	pub expires_at: Option<OffsetDateTime>,
	/// Instant the record was first stored.
	pub created_at: OffsetDateTime,
	/// Instant the record was last replaced.
	pub modified_at: OffsetDateTime,
}
impl AccessTokenRecord {
	/// Builds a fresh record from resolved token fields.
	pub fn new(key: TokenKey, info: TokenInfo, now: OffsetDateTime) -> Self {
		Self {
			key,
			access_token: info.access_token,
			token_secret: info.token_secret,
			session_handle: info.session_handle,
			expires_at: info.expires_at,
			created_at: now,
			modified_at: now,
		}
	}

	/// Copies the four token fields out of the record.
	pub fn to_token_info(&self) -> TokenInfo {
		TokenInfo {
			access_token: self.access_token.clone(),
			token_secret: self.token_secret.clone(),
			session_handle: self.session_handle.clone(),
			expires_at: self.expires_at,
		}
	}
}

/// Token fields exchanged with the signing layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
	/// Access token value.
	pub access_token: Secret,
	/// Token secret.
	pub token_secret: Secret,
	/// Session handle, if any.
	pub session_handle: Option<String>,
	/// Expiry instant, if any.
	pub expires_at: Option<OffsetDateTime>,
}
impl TokenInfo {
	/// Creates token info without a session handle or expiry.
	pub fn new(access_token: impl Into<Secret>, token_secret: impl Into<Secret>) -> Self {
		Self {
			access_token: access_token.into(),
			token_secret: token_secret.into(),
			session_handle: None,
			expires_at: None,
		}
	}

	/// Sets the session handle.
	pub fn with_session_handle(mut self, handle: impl Into<String>) -> Self {
		self.session_handle = Some(handle.into());

		self
	}

	/// Sets the expiry instant.
	pub fn with_expires_at(mut self, instant: OffsetDateTime) -> Self {
		self.expires_at = Some(instant);

		self
	}

	/// Returns `true` if an expiry is known and has passed at `instant`.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.expires_at.is_some_and(|expires_at| instant >= expires_at)
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::{Duration, macros};
	// self
	use super::*;

	fn key() -> TokenKey {
		TokenKey {
			user_id: UserId::new(1),
			gadget_id: GadgetId::new(2),
			service_name: ServiceName::new("google").expect("Service fixture should be valid."),
			module_id: ModuleId::new(3),
			token_name: TokenName::unnamed(),
		}
	}

	#[test]
	fn record_round_trips_token_fields() {
		let expires = macros::datetime!(2026-01-01 00:00 UTC);
		let info = TokenInfo::new("access", "secret")
			.with_session_handle("handle")
			.with_expires_at(expires);
		let record =
			AccessTokenRecord::new(key(), info.clone(), macros::datetime!(2025-06-01 12:00 UTC));

		assert_eq!(record.to_token_info(), info);
		assert_eq!(record.created_at, record.modified_at);
	}

	#[test]
	fn expiry_is_optional() {
		let now = macros::datetime!(2025-06-01 12:00 UTC);
		let open_ended = TokenInfo::new("a", "s");

		assert!(!open_ended.is_expired_at(now));

		let expired = open_ended.clone().with_expires_at(now - Duration::minutes(1));

		assert!(expired.is_expired_at(now));
		assert!(!expired.is_expired_at(now - Duration::hours(1)));
	}

	#[test]
	fn debug_output_redacts_secrets() {
		let rendered = format!("{:?}", TokenInfo::new("visible-access", "visible-secret"));

		assert!(!rendered.contains("visible-access"));
		assert!(!rendered.contains("visible-secret"));
	}
}
