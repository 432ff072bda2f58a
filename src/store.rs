//! Storage contracts and built-in stores for consumer credentials and access tokens.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{GadgetId, ServiceName},
	oauth::{AccessTokenRecord, ConsumerCredential, TokenKey},
};

/// Boxed future returned by store operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Persistence contract for per-gadget consumer credentials.
///
/// A missing record is `Ok(None)`; `Err` is reserved for backend failures so callers can tell
/// "not configured" apart from "store unreachable".
pub trait ConsumerStore
where
	Self: Send + Sync,
{
	/// Fetches the credential registered for the gadget + service, if present.
	fn fetch_consumer<'a>(
		&'a self,
		gadget_id: GadgetId,
		service_name: &'a ServiceName,
	) -> StoreFuture<'a, Option<ConsumerCredential>>;

	/// Persists or replaces the credential for the gadget + service.
	fn save_consumer<'a>(
		&'a self,
		gadget_id: GadgetId,
		service_name: &'a ServiceName,
		credential: ConsumerCredential,
	) -> StoreFuture<'a, ()>;

	/// Removes the credential; returns `true` if one existed.
	fn delete_consumer<'a>(
		&'a self,
		gadget_id: GadgetId,
		service_name: &'a ServiceName,
	) -> StoreFuture<'a, bool>;

	/// Lists every credential registered for the gadget, ordered by service name.
	fn list_consumers(
		&self,
		gadget_id: GadgetId,
	) -> StoreFuture<'_, Vec<(ServiceName, ConsumerCredential)>>;
}

/// Persistence contract for granted access tokens.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Fetches the record stored under the key, if present.
	fn fetch_token<'a>(&'a self, key: &'a TokenKey) -> StoreFuture<'a, Option<AccessTokenRecord>>;

	/// Persists or replaces the record under its key.
	fn save_token(&self, record: AccessTokenRecord) -> StoreFuture<'_, ()>;

	/// Removes the record; returns `true` if one existed.
	fn delete_token<'a>(&'a self, key: &'a TokenKey) -> StoreFuture<'a, bool>;
}

/// Error type produced by [`ConsumerStore`] and [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Unique key identifying a stored consumer credential.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConsumerStoreKey {
	/// Owning gadget.
	pub gadget_id: GadgetId,
	/// External service name.
	pub service_name: ServiceName,
}
impl ConsumerStoreKey {
	/// Builds a key for the gadget + service pair.
	pub fn new(gadget_id: GadgetId, service_name: &ServiceName) -> Self {
		Self { gadget_id, service_name: service_name.clone() }
	}
}

/// Table contents shared by the in-memory and file-backed stores.
#[derive(Clone, Debug, Default)]
pub(crate) struct Tables {
	pub(crate) consumers: HashMap<ConsumerStoreKey, ConsumerCredential>,
	pub(crate) tokens: HashMap<TokenKey, AccessTokenRecord>,
}
impl Tables {
	pub(crate) fn consumers_of(
		&self,
		gadget_id: GadgetId,
	) -> Vec<(ServiceName, ConsumerCredential)> {
		let mut listed: Vec<_> = self
			.consumers
			.iter()
			.filter(|(key, _)| key.gadget_id == gadget_id)
			.map(|(key, credential)| (key.service_name.clone(), credential.clone()))
			.collect();

		listed.sort_by(|(a, _), (b, _)| a.cmp(b));

		listed
	}
}
