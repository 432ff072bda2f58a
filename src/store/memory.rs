//! Thread-safe in-memory [`ConsumerStore`] + [`TokenStore`] for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::{GadgetId, ServiceName},
	oauth::{AccessTokenRecord, ConsumerCredential, TokenKey},
	store::{ConsumerStore, ConsumerStoreKey, StoreFuture, Tables, TokenStore},
};

/// Storage backend that keeps consumers and tokens in-process.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Arc<RwLock<Tables>>);
impl MemoryStore {
	/// Number of stored access tokens.
	pub fn token_count(&self) -> usize {
		self.0.read().tokens.len()
	}
}
impl ConsumerStore for MemoryStore {
	fn fetch_consumer<'a>(
		&'a self,
		gadget_id: GadgetId,
		service_name: &'a ServiceName,
	) -> StoreFuture<'a, Option<ConsumerCredential>> {
		Box::pin(async move {
			let key = ConsumerStoreKey::new(gadget_id, service_name);

			Ok(self.0.read().consumers.get(&key).cloned())
		})
	}

	fn save_consumer<'a>(
		&'a self,
		gadget_id: GadgetId,
		service_name: &'a ServiceName,
		credential: ConsumerCredential,
	) -> StoreFuture<'a, ()> {
		Box::pin(async move {
			let key = ConsumerStoreKey::new(gadget_id, service_name);

			self.0.write().consumers.insert(key, credential);

			Ok(())
		})
	}

	fn delete_consumer<'a>(
		&'a self,
		gadget_id: GadgetId,
		service_name: &'a ServiceName,
	) -> StoreFuture<'a, bool> {
		Box::pin(async move {
			let key = ConsumerStoreKey::new(gadget_id, service_name);

			Ok(self.0.write().consumers.remove(&key).is_some())
		})
	}

	fn list_consumers(
		&self,
		gadget_id: GadgetId,
	) -> StoreFuture<'_, Vec<(ServiceName, ConsumerCredential)>> {
		Box::pin(async move { Ok(self.0.read().consumers_of(gadget_id)) })
	}
}
impl TokenStore for MemoryStore {
	fn fetch_token<'a>(&'a self, key: &'a TokenKey) -> StoreFuture<'a, Option<AccessTokenRecord>> {
		Box::pin(async move { Ok(self.0.read().tokens.get(key).cloned()) })
	}

	fn save_token(&self, record: AccessTokenRecord) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			self.0.write().tokens.insert(record.key.clone(), record);

			Ok(())
		})
	}

	fn delete_token<'a>(&'a self, key: &'a TokenKey) -> StoreFuture<'a, bool> {
		Box::pin(async move { Ok(self.0.write().tokens.remove(key).is_some()) })
	}
}
