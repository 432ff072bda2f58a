//! JSON file-backed [`ConsumerStore`] + [`TokenStore`] for single-node portals.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::{GadgetId, ServiceName},
	oauth::{AccessTokenRecord, ConsumerCredential, TokenKey},
	store::{ConsumerStore, ConsumerStoreKey, StoreError, StoreFuture, Tables, TokenStore},
};

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
	#[serde(default)]
	consumers: Vec<(ConsumerStoreKey, ConsumerCredential)>,
	#[serde(default)]
	tokens: Vec<AccessTokenRecord>,
}
impl From<Snapshot> for Tables {
	fn from(snapshot: Snapshot) -> Self {
		Self {
			consumers: snapshot.consumers.into_iter().collect(),
			tokens: snapshot
				.tokens
				.into_iter()
				.map(|record| (record.key.clone(), record))
				.collect(),
		}
	}
}

/// Persists consumers and tokens to a JSON file after each mutation.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	inner: Arc<RwLock<Tables>>,
}
impl FileStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing data.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let tables = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(tables)) })
	}

	/// Location of the backing file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load_snapshot(path: &Path) -> Result<Tables, StoreError> {
		if !path.exists() {
			return Ok(Tables::default());
		}

		let metadata = path.metadata().map_err(|e| StoreError::Backend {
			message: format!("Failed to inspect {}: {e}", path.display()),
		})?;

		if metadata.len() == 0 {
			return Ok(Tables::default());
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;
		let snapshot: Snapshot =
			serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
				message: format!("Failed to parse {}: {e}", path.display()),
			})?;

		Ok(snapshot.into())
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	/// Applies `change` to a copy of the tables and swaps the copy in once it is on disk.
	///
	/// `change` returns whether it modified anything; unmodified copies are not written.
	fn commit(&self, change: impl FnOnce(&mut Tables) -> bool) -> Result<bool, StoreError> {
		let mut guard = self.inner.write();
		let mut next = guard.clone();

		if !change(&mut next) {
			return Ok(false);
		}

		self.persist_locked(&next)?;

		*guard = next;

		Ok(true)
	}

	fn persist_locked(&self, tables: &Tables) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let mut consumers: Vec<_> =
			tables.consumers.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
		let mut tokens: Vec<_> = tables.tokens.values().cloned().collect();

		consumers.sort_by(|(a, _), (b, _)| a.cmp(b));
		tokens.sort_by(|a, b| a.key.cmp(&b.key));

		let serialized =
			serde_json::to_vec_pretty(&Snapshot { consumers, tokens }).map_err(|e| {
				StoreError::Serialization {
					message: format!("Failed to serialize store snapshot: {e}"),
				}
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl ConsumerStore for FileStore {
	fn fetch_consumer<'a>(
		&'a self,
		gadget_id: GadgetId,
		service_name: &'a ServiceName,
	) -> StoreFuture<'a, Option<ConsumerCredential>> {
		Box::pin(async move {
			let key = ConsumerStoreKey::new(gadget_id, service_name);

			Ok(self.inner.read().consumers.get(&key).cloned())
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

			self.commit(|tables| {
				tables.consumers.insert(key, credential);

				true
			})?;

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

			self.commit(|tables| tables.consumers.remove(&key).is_some())
		})
	}

	fn list_consumers(
		&self,
		gadget_id: GadgetId,
	) -> StoreFuture<'_, Vec<(ServiceName, ConsumerCredential)>> {
		Box::pin(async move { Ok(self.inner.read().consumers_of(gadget_id)) })
	}
}
impl TokenStore for FileStore {
	fn fetch_token<'a>(&'a self, key: &'a TokenKey) -> StoreFuture<'a, Option<AccessTokenRecord>> {
		Box::pin(async move { Ok(self.inner.read().tokens.get(key).cloned()) })
	}

	fn save_token(&self, record: AccessTokenRecord) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			self.commit(|tables| {
				tables.tokens.insert(record.key.clone(), record);

				true
			})?;

			Ok(())
		})
	}

	fn delete_token<'a>(&'a self, key: &'a TokenKey) -> StoreFuture<'a, bool> {
		Box::pin(async move {
			self.commit(|tables| tables.tokens.remove(key).is_some())
		})
	}
}
