//! OAuth 1.0a consumer and token resolution for embedded gadgets.
//!
//! [`OAuthStore`] answers three questions for the gadget container's signing layer:
//! which consumer signs requests for a gadget + service, which access token the viewer already
//! holds, and where a freshly granted token is kept. Every call is a stateless walk over the
//! collaborators: viewer → user → company → gadget (by app URL) → consumer/token store.
//!
//! Consumer resolution falls back to the configured default consumer when the gadget has no
//! consumer of its own. A gadget consumer marked [`KeyType::RsaPrivate`] keeps its own key and
//! key name but signs with the default consumer's private key, so one portal-wide RSA key can
//! serve every gadget.

pub mod consumer;
pub mod token;

pub use consumer::*;
pub use token::*;

// self
use crate::{
	_prelude::*,
	auth::{SecurityToken, ServiceName, TokenName},
	config::OAuthStoreConfig,
	directory::{Gadget, GadgetDirectory, UserDirectory},
	obs::{self, OpKind, debug_event},
	store::{ConsumerStore, TokenStore},
};

/// Supplies the host name used to expand callback URL templates.
pub trait HostResolver
where
	Self: Send + Sync,
{
	/// Returns the host (and port, if any) the portal is currently served from.
	fn current_host(&self) -> String;
}

/// [`HostResolver`] returning a fixed host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaticHost(pub String);
impl StaticHost {
	/// Creates a resolver for the provided host.
	pub fn new(host: impl Into<String>) -> Self {
		Self(host.into())
	}
}
impl HostResolver for StaticHost {
	fn current_host(&self) -> String {
		self.0.clone()
	}
}

/// External services the adapter delegates to.
#[derive(Clone)]
pub struct Collaborators {
	/// Portal user directory.
	pub users: Arc<dyn UserDirectory>,
	/// Gadget registry.
	pub gadgets: Arc<dyn GadgetDirectory>,
	/// Per-gadget consumer credentials.
	pub consumers: Arc<dyn ConsumerStore>,
	/// Granted access tokens.
	pub tokens: Arc<dyn TokenStore>,
	/// Current host for callback expansion.
	pub host: Arc<dyn HostResolver>,
}

/// Shared, immutable adapter resolving consumers and tokens for gadgets.
#[derive(Clone)]
pub struct OAuthStore {
	config: OAuthStoreConfig,
	collaborators: Collaborators,
}
impl OAuthStore {
	/// Creates the adapter. The configuration is never mutated afterwards.
	pub fn new(config: OAuthStoreConfig, collaborators: Collaborators) -> Self {
		Self { config, collaborators }
	}

	/// Configuration the adapter was built with.
	pub fn config(&self) -> &OAuthStoreConfig {
		&self.config
	}

	/// Resolves the signing consumer for the gadget in `token` and `service_name`.
	///
	/// Fails with [`Error::Internal`] when the gadget has no consumer and no default consumer is
	/// configured, when a gadget RSA consumer needs the missing default signing key, or when any
	/// collaborator lookup fails.
	pub async fn resolve_consumer(
		&self,
		token: &SecurityToken,
		service_name: &ServiceName,
		provider: &ServiceProvider,
	) -> Result<ConsumerInfo> {
		obs::observe(OpKind::ResolveConsumer, "resolve_consumer", async move {
			let credential = self.lookup_consumer(token, service_name).await?.ok_or_else(|| {
				Error::internal(format!(
					"No key for gadget {} and service {service_name}",
					token.app_url
				))
			})?;
			let template = credential.callback_url.as_deref().unwrap_or(&self.config.callback_url);
			let callback_url =
				expand_callback_url(template, &self.collaborators.host.current_host());
			let consumer = SigningConsumer::from_credential(&credential, provider);

			debug_event!(
				service = %service_name,
				signature_method = consumer.signature_method.as_str(),
				key_fingerprint = %credential.consumer_secret.fingerprint(),
				"Resolved OAuth consumer."
			);

			Ok(ConsumerInfo { consumer, key_name: credential.key_name, callback_url })
		})
		.await
	}

	/// Returns the stored token for the viewer, gadget module, service, and token name.
	///
	/// `consumer` is not consulted; tokens are keyed by identity, service, and token name only.
	pub async fn resolve_token(
		&self,
		token: &SecurityToken,
		_consumer: &ConsumerInfo,
		service_name: &ServiceName,
		token_name: &TokenName,
	) -> Result<Option<TokenInfo>> {
		obs::observe(OpKind::ResolveToken, "resolve_token", async move {
			let record = self.lookup_token(token, service_name, token_name).await?;

			Ok(record.as_ref().map(AccessTokenRecord::to_token_info))
		})
		.await
	}

	/// Deletes the stored token, doing nothing when none exists.
	pub async fn remove_token(
		&self,
		token: &SecurityToken,
		_consumer: &ConsumerInfo,
		service_name: &ServiceName,
		token_name: &TokenName,
	) -> Result<()> {
		obs::observe(OpKind::RemoveToken, "remove_token", async move {
			let Some(record) = self.lookup_token(token, service_name, token_name).await? else {
				return Ok(());
			};

			self.collaborators
				.tokens
				.delete_token(&record.key)
				.await
				.map_err(|e| Error::internal_from("Failed to delete OAuth token", e))?;

			Ok(())
		})
		.await
	}

	/// Stores `info` for the viewer, replacing any token held under the same key.
	pub async fn set_token_info(
		&self,
		token: &SecurityToken,
		_consumer: &ConsumerInfo,
		service_name: &ServiceName,
		token_name: &TokenName,
		info: TokenInfo,
	) -> Result<()> {
		obs::observe(OpKind::StoreToken, "set_token_info", async move {
			let key = self.token_key(token, service_name, token_name).await?;
			let existing = self
				.collaborators
				.tokens
				.fetch_token(&key)
				.await
				.map_err(|e| Error::internal_from("Failed to read OAuth token", e))?;
			let now = OffsetDateTime::now_utc();
			let mut record = AccessTokenRecord::new(key, info, now);

			if let Some(existing) = existing {
				record.created_at = existing.created_at;
			}

			self.collaborators
				.tokens
				.save_token(record)
				.await
				.map_err(|e| Error::internal_from("Failed to store OAuth token", e))
		})
		.await
	}

	async fn resolve_gadget(&self, token: &SecurityToken) -> Result<Gadget> {
		let user_id = token.user_id();
		let user = self
			.collaborators
			.users
			.user(user_id)
			.await
			.map_err(|e| Error::internal_from(format!("Unable to resolve user {user_id}"), e))?;

		self.collaborators.gadgets.gadget(user.company_id, &token.app_url).await.map_err(|e| {
			Error::internal_from(format!("Unable to resolve gadget {}", token.app_url), e)
		})
	}

	async fn lookup_consumer(
		&self,
		token: &SecurityToken,
		service_name: &ServiceName,
	) -> Result<Option<ConsumerCredential>> {
		let gadget = self.resolve_gadget(token).await?;
		let stored = self
			.collaborators
			.consumers
			.fetch_consumer(gadget.gadget_id, service_name)
			.await
			.map_err(|e| Error::internal_from("Failed to read OAuth consumer", e))?;
		let Some(mut credential) = stored else {
			debug_event!(
				gadget = %gadget.gadget_id,
				service = %service_name,
				default_configured = self.config.default_consumer.is_some(),
				"No gadget consumer; using the default consumer."
			);

			return Ok(self.config.default_consumer.clone());
		};

		if credential.is_rsa() {
			let default = self
				.config
				.default_consumer
				.as_ref()
				.ok_or_else(|| Error::internal("No OAuth signing key specified."))?;

			credential.consumer_secret = default.consumer_secret.clone();
		}

		Ok(Some(credential))
	}

	async fn token_key(
		&self,
		token: &SecurityToken,
		service_name: &ServiceName,
		token_name: &TokenName,
	) -> Result<TokenKey> {
		let gadget = self.resolve_gadget(token).await?;

		Ok(TokenKey {
			user_id: token.user_id(),
			gadget_id: gadget.gadget_id,
			service_name: service_name.clone(),
			module_id: token.module_id,
			token_name: token_name.clone(),
		})
	}

	async fn lookup_token(
		&self,
		token: &SecurityToken,
		service_name: &ServiceName,
		token_name: &TokenName,
	) -> Result<Option<AccessTokenRecord>> {
		let key = self.token_key(token, service_name, token_name).await?;

		self.collaborators
			.tokens
			.fetch_token(&key)
			.await
			.map_err(|e| Error::internal_from("Failed to read OAuth token", e))
	}
}
impl Debug for OAuthStore {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuthStore")
			.field("callback_url", &self.config.callback_url)
			.field("default_consumer_set", &self.config.default_consumer.is_some())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		auth::{CompanyId, GadgetId, ModuleId, Secret, UserId},
		directory::{MemoryDirectory, User},
		store::{MemoryStore, StoreError, StoreFuture},
	};

	const APP_URL: &str = "https://gadgets.example.com/calendar.xml";

	struct FailingConsumers;
	impl ConsumerStore for FailingConsumers {
		fn fetch_consumer<'a>(
			&'a self,
			_gadget_id: GadgetId,
			_service_name: &'a ServiceName,
		) -> StoreFuture<'a, Option<ConsumerCredential>> {
			Box::pin(async {
				Err(StoreError::Backend { message: "consumer table offline".into() })
			})
		}

		fn save_consumer<'a>(
			&'a self,
			_gadget_id: GadgetId,
			_service_name: &'a ServiceName,
			_credential: ConsumerCredential,
		) -> StoreFuture<'a, ()> {
			Box::pin(async { Ok(()) })
		}

		fn delete_consumer<'a>(
			&'a self,
			_gadget_id: GadgetId,
			_service_name: &'a ServiceName,
		) -> StoreFuture<'a, bool> {
			Box::pin(async { Ok(false) })
		}

		fn list_consumers(
			&self,
			_gadget_id: GadgetId,
		) -> StoreFuture<'_, Vec<(ServiceName, ConsumerCredential)>> {
			Box::pin(async { Ok(Vec::new()) })
		}
	}

	/// Finds every token but refuses to write or delete any.
	struct ReadOnlyTokens;
	impl TokenStore for ReadOnlyTokens {
		fn fetch_token<'a>(
			&'a self,
			key: &'a TokenKey,
		) -> StoreFuture<'a, Option<AccessTokenRecord>> {
			Box::pin(async move {
				Ok(Some(AccessTokenRecord::new(
					key.clone(),
					TokenInfo::new("access", "secret"),
					OffsetDateTime::now_utc(),
				)))
			})
		}

		fn save_token(&self, _record: AccessTokenRecord) -> StoreFuture<'_, ()> {
			Box::pin(async {
				Err(StoreError::Backend { message: "token table is read-only".into() })
			})
		}

		fn delete_token<'a>(&'a self, _key: &'a TokenKey) -> StoreFuture<'a, bool> {
			Box::pin(async {
				Err(StoreError::Backend { message: "token table is read-only".into() })
			})
		}
	}

	fn directory() -> MemoryDirectory {
		let directory = MemoryDirectory::default();

		directory.insert_user(User {
			user_id: UserId::new(10),
			company_id: CompanyId::new(1),
			screen_name: "test".into(),
		});
		directory.insert_gadget(Gadget {
			gadget_id: GadgetId::new(5),
			company_id: CompanyId::new(1),
			name: "Calendar".into(),
			url: APP_URL.into(),
		});

		directory
	}

	fn provider() -> ServiceProvider {
		let url = |value: &str| Url::parse(value).expect("Provider fixture URL should parse.");

		ServiceProvider::new(
			url("https://api.example.com/request"),
			url("https://api.example.com/authorize"),
			url("https://api.example.com/access"),
		)
	}

	fn service() -> ServiceName {
		ServiceName::new("google").expect("Service fixture should be valid.")
	}

	#[tokio::test]
	async fn consumer_store_failures_are_not_treated_as_missing() {
		let directory = Arc::new(directory());
		let config = OAuthStoreConfig::builder("http://%host%/cb")
			.default_consumer(ConsumerCredential::hmac("default", "default-secret"))
			.build()
			.expect("Config fixture should be valid.");
		let store = OAuthStore::new(config, Collaborators {
			users: directory.clone(),
			gadgets: directory,
			consumers: Arc::new(FailingConsumers),
			tokens: Arc::new(MemoryStore::default()),
			host: Arc::new(StaticHost::new("portal.example.com")),
		});
		let token = SecurityToken::new("10", APP_URL, ModuleId::new(1));
		let err = store
			.resolve_consumer(&token, &service(), &provider())
			.await
			.expect_err("An unreachable consumer store must surface as an error.");

		assert!(err.is_internal());
		assert!(StdError::source(&err).is_some());
	}

	#[tokio::test]
	async fn gadget_callback_template_overrides_the_global_one() {
		let directory = Arc::new(directory());
		let memory = Arc::new(MemoryStore::default());
		let config = OAuthStoreConfig::builder("http://%host%/global")
			.build()
			.expect("Config fixture should be valid.");
		let store = OAuthStore::new(config, Collaborators {
			users: directory.clone(),
			gadgets: directory,
			consumers: memory.clone(),
			tokens: memory.clone(),
			host: Arc::new(StaticHost::new("portal.example.com")),
		});

		memory
			.save_consumer(
				GadgetId::new(5),
				&service(),
				ConsumerCredential::hmac("gadget", Secret::new("gadget-secret"))
					.callback_url("https://%host%/calendar/callback"),
			)
			.await
			.expect("Seeding the gadget consumer should succeed.");

		let token = SecurityToken::new("10", APP_URL, ModuleId::new(1));
		let info = store
			.resolve_consumer(&token, &service(), &provider())
			.await
			.expect("Gadget consumer should resolve.");

		assert_eq!(info.callback_url, "https://portal.example.com/calendar/callback");
		assert_eq!(
			format!("{store:?}"),
			"OAuthStore { callback_url: \"http://%host%/global\", default_consumer_set: false }"
		);
	}

	#[tokio::test]
	async fn token_write_failures_are_internal_errors_with_source() {
		let directory = Arc::new(directory());
		let config = OAuthStoreConfig::builder("http://%host%/cb")
			.default_consumer(ConsumerCredential::hmac("default", "default-secret"))
			.build()
			.expect("Config fixture should be valid.");
		let store = OAuthStore::new(config, Collaborators {
			users: directory.clone(),
			gadgets: directory,
			consumers: Arc::new(MemoryStore::default()),
			tokens: Arc::new(ReadOnlyTokens),
			host: Arc::new(StaticHost::new("portal.example.com")),
		});
		let token = SecurityToken::new("10", APP_URL, ModuleId::new(1));
		let consumer = store
			.resolve_consumer(&token, &service(), &provider())
			.await
			.expect("Default consumer should resolve.");
		let name = TokenName::unnamed();
		let err = store
			.remove_token(&token, &consumer, &service(), &name)
			.await
			.expect_err("A failed delete must surface as an error.");

		assert!(err.is_internal());
		assert!(StdError::source(&err).is_some());

		let err = store
			.set_token_info(&token, &consumer, &service(), &name, TokenInfo::new("new", "pair"))
			.await
			.expect_err("A failed save must surface as an error.");

		assert!(err.is_internal());
		assert!(StdError::source(&err).is_some());
	}
}
