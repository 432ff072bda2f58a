//! Shared fixtures for integration tests.

#![allow(dead_code)]

// std
use std::sync::Arc;
// self
use portal_bridge::{
	auth::{CompanyId, GadgetId, ModuleId, SecurityToken, ServiceName, TokenName, UserId},
	config::OAuthStoreConfig,
	directory::{Gadget, MemoryDirectory, User},
	oauth::{Collaborators, ConsumerCredential, OAuthStore, ServiceProvider, StaticHost},
	store::MemoryStore,
	url::Url,
};

pub const HOST: &str = "portal.example.com:8080";
pub const CALLBACK_TEMPLATE: &str = "http://%host%/oauth/callback";
pub const VIEWER: u64 = 1001;
pub const COMPANY: u64 = 20;
pub const GADGET: u64 = 300;
pub const APP_URL: &str = "https://gadgets.example.com/calendar.xml";

/// Adapter plus handles on its in-memory collaborators.
pub struct Fixture {
	pub oauth: OAuthStore,
	pub store: MemoryStore,
	pub directory: MemoryDirectory,
}

pub fn directory() -> MemoryDirectory {
	let directory = MemoryDirectory::default();

	directory.insert_user(User {
		user_id: UserId::new(VIEWER),
		company_id: CompanyId::new(COMPANY),
		screen_name: "jdoe".into(),
	});
	directory.insert_gadget(Gadget {
		gadget_id: GadgetId::new(GADGET),
		company_id: CompanyId::new(COMPANY),
		name: "Calendar".into(),
		url: APP_URL.into(),
	});

	directory
}

pub fn fixture(default_consumer: Option<ConsumerCredential>) -> Fixture {
	let mut builder = OAuthStoreConfig::builder(CALLBACK_TEMPLATE);

	if let Some(consumer) = default_consumer {
		builder = builder.default_consumer(consumer);
	}

	let config = builder.build().expect("Adapter configuration should be valid.");
	let store = MemoryStore::default();
	let directory = directory();
	let oauth = OAuthStore::new(
		config,
		Collaborators {
			users: Arc::new(directory.clone()),
			gadgets: Arc::new(directory.clone()),
			consumers: Arc::new(store.clone()),
			tokens: Arc::new(store.clone()),
			host: Arc::new(StaticHost::new(HOST)),
		},
	);

	Fixture { oauth, store, directory }
}

pub fn security_token() -> SecurityToken {
	SecurityToken::new(VIEWER.to_string(), APP_URL, ModuleId::new(7))
}

pub fn service() -> ServiceName {
	ServiceName::new("google").expect("Service fixture should be valid.")
}

pub fn token_name(name: &str) -> TokenName {
	TokenName::new(name).expect("Token name fixture should be valid.")
}

pub fn provider() -> ServiceProvider {
	ServiceProvider::new(
		Url::parse("https://provider.example.com/request")
			.expect("Request token URL should parse."),
		Url::parse("https://provider.example.com/authorize")
			.expect("Authorization URL should parse."),
		Url::parse("https://provider.example.com/access").expect("Access token URL should parse."),
	)
}
