//! Portal-side adapters for embedded gadgets and issue tracker integrations.
//!
//! - [`oauth::OAuthStore`] resolves OAuth 1.0a consumer credentials and stored access tokens for
//!   gadgets, falling back to an explicitly configured default consumer.
//! - [`wizard::WizardController`] drives a page-indexed ticket creation wizard against any
//!   [`tracker::IssueTracker`] using caller-owned state instead of framework hooks.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod directory;
pub mod error;
pub mod oauth;
pub mod obs;
pub mod store;
pub mod tracker;
pub mod wizard;

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Date, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use url;
#[cfg(test)] use tokio as _;
