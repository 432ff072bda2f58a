//! Portal user and gadget directory contracts consumed by the OAuth adapter.

pub mod memory;

pub use memory::MemoryDirectory;

// self
use crate::{
	_prelude::*,
	auth::{CompanyId, GadgetId, UserId},
};

/// Boxed future returned by directory lookups.
pub type DirectoryFuture<'a, T> =
	Pin<Box<dyn Future<Output = Result<T, DirectoryError>> + 'a + Send>>;

/// Resolves portal users.
pub trait UserDirectory
where
	Self: Send + Sync,
{
	/// Fetches the user, failing with [`DirectoryError::UnknownUser`] when absent.
	fn user(&self, user_id: UserId) -> DirectoryFuture<'_, User>;
}

/// Resolves registered gadgets.
pub trait GadgetDirectory
where
	Self: Send + Sync,
{
	/// Fetches the gadget registered under `url` for the company.
	fn gadget<'a>(&'a self, company_id: CompanyId, url: &'a str) -> DirectoryFuture<'a, Gadget>;
}

/// Portal user as seen by the adapter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	/// User identifier.
	pub user_id: UserId,
	/// Company (tenant) the user belongs to.
	pub company_id: CompanyId,
	/// Login name.
	pub screen_name: String,
}

/// Gadget registration owning its own OAuth consumers and tokens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gadget {
	/// Gadget identifier.
	pub gadget_id: GadgetId,
	/// Company the gadget is registered in.
	pub company_id: CompanyId,
	/// Display name.
	pub name: String,
	/// Gadget specification URL.
	pub url: String,
}

/// Error type produced by directory implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum DirectoryError {
	/// No user matches the identifier.
	#[error("No user exists with id {user_id}.")]
	UnknownUser {
		/// Requested user.
		user_id: UserId,
	},
	/// No gadget is registered under the URL for the company.
	#[error("No gadget is registered at {url} for company {company_id}.")]
	UnknownGadget {
		/// Requested company.
		company_id: CompanyId,
		/// Requested gadget URL.
		url: String,
	},
	/// Backend-level failure.
	#[error("Directory backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
