//! In-process [`UserDirectory`] + [`GadgetDirectory`] for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::{CompanyId, UserId},
	directory::{DirectoryError, DirectoryFuture, Gadget, GadgetDirectory, User, UserDirectory},
};

#[derive(Debug, Default)]
struct Entries {
	users: HashMap<UserId, User>,
	gadgets: HashMap<(CompanyId, String), Gadget>,
}

/// Thread-safe directory that keeps users and gadgets in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryDirectory(Arc<RwLock<Entries>>);
impl MemoryDirectory {
	/// Registers (or replaces) a user.
	pub fn insert_user(&self, user: User) {
		self.0.write().users.insert(user.user_id, user);
	}

	/// Registers (or replaces) a gadget under its company and URL.
	pub fn insert_gadget(&self, gadget: Gadget) {
		self.0.write().gadgets.insert((gadget.company_id, gadget.url.clone()), gadget);
	}

	fn user_now(&self, user_id: UserId) -> Result<User, DirectoryError> {
		self.0.read().users.get(&user_id).cloned().ok_or(DirectoryError::UnknownUser { user_id })
	}

	fn gadget_now(&self, company_id: CompanyId, url: &str) -> Result<Gadget, DirectoryError> {
		self.0
			.read()
			.gadgets
			.get(&(company_id, url.to_owned()))
			.cloned()
			.ok_or_else(|| DirectoryError::UnknownGadget { company_id, url: url.to_owned() })
	}
}
impl UserDirectory for MemoryDirectory {
	fn user(&self, user_id: UserId) -> DirectoryFuture<'_, User> {
		Box::pin(async move { self.user_now(user_id) })
	}
}
impl GadgetDirectory for MemoryDirectory {
	fn gadget<'a>(&'a self, company_id: CompanyId, url: &'a str) -> DirectoryFuture<'a, Gadget> {
		Box::pin(async move { self.gadget_now(company_id, url) })
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use tokio::runtime::Runtime;
	// self
	use super::*;
	use crate::auth::GadgetId;

	#[test]
	fn lookups_hit_and_miss() {
		let directory = MemoryDirectory::default();
		let rt = Runtime::new().expect("Failed to build Tokio runtime for directory test.");

		directory.insert_user(User {
			user_id: UserId::new(10),
			company_id: CompanyId::new(1),
			screen_name: "test".into(),
		});
		directory.insert_gadget(Gadget {
			gadget_id: GadgetId::new(5),
			company_id: CompanyId::new(1),
			name: "Calendar".into(),
			url: "https://gadgets.example.com/cal.xml".into(),
		});

		let user =
			rt.block_on(directory.user(UserId::new(10))).expect("Known user should resolve.");

		assert_eq!(user.company_id, CompanyId::new(1));

		let gadget = rt
			.block_on(directory.gadget(CompanyId::new(1), "https://gadgets.example.com/cal.xml"))
			.expect("Known gadget should resolve.");

		assert_eq!(gadget.gadget_id, GadgetId::new(5));
		assert_eq!(
			rt.block_on(directory.user(UserId::new(0))),
			Err(DirectoryError::UnknownUser { user_id: UserId::new(0) })
		);
		assert!(matches!(
			rt.block_on(directory.gadget(CompanyId::new(2), "https://gadgets.example.com/cal.xml")),
			Err(DirectoryError::UnknownGadget { .. })
		));
	}
}
