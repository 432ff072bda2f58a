//! Gadget security token carried by every OAuth adapter call.

// self
use crate::{
	_prelude::*,
	auth::{ModuleId, UserId},
};

/// Identity of the viewer rendering a gadget, as issued by the gadget container.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityToken {
	/// Viewer identifier as a raw string claim.
	pub viewer_id: String,
	/// Owner identifier as a raw string claim.
	pub owner_id: String,
	/// URL of the gadget specification, used to find the registered gadget.
	pub app_url: String,
	/// Gadget instance (module) rendered on the page.
	pub module_id: ModuleId,
	/// Container name that issued the token.
	pub container: String,
}
impl SecurityToken {
	/// Creates a token where the owner is the viewer and the container is `default`.
	pub fn new(
		viewer_id: impl Into<String>,
		app_url: impl Into<String>,
		module_id: ModuleId,
	) -> Self {
		let viewer_id = viewer_id.into();

		Self {
			owner_id: viewer_id.clone(),
			viewer_id,
			app_url: app_url.into(),
			module_id,
			container: "default".into(),
		}
	}

	/// Numeric viewer identifier.
	///
	/// Claims that do not parse as an unsigned integer map to user `0`, which no directory
	/// knows about, so the lookup that follows fails instead of this accessor.
	pub fn user_id(&self) -> UserId {
		UserId::new(self.viewer_id.trim().parse().unwrap_or(0))
	}
}
