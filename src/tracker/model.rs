//! Issue tracker reference data and the ticket draft accumulated by the wizard.

// self
use crate::{_prelude::*, auth::ProjectKey};

/// Tracker project.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
	/// Tracker-internal identifier; empty when only the key is known.
	pub id: String,
	/// Project key used to scope components, versions, and ticket keys.
	pub key: ProjectKey,
	/// Display name.
	pub name: String,
}
impl Project {
	/// Creates a fully described project.
	pub fn new(id: impl Into<String>, key: ProjectKey, name: impl Into<String>) -> Self {
		Self { id: id.into(), key, name: name.into() }
	}

	/// Creates a reference carrying only the key, as bound from a form.
	pub fn from_key(key: ProjectKey) -> Self {
		Self { id: String::new(), key, name: String::new() }
	}
}

macro_rules! def_named_ref {
	($name:ident, $doc:literal) => {
		#[doc = $doc]
		#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
		pub struct $name {
			/// Tracker-internal identifier.
			pub id: String,
			/// Display name; empty when only the identifier is known.
			pub name: String,
		}
		impl $name {
			/// Creates a fully described value.
			pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
				Self { id: id.into(), name: name.into() }
			}

			/// Creates a reference carrying only the identifier, as bound from a form.
			pub fn from_id(id: impl Into<String>) -> Self {
				Self { id: id.into(), name: String::new() }
			}
		}
	};
}

def_named_ref! { IssueType, "Kind of ticket (bug, task, improvement)." }
def_named_ref! { Priority, "Ticket priority." }
def_named_ref! { Component, "Project component a ticket can be filed against." }
def_named_ref! { Version, "Project version a ticket affects or is fixed in." }

/// In-progress ticket accumulated across wizard pages.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketDraft {
	/// Target project.
	pub project: Option<Project>,
	/// Ticket kind.
	pub issue_type: Option<IssueType>,
	/// Priority.
	pub priority: Option<Priority>,
	/// One-line summary.
	pub summary: String,
	/// Reporter's tracker user name.
	pub reporter_name: String,
	/// Due date.
	pub due_date: Option<Date>,
	/// Affected components.
	pub components: Vec<Component>,
	/// Affected versions.
	pub versions: Vec<Version>,
	/// Versions the ticket is planned to be fixed in.
	pub fixed_versions: Vec<Version>,
	/// Assignee's tracker user name.
	pub assignee_name: String,
	/// Environment description.
	pub environment: String,
	/// Full description.
	pub description: String,
}
impl TicketDraft {
	/// Key of the chosen project, if any.
	pub fn project_key(&self) -> Option<&ProjectKey> {
		self.project.as_ref().map(|project| &project.key)
	}
}
