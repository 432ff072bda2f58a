//! In-process [`IssueTracker`] for demos and tests.

// self
use crate::{
	_prelude::*,
	auth::{ProjectKey, TicketKey},
	tracker::{
		Component, IssueTracker, IssueType, Priority, Project, TicketDraft, TrackerError,
		TrackerFuture, Version,
	},
};

#[derive(Debug, Default)]
struct Catalog {
	projects: Vec<Project>,
	issue_types: Vec<IssueType>,
	priorities: Vec<Priority>,
	components: HashMap<ProjectKey, Vec<Component>>,
	versions: HashMap<ProjectKey, Vec<Version>>,
	created: Vec<(TicketKey, TicketDraft)>,
	counters: HashMap<ProjectKey, u64>,
}

/// Tracker that serves a fixed catalog and records created tickets.
///
/// Ticket keys are assigned per project as `{PROJECT}-{n}` starting at 1. Calls made with any
/// security token other than the one given to [`MemoryTracker::new`] fail with
/// [`TrackerError::Unauthorized`].
#[derive(Clone, Debug)]
pub struct MemoryTracker {
	security_token: String,
	catalog: Arc<RwLock<Catalog>>,
}
impl MemoryTracker {
	/// Creates an empty tracker accepting `security_token`.
	pub fn new(security_token: impl Into<String>) -> Self {
		Self { security_token: security_token.into(), catalog: Default::default() }
	}

	/// Adds a project.
	pub fn with_project(self, project: Project) -> Self {
		self.catalog.write().projects.push(project);

		self
	}

	/// Adds an issue type.
	pub fn with_issue_type(self, issue_type: IssueType) -> Self {
		self.catalog.write().issue_types.push(issue_type);

		self
	}

	/// Adds a priority.
	pub fn with_priority(self, priority: Priority) -> Self {
		self.catalog.write().priorities.push(priority);

		self
	}

	/// Adds a component to a project.
	pub fn with_component(self, project: &ProjectKey, component: Component) -> Self {
		self.catalog.write().components.entry(project.clone()).or_default().push(component);

		self
	}

	/// Adds a version to a project.
	pub fn with_version(self, project: &ProjectKey, version: Version) -> Self {
		self.catalog.write().versions.entry(project.clone()).or_default().push(version);

		self
	}

	/// Tickets created so far, in creation order.
	pub fn created(&self) -> Vec<(TicketKey, TicketDraft)> {
		self.catalog.read().created.clone()
	}

	fn authorize(&self, security_token: &str) -> Result<(), TrackerError> {
		if security_token == self.security_token {
			Ok(())
		} else {
			Err(TrackerError::Unauthorized)
		}
	}

	fn create_now(&self, draft: &TicketDraft) -> Result<TicketKey, TrackerError> {
		let project = draft
			.project_key()
			.ok_or_else(|| TrackerError::Rejected { message: "project is required".into() })?;
		let mut catalog = self.catalog.write();

		if !catalog.projects.iter().any(|known| &known.key == project) {
			return Err(TrackerError::Rejected { message: format!("unknown project {project}") });
		}

		let counter = catalog.counters.entry(project.clone()).or_default();

		*counter += 1;

		let key = TicketKey::new(format!("{project}-{counter}"))
			.map_err(|e| TrackerError::Backend { message: e.to_string() })?;

		catalog.created.push((key.clone(), draft.clone()));

		Ok(key)
	}
}
impl IssueTracker for MemoryTracker {
	fn projects<'a>(&'a self, security_token: &'a str) -> TrackerFuture<'a, Vec<Project>> {
		Box::pin(async move {
			self.authorize(security_token)?;

			Ok(self.catalog.read().projects.clone())
		})
	}

	fn issue_types<'a>(&'a self, security_token: &'a str) -> TrackerFuture<'a, Vec<IssueType>> {
		Box::pin(async move {
			self.authorize(security_token)?;

			Ok(self.catalog.read().issue_types.clone())
		})
	}

	fn priorities<'a>(&'a self, security_token: &'a str) -> TrackerFuture<'a, Vec<Priority>> {
		Box::pin(async move {
			self.authorize(security_token)?;

			Ok(self.catalog.read().priorities.clone())
		})
	}

	fn components<'a>(
		&'a self,
		security_token: &'a str,
		project: &'a ProjectKey,
	) -> TrackerFuture<'a, Vec<Component>> {
		Box::pin(async move {
			self.authorize(security_token)?;

			Ok(self.catalog.read().components.get(project).cloned().unwrap_or_default())
		})
	}

	fn versions<'a>(
		&'a self,
		security_token: &'a str,
		project: &'a ProjectKey,
	) -> TrackerFuture<'a, Vec<Version>> {
		Box::pin(async move {
			self.authorize(security_token)?;

			Ok(self.catalog.read().versions.get(project).cloned().unwrap_or_default())
		})
	}

	fn create_issue<'a>(
		&'a self,
		security_token: &'a str,
		draft: &'a TicketDraft,
	) -> TrackerFuture<'a, TicketKey> {
		Box::pin(async move {
			self.authorize(security_token)?;
			self.create_now(draft)
		})
	}
}
