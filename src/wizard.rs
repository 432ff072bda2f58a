//! Page-driven ticket creation wizard.
//!
//! The caller owns a [`WizardState`] (page index, draft, tracker session) and hands it to
//! [`WizardController::reference_data`] for every page render. Reference data for page 0 lists
//! projects and issue types; page 1 lists priorities, components, and versions of the chosen
//! project and pins the reporter to the configured user name. Higher pages report
//! [`PageView::Done`].
//!
//! Submission is deliberately lenient: [`WizardController::process_finish`] returns an empty
//! [`FinishResponse`] when the session is not connected, while reference data retrieval fails
//! with [`Error::NotConnected`].

pub mod binder;
pub mod validate;

pub use binder::*;
pub use validate::*;

// self
use crate::{
	_prelude::*,
	auth::TicketKey,
	config::WizardPreferences,
	obs::{self, OpKind, debug_event, warn_event},
	tracker::{Component, IssueType, Priority, Project, TicketDraft, TrackerSession, Version},
};

/// View rendered after a ticket was submitted.
pub const FINISH_VIEW: &str = "createTicketFinish";

/// Caller-owned wizard state.
#[derive(Clone, Debug, Default)]
pub struct WizardState {
	/// Zero-based page index.
	pub page: usize,
	/// Draft accumulated so far.
	pub draft: TicketDraft,
	/// Tracker connection held in the caller's session.
	pub session: TrackerSession,
}

/// Reference data a page needs to render.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "page")]
pub enum ReferenceData {
	/// Page 0: choose project and issue type.
	#[serde(rename = "0", rename_all = "camelCase")]
	Overview {
		/// Projects visible to the session.
		projects: Vec<Project>,
		/// Available issue types.
		issue_types: Vec<IssueType>,
	},
	/// Page 1: fill in the ticket details.
	#[serde(rename = "1", rename_all = "camelCase")]
	Details {
		/// Project chosen on page 0.
		project: Project,
		/// Issue type chosen on page 0.
		issue_type: Option<IssueType>,
		/// Available priorities.
		priorities: Vec<Priority>,
		/// Reporter name taken from the preferences.
		reporter: String,
		/// Components of the chosen project.
		components: Vec<Component>,
		/// Versions of the chosen project.
		versions: Vec<Version>,
	},
}

/// Result of a page render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageView {
	/// Render the page with this data.
	Page(ReferenceData),
	/// There are no more pages.
	Done,
}

/// Parameters produced by a submission for the next render.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinishResponse {
	/// Tracker-assigned key; `None` when submission was skipped.
	pub ticket_key: Option<TicketKey>,
}

/// Confirmation page model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConfirmationView {
	/// View name.
	pub view: &'static str,
	/// Key of the created ticket.
	pub ticket_key: Option<TicketKey>,
	/// Tracker URL preference.
	pub url: String,
}

/// Stateless controller driving the wizard pages.
#[derive(Clone)]
pub struct WizardController {
	validator: Arc<dyn DraftValidator>,
	binder: FormBinder,
}
impl WizardController {
	/// Creates a controller using [`RequiredFieldsValidator`].
	pub fn new() -> Self {
		Self::with_validator(Arc::new(RequiredFieldsValidator))
	}

	/// Creates a controller with a custom finish-page validator.
	pub fn with_validator(validator: Arc<dyn DraftValidator>) -> Self {
		Self { validator, binder: FormBinder }
	}

	/// Form binder used for page submissions.
	pub fn binder(&self) -> &FormBinder {
		&self.binder
	}

	/// Binds submitted parameters onto the draft held in `state`.
	pub fn bind(&self, state: &mut WizardState, params: &FormParams) -> BindingResult {
		self.binder.bind(&mut state.draft, params)
	}

	/// Fetches the reference data for `state.page`.
	///
	/// Page 1 overwrites `state.draft.reporter_name` with the user name preference.
	pub async fn reference_data(
		&self,
		state: &mut WizardState,
		prefs: &WizardPreferences,
	) -> Result<PageView> {
		let WizardState { page, draft, session } = state;
		let page = *page;

		obs::observe(OpKind::WizardPage, "reference_data", async move {
			let (tracker, token) = session.connection().ok_or(Error::NotConnected)?;

			match page {
				0 => {
					let projects = tracker.projects(token).await?;
					let issue_types = tracker.issue_types(token).await?;

					Ok(PageView::Page(ReferenceData::Overview { projects, issue_types }))
				},
				1 => {
					let project = draft.project.clone().ok_or_else(|| {
						ValidationErrors::single("project", "must be chosen before page 1")
					})?;
					let priorities = tracker.priorities(token).await?;
					let reporter = prefs.user_name.clone();

					draft.reporter_name = reporter.clone();

					let components = tracker.components(token, &project.key).await?;
					let versions = tracker.versions(token, &project.key).await?;

					Ok(PageView::Page(ReferenceData::Details {
						issue_type: draft.issue_type.clone(),
						project,
						priorities,
						reporter,
						components,
						versions,
					}))
				},
				_ => Ok(PageView::Done),
			}
		})
		.await
	}

	/// Validates the draft, but only when the caller is finishing the wizard.
	///
	/// The same rules apply whichever page the finish was requested from.
	pub fn validate_page(&self, draft: &TicketDraft, _page: usize, finish: bool) -> Result<()> {
		if !finish {
			return Ok(());
		}

		let mut errors = ValidationErrors::default();

		self.validator.validate(draft, &mut errors);

		debug_event!(failures = errors.fields.len(), "Validated ticket draft.");

		Ok(errors.into_result()?)
	}

	/// Submits the draft, skipping silently when the session is not connected.
	pub async fn process_finish(
		&self,
		session: &TrackerSession,
		draft: &TicketDraft,
	) -> Result<FinishResponse> {
		obs::observe(OpKind::WizardSubmit, "process_finish", async move {
			let Some((tracker, token)) = session.connection() else {
				warn_event!("Issue tracker session is not connected; skipping ticket submission.");

				return Ok(FinishResponse::default());
			};
			let ticket_key = tracker.create_issue(token, draft).await?;

			debug_event!(ticket = %ticket_key, "Created ticket.");

			Ok(FinishResponse { ticket_key: Some(ticket_key) })
		})
		.await
	}

	/// Builds the confirmation view from the submission response and the URL preference.
	pub fn render_finish(
		&self,
		response: &FinishResponse,
		prefs: &WizardPreferences,
	) -> ConfirmationView {
		ConfirmationView {
			view: FINISH_VIEW,
			ticket_key: response.ticket_key.clone(),
			url: prefs.url.clone(),
		}
	}
}
impl Default for WizardController {
	fn default() -> Self {
		Self::new()
	}
}
impl Debug for WizardController {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("WizardController(..)")
	}
}
