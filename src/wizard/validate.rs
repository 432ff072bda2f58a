//! Field-level validation errors and the finish-page draft validator.

// self
use crate::{_prelude::*, tracker::TicketDraft};

/// Single field failure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
	/// Form field name (for example `issueType`).
	pub field: &'static str,
	/// Human-readable reason.
	pub message: String,
}

/// Ordered collection of field failures.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, ThisError)]
#[error("Ticket draft is invalid: {}.", describe(.fields))]
pub struct ValidationErrors {
	/// Failures in the order they were found.
	pub fields: Vec<FieldError>,
}
impl ValidationErrors {
	/// Creates an error list holding one failure.
	pub fn single(field: &'static str, message: impl Into<String>) -> Self {
		let mut errors = Self::default();

		errors.push(field, message);

		errors
	}

	/// Records a failure.
	pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
		self.fields.push(FieldError { field, message: message.into() });
	}

	/// Returns `true` when no failure was recorded.
	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	/// Returns `true` when `field` has at least one failure.
	pub fn has_field(&self, field: &str) -> bool {
		self.fields.iter().any(|error| error.field == field)
	}

	/// `Ok(())` when empty, otherwise `Err(self)`.
	pub fn into_result(self) -> Result<(), Self> {
		if self.is_empty() { Ok(()) } else { Err(self) }
	}
}

fn describe(fields: &[FieldError]) -> String {
	fields
		.iter()
		.map(|error| format!("{} {}", error.field, error.message))
		.collect::<Vec<_>>()
		.join("; ")
}

/// Validates a draft before it is submitted.
pub trait DraftValidator
where
	Self: Send + Sync,
{
	/// Appends every failure found in `draft` to `errors`.
	fn validate(&self, draft: &TicketDraft, errors: &mut ValidationErrors);
}

/// Requires project, issue type, summary, and reporter.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequiredFieldsValidator;
impl DraftValidator for RequiredFieldsValidator {
	fn validate(&self, draft: &TicketDraft, errors: &mut ValidationErrors) {
		if draft.project.is_none() {
			errors.push("project", "is required");
		}
		if draft.issue_type.is_none() {
			errors.push("issueType", "is required");
		}
		if draft.summary.trim().is_empty() {
			errors.push("summary", "is required");
		}
		if draft.reporter_name.trim().is_empty() {
			errors.push("reporterName", "is required");
		}
	}
}
