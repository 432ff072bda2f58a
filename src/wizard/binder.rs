//! Allow-listed binding of submitted form parameters onto a [`TicketDraft`].

// crates.io
use time::macros::format_description;
// self
use crate::{
	_prelude::*,
	auth::ProjectKey,
	tracker::{Component, IssueType, Priority, Project, TicketDraft, Version},
	wizard::ValidationErrors,
};

/// Submitted form parameters; every name may carry several values.
pub type FormParams = BTreeMap<String, Vec<String>>;

/// Field names that may be bound onto a draft.
pub const ALLOWED_FIELDS: [&str; 12] = [
	"project",
	"issueType",
	"priority",
	"summary",
	"reporterName",
	"dueDate",
	"components",
	"versions",
	"fixedVersions",
	"assigneeName",
	"environment",
	"description",
];

/// Outcome of a bind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BindingResult {
	/// Conversion failures, one per offending field.
	pub errors: ValidationErrors,
	/// Submitted names that are not bindable and were ignored.
	pub suppressed: Vec<String>,
}
impl BindingResult {
	/// Returns `true` when every allowed field converted.
	pub fn is_ok(&self) -> bool {
		self.errors.is_empty()
	}
}

/// Binds form parameters onto drafts using typed converters.
#[derive(Clone, Copy, Debug, Default)]
pub struct FormBinder;
impl FormBinder {
	/// Binds every allowed parameter in `params` onto `draft`.
	///
	/// Fields that fail to convert keep their previous value.
	pub fn bind(&self, draft: &mut TicketDraft, params: &FormParams) -> BindingResult {
		let mut result = BindingResult::default();

		for (name, values) in params {
			let Some(&field) = ALLOWED_FIELDS.iter().find(|allowed| **allowed == name.as_str())
			else {
				result.suppressed.push(name.clone());

				continue;
			};

			if let Err(message) = Self::bind_field(draft, field, values) {
				result.errors.push(field, message);
			}
		}

		result
	}

	/// Parses a due date in the `MM/DD/YYYY` pattern; single-digit months and days are accepted.
	pub fn parse_due_date(value: &str) -> Result<Date, time::error::Parse> {
		Date::parse(
			value.trim(),
			format_description!("[month padding:none]/[day padding:none]/[year]"),
		)
	}

	/// Formats a due date as `MM/DD/YYYY`.
	pub fn format_due_date(date: Date) -> Result<String, time::error::Format> {
		date.format(format_description!("[month]/[day]/[year]"))
	}

	fn bind_field(
		draft: &mut TicketDraft,
		field: &'static str,
		values: &[String],
	) -> Result<(), String> {
		let scalar = values.first().map(String::as_str).unwrap_or_default();
		let blank = scalar.trim().is_empty();

		match field {
			"project" =>
				draft.project = if blank {
					None
				} else {
					let key = ProjectKey::new(scalar.trim())
						.map_err(|e| format!("is not a valid project key ({e})"))?;

					Some(Project::from_key(key))
				},
			"issueType" => draft.issue_type = (!blank).then(|| IssueType::from_id(scalar.trim())),
			"priority" => draft.priority = (!blank).then(|| Priority::from_id(scalar.trim())),
			"dueDate" =>
				draft.due_date = if blank {
					None
				} else {
					Some(
						Self::parse_due_date(scalar)
							.map_err(|_| "must use the MM/DD/YYYY format".to_owned())?,
					)
				},
			"components" => draft.components = collect_ids(values, |id| Component::from_id(id)),
			"versions" => draft.versions = collect_ids(values, |id| Version::from_id(id)),
			"fixedVersions" =>
				draft.fixed_versions = collect_ids(values, |id| Version::from_id(id)),
			"summary" => draft.summary = scalar.to_owned(),
			"reporterName" => draft.reporter_name = scalar.to_owned(),
			"assigneeName" => draft.assignee_name = scalar.to_owned(),
			"environment" => draft.environment = scalar.to_owned(),
			"description" => draft.description = scalar.to_owned(),
			other => return Err(format!("has no converter for `{other}`")),
		}

		Ok(())
	}
}

fn collect_ids<T>(values: &[String], make: impl Fn(&str) -> T) -> Vec<T> {
	values.iter().map(|value| value.trim()).filter(|value| !value.is_empty()).map(make).collect()
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	fn params(entries: &[(&str, Vec<&str>)]) -> FormParams {
		entries
			.iter()
			.map(|(name, values)| {
				(name.to_string(), values.iter().map(|value| value.to_string()).collect())
			})
			.collect()
	}

	#[test]
	fn binds_allowed_fields_with_converters() {
		let mut draft = TicketDraft::default();
		let result = FormBinder.bind(
			&mut draft,
			&params(&[
				("project", vec!["PORTAL"]),
				("issueType", vec!["1"]),
				("priority", vec!["3"]),
				("summary", vec!["Search returns stale results"]),
				("dueDate", vec!["3/7/2026"]),
				("components", vec!["10", " ", "11"]),
				("versions", vec!["20"]),
				("fixedVersions", vec!["21", "22"]),
				("description", vec!["Steps to reproduce..."]),
			]),
		);

		assert!(result.is_ok(), "Unexpected binding errors: {:?}", result.errors);
		assert!(result.suppressed.is_empty());
		assert_eq!(draft.project_key().map(|key| &**key), Some("PORTAL"));
		assert_eq!(draft.issue_type, Some(IssueType::from_id("1")));
		assert_eq!(draft.priority, Some(Priority::from_id("3")));
		assert_eq!(draft.due_date, Some(macros::date!(2026 - 03 - 07)));
		assert_eq!(draft.components, [Component::from_id("10"), Component::from_id("11")]);
		assert_eq!(draft.versions, [Version::from_id("20")]);
		assert_eq!(draft.fixed_versions.len(), 2);
		assert_eq!(draft.summary, "Search returns stale results");
	}

	#[test]
	fn disallowed_fields_are_suppressed() {
		let mut draft = TicketDraft::default();
		let result = FormBinder.bind(
			&mut draft,
			&params(&[("summary", vec!["ok"]), ("id", vec!["999"]), ("status", vec!["closed"])]),
		);

		assert!(result.is_ok());
		assert_eq!(result.suppressed, ["id", "status"]);
		assert_eq!(draft.summary, "ok");
	}

	#[test]
	fn conversion_failures_are_collected_per_field() {
		let mut draft = TicketDraft {
			due_date: Some(macros::date!(2026 - 01 - 01)),
			..Default::default()
		};
		let result = FormBinder.bind(
			&mut draft,
			&params(&[("dueDate", vec!["2026-03-07"]), ("project", vec!["NOT A KEY"])]),
		);

		assert!(!result.is_ok());
		assert!(result.errors.has_field("dueDate"));
		assert!(result.errors.has_field("project"));
		assert_eq!(draft.due_date, Some(macros::date!(2026 - 01 - 01)));
	}

	#[test]
	fn blank_values_clear_optional_fields() {
		let mut draft = TicketDraft {
			due_date: Some(macros::date!(2026 - 01 - 01)),
			components: vec![Component::from_id("1")],
			..Default::default()
		};
		let result =
			FormBinder.bind(&mut draft, &params(&[("dueDate", vec![""]), ("components", vec![])]));

		assert!(result.is_ok());
		assert_eq!(draft.due_date, None);
		assert!(draft.components.is_empty());
	}

	#[test]
	fn due_dates_use_month_day_year() {
		assert_eq!(
			FormBinder::parse_due_date("12/31/2025").expect("Valid due date should parse."),
			macros::date!(2025 - 12 - 31)
		);
		assert!(FormBinder::parse_due_date("13/01/2025").is_err());
		assert_eq!(
			FormBinder::format_due_date(macros::date!(2026 - 03 - 07))
				.expect("Due date should format."),
			"03/07/2026"
		);
	}
}
