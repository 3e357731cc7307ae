//! Application form rules
//!
//! Every job starts with five default fields. Employers may add, edit and
//! remove their own fields, but never touch the defaults.

use std::collections::HashSet;

use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::db::models::{FieldType, JobFormField};
use crate::errors::{AppError, Result};

pub struct DefaultField {
    pub label: &'static str,
    pub field_type: FieldType,
    pub placeholder: &'static str,
}

pub const DEFAULT_FIELDS: [DefaultField; 5] = [
    DefaultField {
        label: "Full Name",
        field_type: FieldType::Text,
        placeholder: "Enter your full name",
    },
    DefaultField {
        label: "Email",
        field_type: FieldType::Email,
        placeholder: "you@example.com",
    },
    DefaultField {
        label: "Phone",
        field_type: FieldType::Phone,
        placeholder: "+1 555 123 4567",
    },
    DefaultField {
        label: "Resume URL",
        field_type: FieldType::Url,
        placeholder: "https://",
    },
    DefaultField {
        label: "Years of Experience",
        field_type: FieldType::Number,
        placeholder: "0",
    },
];

/// Employer-defined field as submitted
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FormFieldInput {
    /// Present when editing an existing field
    pub id: Option<Uuid>,

    #[validate(length(min = 1, max = 200, message = "Label must be 1-200 characters"))]
    pub label: String,

    pub field_type: FieldType,

    #[serde(default)]
    pub is_required: bool,

    #[serde(default)]
    pub options: Vec<String>,

    #[validate(length(max = 200))]
    pub placeholder: Option<String>,

    pub display_order: Option<i32>,
}

/// One answer in an application
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerInput {
    pub field_id: Uuid,
    #[serde(default)]
    pub answer: String,
}

/// Custom-field changes produced by an upsert
#[derive(Debug, Default)]
pub struct FormPlan {
    pub updates: Vec<JobFormField>,
    pub inserts: Vec<JobFormField>,
}

/// The five defaults for a new job, in display order
pub fn default_fields(job_id: Uuid, now: DateTimeWithTimeZone) -> Vec<JobFormField> {
    DEFAULT_FIELDS
        .iter()
        .enumerate()
        .map(|(idx, field)| JobFormField {
            id: Uuid::new_v4(),
            job_id,
            label: field.label.to_string(),
            field_type: field.field_type,
            is_required: true,
            is_default: true,
            options: Vec::new(),
            placeholder: Some(field.placeholder.to_string()),
            display_order: idx as i32 + 1,
            created_at: now,
        })
        .collect()
}

/// Default fields can be neither edited nor deleted
pub fn ensure_editable(field: &JobFormField) -> Result<()> {
    if field.is_default {
        return Err(AppError::invalid_operation(format!(
            "'{}' is a default field and cannot be modified",
            field.label
        )));
    }
    Ok(())
}

fn clean_options(input: &FormFieldInput) -> Result<Vec<String>> {
    input.validate()?;

    let mut seen = HashSet::new();
    let options: Vec<String> = input
        .options
        .iter()
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty() && seen.insert(o.to_lowercase()))
        .collect();

    if input.field_type.needs_options() {
        if options.is_empty() {
            return Err(AppError::validation(
                "options",
                format!("'{}' needs at least one option", input.label.trim()),
            ));
        }
        Ok(options)
    } else {
        Ok(Vec::new())
    }
}

fn new_field(
    job_id: Uuid,
    input: &FormFieldInput,
    display_order: i32,
    now: DateTimeWithTimeZone,
) -> Result<JobFormField> {
    Ok(JobFormField {
        id: Uuid::new_v4(),
        job_id,
        label: input.label.trim().to_string(),
        field_type: input.field_type,
        is_required: input.is_required,
        is_default: false,
        options: clean_options(input)?,
        placeholder: input.placeholder.clone(),
        display_order,
        created_at: now,
    })
}

fn reject_default_ids(existing: &[JobFormField], inputs: &[FormFieldInput]) -> Result<()> {
    for id in inputs.iter().filter_map(|i| i.id) {
        if let Some(field) = existing.iter().find(|f| f.id == id) {
            ensure_editable(field)?;
        }
    }
    Ok(())
}

/// Lowest display order a custom field may take; defaults keep the top of the form
fn first_custom_order(existing: &[JobFormField]) -> i32 {
    existing
        .iter()
        .filter(|f| f.is_default)
        .map(|f| f.display_order)
        .max()
        .unwrap_or(0)
        + 1
}

fn by_requested_order(mut inputs: Vec<FormFieldInput>) -> Vec<FormFieldInput> {
    inputs.sort_by_key(|i| i.display_order.unwrap_or(i32::MAX));
    inputs
}

/// Fields for a job being created: custom fields follow the defaults
pub fn fields_for_new_job(
    job_id: Uuid,
    custom: Vec<FormFieldInput>,
    now: DateTimeWithTimeZone,
) -> Result<Vec<JobFormField>> {
    let mut fields = default_fields(job_id, now);
    let first = fields.len() as i32 + 1;
    for (idx, input) in by_requested_order(custom).iter().enumerate() {
        fields.push(new_field(job_id, input, first + idx as i32, now)?);
    }
    Ok(fields)
}

/// New custom field set replacing every existing custom field
pub fn plan_replace(
    job_id: Uuid,
    existing: &[JobFormField],
    inputs: Vec<FormFieldInput>,
    now: DateTimeWithTimeZone,
) -> Result<Vec<JobFormField>> {
    reject_default_ids(existing, &inputs)?;

    let first = first_custom_order(existing);

    by_requested_order(inputs)
        .iter()
        .enumerate()
        .map(|(idx, input)| new_field(job_id, input, first + idx as i32, now))
        .collect()
}

/// Update fields that carry an id, append the rest, keep unlisted fields
pub fn plan_upsert(
    job_id: Uuid,
    existing: &[JobFormField],
    inputs: Vec<FormFieldInput>,
    now: DateTimeWithTimeZone,
) -> Result<FormPlan> {
    reject_default_ids(existing, &inputs)?;

    let floor = first_custom_order(existing);
    let mut next_order = existing.iter().map(|f| f.display_order).max().unwrap_or(0) + 1;
    let mut plan = FormPlan::default();

    for input in by_requested_order(inputs) {
        match input.id {
            Some(id) => {
                let current = existing
                    .iter()
                    .find(|f| f.id == id)
                    .ok_or_else(|| AppError::not_found(format!("Form field {} not found", id)))?;
                plan.updates.push(JobFormField {
                    label: input.label.trim().to_string(),
                    field_type: input.field_type,
                    is_required: input.is_required,
                    options: clean_options(&input)?,
                    placeholder: input.placeholder.clone(),
                    display_order: input
                        .display_order
                        .unwrap_or(current.display_order)
                        .max(floor),
                    ..current.clone()
                });
            }
            None => {
                plan.inserts.push(new_field(job_id, &input, next_order, now)?);
                next_order += 1;
            }
        }
    }

    Ok(plan)
}

/// Check submitted answers against a job's form.
///
/// Unknown and repeated fields are rejected; the first missing required
/// field (by display order) is named in the error. Blank answers count as
/// missing.
pub fn check_responses(fields: &[JobFormField], answers: &[AnswerInput]) -> Result<()> {
    let mut answered = HashSet::new();

    for answer in answers {
        if !fields.iter().any(|f| f.id == answer.field_id) {
            return Err(AppError::validation(
                "responses",
                format!("Field {} is not part of this job's form", answer.field_id),
            ));
        }
        if !answered.insert(answer.field_id) {
            return Err(AppError::validation(
                "responses",
                format!("Field {} was answered more than once", answer.field_id),
            ));
        }
    }

    let mut ordered: Vec<&JobFormField> = fields.iter().collect();
    ordered.sort_by_key(|f| f.display_order);

    let missing = ordered.into_iter().filter(|f| f.is_required).find(|field| {
        !answers
            .iter()
            .any(|a| a.field_id == field.id && !a.answer.trim().is_empty())
    });

    match missing {
        Some(field) => Err(AppError::validation(
            "responses",
            format!("{} is required", field.label),
        )),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    fn now() -> DateTimeWithTimeZone {
        chrono::Utc::now().into()
    }

    fn custom(label: &str, field_type: FieldType, required: bool) -> FormFieldInput {
        FormFieldInput {
            id: None,
            label: label.to_string(),
            field_type,
            is_required: required,
            options: Vec::new(),
            placeholder: None,
            display_order: None,
        }
    }

    fn answer(field: &JobFormField, text: &str) -> AnswerInput {
        AnswerInput {
            field_id: field.id,
            answer: text.to_string(),
        }
    }

    #[test]
    fn test_defaults_are_seeded_in_order() {
        let fields = default_fields(Uuid::new_v4(), now());
        let labels: Vec<_> = fields.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(
            labels,
            ["Full Name", "Email", "Phone", "Resume URL", "Years of Experience"]
        );
        assert!(fields.iter().all(|f| f.is_default && f.is_required));
        assert_eq!(fields[4].field_type, FieldType::Number);
    }

    #[test]
    fn test_default_field_cannot_be_modified() {
        let fields = default_fields(Uuid::new_v4(), now());
        let err = ensure_editable(&fields[0]).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidOperation);
    }

    #[test]
    fn test_custom_fields_follow_defaults() {
        let job_id = Uuid::new_v4();
        let fields = fields_for_new_job(
            job_id,
            vec![custom("Cover letter", FieldType::Textarea, false)],
            now(),
        )
        .unwrap();
        assert_eq!(fields.len(), 6);
        assert_eq!(fields[5].display_order, 6);
        assert!(!fields[5].is_default);
    }

    #[test]
    fn test_select_needs_options() {
        let err = fields_for_new_job(
            Uuid::new_v4(),
            vec![custom("Shift", FieldType::Select, true)],
            now(),
        )
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);

        let mut shift = custom("Shift", FieldType::Select, true);
        shift.options = vec![" Day ".into(), "day".into(), "".into(), "Night".into()];
        let fields = fields_for_new_job(Uuid::new_v4(), vec![shift], now()).unwrap();
        assert_eq!(fields[5].options, vec!["Day", "Night"]);
    }

    #[test]
    fn test_replace_rejects_default_ids() {
        let job_id = Uuid::new_v4();
        let existing = default_fields(job_id, now());
        let mut input = custom("Name", FieldType::Text, true);
        input.id = Some(existing[0].id);

        let err = plan_replace(job_id, &existing, vec![input], now()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidOperation);
    }

    #[test]
    fn test_upsert_updates_and_appends() {
        let job_id = Uuid::new_v4();
        let existing =
            fields_for_new_job(job_id, vec![custom("Portfolio", FieldType::Url, false)], now())
                .unwrap();
        let portfolio = existing[5].clone();

        let mut edit = custom("Portfolio link", FieldType::Url, true);
        edit.id = Some(portfolio.id);
        let plan = plan_upsert(
            job_id,
            &existing,
            vec![edit, custom("Visa status", FieldType::Text, false)],
            now(),
        )
        .unwrap();

        assert_eq!(plan.updates.len(), 1);
        assert_eq!(plan.updates[0].id, portfolio.id);
        assert_eq!(plan.updates[0].label, "Portfolio link");
        assert!(plan.updates[0].is_required);
        assert_eq!(plan.inserts.len(), 1);
        assert_eq!(plan.inserts[0].display_order, 7);
    }

    #[test]
    fn test_upsert_cannot_move_custom_field_above_defaults() {
        let job_id = Uuid::new_v4();
        let existing =
            fields_for_new_job(job_id, vec![custom("Portfolio", FieldType::Url, false)], now())
                .unwrap();

        let mut edit = custom("Portfolio", FieldType::Url, false);
        edit.id = Some(existing[5].id);
        edit.display_order = Some(0);
        let plan = plan_upsert(job_id, &existing, vec![edit], now()).unwrap();
        assert_eq!(plan.updates[0].display_order, 6);

        let mut edit = custom("Portfolio", FieldType::Url, false);
        edit.id = Some(existing[5].id);
        edit.display_order = Some(9);
        let plan = plan_upsert(job_id, &existing, vec![edit], now()).unwrap();
        assert_eq!(plan.updates[0].display_order, 9);
    }

    #[test]
    fn test_upsert_unknown_id_is_not_found() {
        let job_id = Uuid::new_v4();
        let existing = default_fields(job_id, now());
        let mut edit = custom("Ghost", FieldType::Text, false);
        edit.id = Some(Uuid::new_v4());

        let err = plan_upsert(job_id, &existing, vec![edit], now()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[test]
    fn test_all_defaults_answered_passes() {
        let fields = default_fields(Uuid::new_v4(), now());
        let answers: Vec<_> = fields.iter().map(|f| answer(f, "x")).collect();
        assert!(check_responses(&fields, &answers).is_ok());
    }

    #[test]
    fn test_missing_required_custom_field_is_named() {
        let fields = fields_for_new_job(
            Uuid::new_v4(),
            vec![
                custom("Work authorization", FieldType::Text, true),
                custom("Hobbies", FieldType::Text, false),
            ],
            now(),
        )
        .unwrap();
        let answers: Vec<_> = fields[..5].iter().map(|f| answer(f, "x")).collect();

        let err = check_responses(&fields, &answers).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
        assert_eq!(err.to_string(), "Work authorization is required");
    }

    #[test]
    fn test_blank_answer_counts_as_missing() {
        let fields = default_fields(Uuid::new_v4(), now());
        let mut answers: Vec<_> = fields.iter().map(|f| answer(f, "x")).collect();
        answers[1].answer = "   ".into();

        let err = check_responses(&fields, &answers).unwrap_err();
        assert_eq!(err.to_string(), "Email is required");
    }

    #[test]
    fn test_unknown_and_duplicate_answers_rejected() {
        let fields = default_fields(Uuid::new_v4(), now());
        let mut answers: Vec<_> = fields.iter().map(|f| answer(f, "x")).collect();
        answers.push(AnswerInput {
            field_id: Uuid::new_v4(),
            answer: "?".into(),
        });
        assert!(check_responses(&fields, &answers).is_err());

        answers.pop();
        answers.push(answer(&fields[0], "again"));
        assert!(check_responses(&fields, &answers).is_err());
    }
}
