//! Employer form editing through the job service

mod support;

use jobboard_common::db::models::*;
use jobboard_common::domain::form_fields::FormFieldInput;
use jobboard_common::errors::ErrorCode;
use jobboard_common::services::jobs::FormRequest;
use jobboard_common::services::JobService;
use sea_orm::MockExecResult;
use support::*;
use tokio_test::{assert_err, assert_ok};
use uuid::Uuid;

fn select_input(label: &str, options: &[&str]) -> FormFieldInput {
    FormFieldInput {
        id: None,
        label: label.into(),
        field_type: FieldType::Select,
        is_required: true,
        options: options.iter().map(|o| o.to_string()).collect(),
        placeholder: None,
        display_order: None,
    }
}

#[tokio::test]
async fn default_fields_cannot_be_deleted() {
    let employer_id = Uuid::new_v4();
    let posting = job(Uuid::new_v4(), employer_id, JobStatus::Active);
    let email = field(posting.id, "Email", true, true, 2);
    let conn = mock()
        .append_query_results([vec![posting.clone()]])
        .append_query_results([vec![email.clone()]])
        .into_connection();
    let service = JobService::new(repo(conn));

    let owner = employer(employer_id, Some(posting.company_id), CompanyRole::Recruiter);
    let err = assert_err!(service.delete_form_field(&owner, posting.id, email.id).await);
    assert_eq!(err.code(), ErrorCode::InvalidOperation);
}

#[tokio::test]
async fn fields_of_other_jobs_are_not_found() {
    let employer_id = Uuid::new_v4();
    let posting = job(Uuid::new_v4(), employer_id, JobStatus::Active);
    let foreign = field(Uuid::new_v4(), "Notice period", false, false, 6);
    let conn = mock()
        .append_query_results([vec![posting.clone()]])
        .append_query_results([vec![foreign.clone()]])
        .into_connection();
    let service = JobService::new(repo(conn));

    let owner = employer(employer_id, Some(posting.company_id), CompanyRole::Recruiter);
    let err = assert_err!(service.delete_form_field(&owner, posting.id, foreign.id).await);
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn custom_field_is_deleted() {
    let employer_id = Uuid::new_v4();
    let posting = job(Uuid::new_v4(), employer_id, JobStatus::Paused);
    let custom = field(posting.id, "Notice period", false, false, 6);
    let conn = mock()
        .append_query_results([vec![posting.clone()]])
        .append_query_results([vec![custom.clone()]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();
    let service = JobService::new(repo(conn));

    let owner = employer(employer_id, Some(posting.company_id), CompanyRole::Recruiter);
    assert_ok!(service.delete_form_field(&owner, posting.id, custom.id).await);
}

#[tokio::test]
async fn someone_elses_job_form_is_forbidden() {
    let posting = job(Uuid::new_v4(), Uuid::new_v4(), JobStatus::Active);
    let conn = mock().append_query_results([vec![posting.clone()]]).into_connection();
    let service = JobService::new(repo(conn));

    let outsider = employer(Uuid::new_v4(), Some(posting.company_id), CompanyRole::Admin);
    let err = assert_err!(service.form(&outsider, posting.id).await);
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn select_fields_need_options() {
    let employer_id = Uuid::new_v4();
    let posting = job(Uuid::new_v4(), employer_id, JobStatus::Active);
    let defaults = vec![
        field(posting.id, "Full Name", true, true, 1),
        field(posting.id, "Email", true, true, 2),
    ];
    let conn = mock()
        .append_query_results([vec![posting.clone()]])
        .append_query_results([defaults])
        .into_connection();
    let service = JobService::new(repo(conn));

    let owner = employer(employer_id, Some(posting.company_id), CompanyRole::Recruiter);
    let request = FormRequest {
        fields: vec![select_input("Preferred stack", &["  ", ""])],
    };
    let err = assert_err!(service.replace_form(&owner, posting.id, request).await);
    assert_eq!(err.code(), ErrorCode::ValidationError);
}

#[tokio::test]
async fn replacing_with_a_default_id_is_refused() {
    let employer_id = Uuid::new_v4();
    let posting = job(Uuid::new_v4(), employer_id, JobStatus::Active);
    let name = field(posting.id, "Full Name", true, true, 1);
    let conn = mock()
        .append_query_results([vec![posting.clone()]])
        .append_query_results([vec![name.clone()]])
        .into_connection();
    let service = JobService::new(repo(conn));

    let owner = employer(employer_id, Some(posting.company_id), CompanyRole::Recruiter);
    let mut input = select_input("Renamed", &["A"]);
    input.id = Some(name.id);
    let request = FormRequest { fields: vec![input] };
    let err = assert_err!(service.upsert_form(&owner, posting.id, request).await);
    assert_eq!(err.code(), ErrorCode::InvalidOperation);
}
