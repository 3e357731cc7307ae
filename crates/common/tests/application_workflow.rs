//! Apply, withdraw and review flows through the application service

mod support;

use jobboard_common::auth::SeekerIdentity;
use jobboard_common::db::models::*;
use jobboard_common::domain::form_fields::AnswerInput;
use jobboard_common::errors::ErrorCode;
use jobboard_common::services::applications::{ApplyRequest, StatusChangeRequest};
use jobboard_common::services::ApplicationService;
use sea_orm::MockExecResult;
use support::*;
use tokio_test::{assert_err, assert_ok};
use uuid::Uuid;

fn answer(field: &JobFormField, text: &str) -> AnswerInput {
    AnswerInput {
        field_id: field.id,
        answer: text.into(),
    }
}

#[tokio::test]
async fn applying_without_a_profile_needs_onboarding() {
    let service = ApplicationService::new(repo(mock().into_connection()));
    let seeker = SeekerIdentity {
        user: session(UserRole::JobSeeker),
        job_seeker_id: None,
    };

    let err = assert_err!(
        service
            .apply(&seeker, Uuid::new_v4(), ApplyRequest { responses: vec![] })
            .await
    );
    assert_eq!(err.code(), ErrorCode::ProfileIncomplete);
}

#[tokio::test]
async fn paused_jobs_do_not_accept_applications() {
    let paused = job(Uuid::new_v4(), Uuid::new_v4(), JobStatus::Paused);
    let conn = mock()
        .append_query_results([vec![with_company(&paused, true)]])
        .into_connection();
    let service = ApplicationService::new(repo(conn));

    let err = assert_err!(
        service
            .apply(&seeker(Uuid::new_v4()), paused.id, ApplyRequest { responses: vec![] })
            .await
    );
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn jobs_of_deactivated_companies_do_not_accept_applications() {
    let open = job(Uuid::new_v4(), Uuid::new_v4(), JobStatus::Active);
    let conn = mock()
        .append_query_results([vec![with_company(&open, false)]])
        .into_connection();
    let service = ApplicationService::new(repo(conn));

    let err = assert_err!(
        service
            .apply(&seeker(Uuid::new_v4()), open.id, ApplyRequest { responses: vec![] })
            .await
    );
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn jobs_without_a_company_row_are_not_found() {
    let open = job(Uuid::new_v4(), Uuid::new_v4(), JobStatus::Active);
    let conn = mock()
        .append_query_results([vec![(open.clone(), None::<Company>)]])
        .into_connection();
    let service = ApplicationService::new(repo(conn));

    let err = assert_err!(
        service
            .apply(&seeker(Uuid::new_v4()), open.id, ApplyRequest { responses: vec![] })
            .await
    );
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn second_application_to_same_job_conflicts() {
    let job_seeker_id = Uuid::new_v4();
    let open = job(Uuid::new_v4(), Uuid::new_v4(), JobStatus::Active);
    let existing = application(open.id, job_seeker_id, ApplicationStatus::Pending);
    let conn = mock()
        .append_query_results([vec![with_company(&open, true)]])
        .append_query_results([vec![existing]])
        .into_connection();
    let service = ApplicationService::new(repo(conn));

    let err = assert_err!(
        service
            .apply(&seeker(job_seeker_id), open.id, ApplyRequest { responses: vec![] })
            .await
    );
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.to_string(), "You have already applied to this job");
}

#[tokio::test]
async fn first_missing_required_field_is_reported() {
    let open = job(Uuid::new_v4(), Uuid::new_v4(), JobStatus::Active);
    let name = field(open.id, "Full Name", true, true, 1);
    let email = field(open.id, "Email", true, true, 2);
    let notes = field(open.id, "Anything else?", false, false, 6);
    let conn = mock()
        .append_query_results([vec![with_company(&open, true)]])
        .append_query_results([Vec::<Application>::new()])
        .append_query_results([vec![name.clone(), email, notes.clone()]])
        .into_connection();
    let service = ApplicationService::new(repo(conn));

    let request = ApplyRequest {
        responses: vec![answer(&name, "Ada Lovelace"), answer(&notes, "  ")],
    };
    let err = assert_err!(service.apply(&seeker(Uuid::new_v4()), open.id, request).await);
    assert_eq!(err.code(), ErrorCode::ValidationError);
    assert_eq!(err.to_string(), "Email is required");
}

#[tokio::test]
async fn complete_application_is_stored_pending() {
    let job_seeker_id = Uuid::new_v4();
    let open = job(Uuid::new_v4(), Uuid::new_v4(), JobStatus::Active);
    let name = field(open.id, "Full Name", true, true, 1);
    let stored = application(open.id, job_seeker_id, ApplicationStatus::Pending);
    let conn = mock()
        .append_query_results([vec![with_company(&open, true)]])
        .append_query_results([Vec::<Application>::new()])
        .append_query_results([vec![name.clone()]])
        .append_query_results([vec![stored.clone()]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();
    let service = ApplicationService::new(repo(conn));

    let request = ApplyRequest {
        responses: vec![answer(&name, " Ada Lovelace ")],
    };
    let created = assert_ok!(service.apply(&seeker(job_seeker_id), open.id, request).await);
    assert_eq!(created.status, ApplicationStatus::Pending);
    assert_eq!(created.job_seeker_id, job_seeker_id);
}

#[tokio::test]
async fn concurrent_duplicate_caught_by_unique_index_conflicts() {
    let job_seeker_id = Uuid::new_v4();
    let open = job(Uuid::new_v4(), Uuid::new_v4(), JobStatus::Active);
    let name = field(open.id, "Full Name", true, true, 1);
    // The pre-check sees no application; the insert then loses the race
    let conn = mock()
        .append_query_results([vec![with_company(&open, true)]])
        .append_query_results([Vec::<Application>::new()])
        .append_query_results([vec![name.clone()]])
        .append_query_errors([unique_violation()])
        .into_connection();
    let service = ApplicationService::new(repo(conn));

    let request = ApplyRequest {
        responses: vec![answer(&name, "Ada Lovelace")],
    };
    let err = assert_err!(service.apply(&seeker(job_seeker_id), open.id, request).await);
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.to_string(), "You have already applied to this job");
}

#[tokio::test]
async fn accepted_applications_cannot_be_withdrawn() {
    let job_seeker_id = Uuid::new_v4();
    let accepted = application(Uuid::new_v4(), job_seeker_id, ApplicationStatus::Accepted);
    let conn = mock().append_query_results([vec![accepted.clone()]]).into_connection();
    let service = ApplicationService::new(repo(conn));

    let err = assert_err!(service.withdraw(&seeker(job_seeker_id), accepted.id).await);
    assert_eq!(err.code(), ErrorCode::InvalidOperation);
}

#[tokio::test]
async fn withdrawal_never_leaks_employer_notes() {
    let job_seeker_id = Uuid::new_v4();
    let mut reviewing = application(Uuid::new_v4(), job_seeker_id, ApplicationStatus::Reviewing);
    reviewing.employer_notes = Some("Strong systems background".into());
    let mut withdrawn = reviewing.clone();
    withdrawn.status = ApplicationStatus::Withdrawn;

    let conn = mock()
        .append_query_results([vec![reviewing.clone()]])
        .append_query_results([vec![withdrawn]])
        .into_connection();
    let service = ApplicationService::new(repo(conn));

    let result = assert_ok!(service.withdraw(&seeker(job_seeker_id), reviewing.id).await);
    assert_eq!(result.status, ApplicationStatus::Withdrawn);
    assert!(result.employer_notes.is_none());
}

#[tokio::test]
async fn unknown_application_is_not_found_for_seeker() {
    let conn = mock()
        .append_query_results([Vec::<Application>::new()])
        .into_connection();
    let service = ApplicationService::new(repo(conn));

    let err = assert_err!(service.withdraw(&seeker(Uuid::new_v4()), Uuid::new_v4()).await);
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn employers_only_review_their_own_jobs() {
    let posting = job(Uuid::new_v4(), Uuid::new_v4(), JobStatus::Active);
    let conn = mock().append_query_results([vec![posting.clone()]]).into_connection();
    let service = ApplicationService::new(repo(conn));

    let outsider = employer(Uuid::new_v4(), Some(posting.company_id), CompanyRole::Recruiter);
    let request = StatusChangeRequest {
        status: "SHORTLISTED".into(),
        notes: None,
    };
    let err = assert_err!(
        service
            .update_status(&outsider, posting.id, Uuid::new_v4(), request)
            .await
    );
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn employers_cannot_set_withdrawn() {
    let employer_id = Uuid::new_v4();
    let posting = job(Uuid::new_v4(), employer_id, JobStatus::Active);
    let pending = application(posting.id, Uuid::new_v4(), ApplicationStatus::Pending);
    let conn = mock()
        .append_query_results([vec![posting.clone()]])
        .append_query_results([vec![pending.clone()]])
        .into_connection();
    let service = ApplicationService::new(repo(conn));

    let owner = employer(employer_id, Some(posting.company_id), CompanyRole::Recruiter);
    let request = StatusChangeRequest {
        status: "WITHDRAWN".into(),
        notes: None,
    };
    let err = assert_err!(
        service
            .update_status(&owner, posting.id, pending.id, request)
            .await
    );
    assert_eq!(err.code(), ErrorCode::ValidationError);
}

#[tokio::test]
async fn review_moves_status_and_keeps_notes() {
    let employer_id = Uuid::new_v4();
    let posting = job(Uuid::new_v4(), employer_id, JobStatus::Active);
    let pending = application(posting.id, Uuid::new_v4(), ApplicationStatus::Pending);
    let mut shortlisted = pending.clone();
    shortlisted.status = ApplicationStatus::Shortlisted;
    shortlisted.employer_notes = Some("Call next week".into());

    let conn = mock()
        .append_query_results([vec![posting.clone()]])
        .append_query_results([vec![pending.clone()]])
        .append_query_results([vec![shortlisted]])
        .into_connection();
    let service = ApplicationService::new(repo(conn));

    let owner = employer(employer_id, Some(posting.company_id), CompanyRole::HiringManager);
    let request = StatusChangeRequest {
        status: "shortlisted".into(),
        notes: Some(" Call next week ".into()),
    };
    let updated = assert_ok!(
        service
            .update_status(&owner, posting.id, pending.id, request)
            .await
    );
    assert_eq!(updated.status, ApplicationStatus::Shortlisted);
    assert_eq!(updated.employer_notes.as_deref(), Some("Call next week"));
}
