//! Company creation, selection and editing through the company service

mod support;

use jobboard_common::auth::CompanyMember;
use jobboard_common::db::models::*;
use jobboard_common::errors::{AppError, ErrorCode};
use jobboard_common::services::companies::{CreateCompanyRequest, UpdateCompanyRequest};
use jobboard_common::services::CompanyService;
use jobboard_common::{DbPool, Repository};
use support::*;
use tokio_test::{assert_err, assert_ok};
use uuid::Uuid;

fn create_request(name: &str) -> CreateCompanyRequest {
    CreateCompanyRequest {
        name: name.into(),
        industry: "Software".into(),
        website: Some("https://acme.dev".into()),
        logo_url: None,
        description: None,
        location: Some("Berlin".into()),
        size: Some(CompanySize::Small),
        founded_year: Some(2015),
    }
}

fn member(company_id: Uuid, role: CompanyRole) -> CompanyMember {
    CompanyMember {
        user: session(UserRole::Employer),
        employer_id: Uuid::new_v4(),
        company_id,
        company_role: role,
    }
}

#[tokio::test]
async fn short_search_queries_are_rejected() {
    let service = CompanyService::new(repo(mock().into_connection()), true);
    let err = assert_err!(service.search(" a ").await);
    assert_eq!(err.code(), ErrorCode::ValidationError);
}

#[tokio::test]
async fn duplicate_names_point_at_the_existing_company() {
    let employer_id = Uuid::new_v4();
    let existing = company("Acme", true);
    let conn = mock()
        .append_query_results([vec![employer_row(employer_id, None, CompanyRole::Recruiter)]])
        .append_query_results([vec![existing.clone()]])
        .into_connection();
    let service = CompanyService::new(repo(conn), true);

    let identity = employer(employer_id, None, CompanyRole::Recruiter);
    let err = assert_err!(service.create(&identity, create_request("  acme ")).await);
    match err {
        AppError::Conflict { existing_id, .. } => assert_eq!(existing_id, Some(existing.id)),
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[tokio::test]
async fn creator_becomes_admin() {
    let employer_id = Uuid::new_v4();
    let created = company("Acme", true);
    let promoted = employer_row(employer_id, Some(created.id), CompanyRole::Admin);
    let conn = mock()
        .append_query_results([vec![employer_row(employer_id, None, CompanyRole::Recruiter)]])
        .append_query_results([Vec::<Company>::new()])
        .append_query_results([vec![created.clone()]])
        .append_query_results([vec![promoted]])
        .into_connection();
    let service = CompanyService::new(repo(conn), true);

    let identity = employer(employer_id, None, CompanyRole::Recruiter);
    let membership = assert_ok!(service.create(&identity, create_request("Acme")).await);
    assert_eq!(membership.company.id, created.id);
    assert_eq!(membership.employer.company_role, CompanyRole::Admin);
    assert_eq!(membership.employer.company_id, Some(created.id));
}

#[tokio::test]
async fn name_taken_between_check_and_insert_conflicts_and_rolls_back() {
    let employer_id = Uuid::new_v4();
    let conn = mock()
        .append_query_results([vec![employer_row(employer_id, None, CompanyRole::Recruiter)]])
        .append_query_results([Vec::<Company>::new()])
        .append_query_errors([unique_violation()])
        .into_connection();
    let pool = DbPool::from_connection(conn);
    let service = CompanyService::new(Repository::new(pool.clone()), true);

    let identity = employer(employer_id, None, CompanyRole::Recruiter);
    let err = assert_err!(service.create(&identity, create_request("Acme")).await);
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.to_string(), "A company with this name already exists");

    drop(service);
    let log = transaction_log(pool);
    let sql = statements(log.last().unwrap());
    assert_eq!(sql.first().map(String::as_str), Some("BEGIN"));
    assert!(sql[1].starts_with(r#"INSERT INTO "companies""#));
    assert_eq!(sql.last().map(String::as_str), Some("ROLLBACK"));
    assert!(!sql.iter().any(|s| s.starts_with(r#"UPDATE "employers""#)));
}

#[tokio::test]
async fn members_cannot_create_another_company_when_switching_is_off() {
    let employer_id = Uuid::new_v4();
    let current = Uuid::new_v4();
    let conn = mock()
        .append_query_results([vec![employer_row(employer_id, Some(current), CompanyRole::Recruiter)]])
        .into_connection();
    let service = CompanyService::new(repo(conn), false);

    let identity = employer(employer_id, Some(current), CompanyRole::Recruiter);
    let err = assert_err!(service.create(&identity, create_request("Globex")).await);
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn inactive_companies_cannot_be_selected() {
    let employer_id = Uuid::new_v4();
    let closed = company("Initech", false);
    let conn = mock()
        .append_query_results([vec![employer_row(employer_id, None, CompanyRole::Recruiter)]])
        .append_query_results([vec![closed.clone()]])
        .into_connection();
    let service = CompanyService::new(repo(conn), true);

    let identity = employer(employer_id, None, CompanyRole::Recruiter);
    let err = assert_err!(service.select(&identity, closed.id).await);
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn admin_switching_companies_becomes_recruiter() {
    let employer_id = Uuid::new_v4();
    let previous = Uuid::new_v4();
    let target = company("Globex", true);
    let moved = employer_row(employer_id, Some(target.id), CompanyRole::Recruiter);
    let conn = mock()
        .append_query_results([vec![employer_row(employer_id, Some(previous), CompanyRole::Admin)]])
        .append_query_results([vec![target.clone()]])
        .append_query_results([vec![moved]])
        .into_connection();
    let service = CompanyService::new(repo(conn), true);

    let identity = employer(employer_id, Some(previous), CompanyRole::Admin);
    let membership = assert_ok!(service.select(&identity, target.id).await);
    assert_eq!(membership.company.id, target.id);
    assert_eq!(membership.employer.company_role, CompanyRole::Recruiter);
}

#[tokio::test]
async fn employers_without_company_are_told_to_select_one() {
    let service = CompanyService::new(repo(mock().into_connection()), true);
    let identity = employer(Uuid::new_v4(), None, CompanyRole::Recruiter);

    let err = assert_err!(service.require_company(&identity).await);
    assert_eq!(err.code(), ErrorCode::CompanyRequired);
}

#[tokio::test]
async fn deactivated_company_blocks_company_operations() {
    let closed = company("Initech", false);
    let conn = mock().append_query_results([vec![closed.clone()]]).into_connection();
    let service = CompanyService::new(repo(conn), true);

    let identity = employer(Uuid::new_v4(), Some(closed.id), CompanyRole::Admin);
    let err = assert_err!(service.require_company(&identity).await);
    assert_eq!(err.code(), ErrorCode::CompanyInactive);
}

#[tokio::test]
async fn recruiters_cannot_edit_the_company() {
    let service = CompanyService::new(repo(mock().into_connection()), true);
    let request = UpdateCompanyRequest {
        description: Some("We make anvils".into()),
        ..Default::default()
    };

    let err = assert_err!(
        service
            .update_mine(&member(Uuid::new_v4(), CompanyRole::Recruiter), request)
            .await
    );
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn hr_managers_can_edit_the_company() {
    let current = company("Acme", true);
    let mut edited = current.clone();
    edited.description = Some("We make anvils".into());
    let conn = mock()
        .append_query_results([vec![current.clone()]])
        .append_query_results([vec![edited]])
        .into_connection();
    let service = CompanyService::new(repo(conn), true);

    let request = UpdateCompanyRequest {
        description: Some("We make anvils".into()),
        ..Default::default()
    };
    let updated = assert_ok!(
        service
            .update_mine(&member(current.id, CompanyRole::HrManager), request)
            .await
    );
    assert_eq!(updated.description.as_deref(), Some("We make anvils"));
}
