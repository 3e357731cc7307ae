//! Fixtures for service tests against a mocked Postgres connection

#![allow(dead_code)]

use chrono::Utc;
use jobboard_common::auth::{EmployerIdentity, SeekerIdentity, SessionUser};
use jobboard_common::db::models::*;
use jobboard_common::{DbPool, Repository};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{DatabaseBackend, DatabaseConnection, DbErr, MockDatabase, RuntimeErr, Transaction};
use sqlx::error::{DatabaseError, ErrorKind};
use std::borrow::Cow;
use std::sync::Arc;
use uuid::Uuid;

pub fn now() -> DateTimeWithTimeZone {
    Utc::now().into()
}

pub fn mock() -> MockDatabase {
    MockDatabase::new(DatabaseBackend::Postgres)
}

pub fn repo(conn: DatabaseConnection) -> Repository {
    Repository::new(DbPool::from_connection(conn))
}

/// Statements the pool ran; every repository sharing it must be dropped first
pub fn transaction_log(pool: DbPool) -> Vec<Transaction> {
    match Arc::try_unwrap(pool.primary) {
        Ok(conn) => conn.into_transaction_log(),
        Err(_) => panic!("connection still shared"),
    }
}

/// SQL text of each statement inside one logged transaction
pub fn statements(transaction: &Transaction) -> Vec<String> {
    transaction.statements().iter().map(|s| s.sql.clone()).collect()
}

#[derive(Debug)]
struct DuplicateKey;

impl std::fmt::Display for DuplicateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(DatabaseError::message(self))
    }
}

impl std::error::Error for DuplicateKey {}

impl DatabaseError for DuplicateKey {
    fn message(&self) -> &str {
        "duplicate key value violates unique constraint"
    }

    fn code(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed("23505"))
    }

    fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
        self
    }

    fn kind(&self) -> ErrorKind {
        ErrorKind::UniqueViolation
    }
}

/// What Postgres reports when an insert hits a unique index
pub fn unique_violation() -> DbErr {
    DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(Box::new(DuplicateKey))))
}

pub fn session(role: UserRole) -> SessionUser {
    SessionUser {
        id: Uuid::new_v4(),
        email: "ada@example.com".into(),
        name: "Ada Lovelace".into(),
        role,
    }
}

pub fn seeker(job_seeker_id: Uuid) -> SeekerIdentity {
    SeekerIdentity {
        user: session(UserRole::JobSeeker),
        job_seeker_id: Some(job_seeker_id),
    }
}

pub fn employer(employer_id: Uuid, company_id: Option<Uuid>, role: CompanyRole) -> EmployerIdentity {
    EmployerIdentity {
        user: session(UserRole::Employer),
        employer_id: Some(employer_id),
        company_id,
        company_role: company_id.map(|_| role),
    }
}

pub fn employer_row(id: Uuid, company_id: Option<Uuid>, role: CompanyRole) -> Employer {
    Employer {
        id,
        user_id: Uuid::new_v4(),
        job_title: Some("Talent Lead".into()),
        department: None,
        company_role: role,
        company_id,
        joined_company_at: company_id.map(|_| now()),
        created_at: now(),
        updated_at: now(),
    }
}

pub fn company(name: &str, is_active: bool) -> Company {
    Company {
        id: Uuid::new_v4(),
        name: name.into(),
        website: None,
        logo_url: None,
        industry: "Software".into(),
        description: None,
        location: Some("Berlin".into()),
        size: Some(CompanySize::Small),
        founded_year: Some(2015),
        is_active,
        created_at: now(),
        updated_at: now(),
    }
}

pub fn job(company_id: Uuid, employer_id: Uuid, status: JobStatus) -> Job {
    Job {
        id: Uuid::new_v4(),
        company_id,
        employer_id,
        title: "Backend Engineer".into(),
        role_category: "Engineering".into(),
        description: "Build APIs in Rust and PostgreSQL".into(),
        requirements: None,
        responsibilities: None,
        job_type: JobType::FullTime,
        location: Some("Remote".into()),
        is_remote: true,
        salary_min: Some(60_000),
        salary_max: Some(90_000),
        openings: 1,
        status,
        created_at: now(),
        updated_at: now(),
    }
}

/// The joined row a job lookup returns, owned by a company in the given state
pub fn with_company(job: &Job, is_active: bool) -> (Job, Option<Company>) {
    let mut owner = company("Acme Robotics", is_active);
    owner.id = job.company_id;
    (job.clone(), Some(owner))
}

pub fn field(job_id: Uuid, label: &str, required: bool, is_default: bool, order: i32) -> JobFormField {
    JobFormField {
        id: Uuid::new_v4(),
        job_id,
        label: label.into(),
        field_type: FieldType::Text,
        is_required: required,
        is_default,
        options: Vec::new(),
        placeholder: None,
        display_order: order,
        created_at: now(),
    }
}

pub fn application(job_id: Uuid, job_seeker_id: Uuid, status: ApplicationStatus) -> Application {
    Application {
        id: Uuid::new_v4(),
        job_id,
        job_seeker_id,
        status,
        employer_notes: None,
        applied_at: now(),
        updated_at: now(),
    }
}
