//! Who may move an application where

use crate::db::models::ApplicationStatus;
use crate::errors::{AppError, Result};
use sea_orm::ActiveEnum;

/// Statuses an employer may set
pub const EMPLOYER_TARGETS: [ApplicationStatus; 5] = [
    ApplicationStatus::Reviewing,
    ApplicationStatus::Shortlisted,
    ApplicationStatus::Interviewed,
    ApplicationStatus::Accepted,
    ApplicationStatus::Rejected,
];

/// Statuses a seeker may still withdraw from
pub const WITHDRAWABLE: [ApplicationStatus; 2] =
    [ApplicationStatus::Pending, ApplicationStatus::Reviewing];

/// Parse an employer-supplied target against the allow-list
pub fn parse_employer_target(raw: &str) -> Result<ApplicationStatus> {
    ApplicationStatus::parse(raw)
        .filter(|status| EMPLOYER_TARGETS.contains(status))
        .ok_or_else(|| {
            AppError::validation(
                "status",
                "Status must be one of REVIEWING, SHORTLISTED, INTERVIEWED, ACCEPTED, REJECTED",
            )
        })
}

/// Employer move between statuses.
///
/// Non-terminal applications can go forward or back and may skip stages.
pub fn check_employer_transition(from: ApplicationStatus, to: ApplicationStatus) -> Result<()> {
    if !EMPLOYER_TARGETS.contains(&to) {
        return Err(AppError::validation("status", "Status cannot be set by an employer"));
    }
    if from.is_terminal() {
        return Err(AppError::invalid_operation(format!(
            "Application is already {} and can no longer change",
            from.to_value()
        )));
    }
    if from == to {
        return Err(AppError::invalid_operation(format!(
            "Application is already {}",
            to.to_value()
        )));
    }
    Ok(())
}

/// Seeker withdrawal
pub fn check_withdrawal(from: ApplicationStatus) -> Result<()> {
    match from {
        ApplicationStatus::Withdrawn => {
            Err(AppError::invalid_operation("Application has already been withdrawn"))
        }
        status if WITHDRAWABLE.contains(&status) => Ok(()),
        status => Err(AppError::invalid_operation(format!(
            "Cannot withdraw an application that is {}",
            status.to_value()
        ))),
    }
}
