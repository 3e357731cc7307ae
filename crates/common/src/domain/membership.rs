//! Employer to company membership policy

use uuid::Uuid;

use crate::db::models::CompanyRole;
use crate::errors::{AppError, Result};

/// Refuse to leave one company for another when switching is disabled
pub fn check_switch(current: Option<Uuid>, target: Option<Uuid>, allow_switch: bool) -> Result<()> {
    match current {
        Some(current) if !allow_switch && Some(current) != target => Err(AppError::conflict(
            "You already belong to a company; switching companies is disabled",
        )),
        _ => Ok(()),
    }
}

/// Company role after selecting an existing company.
///
/// Re-selecting the current company keeps the role. Joining a different
/// company never carries ADMIN across.
pub fn role_after_select(
    current_company: Option<Uuid>,
    current_role: CompanyRole,
    target: Uuid,
    allow_switch: bool,
) -> Result<CompanyRole> {
    check_switch(current_company, Some(target), allow_switch)?;

    if current_company == Some(target) {
        return Ok(current_role);
    }
    Ok(match current_role {
        CompanyRole::Admin => CompanyRole::Recruiter,
        role => role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_first_selection_keeps_declared_role() {
        let role = role_after_select(None, CompanyRole::HrManager, Uuid::new_v4(), false).unwrap();
        assert_eq!(role, CompanyRole::HrManager);
    }

    #[test]
    fn test_switch_allowed_overwrites_and_drops_admin() {
        let role = role_after_select(
            Some(Uuid::new_v4()),
            CompanyRole::Admin,
            Uuid::new_v4(),
            true,
        )
        .unwrap();
        assert_eq!(role, CompanyRole::Recruiter);
    }

    #[test]
    fn test_switch_disabled_conflicts() {
        let err = role_after_select(
            Some(Uuid::new_v4()),
            CompanyRole::Recruiter,
            Uuid::new_v4(),
            false,
        )
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[test]
    fn test_reselecting_same_company_is_idempotent() {
        let company = Uuid::new_v4();
        let role = role_after_select(Some(company), CompanyRole::Admin, company, false).unwrap();
        assert_eq!(role, CompanyRole::Admin);
    }

    #[test]
    fn test_creating_while_member_respects_policy() {
        assert!(check_switch(Some(Uuid::new_v4()), None, false).is_err());
        assert!(check_switch(Some(Uuid::new_v4()), None, true).is_ok());
        assert!(check_switch(None, None, false).is_ok());
    }
}
