//! Enumerations stored as strings

use sea_orm::entity::prelude::*;
use sea_orm::Iterable;
use serde::{Deserialize, Serialize};

/// Account role, fixed at signup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[sea_orm(string_value = "JOB_SEEKER")]
    JobSeeker,
    #[sea_orm(string_value = "EMPLOYER")]
    Employer,
}

/// An employer's role inside its company
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompanyRole {
    #[sea_orm(string_value = "ADMIN")]
    Admin,
    #[sea_orm(string_value = "HR_MANAGER")]
    HrManager,
    #[sea_orm(string_value = "RECRUITER")]
    Recruiter,
    #[sea_orm(string_value = "HIRING_MANAGER")]
    HiringManager,
}

impl CompanyRole {
    /// Roles allowed to edit the company record
    pub fn can_manage_company(&self) -> bool {
        matches!(self, CompanyRole::Admin | CompanyRole::HrManager)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum CompanySize {
    #[sea_orm(string_value = "1-10")]
    #[serde(rename = "1-10")]
    Micro,
    #[sea_orm(string_value = "11-50")]
    #[serde(rename = "11-50")]
    Small,
    #[sea_orm(string_value = "51-200")]
    #[serde(rename = "51-200")]
    Medium,
    #[sea_orm(string_value = "201-500")]
    #[serde(rename = "201-500")]
    Large,
    #[sea_orm(string_value = "501-1000")]
    #[serde(rename = "501-1000")]
    VeryLarge,
    #[sea_orm(string_value = "1000+")]
    #[serde(rename = "1000+")]
    Enterprise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobType {
    #[sea_orm(string_value = "FULL_TIME")]
    FullTime,
    #[sea_orm(string_value = "PART_TIME")]
    PartTime,
    #[sea_orm(string_value = "CONTRACT")]
    Contract,
    #[sea_orm(string_value = "INTERNSHIP")]
    Internship,
    #[sea_orm(string_value = "FREELANCE")]
    Freelance,
}

impl JobType {
    pub fn parse(value: &str) -> Option<Self> {
        Self::iter().find(|t| t.to_value() == value.trim().to_ascii_uppercase())
    }
}

/// Posting status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "PAUSED")]
    Paused,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
}

impl JobStatus {
    pub fn parse(value: &str) -> Option<Self> {
        Self::iter().find(|s| s.to_value() == value.trim().to_ascii_uppercase())
    }
}

/// Input type of an application form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[sea_orm(string_value = "text")]
    Text,
    #[sea_orm(string_value = "textarea")]
    Textarea,
    #[sea_orm(string_value = "number")]
    Number,
    #[sea_orm(string_value = "email")]
    Email,
    #[sea_orm(string_value = "phone")]
    Phone,
    #[sea_orm(string_value = "date")]
    Date,
    #[sea_orm(string_value = "url")]
    Url,
    #[sea_orm(string_value = "select")]
    Select,
    #[sea_orm(string_value = "multiselect")]
    Multiselect,
    #[sea_orm(string_value = "checkbox")]
    Checkbox,
}

impl FieldType {
    /// Field types whose answers come from a fixed option list
    pub fn needs_options(&self) -> bool {
        matches!(self, FieldType::Select | FieldType::Multiselect)
    }
}

/// Lifecycle of an application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "REVIEWING")]
    Reviewing,
    #[sea_orm(string_value = "SHORTLISTED")]
    Shortlisted,
    #[sea_orm(string_value = "INTERVIEWED")]
    Interviewed,
    #[sea_orm(string_value = "ACCEPTED")]
    Accepted,
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
    #[sea_orm(string_value = "WITHDRAWN")]
    Withdrawn,
}

impl ApplicationStatus {
    /// Accepted, rejected and withdrawn applications never change again
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Accepted | ApplicationStatus::Rejected | ApplicationStatus::Withdrawn
        )
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::iter().find(|s| s.to_value() == value.trim().to_ascii_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_type_parse_is_case_insensitive() {
        assert_eq!(JobType::parse("full_time"), Some(JobType::FullTime));
        assert_eq!(JobType::parse(" CONTRACT "), Some(JobType::Contract));
        assert_eq!(JobType::parse("gig"), None);
    }

    #[test]
    fn test_job_status_parse() {
        assert_eq!(JobStatus::parse("paused"), Some(JobStatus::Paused));
        assert_eq!(JobStatus::parse("Completed "), Some(JobStatus::Completed));
        assert_eq!(JobStatus::parse("archived"), None);
    }

    #[test]
    fn test_company_role_management_rights() {
        assert!(CompanyRole::Admin.can_manage_company());
        assert!(CompanyRole::HrManager.can_manage_company());
        assert!(!CompanyRole::Recruiter.can_manage_company());
        assert!(!CompanyRole::HiringManager.can_manage_company());
    }

    #[test]
    fn test_terminal_statuses() {
        let terminal: Vec<_> = ApplicationStatus::iter().filter(|s| s.is_terminal()).collect();
        assert_eq!(
            terminal,
            vec![
                ApplicationStatus::Accepted,
                ApplicationStatus::Rejected,
                ApplicationStatus::Withdrawn
            ]
        );
        assert_eq!(ApplicationStatus::parse("reviewing"), Some(ApplicationStatus::Reviewing));
    }

    #[test]
    fn test_status_serializes_screaming() {
        let json = serde_json::to_string(&ApplicationStatus::Shortlisted).unwrap();
        assert_eq!(json, "\"SHORTLISTED\"");
        let size = serde_json::to_string(&CompanySize::Enterprise).unwrap();
        assert_eq!(size, "\"1000+\"");
    }
}
