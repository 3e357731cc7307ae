//! Onboarding progress per role
//!
//! Steps are strictly ordered. The next step is the first incomplete one,
//! even when later steps are already satisfied, and every step weighs the
//! same in the completion percentage.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileStep {
    BasicDetails,
    JobSeekerProfile,
    EmployerProfile,
    CompanySelection,
    Education,
    Experience,
    Projects,
    Preferences,
    Complete,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepState {
    pub step: ProfileStep,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStatus {
    pub steps: Vec<StepState>,
    pub next_step: ProfileStep,
    pub completion_percentage: u8,
    pub is_complete: bool,
}

/// What a job seeker has filled in so far
#[derive(Debug, Clone, Copy, Default)]
pub struct SeekerProgress {
    pub basic_details: bool,
    /// Profile row exists and lists at least one skill
    pub profile: bool,
    pub education: bool,
    pub experience: bool,
    pub projects: bool,
    pub preferences: bool,
}

impl SeekerProgress {
    pub fn status(&self) -> ProfileStatus {
        evaluate(&[
            (ProfileStep::BasicDetails, self.basic_details),
            (ProfileStep::JobSeekerProfile, self.profile),
            (ProfileStep::Education, self.education),
            (ProfileStep::Experience, self.experience),
            (ProfileStep::Projects, self.projects),
            (ProfileStep::Preferences, self.preferences),
        ])
    }
}

/// What an employer has filled in so far
#[derive(Debug, Clone, Copy, Default)]
pub struct EmployerProgress {
    pub basic_details: bool,
    pub profile: bool,
    pub company: bool,
}

impl EmployerProgress {
    pub fn status(&self) -> ProfileStatus {
        evaluate(&[
            (ProfileStep::BasicDetails, self.basic_details),
            (ProfileStep::EmployerProfile, self.profile),
            (ProfileStep::CompanySelection, self.company),
        ])
    }
}

fn evaluate(steps: &[(ProfileStep, bool)]) -> ProfileStatus {
    let done = steps.iter().filter(|(_, completed)| *completed).count();
    let next_step = steps
        .iter()
        .find(|(_, completed)| !completed)
        .map(|(step, _)| *step)
        .unwrap_or(ProfileStep::Complete);

    ProfileStatus {
        steps: steps
            .iter()
            .map(|&(step, completed)| StepState { step, completed })
            .collect(),
        next_step,
        completion_percentage: ((done as f64 * 100.0) / steps.len() as f64).round() as u8,
        is_complete: next_step == ProfileStep::Complete,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_of_six_seeker_steps() {
        let status = SeekerProgress {
            basic_details: true,
            profile: true,
            education: true,
            experience: true,
            ..Default::default()
        }
        .status();

        assert_eq!(status.completion_percentage, 67);
        assert_eq!(status.next_step, ProfileStep::Projects);
        assert!(!status.is_complete);
    }

    #[test]
    fn test_next_step_is_first_gap_in_order() {
        let status = SeekerProgress {
            basic_details: false,
            profile: true,
            education: true,
            experience: true,
            projects: true,
            preferences: true,
        }
        .status();

        assert_eq!(status.next_step, ProfileStep::BasicDetails);
        assert_eq!(status.completion_percentage, 83);
    }

    #[test]
    fn test_fresh_seeker_starts_at_zero() {
        let status = SeekerProgress::default().status();
        assert_eq!(status.completion_percentage, 0);
        assert_eq!(status.steps.len(), 6);
    }

    #[test]
    fn test_employer_complete() {
        let status = EmployerProgress {
            basic_details: true,
            profile: true,
            company: true,
        }
        .status();

        assert_eq!(status.next_step, ProfileStep::Complete);
        assert_eq!(status.completion_percentage, 100);
        assert!(status.is_complete);
    }

    #[test]
    fn test_employer_without_company() {
        let status = EmployerProgress {
            basic_details: true,
            profile: true,
            company: false,
        }
        .status();

        assert_eq!(status.next_step, ProfileStep::CompanySelection);
        assert_eq!(status.completion_percentage, 67);
    }

    #[test]
    fn test_step_serializes_snake_case() {
        let json = serde_json::to_string(&ProfileStep::CompanySelection).unwrap();
        assert_eq!(json, "\"company_selection\"");
    }
}
