//! SeaORM entity models
//!
//! Database entities for the job board

pub mod enums;

pub mod application;
pub mod application_response;
pub mod company;
pub mod education;
pub mod employer;
pub mod experience;
pub mod job;
pub mod job_form_field;
pub mod job_seeker;
pub mod preferences;
pub mod project;
pub mod user;

pub use enums::{
    ApplicationStatus, CompanyRole, CompanySize, FieldType, JobStatus, JobType, UserRole,
};

pub use user::{
    Entity as UserEntity,
    Model as User,
    ActiveModel as UserActiveModel,
    Column as UserColumn,
};

pub use job_seeker::{
    Entity as JobSeekerEntity,
    Model as JobSeeker,
    ActiveModel as JobSeekerActiveModel,
    Column as JobSeekerColumn,
};

pub use education::{
    Entity as EducationEntity,
    Model as Education,
    ActiveModel as EducationActiveModel,
    Column as EducationColumn,
};

pub use experience::{
    Entity as ExperienceEntity,
    Model as Experience,
    ActiveModel as ExperienceActiveModel,
    Column as ExperienceColumn,
};

pub use project::{
    Entity as ProjectEntity,
    Model as Project,
    ActiveModel as ProjectActiveModel,
    Column as ProjectColumn,
};

pub use preferences::{
    Entity as PreferencesEntity,
    Model as Preferences,
    ActiveModel as PreferencesActiveModel,
    Column as PreferencesColumn,
};

pub use employer::{
    Entity as EmployerEntity,
    Model as Employer,
    ActiveModel as EmployerActiveModel,
    Column as EmployerColumn,
};

pub use company::{
    Entity as CompanyEntity,
    Model as Company,
    ActiveModel as CompanyActiveModel,
    Column as CompanyColumn,
};

pub use job::{
    Entity as JobEntity,
    Model as Job,
    ActiveModel as JobActiveModel,
    Column as JobColumn,
};

pub use job_form_field::{
    Entity as JobFormFieldEntity,
    Model as JobFormField,
    ActiveModel as JobFormFieldActiveModel,
    Column as JobFormFieldColumn,
};

pub use application::{
    Entity as ApplicationEntity,
    Model as Application,
    ActiveModel as ApplicationActiveModel,
    Column as ApplicationColumn,
};

pub use application_response::{
    Entity as ApplicationResponseEntity,
    Model as ApplicationResponse,
    ActiveModel as ApplicationResponseActiveModel,
    Column as ApplicationResponseColumn,
};
