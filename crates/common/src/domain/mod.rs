//! Pure job board rules
//!
//! Nothing in here touches the database; services load rows and hand
//! them to these functions.

pub mod analytics;
pub mod application_status;
pub mod form_fields;
pub mod membership;
pub mod pagination;
pub mod profile_status;
pub mod skills;

pub use pagination::{Page, PageMeta, PageParams};
pub use profile_status::{EmployerProgress, ProfileStatus, ProfileStep, SeekerProgress};
