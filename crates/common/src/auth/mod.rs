//! Authentication and authorization utilities
//!
//! Provides:
//! - Password hashing (Argon2id)
//! - JWT token generation and validation
//! - Bearer/cookie token extraction
//! - The authenticated actor types handed to services

use crate::db::models::{CompanyRole, User, UserRole};
use crate::errors::{AppError, Requirement, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user ID)
    pub sub: String,

    pub email: String,

    pub role: UserRole,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl JwtClaims {
    pub fn user_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|_| AppError::unauthorized("Invalid token subject"))
    }
}

/// JWT token manager
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_secs: i64,
}

impl JwtManager {
    /// Create a new JWT manager with the given secret
    pub fn new(secret: &str, expiration_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiration_secs: expiration_secs as i64,
        }
    }

    pub fn expiration_secs(&self) -> i64 {
        self.expiration_secs
    }

    /// Generate a new JWT token for a user
    pub fn generate_token(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.expiration_secs);

        let claims = JwtClaims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| AppError::Internal {
            message: format!("Failed to generate token: {}", e),
        })
    }

    /// Validate and decode a JWT token
    pub fn validate_token(&self, token: &str) -> Result<JwtClaims> {
        decode::<JwtClaims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::ExpiredToken,
                _ => AppError::unauthorized("Invalid token"),
            })
    }
}

/// Hash a password into a PHC string
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal {
            message: format!("Failed to hash password: {}", e),
        })
}

/// Check a password against a stored PHC string
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Extract the token from an Authorization header value
pub fn extract_bearer(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// The authenticated user, freshly loaded from the database
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
        }
    }
}

/// A job seeker and, once created, their profile id
#[derive(Debug, Clone)]
pub struct SeekerIdentity {
    pub user: SessionUser,
    pub job_seeker_id: Option<Uuid>,
}

impl SeekerIdentity {
    /// Profile id, or the onboarding precondition that is missing
    pub fn require_profile(&self) -> Result<Uuid> {
        self.job_seeker_id.ok_or_else(|| {
            AppError::precondition(
                Requirement::JobSeekerProfile,
                "Create your job seeker profile first",
            )
        })
    }
}

/// An employer with whatever profile and company they have so far
#[derive(Debug, Clone)]
pub struct EmployerIdentity {
    pub user: SessionUser,
    pub employer_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub company_role: Option<CompanyRole>,
}

impl EmployerIdentity {
    pub fn require_profile(&self) -> Result<Uuid> {
        self.employer_id.ok_or_else(|| {
            AppError::precondition(
                Requirement::EmployerProfile,
                "Create your employer profile first",
            )
        })
    }
}

/// An employer attached to an active company
#[derive(Debug, Clone)]
pub struct CompanyMember {
    pub user: SessionUser,
    pub employer_id: Uuid,
    pub company_id: Uuid,
    pub company_role: CompanyRole,
}

/// Authenticated caller, tagged by role
#[derive(Debug, Clone)]
pub enum Actor {
    Seeker(SeekerIdentity),
    Employer(EmployerIdentity),
}

impl Actor {
    pub fn user(&self) -> &SessionUser {
        match self {
            Actor::Seeker(seeker) => &seeker.user,
            Actor::Employer(employer) => &employer.user,
        }
    }

    pub fn role(&self) -> UserRole {
        self.user().role
    }

    pub fn into_seeker(self) -> Result<SeekerIdentity> {
        match self {
            Actor::Seeker(seeker) => Ok(seeker),
            Actor::Employer(_) => Err(AppError::forbidden("Job seeker access required")),
        }
    }

    pub fn into_employer(self) -> Result<EmployerIdentity> {
        match self {
            Actor::Employer(employer) => Ok(employer),
            Actor::Seeker(_) => Err(AppError::forbidden("Employer access required")),
        }
    }
}
