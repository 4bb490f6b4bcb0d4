use async_trait::async_trait;
use thiserror::Error;

use crate::structure::registration::Registration;

pub mod memory;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("roll number already registered")]
    DuplicateRollNumber,

    #[error("email already registered")]
    DuplicateEmail,

    #[error("registration id already taken")]
    DuplicateId,

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence boundary for accepted registrations
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    /// Insert unless the roll number, email or id is taken, checked in that order.
    /// The check and the insert must happen as one atomic step.
    async fn insert(&self, registration: Registration) -> Result<(), StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Registration>, StoreError>;

    async fn find_by_roll_number(
        &self,
        roll_number: &str,
    ) -> Result<Option<Registration>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Registration>, StoreError>;

    async fn count(&self) -> Result<usize, StoreError>;
}
