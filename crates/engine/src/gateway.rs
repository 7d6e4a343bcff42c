use async_trait::async_trait;
use thiserror::Error;

use sahiloan_core::domain::profile::{UserId, UserProfile};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("profile lookup failed: {0}")]
    Upstream(String),
}

/// Identity and financial-profile lookups, served by an external system.
/// Phone numbers arrive already verified; this is a lookup key, not an
/// authentication step.
#[async_trait]
pub trait ProfileGateway: Send + Sync {
    async fn get_by_phone(&self, phone_number: &str)
        -> Result<Option<UserProfile>, GatewayError>;
    async fn get_by_id(&self, user_id: &UserId) -> Result<Option<UserProfile>, GatewayError>;
}

/// Fixed-roster gateway for tests and local demos.
#[derive(Default)]
pub struct StaticProfileGateway {
    profiles: Vec<UserProfile>,
}

impl StaticProfileGateway {
    pub fn new(profiles: Vec<UserProfile>) -> Self {
        Self { profiles }
    }
}

#[async_trait]
impl ProfileGateway for StaticProfileGateway {
    async fn get_by_phone(
        &self,
        phone_number: &str,
    ) -> Result<Option<UserProfile>, GatewayError> {
        Ok(self.profiles.iter().find(|profile| profile.phone_number == phone_number).cloned())
    }

    async fn get_by_id(&self, user_id: &UserId) -> Result<Option<UserProfile>, GatewayError> {
        Ok(self.profiles.iter().find(|profile| &profile.id == user_id).cloned())
    }
}
