//! Registration Service
//!
//! Members propose drinks for the catalog; an admin approves them, which
//! adds the drink and notifies the proposer.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, instrument};

use super::notification_service::NotificationService;
use crate::application::dto::request::RegistrationRequest;
use crate::application::dto::response::{DrinkResponse, RegistrationResponse};
use crate::domain::{
    CurrentMember, DrinkRecord, DrinkRepository, RegionRepository, Registration,
    RegistrationRepository,
};
use crate::shared::error::{AppError, ErrorCode};
use crate::shared::snowflake::SnowflakeGenerator;

/// Registration service trait
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Submit a drink for the catalog
    async fn register_drink(
        &self,
        member: CurrentMember,
        request: RegistrationRequest,
    ) -> Result<RegistrationResponse, AppError>;

    /// Registrations awaiting approval; admin only
    async fn get_pending(
        &self,
        member: CurrentMember,
    ) -> Result<Vec<RegistrationResponse>, AppError>;

    /// Approve a registration and add its drink; admin only
    async fn approve(
        &self,
        member: CurrentMember,
        registration_id: i64,
    ) -> Result<DrinkResponse, AppError>;
}

/// RegistrationService implementation
pub struct RegistrationServiceImpl<R, G, D, N>
where
    R: RegistrationRepository,
    G: RegionRepository,
    D: DrinkRepository,
    N: NotificationService,
{
    registration_repo: Arc<R>,
    region_repo: Arc<G>,
    drink_repo: Arc<D>,
    notifications: Arc<N>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<R, G, D, N> RegistrationServiceImpl<R, G, D, N>
where
    R: RegistrationRepository,
    G: RegionRepository,
    D: DrinkRepository,
    N: NotificationService,
{
    /// Create a new RegistrationServiceImpl
    pub fn new(
        registration_repo: Arc<R>,
        region_repo: Arc<G>,
        drink_repo: Arc<D>,
        notifications: Arc<N>,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            registration_repo,
            region_repo,
            drink_repo,
            notifications,
            id_generator,
        }
    }
}

#[async_trait]
impl<R, G, D, N> RegistrationService for RegistrationServiceImpl<R, G, D, N>
where
    R: RegistrationRepository + 'static,
    G: RegionRepository + 'static,
    D: DrinkRepository + 'static,
    N: NotificationService + 'static,
{
    #[instrument(skip(self, request), fields(member_id = member.id))]
    async fn register_drink(
        &self,
        member: CurrentMember,
        request: RegistrationRequest,
    ) -> Result<RegistrationResponse, AppError> {
        self.region_repo
            .find_by_id(request.region_id)
            .await?
            .ok_or(AppError::Code(ErrorCode::RegionNotFound))?;

        let registration = Registration {
            id: self.id_generator.generate(),
            member_id: member.id,
            region_id: request.region_id,
            drink_name: request.drink_name,
            drink_type: request.drink_type,
            degree: request.degree,
            sweetness: request.sweetness,
            cost: request.cost,
            description: request.description,
            image_url: request.image_url,
            approved: false,
            created_at: Utc::now(),
        };
        let registration = self.registration_repo.create(&registration).await?;

        info!(registration_id = registration.id, "Registration submitted");
        Ok(RegistrationResponse::from(registration))
    }

    #[instrument(skip(self), fields(member_id = member.id))]
    async fn get_pending(
        &self,
        member: CurrentMember,
    ) -> Result<Vec<RegistrationResponse>, AppError> {
        member.require_admin()?;

        let pending = self.registration_repo.find_pending().await?;
        Ok(pending
            .into_iter()
            .map(RegistrationResponse::from)
            .collect())
    }

    #[instrument(skip(self), fields(member_id = member.id))]
    async fn approve(
        &self,
        member: CurrentMember,
        registration_id: i64,
    ) -> Result<DrinkResponse, AppError> {
        member.require_admin()?;

        let mut registration = self
            .registration_repo
            .find_by_id(registration_id)
            .await?
            .ok_or(AppError::Code(ErrorCode::RegistrationNotFound))?;
        registration.approve()?;

        // Another admin may have approved it since the read.
        if !self.registration_repo.mark_approved(registration.id).await? {
            return Err(ErrorCode::RegistrationAlreadyApproved.into());
        }

        let place_name = self
            .region_repo
            .find_by_id(registration.region_id)
            .await?
            .map(|region| region.place_name)
            .unwrap_or_default();
        let drink = self
            .drink_repo
            .create(&registration.to_drink(self.id_generator.generate()))
            .await?;

        self.notifications
            .approve_registration_notification(registration.member_id, &registration)
            .await?;

        info!(registration_id, drink_id = drink.id, "Drink approved");
        Ok(DrinkResponse::from(DrinkRecord { drink, place_name }))
    }
}
