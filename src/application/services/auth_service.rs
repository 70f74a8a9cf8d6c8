//! Authentication Service
//!
//! Handles member sign-up, sign-in, JWT issuance, refresh token rotation
//! and password reset.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::{distr::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, instrument, warn};

use crate::application::dto::request::SignUpRequest;
use crate::application::dto::response::{MemberResponse, TokenResponse};
use crate::config::{JwtSettings, PasswordResetSettings};
use crate::domain::{
    CurrentMember, Member, MemberRepository, RefreshGrant, RegionRepository, Role, TokenStore,
};
use crate::shared::error::{AppError, ErrorCode};
use crate::shared::snowflake::SnowflakeGenerator;

const RESET_TOKEN_LENGTH: usize = 48;

/// Authentication service trait
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new member with role USER
    async fn sign_up(&self, request: SignUpRequest) -> Result<MemberResponse, AppError>;

    /// Authenticate with email and password
    async fn sign_in(&self, email: &str, password: &str) -> Result<TokenResponse, AppError>;

    /// Exchange a refresh token for a new token pair; the old one is revoked
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<TokenResponse, AppError>;

    /// Revoke a refresh token
    async fn sign_out(&self, refresh_token: &str) -> Result<(), AppError>;

    /// Issue a single-use reset token for the member registered with `email`
    async fn request_password_reset(&self, email: &str) -> Result<(), AppError>;

    /// Check that a reset token is still usable
    async fn verify_reset_token(&self, token: &str) -> Result<(), AppError>;

    /// Consume a reset token and set a new password
    async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AppError>;

    /// Change the caller's password after checking the current one
    async fn change_password(
        &self,
        member: CurrentMember,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError>;
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (member ID)
    pub sub: String,
    /// Member role
    pub role: Role,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
    /// JWT ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

/// Decode and validate an access token into the caller's identity.
pub fn verify_access_token(settings: &JwtSettings, token: &str) -> Result<CurrentMember, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::Code(ErrorCode::TokenExpired)
        }
        _ => AppError::Code(ErrorCode::Unauthorized),
    })?;

    let id = token_data
        .claims
        .sub
        .parse::<i64>()
        .map_err(|_| AppError::Code(ErrorCode::Unauthorized))?;

    Ok(CurrentMember::new(id, token_data.claims.role))
}

/// Hash a password using Argon2id
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against its hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// SHA-256 hex digest used as the storage key for opaque tokens
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// AuthService implementation
pub struct AuthServiceImpl<M, R, S>
where
    M: MemberRepository,
    R: RegionRepository,
    S: TokenStore + ?Sized,
{
    member_repo: Arc<M>,
    region_repo: Arc<R>,
    token_store: Arc<S>,
    id_generator: Arc<SnowflakeGenerator>,
    jwt_settings: JwtSettings,
    reset_settings: PasswordResetSettings,
}

impl<M, R, S> AuthServiceImpl<M, R, S>
where
    M: MemberRepository,
    R: RegionRepository,
    S: TokenStore + ?Sized,
{
    /// Create a new AuthServiceImpl
    pub fn new(
        member_repo: Arc<M>,
        region_repo: Arc<R>,
        token_store: Arc<S>,
        id_generator: Arc<SnowflakeGenerator>,
        jwt_settings: JwtSettings,
        reset_settings: PasswordResetSettings,
    ) -> Self {
        Self {
            member_repo,
            region_repo,
            token_store,
            id_generator,
            jwt_settings,
            reset_settings,
        }
    }

    /// Generate a token pair and remember the refresh token
    async fn issue_tokens(&self, member_id: i64, role: Role) -> Result<TokenResponse, AppError> {
        let now = Utc::now();
        let access_expiry = now + Duration::minutes(self.jwt_settings.access_token_expiry_minutes);

        let access_claims = Claims {
            sub: member_id.to_string(),
            role,
            exp: access_expiry.timestamp(),
            iat: now.timestamp(),
            jti: Some(uuid::Uuid::new_v4().to_string()),
        };

        let access_token = encode(
            &Header::default(),
            &access_claims,
            &EncodingKey::from_secret(self.jwt_settings.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

        // Opaque; only its hash is stored
        let refresh_token = format!("{}.{}", uuid::Uuid::new_v4(), uuid::Uuid::new_v4());

        self.token_store
            .save_refresh_token(
                &hash_token(&refresh_token),
                RefreshGrant { member_id, role },
                self.jwt_settings.refresh_token_ttl_secs(),
            )
            .await?;

        Ok(TokenResponse {
            access_token,
            refresh_token,
            expires_in: self.jwt_settings.access_token_expiry_minutes * 60,
            token_type: "Bearer".to_string(),
        })
    }
}

#[async_trait]
impl<M, R, S> AuthService for AuthServiceImpl<M, R, S>
where
    M: MemberRepository + 'static,
    R: RegionRepository + 'static,
    S: TokenStore + ?Sized + 'static,
{
    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn sign_up(&self, request: SignUpRequest) -> Result<MemberResponse, AppError> {
        if self.member_repo.email_exists(&request.email).await? {
            return Err(ErrorCode::EmailAlreadyExists.into());
        }

        self.region_repo
            .find_by_id(request.region_id)
            .await?
            .ok_or(AppError::Code(ErrorCode::RegionNotFound))?;

        let now = Utc::now();
        let member = Member {
            id: self.id_generator.generate(),
            region_id: request.region_id,
            name: request.name,
            email: request.email,
            password_hash: hash_password(&request.password)?,
            birth_date: request.birth_date,
            favor_drinks: request.favor_drinks,
            role: Role::User,
            alarm_enabled: true,
            image_url: request.image_url,
            created_at: now,
            updated_at: now,
        };

        let created = self.member_repo.create(&member).await?;
        info!(member_id = created.id, "Member signed up");

        Ok(MemberResponse::from(created))
    }

    #[instrument(skip(self, password))]
    async fn sign_in(&self, email: &str, password: &str) -> Result<TokenResponse, AppError> {
        let member = self
            .member_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::Code(ErrorCode::LoginFail))?;

        if !verify_password(password, &member.password_hash)? {
            return Err(ErrorCode::LoginFail.into());
        }

        self.issue_tokens(member.id, member.role).await
    }

    #[instrument(skip_all)]
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<TokenResponse, AppError> {
        let grant = self
            .token_store
            .take_refresh_token(&hash_token(refresh_token))
            .await?
            .ok_or(AppError::Code(ErrorCode::InvalidRefreshToken))?;

        self.issue_tokens(grant.member_id, grant.role).await
    }

    #[instrument(skip_all)]
    async fn sign_out(&self, refresh_token: &str) -> Result<(), AppError> {
        self.token_store
            .take_refresh_token(&hash_token(refresh_token))
            .await?
            .ok_or(AppError::Code(ErrorCode::InvalidRefreshToken))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn request_password_reset(&self, email: &str) -> Result<(), AppError> {
        let member = self
            .member_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::Code(ErrorCode::EmailNotFound))?;

        let token: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(RESET_TOKEN_LENGTH)
            .map(char::from)
            .collect();

        self.token_store
            .save_reset_token(
                &hash_token(&token),
                member.id,
                self.reset_settings.token_ttl_secs(),
            )
            .await?;

        // Mail delivery is outside this service; the link goes to the log.
        info!(
            member_id = member.id,
            link = %self.reset_settings.link_for(&token),
            "Password reset link issued"
        );

        Ok(())
    }

    #[instrument(skip_all)]
    async fn verify_reset_token(&self, token: &str) -> Result<(), AppError> {
        let token_hash = hash_token(token);
        if self.token_store.reset_token_exists(&token_hash).await? {
            Ok(())
        } else {
            Err(ErrorCode::InvalidResetToken.into())
        }
    }

    #[instrument(skip_all)]
    async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AppError> {
        let member_id = self
            .token_store
            .take_reset_token(&hash_token(token))
            .await?
            .ok_or(AppError::Code(ErrorCode::InvalidResetToken))?;

        let password_hash = hash_password(new_password)?;
        self.member_repo
            .update_password(member_id, &password_hash)
            .await?;

        info!(member_id, "Password reset");
        Ok(())
    }

    #[instrument(skip(self, current_password, new_password), fields(member_id = member.id))]
    async fn change_password(
        &self,
        member: CurrentMember,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let stored = self
            .member_repo
            .find_by_id(member.id)
            .await?
            .ok_or(AppError::Code(ErrorCode::MemberNotFound))?;

        if !verify_password(current_password, &stored.password_hash)? {
            warn!("Password change with wrong current password");
            return Err(ErrorCode::LoginFail.into());
        }

        let password_hash = hash_password(new_password)?;
        self.member_repo
            .update_password(member.id, &password_hash)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MockMemberRepository, MockRegionRepository, MockTokenStore, Region};
    use fake::faker::internet::en::SafeEmail;
    use fake::Fake;
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;

    const SECRET: &str = "a-test-secret-that-is-long-enough-for-hs256";

    fn jwt_settings() -> JwtSettings {
        JwtSettings {
            secret: SECRET.into(),
            access_token_expiry_minutes: 30,
            refresh_token_expiry_days: 14,
        }
    }

    fn reset_settings() -> PasswordResetSettings {
        PasswordResetSettings {
            token_ttl_minutes: 30,
            reset_url: "http://localhost/reset".into(),
        }
    }

    fn service(
        members: MockMemberRepository,
        regions: MockRegionRepository,
        tokens: MockTokenStore,
    ) -> AuthServiceImpl<MockMemberRepository, MockRegionRepository, MockTokenStore> {
        AuthServiceImpl::new(
            Arc::new(members),
            Arc::new(regions),
            Arc::new(tokens),
            Arc::new(SnowflakeGenerator::new(1)),
            jwt_settings(),
            reset_settings(),
        )
    }

    fn member_with_password(password: &str, role: Role) -> Member {
        Member {
            id: 42,
            email: SafeEmail().fake(),
            password_hash: hash_password(password).unwrap(),
            role,
            ..Member::default()
        }
    }

    fn sign_up_request(email: String) -> SignUpRequest {
        SignUpRequest {
            email,
            password: "password123".into(),
            name: "kim".into(),
            region_id: 1,
            birth_date: None,
            favor_drinks: vec![],
            image_url: None,
        }
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("wrong horse", &hash).unwrap());
    }

    #[test]
    fn test_token_hash_is_stable_hex() {
        let hash = hash_token("abc");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash_token("abc"));
    }

    #[tokio::test]
    async fn test_sign_up_rejects_duplicate_email() {
        let mut members = MockMemberRepository::new();
        members.expect_email_exists().returning(|_| Ok(true));
        members.expect_create().never();

        let err = service(members, MockRegionRepository::new(), MockTokenStore::new())
            .sign_up(sign_up_request(SafeEmail().fake()))
            .await
            .unwrap_err();

        assert_eq!(err.code(), Some(ErrorCode::EmailAlreadyExists));
    }

    #[tokio::test]
    async fn test_sign_up_requires_region() {
        let mut members = MockMemberRepository::new();
        members.expect_email_exists().returning(|_| Ok(false));
        let mut regions = MockRegionRepository::new();
        regions.expect_find_by_id().returning(|_| Ok(None));

        let err = service(members, regions, MockTokenStore::new())
            .sign_up(sign_up_request(SafeEmail().fake()))
            .await
            .unwrap_err();

        assert_eq!(err.code(), Some(ErrorCode::RegionNotFound));
    }

    #[tokio::test]
    async fn test_sign_up_hashes_password_and_defaults_role() {
        let email: String = SafeEmail().fake();

        let mut members = MockMemberRepository::new();
        members.expect_email_exists().returning(|_| Ok(false));
        members
            .expect_create()
            .withf(|m| m.role == Role::User && m.password_hash != "password123")
            .returning(|m| Ok(m.clone()));
        let mut regions = MockRegionRepository::new();
        regions.expect_find_by_id().returning(|id| {
            Ok(Some(Region {
                id,
                place_name: "Andong".into(),
            }))
        });

        let response = service(members, regions, MockTokenStore::new())
            .sign_up(sign_up_request(email.clone()))
            .await
            .unwrap();

        assert_eq!(response.email, email);
        assert_eq!(response.role, Role::User);
    }

    #[tokio::test]
    async fn test_sign_in_issues_verifiable_access_token() {
        let member = member_with_password("password123", Role::Admin);
        let email = member.email.clone();

        let mut members = MockMemberRepository::new();
        members
            .expect_find_by_email()
            .with(eq(email.clone()))
            .returning(move |_| Ok(Some(member.clone())));
        let mut tokens = MockTokenStore::new();
        tokens
            .expect_save_refresh_token()
            .withf(|_, grant, ttl| grant.member_id == 42 && *ttl == 14 * 86_400)
            .times(1)
            .returning(|_, _, _| Ok(()));

        let response = service(members, MockRegionRepository::new(), tokens)
            .sign_in(&email, "password123")
            .await
            .unwrap();

        let current = verify_access_token(&jwt_settings(), &response.access_token).unwrap();
        assert_eq!(current, CurrentMember::new(42, Role::Admin));
        assert_eq!(response.token_type, "Bearer");
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password() {
        let member = member_with_password("password123", Role::User);

        let mut members = MockMemberRepository::new();
        members
            .expect_find_by_email()
            .returning(move |_| Ok(Some(member.clone())));
        let mut tokens = MockTokenStore::new();
        tokens.expect_save_refresh_token().never();

        let err = service(members, MockRegionRepository::new(), tokens)
            .sign_in("kim@example.com", "nope")
            .await
            .unwrap_err();

        assert_eq!(err.code(), Some(ErrorCode::LoginFail));
    }

    #[tokio::test]
    async fn test_sign_in_unknown_email() {
        let mut members = MockMemberRepository::new();
        members.expect_find_by_email().returning(|_| Ok(None));

        let err = service(members, MockRegionRepository::new(), MockTokenStore::new())
            .sign_in("nobody@example.com", "password123")
            .await
            .unwrap_err();

        assert_eq!(err.code(), Some(ErrorCode::LoginFail));
    }

    #[tokio::test]
    async fn test_refresh_rotates_token() {
        let mut tokens = MockTokenStore::new();
        tokens
            .expect_take_refresh_token()
            .with(eq(hash_token("old")))
            .times(1)
            .returning(|_| {
                Ok(Some(RefreshGrant {
                    member_id: 7,
                    role: Role::User,
                }))
            });
        tokens
            .expect_save_refresh_token()
            .times(1)
            .returning(|_, _, _| Ok(()));

        let response = service(
            MockMemberRepository::new(),
            MockRegionRepository::new(),
            tokens,
        )
        .refresh_access_token("old")
        .await
        .unwrap();

        assert_ne!(response.refresh_token, "old");
        let current = verify_access_token(&jwt_settings(), &response.access_token).unwrap();
        assert_eq!(current.id, 7);
    }

    #[tokio::test]
    async fn test_refresh_with_unknown_token() {
        let mut tokens = MockTokenStore::new();
        tokens.expect_take_refresh_token().returning(|_| Ok(None));

        let err = service(
            MockMemberRepository::new(),
            MockRegionRepository::new(),
            tokens,
        )
        .refresh_access_token("missing")
        .await
        .unwrap_err();

        assert_eq!(err.code(), Some(ErrorCode::InvalidRefreshToken));
    }

    #[tokio::test]
    async fn test_password_reset_request_unknown_email() {
        let mut members = MockMemberRepository::new();
        members.expect_find_by_email().returning(|_| Ok(None));
        let mut tokens = MockTokenStore::new();
        tokens.expect_save_reset_token().never();

        let err = service(members, MockRegionRepository::new(), tokens)
            .request_password_reset("nobody@example.com")
            .await
            .unwrap_err();

        assert_eq!(err.code(), Some(ErrorCode::EmailNotFound));
    }

    #[tokio::test]
    async fn test_password_reset_request_stores_token_with_ttl() {
        let member = member_with_password("password123", Role::User);

        let mut members = MockMemberRepository::new();
        members
            .expect_find_by_email()
            .returning(move |_| Ok(Some(member.clone())));
        let mut tokens = MockTokenStore::new();
        tokens
            .expect_save_reset_token()
            .withf(|hash, member_id, ttl| hash.len() == 64 && *member_id == 42 && *ttl == 1800)
            .times(1)
            .returning(|_, _, _| Ok(()));

        service(members, MockRegionRepository::new(), tokens)
            .request_password_reset("kim@example.com")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_reset_password_consumes_token() {
        let mut tokens = MockTokenStore::new();
        tokens
            .expect_take_reset_token()
            .with(eq(hash_token("reset-token")))
            .times(1)
            .returning(|_| Ok(Some(42)));
        let mut members = MockMemberRepository::new();
        members
            .expect_update_password()
            .withf(|id, hash| *id == 42 && verify_password("new-password", hash).unwrap())
            .times(1)
            .returning(|_, _| Ok(()));

        service(members, MockRegionRepository::new(), tokens)
            .reset_password("reset-token", "new-password")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_reset_password_with_expired_token() {
        let mut tokens = MockTokenStore::new();
        tokens.expect_take_reset_token().returning(|_| Ok(None));
        let mut members = MockMemberRepository::new();
        members.expect_update_password().never();

        let err = service(members, MockRegionRepository::new(), tokens)
            .reset_password("expired", "new-password")
            .await
            .unwrap_err();

        assert_eq!(err.code(), Some(ErrorCode::InvalidResetToken));
    }

    #[tokio::test]
    async fn test_change_password_checks_current() {
        let member = member_with_password("password123", Role::User);

        let mut members = MockMemberRepository::new();
        members
            .expect_find_by_id()
            .returning(move |_| Ok(Some(member.clone())));
        members.expect_update_password().never();

        let err = service(members, MockRegionRepository::new(), MockTokenStore::new())
            .change_password(CurrentMember::new(42, Role::User), "wrong", "new-password")
            .await
            .unwrap_err();

        assert_eq!(err.code(), Some(ErrorCode::LoginFail));
    }

    #[test]
    fn test_tampered_access_token_is_unauthorized() {
        let err = verify_access_token(&jwt_settings(), "not.a.jwt").unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::Unauthorized));
    }
}
