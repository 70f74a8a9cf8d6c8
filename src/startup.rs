//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use redis::aio::ConnectionManager;
use sqlx::PgPool;
use tokio::net::TcpListener;

use crate::application::services::{
    AuthServiceImpl, CommentServiceImpl, DeclarationServiceImpl, DrinkServiceImpl,
    MemberServiceImpl, NotificationServiceImpl, PostServiceImpl, RegistrationServiceImpl,
    SearchServiceImpl, TagServiceImpl,
};
use crate::config::Settings;
use crate::domain::TokenStore;
use crate::infrastructure::cache::{self, RedisTokenStore};
use crate::infrastructure::database;
use crate::infrastructure::repositories::{
    PgCommentRepository, PgDeclarationRepository, PgDrinkRepository, PgMemberRepository,
    PgNotificationRepository, PgPostRepository, PgRegionRepository, PgRegistrationRepository,
    PgTagFollowRepository, PgTagRepository,
};
use crate::presentation::http::{handlers, routes};
use crate::presentation::middleware::{cors, logging};
use crate::shared::snowflake::SnowflakeGenerator;

/// Notification service over the PostgreSQL repositories
pub type PgNotificationService = NotificationServiceImpl<
    PgNotificationRepository,
    PgMemberRepository,
    PgPostRepository,
    PgTagRepository,
    PgTagFollowRepository,
>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Absent when token storage is not Redis-backed (tests)
    pub redis: Option<ConnectionManager>,
    pub tokens: Arc<dyn TokenStore>,
    pub snowflake: Arc<SnowflakeGenerator>,
    pub settings: Arc<Settings>,
}

impl AppState {
    fn members(&self) -> Arc<PgMemberRepository> {
        Arc::new(PgMemberRepository::new(self.db.clone()))
    }

    fn posts(&self) -> Arc<PgPostRepository> {
        Arc::new(PgPostRepository::new(self.db.clone()))
    }

    fn tags(&self) -> Arc<PgTagRepository> {
        Arc::new(PgTagRepository::new(self.db.clone()))
    }

    fn drinks(&self) -> Arc<PgDrinkRepository> {
        Arc::new(PgDrinkRepository::new(self.db.clone()))
    }

    fn regions(&self) -> Arc<PgRegionRepository> {
        Arc::new(PgRegionRepository::new(self.db.clone()))
    }

    fn declarations(&self) -> Arc<PgDeclarationRepository> {
        Arc::new(PgDeclarationRepository::new(self.db.clone()))
    }

    pub fn auth_service(
        &self,
    ) -> AuthServiceImpl<PgMemberRepository, PgRegionRepository, dyn TokenStore> {
        AuthServiceImpl::new(
            self.members(),
            self.regions(),
            self.tokens.clone(),
            self.snowflake.clone(),
            self.settings.jwt.clone(),
            self.settings.password_reset.clone(),
        )
    }

    pub fn member_service(&self) -> MemberServiceImpl<PgMemberRepository, PgRegionRepository> {
        MemberServiceImpl::new(self.members(), self.regions())
    }

    pub fn notification_service(&self) -> PgNotificationService {
        NotificationServiceImpl::new(
            Arc::new(PgNotificationRepository::new(self.db.clone())),
            self.members(),
            self.posts(),
            self.tags(),
            Arc::new(PgTagFollowRepository::new(self.db.clone())),
            self.snowflake.clone(),
        )
    }

    pub fn search_service(&self) -> SearchServiceImpl<PgPostRepository, PgTagRepository> {
        SearchServiceImpl::new(self.posts(), self.tags())
    }

    pub fn post_service(
        &self,
    ) -> PostServiceImpl<
        PgPostRepository,
        PgDrinkRepository,
        PgTagRepository,
        PgDeclarationRepository,
        PgNotificationService,
    > {
        PostServiceImpl::new(
            self.posts(),
            self.drinks(),
            self.tags(),
            self.declarations(),
            Arc::new(self.notification_service()),
            self.snowflake.clone(),
        )
    }

    pub fn comment_service(
        &self,
    ) -> CommentServiceImpl<
        PgCommentRepository,
        PgPostRepository,
        PgMemberRepository,
        PgNotificationService,
    > {
        CommentServiceImpl::new(
            Arc::new(PgCommentRepository::new(self.db.clone())),
            self.posts(),
            self.members(),
            Arc::new(self.notification_service()),
            self.snowflake.clone(),
        )
    }

    pub fn tag_service(&self) -> TagServiceImpl<PgTagRepository, PgTagFollowRepository> {
        TagServiceImpl::new(
            self.tags(),
            Arc::new(PgTagFollowRepository::new(self.db.clone())),
            self.snowflake.clone(),
        )
    }

    pub fn registration_service(
        &self,
    ) -> RegistrationServiceImpl<
        PgRegistrationRepository,
        PgRegionRepository,
        PgDrinkRepository,
        PgNotificationService,
    > {
        RegistrationServiceImpl::new(
            Arc::new(PgRegistrationRepository::new(self.db.clone())),
            self.regions(),
            self.drinks(),
            Arc::new(self.notification_service()),
            self.snowflake.clone(),
        )
    }

    pub fn declaration_service(
        &self,
    ) -> DeclarationServiceImpl<PgDeclarationRepository, PgPostRepository, PgNotificationService>
    {
        DeclarationServiceImpl::new(
            self.declarations(),
            self.posts(),
            Arc::new(self.notification_service()),
            self.snowflake.clone(),
        )
    }

    pub fn drink_service(&self) -> DrinkServiceImpl<PgDrinkRepository, PgRegionRepository> {
        DrinkServiceImpl::new(self.drinks(), self.regions())
    }
}

/// Build the full router, middleware included
pub fn build_router(state: AppState) -> Router {
    let cors = cors::create_cors_layer(&state.settings.cors);

    routes::create_router(state)
        .layer(logging::create_trace_layer())
        .layer(cors)
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        handlers::health::init_server_start();

        let db = database::create_pool(&settings.database).await?;
        tracing::info!("Database connection pool created");

        let redis = cache::create_redis_client(&settings.redis).await?;
        let tokens: Arc<dyn TokenStore> = Arc::new(RedisTokenStore::new(redis.clone()));

        let snowflake = Arc::new(SnowflakeGenerator::new(settings.snowflake.worker_id));

        let state = AppState {
            db,
            redis: Some(redis),
            tokens,
            snowflake,
            settings: Arc::new(settings.clone()),
        };

        let router = build_router(state);

        let addr: SocketAddr = settings
            .server_addr()
            .parse()
            .context("invalid server address")?;
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;

        Ok(Self { listener, router })
    }

    /// Serve until Ctrl-C or SIGTERM, letting in-flight requests finish
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        tracing::info!("Server stopped");
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
