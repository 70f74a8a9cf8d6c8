//! Repository Implementations
//!
//! PostgreSQL implementations of domain repository traits.
//!
//! ## Available Repositories
//!
//! - **MemberRepository** - Member accounts and profiles
//! - **DrinkRepository / RegionRepository** - Drink catalog
//! - **PostRepository** - Posts and post searches
//! - **TagRepository / TagFollowRepository** - Tags and subscriptions
//! - **CommentRepository** - Comments on posts
//! - **RegistrationRepository** - Drink registrations awaiting approval
//! - **DeclarationRepository** - Abuse reports
//! - **NotificationRepository** - Insert-only notifications
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use sqlx::PgPool;
//! use crate::infrastructure::repositories::{PgMemberRepository, PgNotificationRepository};
//!
//! async fn setup_repositories(pool: PgPool) {
//!     let member_repo = PgMemberRepository::new(pool.clone());
//!     let notification_repo = PgNotificationRepository::new(pool.clone());
//! }
//! ```

pub mod comment_repository;
pub mod declaration_repository;
pub mod drink_repository;
pub mod member_repository;
pub mod notification_repository;
pub mod post_repository;
pub mod registration_repository;
pub mod tag_repository;

pub use comment_repository::PgCommentRepository;
pub use declaration_repository::PgDeclarationRepository;
pub use drink_repository::{PgDrinkRepository, PgRegionRepository};
pub use member_repository::PgMemberRepository;
pub use notification_repository::PgNotificationRepository;
pub use post_repository::PgPostRepository;
pub use registration_repository::PgRegistrationRepository;
pub use tag_repository::{PgTagFollowRepository, PgTagRepository};
