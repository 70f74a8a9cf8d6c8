//! # Domain Entities
//!
//! Core domain entities representing the main business objects.
//! All entities map directly to their corresponding database tables.
//!
//! ## Core Entities
//!
//! - **Member**: Account with authentication data and profile
//! - **Drink / Region**: Catalog of regional drinks
//! - **Post**: A review or recommendation about a drink
//! - **Tag / TagFollow**: Post labels and member subscriptions to them
//! - **Comment**: A comment on a post
//!
//! ## Moderation & Messaging
//!
//! - **Registration**: Member-submitted drink awaiting approval
//! - **Declaration**: Abuse report against a post
//! - **Notification**: Immutable message addressed to one member
//! - **TokenStore**: Refresh and password reset tokens
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait defining data access operations.
//! These traits are implemented in the infrastructure layer, following the
//! dependency inversion principle.

mod comment;
mod declaration;
mod drink;
mod member;
mod notification;
mod post;
mod registration;
mod tag;
mod token;

pub use comment::{Comment, CommentRecord, CommentRepository};
pub use declaration::{Declaration, DeclarationRepository};
pub use drink::{Drink, DrinkRecord, DrinkRepository, DrinkType, Region, RegionRepository};
pub use member::{CurrentMember, Member, MemberRepository, Role};
pub use notification::{
    Notification, NotificationEvent, NotificationKind, NotificationRepository,
    ANONYMOUS_COMMENT_CONTENT, RECENT_NOTIFICATION_LIMIT,
};
pub use post::{Post, PostRecord, PostRepository, PostSort, PostSortField, PostType};
pub use registration::{Registration, RegistrationRepository};
pub use tag::{normalize_tag_names, Tag, TagFollow, TagFollowRepository, TagRepository};
pub use token::{RefreshGrant, TokenStore};

#[cfg(test)]
pub use comment::MockCommentRepository;
#[cfg(test)]
pub use declaration::MockDeclarationRepository;
#[cfg(test)]
pub use drink::{MockDrinkRepository, MockRegionRepository};
#[cfg(test)]
pub use member::MockMemberRepository;
#[cfg(test)]
pub use notification::MockNotificationRepository;
#[cfg(test)]
pub use post::MockPostRepository;
#[cfg(test)]
pub use registration::MockRegistrationRepository;
#[cfg(test)]
pub use tag::{MockTagFollowRepository, MockTagRepository};
#[cfg(test)]
pub use token::MockTokenStore;
