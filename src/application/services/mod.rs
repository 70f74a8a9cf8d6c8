//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **AuthService**: Sign-up, sign-in, JWT tokens, password management
//! - **MemberService**: Member profile management
//! - **PostService**: Posts and their tags
//! - **CommentService**: Comments on posts
//! - **TagService**: Tag follows
//! - **SearchService**: Post search by tags or drink name
//! - **NotificationService**: Notification creation and fan-out
//! - **RegistrationService**: Member-submitted drinks and their approval
//! - **DeclarationService**: Post reports and their approval
//! - **DrinkService**: Drink catalog and regions

pub mod auth_service;
pub mod comment_service;
pub mod declaration_service;
pub mod drink_service;
pub mod member_service;
pub mod notification_service;
pub mod post_service;
pub mod registration_service;
pub mod search_service;
pub mod tag_service;

pub use auth_service::{
    hash_password, verify_access_token, verify_password, AuthService, AuthServiceImpl, Claims,
};
pub use comment_service::{CommentService, CommentServiceImpl};
pub use declaration_service::{DeclarationService, DeclarationServiceImpl};
pub use drink_service::{DrinkService, DrinkServiceImpl};
pub use member_service::{MemberService, MemberServiceImpl};
pub use notification_service::{NotificationService, NotificationServiceImpl};
pub use post_service::{PostService, PostServiceImpl};
pub use registration_service::{RegistrationService, RegistrationServiceImpl};
pub use search_service::{SearchService, SearchServiceImpl};
pub use tag_service::{TagService, TagServiceImpl};

#[cfg(test)]
pub use notification_service::MockNotificationService;
