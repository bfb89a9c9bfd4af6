pub mod challenge;
pub mod community;
pub mod entrepreneur;
pub mod order;
pub mod password_reset_token;
pub mod user;

pub use challenge::Challenge;
pub use community::{CommentView, PostView};
pub use entrepreneur::Entrepreneur;
pub use order::{Order, OrderView};
pub use password_reset_token::PasswordResetToken;
pub use user::{Profile, PublicProfile, User};
