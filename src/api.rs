//! Typed resource calls for the news reader backend.
//!
//! Every call goes through [`RequestAuthorizer::dispatch`](crate::authorizer::RequestAuthorizer::dispatch),
//! so each one carries the stored access token and transparently survives an access-token
//! expiry.

pub mod articles;
pub mod bookmarks;
pub mod dashboard;
pub mod weather;

pub use articles::*;
pub use bookmarks::*;
pub use dashboard::*;
pub use weather::*;
