pub mod id;
pub mod keys;

pub use id::{AppId, GroupId, UserId, UserScope};
