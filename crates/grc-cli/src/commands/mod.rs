pub mod discover;
pub mod dispatch;
pub mod endpoints;
pub mod validate;
