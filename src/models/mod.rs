pub mod admin;
pub mod attendance;
pub mod member;
pub mod session;
