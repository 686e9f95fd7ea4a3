pub mod access;
pub mod attendance;
pub mod code;
pub mod schedule;
pub mod user;
pub mod wire;
pub mod zone;
