pub mod ids;
pub mod user;
