pub mod account;
pub mod message;
pub mod user;
