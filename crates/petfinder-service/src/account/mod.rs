//! Registration and login.

pub mod service;

pub use service::{AccountService, LoginSession, RegisterInput};
