//! Per-user notification inbox.

pub mod service;

pub use service::NotificationService;
