//! Permission state and its owning service.

pub mod fallback;
pub mod service;
pub mod state;

pub use service::PermissionService;
pub use state::{PermissionState, group_grants};
