//! Route guards: onboarding-state gating and permission gating.

pub mod engine;
pub mod permission;
pub mod requirements;
pub mod route;

pub use engine::{Guard, GuardContext, GuardDecision};
pub use permission::{PermissionDecision, PermissionGuard, PermissionRequirement};
pub use requirements::GuardRequirements;
pub use route::Route;
