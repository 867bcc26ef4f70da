//! Domain entities and invariants for roles, permissions and access gating.

#![forbid(unsafe_code)]

mod access;
mod permission;
mod registry;
mod resolver;
mod role;
mod role_change;
mod security;
mod session;
mod user;

pub use access::{AccessGate, GateDecision, ProtectedView};
pub use permission::{Capability, PermissionBundle};
pub use registry::RoleRegistry;
pub use resolver::PermissionResolver;
pub use role::{HierarchyLevel, Role};
pub use role_change::{RoleChangeAuthorizer, RoleChangeDecision};
pub use security::AuditAction;
pub use session::SessionRole;
pub use user::DirectoryUser;
