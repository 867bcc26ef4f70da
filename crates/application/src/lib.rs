//! Application services and ports.

#![forbid(unsafe_code)]

mod audit_ports;
mod session_role_loader;
mod user_admin_service;
mod user_directory_ports;

pub use audit_ports::{
    AuditEvent, AuditLogEntry, AuditLogQuery, AuditLogRepository, AuditRepository,
};
pub use session_role_loader::{RoleFetchTicket, SessionRoleLoader, SessionRoleTracker};
pub use user_admin_service::{RoleChange, UserAdminService};
pub use user_directory_ports::UserDirectoryRepository;
