//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_audit_repository;
mod in_memory_user_directory;
mod postgres_audit_repository;
mod postgres_user_directory_repository;

pub use in_memory_audit_repository::InMemoryAuditRepository;
pub use in_memory_user_directory::InMemoryUserDirectory;
pub use postgres_audit_repository::PostgresAuditRepository;
pub use postgres_user_directory_repository::PostgresUserDirectoryRepository;
