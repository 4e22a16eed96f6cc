//! Database entity models for iconnect-session.
//!
//! Sea-ORM entity definitions for the three tables the crate touches: the
//! `session` table it owns, and the `member` and `role` tables it reads when
//! resolving permissions.

/// Session row: `sid` primary key, JSON `sess` blob, `expire` timestamp.
pub mod session;

/// Member row, consumed read-only by the permission resolver.
pub mod member;

/// Role row carrying `is_admin` and the `excluded_features` list.
pub mod role;
