//! Session entity model for Sea-ORM database interaction.
//!
//! Maps to the `session` table used by the [`SessionStore`](crate::SessionStore):
//! one row per login, keyed by the random session id carried in the signed
//! cookie.

use sea_orm::entity::prelude::*;

/// A persisted session row.
///
/// # Database Schema
///
/// | Column | Type               | Description                           |
/// |--------|--------------------|---------------------------------------|
/// | sid    | TEXT (Primary Key) | Random 256-bit session id (hex)       |
/// | sess   | JSON               | Session data blob (cookie metadata,   |
/// |        |                    | member id/email, arbitrary extras)    |
/// | expire | TIMESTAMPTZ        | Expiry; rows past this are treated as |
/// |        |                    | absent and deleted lazily on read     |
///
/// At most one row exists per `sid`. Expiry is enforced at read time by the
/// store, not by a background sweep.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "session")]
pub struct Model {
    /// The unique session identifier: 64 lowercase hex characters generated
    /// from 256 bits of randomness at login.
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub sid: String,

    /// The session data blob, stored as JSON so password-change flows and
    /// similar can patch individual keys in place.
    #[sea_orm(column_type = "Json")]
    pub sess: Json,

    /// When the session stops being valid. A row with `expire` in the past is
    /// logically absent regardless of physical deletion.
    pub expire: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
