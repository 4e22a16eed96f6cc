//! Role entity model.
//!
//! Roles carry the admin flag and the `excluded_features` list the permission
//! resolver evaluates. Features are enabled unless named in the exclusion
//! list; admins bypass the list entirely.

use sea_orm::entity::prelude::*;

/// A role row, read-only from this crate's point of view.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "role")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(column_type = "Text")]
    pub name: String,

    /// Admin roles are granted every permission unconditionally.
    pub is_admin: bool,

    /// JSON array of feature ids this role is denied. Allow-by-default:
    /// anything not listed here is granted.
    #[sea_orm(column_type = "Json")]
    pub excluded_features: Json,
}

impl Model {
    /// Whether `feature` is named in this role's exclusion list.
    ///
    /// A malformed column (anything other than a JSON array of strings)
    /// excludes nothing, which keeps the allow-by-default polarity intact.
    pub fn excludes(&self, feature: &str) -> bool {
        self.excluded_features
            .as_array()
            .map(|list| list.iter().any(|v| v.as_str() == Some(feature)))
            .unwrap_or(false)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::member::Entity")]
    Member,
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
