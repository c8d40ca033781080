//! TroubleshootImage entity model
//!
//! Stores only the reference (path or object key) of an image held in
//! external storage.

use std::fmt;

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "troubleshoot_images")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub troubleshoot_id: Uuid,
    /// Storage reference, e.g. `troubleshoot_images/leak.jpg`
    pub image: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::troubleshoot::Entity",
        from = "Column::TroubleshootId",
        to = "super::troubleshoot::Column::Id",
        on_delete = "Cascade"
    )]
    Troubleshoot,
}

impl Related<super::troubleshoot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Troubleshoot.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.image)
    }
}
