//! People of the household a transaction is attributed to (`Responsável`).

use sea_orm::entity::{ActiveValue, prelude::*};

use crate::util::name_key;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Responsible {
    pub id: Uuid,
    pub name: String,
}

impl Responsible {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "responsibles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub name_norm: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Responsible {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

impl From<&Responsible> for ActiveModel {
    fn from(responsible: &Responsible) -> Self {
        Self {
            id: ActiveValue::Set(responsible.id),
            name: ActiveValue::Set(responsible.name.clone()),
            name_norm: ActiveValue::Set(name_key(&responsible.name)),
        }
    }
}
