//! Free-form key/value settings stored alongside the data (`chave`/`valor`).

use sea_orm::entity::prelude::*;

/// Parameter holding the first month (`YYYY-MM`) the dashboard reports on.
pub const DASHBOARD_START: &str = "dashboard.start";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "parameters")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    pub value: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameter {
    pub key: String,
    pub value: String,
}

impl From<Model> for Parameter {
    fn from(model: Model) -> Self {
        Self {
            key: model.key,
            value: model.value,
        }
    }
}
