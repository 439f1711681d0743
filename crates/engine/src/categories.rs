//! Categories classify transactions, fixed expenses and goals.
//!
//! A category belongs either to the income side (`RECEITA`) or to the expense
//! side (`DESPESA`); the same name may exist once per side.

use sea_orm::entity::{ActiveValue, prelude::*};

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CategoryKind {
    Income,
    Expense,
}

impl CategoryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl TryFrom<&str> for CategoryKind {
    type Error = EngineError;

    /// Accepts the stored form as well as the legacy `RECEITA`/`DESPESA` labels.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "income" | "receita" => Ok(Self::Income),
            "expense" | "despesa" => Ok(Self::Expense),
            other => Err(EngineError::InvalidKind(format!(
                "invalid category kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub kind: CategoryKind,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub name_norm: String,
    pub kind: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Category {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: model.id,
            name: model.name,
            kind: CategoryKind::try_from(model.kind.as_str())?,
        })
    }
}

impl From<&Category> for ActiveModel {
    fn from(category: &Category) -> Self {
        Self {
            id: ActiveValue::Set(category.id),
            name: ActiveValue::Set(category.name.clone()),
            name_norm: ActiveValue::Set(crate::util::name_key(&category.name)),
            kind: ActiveValue::Set(category.kind.as_str().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_accepts_legacy_labels() {
        assert_eq!(CategoryKind::try_from("RECEITA").unwrap(), CategoryKind::Income);
        assert_eq!(CategoryKind::try_from("despesa").unwrap(), CategoryKind::Expense);
        assert_eq!(CategoryKind::try_from("expense").unwrap(), CategoryKind::Expense);
        assert!(CategoryKind::try_from("meta").is_err());
    }
}
