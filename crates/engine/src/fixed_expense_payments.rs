//! Month-local paid/unpaid checklist for fixed expenses.
//!
//! One row per `(fixed_expense_id, year, month)`; a missing row means unpaid.

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedExpensePayment {
    pub fixed_expense_id: Uuid,
    pub year: i32,
    pub month: u32,
    pub paid: bool,
    pub paid_on: Option<NaiveDate>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fixed_expense_payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub fixed_expense_id: Uuid,
    pub year: i32,
    pub month: i32,
    pub paid: bool,
    pub paid_on: Option<Date>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::fixed_expenses::Entity",
        from = "Column::FixedExpenseId",
        to = "super::fixed_expenses::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    FixedExpense,
}

impl Related<super::fixed_expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FixedExpense.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for FixedExpensePayment {
    fn from(model: Model) -> Self {
        Self {
            fixed_expense_id: model.fixed_expense_id,
            year: model.year,
            month: model.month.clamp(1, 12) as u32,
            paid: model.paid,
            paid_on: model.paid_on,
        }
    }
}
