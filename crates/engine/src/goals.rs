//! Savings and investment goals (`Meta`).

use sea_orm::entity::{ActiveValue, prelude::*};

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GoalKind {
    #[default]
    Savings,
    Investment,
    SpendingReduction,
    Other,
}

impl GoalKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Savings => "savings",
            Self::Investment => "investment",
            Self::SpendingReduction => "spending_reduction",
            Self::Other => "other",
        }
    }
}

impl TryFrom<&str> for GoalKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "savings" | "economia" => Ok(Self::Savings),
            "investment" | "investimento" => Ok(Self::Investment),
            "spending_reduction" | "reducao_gastos" => Ok(Self::SpendingReduction),
            "other" | "outro" => Ok(Self::Other),
            other => Err(EngineError::InvalidKind(format!("invalid goal kind: {other}"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Goal {
    pub id: Uuid,
    pub description: String,
    pub kind: GoalKind,
    pub target_minor: i64,
    pub month: u32,
    pub year: i32,
    pub category_id: Option<Uuid>,
    pub responsible_id: Option<Uuid>,
    pub active: bool,
}

/// How far a goal is from its target.
#[derive(Clone, Debug, PartialEq)]
pub struct GoalProgress {
    pub goal: Goal,
    /// Transfers minus withdrawals linked to the goal.
    pub achieved_minor: i64,
    /// `achieved * 100 / target`, rounded to two decimals.
    pub percent: f64,
}

impl GoalProgress {
    pub fn new(goal: Goal, achieved_minor: i64) -> Self {
        let percent = if goal.target_minor > 0 {
            // Basis points keep the rounding in integer arithmetic.
            let bp = (i128::from(achieved_minor) * 10_000 * 2 + i128::from(goal.target_minor))
                .div_euclid(i128::from(goal.target_minor) * 2);
            bp as f64 / 100.0
        } else {
            0.0
        };
        Self {
            goal,
            achieved_minor,
            percent,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "goals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub description: String,
    pub kind: String,
    pub target_minor: i64,
    pub month: i32,
    pub year: i32,
    pub category_id: Option<Uuid>,
    pub responsible_id: Option<Uuid>,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Goal {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        let month = u32::try_from(model.month)
            .ok()
            .filter(|m| (1..=12).contains(m))
            .ok_or_else(|| EngineError::InvalidDate(format!("invalid month {}", model.month)))?;
        Ok(Self {
            id: model.id,
            description: model.description,
            kind: GoalKind::try_from(model.kind.as_str())?,
            target_minor: model.target_minor,
            month,
            year: model.year,
            category_id: model.category_id,
            responsible_id: model.responsible_id,
            active: model.active,
        })
    }
}

impl From<&Goal> for ActiveModel {
    fn from(goal: &Goal) -> Self {
        Self {
            id: ActiveValue::Set(goal.id),
            description: ActiveValue::Set(goal.description.clone()),
            kind: ActiveValue::Set(goal.kind.as_str().to_string()),
            target_minor: ActiveValue::Set(goal.target_minor),
            month: ActiveValue::Set(goal.month as i32),
            year: ActiveValue::Set(goal.year),
            category_id: ActiveValue::Set(goal.category_id),
            responsible_id: ActiveValue::Set(goal.responsible_id),
            active: ActiveValue::Set(goal.active),
        }
    }
}
