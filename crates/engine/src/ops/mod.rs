use sea_orm::{ConnectionTrait, DatabaseConnection, prelude::*};

use crate::{
    EngineError, ResultEngine,
    dashboard::{DashboardOptions, Names},
};

mod accounts;
mod categories;
mod dashboard;
mod fixed_expenses;
mod goals;
mod parameters;
mod reports;
mod responsibles;
mod transactions;

pub use transactions::TransactionListFilter;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Generates a `require_*` lookup returning the stored model or `KeyNotFound`.
macro_rules! impl_require {
    ($require_fn:ident, $entity:ty, $model:ty, $label:literal) => {
        pub(super) async fn $require_fn<C: ConnectionTrait>(
            &self,
            db: &C,
            id: Uuid,
        ) -> ResultEngine<$model> {
            <$entity>::find_by_id(id)
                .one(db)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("{} {id} not exists", $label)))
        }
    };
}

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    dashboard: DashboardOptions,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    impl_require!(
        require_category,
        crate::categories::Entity,
        crate::categories::Model,
        "category"
    );
    impl_require!(
        require_account,
        crate::accounts::Entity,
        crate::accounts::Model,
        "account"
    );
    impl_require!(
        require_responsible,
        crate::responsibles::Entity,
        crate::responsibles::Model,
        "responsible"
    );
    impl_require!(
        require_goal,
        crate::goals::Entity,
        crate::goals::Model,
        "goal"
    );
    impl_require!(
        require_fixed_expense,
        crate::fixed_expenses::Entity,
        crate::fixed_expenses::Model,
        "fixed expense"
    );
    impl_require!(
        require_transaction,
        crate::transactions::Entity,
        crate::transactions::Model,
        "transaction"
    );

    /// Checks the optional references shared by transactions, fixed expenses
    /// and goals. The category model is returned so callers can check its
    /// kind.
    pub(super) async fn require_references<C: ConnectionTrait>(
        &self,
        db: &C,
        category_id: Option<Uuid>,
        account_id: Option<Uuid>,
        responsible_id: Option<Uuid>,
    ) -> ResultEngine<Option<crate::categories::Model>> {
        if let Some(id) = account_id {
            self.require_account(db, id).await?;
        }
        if let Some(id) = responsible_id {
            self.require_responsible(db, id).await?;
        }
        match category_id {
            Some(id) => Ok(Some(self.require_category(db, id).await?)),
            None => Ok(None),
        }
    }

    /// Display names of every category, account and responsible.
    pub(super) async fn load_names<C: ConnectionTrait>(&self, db: &C) -> ResultEngine<Names> {
        let mut names = Names::default();
        for model in crate::categories::Entity::find().all(db).await? {
            names.categories.insert(model.id, model.name);
        }
        for model in crate::accounts::Entity::find().all(db).await? {
            names.accounts.insert(model.id, model.name);
        }
        for model in crate::responsibles::Entity::find().all(db).await? {
            names.responsibles.insert(model.id, model.name);
        }
        Ok(names)
    }
}

/// Fails with `InUse` when other rows still point to `label`.
fn ensure_unreferenced(label: &str, references: u64) -> ResultEngine<()> {
    if references > 0 {
        tracing::debug!("refusing to delete {label}: {references} references");
        return Err(EngineError::InUse(label.to_string()));
    }
    Ok(())
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    dashboard: DashboardOptions,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Number of transactions listed in the dashboard's "latest" panel.
    pub fn latest_limit(mut self, limit: usize) -> EngineBuilder {
        self.dashboard.latest_limit = limit;
        self
    }

    /// Category whose income is shifted across months by the salary rule.
    pub fn salary_category(mut self, name: impl Into<String>) -> EngineBuilder {
        self.dashboard.salary_category = name.into();
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            dashboard: self.dashboard,
        })
    }
}
