use sea_orm::{
    ActiveValue, ConnectionTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    Account, EngineError, ResultEngine, accounts, fixed_expenses, transactions,
    util::{name_key, normalize_required_name},
};

use super::{Engine, ensure_unreferenced, with_tx};

impl Engine {
    pub async fn accounts(&self) -> ResultEngine<Vec<Account>> {
        Ok(accounts::Entity::find()
            .order_by_asc(accounts::Column::NameNorm)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Account::from)
            .collect())
    }

    pub async fn account(&self, id: Uuid) -> ResultEngine<Account> {
        Ok(self.require_account(&self.database, id).await?.into())
    }

    /// Add a new account or card.
    pub async fn new_account(&self, name: &str) -> ResultEngine<Account> {
        let name = normalize_required_name(name, "account")?;
        with_tx!(self, |db_tx| {
            ensure_account_name_free(&db_tx, &name, None).await?;
            let account = Account::new(name);
            accounts::ActiveModel::from(&account).insert(&db_tx).await?;
            tracing::info!("created account {}", account.name);
            Ok(account)
        })
    }

    /// Renames an existing account.
    pub async fn rename_account(&self, id: Uuid, new_name: &str) -> ResultEngine<Account> {
        let new_name = normalize_required_name(new_name, "account")?;
        with_tx!(self, |db_tx| {
            self.require_account(&db_tx, id).await?;
            ensure_account_name_free(&db_tx, &new_name, Some(id)).await?;

            let active = accounts::ActiveModel {
                id: ActiveValue::Unchanged(id),
                name_norm: ActiveValue::Set(name_key(&new_name)),
                name: ActiveValue::Set(new_name.clone()),
            };
            active.update(&db_tx).await?;
            Ok(Account { id, name: new_name })
        })
    }

    pub async fn delete_account(&self, id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_account(&db_tx, id).await?;
            let references = transactions::Entity::find()
                .filter(transactions::Column::AccountId.eq(id))
                .count(&db_tx)
                .await?
                + fixed_expenses::Entity::find()
                    .filter(fixed_expenses::Column::AccountId.eq(id))
                    .count(&db_tx)
                    .await?;
            ensure_unreferenced(&model.name, references)?;

            let res = accounts::Entity::delete_by_id(id).exec(&db_tx).await?;
            if res.rows_affected == 0 {
                return Err(EngineError::KeyNotFound(format!("account {id} not exists")));
            }
            Ok(())
        })
    }
}

async fn ensure_account_name_free<C: ConnectionTrait>(
    db: &C,
    name: &str,
    except: Option<Uuid>,
) -> ResultEngine<()> {
    let mut query = accounts::Entity::find().filter(accounts::Column::NameNorm.eq(name_key(name)));
    if let Some(id) = except {
        query = query.filter(accounts::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(EngineError::ExistingKey(name.to_string()));
    }
    Ok(())
}
