use sea_orm::{
    ActiveValue, ConnectionTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, Responsible, ResultEngine, fixed_expenses, goals, responsibles, transactions,
    util::{name_key, normalize_required_name},
};

use super::{Engine, ensure_unreferenced, with_tx};

impl Engine {
    pub async fn responsibles(&self) -> ResultEngine<Vec<Responsible>> {
        Ok(responsibles::Entity::find()
            .order_by_asc(responsibles::Column::NameNorm)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Responsible::from)
            .collect())
    }

    pub async fn responsible(&self, id: Uuid) -> ResultEngine<Responsible> {
        Ok(self.require_responsible(&self.database, id).await?.into())
    }

    pub async fn new_responsible(&self, name: &str) -> ResultEngine<Responsible> {
        let name = normalize_required_name(name, "responsible")?;
        with_tx!(self, |db_tx| {
            if responsible_name_taken(&db_tx, &name, None).await? {
                return Err(EngineError::ExistingKey(name));
            }
            let responsible = Responsible::new(name);
            responsibles::ActiveModel::from(&responsible)
                .insert(&db_tx)
                .await?;
            Ok(responsible)
        })
    }

    pub async fn rename_responsible(
        &self,
        id: Uuid,
        new_name: &str,
    ) -> ResultEngine<Responsible> {
        let new_name = normalize_required_name(new_name, "responsible")?;
        with_tx!(self, |db_tx| {
            self.require_responsible(&db_tx, id).await?;
            if responsible_name_taken(&db_tx, &new_name, Some(id)).await? {
                return Err(EngineError::ExistingKey(new_name));
            }

            let active = responsibles::ActiveModel {
                id: ActiveValue::Unchanged(id),
                name_norm: ActiveValue::Set(name_key(&new_name)),
                name: ActiveValue::Set(new_name.clone()),
            };
            active.update(&db_tx).await?;
            Ok(Responsible { id, name: new_name })
        })
    }

    /// Delete a person no transaction, fixed expense or goal is attributed to.
    pub async fn delete_responsible(&self, id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_responsible(&db_tx, id).await?;
            let references = transactions::Entity::find()
                .filter(transactions::Column::ResponsibleId.eq(id))
                .count(&db_tx)
                .await?
                + fixed_expenses::Entity::find()
                    .filter(fixed_expenses::Column::ResponsibleId.eq(id))
                    .count(&db_tx)
                    .await?
                + goals::Entity::find()
                    .filter(goals::Column::ResponsibleId.eq(id))
                    .count(&db_tx)
                    .await?;
            ensure_unreferenced(&model.name, references)?;

            responsibles::Entity::delete_by_id(id).exec(&db_tx).await?;
            Ok(())
        })
    }
}

async fn responsible_name_taken<C: ConnectionTrait>(
    db: &C,
    name: &str,
    except: Option<Uuid>,
) -> ResultEngine<bool> {
    let mut query =
        responsibles::Entity::find().filter(responsibles::Column::NameNorm.eq(name_key(name)));
    if let Some(id) = except {
        query = query.filter(responsibles::Column::Id.ne(id));
    }
    Ok(query.one(db).await?.is_some())
}
