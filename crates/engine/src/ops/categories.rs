use sea_orm::{
    ActiveValue, ConnectionTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    Category, CategoryKind, EngineError, ResultEngine, categories, fixed_expenses, goals,
    transactions,
    util::{name_key, normalize_required_name},
};

use super::{Engine, ensure_unreferenced, with_tx};

impl Engine {
    /// List categories ordered by name, optionally only one side.
    pub async fn categories(&self, kind: Option<CategoryKind>) -> ResultEngine<Vec<Category>> {
        let mut query = categories::Entity::find();
        if let Some(kind) = kind {
            query = query.filter(categories::Column::Kind.eq(kind.as_str()));
        }
        query
            .order_by_asc(categories::Column::NameNorm)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Category::try_from)
            .collect()
    }

    pub async fn category(&self, id: Uuid) -> ResultEngine<Category> {
        let model = self.require_category(&self.database, id).await?;
        Category::try_from(model)
    }

    /// Add a new category. The same name may exist once per kind.
    pub async fn new_category(&self, name: &str, kind: CategoryKind) -> ResultEngine<Category> {
        let name = normalize_required_name(name, "category")?;
        with_tx!(self, |db_tx| {
            ensure_category_name_free(&db_tx, &name, kind, None).await?;
            let category = Category {
                id: Uuid::new_v4(),
                name,
                kind,
            };
            categories::ActiveModel::from(&category)
                .insert(&db_tx)
                .await?;
            tracing::info!("created category {} ({})", category.name, kind.as_str());
            Ok(category)
        })
    }

    pub async fn update_category(
        &self,
        id: Uuid,
        name: &str,
        kind: CategoryKind,
    ) -> ResultEngine<Category> {
        let name = normalize_required_name(name, "category")?;
        with_tx!(self, |db_tx| {
            self.require_category(&db_tx, id).await?;
            ensure_category_name_free(&db_tx, &name, kind, Some(id)).await?;

            let category = Category { id, name, kind };
            let mut active: categories::ActiveModel = (&category).into();
            active.id = ActiveValue::Unchanged(id);
            active.update(&db_tx).await?;
            Ok(category)
        })
    }

    /// Delete a category nothing points to anymore.
    pub async fn delete_category(&self, id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_category(&db_tx, id).await?;
            let references = transactions::Entity::find()
                .filter(transactions::Column::CategoryId.eq(id))
                .count(&db_tx)
                .await?
                + fixed_expenses::Entity::find()
                    .filter(fixed_expenses::Column::CategoryId.eq(id))
                    .count(&db_tx)
                    .await?
                + goals::Entity::find()
                    .filter(goals::Column::CategoryId.eq(id))
                    .count(&db_tx)
                    .await?;
            ensure_unreferenced(&model.name, references)?;

            let res = categories::Entity::delete_by_id(id).exec(&db_tx).await?;
            if res.rows_affected == 0 {
                return Err(EngineError::KeyNotFound(format!("category {id} not exists")));
            }
            Ok(())
        })
    }
}

async fn ensure_category_name_free<C: ConnectionTrait>(
    db: &C,
    name: &str,
    kind: CategoryKind,
    except: Option<Uuid>,
) -> ResultEngine<()> {
    let mut query = categories::Entity::find()
        .filter(categories::Column::NameNorm.eq(name_key(name)))
        .filter(categories::Column::Kind.eq(kind.as_str()));
    if let Some(id) = except {
        query = query.filter(categories::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(EngineError::ExistingKey(name.to_string()));
    }
    Ok(())
}
