use sea_orm::{ActiveValue, QueryOrder, TransactionTrait, prelude::*};

use crate::{EngineError, Parameter, Period, ResultEngine, parameters};

use super::{Engine, with_tx};

impl Engine {
    pub async fn parameters(&self) -> ResultEngine<Vec<Parameter>> {
        Ok(parameters::Entity::find()
            .order_by_asc(parameters::Column::Key)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Parameter::from)
            .collect())
    }

    pub async fn parameter(&self, key: &str) -> ResultEngine<Parameter> {
        let key = normalize_key(key)?;
        parameters::Entity::find_by_id(key.clone())
            .one(&self.database)
            .await?
            .map(Parameter::from)
            .ok_or(EngineError::KeyNotFound(key))
    }

    /// Insert or replace a parameter. Known keys are validated.
    pub async fn set_parameter(&self, key: &str, value: &str) -> ResultEngine<Parameter> {
        let key = normalize_key(key)?;
        let value = value.trim().to_string();
        if key == parameters::DASHBOARD_START {
            value.parse::<Period>()?;
        }

        with_tx!(self, |db_tx| {
            let existing = parameters::Entity::find_by_id(key.clone())
                .one(&db_tx)
                .await?;
            let active = parameters::ActiveModel {
                key: ActiveValue::Set(key.clone()),
                value: ActiveValue::Set(value.clone()),
            };
            if existing.is_some() {
                active.update(&db_tx).await?;
            } else {
                active.insert(&db_tx).await?;
            }
            tracing::info!("parameter {key} set to '{value}'");
            Ok(Parameter { key, value })
        })
    }

    pub async fn delete_parameter(&self, key: &str) -> ResultEngine<()> {
        let key = normalize_key(key)?;
        let res = parameters::Entity::delete_by_id(key.clone())
            .exec(&self.database)
            .await?;
        if res.rows_affected == 0 {
            return Err(EngineError::KeyNotFound(key));
        }
        Ok(())
    }

    /// First month the dashboard reports on, when configured. A malformed
    /// value is ignored.
    pub(super) async fn dashboard_start<C: sea_orm::ConnectionTrait>(
        &self,
        db: &C,
    ) -> ResultEngine<Option<Period>> {
        let Some(model) = parameters::Entity::find_by_id(parameters::DASHBOARD_START.to_string())
            .one(db)
            .await?
        else {
            return Ok(None);
        };
        match model.value.parse::<Period>() {
            Ok(period) => Ok(Some(period)),
            Err(err) => {
                tracing::warn!("ignoring {}: {err}", parameters::DASHBOARD_START);
                Ok(None)
            }
        }
    }
}

fn normalize_key(key: &str) -> ResultEngine<String> {
    let key = key.trim();
    if key.is_empty() {
        return Err(EngineError::InvalidName(
            "parameter key must not be empty".to_string(),
        ));
    }
    Ok(key.to_string())
}
