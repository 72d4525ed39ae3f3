use async_trait::async_trait;
use sea_query::{Order, Value};
use sqlx::{PgPool, Postgres};
use tracing::{debug, error};

use crate::datalayer::CRUD::helper::object_id::ObjectId;
use crate::datalayer::CRUD::sql_generator::sql_generator::{
    FluentDelete, FluentInsert, FluentSelect, FluentUpdate,
};
use crate::datalayer::CRUD::store::BottleStore;
use crate::datalayer::CRUD::types::{
    Bottle, BottlePatch, BottleRow, Bottles, DeleteResult, NewBottle, UpdateResult,
};
use crate::errors::DbError;

/// Bottle store backed by the `bottles` table.
///
/// Identifiers are generated here, not by the database, so a record has the
/// same id shape whichever store holds it.
#[derive(Clone)]
pub struct PgBottleStore {
    pool: PgPool,
}

impl PgBottleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn select_all() -> FluentSelect {
        FluentSelect::from(Bottles::Table)
            .column(Bottles::Id)
            .column(Bottles::Name)
            .column(Bottles::Brand)
            .column(Bottles::Capacity)
    }
}

#[async_trait]
impl BottleStore for PgBottleStore {
    async fn insert_one(&self, bottle: NewBottle) -> Result<Option<Bottle>, DbError> {
        let id = ObjectId::new();

        let (sql, values) = FluentInsert::into(Bottles::Table)
            .value(Bottles::Id, id.to_hex())
            .value(Bottles::Name, bottle.name)
            .value(Bottles::Brand, bottle.brand)
            .value(Bottles::Capacity, bottle.capacity)
            .returning(Bottles::Id)
            .returning(Bottles::Name)
            .returning(Bottles::Brand)
            .returning(Bottles::Capacity)
            .render();

        let row = bind_query_as(sqlx::query_as::<Postgres, BottleRow>(&sql), values)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to insert bottle");
                DbError::from(e)
            })?;

        debug!(bottle_id = %id, inserted = row.is_some(), "Insert completed");

        row.map(Bottle::try_from).transpose()
    }

    async fn find(&self) -> Result<Vec<Bottle>, DbError> {
        let (sql, values) = Self::select_all().order_by(Bottles::Id, Order::Asc).render();

        let rows = bind_query_as(sqlx::query_as::<Postgres, BottleRow>(&sql), values)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Bottle::try_from).collect()
    }

    async fn find_one(&self, id: &ObjectId) -> Result<Option<Bottle>, DbError> {
        let (sql, values) = Self::select_all().filter(Bottles::Id, id.to_hex()).render();

        let row = bind_query_as(sqlx::query_as::<Postgres, BottleRow>(&sql), values)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Bottle::try_from).transpose()
    }

    async fn update_one(&self, id: &ObjectId, patch: BottlePatch) -> Result<UpdateResult, DbError> {
        let update = FluentUpdate::table(Bottles::Table)
            .value(Bottles::Name, patch.name)
            .value(Bottles::Brand, patch.brand)
            .value(Bottles::Capacity, patch.capacity);

        if update.is_empty() {
            return Ok(UpdateResult::default());
        }

        let (sql, values) = update
            .filter(Bottles::Id, id.to_hex())
            .only_if_changed()
            .render();

        let result = bind_query(sqlx::query::<Postgres>(&sql), values)
            .execute(&self.pool)
            .await?;

        Ok(UpdateResult {
            modified_count: result.rows_affected(),
        })
    }

    async fn delete_one(&self, id: &ObjectId) -> Result<DeleteResult, DbError> {
        let (sql, values) = FluentDelete::from(Bottles::Table)
            .filter(Bottles::Id, id.to_hex())
            .render();

        let result = bind_query(sqlx::query::<Postgres>(&sql), values)
            .execute(&self.pool)
            .await?;

        Ok(DeleteResult {
            deleted_count: result.rows_affected(),
        })
    }

    async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

/// Helper macro to implement binding for different query types
macro_rules! impl_bind_values {
    ($func_name:ident, $query_type:ty $(, $generic:ident)?) => {
        fn $func_name<'a $(, $generic)?>(mut query: $query_type, values: sea_query::Values) -> $query_type {
            for value in values.0 {
                query = match value {
                    Value::Bool(v) => query.bind(v),
                    Value::TinyInt(v) => query.bind(v.map(|x| x as i16)),
                    Value::SmallInt(v) => query.bind(v),
                    Value::Int(v) => query.bind(v),
                    Value::BigInt(v) => query.bind(v),
                    Value::TinyUnsigned(v) => query.bind(v.map(|x| x as i16)),
                    Value::SmallUnsigned(v) => query.bind(v.map(|x| x as i32)),
                    Value::Unsigned(v) => query.bind(v.map(|x| x as i64)),
                    Value::BigUnsigned(v) => query.bind(v.map(|x| x as i64)),
                    Value::Float(v) => query.bind(v),
                    Value::Double(v) => query.bind(v),
                    Value::String(v) => query.bind(v.map(|s| *s)),
                    Value::Char(v) => query.bind(v.map(|c| c.to_string())),
                    Value::Bytes(v) => query.bind(v.map(|b| *b)),
                    Value::Uuid(v) => query.bind(v.map(|u| *u)),
                    Value::Json(v) => query.bind(v.map(|j| *j)),
                    Value::ChronoDate(v) => query.bind(v.map(|d| *d)),
                    Value::ChronoTime(v) => query.bind(v.map(|t| *t)),
                    Value::ChronoDateTime(v) => query.bind(v.map(|dt| *dt)),
                    Value::ChronoDateTimeUtc(v) => query.bind(v.map(|dt| *dt)),
                    Value::ChronoDateTimeLocal(v) => query.bind(v.map(|dt| *dt)),
                    Value::ChronoDateTimeWithTimeZone(v) => query.bind(v.map(|dt| *dt)),
                    #[allow(unreachable_patterns)]
                    _ => query,
                };
            }
            query
        }
    };
}

impl_bind_values!(
    bind_query,
    sqlx::query::Query<'a, Postgres, sqlx::postgres::PgArguments>
);

impl_bind_values!(
    bind_query_as,
    sqlx::query::QueryAs<'a, Postgres, O, sqlx::postgres::PgArguments>,
    O
);
