use sea_query::{Alias, Condition, Expr, Iden, Order, PostgresQueryBuilder, Query, Value};

/* ----------------------------- FLUENT BUILDER WRAPPER ----------------------------- */

// Helper to check if a Value is None (NULL)
fn is_value_none(val: &Value) -> bool {
    matches!(
        val,
        Value::Bool(None)
            | Value::TinyInt(None)
            | Value::SmallInt(None)
            | Value::Int(None)
            | Value::BigInt(None)
            | Value::TinyUnsigned(None)
            | Value::SmallUnsigned(None)
            | Value::Unsigned(None)
            | Value::BigUnsigned(None)
            | Value::Float(None)
            | Value::Double(None)
            | Value::String(None)
            | Value::Char(None)
            | Value::Bytes(None)
            | Value::Json(None)
            | Value::ChronoDate(None)
            | Value::ChronoTime(None)
            | Value::ChronoDateTime(None)
            | Value::ChronoDateTimeUtc(None)
            | Value::ChronoDateTimeLocal(None)
            | Value::ChronoDateTimeWithTimeZone(None)
            | Value::Uuid(None)
    )
}

// --- INSERT ---

pub struct FluentInsert {
    table: Alias,
    values: Vec<(Alias, Value)>,
    returning: Vec<Alias>,
}

impl FluentInsert {
    pub fn into<T: Iden>(table: T) -> Self {
        Self {
            table: Alias::new(table.to_string()),
            values: vec![],
            returning: vec![],
        }
    }

    pub fn value<C: Iden, V: Into<Value>>(mut self, col: C, v: V) -> Self {
        let val: Value = v.into();
        if !is_value_none(&val) {
            self.values.push((Alias::new(col.to_string()), val));
        }
        self
    }

    pub fn returning<C: Iden>(mut self, col: C) -> Self {
        self.returning.push(Alias::new(col.to_string()));
        self
    }

    pub fn render(self) -> (String, sea_query::Values) {
        let mut query = Query::insert();
        query.into_table(self.table);

        // Unzip columns and values
        let (cols, vals): (Vec<Alias>, Vec<Value>) = self.values.into_iter().unzip();

        query.columns(cols);
        query.values_panic(vals.into_iter().map(sea_query::SimpleExpr::Value));

        if !self.returning.is_empty() {
            query.returning(Query::returning().columns(self.returning));
        }

        query.build(PostgresQueryBuilder)
    }
}

// --- SELECT ---

pub struct FluentSelect {
    table: Alias,
    columns: Vec<Alias>,
    filters: Vec<(Alias, Value)>,
    order_by: Option<(Alias, Order)>,
}

impl FluentSelect {
    pub fn from<T: Iden>(table: T) -> Self {
        Self {
            table: Alias::new(table.to_string()),
            columns: vec![],
            filters: vec![],
            order_by: None,
        }
    }

    pub fn column<C: Iden>(mut self, col: C) -> Self {
        self.columns.push(Alias::new(col.to_string()));
        self
    }

    pub fn filter<C: Iden, V: Into<Value>>(mut self, col: C, v: V) -> Self {
        let val: Value = v.into();
        if !is_value_none(&val) {
            self.filters.push((Alias::new(col.to_string()), val));
        }
        self
    }

    pub fn order_by<C: Iden>(mut self, col: C, order: Order) -> Self {
        self.order_by = Some((Alias::new(col.to_string()), order));
        self
    }

    pub fn render(self) -> (String, sea_query::Values) {
        let mut query = Query::select();
        query.from(self.table);

        if !self.columns.is_empty() {
            query.columns(self.columns);
        } else {
            query.column(Alias::new("*"));
        }

        for (col, val) in self.filters {
            query.and_where(Expr::col(col).eq(val));
        }

        if let Some((col, order)) = self.order_by {
            query.order_by(col, order);
        }

        query.build(PostgresQueryBuilder)
    }
}

// --- UPDATE ---

pub struct FluentUpdate {
    table: Alias,
    values: Vec<(Alias, Value)>,
    filters: Vec<(Alias, Value)>,
    conditions: Vec<Condition>,
}

impl FluentUpdate {
    pub fn table<T: Iden>(table: T) -> Self {
        Self {
            table: Alias::new(table.to_string()),
            values: vec![],
            filters: vec![],
            conditions: vec![],
        }
    }

    pub fn value<C: Iden, V: Into<Value>>(mut self, col: C, v: V) -> Self {
        // For UPDATE, we also skip setting a field if value is None
        let val: Value = v.into();
        if !is_value_none(&val) {
            self.values.push((Alias::new(col.to_string()), val));
        }
        self
    }

    pub fn filter<C: Iden, V: Into<Value>>(mut self, col: C, v: V) -> Self {
        let val: Value = v.into();
        if !is_value_none(&val) {
            self.filters.push((Alias::new(col.to_string()), val));
        }
        self
    }

    /// Only rows where at least one written column differs from its new value
    /// are touched, so `rows_affected` counts real modifications.
    pub fn only_if_changed(mut self) -> Self {
        let mut changed = Condition::any();
        for (col, val) in &self.values {
            changed = changed.add(Expr::col(col.clone()).ne(val.clone()));
        }
        self.conditions.push(changed);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn render(self) -> (String, sea_query::Values) {
        let mut query = Query::update();
        query.table(self.table);

        query.values(
            self.values
                .into_iter()
                .map(|(col, val)| (col, sea_query::SimpleExpr::Value(val))),
        );

        for (col, val) in self.filters {
            query.and_where(Expr::col(col).eq(val));
        }

        for cond in self.conditions {
            query.cond_where(cond);
        }

        query.build(PostgresQueryBuilder)
    }
}

// --- DELETE ---

pub struct FluentDelete {
    table: Alias,
    filters: Vec<(Alias, Value)>,
}

impl FluentDelete {
    pub fn from<T: Iden>(table: T) -> Self {
        Self {
            table: Alias::new(table.to_string()),
            filters: vec![],
        }
    }

    pub fn filter<C: Iden, V: Into<Value>>(mut self, col: C, v: V) -> Self {
        let val: Value = v.into();
        if !is_value_none(&val) {
            self.filters.push((Alias::new(col.to_string()), val));
        }
        self
    }

    pub fn render(self) -> (String, sea_query::Values) {
        let mut query = Query::delete();
        query.from_table(self.table);

        for (col, val) in self.filters {
            query.and_where(Expr::col(col).eq(val));
        }

        query.build(PostgresQueryBuilder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datalayer::CRUD::types::Bottles;

    #[test]
    fn test_fluent_insert_wrapper() {
        let (sql, values) = FluentInsert::into(Bottles::Table)
            .value(Bottles::Id, "507f1f77bcf86cd799439011")
            .value(Bottles::Name, "Gin")
            .value(Bottles::Brand, "X")
            .value(Bottles::Capacity, 5.0)
            .returning(Bottles::Id)
            .render();

        assert!(sql.starts_with("INSERT INTO \"bottles\""));
        assert!(sql.contains("\"id\", \"name\", \"brand\", \"capacity\""));
        assert!(sql.contains("RETURNING \"id\""));
        assert_eq!(values.0.len(), 4);
    }

    #[test]
    fn test_fluent_select_wrapper() {
        let (sql, _) = FluentSelect::from(Bottles::Table)
            .column(Bottles::Id)
            .column(Bottles::Name)
            .filter(Bottles::Id, "507f1f77bcf86cd799439011")
            .order_by(Bottles::Id, Order::Asc)
            .render();

        assert!(sql.starts_with("SELECT \"id\", \"name\" FROM \"bottles\""));
        assert!(sql.contains("WHERE \"id\" = $1"));
        assert!(sql.contains("ORDER BY \"id\" ASC"));
    }

    #[test]
    fn test_fluent_update_skips_none_values() {
        let update = FluentUpdate::table(Bottles::Table)
            .value(Bottles::Name, Option::<String>::None)
            .value(Bottles::Brand, Some("Y".to_string()))
            .filter(Bottles::Id, "507f1f77bcf86cd799439011");

        assert!(!update.is_empty());
        let (sql, _) = update.render();

        assert!(sql.starts_with("UPDATE \"bottles\" SET \"brand\" = $1"));
        assert!(!sql.contains("\"name\""));
        assert!(sql.contains("WHERE \"id\" = $2"));
    }

    #[test]
    fn test_fluent_update_only_if_changed() {
        let (sql, values) = FluentUpdate::table(Bottles::Table)
            .value(Bottles::Name, "Rum")
            .value(Bottles::Capacity, 2.0)
            .filter(Bottles::Id, "507f1f77bcf86cd799439011")
            .only_if_changed()
            .render();

        assert!(sql.contains("WHERE \"id\" = $3"));
        assert!(sql.contains("\"name\" <> $4"));
        assert!(sql.contains("OR \"capacity\" <> $5"));
        assert_eq!(values.0.len(), 5);
    }

    #[test]
    fn test_fluent_update_empty() {
        let update = FluentUpdate::table(Bottles::Table).value(Bottles::Capacity, Option::<f64>::None);
        assert!(update.is_empty());
    }

    #[test]
    fn test_fluent_delete_wrapper() {
        let (sql, _) = FluentDelete::from(Bottles::Table)
            .filter(Bottles::Id, "507f1f77bcf86cd799439011")
            .render();

        assert!(sql.starts_with("DELETE FROM \"bottles\""));
        assert!(sql.contains("WHERE \"id\" = $1"));
    }
}
