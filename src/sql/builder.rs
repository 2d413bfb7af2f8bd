//! Renders read plans into parameterized SELECT / COUNT statements.
//!
//! Identifiers come only from [`TableSpec`]; request values are always bind parameters.
//! Preloads become correlated scalar subqueries (`row_to_json` for to_one, `json_agg` for
//! to_many), nested for dotted paths, with the association's own filter/order/page applied
//! inside its subquery.

use crate::error::StoreError;
use crate::query::{Filter, Order, Page, ReadPlan};
use crate::sql::params::PgBindValue;
use crate::store::{IncludeDirection, RelationSpec, TableSpec};

/// Quote identifier for PostgreSQL (safe: only from table specs).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Full qualified table name.
fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

#[derive(Debug, Default)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
    aliases: usize,
}

impl QueryBuf {
    fn new() -> Self {
        Self::default()
    }

    fn push_param(&mut self, v: PgBindValue) -> usize {
        self.params.push(v);
        self.params.len()
    }

    /// `$n` or `$n::type` when the column declares a type.
    fn placeholder(&mut self, v: PgBindValue, pg_type: Option<&str>) -> String {
        let n = self.push_param(v);
        match pg_type {
            Some(t) => format!("${}::{}", n, t),
            None => format!("${}", n),
        }
    }

    fn next_alias(&mut self) -> String {
        let alias = format!("t{}", self.aliases);
        self.aliases += 1;
        alias
    }
}

/// Column list for `alias`: custom enum (schema.typename) and numeric columns as text so they decode as strings.
fn select_column_list(table: &TableSpec, alias: &str) -> Vec<String> {
    table
        .columns
        .iter()
        .map(|c| {
            let q = quoted(&c.name);
            let pg_type = c.pg_type.as_deref().unwrap_or("");
            if pg_type.contains('.') || pg_type == "numeric" {
                format!("{}.{}::text AS {}", alias, q, q)
            } else {
                format!("{}.{}", alias, q)
            }
        })
        .collect()
}

fn filter_clause(q: &mut QueryBuf, table: &TableSpec, alias: &str, filter: &Filter) -> Result<String, StoreError> {
    let col = table
        .find_column(&filter.field)
        .ok_or_else(|| StoreError::UnknownColumn(filter.field.clone()))?;
    let ph = q.placeholder(PgBindValue::text(&filter.value), col.pg_type.as_deref());
    Ok(format!("{}.{} = {}", alias, quoted(&col.name), ph))
}

fn order_clause(table: &TableSpec, alias: &str, order: Option<&Order>) -> Result<String, StoreError> {
    match order {
        Some(o) => {
            let col = table
                .find_column(&o.field)
                .ok_or_else(|| StoreError::UnknownColumn(o.field.clone()))?;
            let dir = if o.descending { "DESC" } else { "ASC" };
            Ok(format!(" ORDER BY {}.{} {}", alias, quoted(&col.name), dir))
        }
        None => Ok(format!(" ORDER BY {}.{}", alias, quoted(&table.primary_key))),
    }
}

fn page_clause(page: Option<&Page>) -> String {
    match page {
        Some(p) if p.offset > 0 => format!(" LIMIT {} OFFSET {}", p.limit, p.offset),
        Some(p) => format!(" LIMIT {}", p.limit),
        None => String::new(),
    }
}

/// Columns of `table` at `alias` followed by one subquery per preload in `plan`.
fn select_parts(q: &mut QueryBuf, table: &TableSpec, alias: &str, plan: &ReadPlan) -> Result<Vec<String>, StoreError> {
    let mut parts = select_column_list(table, alias);
    for (name, child) in &plan.preloads {
        let relation = table
            .find_relation(name)
            .ok_or_else(|| StoreError::UnknownRelation(format!("{}.{}", table.name, name)))?;
        let sub = preload_subquery(q, relation, alias, child)?;
        parts.push(format!("{} AS {}", sub, quoted(relation.output_key())));
    }
    Ok(parts)
}

fn preload_subquery(
    q: &mut QueryBuf,
    relation: &RelationSpec,
    parent_alias: &str,
    plan: &ReadPlan,
) -> Result<String, StoreError> {
    let rel = &relation.table;
    let alias = q.next_alias();
    let parts = select_parts(q, rel, &alias, plan)?;

    let mut where_parts = vec![format!(
        "{}.{} = {}.{}",
        alias,
        quoted(&relation.their_key),
        parent_alias,
        quoted(&relation.our_key)
    )];
    if let Some(f) = &plan.filter {
        where_parts.push(filter_clause(q, rel, &alias, f)?);
    }
    let order = order_clause(rel, &alias, plan.order.as_ref())?;
    let inner = format!(
        "SELECT {} FROM {} {} WHERE {}{}",
        parts.join(", "),
        qualified_table(&rel.schema, &rel.name),
        alias,
        where_parts.join(" AND "),
        order,
    );
    let sub = format!("s{}", &alias[1..]);
    Ok(match relation.direction {
        IncludeDirection::ToOne => format!(
            "(SELECT row_to_json({sub}) FROM ({inner} LIMIT 1) {sub})",
            sub = sub,
            inner = inner
        ),
        IncludeDirection::ToMany => format!(
            "(SELECT COALESCE(json_agg(row_to_json({sub})), '[]'::json) FROM ({inner}{page}) {sub})",
            sub = sub,
            inner = inner,
            page = page_clause(plan.page.as_ref())
        ),
    })
}

/// SELECT list honoring filter, order (default: primary key), page and preloads.
pub fn select_many(table: &TableSpec, plan: &ReadPlan) -> Result<QueryBuf, StoreError> {
    let mut q = QueryBuf::new();
    let alias = q.next_alias();
    let parts = select_parts(&mut q, table, &alias, plan)?;
    let where_clause = match &plan.filter {
        Some(f) => format!(" WHERE {}", filter_clause(&mut q, table, &alias, f)?),
        None => String::new(),
    };
    let order = order_clause(table, &alias, plan.order.as_ref())?;
    q.sql = format!(
        "SELECT {} FROM {} {}{}{}{}",
        parts.join(", "),
        qualified_table(&table.schema, &table.name),
        alias,
        where_clause,
        order,
        page_clause(plan.page.as_ref())
    );
    Ok(q)
}

/// SELECT one row by primary key with preloads. Root page/order/filter are not applied.
pub fn select_by_id(table: &TableSpec, id: &str, plan: &ReadPlan) -> Result<QueryBuf, StoreError> {
    let mut q = QueryBuf::new();
    let id_ph = q.placeholder(PgBindValue::text(id), table.pg_type_of(&table.primary_key));
    let alias = q.next_alias();
    let parts = select_parts(&mut q, table, &alias, plan)?;
    q.sql = format!(
        "SELECT {} FROM {} {} WHERE {}.{} = {}",
        parts.join(", "),
        qualified_table(&table.schema, &table.name),
        alias,
        alias,
        quoted(&table.primary_key),
        id_ph
    );
    Ok(q)
}

/// SELECT COUNT(*) with only the filter applied.
pub fn count(table: &TableSpec, filter: Option<&Filter>) -> Result<QueryBuf, StoreError> {
    let mut q = QueryBuf::new();
    let alias = q.next_alias();
    let where_clause = match filter {
        Some(f) => format!(" WHERE {}", filter_clause(&mut q, table, &alias, f)?),
        None => String::new(),
    };
    q.sql = format!(
        "SELECT COUNT(*) FROM {} {}{}",
        qualified_table(&table.schema, &table.name),
        alias,
        where_clause
    );
    Ok(q)
}

/// SELECT COUNT(*) of rows related to one parent (identified by its join key value).
pub fn count_related(
    relation: &RelationSpec,
    parent_key: PgBindValue,
    filter: Option<&Filter>,
) -> Result<QueryBuf, StoreError> {
    let rel = &relation.table;
    let mut q = QueryBuf::new();
    let alias = q.next_alias();
    let key_ph = q.placeholder(parent_key, rel.pg_type_of(&relation.their_key));
    let mut where_parts = vec![format!("{}.{} = {}", alias, quoted(&relation.their_key), key_ph)];
    if let Some(f) = filter {
        where_parts.push(filter_clause(&mut q, rel, &alias, f)?);
    }
    q.sql = format!(
        "SELECT COUNT(*) FROM {} {} WHERE {}",
        qualified_table(&rel.schema, &rel.name),
        alias,
        where_parts.join(" AND ")
    );
    Ok(q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Preload, QueryOption};
    use crate::store::ColumnSpec;

    fn products() -> TableSpec {
        TableSpec::new("shop", "products", "id")
            .column(ColumnSpec::typed("id", "bigint"))
            .column(ColumnSpec::new("title"))
            .column(ColumnSpec::typed("price", "numeric"))
    }

    fn orders() -> TableSpec {
        TableSpec::new("shop", "orders", "id")
            .column(ColumnSpec::typed("id", "bigint"))
            .column(ColumnSpec::typed("user_id", "bigint"))
            .column(ColumnSpec::typed("product_id", "bigint"))
            .column(ColumnSpec::new("status"))
            .relation(RelationSpec {
                field: "Product".into(),
                key: Some("product".into()),
                direction: IncludeDirection::ToOne,
                table: products(),
                our_key: "product_id".into(),
                their_key: "id".into(),
            })
    }

    fn users() -> TableSpec {
        TableSpec::new("shop", "users", "id")
            .column(ColumnSpec::typed("id", "bigint"))
            .column(ColumnSpec::new("name"))
            .relation(RelationSpec {
                field: "Orders".into(),
                key: Some("orders".into()),
                direction: IncludeDirection::ToMany,
                table: orders(),
                our_key: "id".into(),
                their_key: "user_id".into(),
            })
    }

    #[test]
    fn plain_list_orders_by_primary_key() {
        let q = select_many(&users(), &ReadPlan::default()).unwrap();
        assert_eq!(
            q.sql,
            "SELECT t0.\"id\", t0.\"name\" FROM \"shop\".\"users\" t0 ORDER BY t0.\"id\""
        );
        assert!(q.params.is_empty());
    }

    #[test]
    fn list_with_filter_order_and_page() {
        let plan = ReadPlan::from_options(&[
            QueryOption::page(10, 20),
            QueryOption::order_by("Name", true),
            QueryOption::filter_by("name", "John"),
        ]);
        let q = select_many(&users(), &plan).unwrap();
        assert_eq!(
            q.sql,
            "SELECT t0.\"id\", t0.\"name\" FROM \"shop\".\"users\" t0 WHERE t0.\"name\" = $1 ORDER BY t0.\"name\" DESC LIMIT 10 OFFSET 20"
        );
        assert_eq!(q.params, vec![PgBindValue::text("John")]);
    }

    #[test]
    fn filter_value_is_cast_to_column_type() {
        let plan = ReadPlan::from_options(&[QueryOption::filter_by("id", "7")]);
        let q = select_many(&users(), &plan).unwrap();
        assert!(q.sql.contains("WHERE t0.\"id\" = $1::bigint"), "{}", q.sql);
    }

    #[test]
    fn unknown_columns_and_relations_are_rejected() {
        let plan = ReadPlan::from_options(&[QueryOption::order_by("password; DROP", false)]);
        assert!(matches!(select_many(&users(), &plan), Err(StoreError::UnknownColumn(_))));

        let plan = ReadPlan::from_options(&[QueryOption::preload("Friends")]);
        assert!(matches!(select_many(&users(), &plan), Err(StoreError::UnknownRelation(_))));

        let plan = ReadPlan::from_options(&[QueryOption::preload("Orders.Coupon")]);
        assert!(matches!(select_many(&users(), &plan), Err(StoreError::UnknownRelation(_))));
    }

    #[test]
    fn nested_preload_renders_correlated_subqueries() {
        let plan = ReadPlan::from_options(&[QueryOption::preload("Orders.Product")]);
        let q = select_many(&users(), &plan).unwrap();
        assert!(q.sql.contains("COALESCE(json_agg(row_to_json(s1)), '[]'::json)"), "{}", q.sql);
        assert!(q.sql.contains("WHERE t1.\"user_id\" = t0.\"id\""), "{}", q.sql);
        assert!(q.sql.contains("(SELECT row_to_json(s2) FROM (SELECT t2.\"id\", t2.\"title\", t2.\"price\"::text AS \"price\" FROM \"shop\".\"products\" t2 WHERE t2.\"id\" = t1.\"product_id\" ORDER BY t2.\"id\" LIMIT 1) s2) AS \"product\""), "{}", q.sql);
        assert!(q.sql.ends_with("AS \"orders\" FROM \"shop\".\"users\" t0 ORDER BY t0.\"id\""), "{}", q.sql);
    }

    #[test]
    fn select_by_id_ignores_root_page_and_scopes_association() {
        let options = vec![QueryOption::Preload(Preload::scoped(
            "orders",
            vec![QueryOption::page(5, 0), QueryOption::filter_by("status", "open")],
        ))];
        let q = select_by_id(&users(), "42", &ReadPlan::from_options(&options)).unwrap();
        assert_eq!(q.params, vec![PgBindValue::text("42"), PgBindValue::text("open")]);
        assert!(q.sql.contains("t1.\"status\" = $2 ORDER BY t1.\"id\" LIMIT 5) s1)"), "{}", q.sql);
        assert!(q.sql.ends_with("WHERE t0.\"id\" = $1::bigint"), "{}", q.sql);
    }

    #[test]
    fn count_applies_only_filter() {
        let f = Filter {
            field: "name".into(),
            value: "John".into(),
        };
        let q = count(&users(), Some(&f)).unwrap();
        assert_eq!(q.sql, "SELECT COUNT(*) FROM \"shop\".\"users\" t0 WHERE t0.\"name\" = $1");
        let q = count(&users(), None).unwrap();
        assert_eq!(q.sql, "SELECT COUNT(*) FROM \"shop\".\"users\" t0");
    }

    #[test]
    fn count_related_scopes_to_parent() {
        let spec = users();
        let rel = spec.find_relation("Orders").unwrap();
        let f = Filter {
            field: "status".into(),
            value: "open".into(),
        };
        let q = count_related(rel, PgBindValue::I64(42), Some(&f)).unwrap();
        assert_eq!(
            q.sql,
            "SELECT COUNT(*) FROM \"shop\".\"orders\" t0 WHERE t0.\"user_id\" = $1::bigint AND t0.\"status\" = $2"
        );
        assert_eq!(q.params, vec![PgBindValue::I64(42), PgBindValue::text("open")]);
    }
}
