//! Renders a validated `ListQuery` into parameterised PostgreSQL.
//!
//! Identifiers only ever come from `OrderColumn::as_str`; operands are
//! always bound.

use pharma_core::query::{ColumnKind, FilterValue, OrderColumn, Predicate};
use pharma_core::{ListQuery, OrderScope};
use sqlx::{Postgres, QueryBuilder};

pub const ORDER_COLUMNS: &str =
    "id, customer_id, status, prescription_url, subtotal, shipping_cost, created_at, updated_at";

pub fn select_page(query: &ListQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM orders", ORDER_COLUMNS));
    push_conditions(&mut qb, query);

    qb.push(" ORDER BY ")
        .push(query.sort.column.as_str())
        .push(" ")
        .push(query.sort.direction.as_sql());
    if query.sort.column != OrderColumn::Id {
        // stable pages when the sort key has ties
        qb.push(", id ASC");
    }

    if let Some(window) = query.window() {
        qb.push(" LIMIT ").push_bind(window.limit);
        qb.push(" OFFSET ").push_bind(window.offset);
    }
    qb
}

pub fn select_count(query: &ListQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM orders");
    push_conditions(&mut qb, query);
    qb
}

fn push_conditions(qb: &mut QueryBuilder<'static, Postgres>, query: &ListQuery) {
    let mut keyword = " WHERE ";

    if let OrderScope::Customer(customer_id) = query.scope {
        qb.push(keyword).push("customer_id = ").push_bind(customer_id);
        keyword = " AND ";
    }

    if let Some(predicate) = &query.filter {
        qb.push(keyword);
        push_predicate(qb, predicate);
    }
}

fn push_predicate(qb: &mut QueryBuilder<'static, Postgres>, predicate: &Predicate) {
    match predicate {
        Predicate::Compare { column, op, value } => {
            qb.push(column.as_str()).push(" ").push(op.sql()).push(" ");
            push_value(qb, value);
        }
        Predicate::Like {
            column,
            pattern,
            case_insensitive,
        } => {
            let op = if *case_insensitive { " ILIKE " } else { " LIKE " };
            qb.push(text_expr(*column)).push(op).push_bind(pattern.clone());
        }
        Predicate::In { column, values } => {
            if values.is_empty() {
                qb.push("FALSE");
                return;
            }
            qb.push(column.as_str()).push(" IN (");
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    qb.push(", ");
                }
                push_value(qb, value);
            }
            qb.push(")");
        }
        Predicate::IsNull(column) => {
            qb.push(column.as_str()).push(" IS NULL");
        }
        Predicate::IsNotNull(column) => {
            qb.push(column.as_str()).push(" IS NOT NULL");
        }
    }
}

fn push_value(qb: &mut QueryBuilder<'static, Postgres>, value: &FilterValue) {
    match value {
        FilterValue::Uuid(v) => qb.push_bind(*v),
        FilterValue::Text(v) => qb.push_bind(v.clone()),
        FilterValue::Money(v) => qb.push_bind(*v),
        FilterValue::Timestamp(v) => qb.push_bind(*v),
    };
}

/// Pattern matching always runs against the column's text form.
fn text_expr(column: OrderColumn) -> String {
    match column.kind() {
        ColumnKind::Text => column.as_str().to_string(),
        _ => format!("{}::text", column.as_str()),
    }
}
