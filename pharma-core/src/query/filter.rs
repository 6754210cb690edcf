use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};

/// Persisted order columns that callers may filter and sort on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderColumn {
    Id,
    CustomerId,
    Status,
    PrescriptionUrl,
    Subtotal,
    ShippingCost,
    CreatedAt,
    UpdatedAt,
}

/// Storage type of a column; filter values are parsed into it up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Uuid,
    Text,
    Money,
    Timestamp,
}

impl OrderColumn {
    pub const ALL: [OrderColumn; 8] = [
        OrderColumn::Id,
        OrderColumn::CustomerId,
        OrderColumn::Status,
        OrderColumn::PrescriptionUrl,
        OrderColumn::Subtotal,
        OrderColumn::ShippingCost,
        OrderColumn::CreatedAt,
        OrderColumn::UpdatedAt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderColumn::Id => "id",
            OrderColumn::CustomerId => "customer_id",
            OrderColumn::Status => "status",
            OrderColumn::PrescriptionUrl => "prescription_url",
            OrderColumn::Subtotal => "subtotal",
            OrderColumn::ShippingCost => "shipping_cost",
            OrderColumn::CreatedAt => "created_at",
            OrderColumn::UpdatedAt => "updated_at",
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            OrderColumn::Id | OrderColumn::CustomerId => ColumnKind::Uuid,
            OrderColumn::Status | OrderColumn::PrescriptionUrl => ColumnKind::Text,
            OrderColumn::Subtotal | OrderColumn::ShippingCost => ColumnKind::Money,
            OrderColumn::CreatedAt | OrderColumn::UpdatedAt => ColumnKind::Timestamp,
        }
    }

    /// Look a column up in the allow-list; `purpose` only shapes the message.
    pub fn parse(name: &str, purpose: &str) -> CoreResult<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|column| column.as_str() == name)
            .ok_or_else(|| CoreError::BadRequest(format!("invalid {} column: {}", purpose, name)))
    }

    pub fn parse_value(&self, raw: &str) -> CoreResult<FilterValue> {
        let raw = raw.trim();
        let invalid = || CoreError::BadRequest(format!("invalid value '{}' for column {}", raw, self.as_str()));

        match self.kind() {
            ColumnKind::Uuid => Uuid::parse_str(raw).map(FilterValue::Uuid).map_err(|_| invalid()),
            // `shipping` is stored as `shipped`
            ColumnKind::Text if *self == OrderColumn::Status && raw.eq_ignore_ascii_case("shipping") => {
                Ok(FilterValue::Text("shipped".to_string()))
            }
            ColumnKind::Text => Ok(FilterValue::Text(raw.to_string())),
            ColumnKind::Money => Decimal::from_str(raw).map(FilterValue::Money).map_err(|_| invalid()),
            ColumnKind::Timestamp => DateTime::parse_from_rfc3339(raw)
                .map(|ts| FilterValue::Timestamp(ts.with_timezone(&Utc)))
                .map_err(|_| invalid()),
        }
    }
}

/// A filter operand, typed to match its column.
#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub enum FilterValue {
    Uuid(Uuid),
    Text(String),
    Money(Decimal),
    Timestamp(DateTime<Utc>),
}

impl FilterValue {
    /// Text form, as `col::text` renders it.
    pub fn to_text(&self) -> String {
        match self {
            FilterValue::Uuid(id) => id.to_string(),
            FilterValue::Text(s) => s.clone(),
            FilterValue::Money(d) => d.to_string(),
            FilterValue::Timestamp(ts) => ts.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    ILike,
    In,
    Null,
    NotNull,
}

impl FilterOperator {
    pub const ALL: [FilterOperator; 11] = [
        FilterOperator::Eq,
        FilterOperator::Neq,
        FilterOperator::Gt,
        FilterOperator::Gte,
        FilterOperator::Lt,
        FilterOperator::Lte,
        FilterOperator::Like,
        FilterOperator::ILike,
        FilterOperator::In,
        FilterOperator::Null,
        FilterOperator::NotNull,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "eq",
            FilterOperator::Neq => "neq",
            FilterOperator::Gt => "gt",
            FilterOperator::Gte => "gte",
            FilterOperator::Lt => "lt",
            FilterOperator::Lte => "lte",
            FilterOperator::Like => "like",
            FilterOperator::ILike => "ilike",
            FilterOperator::In => "in",
            FilterOperator::Null => "null",
            FilterOperator::NotNull => "notnull",
        }
    }

    pub fn parse(name: &str) -> CoreResult<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == name)
            .ok_or_else(|| CoreError::BadRequest(format!("invalid filter operator: {}", name)))
    }

    fn comparison(&self) -> Option<Comparison> {
        match self {
            FilterOperator::Eq => Some(Comparison::Eq),
            FilterOperator::Neq => Some(Comparison::Neq),
            FilterOperator::Gt => Some(Comparison::Gt),
            FilterOperator::Gte => Some(Comparison::Gte),
            FilterOperator::Lt => Some(Comparison::Lt),
            FilterOperator::Lte => Some(Comparison::Lte),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Comparison {
    pub fn sql(&self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Neq => "!=",
            Comparison::Gt => ">",
            Comparison::Gte => ">=",
            Comparison::Lt => "<",
            Comparison::Lte => "<=",
        }
    }
}

/// Untrusted `(column, operator, value)` triple as it arrives from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFilter {
    pub column: String,
    pub operator: String,
    pub value: String,
}

impl RawFilter {
    pub fn new(column: impl Into<String>, operator: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.column.trim().is_empty() && self.operator.trim().is_empty()
    }
}

/// A validated predicate. Column names come from the allow-list and
/// every operand is a typed value, never raw caller text.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Compare {
        column: OrderColumn,
        op: Comparison,
        value: FilterValue,
    },
    Like {
        column: OrderColumn,
        pattern: String,
        case_insensitive: bool,
    },
    In {
        column: OrderColumn,
        values: Vec<FilterValue>,
    },
    IsNull(OrderColumn),
    IsNotNull(OrderColumn),
}

impl Predicate {
    pub fn from_raw(raw: &RawFilter) -> CoreResult<Self> {
        let column = OrderColumn::parse(&raw.column, "filter")?;
        let operator = FilterOperator::parse(&raw.operator)?;

        let needs_value = !matches!(operator, FilterOperator::Null | FilterOperator::NotNull);
        if needs_value && raw.value.trim().is_empty() {
            return Err(CoreError::BadRequest(format!(
                "filter operator {} requires a value",
                operator.as_str()
            )));
        }

        let predicate = match operator {
            FilterOperator::Like | FilterOperator::ILike => Predicate::Like {
                column,
                pattern: format!("%{}%", raw.value.trim()),
                case_insensitive: operator == FilterOperator::ILike,
            },
            FilterOperator::In => {
                let values = raw
                    .value
                    .split(',')
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(|v| column.parse_value(v))
                    .collect::<CoreResult<Vec<_>>>()?;
                Predicate::In { column, values }
            }
            FilterOperator::Null => Predicate::IsNull(column),
            FilterOperator::NotNull => Predicate::IsNotNull(column),
            other => {
                // every remaining operator is a comparison
                let op = other
                    .comparison()
                    .ok_or_else(|| CoreError::BadRequest(format!("invalid filter operator: {}", other.as_str())))?;
                Predicate::Compare {
                    column,
                    op,
                    value: column.parse_value(&raw.value)?,
                }
            }
        };

        Ok(predicate)
    }

    pub fn column(&self) -> OrderColumn {
        match self {
            Predicate::Compare { column, .. }
            | Predicate::Like { column, .. }
            | Predicate::In { column, .. } => *column,
            Predicate::IsNull(column) | Predicate::IsNotNull(column) => *column,
        }
    }
}
