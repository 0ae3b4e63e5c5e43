use crate::catalog::{
    FuelType, Make, MakeModel, MakeModelYear, MakeYear, ReferenceData, SizeClass, Variant,
};
use crate::{CarbonateError, CarbonateResult, TimeRange};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A resolved quantity or a caller-supplied fact
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Number(Decimal),
    Boolean(bool),
    Date(NaiveDate),
    Text(String),
    Range(TimeRange),
    Entity(Entity),
}

/// Handle to a lookup-table record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "table", rename_all = "snake_case")]
pub enum Entity {
    Make(Arc<Make>),
    MakeYear(Arc<MakeYear>),
    MakeModel(Arc<MakeModel>),
    MakeModelYear(Arc<MakeModelYear>),
    Variant(Arc<Variant>),
    FuelType(Arc<FuelType>),
    SizeClass(Arc<SizeClass>),
}

/// The kind of a value, used to declare external inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Number,
    Boolean,
    Date,
    Text,
    Range,
    Make,
    MakeYear,
    MakeModel,
    MakeModelYear,
    Variant,
    FuelType,
    SizeClass,
}

impl ValueKind {
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Number => "number",
            ValueKind::Boolean => "boolean",
            ValueKind::Date => "date",
            ValueKind::Text => "text",
            ValueKind::Range => "range",
            ValueKind::Make => "make",
            ValueKind::MakeYear => "make_year",
            ValueKind::MakeModel => "make_model",
            ValueKind::MakeModelYear => "make_model_year",
            ValueKind::Variant => "variant",
            ValueKind::FuelType => "fuel_type",
            ValueKind::SizeClass => "size_class",
        }
    }

    /// How a value of this kind is written on the command line
    pub fn syntax(&self) -> &'static str {
        match self {
            ValueKind::Number => "decimal, e.g. 40 or 0.43",
            ValueKind::Boolean => "true or false",
            ValueKind::Date => "YYYY-MM-DD",
            ValueKind::Text => "any text",
            ValueKind::Range => "YYYY or YYYY-MM-DD..YYYY-MM-DD",
            ValueKind::Make => "make name",
            ValueKind::MakeYear => "make/year",
            ValueKind::MakeModel => "make/model",
            ValueKind::MakeModelYear => "make/model/year",
            ValueKind::Variant => "variant row hash",
            ValueKind::FuelType => "fuel type code",
            ValueKind::SizeClass => "size class name",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Value {
    pub fn number(n: impl Into<Decimal>) -> Self {
        Value::Number(n.into())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Number(_) => ValueKind::Number,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Date(_) => ValueKind::Date,
            Value::Text(_) => ValueKind::Text,
            Value::Range(_) => ValueKind::Range,
            Value::Entity(entity) => match entity {
                Entity::Make(_) => ValueKind::Make,
                Entity::MakeYear(_) => ValueKind::MakeYear,
                Entity::MakeModel(_) => ValueKind::MakeModel,
                Entity::MakeModelYear(_) => ValueKind::MakeModelYear,
                Entity::Variant(_) => ValueKind::Variant,
                Entity::FuelType(_) => ValueKind::FuelType,
                Entity::SizeClass(_) => ValueKind::SizeClass,
            },
        }
    }

    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_range(&self) -> Option<&TimeRange> {
        match self {
            Value::Range(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&Entity> {
        match self {
            Value::Entity(e) => Some(e),
            _ => None,
        }
    }

    /// Parse command-line text into a value of `kind`
    ///
    /// Entity kinds are resolved against the reference data; an unknown key
    /// is an invalid fact rather than an undefined one.
    pub fn parse(
        name: &str,
        kind: ValueKind,
        raw: &str,
        catalog: &dyn ReferenceData,
    ) -> CarbonateResult<Value> {
        let raw = raw.trim();
        let invalid = |message: String| CarbonateError::invalid_fact(name, message);
        let unknown = || invalid(format!("no {} matches '{}'", kind, raw));
        let year = |text: &str| {
            text.trim()
                .parse::<i32>()
                .map_err(|_| invalid(format!("'{}' is not a year", text.trim())))
        };

        match kind {
            ValueKind::Number => Decimal::from_str(raw)
                .map(Value::Number)
                .map_err(|_| invalid(format!("'{}' is not a number", raw))),
            ValueKind::Boolean => match raw.to_lowercase().as_str() {
                "true" | "yes" => Ok(Value::Boolean(true)),
                "false" | "no" => Ok(Value::Boolean(false)),
                _ => Err(invalid(format!("'{}' is not a boolean", raw))),
            },
            ValueKind::Date => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(Value::Date)
                .map_err(|_| invalid(format!("'{}' is not a YYYY-MM-DD date", raw))),
            ValueKind::Text => Ok(Value::Text(raw.to_string())),
            ValueKind::Range => TimeRange::from_str(raw)
                .map(Value::Range)
                .map_err(|e| invalid(e.to_string())),
            ValueKind::Make => catalog
                .make(raw)
                .map(|m| Value::Entity(Entity::Make(m)))
                .ok_or_else(unknown),
            ValueKind::MakeYear => {
                let (make, y) = raw
                    .rsplit_once('/')
                    .ok_or_else(|| invalid(format!("expected {}", kind.syntax())))?;
                catalog
                    .make_year(make, year(y)?)
                    .map(|m| Value::Entity(Entity::MakeYear(m)))
                    .ok_or_else(unknown)
            }
            ValueKind::MakeModel => {
                let (make, model) = raw
                    .split_once('/')
                    .ok_or_else(|| invalid(format!("expected {}", kind.syntax())))?;
                catalog
                    .make_model(make, model)
                    .map(|m| Value::Entity(Entity::MakeModel(m)))
                    .ok_or_else(unknown)
            }
            ValueKind::MakeModelYear => {
                let parts: Vec<&str> = raw.split('/').collect();
                let [make, model, y] = parts.as_slice() else {
                    return Err(invalid(format!("expected {}", kind.syntax())));
                };
                catalog
                    .make_model_year(make, model, year(y)?)
                    .map(|m| Value::Entity(Entity::MakeModelYear(m)))
                    .ok_or_else(unknown)
            }
            ValueKind::Variant => catalog
                .variant(raw)
                .map(|v| Value::Entity(Entity::Variant(v)))
                .ok_or_else(unknown),
            ValueKind::FuelType => catalog
                .fuel_type(raw)
                .map(|f| Value::Entity(Entity::FuelType(f)))
                .ok_or_else(unknown),
            ValueKind::SizeClass => catalog
                .size_class(raw)
                .map(|s| Value::Entity(Entity::SizeClass(s)))
                .ok_or_else(unknown),
        }
    }
}

impl From<Decimal> for Value {
    fn from(n: Decimal) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<TimeRange> for Value {
    fn from(r: TimeRange) -> Self {
        Value::Range(r)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<Entity> for Value {
    fn from(e: Entity) -> Self {
        Value::Entity(e)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n.normalize()),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Date(d) => write!(f, "{}", d),
            Value::Text(s) => write!(f, "{}", s),
            Value::Range(r) => write!(f, "{}", r),
            Value::Entity(e) => write!(f, "{}", e),
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Make(m) => write!(f, "{}", m.name),
            Entity::MakeYear(m) => write!(f, "{} {}", m.make, m.year),
            Entity::MakeModel(m) => write!(f, "{} {}", m.make, m.model),
            Entity::MakeModelYear(m) => write!(f, "{} {} {}", m.make, m.model, m.year),
            Entity::Variant(v) => write!(f, "{} {} {} ({})", v.make, v.model, v.year, v.row_hash),
            Entity::FuelType(t) => write!(f, "{}", t.name),
            Entity::SizeClass(s) => write!(f, "{}", s.name),
        }
    }
}
