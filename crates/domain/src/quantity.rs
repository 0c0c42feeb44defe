use serde::{Serialize, Serializer};

use crate::units::Unit;

/// Raw value of a recorded sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuantityValue {
    Integer(i64),
    Float(f64),
}

impl QuantityValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            QuantityValue::Integer(v) => Some(*v),
            QuantityValue::Float(_) => None,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            QuantityValue::Integer(v) => *v as f64,
            QuantityValue::Float(v) => *v,
        }
    }
}

impl From<i64> for QuantityValue {
    fn from(value: i64) -> Self {
        QuantityValue::Integer(value)
    }
}

impl From<f64> for QuantityValue {
    fn from(value: f64) -> Self {
        QuantityValue::Float(value)
    }
}

impl Serialize for QuantityValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            QuantityValue::Integer(v) => serializer.serialize_i64(*v),
            QuantityValue::Float(v) => serializer.serialize_f64(*v),
        }
    }
}

impl std::fmt::Display for QuantityValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuantityValue::Integer(v) => write!(f, "{v}"),
            QuantityValue::Float(v) => write!(f, "{v}"),
        }
    }
}

/// A single immutable sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quantity {
    value: QuantityValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    unit: Option<Unit>,
}

impl Quantity {
    pub fn new(value: impl Into<QuantityValue>, unit: Option<Unit>) -> Self {
        Self {
            value: value.into(),
            unit,
        }
    }

    pub fn integer(value: i64) -> Self {
        Self::new(value, None)
    }

    pub fn float(value: f64) -> Self {
        Self::new(value, None)
    }

    pub fn value(&self) -> QuantityValue {
        self.value
    }

    pub fn unit(&self) -> Option<&Unit> {
        self.unit.as_ref()
    }

    pub fn unit_name(&self) -> Option<String> {
        self.unit.as_ref().map(Unit::name)
    }
}
