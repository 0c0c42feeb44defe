use std::borrow::Cow;
use std::fmt;

use serde::{Serialize, Serializer};

use super::compound::CompoundUnit;
use super::scale::Scale;

/// A named unit with an optional scale prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BaseUnit {
    name: Cow<'static, str>,
    scale: Option<Scale>,
}

impl BaseUnit {
    pub const fn new_static(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            scale: None,
        }
    }

    pub const fn scaled_static(name: &'static str, scale: Scale) -> Self {
        Self {
            name: Cow::Borrowed(name),
            scale: Some(scale),
        }
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            scale: None,
        }
    }

    pub fn with_scale(mut self, scale: Scale) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Full name with the scale prefix, e.g. `"millisecond"`.
    pub fn name(&self) -> String {
        match self.scale {
            Some(scale) => format!("{}{}", scale.name(), self.name),
            None => self.name.to_string(),
        }
    }

    pub fn base_name(&self) -> &str {
        &self.name
    }

    pub fn scale(&self) -> Option<Scale> {
        self.scale
    }
}

impl fmt::Display for BaseUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scale) = self.scale {
            f.write_str(scale.name())?;
        }
        f.write_str(&self.name)
    }
}

/// Unit of measure attached to a recorded quantity.
///
/// A `Compound` value is always fully reduced; the only way to build one is
/// through [`Unit::compound`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Unit {
    Base(BaseUnit),
    Compound(CompoundUnit),
}

impl Unit {
    pub fn name(&self) -> String {
        self.to_string()
    }

    /// Builds the canonical unit for `numerator / denominator`.
    ///
    /// Returns `None` when every member cancels out.
    pub fn compound<N, D>(numerator: N, denominator: D) -> Option<Unit>
    where
        N: IntoIterator<Item = Unit>,
        D: IntoIterator<Item = Unit>,
    {
        let numerator: Vec<Unit> = numerator.into_iter().collect();
        let denominator: Vec<Unit> = denominator.into_iter().collect();
        CompoundUnit::reduce(&numerator, &denominator)
    }

    /// `self / other`, e.g. byte per second.
    pub fn per(self, other: Unit) -> Option<Unit> {
        Unit::compound([self], [other])
    }

    pub fn product<I>(units: I) -> Option<Unit>
    where
        I: IntoIterator<Item = Unit>,
    {
        Unit::compound(units, std::iter::empty())
    }

    pub fn as_base(&self) -> Option<&BaseUnit> {
        match self {
            Unit::Base(base) => Some(base),
            Unit::Compound(_) => None,
        }
    }

    pub fn as_compound(&self) -> Option<&CompoundUnit> {
        match self {
            Unit::Base(_) => None,
            Unit::Compound(compound) => Some(compound),
        }
    }
}

impl From<BaseUnit> for Unit {
    fn from(base: BaseUnit) -> Self {
        Unit::Base(base)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Base(base) => base.fmt(f),
            Unit::Compound(compound) => compound.fmt(f),
        }
    }
}

impl Serialize for Unit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_unit_name_includes_scale() {
        let unit = BaseUnit::new("second").with_scale(Scale::Milli);
        assert_eq!(unit.name(), "millisecond");
        assert_eq!(unit.base_name(), "second");
        assert_eq!(unit.scale(), Some(Scale::Milli));
    }

    #[test]
    fn test_base_unit_without_scale() {
        let unit = BaseUnit::new("byte");
        assert_eq!(unit.name(), "byte");
        assert_eq!(unit.to_string(), "byte");
        assert!(unit.scale().is_none());
    }

    #[test]
    fn test_static_and_owned_units_are_equal() {
        let a = BaseUnit::scaled_static("second", Scale::Nano);
        let b = BaseUnit::new("second").with_scale(Scale::Nano);
        assert_eq!(a, b);
    }

    #[test]
    fn test_unit_serializes_as_name() {
        let unit = Unit::from(BaseUnit::new("byte").with_scale(Scale::Kibi));
        assert_eq!(serde_json::to_string(&unit).unwrap(), "\"kibibyte\"");
    }
}
