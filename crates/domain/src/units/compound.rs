use std::collections::BTreeMap;
use std::fmt;

use super::unit::{BaseUnit, Unit};

/// Ratio of base units, always held in reduced form.
///
/// Members on each side are ordered by name so that equivalent inputs
/// produce equal units regardless of argument order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompoundUnit {
    numerator: Vec<BaseUnit>,
    denominator: Vec<BaseUnit>,
}

impl CompoundUnit {
    pub fn numerator(&self) -> &[BaseUnit] {
        &self.numerator
    }

    pub fn denominator(&self) -> &[BaseUnit] {
        &self.denominator
    }

    /// Flatten, cancel, materialize and collapse.
    pub(crate) fn reduce(numerator: &[Unit], denominator: &[Unit]) -> Option<Unit> {
        let mut upper = UnitCounts::default();
        let mut lower = UnitCounts::default();

        flatten(numerator, &mut upper, &mut lower);
        flatten(denominator, &mut lower, &mut upper);

        cancel(&mut upper, &mut lower);

        let numerator = upper.materialize();
        let denominator = lower.materialize();

        match (numerator.len(), denominator.len()) {
            (0, 0) => None,
            (1, 0) => numerator.into_iter().next().map(Unit::Base),
            _ => Some(Unit::Compound(CompoundUnit {
                numerator,
                denominator,
            })),
        }
    }
}

impl fmt::Display for CompoundUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.numerator.is_empty() {
            f.write_str("1")?;
        } else {
            let parenthesize = self.numerator.len() > 1 && !self.denominator.is_empty();
            write_group(f, &self.numerator, parenthesize)?;
        }

        if !self.denominator.is_empty() {
            f.write_str("/")?;
            write_group(f, &self.denominator, self.denominator.len() > 1)?;
        }

        Ok(())
    }
}

fn write_group(f: &mut fmt::Formatter<'_>, units: &[BaseUnit], parenthesize: bool) -> fmt::Result {
    if parenthesize {
        f.write_str("(")?;
    }
    for (i, unit) in units.iter().enumerate() {
        if i > 0 {
            f.write_str("*")?;
        }
        write!(f, "{unit}")?;
    }
    if parenthesize {
        f.write_str(")")?;
    }
    Ok(())
}

/// Multiset of base units keyed by full unit name.
#[derive(Debug, Default)]
struct UnitCounts {
    entries: BTreeMap<String, (BaseUnit, usize)>,
}

impl UnitCounts {
    fn add(&mut self, unit: &BaseUnit) {
        self.entries
            .entry(unit.name())
            .or_insert_with(|| (unit.clone(), 0))
            .1 += 1;
    }

    fn count(&self, name: &str) -> usize {
        self.entries.get(name).map_or(0, |(_, count)| *count)
    }

    fn set_count(&mut self, name: &str, count: usize) {
        if count == 0 {
            self.entries.remove(name);
        } else if let Some(entry) = self.entries.get_mut(name) {
            entry.1 = count;
        }
    }

    fn materialize(self) -> Vec<BaseUnit> {
        self.entries
            .into_values()
            .flat_map(|(unit, count)| std::iter::repeat(unit).take(count))
            .collect()
    }
}

/// Adds `units` to `same`; a nested compound contributes its numerator to
/// `same` and its denominator to `opposite`.
fn flatten(units: &[Unit], same: &mut UnitCounts, opposite: &mut UnitCounts) {
    for unit in units {
        match unit {
            Unit::Base(base) => same.add(base),
            Unit::Compound(compound) => {
                compound.numerator.iter().for_each(|u| same.add(u));
                compound.denominator.iter().for_each(|u| opposite.add(u));
            }
        }
    }
}

fn cancel(upper: &mut UnitCounts, lower: &mut UnitCounts) {
    let shared: Vec<String> = upper
        .entries
        .keys()
        .filter(|name| lower.entries.contains_key(*name))
        .cloned()
        .collect();

    for name in shared {
        let up = upper.count(&name);
        let down = lower.count(&name);
        let common = up.min(down);
        upper.set_count(&name, up - common);
        lower.set_count(&name, down - common);
    }
}
