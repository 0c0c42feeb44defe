//! Well-known units.

use super::scale::Scale;
use super::unit::{BaseUnit, Unit};

// Time
pub const NANOSECOND: Unit = Unit::Base(BaseUnit::scaled_static("second", Scale::Nano));
pub const MICROSECOND: Unit = Unit::Base(BaseUnit::scaled_static("second", Scale::Micro));
pub const MILLISECOND: Unit = Unit::Base(BaseUnit::scaled_static("second", Scale::Milli));
pub const SECOND: Unit = Unit::Base(BaseUnit::new_static("second"));
pub const MINUTE: Unit = Unit::Base(BaseUnit::new_static("minute"));
pub const HOUR: Unit = Unit::Base(BaseUnit::new_static("hour"));
pub const DAY: Unit = Unit::Base(BaseUnit::new_static("day"));
pub const WEEK: Unit = Unit::Base(BaseUnit::new_static("week"));

// Data size
pub const BIT: Unit = Unit::Base(BaseUnit::new_static("bit"));
pub const BYTE: Unit = Unit::Base(BaseUnit::new_static("byte"));
pub const KILOBYTE: Unit = Unit::Base(BaseUnit::scaled_static("byte", Scale::Kilo));
pub const MEGABYTE: Unit = Unit::Base(BaseUnit::scaled_static("byte", Scale::Mega));
pub const GIGABYTE: Unit = Unit::Base(BaseUnit::scaled_static("byte", Scale::Giga));
pub const TERABYTE: Unit = Unit::Base(BaseUnit::scaled_static("byte", Scale::Tera));
pub const KIBIBYTE: Unit = Unit::Base(BaseUnit::scaled_static("byte", Scale::Kibi));
pub const MEBIBYTE: Unit = Unit::Base(BaseUnit::scaled_static("byte", Scale::Mebi));
pub const GIBIBYTE: Unit = Unit::Base(BaseUnit::scaled_static("byte", Scale::Gibi));
pub const TEBIBYTE: Unit = Unit::Base(BaseUnit::scaled_static("byte", Scale::Tebi));
pub const KILOBIT: Unit = Unit::Base(BaseUnit::scaled_static("bit", Scale::Kilo));
pub const MEGABIT: Unit = Unit::Base(BaseUnit::scaled_static("bit", Scale::Mega));

// Temperature
pub const KELVIN: Unit = Unit::Base(BaseUnit::new_static("kelvin"));
pub const CELSIUS: Unit = Unit::Base(BaseUnit::new_static("celsius"));
pub const FAHRENHEIT: Unit = Unit::Base(BaseUnit::new_static("fahrenheit"));

// Dimensionless
pub const PERCENT: Unit = Unit::Base(BaseUnit::new_static("percent"));

// Frequency
pub const HERTZ: Unit = Unit::Base(BaseUnit::new_static("hertz"));

pub fn bytes_per_second() -> Option<Unit> {
    BYTE.per(SECOND)
}
