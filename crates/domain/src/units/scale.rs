use serde::{Deserialize, Serialize};

/// Multiplier prefix applied to a base unit's name.
///
/// Scales only affect naming; no numeric conversion is performed between
/// differently scaled units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    Yocto,
    Zepto,
    Atto,
    Femto,
    Pico,
    Nano,
    Micro,
    Milli,
    Centi,
    Deci,
    Deca,
    Hecto,
    Kilo,
    Mega,
    Giga,
    Tera,
    Peta,
    Exa,
    Zetta,
    Yotta,
    Kibi,
    Mebi,
    Gibi,
    Tebi,
    Pebi,
    Exbi,
    Zebi,
    Yobi,
}

impl Scale {
    pub const ALL: [Scale; 28] = [
        Scale::Yocto,
        Scale::Zepto,
        Scale::Atto,
        Scale::Femto,
        Scale::Pico,
        Scale::Nano,
        Scale::Micro,
        Scale::Milli,
        Scale::Centi,
        Scale::Deci,
        Scale::Deca,
        Scale::Hecto,
        Scale::Kilo,
        Scale::Mega,
        Scale::Giga,
        Scale::Tera,
        Scale::Peta,
        Scale::Exa,
        Scale::Zetta,
        Scale::Yotta,
        Scale::Kibi,
        Scale::Mebi,
        Scale::Gibi,
        Scale::Tebi,
        Scale::Pebi,
        Scale::Exbi,
        Scale::Zebi,
        Scale::Yobi,
    ];

    /// Canonical prefix, e.g. `"milli"`.
    pub const fn name(&self) -> &'static str {
        match self {
            Scale::Yocto => "yocto",
            Scale::Zepto => "zepto",
            Scale::Atto => "atto",
            Scale::Femto => "femto",
            Scale::Pico => "pico",
            Scale::Nano => "nano",
            Scale::Micro => "micro",
            Scale::Milli => "milli",
            Scale::Centi => "centi",
            Scale::Deci => "deci",
            Scale::Deca => "deca",
            Scale::Hecto => "hecto",
            Scale::Kilo => "kilo",
            Scale::Mega => "mega",
            Scale::Giga => "giga",
            Scale::Tera => "tera",
            Scale::Peta => "peta",
            Scale::Exa => "exa",
            Scale::Zetta => "zetta",
            Scale::Yotta => "yotta",
            Scale::Kibi => "kibi",
            Scale::Mebi => "mebi",
            Scale::Gibi => "gibi",
            Scale::Tebi => "tebi",
            Scale::Pebi => "pebi",
            Scale::Exbi => "exbi",
            Scale::Zebi => "zebi",
            Scale::Yobi => "yobi",
        }
    }

    /// Binary (IEC) prefixes as opposed to decimal SI prefixes.
    pub const fn is_binary(&self) -> bool {
        matches!(
            self,
            Scale::Kibi
                | Scale::Mebi
                | Scale::Gibi
                | Scale::Tebi
                | Scale::Pebi
                | Scale::Exbi
                | Scale::Zebi
                | Scale::Yobi
        )
    }
}

impl std::fmt::Display for Scale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Scale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scale::ALL
            .iter()
            .copied()
            .find(|scale| scale.name() == s)
            .ok_or_else(|| format!("Unknown scale: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<&str> = Scale::ALL.iter().map(|s| s.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Scale::ALL.len());
    }

    #[test]
    fn test_parse_scale() {
        assert_eq!("milli".parse::<Scale>().unwrap(), Scale::Milli);
        assert_eq!("gibi".parse::<Scale>().unwrap(), Scale::Gibi);
        assert!("kilobyte".parse::<Scale>().is_err());
    }

    #[test]
    fn test_binary_prefixes() {
        assert!(Scale::Kibi.is_binary());
        assert!(Scale::Yobi.is_binary());
        assert!(!Scale::Kilo.is_binary());
        assert!(!Scale::Yotta.is_binary());
    }
}
