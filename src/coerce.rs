//! Missing-value sentinels and coerce-or-absent field parsing.
//!
//! Every field of every reader goes through one of these functions. None of
//! them fail: a value that is a sentinel, or that cannot be read as the
//! column's type, becomes `None`.

/// Literals treated as missing by any CSV reader before reader-specific
/// sentinels are added.
const STANDARD_MISSING: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A set of raw field literals that all map to the absent value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingValues {
    literals: Vec<&'static str>,
}

impl MissingValues {
    /// The default null literals.
    pub fn standard() -> Self {
        Self {
            literals: STANDARD_MISSING.to_vec(),
        }
    }

    /// Adds reader-specific sentinels on top of the current set.
    pub fn with(mut self, extra: &[&'static str]) -> Self {
        for &lit in extra {
            if !self.literals.contains(&lit) {
                self.literals.push(lit);
            }
        }
        self
    }

    /// Matches the raw field text, untrimmed.
    pub fn is_missing(&self, raw: &str) -> bool {
        self.literals.iter().any(|lit| *lit == raw)
    }

    fn present<'a>(&self, raw: Option<&'a str>) -> Option<&'a str> {
        raw.filter(|r| !self.is_missing(r))
    }

    pub fn text(&self, raw: Option<&str>) -> Option<String> {
        self.present(raw).map(str::to_string)
    }

    pub fn float(&self, raw: Option<&str>) -> Option<f64> {
        self.present(raw).and_then(parse_float)
    }

    /// Nullable integer; a float with a fractional part is absent.
    pub fn integer(&self, raw: Option<&str>) -> Option<i64> {
        let raw = self.present(raw)?.trim();
        if let Ok(v) = raw.parse::<i64>() {
            return Some(v);
        }
        let f = parse_float(raw)?;
        if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
            Some(f as i64)
        } else {
            None
        }
    }

    /// Number written with thousands separators and/or a percent sign.
    /// Percentages keep their units: `"12.5%"` is `12.5`.
    pub fn formatted_number(&self, raw: Option<&str>) -> Option<f64> {
        let raw = self.present(raw)?;
        let cleaned: String = raw.chars().filter(|c| *c != ',' && *c != '%').collect();
        parse_float(&cleaned)
    }

    /// Currency text such as `"$1,234.50"`.
    pub fn currency(&self, raw: Option<&str>) -> Option<f64> {
        let raw = self.present(raw)?;
        let cleaned: String = raw.chars().filter(|c| *c != ',' && *c != '$').collect();
        parse_float(&cleaned)
    }

    /// `TRUE`/`FALSE`, case-sensitive. Anything else is absent.
    pub fn boolean(&self, raw: Option<&str>) -> Option<bool> {
        match self.present(raw)? {
            "TRUE" => Some(true),
            "FALSE" => Some(false),
            _ => None,
        }
    }
}

impl Default for MissingValues {
    fn default() -> Self {
        Self::standard()
    }
}

/// Parses a trimmed float. `NaN` and infinities count as absent.
pub fn parse_float(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
