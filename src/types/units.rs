//! Physical units: powers of the seven SI base dimensions plus a decimal
//! prefix, attached to per-dimension pixel sizes and to measurement values.
//!
//! Grounded on the teacher's newtype-plus-validation builder pattern
//! (`builders.rs`, e.g. `BlackLevel::new`): a small value type with a
//! constructor and a deterministic string formatter, rather than a bag of
//! loose fields.

use std::fmt;
use std::ops::{Div, Mul};

/// SI prefix, stored as the power-of-ten exponent (e.g. `-9` = nano).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SiPrefix(pub i8);

impl SiPrefix {
    pub const NONE: SiPrefix = SiPrefix(0);
    pub const KILO: SiPrefix = SiPrefix(3);
    pub const MILLI: SiPrefix = SiPrefix(-3);
    pub const MICRO: SiPrefix = SiPrefix(-6);
    pub const NANO: SiPrefix = SiPrefix(-9);

    fn symbol_ascii(self) -> &'static str {
        match self.0 {
            -9 => "n",
            -6 => "u",
            -3 => "m",
            0 => "",
            3 => "k",
            6 => "M",
            9 => "G",
            _ => "?",
        }
    }

    fn symbol_unicode(self) -> &'static str {
        match self.0 {
            -6 => "\u{03bc}",
            _ => self.symbol_ascii(),
        }
    }
}

/// Seven signed exponents, one per SI base dimension, in the canonical
/// order: length, mass, time, current, temperature, amount, luminous
/// intensity. A zero exponent in every slot is the dimensionless unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Units {
    pub length: i8,
    pub mass: i8,
    pub time: i8,
    pub current: i8,
    pub temperature: i8,
    pub amount: i8,
    pub luminous_intensity: i8,
    pub prefix: SiPrefix,
}

impl Units {
    pub const DIMENSIONLESS: Units = Units {
        length: 0,
        mass: 0,
        time: 0,
        current: 0,
        temperature: 0,
        amount: 0,
        luminous_intensity: 0,
        prefix: SiPrefix::NONE,
    };

    pub fn length(prefix: SiPrefix) -> Units {
        Units { length: 1, prefix, ..Units::DIMENSIONLESS }
    }

    pub fn is_dimensionless(&self) -> bool {
        self.length == 0
            && self.mass == 0
            && self.time == 0
            && self.current == 0
            && self.temperature == 0
            && self.amount == 0
            && self.luminous_intensity == 0
    }

    const NAMES_ASCII: [(&'static str, &'static str); 7] = [
        ("m", "length"),
        ("kg", "mass"),
        ("s", "time"),
        ("A", "current"),
        ("K", "temperature"),
        ("mol", "amount"),
        ("cd", "luminous_intensity"),
    ];

    fn exponents(&self) -> [i8; 7] {
        [
            self.length,
            self.mass,
            self.time,
            self.current,
            self.temperature,
            self.amount,
            self.luminous_intensity,
        ]
    }

    /// Deterministic canonical-order string formatting: base units first in
    /// the fixed order above, each rendered as `symbol^exp` (exponent `1`
    /// omitted), joined with `.`; a trailing prefix symbol is prepended to
    /// the first base unit only.
    pub fn format(&self, ascii: bool) -> String {
        if self.is_dimensionless() {
            return String::new();
        }
        let prefix = if ascii { self.prefix.symbol_ascii() } else { self.prefix.symbol_unicode() };
        let exponents = self.exponents();
        let mut parts = Vec::new();
        for (i, &exp) in exponents.iter().enumerate() {
            if exp == 0 {
                continue;
            }
            let symbol = Self::NAMES_ASCII[i].0;
            let label = if parts.is_empty() { format!("{prefix}{symbol}") } else { symbol.to_string() };
            if exp == 1 {
                parts.push(label);
            } else if ascii {
                parts.push(format!("{label}^{exp}"));
            } else {
                parts.push(format!("{label}{}", superscript(exp)));
            }
        }
        parts.join(".")
    }
}

fn superscript(n: i8) -> String {
    let digits = "\u{2070}\u{00b9}\u{00b2}\u{00b3}\u{2074}\u{2075}\u{2076}\u{2077}\u{2078}\u{2079}";
    let mut s = String::new();
    if n < 0 {
        s.push('\u{207b}');
    }
    for c in n.unsigned_abs().to_string().chars() {
        let idx = c.to_digit(10).unwrap() as usize;
        s.push(digits.chars().nth(idx).unwrap());
    }
    s
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

impl Mul for Units {
    type Output = Units;
    fn mul(self, rhs: Units) -> Units {
        Units {
            length: self.length + rhs.length,
            mass: self.mass + rhs.mass,
            time: self.time + rhs.time,
            current: self.current + rhs.current,
            temperature: self.temperature + rhs.temperature,
            amount: self.amount + rhs.amount,
            luminous_intensity: self.luminous_intensity + rhs.luminous_intensity,
            prefix: SiPrefix(self.prefix.0 + rhs.prefix.0),
        }
    }
}

impl Div for Units {
    type Output = Units;
    fn div(self, rhs: Units) -> Units {
        Units {
            length: self.length - rhs.length,
            mass: self.mass - rhs.mass,
            time: self.time - rhs.time,
            current: self.current - rhs.current,
            temperature: self.temperature - rhs.temperature,
            amount: self.amount - rhs.amount,
            luminous_intensity: self.luminous_intensity - rhs.luminous_intensity,
            prefix: SiPrefix(self.prefix.0 - rhs.prefix.0),
        }
    }
}

/// A pixel size along one spatial dimension: a magnitude plus units.
/// Attached optionally to an `Image` per dimension (spec §3.1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSize {
    pub magnitude: f64,
    pub units: Units,
}

impl PixelSize {
    pub fn new(magnitude: f64, units: Units) -> Self {
        PixelSize { magnitude, units }
    }
}

impl fmt::Display for PixelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.units.is_dimensionless() {
            write!(f, "{}", self.magnitude)
        } else {
            write!(f, "{} {}", self.magnitude, self.units)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensionless_formats_empty() {
        assert_eq!(Units::DIMENSIONLESS.format(true), "");
    }

    #[test]
    fn length_formats_with_prefix() {
        let u = Units::length(SiPrefix::MICRO);
        assert_eq!(u.format(true), "um");
    }

    #[test]
    fn multiplication_adds_exponents() {
        let area = Units::length(SiPrefix::NONE) * Units::length(SiPrefix::NONE);
        assert_eq!(area.length, 2);
        assert_eq!(area.format(true), "m^2");
    }

    #[test]
    fn division_is_inverse_of_multiplication() {
        let length = Units::length(SiPrefix::NONE);
        let back = (length * length) / length;
        assert_eq!(back, length);
    }
}
