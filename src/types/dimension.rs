use std::fmt;

/// Physical quantity of a parameter, each with its own internal unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    /// Nanometres.
    Length,
    /// Millidegrees.
    Angle,
    /// Parts per million.
    Ratio,
    /// A plain, dimensionless integer.
    Count,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Length => write!(f, "length"),
            Quantity::Angle => write!(f, "angle"),
            Quantity::Ratio => write!(f, "ratio"),
            Quantity::Count => write!(f, "count"),
        }
    }
}

/// Unit suffixes accepted on numeric literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Millimeter,
    Micrometer,
    Nanometer,
    Mil,
    Inch,
    Degree,
    Percent,
}

struct UnitSpec {
    unit: Unit,
    suffix: &'static str,
    quantity: Quantity,
    /// Internal units per one of this unit.
    scale: i64,
}

impl UnitSpec {
    const fn new(unit: Unit, suffix: &'static str, quantity: Quantity, scale: i64) -> Self {
        Self {
            unit,
            suffix,
            quantity,
            scale,
        }
    }
}

// Ordered like `Unit`.
const UNITS: &[UnitSpec] = &[
    UnitSpec::new(Unit::Millimeter, "mm", Quantity::Length, 1_000_000),
    UnitSpec::new(Unit::Micrometer, "um", Quantity::Length, 1_000),
    UnitSpec::new(Unit::Nanometer, "nm", Quantity::Length, 1),
    UnitSpec::new(Unit::Mil, "mil", Quantity::Length, 25_400),
    UnitSpec::new(Unit::Inch, "in", Quantity::Length, 25_400_000),
    UnitSpec::new(Unit::Degree, "deg", Quantity::Angle, 1_000),
    UnitSpec::new(Unit::Percent, "%", Quantity::Ratio, 10_000),
];

impl Unit {
    pub const ALL: [Unit; 7] = [
        Unit::Millimeter,
        Unit::Micrometer,
        Unit::Nanometer,
        Unit::Mil,
        Unit::Inch,
        Unit::Degree,
        Unit::Percent,
    ];

    /// Look up a unit by its literal suffix (case-sensitive).
    #[must_use]
    pub fn from_suffix(suffix: &str) -> Option<Unit> {
        UNITS.iter().find(|s| s.suffix == suffix).map(|s| s.unit)
    }

    fn spec(self) -> &'static UnitSpec {
        &UNITS[self as usize]
    }

    #[must_use]
    pub fn suffix(self) -> &'static str {
        self.spec().suffix
    }

    #[must_use]
    pub fn quantity(self) -> Quantity {
        self.spec().quantity
    }

    /// Internal units per one of this unit.
    #[must_use]
    pub fn scale(self) -> i64 {
        self.spec().scale
    }

    /// Number of fractional digits that convert to internal units without rounding.
    #[must_use]
    pub fn exact_decimals(self) -> u32 {
        let scale = self.scale();
        let mut digits = 0;
        while digits < 18 && scale % 10_i64.pow(digits + 1) == 0 {
            digits += 1;
        }
        digits
    }

    /// Convert an exact decimal literal to internal units.
    ///
    /// Literals finer than the internal resolution round half away from zero.
    /// Returns `None` when the result does not fit in an `i64`.
    #[must_use]
    pub fn to_internal(self, value: Decimal) -> Option<i64> {
        let num = i128::from(value.mantissa) * i128::from(self.scale());
        let den = 10_i128.checked_pow(value.scale)?;
        let rounded = div_round_half_away(num, den);
        i64::try_from(rounded).ok()
    }

    /// Convert internal units back into this unit, rounded to `decimals`
    /// fractional digits.
    #[must_use]
    pub fn from_internal(self, internal: i64, decimals: u32) -> Option<Decimal> {
        let num = i128::from(internal).checked_mul(10_i128.checked_pow(decimals)?)?;
        let mantissa = div_round_half_away(num, i128::from(self.scale()));
        Some(Decimal {
            mantissa: i64::try_from(mantissa).ok()?,
            scale: decimals,
        })
    }

    /// Convert literal text (`[+-]digits[.digits]`) straight to internal
    /// units, with any number of digits.
    ///
    /// Agrees with [`Decimal::parse`] followed by
    /// [`to_internal`](Self::to_internal) wherever the literal fits a
    /// [`Decimal`]. Returns `None` for malformed text or a result outside
    /// `i64`.
    #[must_use]
    pub fn parse_internal(self, text: &str) -> Option<i64> {
        let (negative, int_part, frac_part) = split_literal(text)?;
        let scale = u64::try_from(self.scale()).ok()?;

        // Multiply the whole digit string by the scale in place; the decimal
        // point stays where it was and the final carry prefixes the result.
        let mut digits: Vec<u8> = int_part
            .bytes()
            .chain(frac_part.bytes())
            .map(|b| b - b'0')
            .collect();
        let mut carry = 0_u64;
        for d in digits.iter_mut().rev() {
            let v = u64::from(*d) * scale + carry;
            *d = (v % 10) as u8;
            carry = v / 10;
        }

        let (whole, fraction) = digits.split_at(int_part.len());
        let mut magnitude = i128::from(carry);
        for &d in whole {
            magnitude = magnitude.checked_mul(10)?.checked_add(i128::from(d))?;
        }
        if fraction.first().is_some_and(|&d| d >= 5) {
            magnitude += 1;
        }
        i64::try_from(if negative { -magnitude } else { magnitude }).ok()
    }
}

/// Split `[+-]digits[.digits]` into sign, integer digits and fraction digits.
fn split_literal(text: &str) -> Option<(bool, &str, &str)> {
    let (negative, body) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    let (int_part, frac_part) = match body.split_once('.') {
        Some((i, f)) if !f.is_empty() => (i, f),
        Some(_) => return None,
        None => (body, ""),
    };
    if int_part.is_empty()
        || !int_part.bytes().all(|b| b.is_ascii_digit())
        || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    Some((negative, int_part, frac_part))
}

fn div_round_half_away(num: i128, den: i128) -> i128 {
    let q = num / den;
    let r = num % den;
    if r.abs() * 2 >= den.abs() {
        if (num < 0) == (den < 0) {
            q + 1
        } else {
            q - 1
        }
    } else {
        q
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Exact value of a decimal literal: `mantissa * 10^-scale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal {
    pub mantissa: i64,
    pub scale: u32,
}

impl Decimal {
    #[must_use]
    pub fn new(mantissa: i64, scale: u32) -> Self {
        Self { mantissa, scale }
    }

    /// Parse `[+-]digits[.digits]` without any floating-point step.
    ///
    /// `None` if the digits do not fit an `i64` mantissa; use
    /// [`Unit::parse_internal`] for literals of arbitrary length.
    #[must_use]
    pub fn parse(text: &str) -> Option<Decimal> {
        let (negative, int_part, frac_part) = split_literal(text)?;

        let mut mantissa: i64 = 0;
        for b in int_part.bytes().chain(frac_part.bytes()) {
            mantissa = mantissa
                .checked_mul(10)?
                .checked_add(i64::from(b - b'0'))?;
        }
        let scale = u32::try_from(frac_part.len()).ok()?;
        Some(Decimal {
            mantissa: if negative { -mantissa } else { mantissa },
            scale,
        })
    }

    /// Drop trailing fractional zeros.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        while self.scale > 0 && self.mantissa % 10 == 0 {
            self.mantissa /= 10;
            self.scale -= 1;
        }
        self
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.mantissa);
        }
        let sign = if self.mantissa < 0 { "-" } else { "" };
        let abs = u128::from(self.mantissa.unsigned_abs());
        let Some(pow) = 10_u128.checked_pow(self.scale) else {
            return write!(f, "{}e-{}", self.mantissa, self.scale);
        };
        write!(
            f,
            "{sign}{}.{:0width$}",
            abs / pow,
            abs % pow,
            width = self.scale as usize
        )
    }
}

/// A parameter value already converted to its quantity's internal unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimension {
    pub quantity: Quantity,
    pub value: i64,
}

impl Dimension {
    #[must_use]
    pub fn length_nm(value: i64) -> Self {
        Self { quantity: Quantity::Length, value }
    }

    #[must_use]
    pub fn angle_mdeg(value: i64) -> Self {
        Self { quantity: Quantity::Angle, value }
    }

    #[must_use]
    pub fn ratio_ppm(value: i64) -> Self {
        Self { quantity: Quantity::Ratio, value }
    }

    #[must_use]
    pub fn count(value: i64) -> Self {
        Self { quantity: Quantity::Count, value }
    }

    /// Display unit for this quantity, `None` for counts.
    fn display_unit(self) -> Option<Unit> {
        match self.quantity {
            Quantity::Length => Some(Unit::Millimeter),
            Quantity::Angle => Some(Unit::Degree),
            Quantity::Ratio => Some(Unit::Percent),
            Quantity::Count => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.display_unit() {
            Some(unit) => match unit.from_internal(self.value, unit.exact_decimals()) {
                Some(d) => write!(f, "{}{unit}", d.normalized()),
                None => write!(f, "{}", self.value),
            },
            None => write!(f, "{}", self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_lookup() {
        assert_eq!(Unit::from_suffix("mm"), Some(Unit::Millimeter));
        assert_eq!(Unit::from_suffix("mil"), Some(Unit::Mil));
        assert_eq!(Unit::from_suffix("%"), Some(Unit::Percent));
        assert_eq!(Unit::from_suffix("MM"), None);
        assert_eq!(Unit::from_suffix("zz"), None);
    }

    #[test]
    fn every_unit_in_table() {
        for unit in Unit::ALL {
            assert_eq!(Unit::from_suffix(unit.suffix()), Some(unit));
            assert_eq!(UNITS[unit as usize].unit, unit);
        }
    }

    #[test]
    fn exact_decimals_per_unit() {
        assert_eq!(Unit::Millimeter.exact_decimals(), 6);
        assert_eq!(Unit::Micrometer.exact_decimals(), 3);
        assert_eq!(Unit::Nanometer.exact_decimals(), 0);
        assert_eq!(Unit::Mil.exact_decimals(), 2);
        assert_eq!(Unit::Inch.exact_decimals(), 5);
        assert_eq!(Unit::Degree.exact_decimals(), 3);
        assert_eq!(Unit::Percent.exact_decimals(), 4);
    }

    #[test]
    fn decimal_parse() {
        assert_eq!(Decimal::parse("0.2"), Some(Decimal::new(2, 1)));
        assert_eq!(Decimal::parse("-1.25"), Some(Decimal::new(-125, 2)));
        assert_eq!(Decimal::parse("+7"), Some(Decimal::new(7, 0)));
        assert_eq!(Decimal::parse("10.00"), Some(Decimal::new(1000, 2)));
        assert_eq!(Decimal::parse(""), None);
        assert_eq!(Decimal::parse("1."), None);
        assert_eq!(Decimal::parse(".5"), None);
        assert_eq!(Decimal::parse("1e3"), None);
        assert_eq!(Decimal::parse("99999999999999999999"), None);
    }

    #[test]
    fn millimeters_to_nanometers() {
        assert_eq!(Unit::Millimeter.to_internal(Decimal::new(2, 1)), Some(200_000));
        assert_eq!(Unit::Millimeter.to_internal(Decimal::new(-15, 1)), Some(-1_500_000));
    }

    #[test]
    fn mils_and_inches() {
        assert_eq!(Unit::Mil.to_internal(Decimal::new(10, 0)), Some(254_000));
        assert_eq!(Unit::Inch.to_internal(Decimal::new(1, 0)), Some(25_400_000));
        assert_eq!(Unit::Mil.to_internal(Decimal::new(5, 1)), Some(12_700));
    }

    #[test]
    fn sub_resolution_rounds_half_away_from_zero() {
        // 0.0000005 mm = 0.5 nm
        assert_eq!(Unit::Millimeter.to_internal(Decimal::new(5, 7)), Some(1));
        assert_eq!(Unit::Millimeter.to_internal(Decimal::new(-5, 7)), Some(-1));
        assert_eq!(Unit::Millimeter.to_internal(Decimal::new(4, 7)), Some(0));
    }

    #[test]
    fn overflow_is_none() {
        assert_eq!(Unit::Inch.to_internal(Decimal::new(i64::MAX, 0)), None);
    }

    #[test]
    fn parse_internal_matches_decimal_path() {
        for text in ["0.2", "-1.25", "+7", "0.0000005", "-0.0000005", "12.3456789"] {
            let decimal = Decimal::parse(text).unwrap();
            for unit in Unit::ALL {
                assert_eq!(unit.parse_internal(text), unit.to_internal(decimal), "{text}{unit}");
            }
        }
    }

    #[test]
    fn parse_internal_takes_any_digit_count() {
        let text = "0.12345678901234567890123456789012345678901234567890";
        assert_eq!(Decimal::parse(text), None);
        assert_eq!(Unit::Millimeter.parse_internal(text), Some(123_457));
        assert_eq!(Unit::Nanometer.parse_internal("9223372036854775807"), Some(i64::MAX));
        assert_eq!(Unit::Nanometer.parse_internal("-9223372036854775807"), Some(-i64::MAX));
        assert_eq!(Unit::Nanometer.parse_internal("9223372036854775808"), None);
        assert_eq!(Unit::Millimeter.parse_internal("1."), None);
        assert_eq!(Unit::Millimeter.parse_internal(".5"), None);
        assert_eq!(Unit::Millimeter.parse_internal("-"), None);
    }

    #[test]
    fn angles_and_ratios() {
        assert_eq!(Unit::Degree.to_internal(Decimal::new(45, 0)), Some(45_000));
        assert_eq!(Unit::Percent.to_internal(Decimal::new(125, 1)), Some(125_000));
    }

    #[test]
    fn from_internal_back_to_literal() {
        let d = Unit::Millimeter.from_internal(200_000, 6).unwrap();
        assert_eq!(d.normalized(), Decimal::new(2, 1));
        let d = Unit::Mil.from_internal(254_000, 2).unwrap();
        assert_eq!(d.normalized(), Decimal::new(10, 0));
    }

    #[test]
    fn decimal_display() {
        assert_eq!(Decimal::new(2, 1).to_string(), "0.2");
        assert_eq!(Decimal::new(-125, 2).to_string(), "-1.25");
        assert_eq!(Decimal::new(-5, 2).to_string(), "-0.05");
        assert_eq!(Decimal::new(42, 0).to_string(), "42");
    }

    #[test]
    fn dimension_display() {
        assert_eq!(Dimension::length_nm(200_000).to_string(), "0.2mm");
        assert_eq!(Dimension::angle_mdeg(45_000).to_string(), "45deg");
        assert_eq!(Dimension::ratio_ppm(125_000).to_string(), "12.5%");
        assert_eq!(Dimension::count(3).to_string(), "3");
    }
}
