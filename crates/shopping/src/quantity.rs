use fraction::Fraction;
use mealplanner_shared::meal::Quantity;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuantityError {
    #[error("empty quantity")]
    Empty,

    #[error("invalid quantity `{0}`")]
    Invalid(String),

    #[error("negative quantities are not allowed")]
    Negative,

    #[error("denominator cannot be zero")]
    ZeroDenominator,
}

/// Parses `"2"`, `"0.5"`, `"1/2"` and mixed fractions like `"1 1/2"`.
pub fn parse_quantity(value: &str) -> Result<f64, QuantityError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(QuantityError::Empty);
    }

    let parts = trimmed.split_whitespace().collect::<Vec<_>>();
    let fraction = match parts.as_slice() {
        [single] if single.contains('/') => parse_fraction(single, value)?,
        [single] => parse_decimal(single, value)?,
        [whole, fraction] if fraction.contains('/') && !whole.contains('/') => {
            Fraction::new(parse_integer(whole, value)?, 1u64) + parse_fraction(fraction, value)?
        }
        _ => return Err(QuantityError::Invalid(value.to_owned())),
    };

    to_f64(&fraction).ok_or_else(|| QuantityError::Invalid(value.to_owned()))
}

fn parse_integer(part: &str, original: &str) -> Result<u64, QuantityError> {
    let number = part
        .parse::<i64>()
        .map_err(|_| QuantityError::Invalid(original.to_owned()))?;

    u64::try_from(number).map_err(|_| QuantityError::Negative)
}

fn parse_fraction(part: &str, original: &str) -> Result<Fraction, QuantityError> {
    let pieces = part.split('/').collect::<Vec<_>>();
    let [numerator, denominator] = pieces.as_slice() else {
        return Err(QuantityError::Invalid(original.to_owned()));
    };

    let numerator = parse_integer(numerator, original)?;
    let denominator = parse_integer(denominator, original)?;
    if denominator == 0 {
        return Err(QuantityError::ZeroDenominator);
    }

    Ok(Fraction::new(numerator, denominator))
}

fn parse_decimal(part: &str, original: &str) -> Result<Fraction, QuantityError> {
    let number = part
        .parse::<f64>()
        .map_err(|_| QuantityError::Invalid(original.to_owned()))?;

    if !number.is_finite() {
        return Err(QuantityError::Invalid(original.to_owned()));
    }
    if number < 0.0 {
        return Err(QuantityError::Negative);
    }

    Ok(Fraction::from(number))
}

/// `None` for NaN and infinities.
fn to_f64(fraction: &Fraction) -> Option<f64> {
    let numerator = *fraction.numer()?;
    let denominator = *fraction.denom()?;
    if denominator == 0 {
        return None;
    }

    Some(numerator as f64 / denominator as f64)
}

/// Amount an ingredient contributes to a shopping list; anything missing or
/// unreadable counts as zero.
pub fn amount(quantity: Option<&Quantity>) -> f64 {
    match quantity {
        Some(Quantity::Amount(value)) if value.is_finite() => *value,
        Some(Quantity::Text(text)) => parse_quantity(text).unwrap_or_else(|err| {
            tracing::debug!(quantity = %text, error = %err, "unreadable quantity counted as zero");
            0.0
        }),
        _ => 0.0,
    }
}

/// Whole numbers print without decimals, everything else with one decimal
/// (ties round away from zero).
pub fn format_quantity(value: f64) -> String {
    if value.fract() == 0.0 {
        return format!("{value:.0}");
    }

    let rounded = (value * 10.0).round() / 10.0;
    format!("{rounded:.1}")
}
