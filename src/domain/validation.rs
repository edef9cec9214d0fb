use bigdecimal::{BigDecimal, Zero};

use super::errors::ValidationError;
use super::order::{Address, Client};

pub fn require_non_blank(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be blank"));
    }
    Ok(())
}

pub fn require_positive_quantity(field: &str, quantity: i32) -> Result<(), ValidationError> {
    if quantity <= 0 {
        return Err(ValidationError::new(
            field,
            format!("must be greater than 0, got {quantity}"),
        ));
    }
    Ok(())
}

pub fn require_non_negative_price(field: &str, price: &BigDecimal) -> Result<(), ValidationError> {
    if *price < BigDecimal::zero() {
        return Err(ValidationError::new(
            field,
            format!("must not be negative, got {price}"),
        ));
    }
    Ok(())
}

/// Most decimal places a unit price may carry.
pub const MAX_PRICE_SCALE: i64 = 6;
/// Most digits a unit price may have before the decimal point.
pub const MAX_PRICE_INTEGER_DIGITS: i64 = 12;

/// Rejects prices whose exponent would make arithmetic on them unbounded,
/// e.g. `1e1000000`.
pub fn require_price_within_bounds(field: &str, price: &BigDecimal) -> Result<(), ValidationError> {
    let normalized = price.normalized();
    let (_, scale) = normalized.as_bigint_and_exponent();
    if scale > MAX_PRICE_SCALE {
        return Err(ValidationError::new(
            field,
            format!("must have at most {MAX_PRICE_SCALE} decimal places"),
        ));
    }
    let digits = i64::try_from(normalized.digits()).unwrap_or(i64::MAX);
    if digits.saturating_sub(scale) > MAX_PRICE_INTEGER_DIGITS {
        return Err(ValidationError::new(
            field,
            format!("must have at most {MAX_PRICE_INTEGER_DIGITS} integer digits"),
        ));
    }
    Ok(())
}

/// Syntactic check only: `local@domain.tld`, no whitespace, one `@`, dotted
/// domain made of non-empty alphanumeric/hyphen labels.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    labels.iter().all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

pub fn validate_address(prefix: &str, address: &Address) -> Result<(), ValidationError> {
    let fields = [
        ("street", &address.street),
        ("number", &address.number),
        ("city", &address.city),
        ("province", &address.province),
        ("country", &address.country),
        ("cp", &address.cp),
    ];
    for (name, value) in fields {
        require_non_blank(&format!("{prefix}.{name}"), value)?;
    }
    Ok(())
}

pub fn validate_client(client: &Client) -> Result<(), ValidationError> {
    require_non_blank("client.fullName", &client.full_name)?;
    if !is_valid_email(&client.email) {
        return Err(ValidationError::new(
            "client.email",
            format!("'{}' is not a valid email address", client.email),
        ));
    }
    require_non_blank("client.phone", &client.phone)?;
    validate_address("client.address", &client.address)
}
