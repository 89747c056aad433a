//! Field validators. Each takes raw user input and returns the normalized
//! value that is allowed into the draft, or the step's recoverable error.

use std::sync::LazyLock;

use regex::Regex;

use super::model::{Location, LocationSource, Phone};
use crate::error::BookingError;

/// Country calling code prepended to canonical phone numbers.
pub const COUNTRY_CODE: &str = "+251";

const MIN_NAME_CHARS: usize = 2;
const MIN_LOCATION_CHARS: usize = 5;
const MIN_OTHER_SERVICE_CHARS: usize = 3;

/// Optional country code or trunk zero, then a 9 and eight more digits.
static LOCAL_MOBILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\+251|251|0)?(9\d{8})$").expect("phone pattern is valid")
});

pub fn normalize_name(raw: &str) -> Result<String, BookingError> {
    let name = raw.trim();
    if name.chars().count() < MIN_NAME_CHARS {
        return Err(BookingError::InvalidName);
    }
    Ok(name.to_string())
}

/// Normalize a typed phone number to `+251XXXXXXXXX`.
///
/// Accepts `0912345678`, `912345678`, `251912345678` and `+251912345678`,
/// with any separators in between.
pub fn normalize_phone(raw: &str) -> Result<Phone, BookingError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();

    let captures = LOCAL_MOBILE
        .captures(&cleaned)
        .ok_or(BookingError::InvalidPhone)?;
    let significant = &captures[1];
    Ok(Phone::from_canonical(format!("{COUNTRY_CODE}{significant}")))
}

/// Canonicalize the number attached to a shared contact.
///
/// Shared contacts are trusted and never rejected for shape: local numbers
/// get the same canonical form as typed ones, anything else becomes `+`
/// followed by its digits. Returns `None` when there are no digits at all.
pub fn canonical_contact_phone(raw: &str) -> Option<Phone> {
    if let Ok(phone) = normalize_phone(raw) {
        return Some(phone);
    }
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    Some(Phone::from_canonical(format!("+{digits}")))
}

pub fn normalize_location(raw: &str) -> Result<Location, BookingError> {
    let location = raw.trim();
    if location.chars().count() < MIN_LOCATION_CHARS {
        return Err(BookingError::InvalidLocation);
    }
    Ok(Location {
        value: location.to_string(),
        source: LocationSource::ManualEntry,
    })
}

/// Encode shared coordinates. Bypasses text validation; only rejects values
/// that cannot be a position on Earth.
pub fn gps_location(latitude: f64, longitude: f64) -> Option<Location> {
    let valid = latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude);
    if !valid {
        return None;
    }
    Some(Location {
        value: format!("{latitude:.6},{longitude:.6}"),
        source: LocationSource::Gps,
    })
}

/// Validate the description of a service that is not in the catalog.
pub fn normalize_other_service(raw: &str) -> Result<String, BookingError> {
    let description = raw.trim();
    if description.chars().count() < MIN_OTHER_SERVICE_CHARS {
        return Err(BookingError::InvalidOtherService);
    }
    Ok(description.to_string())
}
