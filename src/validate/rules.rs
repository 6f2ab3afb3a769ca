//! Validation rules
//!
//! Every function here is pure: it either returns the normalized value or
//! an [`Error::InvalidParameter`] naming the offending field.

use super::types::{ListRef, ParamValue, UserRef};
use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Handles are 1-15 characters of letters, digits and underscores
static SCREEN_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{1,15}$").unwrap());

/// Parse a value that must be a non-negative integer
pub fn parse_unsigned(field: &str, value: &ParamValue) -> Result<u64> {
    match value {
        ParamValue::Int(n) => u64::try_from(*n)
            .map_err(|_| Error::invalid_param(field, format!("must be non-negative, got {n}"))),
        ParamValue::Text(raw) => {
            let trimmed = raw.trim();
            if let Ok(n) = trimmed.parse::<u64>() {
                return Ok(n);
            }
            if trimmed.parse::<i64>().is_ok() {
                return Err(Error::invalid_param(
                    field,
                    format!("must be non-negative, got {trimmed}"),
                ));
            }
            Err(Error::invalid_param(
                field,
                format!("must be an integer, got '{raw}'"),
            ))
        }
    }
}

/// Validate a per-page `count` against the endpoint's ceiling
pub fn validate_count(field: &str, value: &ParamValue, max: u32) -> Result<u32> {
    let n = parse_unsigned(field, value)?;
    if n > u64::from(max) {
        return Err(Error::invalid_param(
            field,
            format!("must be at most {max}, got {n}"),
        ));
    }
    Ok(n as u32)
}

/// Validate an aggregation `total_count`
pub fn validate_total_count(value: &ParamValue) -> Result<usize> {
    let n = parse_unsigned("total_count", value)?;
    usize::try_from(n).map_err(|_| Error::invalid_param("total_count", "is too large"))
}

/// Validate an id-valued parameter (`user_id`, `since_id`, `max_id`, ...)
pub fn validate_id(field: &str, value: &ParamValue) -> Result<u64> {
    parse_unsigned(field, value)
}

/// Validate and normalize a handle, stripping one leading `@`
pub fn validate_screen_name(field: &str, value: &str) -> Result<String> {
    let name = value.trim();
    let name = name.strip_prefix('@').unwrap_or(name);
    if !SCREEN_NAME_REGEX.is_match(name) {
        return Err(Error::invalid_param(
            field,
            format!("'{value}' is not a valid screen name"),
        ));
    }
    Ok(name.to_string())
}

/// Resolve the optional `screen_name` / `user_id` pair.
///
/// Supplying both is ambiguous and rejected. Supplying neither yields
/// `None`, meaning the authenticating user.
pub fn resolve_user(
    screen_name: Option<&str>,
    user_id: Option<&ParamValue>,
) -> Result<Option<UserRef>> {
    resolve_user_fields(screen_name, user_id, "screen_name", "user_id")
}

fn resolve_user_fields(
    screen_name: Option<&str>,
    user_id: Option<&ParamValue>,
    name_field: &str,
    id_field: &str,
) -> Result<Option<UserRef>> {
    match (screen_name, user_id) {
        (Some(_), Some(_)) => Err(Error::invalid_param(
            name_field,
            format!("specify either {name_field} or {id_field}, not both"),
        )),
        (Some(name), None) => Ok(Some(UserRef::ScreenName(validate_screen_name(
            name_field, name,
        )?))),
        (None, Some(id)) => Ok(Some(UserRef::UserId(validate_id(id_field, id)?))),
        (None, None) => Ok(None),
    }
}

/// Resolve a list identifier.
///
/// Accepts `list_id` alone, or `slug` together with exactly one of
/// `owner_id` / `owner_screen_name`.
pub fn resolve_list(
    list_id: Option<&ParamValue>,
    slug: Option<&str>,
    owner_id: Option<&ParamValue>,
    owner_screen_name: Option<&str>,
) -> Result<ListRef> {
    if let Some(id) = list_id {
        if slug.is_some() {
            return Err(Error::invalid_param(
                "list_id",
                "specify either list_id or slug, not both",
            ));
        }
        return Ok(ListRef::Id(validate_id("list_id", id)?));
    }

    let Some(slug) = slug.map(str::trim).filter(|s| !s.is_empty()) else {
        return Err(Error::invalid_param(
            "list_id",
            "either list_id or slug with owner_id/owner_screen_name is required",
        ));
    };

    let owner = resolve_user_fields(owner_screen_name, owner_id, "owner_screen_name", "owner_id")?
        .ok_or_else(|| {
            Error::invalid_param(
                "owner_id",
                "slug requires owner_id or owner_screen_name",
            )
        })?;

    Ok(ListRef::Slug {
        slug: slug.to_string(),
        owner,
    })
}
