//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use shoop_core::{OrderStatus, text};

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Formats a timestamp as `dd/mm/YYYY`.
#[askama::filter_fn]
pub fn date(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let raw = value.to_string();
    Ok(text::parse_timestamp(&raw).map_or(raw, |at| text::format_date(&at)))
}

/// Formats a timestamp as `dd/mm/YYYY HH:MM`.
#[askama::filter_fn]
pub fn datetime(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let raw = value.to_string();
    Ok(text::parse_timestamp(&raw).map_or(raw, |at| text::format_datetime(&at)))
}

/// First sixty characters followed by `...`, for table cells.
#[askama::filter_fn]
pub fn excerpt(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(text::truncate(&value.to_string(), 60))
}

/// Vietnamese label for an order status.
#[askama::filter_fn]
pub fn status_label(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let raw = value.to_string();
    Ok(raw
        .parse::<OrderStatus>()
        .map_or(raw, |status| status.label().to_owned()))
}

/// Badge classes for an order status.
#[askama::filter_fn]
pub fn status_class(value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(value
        .to_string()
        .parse::<OrderStatus>()
        .map_or("bg-gray-100 text-gray-800", |status| status.badge_class()))
}
