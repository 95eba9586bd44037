//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Turns a camel-case specification key into a label.
///
/// Usage in templates: `{{ key|spec_label }}` (`countryOfOrigin` -> `Country Of Origin`)
#[askama::filter_fn]
pub fn spec_label(key: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(humanize_key(&key.to_string()))
}

fn humanize_key(key: &str) -> String {
    let mut label = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if i == 0 {
            label.extend(c.to_uppercase());
        } else if c.is_uppercase() {
            label.push(' ');
            label.push(c);
        } else {
            label.push(c);
        }
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_humanize_key() {
        assert_eq!(humanize_key("countryOfOrigin"), "Country Of Origin");
        assert_eq!(humanize_key("material"), "Material");
        assert_eq!(humanize_key("sleeveLength"), "Sleeve Length");
        assert_eq!(humanize_key(""), "");
    }
}
