//! Company (tenant) field rules.

use std::sync::LazyLock;

use regex::Regex;

/// Maximum length of a company short name.
pub const MAX_SHORT_NAME_LEN: usize = 10;

/// Theme colours applied when a company is created without them.
pub const DEFAULT_PRIMARY_COLOR: &str = "#1F2937";
pub const DEFAULT_SECONDARY_COLOR: &str = "#F59E0B";
pub const DEFAULT_ACCENT_COLOR: &str = "#10B981";

static HEX_COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#(?:[0-9A-Fa-f]{3}|[0-9A-Fa-f]{6})$").expect("valid regex"));

/// `#RGB` or `#RRGGBB`.
pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR_RE.is_match(value)
}

/// Short names are 1-10 characters after trimming.
pub fn validate_short_name(short_name: &str) -> Result<(), String> {
    let len = short_name.trim().chars().count();
    if len == 0 || len > MAX_SHORT_NAME_LEN {
        return Err(format!(
            "Short name must be between 1 and {MAX_SHORT_NAME_LEN} characters"
        ));
    }
    Ok(())
}

/// Check each `(field, value)` colour, naming the first bad field.
pub fn validate_theme_colors(colors: &[(&str, &str)]) -> Result<(), String> {
    for (field, value) in colors {
        if !is_hex_color(value) {
            return Err(format!("{field} must be a hex colour like #1F2937"));
        }
    }
    Ok(())
}
