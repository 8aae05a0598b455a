//! Identifier to column/table name translation.

/// Converts a mixed-case identifier into its snake-case column name.
///
/// Every ASCII uppercase letter becomes `_` followed by its lowercase form;
/// all other characters are copied unchanged. A leading capital therefore
/// yields a leading underscore (`UserInfo` -> `_user_info`).
#[must_use]
pub fn to_column_name(identifier: &str) -> String {
    let mut column = String::with_capacity(identifier.len() + 4);
    for ch in identifier.chars() {
        if ch.is_ascii_uppercase() {
            column.push('_');
            column.push(ch.to_ascii_lowercase());
        } else {
            column.push(ch);
        }
    }
    column
}

/// Derives a table name from an entity's simple type name.
///
/// The underscore inserted for a leading capital is dropped, so `UserInfo`
/// maps to `user_info`. Underscores already present in the type name are
/// kept as they are.
#[must_use]
pub fn to_table_name(simple_name: &str) -> String {
    let translated = to_column_name(simple_name);
    if simple_name.starts_with(|ch: char| ch.is_ascii_uppercase()) {
        translated.strip_prefix('_').unwrap_or(&translated).to_owned()
    } else {
        translated
    }
}

/// Whether `field` can appear inside a parameter marker.
///
/// Only letters, digits and `_` are allowed, so the marker text always
/// closes where the field name ends.
#[must_use]
pub fn is_property_name(field: &str) -> bool {
    !field.is_empty() && field.chars().all(|ch| ch.is_alphanumeric() || ch == '_')
}

/// Formats the parameter marker for a field, e.g. `#{userName}`.
#[must_use]
pub fn placeholder(field: &str) -> String {
    format!("#{{{field}}}")
}
