/// Column name carried by a single tag: the `name=` component when
/// present, otherwise the first comma-delimited segment.
#[must_use]
pub fn name_from_tag(tag: &str) -> &str {
    tag.split(',')
        .find_map(|part| part.strip_prefix("name="))
        .unwrap_or_else(|| tag.split(',').next().unwrap_or_default())
}

/// Resolve a field's column from its primary tag, falling back to the
/// secondary tag. `None` means the field is not mapped.
#[must_use]
pub fn column_name(primary: Option<&str>, secondary: Option<&str>) -> Option<String> {
    primary
        .or(secondary)
        .map(name_from_tag)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}
