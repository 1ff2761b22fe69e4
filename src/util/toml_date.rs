use toml::Value;

/// Replaces every TOML datetime in `value` by its RFC 3339 text.
///
/// TOML has a native datetime type while YAML front matter carries dates as strings.
/// Flattening them lets both dialects go through the same date validation.
pub fn datetimes_to_strings(value: Value) -> Value {
    match value {
        Value::Datetime(datetime) => Value::String(datetime.to_string()),
        Value::Array(items) => Value::Array(items.into_iter().map(datetimes_to_strings).collect()),
        Value::Table(table) => Value::Table(
            table.into_iter()
                .map(|(key, value)| (key, datetimes_to_strings(value)))
                .collect()
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use toml::Table;

    use super::*;

    #[test]
    fn test_date_time() {
        let toml_str = r##"
date = 2023-05-22T01:00:00+02:00
day = 2024-04-22
title = "Starting Anew"

[nested]
when = [2023-05-28T10:30:00Z]
"##;
        let table: Table = toml::from_str(toml_str).unwrap();
        let value = datetimes_to_strings(Value::Table(table));

        assert_eq!(value["date"], Value::String("2023-05-22T01:00:00+02:00".to_string()));
        assert_eq!(value["day"], Value::String("2024-04-22".to_string()));
        assert_eq!(value["title"], Value::String("Starting Anew".to_string()));
        assert_eq!(value["nested"]["when"][0], Value::String("2023-05-28T10:30:00Z".to_string()));
    }
}
