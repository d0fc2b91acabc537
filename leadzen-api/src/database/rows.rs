use rusqlite::types::Type;
use rusqlite::Row;
use tracing::warn;

/// Reads an enum stored as its snake_case text
pub fn enum_column<T>(row: &Row, idx: usize, parse: fn(&str) -> Option<T>) -> rusqlite::Result<T> {
    let text: String = row.get(idx)?;
    parse(&text).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unknown value '{}'", text).into(),
        )
    })
}

pub fn optional_enum_column<T>(
    row: &Row,
    idx: usize,
    parse: fn(&str) -> Option<T>,
) -> rusqlite::Result<Option<T>> {
    match row.get::<_, Option<String>>(idx)? {
        Some(_) => enum_column(row, idx, parse).map(Some),
        None => Ok(None),
    }
}

/// Tags are stored as a JSON array
pub fn tags_column(row: &Row, idx: usize) -> rusqlite::Result<Vec<String>> {
    let json: String = row.get(idx)?;
    serde_json::from_str(&json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub fn tags_to_json(tags: &[String]) -> anyhow::Result<String> {
    Ok(serde_json::to_string(tags)?)
}

/// Keeps rows that mapped cleanly. A row that fails to map is logged and skipped.
pub fn collect_valid<T, I>(rows: I, table: &str) -> Vec<T>
where
    I: Iterator<Item = rusqlite::Result<T>>,
{
    rows.filter_map(|row| match row {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Skipping malformed row in {}: {}", table, e);
            None
        }
    })
    .collect()
}
