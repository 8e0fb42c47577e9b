use std::sync::OnceLock;

use regex::Regex;

/// Extracts entity/field/value triples from PostgreSQL constraint violations.
///
/// PostgreSQL reports most of what we need in structured fields (table,
/// constraint), with the offending key only in the `DETAIL` line, e.g.
/// `Key (isbn)=(9780000000001) already exists.`
pub struct ConstraintParser;

struct Patterns {
    key_value: Regex,
    column: Regex,
    relation: Regex,
}

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

/// Suffixes PostgreSQL appends to generated constraint names.
const CONSTRAINT_SUFFIXES: &[&str] = &["_key", "_fkey", "_check", "_idx", "_pkey"];

impl ConstraintParser {
    fn patterns() -> &'static Patterns {
        PATTERNS.get_or_init(|| Patterns {
            key_value: Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)").expect("valid key/value regex"),
            column: Regex::new(r#"column "([^"]+)""#).expect("valid column regex"),
            relation: Regex::new(r#"(?:relation|table) "([^"]+)""#).expect("valid relation regex"),
        })
    }

    /// `Key (field)=(value)` from the detail or the message.
    pub fn key_value(text: &str) -> Option<(String, String)> {
        let caps = Self::patterns().key_value.captures(text)?;
        Some((caps.get(1)?.as_str().to_string(), caps.get(2)?.as_str().to_string()))
    }

    pub fn column(text: &str) -> Option<String> {
        Self::patterns()
            .column
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }

    pub fn relation(text: &str) -> Option<String> {
        Self::patterns()
            .relation
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Recovers the column part of a generated constraint name.
    ///
    /// With the table known, `borrow_records_book_id_fkey` becomes `book_id`.
    /// Hand-named constraints (`copies_available_non_negative`) are returned
    /// unchanged when they don't start with the table name.
    pub fn field_from_constraint(constraint: &str, table: Option<&str>) -> String {
        let mut rest = constraint;
        if let Some(table) = table
            && let Some(stripped) = rest.strip_prefix(table)
            && let Some(stripped) = stripped.strip_prefix('_')
        {
            rest = stripped;
        }
        for suffix in CONSTRAINT_SUFFIXES {
            if let Some(stripped) = rest.strip_suffix(suffix) {
                return stripped.to_string();
            }
        }
        rest.to_string()
    }

    /// Parses a unique violation into `(entity, field, value)`.
    pub fn parse_unique_violation(
        message: &str,
        details: Option<&str>,
        table: Option<&str>,
        constraint: Option<&str>,
    ) -> Option<(String, String, String)> {
        let key_value = details
            .and_then(Self::key_value)
            .or_else(|| Self::key_value(message));
        let entity = table
            .map(str::to_string)
            .or_else(|| Self::relation(message))
            .unwrap_or_else(|| "resource".to_string());

        match (key_value, constraint) {
            (Some((field, value)), _) => Some((entity, field, value)),
            (None, Some(c)) => Some((
                entity,
                Self::field_from_constraint(c, table),
                "duplicate_value".to_string(),
            )),
            (None, None) => None,
        }
    }

    /// Parses a foreign key violation into `(entity, field, referenced_value)`.
    pub fn parse_foreign_key_violation(
        message: &str,
        details: Option<&str>,
        table: Option<&str>,
        constraint: Option<&str>,
    ) -> Option<(String, String, String)> {
        // Deleting a referenced row reports the referencing table in the
        // detail ("is still referenced from table ..."), inserting reports
        // the missing key ("is not present in table ...").
        let (field, value) = details
            .and_then(Self::key_value)
            .or_else(|| Self::key_value(message))
            .or_else(|| constraint.map(|c| (Self::field_from_constraint(c, table), "unknown".to_string())))?;
        let entity = table
            .map(str::to_string)
            .or_else(|| Self::relation(message))
            .unwrap_or_else(|| "resource".to_string());
        Some((entity, field, value))
    }

    /// Parses a not-null or check violation into `(entity, field)`.
    pub fn parse_column_violation(
        message: &str,
        table: Option<&str>,
        column: Option<&str>,
        constraint: Option<&str>,
    ) -> Option<(String, String)> {
        let field = column
            .map(str::to_string)
            .or_else(|| Self::column(message))
            .or_else(|| constraint.map(|c| Self::field_from_constraint(c, table)))?;
        let entity = table
            .map(str::to_string)
            .or_else(|| Self::relation(message))
            .unwrap_or_else(|| "resource".to_string());
        Some((entity, field))
    }
}
