//! MySQL to Go type mapping.

use std::collections::BTreeMap;

use tracing::warn;

/// Built-in mapping from `information_schema.COLUMNS.DATA_TYPE` to Go types.
pub const BUILTIN_TYPES: [(&str, &str); 13] = [
    ("char", "string"),
    ("varchar", "string"),
    ("longtext", "string"),
    ("text", "string"),
    ("integer", "int"),
    ("tinyint", "int"),
    ("int", "int"),
    ("bigint", "int64"),
    ("boole", "bool"),
    ("decimal", "float64"),
    ("datetime", "time.Time"),
    ("date", "time.Time"),
    ("timestamp", "time.Time"),
];

/// Lookup table from source column types to target types.
///
/// Keys match exactly: `VARCHAR` and `varchar` are different entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMap {
    entries: BTreeMap<String, String>,
}

impl TypeMap {
    /// A map holding only the built-in entries.
    pub fn builtin() -> Self {
        let entries = BUILTIN_TYPES
            .iter()
            .map(|(src, dst)| (src.to_string(), dst.to_string()))
            .collect();
        Self { entries }
    }

    /// Add or replace entries. Overrides win over built-ins.
    pub fn with_overrides<I, K, V>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (src, dst) in overrides {
            self.entries.insert(src.into(), dst.into());
        }
        self
    }

    /// The mapped type, if `source` is known.
    pub fn get(&self, source: &str) -> Option<&str> {
        self.entries.get(source).map(String::as_str)
    }

    /// Map `source` to its target type, passing unknown types through unchanged.
    ///
    /// `column` only feeds the diagnostic emitted for unknown types.
    pub fn lookup(&self, column: &str, source: &str) -> String {
        match self.get(source) {
            Some(target) => target.to_string(),
            None => {
                warn!(column, data_type = source, "unmapped column type, using it verbatim");
                source.to_string()
            }
        }
    }

    /// Entries sorted by source type.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TypeMap {
    fn default() -> Self {
        Self::builtin()
    }
}
