//! String-keyed configuration properties
//!
//! Parses the workflow engine's property-file format into a flat key/value
//! table. The format is line oriented:
//! - Lines starting with # are comments
//! - Empty lines are ignored
//! - Format: key value (space separated) or key=value
//! - Values can be quoted with "" for empty or space-containing values

use std::fs;
use std::io;
use std::path::Path;

/// Flat string-keyed, string-valued configuration
#[derive(Debug, Clone, Default)]
pub struct Properties {
    entries: Vec<(String, String)>,
}

impl Properties {
    /// Create an empty property set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse properties from a file
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse properties from a string
    pub fn parse(content: &str) -> io::Result<Self> {
        let mut entries = Vec::new();

        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = Self::parse_line(line).map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("Line {}: {}", line_num + 1, e),
                )
            })?;

            entries.push((key, value));
        }

        Ok(Self { entries })
    }

    /// Parse a single line into key-value pair
    fn parse_line(line: &str) -> Result<(String, String), String> {
        // Try key=value format first
        if let Some(eq_pos) = line.find('=') {
            let key = line[..eq_pos].trim();
            let value = line[eq_pos + 1..].trim();
            return Ok((key.to_string(), Self::unquote(value)));
        }

        // Try key value format (space separated)
        let parts: Vec<&str> = line.splitn(2, char::is_whitespace).collect();
        if parts.len() < 2 {
            return Err(format!(
                "Invalid format: expected 'key value' or 'key=value', got '{}'",
                line
            ));
        }

        let key = parts[0].trim();
        let value = parts[1].trim();

        if key.is_empty() {
            return Err("Empty key".to_string());
        }

        Ok((key.to_string(), Self::unquote(value)))
    }

    /// Remove surrounding quotes from a value
    fn unquote(value: &str) -> String {
        let value = value.trim();
        if (value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\''))
        {
            if value.len() >= 2 {
                return value[1..value.len() - 1].to_string();
            }
        }
        value.to_string()
    }

    /// Look up a key; the last occurrence wins
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Look up a key with a fallback default
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Set a key programmatically
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the property set is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value_formats() {
        let props = Properties::parse(
            "# comment\n\
             workflow.elasticsearch.url 127.0.0.1:9200\n\
             workflow.elasticsearch.user=elastic:changeme\n\
             \n\
             quoted \"value with spaces\"\n",
        )
        .unwrap();

        assert_eq!(props.len(), 3);
        assert_eq!(
            props.get("workflow.elasticsearch.url"),
            Some("127.0.0.1:9200")
        );
        assert_eq!(
            props.get("workflow.elasticsearch.user"),
            Some("elastic:changeme")
        );
        assert_eq!(props.get("quoted"), Some("value with spaces"));
    }

    #[test]
    fn test_parse_invalid_line_reports_number() {
        let err = Properties::parse("valid key\nnovalue\n").unwrap_err();
        assert!(err.to_string().contains("Line 2"));
    }

    #[test]
    fn test_last_occurrence_wins() {
        let props = Properties::parse("key first\nkey second\n").unwrap();
        assert_eq!(props.get("key"), Some("second"));
    }

    #[test]
    fn test_get_or_default() {
        let props = Properties::new();
        assert_eq!(props.get_or("missing", "fallback"), "fallback");
    }
}
