//! Line/comma CSV parser and row accessors.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// One parsed data line: header -> value, in header order.
///
/// Missing and empty values are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvRow {
    fields: Vec<(String, Option<String>)>,
}

impl CsvRow {
    /// Set a column, replacing an earlier value for a repeated header.
    pub fn insert(&mut self, column: &str, value: Option<String>) {
        match self.fields.iter_mut().find(|(name, _)| name == column) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((column.to_string(), value)),
        }
    }

    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.fields.iter().any(|(name, _)| name == column)
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, value)| value.as_deref())
    }

    #[must_use]
    pub fn text(&self, column: &str) -> Option<String> {
        self.get(column).map(str::to_string)
    }

    /// First non-empty value among several spellings of a column.
    #[must_use]
    pub fn first_text(&self, columns: &[&str]) -> Option<&str> {
        columns.iter().find_map(|column| self.get(column))
    }

    #[cfg(test)]
    #[must_use]
    pub fn int(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(parse_int_prefix)
    }

    #[must_use]
    pub fn float(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(parse_float_prefix)
    }

    #[cfg(test)]
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    #[cfg(test)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[cfg(test)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for CsvRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Parse CSV text into rows keyed by the first line's headers.
///
/// Fewer than two lines (header only, or nothing) yields no rows. A blank
/// line between records becomes a row of all `None`. Values beyond the
/// header count are ignored; headers beyond the value count are `None`.
#[must_use]
pub fn parse_csv(text: &str) -> Vec<CsvRow> {
    let lines: Vec<&str> = text.trim().split('\n').collect();
    if lines.len() < 2 {
        return Vec::new();
    }

    let headers: Vec<String> = split_fields(lines[0]).collect();

    lines[1..]
        .iter()
        .map(|line| {
            let values: Vec<String> = split_fields(line).collect();
            let mut row = CsvRow::default();
            for (idx, header) in headers.iter().enumerate() {
                let value = values.get(idx).filter(|v| !v.is_empty()).cloned();
                row.insert(header, value);
            }
            row
        })
        .collect()
}

fn split_fields(line: &str) -> impl Iterator<Item = String> + '_ {
    line.split(',').map(|field| field.replace('"', "").trim().to_string())
}

/// Leading-integer parse: `"12 loads"` -> 12, `"3.7"` -> 3, `"abc"` -> `None`.
#[cfg(test)]
#[must_use]
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    s[..end].parse().ok()
}

/// Leading-decimal parse: `"4.5 stars"` -> 4.5, `".5"` -> 0.5, `"1e3"` -> 1000.
#[must_use]
pub fn parse_float_prefix(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let mut mantissa_digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        mantissa_digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
            mantissa_digits += 1;
        }
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return None;
    }

    // Exponent only counts when digits follow it.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
