//! The accumulated, append-only sequence of energy values.

use std::fmt;

use serde::Serialize;

/// Energies in the order they appeared in the log. Values stay as the
/// matched text; nothing is parsed or deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EnergySeries {
    values: Vec<String>,
}

impl EnergySeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: impl Into<String>) {
        self.values.push(value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.values
    }
}

/// Renders as a bracketed list of quoted values, e.g. `['-1.5', '2e-3']`.
impl fmt::Display for EnergySeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "'{value}'")?;
        }
        f.write_str("]")
    }
}

impl<S: Into<String>> FromIterator<S> for EnergySeries {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_series_is_empty() {
        let series = EnergySeries::new();
        assert!(series.is_empty());
        assert_eq!(series.to_string(), "[]");
    }

    #[test]
    fn push_keeps_order_and_duplicates() {
        let mut series = EnergySeries::new();
        series.push("-123.456");
        series.push("7.89e-10");
        series.push("-123.456");
        assert_eq!(series.len(), 3);
        assert_eq!(
            series.iter().collect::<Vec<_>>(),
            vec!["-123.456", "7.89e-10", "-123.456"]
        );
    }

    #[test]
    fn display_quotes_each_value() {
        let series: EnergySeries = ["-123.456", "7.89e-10"].into_iter().collect();
        assert_eq!(series.to_string(), "['-123.456', '7.89e-10']");
    }

    #[test]
    fn serializes_as_plain_array() {
        let series: EnergySeries = ["1.0", "-2"].into_iter().collect();
        assert_eq!(serde_json::to_string(&series).unwrap(), r#"["1.0","-2"]"#);
    }
}
