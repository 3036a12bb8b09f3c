//! Header-row column lookup.

use std::collections::HashMap;

use super::{ParseError, ParseResult};

/// Column positions resolved from a header row.
///
/// Built once per source, so name lookup costs O(header width) a single time
/// rather than per data row. Names are matched after trimming trailing
/// whitespace, which absorbs artifacts like a header cell that kept its
/// newline (`"LabDateTime\n"`).
#[derive(Debug)]
pub struct HeaderIndex {
    columns: HashMap<String, usize>,
}

impl HeaderIndex {
    /// Resolve column positions from the raw header line.
    ///
    /// A leading UTF-8 byte-order mark is stripped from the first cell.
    /// On duplicate names the first occurrence wins.
    pub fn parse(header_line: &str) -> Self {
        let line = header_line.strip_prefix('\u{feff}').unwrap_or(header_line);
        let mut columns = HashMap::new();
        for (position, name) in line.split('\t').enumerate() {
            columns.entry(name.trim_end().to_string()).or_insert(position);
        }
        Self { columns }
    }

    /// Position of a required column, or `MissingHeader`.
    pub fn require(&self, name: &str) -> ParseResult<usize> {
        self.columns
            .get(name)
            .copied()
            .ok_or_else(|| ParseError::MissingHeader { name: name.into() })
    }
}
