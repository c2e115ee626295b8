//! Writing update sets as WooCommerce import CSV.

use crate::error::Result;
use crate::types::UpdateSet;
use csv::{Terminator, WriterBuilder};
use std::io::Write;

pub const NO_DATA: &str = "No data to write.";

/// Writes the `[ID, <field>]` header followed by one row per update.
pub struct UpdateEmitter<W: Write> {
    writer: W,
}

impl<W: Write> UpdateEmitter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write `updates` and return the number of rows written. An empty set
    /// writes nothing at all, not even the header.
    pub fn emit(&mut self, updates: &UpdateSet) -> Result<usize> {
        if updates.is_empty() {
            return Ok(0);
        }
        let mut csv = WriterBuilder::new()
            .terminator(Terminator::Any(b'\n'))
            .from_writer(&mut self.writer);
        csv.write_record(&updates.header)?;
        for row in &updates.rows {
            csv.write_record([row.id.as_str(), row.value.as_str()])?;
        }
        csv.flush()?;
        Ok(updates.len())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// The line reported on stderr after a run.
pub fn status_message(updates: &UpdateSet) -> String {
    if updates.is_empty() {
        NO_DATA.to_string()
    } else {
        format!("{} update rows.", updates.len())
    }
}

/// Render an update set to a CSV string.
pub fn to_csv_string(updates: &UpdateSet) -> Result<String> {
    let mut emitter = UpdateEmitter::new(Vec::new());
    emitter.emit(updates)?;
    Ok(String::from_utf8_lossy(&emitter.into_inner()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{UpdateRow, CATEGORIES, ID};

    fn updates(rows: &[(&str, &str)]) -> UpdateSet {
        let mut set = UpdateSet::new(ID, CATEGORIES);
        set.rows = rows.iter().map(|(id, v)| UpdateRow::new(*id, *v)).collect();
        set
    }

    #[test]
    fn writes_header_and_rows() {
        let csv = to_csv_string(&updates(&[("1", "Uncategorized"), ("7", "Clothes, Home")])).unwrap();
        assert_eq!(csv, "ID,Categories\n1,Uncategorized\n7,\"Clothes, Home\"\n");
    }

    #[test]
    fn empty_set_writes_nothing() {
        let mut emitter = UpdateEmitter::new(Vec::new());
        assert_eq!(emitter.emit(&updates(&[])).unwrap(), 0);
        assert!(emitter.into_inner().is_empty());
    }

    #[test]
    fn empty_value_is_written_as_empty_field() {
        let mut set = UpdateSet::new(ID, "Shipping class");
        set.rows.push(UpdateRow::new("3", ""));
        assert_eq!(to_csv_string(&set).unwrap(), "ID,Shipping class\n3,\n");
    }

    #[test]
    fn status_lines() {
        assert_eq!(status_message(&updates(&[])), "No data to write.");
        assert_eq!(status_message(&updates(&[("1", "A"), ("2", "B")])), "2 update rows.");
    }
}
