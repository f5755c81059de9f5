use crate::utils::error::Result;
use csv::StringRecord;

/// Row-oriented input with one row of lookahead.
pub trait RowSource {
    /// Returns the next row without consuming it.
    fn peek(&mut self) -> Result<Option<&StringRecord>>;

    /// Consumes and returns the next row.
    fn next_row(&mut self) -> Result<Option<StringRecord>>;
}

pub trait RowSink {
    fn write_row(&mut self, row: &[&str]) -> Result<()>;
}
