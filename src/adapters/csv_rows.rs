use crate::domain::ports::{RowSink, RowSource};
use crate::utils::error::{ListError, Result};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::io::{Read, Write};

/// Headerless CSV input with a single row of lookahead.
pub struct CsvRowReader<R: Read> {
    reader: csv::Reader<R>,
    lookahead: Option<StringRecord>,
    exhausted: bool,
    consumed: usize,
}

impl<R: Read> CsvRowReader<R> {
    pub fn new(input: R) -> Self {
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(input);
        Self {
            reader,
            lookahead: None,
            exhausted: false,
            consumed: 0,
        }
    }

    /// Rows handed out through [`RowSource::next_row`] so far.
    pub fn rows_consumed(&self) -> usize {
        self.consumed
    }

    fn fill(&mut self) -> Result<()> {
        if self.lookahead.is_some() || self.exhausted {
            return Ok(());
        }
        let mut record = StringRecord::new();
        if self.reader.read_record(&mut record)? {
            self.lookahead = Some(record);
        } else {
            self.exhausted = true;
        }
        Ok(())
    }
}

impl<R: Read> RowSource for CsvRowReader<R> {
    fn peek(&mut self) -> Result<Option<&StringRecord>> {
        self.fill()?;
        Ok(self.lookahead.as_ref())
    }

    fn next_row(&mut self) -> Result<Option<StringRecord>> {
        self.fill()?;
        let row = self.lookahead.take();
        if row.is_some() {
            self.consumed += 1;
        }
        Ok(row)
    }
}

pub struct CsvRowWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvRowWriter<W> {
    pub fn new(output: W) -> Self {
        let writer = WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(output);
        Self { writer }
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| ListError::IoError(e.into_error()))
    }
}

impl<W: Write> RowSink for CsvRowWriter<W> {
    fn write_row(&mut self, row: &[&str]) -> Result<()> {
        self.writer.write_record(row)?;
        Ok(())
    }
}
