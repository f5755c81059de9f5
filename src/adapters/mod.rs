// Adapters layer: concrete row readers and writers over the csv crate.

pub mod csv_rows;
