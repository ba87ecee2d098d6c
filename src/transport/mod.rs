/// CSV encoding and decoding of [`Table`](crate::data::Table).
pub mod csv;
