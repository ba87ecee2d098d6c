/// Column name in a tabular dataset.
/// Examples: `Kip - UID MainCategory`, `session_id`
pub type ColumnName = String;
/// Value of the stratification column for one category.
/// Examples: `billing`, `complaint`, `A`
pub type CategoryKey = String;
/// A single nullable cell. `None` is a missing value.
pub type Cell = Option<String>;
/// One input record, positionally aligned with the table's columns.
pub type Row = Vec<Cell>;
