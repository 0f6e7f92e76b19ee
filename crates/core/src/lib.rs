pub mod money;
pub mod period;
pub mod transaction;

pub use money::{Money, MoneyError};
pub use period::{month_from_name, StatementPeriod};
pub use transaction::{DayMonth, Direction, RecordError, RecordParts, SourceDocument, TransactionRecord};
