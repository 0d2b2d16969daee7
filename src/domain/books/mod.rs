pub mod records;
pub mod shelves;

pub use records::{Authors, BookRecord, DateField, ReadingStatus};
pub use shelves::{Shelves, available_years};
