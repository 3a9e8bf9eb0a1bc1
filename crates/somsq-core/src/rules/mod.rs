pub mod extract;
pub mod rows;

pub use extract::{dedupe_records, extract_customers};
pub use rows::{build_rows, summarize_rows};
