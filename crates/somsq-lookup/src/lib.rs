pub mod batch;
pub mod client;
pub mod error;
pub mod input;
pub mod output;
pub mod source;

pub use batch::{process_phone, run_batch, BatchOptions, BatchReport, BatchSink, PhoneOutcome, PhoneState};
pub use client::{LookupSettings, SomsClient};
pub use error::{LookupError, Result};
pub use input::{detect_input_kind, open_phone_input, InputKind, PhoneTokens};
pub use output::CsvBatchSink;
pub use source::{LookupResponse, LookupSource};
