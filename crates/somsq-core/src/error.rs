use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid phone length: {0} digits")]
    InvalidPhoneLength(usize),
}
