pub mod customer;
pub mod mode;
pub mod phone;

pub use customer::{build_full_name, collapse_whitespace, CustomerRecord};
pub use mode::ExtractMode;
pub use phone::{normalize_phone, phone_digits, split_phone, CanonicalPhone, PhoneKey};
