use crate::error::CoreError;
use std::fmt;

pub const CANONICAL_PHONE_LEN: usize = 11;
pub const AREA_CODE_LEN: usize = 3;

pub fn phone_digits(value: &str) -> String {
    value.chars().filter(|ch| ch.is_ascii_digit()).collect()
}

/// Eleven ASCII digits. Only [`normalize_phone`] builds one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalPhone(String);

impl CanonicalPhone {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn split(&self) -> PhoneKey {
        split_phone(self)
    }
}

impl fmt::Display for CanonicalPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Area code (lada) and subscriber number as sent to the lookup endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneKey {
    area_code: String,
    subscriber_number: String,
}

impl PhoneKey {
    pub fn area_code(&self) -> &str {
        &self.area_code
    }

    pub fn subscriber_number(&self) -> &str {
        &self.subscriber_number
    }
}

pub fn normalize_phone(raw: &str) -> Result<CanonicalPhone, CoreError> {
    let digits = phone_digits(raw);
    match digits.len() {
        CANONICAL_PHONE_LEN => Ok(CanonicalPhone(digits)),
        10 => {
            let mut out = String::with_capacity(CANONICAL_PHONE_LEN);
            out.push('0');
            out.push_str(&digits);
            Ok(CanonicalPhone(out))
        }
        count => Err(CoreError::InvalidPhoneLength(count)),
    }
}

pub fn split_phone(phone: &CanonicalPhone) -> PhoneKey {
    let (area_code, subscriber_number) = phone.0.split_at(AREA_CODE_LEN);
    PhoneKey {
        area_code: area_code.to_string(),
        subscriber_number: subscriber_number.to_string(),
    }
}
