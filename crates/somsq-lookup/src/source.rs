use crate::Result;
use somsq_core::PhoneKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResponse {
    pub status: u16,
    pub body: String,
}

pub trait LookupSource {
    fn lookup_url(&self, key: &PhoneKey) -> Result<String>;
    fn fetch(&self, url: &str) -> Result<LookupResponse>;
}
