use crate::source::{LookupResponse, LookupSource};
use crate::{LookupError, Result};
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use somsq_core::PhoneKey;
use std::time::Duration;
use url::Url;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
// The endpoint expects the search filters to be present even when unused.
const EMPTY_FILTERS: [&str; 6] = ["nombre", "evento", "estado", "calle", "colonia", "cp"];

#[derive(Debug, Clone)]
pub struct LookupSettings {
    pub base_url: String,
    pub id_usuario: String,
    pub timeout: Duration,
    pub verify_tls: bool,
    pub user_agent: String,
}

/// Blocking client for the SOMS customer search endpoint.
#[derive(Debug, Clone)]
pub struct SomsClient {
    base_url: Url,
    id_usuario: String,
    client: Client,
}

impl SomsClient {
    pub fn new(settings: LookupSettings) -> Result<Self> {
        let base_url = Url::parse(settings.base_url.trim())?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(LookupError::InvalidBaseUrl(format!(
                "{} (expected http or https)",
                settings.base_url
            )));
        }
        let client = Client::builder()
            .user_agent(settings.user_agent)
            .timeout(settings.timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(settings.timeout))
            .danger_accept_invalid_certs(!settings.verify_tls)
            .build()?;
        Ok(Self {
            base_url,
            id_usuario: settings.id_usuario,
            client,
        })
    }
}

impl LookupSource for SomsClient {
    fn lookup_url(&self, key: &PhoneKey) -> Result<String> {
        Ok(build_lookup_url(&self.base_url, &self.id_usuario, key).into())
    }

    fn fetch(&self, url: &str) -> Result<LookupResponse> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(LookupResponse { status, body })
    }
}

pub fn build_lookup_url(base_url: &Url, id_usuario: &str, key: &PhoneKey) -> Url {
    let mut url = base_url.clone();
    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("lada", key.area_code())
            .append_pair("telefono", key.subscriber_number())
            .append_pair("idUsuario", id_usuario);
        for filter in EMPTY_FILTERS {
            query.append_pair(filter, "");
        }
    }
    url
}
