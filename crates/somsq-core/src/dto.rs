use crate::domain::{CanonicalPhone, CustomerRecord, ExtractMode, PhoneKey};

pub const LOG_COLUMNS: [&str; 13] = [
    "registrado_en",
    "telefono_raw",
    "telefono_digits",
    "telefono_11",
    "lada",
    "telefono_8",
    "request_url",
    "http_status",
    "ok",
    "ids_encontrados",
    "nombres_encontrados",
    "extraidos",
    "error",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    pub telefono_entrada: String,
    pub telefono_11: String,
    pub lada: String,
    pub telefono_8: String,
    pub id_cliente: Option<String>,
    pub nombre_completo: Option<String>,
}

impl OutputRow {
    pub fn new(raw_phone: &str, phone: &CanonicalPhone, key: &PhoneKey) -> Self {
        Self {
            telefono_entrada: raw_phone.to_string(),
            telefono_11: phone.as_str().to_string(),
            lada: key.area_code().to_string(),
            telefono_8: key.subscriber_number().to_string(),
            id_cliente: None,
            nombre_completo: None,
        }
    }

    /// Cells in the column order of [`ExtractMode::output_columns`].
    pub fn to_record(&self, mode: ExtractMode) -> Vec<&str> {
        let mut record = vec![
            self.telefono_entrada.as_str(),
            self.telefono_11.as_str(),
            self.lada.as_str(),
            self.telefono_8.as_str(),
        ];
        if mode.includes_id() {
            record.push(self.id_cliente.as_deref().unwrap_or(""));
        }
        if mode.includes_name() {
            record.push(self.nombre_completo.as_deref().unwrap_or(""));
        }
        record
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResult {
    pub phone_key: PhoneKey,
    pub records: Vec<CustomerRecord>,
    pub http_status: Option<u16>,
    pub succeeded: bool,
    pub error_detail: Option<String>,
}

impl LookupResult {
    pub fn succeeded(phone_key: PhoneKey, http_status: u16, records: Vec<CustomerRecord>) -> Self {
        Self {
            phone_key,
            records,
            http_status: Some(http_status),
            succeeded: true,
            error_detail: None,
        }
    }

    pub fn failed(phone_key: PhoneKey, http_status: Option<u16>, detail: impl Into<String>) -> Self {
        Self {
            phone_key,
            records: Vec::new(),
            http_status,
            succeeded: false,
            error_detail: Some(detail.into()),
        }
    }
}

/// Audit record written for every input token, whatever happened to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogEntry {
    pub logged_at: String,
    pub raw_phone: String,
    pub digits: String,
    pub phone_11: Option<String>,
    pub area_code: Option<String>,
    pub subscriber_number: Option<String>,
    pub request_url: Option<String>,
    pub http_status: Option<u16>,
    pub ok: bool,
    pub ids_found: usize,
    pub names_found: usize,
    pub extracted: String,
    pub error: Option<String>,
}

impl LogEntry {
    pub fn new(logged_at: impl Into<String>, raw_phone: &str, digits: &str) -> Self {
        Self {
            logged_at: logged_at.into(),
            raw_phone: raw_phone.to_string(),
            digits: digits.to_string(),
            ..Default::default()
        }
    }

    pub fn record_phone(&mut self, phone: &CanonicalPhone, key: &PhoneKey) {
        self.phone_11 = Some(phone.as_str().to_string());
        self.area_code = Some(key.area_code().to_string());
        self.subscriber_number = Some(key.subscriber_number().to_string());
    }

    /// Cells in the column order of [`LOG_COLUMNS`].
    pub fn to_record(&self) -> Vec<String> {
        vec![
            self.logged_at.clone(),
            self.raw_phone.clone(),
            self.digits.clone(),
            self.phone_11.clone().unwrap_or_default(),
            self.area_code.clone().unwrap_or_default(),
            self.subscriber_number.clone().unwrap_or_default(),
            self.request_url.clone().unwrap_or_default(),
            self.http_status.map(|status| status.to_string()).unwrap_or_default(),
            if self.ok { "1" } else { "0" }.to_string(),
            self.ids_found.to_string(),
            self.names_found.to_string(),
            self.extracted.clone(),
            self.error.clone().unwrap_or_default(),
        ]
    }
}
