use crate::domain::{collapse_whitespace, CustomerRecord};
use serde_json::Value;
use std::collections::HashSet;
use std::slice;

pub const RESPONSE_CONTAINER: &str = "BusquedaClienteResponse";
pub const CLIENTS_FIELD: &str = "Clientes";
pub const SOMS_DATA_FIELD: &str = "DatosSOMS";
pub const CUSTOMER_ID_FIELD: &str = "IdCliente";
/// Given names first, then paternal and maternal surnames.
pub const NAME_FIELDS: [&str; 4] = ["Nombre1", "Nombre2", "Ap-Pat", "Ap-Mat"];

/// Walks `BusquedaClienteResponse.Clientes[].DatosSOMS`. Any missing step
/// means no customers matched.
pub fn extract_customers(payload: &Value) -> Vec<CustomerRecord> {
    let Some(clients) = payload
        .get(RESPONSE_CONTAINER)
        .and_then(|container| container.get(CLIENTS_FIELD))
    else {
        return Vec::new();
    };

    let clients: &[Value] = match clients {
        Value::Array(items) => items,
        Value::Object(_) => slice::from_ref(clients),
        _ => return Vec::new(),
    };

    clients
        .iter()
        .filter_map(|client| client.get(SOMS_DATA_FIELD))
        .filter(|data| data.is_object())
        .map(customer_from_soms)
        .collect()
}

fn customer_from_soms(data: &Value) -> CustomerRecord {
    let id = field_text(data, CUSTOMER_ID_FIELD);
    let parts: Vec<String> = NAME_FIELDS
        .iter()
        .filter_map(|field| field_text(data, field))
        .collect();
    CustomerRecord::new(id.as_deref(), parts.iter().map(String::as_str))
}

fn field_text(data: &Value, field: &str) -> Option<String> {
    let text = match data.get(field)? {
        Value::String(value) => collapse_whitespace(value),
        Value::Number(value) => value.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Drops records repeating an earlier id and name; names compare case-insensitively.
pub fn dedupe_records(records: Vec<CustomerRecord>) -> Vec<CustomerRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| {
            let key = (
                record.id.clone(),
                record.full_name.as_ref().map(|name| name.to_lowercase()),
            );
            seen.insert(key)
        })
        .collect()
}
