use crate::domain::{CanonicalPhone, CustomerRecord, ExtractMode, PhoneKey};
use crate::dto::OutputRow;

pub const SUMMARY_PAIR_LIMIT: usize = 10;

pub fn build_rows(
    key: &PhoneKey,
    phone: &CanonicalPhone,
    raw_phone: &str,
    records: &[CustomerRecord],
    mode: ExtractMode,
) -> Vec<OutputRow> {
    let fields: Vec<(Option<&str>, Option<&str>)> = match mode {
        ExtractMode::IdCliente => records
            .iter()
            .filter_map(|record| record.id.as_deref())
            .map(|id| (Some(id), None))
            .collect(),
        ExtractMode::Nombre => records
            .iter()
            .filter_map(|record| record.full_name.as_deref())
            .map(|name| (None, Some(name)))
            .collect(),
        ExtractMode::Ambos => combined_fields(records),
    };

    fields
        .into_iter()
        .map(|(id, name)| {
            let mut row = OutputRow::new(raw_phone, phone, key);
            row.id_cliente = id.map(str::to_string);
            row.nombre_completo = name.map(str::to_string);
            row
        })
        .collect()
}

// Equal id and name counts are not enough to pair across records: an id-only
// client next to a name-only client are two customers, so each keeps its own.
fn combined_fields(records: &[CustomerRecord]) -> Vec<(Option<&str>, Option<&str>)> {
    records
        .iter()
        .filter(|record| record.has_id() || record.has_full_name())
        .map(|record| (record.id.as_deref(), record.full_name.as_deref()))
        .collect()
}

/// Short text for the log's `extraidos` column.
pub fn summarize_rows(rows: &[OutputRow], mode: ExtractMode) -> String {
    match mode {
        ExtractMode::IdCliente => rows
            .iter()
            .filter_map(|row| row.id_cliente.as_deref())
            .collect::<Vec<_>>()
            .join("|"),
        ExtractMode::Nombre => rows
            .iter()
            .filter_map(|row| row.nombre_completo.as_deref())
            .collect::<Vec<_>>()
            .join("|"),
        ExtractMode::Ambos => rows
            .iter()
            .take(SUMMARY_PAIR_LIMIT)
            .map(|row| {
                format!(
                    "{}::{}",
                    row.id_cliente.as_deref().unwrap_or(""),
                    row.nombre_completo.as_deref().unwrap_or("")
                )
            })
            .collect::<Vec<_>>()
            .join("|"),
    }
}
