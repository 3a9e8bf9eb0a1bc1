use serde::{Deserialize, Serialize};
use std::fmt;

pub const BASE_OUTPUT_COLUMNS: [&str; 4] = ["telefono_entrada", "telefono_11", "lada", "telefono_8"];
pub const ID_COLUMN: &str = "id_cliente";
pub const NAME_COLUMN: &str = "nombre_completo";

/// Which customer fields end up in the output table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractMode {
    #[default]
    IdCliente,
    Nombre,
    Ambos,
}

impl ExtractMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ExtractMode::IdCliente => "id_cliente",
            ExtractMode::Nombre => "nombre",
            ExtractMode::Ambos => "ambos",
        }
    }

    pub fn includes_id(self) -> bool {
        matches!(self, ExtractMode::IdCliente | ExtractMode::Ambos)
    }

    pub fn includes_name(self) -> bool {
        matches!(self, ExtractMode::Nombre | ExtractMode::Ambos)
    }

    pub fn output_columns(self) -> Vec<&'static str> {
        let mut columns = BASE_OUTPUT_COLUMNS.to_vec();
        if self.includes_id() {
            columns.push(ID_COLUMN);
        }
        if self.includes_name() {
            columns.push(NAME_COLUMN);
        }
        columns
    }
}

impl fmt::Display for ExtractMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
