use crate::{LookupError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Raw phone tokens in input order, read on demand.
pub type PhoneTokens = Box<dyn Iterator<Item = Result<String>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Txt,
    Csv,
}

pub fn detect_input_kind(path: &Path, forced: Option<InputKind>) -> InputKind {
    if let Some(kind) = forced {
        return kind;
    }
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => InputKind::Csv,
        _ => InputKind::Txt,
    }
}

pub fn open_phone_input(path: &Path, kind: InputKind, phone_field: &str) -> Result<PhoneTokens> {
    match kind {
        InputKind::Txt => txt_tokens(path),
        InputKind::Csv => csv_tokens(path, phone_field),
    }
}

fn txt_tokens(path: &Path) -> Result<PhoneTokens> {
    let reader = BufReader::new(File::open(path)?);
    let tokens = reader.split(b'\n').filter_map(|line| match line {
        Ok(bytes) => non_blank(&bytes).map(Ok),
        Err(err) => Some(Err(LookupError::from(err))),
    });
    Ok(Box::new(tokens))
}

fn csv_tokens(path: &Path, phone_field: &str) -> Result<PhoneTokens> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|header| lossy_trim(header).trim_start_matches('\u{feff}').to_string())
        .collect();
    let Some(column) = headers.iter().position(|header| header == phone_field) else {
        return Err(LookupError::MissingColumn {
            column: phone_field.to_string(),
            headers: headers.join(", "),
        });
    };

    let tokens = reader
        .into_byte_records()
        .filter_map(move |record| match record {
            Ok(record) => record.get(column).and_then(non_blank).map(Ok),
            Err(err) => Some(Err(LookupError::from(err))),
        });
    Ok(Box::new(tokens))
}

fn non_blank(bytes: &[u8]) -> Option<String> {
    let value = lossy_trim(bytes);
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn lossy_trim(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::{detect_input_kind, open_phone_input, InputKind};
    use crate::LookupError;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn collect(path: &Path, kind: InputKind, field: &str) -> Vec<String> {
        open_phone_input(path, kind, field)
            .expect("open input")
            .collect::<Result<Vec<_>, _>>()
            .expect("read input")
    }

    #[test]
    fn detects_kind_from_extension() {
        assert_eq!(detect_input_kind(Path::new("phones.CSV"), None), InputKind::Csv);
        assert_eq!(detect_input_kind(Path::new("phones.txt"), None), InputKind::Txt);
        assert_eq!(detect_input_kind(Path::new("phones"), None), InputKind::Txt);
        assert_eq!(
            detect_input_kind(Path::new("phones.txt"), Some(InputKind::Csv)),
            InputKind::Csv
        );
    }

    #[test]
    fn txt_input_skips_blank_lines() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("phones.txt");
        fs::write(&path, " 9811111111 \r\n\n   \n(614) 02-22222\n").expect("write");

        let tokens = collect(&path, InputKind::Txt, "unused");
        assert_eq!(tokens, ["9811111111", "(614) 02-22222"]);
    }

    #[test]
    fn txt_input_tolerates_invalid_utf8() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("phones.txt");
        fs::write(&path, b"98111\xff11111\n").expect("write");

        let tokens = collect(&path, InputKind::Txt, "unused");
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].starts_with("98111"));
    }

    #[test]
    fn csv_input_reads_named_column() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("phones.csv");
        fs::write(
            &path,
            "\u{feff}id,valor_medio_contacto,canal\n1,981 111 1111,tel\n2,,tel\n3, 5512345678 ,tel\n",
        )
        .expect("write");

        let tokens = collect(&path, InputKind::Csv, "valor_medio_contacto");
        assert_eq!(tokens, ["981 111 1111", "5512345678"]);
    }

    #[test]
    fn csv_input_reports_missing_column() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("phones.csv");
        fs::write(&path, "id,telefono\n1,9811111111\n").expect("write");

        let err = match open_phone_input(&path, InputKind::Csv, "valor_medio_contacto") {
            Ok(_) => panic!("expected missing column"),
            Err(err) => err,
        };
        match err {
            LookupError::MissingColumn { column, headers } => {
                assert_eq!(column, "valor_medio_contacto");
                assert_eq!(headers, "id, telefono");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
