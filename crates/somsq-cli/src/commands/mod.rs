use anyhow::{Context as _, Result};
use serde::Serialize;
use somsq_config::AppConfig;
use somsq_lookup::{detect_input_kind, open_phone_input, InputKind, PhoneTokens};
use std::io::{self, Write};
use std::path::Path;

pub mod completions;
pub mod normalize;
pub mod run;

pub struct Context<'a> {
    pub json: bool,
    pub config: &'a AppConfig,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum InputKindArg {
    Txt,
    Csv,
}

impl From<InputKindArg> for InputKind {
    fn from(kind: InputKindArg) -> Self {
        match kind {
            InputKindArg::Txt => InputKind::Txt,
            InputKindArg::Csv => InputKind::Csv,
        }
    }
}

pub fn open_input(
    path: &Path,
    kind: Option<InputKindArg>,
    phone_field: &str,
) -> Result<PhoneTokens> {
    let kind = detect_input_kind(path, kind.map(InputKind::from));
    open_phone_input(path, kind, phone_field)
        .with_context(|| format!("open input {}", path.display()))
}
