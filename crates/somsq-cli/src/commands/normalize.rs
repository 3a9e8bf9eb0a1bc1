use crate::commands::{open_input, print_json, Context, InputKindArg};
use crate::error::invalid_input;
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use somsq_core::{normalize_phone, phone_digits};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct NormalizeArgs {
    #[arg(long)]
    pub input: PathBuf,
    #[arg(long, value_enum)]
    pub input_kind: Option<InputKindArg>,
    #[arg(long)]
    pub phone_field: Option<String>,
    /// Show at most N phones (0 = all)
    #[arg(long, default_value_t = 0)]
    pub max: usize,
}

#[derive(Debug, Serialize)]
struct NormalizedPhone {
    telefono_entrada: String,
    telefono_digits: String,
    telefono_11: Option<String>,
    lada: Option<String>,
    telefono_8: Option<String>,
    error: Option<String>,
}

impl NormalizedPhone {
    fn from_raw(raw: String) -> Self {
        let digits = phone_digits(&raw);
        match normalize_phone(&raw) {
            Ok(phone) => {
                let key = phone.split();
                Self {
                    telefono_entrada: raw,
                    telefono_digits: digits,
                    telefono_11: Some(phone.to_string()),
                    lada: Some(key.area_code().to_string()),
                    telefono_8: Some(key.subscriber_number().to_string()),
                    error: None,
                }
            }
            Err(err) => Self {
                telefono_entrada: raw,
                telefono_digits: digits,
                telefono_11: None,
                lada: None,
                telefono_8: None,
                error: Some(err.to_string()),
            },
        }
    }
}

pub fn normalize_input(ctx: &Context<'_>, args: NormalizeArgs) -> Result<()> {
    let phone_field = args
        .phone_field
        .unwrap_or_else(|| ctx.config.phone_field.clone());
    let limit = if args.max > 0 { args.max } else { usize::MAX };

    let mut phones = Vec::new();
    for raw in open_input(&args.input, args.input_kind, &phone_field)?.take(limit) {
        phones.push(NormalizedPhone::from_raw(raw?));
    }
    if phones.is_empty() {
        return Err(invalid_input(format!(
            "no phones found in {}",
            args.input.display()
        )));
    }

    if ctx.json {
        return print_json(&phones);
    }

    for phone in &phones {
        match (&phone.telefono_11, &phone.lada, &phone.telefono_8) {
            (Some(full), Some(lada), Some(local)) => {
                println!("{}\t{}\t{}\t{}", phone.telefono_entrada, full, lada, local)
            }
            _ => println!(
                "{}\tskipped: {}",
                phone.telefono_entrada,
                phone.error.as_deref().unwrap_or("invalid phone")
            ),
        }
    }
    let valid = phones.iter().filter(|phone| phone.error.is_none()).count();
    println!("{} of {} phones valid", valid, phones.len());
    Ok(())
}
