use crate::commands::{open_input, print_json, Context, InputKindArg};
use crate::error::invalid_input;
use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;
use somsq_core::ExtractMode;
use somsq_lookup::{run_batch, BatchOptions, BatchReport, CsvBatchSink, LookupSettings, SomsClient};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Phone list: one per line, or a CSV with a phone column
    #[arg(long)]
    pub input: PathBuf,
    #[arg(long, value_enum)]
    pub input_kind: Option<InputKindArg>,
    /// CSV column holding the phone (default: valor_medio_contacto)
    #[arg(long)]
    pub phone_field: Option<String>,
    #[arg(long, value_enum)]
    pub extract: Option<ExtractArg>,
    #[arg(long)]
    pub output: Option<PathBuf>,
    #[arg(long)]
    pub log: Option<PathBuf>,
    /// Seconds to wait between phones
    #[arg(long)]
    pub sleep: Option<u64>,
    /// Request timeout in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
    #[arg(long, conflicts_with = "no_verify_tls")]
    pub verify_tls: bool,
    /// Skip certificate checks even if the config enables them
    #[arg(long)]
    pub no_verify_tls: bool,
    /// Process at most N phones (0 = all)
    #[arg(long, default_value_t = 0)]
    pub max: usize,
    #[arg(long)]
    pub base_url: Option<String>,
    #[arg(long)]
    pub id_usuario: Option<String>,
    /// Drop repeated customers within one response
    #[arg(long)]
    pub dedupe: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ExtractArg {
    #[value(name = "id_cliente")]
    IdCliente,
    Nombre,
    Ambos,
}

impl From<ExtractArg> for ExtractMode {
    fn from(mode: ExtractArg) -> Self {
        match mode {
            ExtractArg::IdCliente => ExtractMode::IdCliente,
            ExtractArg::Nombre => ExtractMode::Nombre,
            ExtractArg::Ambos => ExtractMode::Ambos,
        }
    }
}

#[derive(Debug, Serialize)]
struct RunSummary {
    mode: ExtractMode,
    #[serde(flatten)]
    report: BatchReport,
    output: String,
    log: String,
}

impl RunArgs {
    fn verify_tls_override(&self) -> Option<bool> {
        if self.no_verify_tls {
            Some(false)
        } else if self.verify_tls {
            Some(true)
        } else {
            None
        }
    }
}

pub fn run_lookup(ctx: &Context<'_>, args: RunArgs) -> Result<()> {
    let config = ctx.config;
    let verify_tls = args
        .verify_tls_override()
        .unwrap_or(config.lookup.verify_tls);
    let base_url = args
        .base_url
        .or_else(|| config.lookup.base_url.clone())
        .ok_or_else(|| invalid_input("missing base url: pass --base-url or set lookup.base_url"))?;
    let id_usuario = args
        .id_usuario
        .or_else(|| config.lookup.id_usuario.clone())
        .ok_or_else(|| {
            invalid_input("missing user id: pass --id-usuario or set lookup.id_usuario")
        })?;
    let mode = args.extract.map(ExtractMode::from).unwrap_or(config.extract);
    let phone_field = args
        .phone_field
        .unwrap_or_else(|| config.phone_field.clone());
    let output = args.output.unwrap_or_else(|| config.output.clone());
    let log = args.log.unwrap_or_else(|| config.log.clone());
    let options = BatchOptions {
        mode,
        delay: Duration::from_secs(args.sleep.unwrap_or(config.sleep_secs)),
        max: (args.max > 0).then_some(args.max),
        dedupe: args.dedupe || config.dedupe,
    };

    let mut phones = open_input(&args.input, args.input_kind, &phone_field)?.peekable();
    if phones.peek().is_none() {
        return Err(invalid_input(format!(
            "no phones found in {}",
            args.input.display()
        )));
    }

    let client = SomsClient::new(LookupSettings {
        base_url,
        id_usuario,
        timeout: Duration::from_secs(args.timeout.unwrap_or(config.lookup.timeout_secs)),
        verify_tls,
        user_agent: config.lookup.user_agent.clone(),
    })
    .with_context(|| "configure lookup client")?;
    let mut sink = CsvBatchSink::create(&output, &log, mode).with_context(|| {
        format!(
            "create output {} and log {}",
            output.display(),
            log.display()
        )
    })?;

    info!(input = %args.input.display(), mode = %mode, "starting lookups");
    let report = run_batch(&client, &mut sink, phones, &options).with_context(|| "run lookups")?;

    let summary = RunSummary {
        mode,
        report,
        output: output.display().to_string(),
        log: log.display().to_string(),
    };
    if ctx.json {
        return print_json(&summary);
    }

    let report = &summary.report;
    println!(
        "Processed {} phones: {} succeeded, {} failed, {} skipped; {} rows written",
        report.processed, report.succeeded, report.failed, report.rejected, report.rows_written
    );
    println!("Output: {}", summary.output);
    println!("Log: {}", summary.log);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::RunArgs;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(flatten)]
        run: RunArgs,
    }

    fn parse(extra: &[&str]) -> Result<RunArgs, clap::Error> {
        let args = ["somsq", "--input", "phones.txt"].iter().chain(extra);
        Harness::try_parse_from(args).map(|harness| harness.run)
    }

    #[test]
    fn tls_flags_override_config_either_way() {
        assert_eq!(parse(&[]).unwrap().verify_tls_override(), None);
        assert_eq!(
            parse(&["--verify-tls"]).unwrap().verify_tls_override(),
            Some(true)
        );
        assert_eq!(
            parse(&["--no-verify-tls"]).unwrap().verify_tls_override(),
            Some(false)
        );
    }

    #[test]
    fn tls_flags_conflict() {
        assert!(parse(&["--verify-tls", "--no-verify-tls"]).is_err());
    }
}
