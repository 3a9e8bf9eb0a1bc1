use crate::source::LookupSource;
use crate::Result;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use somsq_core::{
    build_rows, dedupe_records, extract_customers, normalize_phone, phone_digits, summarize_rows,
    ExtractMode, LogEntry, LookupResult, OutputRow, PhoneKey,
};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const PROGRESS_EVERY: usize = 25;
pub const ERROR_BODY_LIMIT: usize = 200;

/// Receives each phone's rows and log entry once the phone is done.
pub trait BatchSink {
    fn write_rows(&mut self, rows: &[OutputRow]) -> Result<()>;
    fn write_log(&mut self, entry: &LogEntry) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub mode: ExtractMode,
    pub delay: Duration,
    pub max: Option<usize>,
    pub dedupe: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneState {
    Rejected,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone)]
pub struct PhoneOutcome {
    pub state: PhoneState,
    pub rows: Vec<OutputRow>,
    pub log: LogEntry,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub processed: usize,
    pub rejected: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub rows_written: usize,
}

impl BatchReport {
    fn record(&mut self, outcome: &PhoneOutcome) {
        self.processed += 1;
        self.rows_written += outcome.rows.len();
        match outcome.state {
            PhoneState::Rejected => self.rejected += 1,
            PhoneState::Succeeded => self.succeeded += 1,
            PhoneState::Failed => self.failed += 1,
        }
    }
}

/// Processes phones one at a time. Per-phone failures end up in the log;
/// only input and sink errors stop the run.
pub fn run_batch<S, K, I>(
    source: &S,
    sink: &mut K,
    phones: I,
    options: &BatchOptions,
) -> Result<BatchReport>
where
    S: LookupSource,
    K: BatchSink,
    I: IntoIterator<Item = Result<String>>,
{
    let mut report = BatchReport::default();
    let mut phones = phones.into_iter().peekable();

    loop {
        if cap_reached(&report, options) {
            debug!(processed = report.processed, "phone cap reached");
            break;
        }
        let Some(raw) = phones.next() else {
            break;
        };
        let raw = raw?;

        let outcome = process_phone(source, &raw, options);
        sink.write_rows(&outcome.rows)?;
        sink.write_log(&outcome.log)?;
        report.record(&outcome);

        if report.processed % PROGRESS_EVERY == 0 {
            info!(processed = report.processed, "progress");
        }

        let more = phones.peek().is_some() && !cap_reached(&report, options);
        if more && !options.delay.is_zero() {
            thread::sleep(options.delay);
        }
    }

    Ok(report)
}

fn cap_reached(report: &BatchReport, options: &BatchOptions) -> bool {
    options.max.is_some_and(|max| report.processed >= max)
}

pub fn process_phone<S: LookupSource>(
    source: &S,
    raw: &str,
    options: &BatchOptions,
) -> PhoneOutcome {
    let mut log = LogEntry::new(now_rfc3339(), raw, &phone_digits(raw));

    let phone = match normalize_phone(raw) {
        Ok(phone) => phone,
        Err(err) => {
            warn!(phone = raw, error = %err, "skipping phone");
            log.error = Some(format!("skipped: {err}"));
            return PhoneOutcome {
                state: PhoneState::Rejected,
                rows: Vec::new(),
                log,
            };
        }
    };
    let key = phone.split();
    log.record_phone(&phone, &key);

    let url = match source.lookup_url(&key) {
        Ok(url) => url,
        Err(err) => {
            log.error = Some(err.to_string());
            return failed(log);
        }
    };
    info!(phone = %phone, url = %url, "lookup");
    log.request_url = Some(url.clone());

    let result = query(source, &url, key);
    log.http_status = result.http_status;
    if !result.succeeded {
        warn!(phone = %phone, status = ?result.http_status, "lookup failed");
        log.error = result.error_detail;
        return failed(log);
    }

    let records = if options.dedupe {
        dedupe_records(result.records)
    } else {
        result.records
    };
    let rows = build_rows(&result.phone_key, &phone, raw, &records, options.mode);
    log.ok = true;
    log.ids_found = records.iter().filter(|record| record.has_id()).count();
    log.names_found = records.iter().filter(|record| record.has_full_name()).count();
    log.extracted = summarize_rows(&rows, options.mode);
    debug!(phone = %phone, records = records.len(), rows = rows.len(), "lookup succeeded");

    PhoneOutcome {
        state: PhoneState::Succeeded,
        rows,
        log,
    }
}

fn query<S: LookupSource>(source: &S, url: &str, key: PhoneKey) -> LookupResult {
    let response = match source.fetch(url) {
        Ok(response) => response,
        Err(err) => return LookupResult::failed(key, None, err.to_string()),
    };
    if !(200..300).contains(&response.status) {
        let detail = error_body(&response.body, response.status);
        return LookupResult::failed(key, Some(response.status), detail);
    }
    match serde_json::from_str::<Value>(&response.body) {
        Ok(payload) => LookupResult::succeeded(key, response.status, extract_customers(&payload)),
        Err(err) => LookupResult::failed(
            key,
            Some(response.status),
            format!("response is not JSON: {err}"),
        ),
    }
}

fn error_body(body: &str, status: u16) -> String {
    let snippet: String = body.trim().chars().take(ERROR_BODY_LIMIT).collect();
    if snippet.is_empty() {
        format!("http status {status}")
    } else {
        snippet
    }
}

fn failed(log: LogEntry) -> PhoneOutcome {
    PhoneOutcome {
        state: PhoneState::Failed,
        rows: Vec::new(),
        log,
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
