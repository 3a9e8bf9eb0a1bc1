use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::Output;
use tempfile::TempDir;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn run_somsq(config_home: &Path, args: &[&str]) -> Output {
    cargo_bin_cmd!("somsq")
        .env("XDG_CONFIG_HOME", config_home)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("run command")
}

fn run_ok(config_home: &Path, args: &[&str]) -> String {
    let output = run_somsq(config_home, args);
    assert!(output.status.success(), "command failed: {:?}", output);
    String::from_utf8(output.stdout).expect("utf8")
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("utf8 path")
}

#[test]
fn normalize_reports_each_phone() {
    let temp = TempDir::new().expect("temp dir");
    let input = temp.path().join("phones.txt");
    fs::write(&input, "9811111111\n(614) 02-2222\n\n55 1234 5678 9\n").expect("write input");

    let stdout = run_ok(
        temp.path(),
        &["--json", "normalize", "--input", path_str(&input)],
    );
    let phones: Value = serde_json::from_str(&stdout).expect("parse json");
    let phones = phones.as_array().expect("array");
    assert_eq!(phones.len(), 3);
    assert_eq!(phones[0]["telefono_11"], "09811111111");
    assert_eq!(phones[0]["lada"], "098");
    assert_eq!(phones[0]["telefono_8"], "11111111");
    assert!(phones[1]["telefono_11"].is_null());
    assert_eq!(phones[1]["telefono_digits"], "614022222");
    assert_eq!(phones[1]["error"], "invalid phone length: 9 digits");
    assert_eq!(phones[2]["telefono_11"], "55123456789");
}

#[test]
fn run_requires_base_url() {
    let temp = TempDir::new().expect("temp dir");
    let input = temp.path().join("phones.txt");
    fs::write(&input, "9811111111\n").expect("write input");

    let output = run_somsq(
        temp.path(),
        &["run", "--input", path_str(&input), "--id-usuario", "QA01"],
    );
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.contains("missing base url"));
}

#[test]
fn run_rejects_empty_input() {
    let temp = TempDir::new().expect("temp dir");
    let input = temp.path().join("phones.txt");
    fs::write(&input, "\n  \n").expect("write input");

    let output = run_somsq(
        temp.path(),
        &[
            "run",
            "--input",
            path_str(&input),
            "--base-url",
            "http://127.0.0.1:9/soms",
            "--id-usuario",
            "QA01",
        ],
    );
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn run_logs_rejected_phones_without_querying() {
    let temp = TempDir::new().expect("temp dir");
    let input = temp.path().join("phones.csv");
    let out = temp.path().join("out.csv");
    let log = temp.path().join("log.csv");
    fs::write(&input, "valor_medio_contacto\n(614) 02-2222\n123\n").expect("write input");

    let stdout = run_ok(
        temp.path(),
        &[
            "--json",
            "run",
            "--input",
            path_str(&input),
            "--output",
            path_str(&out),
            "--log",
            path_str(&log),
            "--base-url",
            "http://127.0.0.1:9/soms",
            "--id-usuario",
            "QA01",
            "--sleep",
            "0",
        ],
    );
    let summary: Value = serde_json::from_str(&stdout).expect("parse json");
    assert_eq!(summary["processed"], 2);
    assert_eq!(summary["rejected"], 2);
    assert_eq!(summary["rows_written"], 0);

    let out = fs::read_to_string(out).expect("read output");
    assert_eq!(out, "telefono_entrada,telefono_11,lada,telefono_8,id_cliente\n");
    let log = fs::read_to_string(log).expect("read log");
    let lines: Vec<_> = log.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains("skipped: invalid phone length: 9 digits"));
}

#[tokio::test(flavor = "multi_thread")]
async fn run_enriches_phones_from_lookup_service() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("telefono", "11111111"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "BusquedaClienteResponse": {
                "Clientes": [
                    { "DatosSOMS": { "IdCliente": "0069657104" } },
                    { "DatosSOMS": { "Nombre1": "Ligia", "Ap-Pat": "Caballero" } }
                ]
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("telefono", "22222222"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let temp = TempDir::new().expect("temp dir");
    let input = temp.path().join("phones.txt");
    let out = temp.path().join("out.csv");
    let log = temp.path().join("log.csv");
    fs::write(&input, "981-111-1111\n55 2222 2222\n").expect("write input");

    let base_url = format!("{}/soms", server.uri());
    let args: Vec<String> = vec![
        "run".into(),
        "--input".into(),
        path_str(&input).into(),
        "--output".into(),
        path_str(&out).into(),
        "--log".into(),
        path_str(&log).into(),
        "--extract".into(),
        "ambos".into(),
        "--base-url".into(),
        base_url,
        "--id-usuario".into(),
        "QA01".into(),
        "--sleep".into(),
        "0".into(),
    ];
    let config_home = temp.path().to_path_buf();
    let output = tokio::task::spawn_blocking(move || {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        run_somsq(&config_home, &args)
    })
    .await
    .expect("join");
    assert!(output.status.success(), "command failed: {:?}", output);

    let out = fs::read_to_string(out).expect("read output");
    let rows: Vec<_> = out.lines().collect();
    assert_eq!(
        rows,
        [
            "telefono_entrada,telefono_11,lada,telefono_8,id_cliente,nombre_completo",
            "981-111-1111,09811111111,098,11111111,0069657104,",
            "981-111-1111,09811111111,098,11111111,,Ligia Caballero",
        ]
    );

    let log = fs::read_to_string(log).expect("read log");
    let entries: Vec<_> = log.lines().skip(1).collect();
    assert_eq!(entries.len(), 2);
    assert!(entries[0].contains(",200,1,1,1,0069657104::|::Ligia Caballero,"));
    assert!(entries[1].contains(",200,1,0,0,,"));
}
