use serde_json::Value;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

// 2024-03-01 20:00:00 UTC
const MARCH_FIRST_2024: i64 = 1_709_323_200;
const DAY: i64 = 86_400;

struct CliTestEnv {
    _temp_dir: TempDir,
    base: PathBuf,
    home: PathBuf,
    xdg_config: PathBuf,
    xdg_state: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let home = base.join("home");
        let xdg_config = base.join("xdg-config");
        let xdg_state = base.join("xdg-state");

        fs::create_dir_all(&home).expect("failed to create HOME");
        fs::create_dir_all(&xdg_config).expect("failed to create XDG_CONFIG_HOME");
        fs::create_dir_all(&xdg_state).expect("failed to create XDG_STATE_HOME");

        let env = Self {
            _temp_dir: temp_dir,
            base,
            home,
            xdg_config,
            xdg_state,
        };
        env.write("records.json", &seed_records().to_string());
        env
    }

    fn path(&self, name: &str) -> PathBuf {
        self.base.join(name)
    }

    fn write(&self, name: &str, content: &str) -> String {
        let path = self.path(name);
        fs::write(&path, content).expect("failed to write fixture");
        path.to_string_lossy().into_owned()
    }

    fn records(&self) -> String {
        self.path("records.json").to_string_lossy().into_owned()
    }

    fn write_config(&self, content: &str) {
        let dir = self.xdg_config.join("recap");
        fs::create_dir_all(&dir).expect("failed to create config dir");
        fs::write(dir.join("config.toml"), content).expect("failed to write config");
    }
}

fn seed_records() -> Value {
    serde_json::json!([
        {
            "historyKey": 1,
            "ratingKey": "heat",
            "title": "Heat",
            "type": "movie",
            "viewedAt": MARCH_FIRST_2024,
            "accountId": 1,
            "librarySectionId": 1,
            "duration": 6000,
            "genres": "[\"Crime\",\"Drama\"]",
            "releaseYear": 1995
        },
        {
            "historyKey": 2,
            "ratingKey": "dark-1x01",
            "title": "Secrets",
            "type": "episode",
            "viewedAt": MARCH_FIRST_2024 + 7200,
            "accountId": 1,
            "librarySectionId": 2,
            "duration": 1800,
            "grandparentTitle": "Dark",
            "grandparentRatingKey": "dark"
        },
        {
            "historyKey": 3,
            "ratingKey": "heat",
            "title": "Heat",
            "type": "movie",
            "viewedAt": MARCH_FIRST_2024 + DAY,
            "accountId": 2,
            "librarySectionId": 1,
            "duration": 6000
        },
        {
            "historyKey": 4,
            "ratingKey": "heat",
            "title": "Heat",
            "type": "movie",
            "viewedAt": MARCH_FIRST_2024 - 120 * DAY,
            "accountId": 1,
            "librarySectionId": 1,
            "duration": 6000
        }
    ])
}

fn run_bin(env: &CliTestEnv, args: &[&str]) -> Output {
    let bin_path = PathBuf::from(assert_cmd::cargo::cargo_bin!("recap-wrapped"));

    Command::new(bin_path)
        .args(args)
        .env("HOME", &env.home)
        .env("XDG_CONFIG_HOME", &env.xdg_config)
        .env("XDG_STATE_HOME", &env.xdg_state)
        .output()
        .unwrap_or_else(|e| panic!("failed to execute recap-wrapped: {e}"))
}

fn assert_success(args: &[&str], output: &Output) {
    if output.status.success() {
        return;
    }

    let rendered_args = args
        .iter()
        .map(|arg| OsString::from(arg).to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    panic!(
        "recap-wrapped {rendered_args} failed with status {:?}\nstdout:\n{stdout}\nstderr:\n{stderr}",
        output.status.code()
    );
}

fn run_ok(env: &CliTestEnv, args: &[&str]) -> String {
    let output = run_bin(env, args);
    assert_success(args, &output);
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn server_json_export_is_a_server_payload() {
    let env = CliTestEnv::new();
    let records = env.records();
    let stdout = run_ok(
        &env,
        &["--records", &records, "--year", "2024", "--export", "json"],
    );

    let payload: Value = serde_json::from_str(stdout.trim()).expect("stdout is JSON");
    assert!(payload.get("userId").is_none());
    assert_eq!(payload["totalUsers"], 2);
    assert_eq!(payload["totalPlays"], 3);
    assert_eq!(payload["totalMinutes"], 230);
    assert_eq!(payload["topMovies"][0]["title"], "Heat");
    assert_eq!(payload["topMovies"][0]["count"], 2);
    assert_eq!(payload["yearComparison"]["lastYear"], 100);
    assert_eq!(payload["yearComparison"]["percentChange"], 130.0);
}

#[test]
fn user_json_export_scopes_to_one_account() {
    let env = CliTestEnv::new();
    let records = env.records();
    let stdout = run_ok(
        &env,
        &[
            "--records", &records, "--year", "2024", "--user", "1", "--export", "json",
        ],
    );

    let payload: Value = serde_json::from_str(stdout.trim()).expect("stdout is JSON");
    assert_eq!(payload["userId"], 1);
    assert!(payload.get("totalUsers").is_none());
    assert_eq!(payload["totalPlays"], 2);
    assert_eq!(payload["totalMinutes"], 130);
    assert_eq!(payload["percentileRank"], 50.0);
    assert_eq!(payload["seriesCompletion"][0]["show"], "Dark");
}

#[test]
fn episode_totals_and_account_names_are_applied() {
    let env = CliTestEnv::new();
    let records = env.records();
    let totals = env.write("totals.json", r#"{"dark": 26}"#);
    let accounts = env.write("accounts.json", r#"{"1": "alice", "2": "bob"}"#);

    let user = run_ok(
        &env,
        &[
            "--records",
            &records,
            "--year",
            "2024",
            "--user",
            "1",
            "--episode-totals",
            &totals,
            "--export",
            "json",
        ],
    );
    let user: Value = serde_json::from_str(user.trim()).expect("stdout is JSON");
    assert_eq!(user["seriesCompletion"][0]["totalEpisodes"], 26);
    assert_eq!(user["seriesCompletion"][0]["percentComplete"], 4);

    let server = run_ok(
        &env,
        &[
            "--records",
            &records,
            "--year",
            "2024",
            "--accounts",
            &accounts,
            "--export",
            "json",
        ],
    );
    let server: Value = serde_json::from_str(server.trim()).expect("stdout is JSON");
    let viewers: Vec<&str> = server["topViewers"]
        .as_array()
        .expect("topViewers is an array")
        .iter()
        .filter_map(|v| v["title"].as_str())
        .collect();
    assert_eq!(viewers, vec!["alice", "bob"]);
}

#[test]
fn exported_payload_validates() {
    let env = CliTestEnv::new();
    let records = env.records();
    let stdout = run_ok(
        &env,
        &["--records", &records, "--year", "2024", "--export", "json"],
    );
    let payload = env.write("payload.json", stdout.trim());

    let validated = run_ok(&env, &["--validate", &payload]);
    assert!(
        validated.contains("valid server stats for 2024 (3h 50m)"),
        "unexpected validate output: {validated}"
    );
}

#[test]
fn validate_rejects_payload_without_discriminant() {
    let env = CliTestEnv::new();
    let payload = env.write("bad.json", r#"{"year": 2024}"#);

    let output = run_bin(&env, &["--validate", &payload]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid stats payload"), "stderr: {stderr}");
}

#[test]
fn terminal_and_markdown_reports_render() {
    let env = CliTestEnv::new();
    let records = env.records();

    let terminal = run_ok(&env, &["--records", &records, "--year", "2024", "--user", "1"]);
    assert!(terminal.contains("YOUR 2024 WRAPPED"));
    assert!(terminal.contains("TOP MOVIES"));
    assert!(terminal.contains("Heat"));
    assert!(terminal.contains("Busiest month: March"));

    let markdown = run_ok(
        &env,
        &["--records", &records, "--year", "2024", "--export", "md"],
    );
    assert!(markdown.contains("# Server Wrapped 2024"));
    assert!(markdown.contains("| Viewers | 2 |"));
    assert!(markdown.contains("1. **Heat** - 2 plays"));
}

#[test]
fn empty_year_reports_no_plays() {
    let env = CliTestEnv::new();
    let records = env.records();
    let stdout = run_ok(&env, &["--records", &records, "--year", "2019"]);
    assert!(stdout.contains("No plays found for this year."));
}

#[test]
fn year_at_lower_bound_fails_cleanly() {
    let env = CliTestEnv::new();
    let records = env.records();
    let output = run_bin(&env, &["--records", &records, "--year=-2147483648"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("is out of range"), "stderr: {stderr}");
    assert!(!stderr.contains("panicked"), "stderr: {stderr}");
}

#[test]
fn unknown_export_format_fails() {
    let env = CliTestEnv::new();
    let records = env.records();
    let output = run_bin(
        &env,
        &["--records", &records, "--year", "2024", "--export", "pdf"],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown export format"), "stderr: {stderr}");
}

#[test]
fn config_limits_apply_and_zero_limits_fail() {
    let env = CliTestEnv::new();
    let records = env.records();

    env.write_config("[wrapped]\ntop_movies_count = 1\n");
    let stdout = run_ok(
        &env,
        &["--records", &records, "--year", "2024", "--export", "json"],
    );
    let payload: Value = serde_json::from_str(stdout.trim()).expect("stdout is JSON");
    assert_eq!(payload["topMovies"].as_array().map(Vec::len), Some(1));

    env.write_config("[wrapped]\ntop_movies_count = 0\n");
    let output = run_bin(
        &env,
        &["--records", &records, "--year", "2024", "--export", "json"],
    );
    assert!(!output.status.success());
}

#[test]
fn missing_records_file_fails() {
    let env = CliTestEnv::new();
    let missing = env.path("nope.json").to_string_lossy().into_owned();
    let output = run_bin(&env, &["--records", &missing, "--year", "2024"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read records file"), "stderr: {stderr}");
}
