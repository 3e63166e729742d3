mod adapter;
mod cli;
mod domain;
mod ports;
mod usecase;
mod wiring;


use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use adapter::config::DEFAULT_LOG_FILE;
use adapter::load_config;
use cli::{parse_args_from, Config};
use common::adapter::{LineLog, StdFileSystem};
use common::error::Error;
use common::ports::outbound::{FileSystem, Log, LogRecord};
use ports::inbound::UseCaseRunner;
use usecase::Diagnostics;
use wiring::{wire_alerter, App};

/// パイプラインを 1 回実行し、開始・終了をログに残す Runner
struct Runner {
    app: App,
    config_file: PathBuf,
}

impl UseCaseRunner for Runner {
    fn run(&self) -> Result<i32, Error> {
        let _ = self.app.logger.log(
            &LogRecord::info("run started")
                .layer("cli")
                .kind("lifecycle")
                .field(
                    "config",
                    serde_json::json!(self.config_file.display().to_string()),
                ),
        );

        let mut diag = Diagnostics::new(Arc::clone(&self.app.logger));
        let result = self.app.pipeline.run(&mut diag);

        let code = match &result {
            Ok(_) => 0,
            Err(e) => e.exit_code(),
        };
        if let Err(ref e) = result {
            let _ = self
                .app
                .logger
                .log(&LogRecord::error(e.to_string()).layer("cli").kind("error"));
        }
        let mut finished = LogRecord::info("run finished")
            .layer("cli")
            .kind("lifecycle")
            .field("exit_code", serde_json::json!(code));
        if let Ok(summary) = &result {
            finished = finished
                .field("fetched", serde_json::json!(summary.fetched))
                .field("delivered", serde_json::json!(summary.delivered))
                .field("cached", serde_json::json!(summary.cached))
                .field("errors", serde_json::json!(summary.errors));
        }
        let _ = self.app.logger.log(&finished);

        result.map(|_| 0)
    }
}

fn main() {
    let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);
    let exit_code = match run(std::env::args_os(), fs) {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                eprintln!("{}", e);
            } else {
                eprintln!("alerter: {}", e);
            }
            e.exit_code()
        }
    };
    process::exit(exit_code);
}

pub fn run<I, T>(args: I, fs: Arc<dyn FileSystem>) -> Result<i32, Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = parse_args_from(args)?;
    if cli.help {
        print_help();
        return Ok(0);
    }
    let config_file = cli
        .config_file
        .clone()
        .ok_or_else(|| Error::invalid_argument(cli::USAGE))?;

    let app = match start(Arc::clone(&fs), &config_file, &cli) {
        Ok(app) => app,
        Err(e) => {
            // 設定の log_file はまだ分からないので既定のログファイルへ
            let log = LineLog::new(fs, DEFAULT_LOG_FILE).without_console();
            let _ = log.log(&LogRecord::error(e.to_string()).layer("cli").kind("error"));
            return Err(e);
        }
    };
    Runner { app, config_file }.run()
}

fn start(fs: Arc<dyn FileSystem>, config_file: &Path, cli: &Config) -> Result<App, Error> {
    let settings = load_config(fs.as_ref(), config_file)?;
    wire_alerter(fs, settings, cli)
}

fn print_help() {
    println!("{}", cli::USAGE);
    println!("Options:");
    println!("  -h, --help       Show this help message");
    println!("  --dry-run        Print the message instead of sending it; the alert cache is not updated");
    println!("  --json-log       Write the log file as JSON lines; console output stays plain");
    println!();
    println!("Description:");
    println!("  Query the alerting index, drop alerts already listed in the alert cache,");
    println!("  email the remaining ones and add every fetched alert to the cache.");
    println!();
    println!("Files (relative to the working directory unless configured):");
    println!("  alerter_cache.txt   Alerts already triggered, one per line");
    println!("  alerter.log         Run log");
}
