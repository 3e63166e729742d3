use clap::builder::ArgAction;
use common::error::Error;
use std::ffi::OsString;
use std::path::PathBuf;

pub const USAGE: &str = "Usage: alerter [options] <configfile>";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub help: bool,
    /// --dry-run: メールを送らず本文を stdout に出し、キャッシュも更新しない
    pub dry_run: bool,
    /// --json-log: ログファイルを JSONL にする（コンソールは通常の 1 行のまま）
    pub json_log: bool,
    pub config_file: Option<PathBuf>,
}

fn build_clap_command() -> clap::Command {
    clap::Command::new("alerter")
        .about("Email new alerts from an Elasticsearch alerting index")
        .disable_help_flag(true)
        .arg(
            clap::Arg::new("help")
                .short('h')
                .long("help")
                .help("Show this help message")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("dry-run")
                .long("dry-run")
                .help("Print the message instead of sending it and leave the cache untouched")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("json-log")
                .long("json-log")
                .help("Write the log file as JSON lines (the console keeps plain lines)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("configfile")
                .value_name("configfile")
                .help("Path to the JSON configuration file")
                .value_parser(clap::value_parser!(PathBuf))
                .num_args(1),
        )
}

/// 引数列を解析する（先頭はプログラム名）
pub fn parse_args_from<I, T>(args: I) -> Result<Config, Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_clap_command()
        .try_get_matches_from(args)
        .map_err(|e| Error::invalid_argument(e.to_string().trim_end().to_string()))?;

    let config = Config {
        help: matches.get_flag("help"),
        dry_run: matches.get_flag("dry-run"),
        json_log: matches.get_flag("json-log"),
        config_file: matches.get_one::<PathBuf>("configfile").cloned(),
    };
    if !config.help && config.config_file.is_none() {
        return Err(Error::invalid_argument(USAGE));
    }
    Ok(config)
}
