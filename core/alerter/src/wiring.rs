//! 配線: 設定と標準アダプタで App を組み立てる

use std::sync::Arc;

use common::adapter::{FileJsonLog, LineLog, StdClock};
use common::error::Error;
use common::ports::outbound::{FileSystem, Log};

use crate::adapter::{
    AlerterConfig, DryRunMailTransport, ElasticSearch, FileAlertCacheStore,
    ReadOnlyAlertCacheStore, SmtpMailTransport,
};
use crate::cli::Config;
use crate::ports::outbound::{AlertCacheStore, MailTransport};
use crate::usecase::AlertPipeline;

/// main が使う組み立て済みの部品
pub struct App {
    pub logger: Arc<dyn Log>,
    pub pipeline: AlertPipeline,
}

/// 設定ファイルの log_file へ書く logger
pub fn wire_logger(fs: Arc<dyn FileSystem>, settings: &AlerterConfig, cli: &Config) -> Arc<dyn Log> {
    if cli.json_log {
        Arc::new(FileJsonLog::new(fs, &settings.log_file).with_console())
    } else {
        Arc::new(LineLog::new(fs, &settings.log_file))
    }
}

/// 配線: 標準アダプタで AlertPipeline を組み立てる
pub fn wire_alerter(
    fs: Arc<dyn FileSystem>,
    settings: AlerterConfig,
    cli: &Config,
) -> Result<App, Error> {
    let logger = wire_logger(Arc::clone(&fs), &settings, cli);
    let search = Arc::new(ElasticSearch::new(&settings.search)?);

    let file_store: Arc<dyn AlertCacheStore> =
        Arc::new(FileAlertCacheStore::new(Arc::clone(&fs), &settings.cache_file));
    let (cache_store, mailer): (Arc<dyn AlertCacheStore>, Arc<dyn MailTransport>) = if cli.dry_run {
        (
            Arc::new(ReadOnlyAlertCacheStore::new(file_store)),
            Arc::new(DryRunMailTransport),
        )
    } else {
        (
            file_store,
            Arc::new(SmtpMailTransport::new(settings.mail.clone(), Arc::clone(&logger))),
        )
    };

    let pipeline = AlertPipeline::new(
        search,
        cache_store,
        mailer,
        Arc::new(StdClock),
        settings.mail.envelope,
    );
    Ok(App { logger, pipeline })
}
