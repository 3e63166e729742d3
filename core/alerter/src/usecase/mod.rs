//! ユースケース（パイプラインの各段とその順序）

pub mod dedup;
pub mod diagnostics;
pub mod ingest;
pub mod pipeline;

pub use diagnostics::Diagnostics;
pub use pipeline::AlertPipeline;
