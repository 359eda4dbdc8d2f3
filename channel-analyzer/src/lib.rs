pub mod batch;
pub mod summary;
pub mod tabular;

pub use batch::{BatchAnalyzer, BatchConfig, BatchHalt, BatchOutcome, Progress, SkipNotice};
pub use summary::CategorySummary;
pub use tabular::{default_export_file_name, read_url_file, records_to_csv, write_csv};
