use citation_calendar::config::AppConfig;
use citation_calendar::error::AppError;
use citation_calendar::ingest::{write_daily_records, EventLogImporter};
use clap::Args;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Default)]
pub(crate) struct ProcessArgs {
    /// Directory of raw `<state>_<city>_*.csv` event logs (defaults to CITATION_SOURCE_DIR)
    #[arg(long)]
    pub(crate) source_dir: Option<PathBuf>,
    /// Destination for the processed daily CSV (defaults to CITATION_OUTPUT_PATH)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

pub(crate) fn run_process(args: ProcessArgs, config: &AppConfig) -> Result<(), AppError> {
    let ProcessArgs { source_dir, output } = args;
    let source_dir = source_dir.unwrap_or_else(|| config.pipeline.source_dir.clone());
    let output = output.unwrap_or_else(|| config.pipeline.output_path.clone());

    let importer = EventLogImporter::new(config.fiscal.convention_table());
    let records = importer.import_directory(&source_dir)?;
    write_daily_records(&output, &records)?;

    let jurisdictions: BTreeSet<_> = records.iter().map(|record| record.jurisdiction()).collect();
    let stops: u64 = records
        .iter()
        .map(|record| u64::from(record.total_activity))
        .sum();
    info!(
        records = records.len(),
        jurisdictions = jurisdictions.len(),
        output = %output.display(),
        "wrote processed daily records"
    );

    println!(
        "Processed {} stops into {} daily records across {} jurisdictions",
        stops,
        records.len(),
        jurisdictions.len()
    );
    for jurisdiction in &jurisdictions {
        let convention = importer.conventions().convention_for(jurisdiction);
        println!("- {} ({})", jurisdiction, convention.label());
    }
    println!("Output: {}", output.display());

    Ok(())
}
