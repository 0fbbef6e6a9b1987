mod args;
mod db;
mod osmxml;
mod sink;
mod stats;

use crate::args::Args;
use crate::osmxml::OsmXmlReader;
use crate::sink::CsvSink;
use crate::stats::Stats;

use clap::Parser;
use colored::*;
use log::info;
use osmrel::{Audit, AuditReport, RecordShaper, RecordValidator};
use pbr::{ProgressBar, Units};

use std::io::Stdout;
use std::path::Path;
use std::time::Duration;

type Error = Box<dyn std::error::Error>;

fn progress_bar(input: &Path, message: &str) -> Result<ProgressBar<Stdout>, Error> {
    let len = std::fs::metadata(input)?.len();
    let mut pb = ProgressBar::new(len);
    pb.set_units(Units::Bytes);
    pb.set_max_refresh_rate(Some(Duration::from_millis(100)));
    pb.message(message);
    Ok(pb)
}

fn audit(input: &Path) -> Result<AuditReport, Error> {
    let mut reader = OsmXmlReader::from_path(input)?;
    let mut audit = Audit::default();
    let mut pb = progress_bar(input, "Auditing records... ")?;

    #[allow(clippy::while_let_on_iterator)]
    while let Some(record) = reader.next() {
        audit.observe(&record?)?;
        pb.set(reader.position() as u64);
    }
    pb.finish();

    let report = audit.finish()?;
    info!("All records are valid.");
    Ok(report)
}

fn convert(input: &Path, output: &Path, validate: bool) -> Result<Stats, Error> {
    let mut reader = OsmXmlReader::from_path(input)?;
    let mut sink = CsvSink::create(output)?;
    let shaper = RecordShaper::default();
    let mut validator = if validate {
        Some(RecordValidator::default())
    } else {
        None
    };
    info!("Initialized csv tables at: {}", output.display());

    let mut stats = Stats::default();
    let mut pb = progress_bar(input, "Converting records... ")?;

    #[allow(clippy::while_let_on_iterator)]
    while let Some(record) = reader.next() {
        let record = record?;
        if let Some(validator) = validator.as_mut() {
            validator.validate(&record)?;
        }
        let shaped = shaper.shape(&record)?;
        sink.write(&shaped.element)?;
        stats += Stats::from(&shaped);
        pb.set(reader.position() as u64);
    }
    pb.finish();
    sink.flush()?;
    info!("Records converted.");

    if let Some(validator) = validator {
        validator.finish()?;
        info!("Verified that ids are unique.");
    }
    Ok(stats)
}

fn run(args: Args) -> Result<(), Error> {
    if args.audit {
        let report = audit(&args.input)?;
        println!("{report}");
        return Ok(());
    }

    let output = args.output.as_deref().ok_or("missing output directory")?;
    let stats = convert(&args.input, output, args.validate)?;
    println!("{stats}");

    if let Some(db_path) = &args.db {
        db::load(output, db_path)?;
        info!("Loaded csv tables into: {}", db_path.display());
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    let level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_module_path(false)
        .format_timestamp_nanos()
        .init();

    if let Err(e) = run(args) {
        eprintln!("{}: {}", "Error".red(), e);
        std::process::exit(1);
    }
}
