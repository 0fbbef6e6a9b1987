use std::path::PathBuf;

use clap::Parser;

/// Compiler of Open Street Map data from osm xml format to validated csv tables
#[derive(Debug, Parser)]
#[clap(about, version, author)]
pub struct Args {
    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Input OSM xml file
    pub input: PathBuf,

    /// Output directory for the csv tables
    #[clap(required_unless_present = "audit")]
    pub output: Option<PathBuf>,

    /// Whether to validate every record and the uniqueness of ids
    #[clap(long = "validate")]
    pub validate: bool,

    /// Only audit the input and print a report of street and key types
    #[clap(long = "audit", conflicts_with_all = ["validate", "db"])]
    pub audit: bool,

    /// Load the converted csv tables into a new SQLite database
    #[clap(long = "db")]
    pub db: Option<PathBuf>,
}
