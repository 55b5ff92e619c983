use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use vna_marker::color::generate_palette;
use vna_marker::data::loader::load_file;
use vna_marker::marker::fields::parse_field_list;
use vna_marker::{Marker, MarkerSession, MarkerSettings, MetricKey, MetricValue};

/// Print marker readouts for a swept measurement.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Sweep file (.parquet, .json or .csv)
    sweep: PathBuf,

    /// Marker frequency such as 14.2M or 144000000; repeat for more markers
    #[arg(short, long = "marker", required = true)]
    markers: Vec<String>,

    /// JSON settings file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Comma-separated readout fields, overriding the settings file
    #[arg(long)]
    fields: Option<String>,

    /// Print the readouts as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Serialize)]
struct Row {
    key: MetricKey,
    value: MetricValue,
}

#[derive(Serialize)]
struct MarkerReport<'a> {
    name: &'a str,
    color: String,
    target_freq: u64,
    resolved_index: Option<usize>,
    prev_freq: Option<u64>,
    next_freq: Option<u64>,
    fields: Vec<Row>,
}

impl<'a> From<&'a Marker> for MarkerReport<'a> {
    fn from(marker: &'a Marker) -> Self {
        MarkerReport {
            name: marker.name(),
            color: marker.color().to_string(),
            target_freq: marker.target_freq(),
            resolved_index: marker.resolved_index(),
            prev_freq: marker.prev_freq(),
            next_freq: marker.next_freq(),
            fields: marker
                .readout()
                .into_iter()
                .map(|(key, value)| Row { key, value })
                .collect(),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut settings = match &cli.settings {
        Some(path) => MarkerSettings::load(path)?,
        None => MarkerSettings::default(),
    };
    if let Some(fields) = &cli.fields {
        settings.fields = parse_field_list(fields).context("parsing --fields")?;
    }

    let sweep = load_file(&cli.sweep)
        .with_context(|| format!("loading sweep {}", cli.sweep.display()))?;

    let mut session = MarkerSession::new(settings);
    session.set_sweep(sweep);
    for (i, (freq, color)) in cli
        .markers
        .iter()
        .zip(generate_palette(cli.markers.len()))
        .enumerate()
    {
        session.add_marker_with(format!("Marker {}", i + 1), color, freq);
    }

    if cli.json {
        let reports: Vec<MarkerReport> = session.markers().iter().map(MarkerReport::from).collect();
        println!("{}", serde_json::to_string_pretty(&reports).context("encoding readouts")?);
        return Ok(());
    }

    for marker in session.markers() {
        print_marker(marker);
    }
    Ok(())
}

fn print_marker(marker: &Marker) {
    let Some(index) = marker.resolved_index() else {
        println!(
            "{} ({}) @ {} Hz: not within the sweep",
            marker.name(),
            marker.color(),
            marker.target_freq()
        );
        return;
    };

    let neighbour = |f: Option<u64>| f.map_or_else(|| "-".to_string(), |f| f.to_string());
    println!(
        "{} ({}) @ {} Hz -> point {index} [prev {}, next {}]",
        marker.name(),
        marker.color(),
        marker.target_freq(),
        neighbour(marker.prev_freq()),
        neighbour(marker.next_freq()),
    );
    for (key, value) in marker.readout() {
        println!("  {:<16} {value}", format!("{}:", key.info().name));
    }
}
