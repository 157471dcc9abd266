//! GTFS scenario preparation operations for the transim simulation.
use std::path::Path;

use chrono::NaiveDate;
use clap::{value_parser, Subcommand};
use serde::{Deserialize, Serialize};
use transim_core::model::Scenario;
use transim_core::plausibility::CorrectionReport;

use crate::feed::{self, FeedSummary};
use crate::prepare::{self, CoordinateTransformPolicy, PrepareConfig, PrepareError};

#[derive(Debug, Clone, Serialize, Deserialize, Subcommand)]
pub enum PrepOperation {
    /// convert a GTFS archive into a cleaned transit scenario
    Convert {
        /// a GTFS zip archive or extracted directory
        #[arg(long)]
        feed: String,
        /// reference date selecting the active service calendar entries
        #[arg(long, value_parser = value_parser!(NaiveDate))]
        date: NaiveDate,
        /// prefix for synthesized link ids, kept distinct from any road
        /// network the scenario may be embedded into
        #[arg(long, default_value_t = String::from("pt_"))]
        link_prefix: String,
        /// merge stops at identical transformed coordinates into one
        /// facility
        #[arg(long, default_value_t = false)]
        merge_stops: bool,
        #[arg(long, value_enum, default_value_t = CoordinateTransformPolicy::Equirectangular)]
        transform: CoordinateTransformPolicy,
        /// optional directory receiving a json dump of the prepared
        /// scenario and the correction report
        #[arg(long)]
        output_directory: Option<String>,
    },
    /// print size and date-coverage information for a GTFS archive
    Summary {
        /// a GTFS zip archive or extracted directory
        #[arg(long)]
        feed: String,
    },
}

impl PrepOperation {
    pub fn run(&self) -> Result<(), PrepareError> {
        match self {
            PrepOperation::Convert {
                feed,
                date,
                link_prefix,
                merge_stops,
                transform,
                output_directory,
            } => {
                let config = PrepareConfig {
                    feed: feed.clone(),
                    date: *date,
                    link_prefix: link_prefix.clone(),
                    merge_stops: *merge_stops,
                    transform: transform.clone(),
                };
                let (scenario, report) = prepare::run(&config)?;
                log::info!(
                    "prepared scenario: {} stop facilities, {} transit lines, {} links, {} vehicles",
                    scenario.schedule.facilities.len(),
                    scenario.schedule.lines.len(),
                    scenario.network.links.len(),
                    scenario.vehicles.vehicles.len()
                );
                if let Some(directory) = output_directory {
                    write_outputs(directory, &scenario, &report)?;
                }
                Ok(())
            }
            PrepOperation::Summary { feed } => {
                let gtfs = feed::load_feed(feed)?;
                let summary = FeedSummary::new(&gtfs);
                println!("{summary}");
                Ok(())
            }
        }
    }
}

/// writes the prepared scenario and its correction report as json files.
/// persistence is a caller concern; the pipeline itself only returns the
/// in-memory scenario.
fn write_outputs(
    directory: &str,
    scenario: &Scenario,
    report: &CorrectionReport,
) -> Result<(), PrepareError> {
    let directory = Path::new(directory);
    std::fs::create_dir_all(directory).map_err(|e| {
        PrepareError::PrepApp(format!(
            "unable to create output directory '{}': {e}",
            directory.display()
        ))
    })?;

    let scenario_json = serde_json::to_string_pretty(scenario)
        .map_err(|e| PrepareError::PrepApp(format!("failure serializing scenario: {e}")))?;
    std::fs::write(directory.join("scenario.json"), scenario_json)
        .map_err(|e| PrepareError::PrepApp(format!("failed writing scenario: {e}")))?;

    let report_json = serde_json::to_string_pretty(report).map_err(|e| {
        PrepareError::PrepApp(format!("failure serializing correction report: {e}"))
    })?;
    std::fs::write(directory.join("correction-report.json"), report_json)
        .map_err(|e| PrepareError::PrepApp(format!("failed writing correction report: {e}")))?;

    Ok(())
}
