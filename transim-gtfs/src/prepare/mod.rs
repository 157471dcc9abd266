//! the preparation pipeline: load feed, convert to schedule, synthesize a
//! pseudo network, generate a vehicle fleet, then correct implausible data.
//! strictly linear and single-threaded; collaborator failures propagate
//! unmodified.

mod prepare_error;
mod pseudo_network;
mod schedule_converter;
pub mod service_day;
mod transform_policy;
mod vehicle_fleet;

pub use prepare_error::PrepareError;
pub use pseudo_network::PseudoNetworkBuilder;
pub use schedule_converter::GtfsScheduleConverter;
pub use transform_policy::CoordinateTransformPolicy;
pub use vehicle_fleet::VehicleFleetGenerator;

use chrono::NaiveDate;
use transim_core::model::{Network, Scenario, TransitSchedule, TransitVehicles};
use transim_core::plausibility::{correct_scenario, CorrectionReport};

use crate::feed;

/// capability: populate a scenario's transit schedule from a loaded feed.
pub trait ScheduleConverter {
    fn convert(&self, scenario: &mut Scenario) -> Result<(), PrepareError>;
}

/// capability: derive a network hosting the schedule's stop facilities.
pub trait NetworkSynthesizer {
    fn synthesize(
        &self,
        schedule: &mut TransitSchedule,
        network: &mut Network,
    ) -> Result<(), PrepareError>;
}

/// capability: derive a vehicle fleet serving the schedule's departures.
pub trait VehicleGenerator {
    fn generate(
        &self,
        schedule: &mut TransitSchedule,
        vehicles: &mut TransitVehicles,
    ) -> Result<(), PrepareError>;
}

/// configuration of one preparation run.
#[derive(Debug, Clone)]
pub struct PrepareConfig {
    /// path to a GTFS zip archive or extracted directory
    pub feed: String,
    /// reference date selecting which service calendar entries are active
    pub date: NaiveDate,
    /// prefix for synthesized link ids
    pub link_prefix: String,
    /// if true, stops at identical transformed coordinates merge into one
    /// facility
    pub merge_stops: bool,
    /// projection applied to stop coordinates
    pub transform: CoordinateTransformPolicy,
}

/// loads the feed and runs the preparation pipeline with the default
/// collaborators.
pub fn run(config: &PrepareConfig) -> Result<(Scenario, CorrectionReport), PrepareError> {
    let gtfs = feed::load_feed(&config.feed)?;
    let transform = config.transform.build(&gtfs);
    let converter =
        GtfsScheduleConverter::new(&gtfs, config.date, config.merge_stops, transform.as_ref());
    let synthesizer = PseudoNetworkBuilder::new(config.link_prefix.as_str());
    let fleet = VehicleFleetGenerator::default();
    prepare_scenario(&converter, &synthesizer, &fleet)
}

/// sequences the fixed pipeline over a fresh scenario: convert, synthesize,
/// generate, zero out vehicle type pcu values, correct. the scenario is
/// returned together with the correction outcome.
pub fn prepare_scenario(
    converter: &dyn ScheduleConverter,
    synthesizer: &dyn NetworkSynthesizer,
    fleet: &dyn VehicleGenerator,
) -> Result<(Scenario, CorrectionReport), PrepareError> {
    let mut scenario = Scenario::default();

    converter.convert(&mut scenario)?;

    {
        let Scenario {
            network, schedule, ..
        } = &mut scenario;
        synthesizer.synthesize(schedule, network)?;
    }

    {
        let Scenario {
            schedule, vehicles, ..
        } = &mut scenario;
        fleet.generate(schedule, vehicles)?;
    }

    // transit vehicles must not consume general road capacity in the
    // pseudo-network model
    for vehicle_type in scenario.vehicles.vehicle_types.values_mut() {
        log::debug!("setting pcu equivalents of vehicle type {} to 0", vehicle_type.id);
        vehicle_type.pcu_equivalents = 0.0;
    }

    let report = {
        let Scenario {
            network, schedule, ..
        } = &mut scenario;
        correct_scenario(network, schedule)
    };
    log::info!(
        "plausibility correction: {} links repaired, {} stops removed, {} lines removed, {} dangling stop references",
        report.repaired_links.len(),
        report.removed_stops.len(),
        report.removed_lines.len(),
        report.dangling_references.len()
    );

    Ok((scenario, report))
}
