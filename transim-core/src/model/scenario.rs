use serde::{Deserialize, Serialize};

use super::{Network, TransitSchedule, TransitVehicles};

/// aggregate root of one preparation run: the synthesized network, the
/// transit schedule, and the generated vehicle fleet. created empty, mutated
/// in place by the pipeline, and returned by value to the caller.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Scenario {
    pub network: Network,
    pub schedule: TransitSchedule,
    pub vehicles: TransitVehicles,
}
