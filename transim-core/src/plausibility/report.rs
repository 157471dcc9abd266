use serde::{Deserialize, Serialize};

use crate::model::{LineId, LinkId, StopId};

/// records one link whose implausible length was overwritten in place.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LinkRepair {
    pub link: LinkId,
    pub old_length: f64,
}

/// records one route stop reference whose facility id was already absent
/// from the schedule before correction ran. these are detected and reported
/// but do not cause the referencing line to be removed.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DanglingReference {
    pub line: LineId,
    pub stop: StopId,
}

/// the outcome of one plausibility correction pass over a scenario.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct CorrectionReport {
    pub repaired_links: Vec<LinkRepair>,
    pub removed_stops: Vec<StopId>,
    pub removed_lines: Vec<LineId>,
    pub dangling_references: Vec<DanglingReference>,
}

impl CorrectionReport {
    /// true if the pass neither repaired nor removed nor flagged anything.
    pub fn is_clean(&self) -> bool {
        self.repaired_links.is_empty()
            && self.removed_stops.is_empty()
            && self.removed_lines.is_empty()
            && self.dangling_references.is_empty()
    }
}
