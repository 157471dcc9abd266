use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// declares a typed identifier over a String so that ids of different
/// entity kinds cannot be confused at compile time.
macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new<S: Into<String>>(id: S) -> $name {
                $name(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> $name {
                $name(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> $name {
                $name(value)
            }
        }
    };
}

id_type!(
    /// identifies a node in the network.
    NodeId
);
id_type!(
    /// identifies a link in the network.
    LinkId
);
id_type!(
    /// identifies a transit stop facility.
    StopId
);
id_type!(
    /// identifies a transit line.
    LineId
);
id_type!(
    /// identifies a transit route within a line.
    RouteId
);
id_type!(
    /// identifies a departure within a route.
    DepartureId
);
id_type!(
    /// identifies a transit vehicle.
    VehicleId
);
id_type!(
    /// identifies a transit vehicle type.
    VehicleTypeId
);
