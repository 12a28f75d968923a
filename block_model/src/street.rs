use std::fmt;

use serde::{Deserialize, Serialize};

use geom::Distance;

/// The classification carried by every street segment. Anything the input calls something else
/// becomes `Unclassified`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreetType {
    Primary,
    Secondary,
    Tertiary,
    Residential,
    Service,
    Footway,
    Cycleway,
    Path,
    Pedestrian,
    #[serde(other)]
    Unclassified,
}

impl Default for StreetType {
    fn default() -> Self {
        StreetType::Unclassified
    }
}

impl StreetType {
    /// The full right-of-way width typical for this kind of street. None means there's no
    /// sensible default and the global one applies.
    pub fn default_width(self) -> Option<Distance> {
        let meters = match self {
            StreetType::Primary => 24.0,
            StreetType::Secondary => 18.0,
            StreetType::Tertiary => 16.0,
            StreetType::Residential => 14.0,
            StreetType::Service => 10.0,
            StreetType::Footway => 3.0,
            StreetType::Cycleway => 5.0,
            StreetType::Path => 1.5,
            StreetType::Pedestrian => 6.0,
            StreetType::Unclassified => {
                return None;
            }
        };
        Some(Distance::meters(meters))
    }
}

impl fmt::Display for StreetType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            StreetType::Primary => "primary",
            StreetType::Secondary => "secondary",
            StreetType::Tertiary => "tertiary",
            StreetType::Residential => "residential",
            StreetType::Service => "service",
            StreetType::Footway => "footway",
            StreetType::Cycleway => "cycleway",
            StreetType::Path => "path",
            StreetType::Pedestrian => "pedestrian",
            StreetType::Unclassified => "unclassified",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_types_are_unclassified() {
        let parsed: Vec<StreetType> =
            serde_json::from_str(r#"["primary", "footway", "motorway_link"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![
                StreetType::Primary,
                StreetType::Footway,
                StreetType::Unclassified
            ]
        );
        assert!(StreetType::Unclassified.default_width().is_none());
        assert_eq!(StreetType::Path.default_width(), Some(Distance::meters(1.5)));
    }
}
