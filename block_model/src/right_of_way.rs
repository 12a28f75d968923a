use std::collections::BTreeMap;

use geom::Distance;

use crate::{StreetType, WidthTable};

/// Used when nothing else knows how wide a street is.
pub const GLOBAL_DEFAULT_WIDTH: Distance = Distance::const_meters(14.0);

/// Streets missing from the parcel-derived width table, measured by hand.
const OVERRIDES: [(&str, f64); 17] = [
    ("South Tucker Boulevard", 14.0),
    ("Gravois Avenue", 6.0),
    ("Officer David Haynes Memorial Highway", 14.0),
    ("Russell Boulevard", 16.0),
    ("South 13th Street", 12.0),
    ("Papin Street", 13.0),
    ("Geyer Avenue", 9.0),
    ("Allen Avenue", 9.0),
    ("Ohio Avenue", 8.0),
    ("Ann Avenue", 9.0),
    ("McNair Avenue", 9.0),
    ("Caroline Street", 5.0),
    ("Serbian Drive", 8.0),
    ("South 12th Street", 5.0),
    ("South 17th Street", 6.0),
    ("Josephine Street", 6.0),
    ("21st Street Cycle Track", 5.0),
];

/// Resolves the full right-of-way width of a street. The layers are consulted in order, and the
/// first one with a positive answer wins:
///
/// 1. the width table document, by exact name
/// 2. the built-in override table, by exact name
/// 3. the default for the street's type
/// 4. `GLOBAL_DEFAULT_WIDTH`
pub struct RightOfWay {
    table: BTreeMap<String, Distance>,
    overrides: BTreeMap<String, Distance>,
}

impl RightOfWay {
    pub fn new(widths: &WidthTable) -> RightOfWay {
        let mut table = BTreeMap::new();
        for (name, width) in &widths.street_widths {
            if width.is_finite() && *width > 0.0 {
                table.insert(name.clone(), Distance::meters(*width));
            } else {
                warn!("Ignoring non-positive width {} for {}", width, name);
            }
        }
        RightOfWay {
            table,
            overrides: OVERRIDES
                .iter()
                .map(|(name, width)| (name.to_string(), Distance::meters(*width)))
                .collect(),
        }
    }

    /// Only the built-in overrides and type defaults.
    pub fn without_table() -> RightOfWay {
        RightOfWay::new(&WidthTable::default())
    }

    /// Always positive.
    pub fn resolve(&self, name: Option<&str>, street_type: StreetType) -> Distance {
        name.and_then(|name| self.lookup_name(name))
            .or_else(|| street_type.default_width())
            .unwrap_or(GLOBAL_DEFAULT_WIDTH)
    }

    /// Just the name-based layers.
    pub fn lookup_name(&self, name: &str) -> Option<Distance> {
        self.table
            .get(name)
            .or_else(|| self.overrides.get(name))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layered_lookup() {
        let mut widths = WidthTable::default();
        widths
            .street_widths
            .insert("Ann Avenue".to_string(), 11.0);
        widths
            .street_widths
            .insert("Lemp Avenue".to_string(), 12.5);
        widths.street_widths.insert("Broken Street".to_string(), 0.0);
        let row = RightOfWay::new(&widths);

        // The table beats the overrides
        assert_eq!(
            row.resolve(Some("Ann Avenue"), StreetType::Residential),
            Distance::meters(11.0)
        );
        assert_eq!(
            row.resolve(Some("Lemp Avenue"), StreetType::Primary),
            Distance::meters(12.5)
        );
        assert_eq!(
            row.resolve(Some("Gravois Avenue"), StreetType::Primary),
            Distance::meters(6.0)
        );
        // Zero widths are skipped
        assert_eq!(
            row.resolve(Some("Broken Street"), StreetType::Service),
            Distance::meters(10.0)
        );
        assert_eq!(
            row.resolve(None, StreetType::Secondary),
            Distance::meters(18.0)
        );
        assert_eq!(
            row.resolve(Some("Nowhere Lane"), StreetType::Unclassified),
            GLOBAL_DEFAULT_WIDTH
        );
    }
}
