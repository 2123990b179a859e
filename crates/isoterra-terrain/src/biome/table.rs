//! Dense biome lookup built from zone declarations.

use std::sync::LazyLock;

use super::{BiomeZone, standard_zones};
use crate::field::{ELEVATION_TIERS, MOISTURE_LEVELS};

const TIERS: usize = ELEVATION_TIERS as usize;
const LEVELS: usize = MOISTURE_LEVELS as usize;

static STANDARD: LazyLock<BiomeTable> = LazyLock::new(|| {
    BiomeTable::from_zones(&standard_zones())
        .expect("reference biome zones must tile every (tier, moisture) pair exactly once")
});

/// Errors found while resolving zones into a table.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BiomeTableError {
    /// No zone owns this pair.
    #[error("no biome zone covers tier {tier}, moisture {moisture}")]
    Gap {
        /// Elevation tier.
        tier: u8,
        /// Moisture level.
        moisture: u8,
    },

    /// Two zones claim the same pair.
    #[error("biome zones '{first}' and '{second}' overlap at tier {tier}, moisture {moisture}")]
    Overlap {
        /// Elevation tier.
        tier: u8,
        /// Moisture level.
        moisture: u8,
        /// Zone declared first.
        first: String,
        /// Zone declared second.
        second: String,
    },

    /// A zone names a tier outside `[0, 3]`.
    #[error("biome zone '{name}' has tier {tier} outside 0..{max}")]
    TierOutOfRange {
        /// Zone name.
        name: String,
        /// Declared tier.
        tier: u8,
        /// Tier count.
        max: u8,
    },

    /// A zone's moisture range reaches past level 5.
    #[error("biome zone '{name}' has moisture {moisture} outside 0..{max}")]
    MoistureOutOfRange {
        /// Zone name.
        name: String,
        /// Offending bound.
        moisture: u8,
        /// Level count.
        max: u8,
    },

    /// `moisture_min > moisture_max`.
    #[error("biome zone '{name}' has inverted moisture range {min}..={max}")]
    InvertedRange {
        /// Zone name.
        name: String,
        /// Declared minimum.
        min: u8,
        /// Declared maximum.
        max: u8,
    },
}

/// Total, single-valued `(tier, moisture) -> BiomeZone` lookup.
#[derive(Clone, Debug)]
pub struct BiomeTable {
    zones: Vec<BiomeZone>,
    /// Zone index per `[tier][moisture]`.
    grid: [[usize; LEVELS]; TIERS],
}

impl BiomeTable {
    /// Resolve `zones` into a dense table.
    ///
    /// # Errors
    ///
    /// Fails if any zone is malformed, if two zones overlap, or if some
    /// `(tier, moisture)` pair is left uncovered.
    pub fn from_zones(zones: &[BiomeZone]) -> Result<Self, BiomeTableError> {
        let mut owners: [[Option<usize>; LEVELS]; TIERS] = [[None; LEVELS]; TIERS];

        for (index, zone) in zones.iter().enumerate() {
            validate_zone(zone)?;
            for moisture in zone.moisture_min..=zone.moisture_max {
                let slot = &mut owners[zone.tier as usize][moisture as usize];
                if let Some(previous) = *slot {
                    return Err(BiomeTableError::Overlap {
                        tier: zone.tier,
                        moisture,
                        first: zones[previous].name.clone(),
                        second: zone.name.clone(),
                    });
                }
                *slot = Some(index);
            }
        }

        let mut grid = [[0usize; LEVELS]; TIERS];
        for (tier, row) in owners.iter().enumerate() {
            for (moisture, owner) in row.iter().enumerate() {
                grid[tier][moisture] = owner.ok_or(BiomeTableError::Gap {
                    tier: tier as u8,
                    moisture: moisture as u8,
                })?;
            }
        }

        Ok(Self {
            zones: zones.to_vec(),
            grid,
        })
    }

    /// The shared reference table, built and validated on first use.
    pub fn standard() -> &'static BiomeTable {
        &STANDARD
    }

    /// Zone owning `(tier, moisture)`.
    ///
    /// # Panics
    ///
    /// Panics if `tier > 3` or `moisture > 5`. Callers clamp beforehand.
    pub fn lookup(&self, tier: u8, moisture: u8) -> &BiomeZone {
        assert!(
            (tier as usize) < TIERS && (moisture as usize) < LEVELS,
            "biome lookup out of range: tier {tier}, moisture {moisture}"
        );
        &self.zones[self.grid[tier as usize][moisture as usize]]
    }

    /// Zone owning `(tier, moisture)`, or `None` outside the domain.
    pub fn get(&self, tier: u8, moisture: u8) -> Option<&BiomeZone> {
        let row = self.grid.get(tier as usize)?;
        row.get(moisture as usize).map(|&i| &self.zones[i])
    }

    /// First zone declared with `name`.
    pub fn find(&self, name: &str) -> Option<&BiomeZone> {
        self.zones.iter().find(|z| z.name == name)
    }

    /// Zones in declaration order.
    pub fn zones(&self) -> &[BiomeZone] {
        &self.zones
    }
}

fn validate_zone(zone: &BiomeZone) -> Result<(), BiomeTableError> {
    if zone.tier >= ELEVATION_TIERS {
        return Err(BiomeTableError::TierOutOfRange {
            name: zone.name.clone(),
            tier: zone.tier,
            max: ELEVATION_TIERS,
        });
    }
    if zone.moisture_min > zone.moisture_max {
        return Err(BiomeTableError::InvertedRange {
            name: zone.name.clone(),
            min: zone.moisture_min,
            max: zone.moisture_max,
        });
    }
    if zone.moisture_max >= MOISTURE_LEVELS {
        return Err(BiomeTableError::MoistureOutOfRange {
            name: zone.name.clone(),
            moisture: zone.moisture_max,
            max: MOISTURE_LEVELS,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_has_fifteen_zones() {
        assert_eq!(BiomeTable::standard().zones().len(), 15);
    }

    #[test]
    fn test_standard_lookup_is_total_and_single_valued() {
        let table = BiomeTable::standard();
        for tier in 0..ELEVATION_TIERS {
            for moisture in 0..MOISTURE_LEVELS {
                let owners = table
                    .zones()
                    .iter()
                    .filter(|z| z.contains(tier, moisture))
                    .count();
                assert_eq!(
                    owners, 1,
                    "tier {tier}, moisture {moisture} should have exactly one owner"
                );
                let zone = table.lookup(tier, moisture);
                assert!(zone.contains(tier, moisture));
            }
        }
    }

    #[test]
    fn test_standard_reference_cells() {
        let table = BiomeTable::standard();
        assert_eq!(table.lookup(0, 0).name, "subtropical desert");
        assert_eq!(table.lookup(0, 5).name, "tropical rain forest");
        assert_eq!(table.lookup(1, 5).name, "temperate rain forest");
        assert_eq!(table.lookup(2, 4).name, "taiga");
        assert_eq!(table.lookup(3, 0).name, "scorched");
        assert_eq!(table.lookup(3, 5).name, "snow");
    }

    #[test]
    fn test_get_out_of_range_is_none() {
        let table = BiomeTable::standard();
        assert!(table.get(4, 0).is_none());
        assert!(table.get(0, 6).is_none());
        assert!(table.get(3, 5).is_some());
    }

    #[test]
    #[should_panic(expected = "biome lookup out of range")]
    fn test_lookup_out_of_range_panics() {
        let _ = BiomeTable::standard().lookup(4, 0);
    }

    #[test]
    fn test_find_by_name() {
        let table = BiomeTable::standard();
        let tundra = table.find("tundra").unwrap();
        assert_eq!(tundra.tier, 3);
        assert!(table.find("lava").is_none());
    }

    #[test]
    fn test_gap_is_rejected() {
        let mut zones = standard_zones();
        zones.retain(|z| z.name != "tundra");
        assert_eq!(
            BiomeTable::from_zones(&zones).unwrap_err(),
            BiomeTableError::Gap {
                tier: 3,
                moisture: 2
            }
        );
    }

    #[test]
    fn test_overlap_is_rejected() {
        let mut zones = standard_zones();
        zones.push(BiomeZone::new("glacier", 3, (5, 5), 0xFFFFFF));
        let err = BiomeTable::from_zones(&zones).unwrap_err();
        assert_eq!(
            err,
            BiomeTableError::Overlap {
                tier: 3,
                moisture: 5,
                first: "snow".to_string(),
                second: "glacier".to_string(),
            }
        );
    }

    #[test]
    fn test_malformed_zones_are_rejected() {
        let bad_tier = [BiomeZone::new("sky", 4, (0, 5), 0)];
        assert!(matches!(
            BiomeTable::from_zones(&bad_tier),
            Err(BiomeTableError::TierOutOfRange { tier: 4, .. })
        ));

        let bad_moisture = [BiomeZone::new("swamp", 0, (0, 6), 0)];
        assert!(matches!(
            BiomeTable::from_zones(&bad_moisture),
            Err(BiomeTableError::MoistureOutOfRange { moisture: 6, .. })
        ));

        let inverted = [BiomeZone::new("mirage", 0, (4, 1), 0)];
        assert!(matches!(
            BiomeTable::from_zones(&inverted),
            Err(BiomeTableError::InvertedRange { min: 4, max: 1, .. })
        ));
    }
}
