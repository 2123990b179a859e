//! The reference zone set: fifteen biomes over four tiers and six moisture
//! levels, from scorched highlands to tropical rain forest.

use super::BiomeZone;

/// The fifteen reference zones.
///
/// Temperate desert appears at two tiers; every other name is unique.
///
/// | tier | moisture 0 | 1 | 2 | 3 | 4 | 5 |
/// |------|------------|---|---|---|---|---|
/// | 3 | scorched | bare | tundra | snow | snow | snow |
/// | 2 | temperate desert | temperate desert | shrubland | shrubland | taiga | taiga |
/// | 1 | temperate desert | grassland | grassland | deciduous forest | deciduous forest | temperate rain forest |
/// | 0 | subtropical desert | grassland | seasonal forest | seasonal forest | tropical rain forest | tropical rain forest |
pub fn standard_zones() -> Vec<BiomeZone> {
    vec![
        BiomeZone::new("snow", 3, (3, 5), 0xF8F8F8),
        BiomeZone::new("tundra", 3, (2, 2), 0xDDDDBB),
        BiomeZone::new("bare", 3, (1, 1), 0xBBBBBB),
        BiomeZone::new("scorched", 3, (0, 0), 0x999999),
        BiomeZone::new("taiga", 2, (4, 5), 0xCCD4BB),
        BiomeZone::new("shrubland", 2, (2, 3), 0xC4CCBB),
        BiomeZone::new("temperate desert", 2, (0, 1), 0xE4E8CA),
        BiomeZone::new("temperate rain forest", 1, (5, 5), 0xA4C4A8),
        BiomeZone::new("temperate deciduous forest", 1, (3, 4), 0xB4C9A9),
        BiomeZone::new("temperate grassland", 1, (1, 2), 0xC4D4AA),
        BiomeZone::new("temperate desert", 1, (0, 0), 0xE4E8CA),
        BiomeZone::new("tropical rain forest", 0, (4, 5), 0x9CBBA9),
        BiomeZone::new("tropical seasonal forest", 0, (2, 3), 0xA9CCA4),
        BiomeZone::new("tropical grassland", 0, (1, 1), 0xC4D4AA),
        BiomeZone::new("subtropical desert", 0, (0, 0), 0xE9DDC7),
    ]
}
