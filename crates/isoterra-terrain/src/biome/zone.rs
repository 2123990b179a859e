//! Biome zone declaration.

/// A named terrain classification owning a moisture range at one tier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BiomeZone {
    /// Human-readable description (e.g. "tundra").
    pub name: String,
    /// Elevation tier in `[0, 3]`; 3 is the highest.
    pub tier: u8,
    /// Lowest moisture level owned (inclusive).
    pub moisture_min: u8,
    /// Highest moisture level owned (inclusive).
    pub moisture_max: u8,
    /// Display color as `0xRRGGBB`.
    pub color: u32,
}

impl BiomeZone {
    /// Declare a zone.
    pub fn new(name: &str, tier: u8, moisture: (u8, u8), color: u32) -> Self {
        Self {
            name: name.to_string(),
            tier,
            moisture_min: moisture.0,
            moisture_max: moisture.1,
            color,
        }
    }

    /// Returns `true` if this zone owns `(tier, moisture)`.
    pub fn contains(&self, tier: u8, moisture: u8) -> bool {
        self.tier == tier && (self.moisture_min..=self.moisture_max).contains(&moisture)
    }

    /// Display color as linear `[r, g, b]` in `[0, 1]`.
    pub fn color_rgb(&self) -> [f32; 3] {
        let r = (self.color >> 16) & 0xFF;
        let g = (self.color >> 8) & 0xFF;
        let b = self.color & 0xFF;
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_rgb_unpacks_channels() {
        let zone = BiomeZone::new("probe", 0, (0, 5), 0xFF8000);
        let [r, g, b] = zone.color_rgb();
        assert_eq!(r, 1.0);
        assert!((g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(b, 0.0);
    }

    #[test]
    fn test_contains_checks_tier_and_range() {
        let zone = BiomeZone::new("probe", 2, (1, 3), 0);
        assert!(zone.contains(2, 1));
        assert!(zone.contains(2, 3));
        assert!(!zone.contains(2, 0));
        assert!(!zone.contains(2, 4));
        assert!(!zone.contains(1, 2));
    }
}
