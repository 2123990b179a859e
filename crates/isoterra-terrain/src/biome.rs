//! Biome table: declarative zones resolved into a dense `[tier][moisture]`
//! lookup.
//!
//! Each [`BiomeZone`] owns a moisture range at one elevation tier. A
//! [`BiomeTable`] is only constructed when the zones tile the whole
//! `tier × moisture` domain exactly once.

mod standard;
mod table;
mod zone;

pub use standard::standard_zones;
pub use table::{BiomeTable, BiomeTableError};
pub use zone::BiomeZone;
