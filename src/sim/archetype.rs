//! Projectile archetype table
//!
//! Static mapping from archetype to damage, speed, color, and elemental
//! effect. Pure lookup; the combat pipeline matches exhaustively on
//! [`EffectKind`] so adding an archetype is a compile-checked change.

use serde::{Deserialize, Serialize};

/// Elemental side-effect carried by a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    None,
    /// Damage over time
    Burn,
    /// Halves movement speed for a duration
    Slow,
    /// Arcs to nearby hostiles
    Chain,
    /// Radial damage with linear falloff
    Splash,
}

/// A named projectile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Archetype {
    #[default]
    Normal,
    Fire,
    Ice,
    Lightning,
    Explosive,
}

/// Static stats for one archetype
#[derive(Debug, Clone, Copy)]
pub struct ArchetypeSpec {
    pub name: &'static str,
    pub color: &'static str,
    /// Damage before the player's damage multiplier
    pub damage: f32,
    /// Speed in units/sec before the player's speed multiplier
    pub speed: f32,
    pub effect: EffectKind,
}

impl Archetype {
    /// Look up the static stats for this archetype
    pub const fn spec(self) -> ArchetypeSpec {
        match self {
            Archetype::Normal => ArchetypeSpec {
                name: "Normal Ball",
                color: "#ffffff",
                damage: 1.0,
                speed: 360.0,
                effect: EffectKind::None,
            },
            Archetype::Fire => ArchetypeSpec {
                name: "Fire Ball",
                color: "#ff6b6b",
                damage: 2.0,
                speed: 300.0,
                effect: EffectKind::Burn,
            },
            Archetype::Ice => ArchetypeSpec {
                name: "Ice Ball",
                color: "#4ecdc4",
                damage: 1.0,
                speed: 240.0,
                effect: EffectKind::Slow,
            },
            Archetype::Lightning => ArchetypeSpec {
                name: "Lightning Ball",
                color: "#f7f740",
                damage: 1.5,
                speed: 480.0,
                effect: EffectKind::Chain,
            },
            Archetype::Explosive => ArchetypeSpec {
                name: "Explosive Ball",
                color: "#ff8800",
                damage: 3.0,
                speed: 300.0,
                effect: EffectKind::Splash,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archetype_effects() {
        assert_eq!(Archetype::Normal.spec().effect, EffectKind::None);
        assert_eq!(Archetype::Fire.spec().effect, EffectKind::Burn);
        assert_eq!(Archetype::Ice.spec().effect, EffectKind::Slow);
        assert_eq!(Archetype::Lightning.spec().effect, EffectKind::Chain);
        assert_eq!(Archetype::Explosive.spec().effect, EffectKind::Splash);
    }

    #[test]
    fn test_archetype_stats_match_reference() {
        let fire = Archetype::Fire.spec();
        assert_eq!(fire.damage, 2.0);
        assert_eq!(fire.color, "#ff6b6b");

        let lightning = Archetype::Lightning.spec();
        assert_eq!(lightning.damage, 1.5);
        assert!(lightning.speed > Archetype::Ice.spec().speed);
    }
}
