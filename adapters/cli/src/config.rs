use std::{fs, path::Path};

use anyhow::{ensure, Context, Result};
use platformer_core::{LevelDimensions, PhysicsConstants, ReachabilityBounds};
use platformer_system_level_generation::reachability_bounds;
use serde::Deserialize;

/// Generator settings loaded from a TOML file. Missing keys keep their defaults.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GeneratorConfig {
    /// Player controller constants the reach bounds are derived from.
    pub(crate) physics: PhysicsConstants,
    /// Level size used when no size flags are given.
    pub(crate) dimensions: LevelDimensions,
}

impl GeneratorConfig {
    /// Reads the configuration at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read generator config at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid generator config at {}", path.display()))
    }

    /// Parses and validates TOML contents.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).context("failed to parse generator config toml contents")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let physics = &self.physics;
        ensure!(
            physics.gravity.is_finite() && physics.gravity > 0.0,
            "gravity must be positive, got {}",
            physics.gravity
        );
        ensure!(
            physics.tile_size.is_finite() && physics.tile_size > 0.0,
            "tile size must be positive, got {}",
            physics.tile_size
        );
        ensure!(
            physics.jump_velocity.is_finite() && physics.player_speed.is_finite(),
            "jump velocity and player speed must be finite"
        );

        let bounds = reachability_bounds(physics);
        ensure!(
            !bounds.is_saturated(),
            "physics give a jump reach of {}x{} tiles, beyond the {} tile level limit",
            bounds.max_up_tiles(),
            bounds.max_gap_tiles(),
            ReachabilityBounds::MAX_TILES
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_keeps_every_default() {
        assert_eq!(
            GeneratorConfig::parse("").expect("empty config"),
            GeneratorConfig::default()
        );
    }

    #[test]
    fn partial_tables_override_single_fields() {
        let config = GeneratorConfig::parse(
            "[physics]\njump_velocity = -24.0\n\n[dimensions]\nwidth_tiles = 64\n",
        )
        .expect("partial config");
        assert_eq!(config.physics.jump_velocity, -24.0);
        assert_eq!(config.physics.gravity, PhysicsConstants::default().gravity);
        assert_eq!(config.dimensions, LevelDimensions::new(64, 11));
    }

    #[test]
    fn unknown_keys_and_bad_physics_are_rejected() {
        assert!(GeneratorConfig::parse("seed = 3\n").is_err());

        let error = GeneratorConfig::parse("[physics]\ngravity = 0.0\n").expect_err("zero gravity");
        assert!(error.to_string().contains("gravity"), "{error}");
    }

    #[test]
    fn runaway_jump_reach_is_rejected() {
        let error = GeneratorConfig::parse("[physics]\njump_velocity = 1e6\n")
            .expect_err("jump reach beyond any level");
        assert!(error.to_string().contains("level limit"), "{error}");

        assert!(GeneratorConfig::parse("[physics]\njump_velocity = -24.0\n").is_ok());
    }
}
