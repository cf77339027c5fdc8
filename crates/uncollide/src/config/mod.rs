//! Configuration system
//!
//! Run parameters for the collision resolver. Every config type implements
//! [`Config`] so it can be loaded from or saved to TOML and RON files.

pub use serde::{Serialize, Deserialize};

use crate::foundation::math::Dimension;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value is out of its accepted range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Default cap on expansion passes
pub const DEFAULT_MAX_EXPANSIONS: u32 = 2000;

/// Default cap on twin-nudging passes
pub const DEFAULT_MAX_NUDGE_PASSES: u32 = 1000;

/// Default outward scale applied by one expansion pass
pub const DEFAULT_EXPANSION_FACTOR: f32 = 1.1;

/// Default twin threshold, `1.1^-20`
pub fn default_twin_scaling() -> f32 {
    1.1_f32.powi(-20)
}

/// # Tree Configuration
///
/// Capacity limits for the quad-tree / oct-tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Overflow size a leaf may exceed before it splits
    pub max_objects: usize,
    /// Depth at which cells stop splitting and accept unbounded overflow
    pub max_levels: u32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_objects: 50,
            max_levels: 4,
        }
    }
}

impl Config for TreeConfig {}

/// # Uncollide Configuration
///
/// Parameters of a collision resolution run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UncollideConfig {
    /// Axes to resolve on
    pub dimension: Dimension,
    /// Maximum number of expansion passes
    pub max_expansions: u32,
    /// Translate the layout back to its original mean once resolved
    pub maintain_centroid: bool,
    /// Fraction of the collision distance below which two nodes are twins
    pub twin_scaling: f32,
    /// Outward scale applied by [`UniformExpansion::from_config`]
    ///
    /// [`UniformExpansion::from_config`]: crate::graph::UniformExpansion::from_config
    pub expansion_factor: f32,
    /// Maximum number of twin-nudging passes
    pub max_nudge_passes: u32,
    /// Tree capacity limits
    pub tree: TreeConfig,
}

impl Default for UncollideConfig {
    fn default() -> Self {
        Self {
            dimension: Dimension::TwoD,
            max_expansions: DEFAULT_MAX_EXPANSIONS,
            maintain_centroid: false,
            twin_scaling: default_twin_scaling(),
            expansion_factor: DEFAULT_EXPANSION_FACTOR,
            max_nudge_passes: DEFAULT_MAX_NUDGE_PASSES,
            tree: TreeConfig::default(),
        }
    }
}

impl Config for UncollideConfig {}

impl UncollideConfig {
    /// Create a configuration for the given dimension with default limits
    pub fn new(dimension: Dimension) -> Self {
        Self {
            dimension,
            ..Self::default()
        }
    }

    /// Set the expansion pass limit
    pub const fn with_max_expansions(mut self, max_expansions: u32) -> Self {
        self.max_expansions = max_expansions;
        self
    }

    /// Enable or disable centroid preservation
    pub const fn with_maintain_centroid(mut self, enabled: bool) -> Self {
        self.maintain_centroid = enabled;
        self
    }

    /// Set the twin threshold
    pub const fn with_twin_scaling(mut self, twin_scaling: f32) -> Self {
        self.twin_scaling = twin_scaling;
        self
    }

    /// Set the outward scale of one expansion step
    pub const fn with_expansion_factor(mut self, factor: f32) -> Self {
        self.expansion_factor = factor;
        self
    }

    /// Set the nudging pass limit
    pub const fn with_max_nudge_passes(mut self, passes: u32) -> Self {
        self.max_nudge_passes = passes;
        self
    }

    /// Set custom tree limits
    pub const fn with_tree(mut self, tree: TreeConfig) -> Self {
        self.tree = tree;
        self
    }

    /// Validate the configuration
    ///
    /// Twin detection only walks the cells a node's reach is classified
    /// into, so thresholds above 1 would miss twins.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.twin_scaling.is_finite() || self.twin_scaling <= 0.0 || self.twin_scaling > 1.0 {
            return Err(ConfigError::Invalid(format!(
                "twin_scaling must be in (0, 1], got {}",
                self.twin_scaling
            )));
        }

        if !self.expansion_factor.is_finite() || self.expansion_factor <= 1.0 {
            return Err(ConfigError::Invalid(format!(
                "expansion_factor must be greater than 1, got {}",
                self.expansion_factor
            )));
        }

        if self.tree.max_objects == 0 {
            return Err(ConfigError::Invalid(
                "tree.max_objects must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
