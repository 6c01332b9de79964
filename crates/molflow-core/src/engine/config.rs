use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Parameter '{name}' must be finite and positive (got {value})")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("Damping decay {decay} exceeds the initial damping {initial}")]
    InvalidDampingSchedule { initial: f64, decay: f64 },
}

fn require_positive(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidParameter { name, value })
    }
}

/// Parameters of the force-directed relaxation.
///
/// The defaults reproduce the reference layout; tests and callers that need a different
/// trade-off between speed and quality go through [`EmbeddingConfigBuilder`].
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingConfig {
    pub iterations: usize,
    /// Rest length of every bond spring.
    pub ideal_bond_length: f64,
    /// Pairs closer than this receive an extra separating push.
    pub min_separation: f64,
    /// Numerator of the inverse-square repulsion.
    pub repulsion_strength: f64,
    /// Gain applied to the overlap deficit `min_separation - dist`.
    pub overlap_push: f64,
    pub spring_constant: f64,
    /// Damping at the first iteration.
    pub initial_damping: f64,
    /// Total damping reduction over the run; the last iteration approaches
    /// `initial_damping - damping_decay`.
    pub damping_decay: f64,
    /// Lower bound on pair distances used in force magnitudes.
    pub distance_floor: f64,
    /// The seed spiral reaches `spiral_radius_factor * sqrt(N)`.
    pub spiral_radius_factor: f64,
    /// Total depth spanned by the seed spiral.
    pub z_spread: f64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            iterations: 240,
            ideal_bond_length: 2.2,
            min_separation: 1.2,
            repulsion_strength: 1.5,
            overlap_push: 0.6,
            spring_constant: 0.25,
            initial_damping: 0.55,
            damping_decay: 0.35,
            distance_floor: 0.1,
            spiral_radius_factor: 1.8,
            z_spread: 3.0,
        }
    }
}

impl EmbeddingConfig {
    /// Damping applied during iteration `iter` (zero based).
    #[inline]
    pub fn damping_at(&self, iter: usize) -> f64 {
        self.initial_damping - (iter as f64 / self.iterations as f64) * self.damping_decay
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "iterations",
                value: 0.0,
            });
        }
        require_positive("ideal_bond_length", self.ideal_bond_length)?;
        require_positive("min_separation", self.min_separation)?;
        require_positive("repulsion_strength", self.repulsion_strength)?;
        require_positive("overlap_push", self.overlap_push)?;
        require_positive("spring_constant", self.spring_constant)?;
        require_positive("initial_damping", self.initial_damping)?;
        require_positive("damping_decay", self.damping_decay)?;
        require_positive("distance_floor", self.distance_floor)?;
        require_positive("spiral_radius_factor", self.spiral_radius_factor)?;
        require_positive("z_spread", self.z_spread)?;
        if self.damping_decay > self.initial_damping {
            return Err(ConfigError::InvalidDampingSchedule {
                initial: self.initial_damping,
                decay: self.damping_decay,
            });
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct EmbeddingConfigBuilder {
    iterations: Option<usize>,
    ideal_bond_length: Option<f64>,
    min_separation: Option<f64>,
    repulsion_strength: Option<f64>,
    overlap_push: Option<f64>,
    spring_constant: Option<f64>,
    initial_damping: Option<f64>,
    damping_decay: Option<f64>,
    distance_floor: Option<f64>,
    spiral_radius_factor: Option<f64>,
    z_spread: Option<f64>,
}

impl EmbeddingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = Some(iterations);
        self
    }
    pub fn ideal_bond_length(mut self, length: f64) -> Self {
        self.ideal_bond_length = Some(length);
        self
    }
    pub fn min_separation(mut self, distance: f64) -> Self {
        self.min_separation = Some(distance);
        self
    }
    pub fn repulsion_strength(mut self, strength: f64) -> Self {
        self.repulsion_strength = Some(strength);
        self
    }
    pub fn overlap_push(mut self, gain: f64) -> Self {
        self.overlap_push = Some(gain);
        self
    }
    pub fn spring_constant(mut self, k: f64) -> Self {
        self.spring_constant = Some(k);
        self
    }
    pub fn initial_damping(mut self, damping: f64) -> Self {
        self.initial_damping = Some(damping);
        self
    }
    pub fn damping_decay(mut self, decay: f64) -> Self {
        self.damping_decay = Some(decay);
        self
    }
    pub fn distance_floor(mut self, floor: f64) -> Self {
        self.distance_floor = Some(floor);
        self
    }
    pub fn spiral_radius_factor(mut self, factor: f64) -> Self {
        self.spiral_radius_factor = Some(factor);
        self
    }
    pub fn z_spread(mut self, spread: f64) -> Self {
        self.z_spread = Some(spread);
        self
    }

    /// Builds the configuration, filling unset parameters with their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any parameter is non-finite or not positive, or if the
    /// damping schedule would turn negative.
    pub fn build(self) -> Result<EmbeddingConfig, ConfigError> {
        let defaults = EmbeddingConfig::default();
        let config = EmbeddingConfig {
            iterations: self.iterations.unwrap_or(defaults.iterations),
            ideal_bond_length: self.ideal_bond_length.unwrap_or(defaults.ideal_bond_length),
            min_separation: self.min_separation.unwrap_or(defaults.min_separation),
            repulsion_strength: self
                .repulsion_strength
                .unwrap_or(defaults.repulsion_strength),
            overlap_push: self.overlap_push.unwrap_or(defaults.overlap_push),
            spring_constant: self.spring_constant.unwrap_or(defaults.spring_constant),
            initial_damping: self.initial_damping.unwrap_or(defaults.initial_damping),
            damping_decay: self.damping_decay.unwrap_or(defaults.damping_decay),
            distance_floor: self.distance_floor.unwrap_or(defaults.distance_floor),
            spiral_radius_factor: self
                .spiral_radius_factor
                .unwrap_or(defaults.spiral_radius_factor),
            z_spread: self.z_spread.unwrap_or(defaults.z_spread),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Parameters of the perspective projection, in view units unless noted.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionConfig {
    pub center_x: f64,
    pub center_y: f64,
    /// Camera distance `D` in the depth factor `D / (D + z')`, in layout units.
    pub perspective_distance: f64,
    pub double_bond_offset: f64,
    pub triple_bond_offset: f64,
    /// Marker radius of a radius-factor-1 atom at depth factor 1.
    pub atom_radius: f64,
    /// Stroke width of a bond at depth factor 1.
    pub bond_width: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            center_x: 0.0,
            center_y: 0.0,
            perspective_distance: 6.0,
            double_bond_offset: 3.5,
            triple_bond_offset: 4.5,
            atom_radius: 12.0,
            bond_width: 4.0,
        }
    }
}

impl ProjectionConfig {
    pub fn centered_at(mut self, x: f64, y: f64) -> Self {
        self.center_x = x;
        self.center_y = y;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("center_x", self.center_x), ("center_y", self.center_y)] {
            if !value.is_finite() {
                return Err(ConfigError::InvalidParameter { name, value });
            }
        }
        require_positive("perspective_distance", self.perspective_distance)?;
        require_positive("double_bond_offset", self.double_bond_offset)?;
        require_positive("triple_bond_offset", self.triple_bond_offset)?;
        require_positive("atom_radius", self.atom_radius)?;
        require_positive("bond_width", self.bond_width)?;
        Ok(())
    }
}

/// Configuration of the layout workflow: embedding parameters, the size above which
/// interactive sessions move embedding off the calling thread, and how many superseded
/// layouts a session keeps for quick reloads.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub embedding: EmbeddingConfig,
    pub offload_threshold: usize,
    pub cache_capacity: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            embedding: EmbeddingConfig::default(),
            offload_threshold: 60,
            cache_capacity: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_without_overrides_matches_defaults() {
        let config = EmbeddingConfigBuilder::new().build().unwrap();
        assert_eq!(config, EmbeddingConfig::default());
    }

    #[test]
    fn builder_applies_overrides() {
        let config = EmbeddingConfigBuilder::new()
            .iterations(50)
            .ideal_bond_length(1.5)
            .build()
            .unwrap();
        assert_eq!(config.iterations, 50);
        assert_eq!(config.ideal_bond_length, 1.5);
        assert_eq!(config.spring_constant, 0.25);
    }

    #[test]
    fn builder_rejects_non_positive_and_non_finite_values() {
        assert_eq!(
            EmbeddingConfigBuilder::new().spring_constant(0.0).build(),
            Err(ConfigError::InvalidParameter {
                name: "spring_constant",
                value: 0.0
            })
        );
        assert!(matches!(
            EmbeddingConfigBuilder::new()
                .ideal_bond_length(f64::NAN)
                .build(),
            Err(ConfigError::InvalidParameter {
                name: "ideal_bond_length",
                ..
            })
        ));
        assert!(EmbeddingConfigBuilder::new().iterations(0).build().is_err());
    }

    #[test]
    fn builder_rejects_a_negative_damping_schedule() {
        assert_eq!(
            EmbeddingConfigBuilder::new()
                .initial_damping(0.2)
                .damping_decay(0.3)
                .build(),
            Err(ConfigError::InvalidDampingSchedule {
                initial: 0.2,
                decay: 0.3
            })
        );
    }

    #[test]
    fn damping_decreases_linearly() {
        let config = EmbeddingConfig::default();
        assert!((config.damping_at(0) - 0.55).abs() < 1e-12);
        assert!((config.damping_at(120) - 0.375).abs() < 1e-12);
        assert!(config.damping_at(239) > 0.20);
    }

    #[test]
    fn projection_defaults_validate() {
        let config = ProjectionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.perspective_distance, 6.0);

        let bad = ProjectionConfig {
            perspective_distance: -1.0,
            ..ProjectionConfig::default()
        };
        assert!(bad.validate().is_err());
    }
}
