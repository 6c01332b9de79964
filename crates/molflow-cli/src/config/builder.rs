use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileEmbeddingConfig, FileRenderConfig};
use super::models::{AppConfig, RenderSettings};
use crate::cli::ConfigArgs;
use crate::error::{CliError, Result};
use molflow::engine::config::{EmbeddingConfigBuilder, LayoutConfig, ProjectionConfig};
use molflow::engine::projection::Camera;
use std::str::FromStr;

/// Values given as dedicated command-line flags. They take precedence over `--set`
/// values, which take precedence over the config file.
#[derive(Debug, Default, Clone, Copy)]
pub struct FlagOverrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub scale: Option<f64>,
    pub pitch: Option<f64>,
    pub yaw: Option<f64>,
}

pub fn build_config(args: &ConfigArgs, flags: &FlagOverrides) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let embedding_file = file_config.embedding.take().unwrap_or_default();
    let embedding = EmbeddingConfigBuilder::new()
        .iterations(
            args.iterations
                .or(embedding_file.iterations)
                .unwrap_or(defaults.embedding.iterations),
        )
        .ideal_bond_length(
            embedding_file
                .ideal_bond_length
                .unwrap_or(defaults.embedding.ideal_bond_length),
        )
        .min_separation(
            embedding_file
                .min_separation
                .unwrap_or(defaults.embedding.min_separation),
        )
        .spring_constant(
            embedding_file
                .spring_constant
                .unwrap_or(defaults.embedding.spring_constant),
        )
        .repulsion_strength(
            embedding_file
                .repulsion_strength
                .unwrap_or(defaults.embedding.repulsion_strength),
        )
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let render_file = file_config.render.take().unwrap_or_default();
    let width = flags
        .width
        .or(render_file.width)
        .unwrap_or(defaults.width);
    let height = flags
        .height
        .or(render_file.height)
        .unwrap_or(defaults.height);
    if width == 0 || height == 0 {
        return Err(CliError::Config(format!(
            "Image size must be positive (got {}x{})",
            width, height
        )));
    }

    let view_scale = flags
        .scale
        .or(render_file.scale)
        .unwrap_or(defaults.scale);
    if !(view_scale.is_finite() && view_scale > 0.0) {
        return Err(CliError::Config(format!(
            "View scale must be finite and positive (got {})",
            view_scale
        )));
    }

    let camera = Camera::new(
        flags
            .pitch
            .or(render_file.pitch)
            .unwrap_or(defaults.pitch),
        flags.yaw.or(render_file.yaw).unwrap_or(defaults.yaw),
    );
    if !camera.is_finite() {
        return Err(CliError::Argument(format!(
            "Camera angles must be finite (pitch: {}, yaw: {})",
            camera.pitch, camera.yaw
        )));
    }

    let projection = ProjectionConfig {
        atom_radius: render_file.atom_radius.unwrap_or(defaults.atom_radius),
        bond_width: render_file.bond_width.unwrap_or(defaults.bond_width),
        ..ProjectionConfig::default()
    }
    .centered_at(f64::from(width) / 2.0, f64::from(height) / 2.0);
    projection
        .validate()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        layout: LayoutConfig {
            embedding,
            offload_threshold: file_config
                .offload_threshold
                .unwrap_or(defaults.offload_threshold),
            ..LayoutConfig::default()
        },
        render: RenderSettings {
            width,
            height,
            view_scale,
            camera,
            projection,
            background: render_file.background.unwrap_or(defaults.background),
        },
    })
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn embedding_section(config: &mut FileConfig) -> &mut FileEmbeddingConfig {
    config.embedding.get_or_insert_with(Default::default)
}

fn render_section(config: &mut FileConfig) -> &mut FileRenderConfig {
    config.render.get_or_insert_with(Default::default)
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let key = key.trim();

        match key {
            "embedding.iterations" => {
                embedding_section(&mut config).iterations =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "embedding.ideal-bond-length" => {
                embedding_section(&mut config).ideal_bond_length =
                    Some(parse_value(key, value_str, "float")?);
            }
            "embedding.min-separation" => {
                embedding_section(&mut config).min_separation =
                    Some(parse_value(key, value_str, "float")?);
            }
            "embedding.spring-constant" => {
                embedding_section(&mut config).spring_constant =
                    Some(parse_value(key, value_str, "float")?);
            }
            "embedding.repulsion-strength" => {
                embedding_section(&mut config).repulsion_strength =
                    Some(parse_value(key, value_str, "float")?);
            }
            "render.width" => {
                render_section(&mut config).width = Some(parse_value(key, value_str, "integer")?);
            }
            "render.height" => {
                render_section(&mut config).height = Some(parse_value(key, value_str, "integer")?);
            }
            "render.scale" => {
                render_section(&mut config).scale = Some(parse_value(key, value_str, "float")?);
            }
            "render.pitch" => {
                render_section(&mut config).pitch = Some(parse_value(key, value_str, "float")?);
            }
            "render.yaw" => {
                render_section(&mut config).yaw = Some(parse_value(key, value_str, "float")?);
            }
            "render.atom-radius" => {
                render_section(&mut config).atom_radius =
                    Some(parse_value(key, value_str, "float")?);
            }
            "render.bond-width" => {
                render_section(&mut config).bond_width =
                    Some(parse_value(key, value_str, "float")?);
            }
            "render.background" => {
                render_section(&mut config).background = Some(value_str.trim().to_string());
            }
            "offload-threshold" => {
                config.offload_threshold = Some(parse_value(key, value_str, "integer")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_config_file(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("molflow.toml");
        fs::write(&path, content).unwrap();
        path
    }

    fn args(config: Option<PathBuf>, set_values: &[&str]) -> ConfigArgs {
        ConfigArgs {
            config,
            iterations: None,
            set_values: set_values.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn defaults_apply_without_file_or_flags() {
        let config = build_config(&ConfigArgs::default(), &FlagOverrides::default()).unwrap();
        assert_eq!(config.layout, LayoutConfig::default());
        assert_eq!(config.render.width, 600);
        assert_eq!(config.render.projection.center_x, 300.0);
        assert_eq!(config.render.projection.center_y, 300.0);
        assert_eq!(config.render.camera, Camera::new(15.0, 30.0));
        assert_eq!(config.render.background, "#ffffff");
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config_file(
            &dir,
            r#"
            offload-threshold = 10
            [embedding]
            iterations = 120
            spring-constant = 0.5
            [render]
            height = 400
            bond-width = 2.5
            "#,
        );
        let config = build_config(&args(Some(path), &[]), &FlagOverrides::default()).unwrap();
        assert_eq!(config.layout.offload_threshold, 10);
        assert_eq!(config.layout.embedding.iterations, 120);
        assert_eq!(config.layout.embedding.spring_constant, 0.5);
        assert_eq!(config.layout.embedding.ideal_bond_length, 2.2);
        assert_eq!(config.render.height, 400);
        assert_eq!(config.render.projection.center_y, 200.0);
        assert_eq!(config.render.projection.bond_width, 2.5);
    }

    #[test]
    fn set_values_override_file_and_flags_override_set_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config_file(&dir, "[render]\nyaw = 10.0\npitch = 5.0\n");
        let flags = FlagOverrides {
            pitch: Some(-45.0),
            ..FlagOverrides::default()
        };
        let config = build_config(
            &args(Some(path), &["render.yaw=90", "render.pitch=20"]),
            &flags,
        )
        .unwrap();
        assert_eq!(config.render.camera, Camera::new(-45.0, 90.0));
    }

    #[test]
    fn iteration_flag_beats_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config_file(&dir, "[embedding]\niterations = 50\n");
        let mut config_args = args(Some(path), &[]);
        config_args.iterations = Some(75);
        let config = build_config(&config_args, &FlagOverrides::default()).unwrap();
        assert_eq!(config.layout.embedding.iterations, 75);
    }

    #[test]
    fn invalid_set_values_are_reported() {
        for bad in ["render.width", "render.width=wide", "colour=blue"] {
            let result = build_config(&args(None, &[bad]), &FlagOverrides::default());
            assert!(matches!(result, Err(CliError::Config(_))), "accepted '{bad}'");
        }
    }

    #[test]
    fn invalid_embedding_parameters_are_rejected() {
        let result = build_config(
            &args(None, &["embedding.ideal-bond-length=-2"]),
            &FlagOverrides::default(),
        );
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn non_finite_camera_is_rejected() {
        let flags = FlagOverrides {
            yaw: Some(f64::NAN),
            ..FlagOverrides::default()
        };
        let result = build_config(&ConfigArgs::default(), &flags);
        assert!(matches!(result, Err(CliError::Argument(_))));
    }

    #[test]
    fn missing_config_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = build_config(
            &args(Some(dir.path().join("absent.toml")), &[]),
            &FlagOverrides::default(),
        );
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
