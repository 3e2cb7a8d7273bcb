use log::LevelFilter;
use serde::de::Error as _;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_TEXTURE_BASE: &str =
    "https://raw.githubusercontent.com/mrdoob/three.js/dev/examples/textures";

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    /// Initial distance from the sun along +z.
    pub distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig {
            fov_deg: 75.0,
            near: 0.1,
            far: 1000.0,
            distance: 50.0,
        }
    }
}

/// Optional glTF model replacing the procedural station.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ModelConfig {
    pub path: String,
    pub scale: f32,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    pub log_level: String,
    /// Self-rotation added to every planet on each rendered frame, in radians.
    pub spin_step: f32,
    pub teleport_margin: f32,
    pub camera: CameraConfig,
    pub star_count: usize,
    pub star_spread: f32,
    pub texture_base: String,
    pub station_model: Option<ModelConfig>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            log_level: "info".to_string(),
            spin_step: crate::sim::kinematics::SPIN_STEP,
            teleport_margin: crate::sim::teleport::TELEPORT_MARGIN,
            camera: CameraConfig::default(),
            star_count: 10_000,
            star_spread: 2000.0,
            texture_base: DEFAULT_TEXTURE_BASE.to_string(),
            station_model: None,
        }
    }
}

impl ViewerConfig {
    /// Parses and checks a config. Values that would break the projection,
    /// the orbit update or the starfield are rejected as a whole.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: ViewerConfig = serde_json::from_str(text)?;
        config.validate().map_err(serde_json::Error::custom)?;
        Ok(config)
    }

    fn validate(&self) -> std::result::Result<(), &'static str> {
        let camera = &self.camera;
        if !(camera.fov_deg > 0.0 && camera.fov_deg < 180.0) {
            return Err("camera.fov_deg must be between 0 and 180");
        }
        if !(camera.near > 0.0 && camera.near.is_finite()) {
            return Err("camera.near must be positive");
        }
        if !(camera.far > camera.near && camera.far.is_finite()) {
            return Err("camera.far must be greater than camera.near");
        }
        if !(camera.distance > 0.0 && camera.distance.is_finite()) {
            return Err("camera.distance must be positive");
        }
        if !self.spin_step.is_finite() {
            return Err("spin_step must be finite");
        }
        if !self.teleport_margin.is_finite() {
            return Err("teleport_margin must be finite");
        }
        if !(self.star_spread >= 0.0 && self.star_spread.is_finite()) {
            return Err("star_spread must be finite and not negative");
        }
        if let Some(model) = &self.station_model {
            if !(model.scale > 0.0 && model.scale.is_finite()) {
                return Err("station_model.scale must be positive");
            }
        }
        Ok(())
    }

    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }

    pub fn texture_url(&self, file: &str) -> String {
        format!("{}/{}", self.texture_base.trim_end_matches('/'), file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::camera::PerspectiveCamera;
    use crate::error::ViewerError;
    use test_case::test_case;

    #[test]
    fn empty_object_yields_defaults() {
        let config = ViewerConfig::from_json("{}").unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn partial_config_overrides_only_given_fields() {
        let config = ViewerConfig::from_json(
            r#"{ "spin_step": 0.01, "camera": { "distance": 80.0 },
                 "station_model": { "path": "/assets/models/station.glb", "scale": 0.2 } }"#,
        )
        .unwrap();

        assert!((config.spin_step - 0.01).abs() < 1e-6);
        assert!((config.camera.distance - 80.0).abs() < 1e-6);
        assert!((config.camera.fov_deg - 75.0).abs() < 1e-6);
        assert_eq!(config.star_count, 10_000);
        let model = config.station_model.unwrap();
        assert_eq!(model.path, "/assets/models/station.glb");
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = ViewerConfig::from_json("{ spin_step: ").unwrap_err();
        assert!(matches!(err, ViewerError::Config(_)));
    }

    #[test_case(r#"{"camera":{"near":10.0,"far":10.0}}"# ; "near equals far")]
    #[test_case(r#"{"camera":{"near":10.0,"far":5.0}}"# ; "far before near")]
    #[test_case(r#"{"camera":{"near":0.0}}"# ; "zero near")]
    #[test_case(r#"{"camera":{"near":-1.0}}"# ; "negative near")]
    #[test_case(r#"{"camera":{"fov_deg":0.0}}"# ; "zero fov")]
    #[test_case(r#"{"camera":{"fov_deg":180.0}}"# ; "straight fov")]
    #[test_case(r#"{"camera":{"far":1e39}}"# ; "far overflows f32")]
    #[test_case(r#"{"camera":{"distance":0.0}}"# ; "camera inside the sun")]
    #[test_case(r#"{"spin_step":1e39}"# ; "spin step overflows f32")]
    #[test_case(r#"{"teleport_margin":-1e39}"# ; "margin overflows f32")]
    #[test_case(r#"{"star_spread":-10.0}"# ; "negative star spread")]
    #[test_case(r#"{"station_model":{"path":"/m.glb","scale":0.0}}"# ; "zero model scale")]
    fn unusable_values_are_config_errors(json: &str) {
        let err = ViewerConfig::from_json(json).unwrap_err();
        assert!(matches!(err, ViewerError::Config(_)));
    }

    #[test_case(r#"{"camera":{"near":1.0,"far":2.0}}"# ; "tight frustum")]
    #[test_case(r#"{"camera":{"fov_deg":179.0}}"# ; "wide fov")]
    #[test_case(r#"{"spin_step":-0.01,"teleport_margin":0.0}"# ; "reverse spin")]
    #[test_case(r#"{"star_spread":0.0}"# ; "collapsed starfield")]
    fn accepted_configs_project_without_panicking(json: &str) {
        let config = ViewerConfig::from_json(json).unwrap();
        let camera = PerspectiveCamera::new(&config.camera, 1.5);
        assert!(camera.view_projection().iter().all(|v| v.is_finite()));
        let ray = camera.ray_from_ndc(nalgebra::Vector2::new(0.0, 0.0));
        assert!((ray.direction.norm() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn unknown_log_level_falls_back_to_info() {
        let mut config = ViewerConfig::default();
        config.log_level = "chatty".to_string();
        assert_eq!(config.level_filter(), LevelFilter::Info);
        config.log_level = "debug".to_string();
        assert_eq!(config.level_filter(), LevelFilter::Debug);
    }

    #[test]
    fn texture_url_joins_without_double_slash() {
        let mut config = ViewerConfig::default();
        config.texture_base = "/assets/textures/".to_string();
        assert_eq!(config.texture_url("planets/mars.jpg"), "/assets/textures/planets/mars.jpg");
    }
}
