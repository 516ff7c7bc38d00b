use serde::Deserialize;

/// Options for parsing a GPX document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOptions {
    /// How defective track points are handled (default: lenient)
    #[serde(default)]
    pub mode: ParseMode,
}

impl ParseOptions {
    pub fn strict() -> Self {
        Self {
            mode: ParseMode::Strict,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Skip track points with missing or invalid coordinates.
    #[default]
    Lenient,
    /// Reject the whole document on the first invalid track point.
    Strict,
}

/// Options for the 3D scene and the map markers.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewOptions {
    /// Width and depth of the square the route is fitted into (default: 50)
    #[serde(default = "default_scene_extent")]
    pub scene_extent: f64,

    /// Height of the highest point above the lowest one (default: 8)
    #[serde(default = "default_elevation_scale")]
    pub elevation_scale: f64,

    /// Roughly how many control markers to place along the route (default: 10)
    #[serde(default = "default_control_point_divisions")]
    pub control_point_divisions: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            scene_extent: default_scene_extent(),
            elevation_scale: default_elevation_scale(),
            control_point_divisions: default_control_point_divisions(),
        }
    }
}

fn default_scene_extent() -> f64 {
    50.0
}

fn default_elevation_scale() -> f64 {
    8.0
}

fn default_control_point_divisions() -> usize {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_from_json() {
        let opts: ParseOptions = serde_json::from_str(r#"{"mode":"strict"}"#).unwrap();
        assert_eq!(opts.mode, ParseMode::Strict);

        let opts: ParseOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts.mode, ParseMode::Lenient);
    }

    #[test]
    fn test_view_options_partial() {
        let opts: ViewOptions = serde_json::from_str(r#"{"elevationScale":4}"#).unwrap();
        assert_eq!(opts.elevation_scale, 4.0);
        assert_eq!(opts.scene_extent, 50.0);
        assert_eq!(opts.control_point_divisions, 10);
    }
}
