//! Render configuration
//!
//! Priority: command line flags > TOML settings file > built-in defaults.
//! One `RenderConfig` is passed explicitly into every pipeline stage.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::*;
use crate::error::{Error, Result};

/// Options for the affordance density maps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AffordanceConfig {
    /// JSON object mapping furniture name to relative positions
    pub stats_file: PathBuf,
    /// Points with |x| or |y| at or beyond this are dropped; also the histogram extent
    pub range: f32,
    /// Histogram bins per axis
    pub bins: usize,
    /// Side length of the upsampled output image
    pub upscale: u32,
}

impl Default for AffordanceConfig {
    fn default() -> Self {
        Self {
            stats_file: PathBuf::from(DEFAULT_AFFORDANCE_FILE),
            range: DEFAULT_AFFORDANCE_RANGE,
            bins: DEFAULT_AFFORDANCE_BINS,
            upscale: DEFAULT_AFFORDANCE_UPSCALE,
        }
    }
}

/// Configuration for one render pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Directory of per-room JSON records
    pub input_dir: PathBuf,
    /// Directory receiving rendered images
    pub output_dir: PathBuf,
    /// Grid cells per room unit
    pub map_scale: f32,
    /// Sub-samples emitted per trajectory segment
    pub interpolation_steps: usize,
    /// Points skipped at the start of every trajectory
    pub start_end_cut: usize,
    /// Points dropped at the end of every trajectory
    pub end_cut: usize,
    /// Grey dilation window (x, y) in cells
    pub dilation_size: [usize; 2],
    /// Gaussian blur standard deviation in cells
    pub gaussian_sigma: f32,
    /// Gaussian kernel radius in multiples of sigma
    pub gaussian_truncate: f32,
    /// Output image extension, also selects the encoder
    pub image_extension: String,
    /// Optional TTF/OTF font for furniture labels
    pub label_font: Option<PathBuf>,
    /// Worker threads (0 = rayon default)
    pub threads: usize,
    /// Vertex components forming the drawing plane
    pub axes: [usize; 2],
    /// Drawing plane for layout sketches, whose vertices are 3D
    pub layout_axes: [usize; 2],
    /// Largest grid (width * height cells) a room may allocate
    pub max_grid_cells: usize,
    pub affordance: AffordanceConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            map_scale: DEFAULT_MAP_SCALE,
            interpolation_steps: DEFAULT_INTERPOLATION_STEPS,
            start_end_cut: DEFAULT_START_CUT,
            end_cut: DEFAULT_END_CUT,
            dilation_size: DEFAULT_DILATION_SIZE,
            gaussian_sigma: DEFAULT_GAUSSIAN_SIGMA,
            gaussian_truncate: DEFAULT_GAUSSIAN_TRUNCATE,
            image_extension: DEFAULT_IMAGE_EXTENSION.to_string(),
            label_font: None,
            threads: 0,
            axes: DEFAULT_AXES,
            layout_axes: LAYOUT_AXES,
            max_grid_cells: DEFAULT_MAX_GRID_CELLS,
            affordance: AffordanceConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Load configuration from a TOML settings file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::parse(&contents, path)
    }

    fn parse(contents: &str, path: &Path) -> Result<Self> {
        toml::from_str(contents).map_err(|source| Error::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the default settings file, or built-in defaults if it doesn't exist
    pub fn from_config_files() -> Result<Self> {
        let path = Path::new(CONFIG_FILE);
        if !path.exists() {
            tracing::debug!("No {} found, using defaults", CONFIG_FILE);
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    /// Parse configuration from the process command line
    pub fn from_args() -> Result<Self> {
        let args: Vec<String> = std::env::args().collect();
        Self::from_arg_list(&args)
    }

    /// Parse configuration from an argument list (`args[0]` is the program name)
    pub fn from_arg_list(args: &[String]) -> Result<Self> {
        // Explicit settings file replaces the default one
        let mut config = match args.iter().position(|a| a == "--config") {
            Some(i) => match args.get(i + 1) {
                Some(path) => Self::from_file(Path::new(path))?,
                None => return Err(Error::InvalidConfig("--config needs a path".to_string())),
            },
            None => Self::from_config_files()?,
        };

        let mut i = 1;
        while i < args.len() {
            let value = args.get(i + 1).map(String::as_str);
            let consumed = match (args[i].as_str(), value) {
                ("--config", Some(_)) => true,
                ("--input", Some(v)) => {
                    config.input_dir = PathBuf::from(v);
                    true
                }
                ("--output", Some(v)) => {
                    config.output_dir = PathBuf::from(v);
                    true
                }
                ("--scale", Some(v)) => {
                    config.map_scale = parse_flag("--scale", v)?;
                    true
                }
                ("--steps", Some(v)) => {
                    config.interpolation_steps = parse_flag("--steps", v)?;
                    true
                }
                ("--cut", Some(v)) => {
                    config.start_end_cut = parse_flag("--cut", v)?;
                    true
                }
                ("--end-cut", Some(v)) => {
                    config.end_cut = parse_flag("--end-cut", v)?;
                    true
                }
                ("--dilation", Some(v)) => {
                    config.dilation_size = parse_window(v)?;
                    true
                }
                ("--sigma", Some(v)) => {
                    config.gaussian_sigma = parse_flag("--sigma", v)?;
                    true
                }
                ("--threads", Some(v)) => {
                    config.threads = parse_flag("--threads", v)?;
                    true
                }
                ("--font", Some(v)) => {
                    config.label_font = Some(PathBuf::from(v));
                    true
                }
                ("--ext", Some(v)) => {
                    config.image_extension = v.trim_start_matches('.').to_string();
                    true
                }
                ("--stats", Some(v)) => {
                    config.affordance.stats_file = PathBuf::from(v);
                    true
                }
                ("--axes", Some(v)) => {
                    config.axes = parse_window(v)?;
                    config.layout_axes = config.axes;
                    true
                }
                ("--max-cells", Some(v)) => {
                    config.max_grid_cells = parse_flag("--max-cells", v)?;
                    true
                }
                ("--help" | "-h", _) => {
                    print_help();
                    std::process::exit(0);
                }
                _ => false,
            };
            i += if consumed { 2 } else { 1 };
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if !self.map_scale.is_finite() || self.map_scale <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "map_scale must be positive, got {}",
                self.map_scale
            )));
        }
        if self.interpolation_steps == 0 {
            return Err(Error::InvalidConfig(
                "interpolation_steps must be at least 1".to_string(),
            ));
        }
        if self.dilation_size.contains(&0) {
            return Err(Error::InvalidConfig(format!(
                "dilation_size must be non-zero, got {:?}",
                self.dilation_size
            )));
        }
        if !self.gaussian_sigma.is_finite() || self.gaussian_sigma < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "gaussian_sigma must be non-negative, got {}",
                self.gaussian_sigma
            )));
        }
        if !self.gaussian_truncate.is_finite() || self.gaussian_truncate < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "gaussian_truncate must be non-negative, got {}",
                self.gaussian_truncate
            )));
        }
        if self.axes[0] == self.axes[1] || self.layout_axes[0] == self.layout_axes[1] {
            return Err(Error::InvalidConfig(format!(
                "axes must differ, got {:?} and layout {:?}",
                self.axes, self.layout_axes
            )));
        }
        if self.max_grid_cells == 0 {
            return Err(Error::InvalidConfig("max_grid_cells must be non-zero".to_string()));
        }
        let upscale = self.affordance.upscale as usize;
        if upscale.checked_mul(upscale).is_none_or(|cells| cells > self.max_grid_cells) {
            return Err(Error::InvalidConfig(format!(
                "affordance upscale {} exceeds max_grid_cells",
                upscale
            )));
        }
        if self.image_extension.is_empty() {
            return Err(Error::InvalidConfig("image_extension is empty".to_string()));
        }
        if self.affordance.bins == 0 || self.affordance.upscale == 0 {
            return Err(Error::InvalidConfig(
                "affordance bins and upscale must be non-zero".to_string(),
            ));
        }
        if !self.affordance.range.is_finite() || self.affordance.range <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "affordance range must be positive, got {}",
                self.affordance.range
            )));
        }
        Ok(())
    }

    /// Switch the drawing plane to `layout_axes` for the layout sketch tool
    pub fn for_layouts(mut self) -> Self {
        self.axes = self.layout_axes;
        self
    }
}

fn parse_flag<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::InvalidConfig(format!("{} got unparseable value '{}'", flag, value)))
}

/// Parse "3x3", "3,3" or a single "3" into a pair
fn parse_window(value: &str) -> Result<[usize; 2]> {
    let parts: Vec<&str> = value.split(['x', 'X', ',']).collect();
    match parts.as_slice() {
        [n] => {
            let n = parse_flag("window", n)?;
            Ok([n, n])
        }
        [a, b] => Ok([parse_flag("window", a)?, parse_flag("window", b)?]),
        _ => Err(Error::InvalidConfig(format!(
            "expected WxH, got '{}'",
            value
        ))),
    }
}

fn print_help() {
    println!(
        r#"Room visualization tools - trajectory overlays, heatmaps, affordance maps

OPTIONS:
    --config <FILE>     Load settings from a TOML file (default: {config})
    --input <DIR>       Directory of room JSON files
    --output <DIR>      Directory for rendered images
    --scale <N>         Grid cells per room unit (default: {scale})
    --steps <N>         Interpolation steps per trajectory segment (default: {steps})
    --cut <N>           Trajectory points skipped at the start (default: {cut})
    --end-cut <N>       Trajectory points dropped at the end (default: {end_cut})
    --dilation <WxH>    Grey dilation window (default: 3x3)
    --sigma <N>         Gaussian blur sigma in cells (default: {sigma})
    --threads <N>       Worker threads, 0 = all cores (default: 0)
    --font <FILE>       TTF/OTF font used for furniture labels
    --ext <EXT>         Output image extension (default: {ext})
    --axes <A,B>        Vertex components forming the drawing plane
                        (default: 0,1; layouts: 0,2)
    --max-cells <N>     Skip rooms whose grid exceeds N cells (default: {max_cells})
    --stats <FILE>      Affordance statistics JSON (affordance tool only)
    --help, -h          Show this help

LOGGING:
    RUST_LOG=debug for per-room detail
"#,
        config = CONFIG_FILE,
        scale = DEFAULT_MAP_SCALE,
        steps = DEFAULT_INTERPOLATION_STEPS,
        cut = DEFAULT_START_CUT,
        end_cut = DEFAULT_END_CUT,
        sigma = DEFAULT_GAUSSIAN_SIGMA,
        ext = DEFAULT_IMAGE_EXTENSION,
        max_cells = DEFAULT_MAX_GRID_CELLS,
    );
}
