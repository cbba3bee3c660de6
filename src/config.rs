// Command-line configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::error::Error;
use crate::stroke::DEFAULT_STROKE_WIDTH;

/// Widest pen accepted from the command line, in pixels.
pub const MAX_STROKE_WIDTH: f32 = 1000.0;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Freehand sketchpad that encodes drawings into classifier input")]
pub struct Config {
    /// Surface width in pixels
    #[arg(long, default_value_t = 280)]
    pub width: usize,

    /// Surface height in pixels
    #[arg(long, default_value_t = 280)]
    pub height: usize,

    /// Pen width in pixels
    #[arg(long, default_value_t = DEFAULT_STROKE_WIDTH)]
    pub stroke_width: f32,

    /// Draw hard-edged strokes (no fractional coverage on the rim)
    #[arg(long)]
    pub no_antialias: bool,

    /// Directory holding the persisted snapshot
    #[arg(long, value_name = "DIR", default_value = ".sketchpad")]
    pub store_dir: PathBuf,

    /// Keep the sketch in memory only; nothing is restored or saved
    #[arg(long)]
    pub no_persist: bool,

    /// File that receives the comma-separated vector on submit (stdout if absent)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Block-average the vector by this factor before writing it (e.g. 10: 280x280 -> 28x28)
    #[arg(long, value_name = "FACTOR")]
    pub pool: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 280,
            height: 280,
            stroke_width: DEFAULT_STROKE_WIDTH,
            no_antialias: false,
            store_dir: PathBuf::from(".sketchpad"),
            no_persist: false,
            output: None,
            pool: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), Error> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::Config(format!(
                "surface must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.stroke_width.is_finite()
            || self.stroke_width <= 0.0
            || self.stroke_width > MAX_STROKE_WIDTH
        {
            return Err(Error::Config(format!(
                "stroke width must be in (0, {MAX_STROKE_WIDTH}], got {}",
                self.stroke_width
            )));
        }
        if let Some(f) = self.pool {
            if f == 0 || self.width % f != 0 || self.height % f != 0 {
                return Err(Error::Config(format!(
                    "pool factor {f} must divide {}x{}",
                    self.width, self.height
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_pad() {
        let cfg = Config::parse_from(["sketchpad"]);
        assert_eq!((cfg.width, cfg.height), (280, 280));
        assert_eq!(cfg.stroke_width, 10.0);
        assert!(!cfg.no_antialias);
        assert_eq!(cfg.pool, None);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn flags_parse() {
        let cfg = Config::parse_from([
            "sketchpad", "--width", "224", "--height", "224", "--stroke-width", "16",
            "--pool", "8", "-o", "vec.csv", "--no-persist",
        ]);
        assert_eq!(cfg.width, 224);
        assert_eq!(cfg.stroke_width, 16.0);
        assert_eq!(cfg.pool, Some(8));
        assert_eq!(cfg.output, Some(PathBuf::from("vec.csv")));
        assert!(cfg.no_persist);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn bad_values_are_rejected() {
        let zero = Config { width: 0, ..Config::default() };
        assert!(matches!(zero.validate(), Err(Error::Config(_))));
        let pen = Config { stroke_width: 0.0, ..Config::default() };
        assert!(pen.validate().is_err());
        for width in [f32::INFINITY, f32::NAN, 3.0e9, MAX_STROKE_WIDTH + 1.0, -1.0] {
            let pen = Config { stroke_width: width, ..Config::default() };
            assert!(pen.validate().is_err(), "width {width} accepted");
        }
        let widest = Config { stroke_width: MAX_STROKE_WIDTH, ..Config::default() };
        assert!(widest.validate().is_ok());
        let pool = Config { pool: Some(3), ..Config::default() };
        assert!(pool.validate().is_err());
        let pool = Config { pool: Some(0), ..Config::default() };
        assert!(pool.validate().is_err());
    }
}
