use anyhow::{anyhow, Context};
use config::{Config, File};
use hexsamp::{
    timed, DisplayMode, GridConfig, Kernel, ResampleConfig, Resampler,
};
use image::RgbImage;
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;
use std::{
    fs,
    path::{Path, PathBuf},
    process,
};
use structopt::StructOpt;
use validator::Validate;

/// CLI for resampling images onto a hexagonal grid via the hexsamp kit.
#[derive(Debug, StructOpt)]
#[structopt(name = "hexsamp")]
struct Opt {
    /// Path to the image to resample. Supported formats: PNG, JPEG
    #[structopt(short, long)]
    input: PathBuf,

    /// Path to write the resampled frame to, as a PNG
    #[structopt(short, long)]
    output: PathBuf,

    /// Path to a config file that defines the grid and resampling options.
    /// Supported formats: JSON, TOML. Any options passed on the command line
    /// override values from the file.
    #[structopt(short, long)]
    config: Option<PathBuf>,

    /// If given, the full config used for the run is written to this path,
    /// in TOML format
    #[structopt(long)]
    save_config: Option<PathBuf>,

    /// Number of levels in the hex grid, from 3 to 6
    #[structopt(long)]
    order: Option<u32>,

    /// Size of one output pixel in hex units
    #[structopt(long)]
    scale: Option<f64>,

    /// Neighbor search radius in hex units. Values above 1 check 49 cells
    /// around each output pixel instead of 7
    #[structopt(long)]
    radius: Option<f64>,

    /// Interpolation kernel. Supported kernels: linear, cubic, lanczos,
    /// b_spline
    #[structopt(short, long)]
    kernel: Option<Kernel>,

    /// How to lay out the output. Supported modes:
    ///
    /// hexagonal - One pixel per cell, arranged in the grid's display layout
    ///
    /// square - Cells resampled back into a square image
    #[structopt(short, long)]
    display_mode: Option<DisplayMode>,

    /// Width of the output frame. Defaults to the input width
    #[structopt(long)]
    width: Option<usize>,

    /// Height of the output frame. Defaults to the input height
    #[structopt(long)]
    height: Option<usize>,

    /// Process the frame this many times, for timing. Only the last result is
    /// written out.
    #[structopt(long, default_value = "1")]
    frames: usize,

    /// The logging level to use. See
    /// https://docs.rs/log/0.4.11/log/enum.LevelFilter.html for options
    #[structopt(long, default_value = "info")]
    log_level: LevelFilter,
}

impl Opt {
    /// Apply any config overrides from the command line
    fn apply_overrides(&self, config: &mut ResampleConfig) {
        let grid: &mut GridConfig = &mut config.grid;
        if let Some(order) = self.order {
            grid.order = order;
        }
        if let Some(scale) = self.scale {
            grid.scale = scale;
        }
        if let Some(radius) = self.radius {
            grid.radius = radius;
        }
        if let Some(kernel) = self.kernel {
            config.kernel = kernel;
        }
        if let Some(display_mode) = self.display_mode {
            config.display_mode = display_mode;
        }
    }
}

fn load_config(config_path: &Path) -> anyhow::Result<ResampleConfig> {
    let mut settings = Config::new();
    let config_path = config_path.to_str().ok_or_else(|| {
        anyhow!("invalid character in path {:?}", config_path)
    })?;
    settings
        .merge(File::with_name(config_path))
        .context("error reading config file")?;
    settings.try_into().context("error reading config")
}

fn save_config(path: &Path, config: &ResampleConfig) -> anyhow::Result<()> {
    let contents =
        toml::to_string_pretty(config).context("error serializing config")?;
    fs::write(path, contents)
        .with_context(|| format!("error writing config to {:?}", path))?;
    info!("Saved config to {:?}", path);
    Ok(())
}

/// Run the CLI with some options
fn run(opt: Opt) -> anyhow::Result<()> {
    SimpleLogger::new().with_level(opt.log_level).init()?;

    let mut config = match &opt.config {
        Some(config_path) => load_config(config_path)?,
        None => ResampleConfig::default(),
    };
    opt.apply_overrides(&mut config);
    config.validate().context("invalid config")?;
    info!("Using config {:#?}", config);
    if let Some(path) = &opt.save_config {
        save_config(path, &config)?;
    }

    let input = image::open(&opt.input)
        .with_context(|| format!("error loading image {:?}", &opt.input))?
        .to_rgb8();
    let (src_width, src_height) =
        (input.width() as usize, input.height() as usize);
    info!(
        "Loaded {}x{} image from {:?}",
        src_width, src_height, &opt.input
    );

    let width = opt.width.unwrap_or(src_width);
    let height = opt.height.unwrap_or(src_height);
    let mut resampler = Resampler::new(config.grid, width, height)?;
    let src = input.into_raw();
    let mut dst = vec![0; width * height * 3];
    for frame in 0..opt.frames {
        timed!(format!("Frame {}", frame), log::Level::Info, {
            resampler.process(
                &src,
                src_width,
                src_height,
                &mut dst,
                config.kernel,
                config.display_mode,
            )
        })?;
    }

    let output = RgbImage::from_raw(width as u32, height as u32, dst)
        .ok_or_else(|| {
            anyhow!("output frame doesn't match {}x{}", width, height)
        })?;
    timed!(
        format!("Writing output to {:?}", &opt.output),
        log::Level::Info,
        output.save(&opt.output)
    )
    .with_context(|| format!("error writing image to {:?}", &opt.output))?;

    Ok(())
}

fn main() {
    let exit_code = match run(Opt::from_args()) {
        Ok(_) => 0,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            1
        }
    };
    process::exit(exit_code);
}
