use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use sapin::Config;
use sapin::draw::RecordingCanvas;
use sapin::surface::{self, SurfaceOptions};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sapin")]
#[command(
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("SAPIN_GIT_HASH"), ")"),
    about = "Reticle overlay renderer: crosshair, dot and twix shapes"
)]
struct Cli {
    /// Config file to use instead of ~/.config/sapin/config.toml
    #[arg(long, short = 'c', value_name = "PATH")]
    config: Option<PathBuf>,

    /// Where to write the rendered PNG
    #[arg(long, short = 'o', value_name = "PATH", default_value = "reticle.png")]
    output: PathBuf,

    /// Device scale factor (e.g. 1.25 or 2 on HiDPI outputs)
    #[arg(long, short = 's', value_name = "FACTOR", default_value_t = 1.0, value_parser = parse_scale)]
    scale: f64,

    /// Render onto a larger host surface, placed by the configured position
    #[arg(long, value_name = "WxH", value_parser = parse_dimensions)]
    canvas: Option<(i32, i32)>,

    /// Outline bounding boxes regardless of the config
    #[arg(long, short = 'd', action = ArgAction::SetTrue)]
    debug: bool,

    /// Print the drawing operations as JSON instead of writing a PNG
    #[arg(long, action = ArgAction::SetTrue)]
    ops: bool,

    /// Write a commented default config file and exit
    #[arg(long, action = ArgAction::SetTrue, conflicts_with_all = ["config", "print_config", "ops"])]
    init_config: bool,

    /// Print the effective config as TOML and exit
    #[arg(long, action = ArgAction::SetTrue)]
    print_config: bool,
}

fn parse_scale(value: &str) -> Result<f64, String> {
    let scale: f64 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if scale.is_finite() && scale > 0.0 {
        Ok(scale)
    } else {
        Err(format!("scale must be greater than 0, got {value}"))
    }
}

fn parse_dimensions(value: &str) -> Result<(i32, i32), String> {
    let (width, height) = value
        .split_once(|c: char| c.eq_ignore_ascii_case(&'x'))
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{value}'"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<i32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| format!("'{part}' is not a positive pixel count"))
    };
    Ok((parse(width)?, parse(height)?))
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if cli.init_config {
        let path = Config::create_default_file()?;
        println!("Created default config at {}", path.display());
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if cli.debug {
        config.debug = true;
    }

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let app = config
        .resolve()
        .context("Invalid reticle configuration")?;
    log::info!(
        "Reticle: {} {}x{}",
        app.shape.kind(),
        app.size.width,
        app.size.height
    );

    if cli.ops {
        let mut canvas = RecordingCanvas::new();
        surface::paint_reticle(&mut canvas, &app)?;
        let ops = canvas.into_ops();
        println!("{}", serde_json::to_string_pretty(&ops)?);
        return Ok(());
    }

    let options = SurfaceOptions {
        scale: cli.scale,
        canvas: cli.canvas,
    };
    let image = surface::render_to_surface(&app, &options)?;
    surface::write_png(&image, &cli.output)
        .with_context(|| format!("Failed to save {}", cli.output.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_parse_width_and_height() {
        assert_eq!(parse_dimensions("1920x1080"), Ok((1920, 1080)));
        assert_eq!(parse_dimensions("64X48"), Ok((64, 48)));
        assert!(parse_dimensions("1920").is_err());
        assert!(parse_dimensions("0x10").is_err());
        assert!(parse_dimensions("-4x10").is_err());
    }

    #[test]
    fn scale_must_be_positive() {
        assert_eq!(parse_scale("1.5"), Ok(1.5));
        assert!(parse_scale("0").is_err());
        assert!(parse_scale("inf").is_err());
        assert!(parse_scale("abc").is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
