use clap::{ArgAction, Parser};
use csv::ReaderBuilder;
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Render a trajectory CSV (x_m, y_m) to PNG"
)]
struct Cli {
    #[arg(long)]
    input: PathBuf,
    #[arg(long, default_value = "artifacts/trajectory.png")]
    output: PathBuf,
    #[arg(long, default_value = "Projectile Trajectory")]
    title: String,
    #[arg(long, default_value_t = 1000)]
    width: u32,
    #[arg(long, default_value_t = 600)]
    height: u32,
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

struct Bounds {
    x: (f64, f64),
    y: (f64, f64),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let points = read_points(&cli.input)?;
    if points.is_empty() {
        return Err(anyhow::anyhow!(
            "No finite (x_m, y_m) rows in {}",
            cli.input.display()
        ));
    }
    log::info!("plotting {} samples from {}", points.len(), cli.input.display());

    if let Some(parent) = cli.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let bounds = bounds(&points);

    if let Err(err) = render(&cli, &points, &bounds, true) {
        log::warn!("labelled render failed ({err}); retrying without text");
        render(&cli, &points, &bounds, false)?;
    }
    Ok(())
}

fn render(cli: &Cli, points: &[(f64, f64)], bounds: &Bounds, labelled: bool) -> anyhow::Result<()> {
    let root = BitMapBackend::new(&cli.output, (cli.width, cli.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_min, x_max) = bounds.x;
    let (y_min, y_max) = bounds.y;

    let mut builder = ChartBuilder::on(&root);
    builder.margin(20);
    if labelled {
        let font_family = select_font_family();
        builder
            .caption(&cli.title, FontDesc::new(font_family, 24.0, FontStyle::Bold))
            .x_label_area_size(50)
            .y_label_area_size(70);
    }
    let mut chart = builder.build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    if labelled {
        let label_font = FontDesc::new(select_font_family(), 16.0, FontStyle::Normal);
        chart
            .configure_mesh()
            .x_desc("Horizontal Distance (m)")
            .y_desc("Altitude (m)")
            .label_style(label_font.clone())
            .axis_desc_style(label_font)
            .x_labels(8)
            .y_labels(6)
            .draw()?;
    }

    // ground level
    let dash = (x_max - x_min) / 80.0;
    let mut x = x_min;
    while x < x_max {
        let end = (x + dash).min(x_max);
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(x, 0.0), (end, 0.0)],
            ShapeStyle::from(&BLACK).stroke_width(1),
        )))?;
        x += 2.0 * dash;
    }

    chart.draw_series(std::iter::once(PathElement::new(
        points.to_vec(),
        ShapeStyle::from(&BLUE).stroke_width(2),
    )))?;

    root.present()?;
    Ok(())
}

fn select_font_family() -> FontFamily<'static> {
    if cfg!(target_os = "macos") {
        FontFamily::Name("Helvetica")
    } else if cfg!(target_os = "windows") {
        FontFamily::Name("Arial")
    } else {
        FontFamily::Name("DejaVu Sans")
    }
}

fn read_points(path: &Path) -> anyhow::Result<Vec<(f64, f64)>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let headers = rdr.headers()?.clone();
    let x_idx = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("x_m"))
        .ok_or_else(|| anyhow::anyhow!("CSV missing 'x_m' column"))?;
    let y_idx = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("y_m"))
        .ok_or_else(|| anyhow::anyhow!("CSV missing 'y_m' column"))?;

    let mut points = Vec::new();
    for rec in rdr.records() {
        let r = rec?;
        let x: f64 = r.get(x_idx).unwrap_or("").parse().unwrap_or(f64::NAN);
        let y: f64 = r.get(y_idx).unwrap_or("").parse().unwrap_or(f64::NAN);
        if x.is_finite() && y.is_finite() {
            points.push((x, y));
        }
    }
    Ok(points)
}

/// Data extent padded by 5%, always including the ground line.
fn bounds(points: &[(f64, f64)]) -> Bounds {
    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (0.0_f64, 0.0_f64);
    for &(x, y) in points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    Bounds {
        x: padded(x_min, x_max),
        y: padded(y_min, y_max),
    }
}

fn padded(min: f64, max: f64) -> (f64, f64) {
    let span = max - min;
    if span <= f64::EPSILON {
        (min - 1.0, max + 1.0)
    } else {
        (min - 0.05 * span, max + 0.05 * span)
    }
}
