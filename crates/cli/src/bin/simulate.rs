use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{SecondsFormat, Utc};
use clap::{ArgAction, Parser, ValueEnum};
use trajectory_simulator::config::{keys, load_parameters};
use trajectory_simulator::export::{summary as export_summary, trajectory as export_trajectory};
use trajectory_simulator::simulation::{
    ParameterMap, RunControl, SimulationConfig, Simulator, TrajectorySummary,
};

/// Integrate a point-mass trajectory under gravity, drag and wind, and write it as CSV.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Projectile trajectory simulator (drag + wind)"
)]
struct Cli {
    /// YAML or TOML parameter file; flags given on the command line override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Initial horizontal position (m)
    #[arg(long, allow_negative_numbers = true)]
    x0: Option<f64>,

    /// Initial altitude (m)
    #[arg(long, allow_negative_numbers = true)]
    y0: Option<f64>,

    /// Initial horizontal velocity (m/s)
    #[arg(long, allow_negative_numbers = true)]
    vx0: Option<f64>,

    /// Initial vertical velocity (m/s)
    #[arg(long, allow_negative_numbers = true)]
    vy0: Option<f64>,

    /// Projectile mass (kg)
    #[arg(long)]
    mass: Option<f64>,

    /// Frontal area (m²)
    #[arg(long)]
    cross_sectional_area: Option<f64>,

    /// Sampling interval (s), default 0.1
    #[arg(long)]
    time_step: Option<f64>,

    /// Sampling horizon (s), default 10
    #[arg(long)]
    max_time: Option<f64>,

    /// Gravitational acceleration (m/s²), default 9.81
    #[arg(long)]
    gravity: Option<f64>,

    /// Air density (kg/m³), default 1.225
    #[arg(long)]
    air_density: Option<f64>,

    /// Drag coefficient, default 0.47
    #[arg(long)]
    drag_coefficient: Option<f64>,

    /// Steady wind speed (m/s)
    #[arg(long, allow_negative_numbers = true)]
    wind_speed: Option<f64>,

    /// Wind bearing in degrees (0 = +y, 90 = +x)
    #[arg(long, allow_negative_numbers = true)]
    wind_direction: Option<f64>,

    /// Grow wind speed by 10% per km of altitude
    #[arg(long, default_value_t = false)]
    altitude_variation: bool,

    /// Integration method
    #[arg(long, value_enum)]
    integrator: Option<Method>,

    /// Stop after the first sample below ground
    #[arg(long, default_value_t = false)]
    truncate_at_ground: bool,

    /// Output CSV file (use '-' for stdout)
    #[arg(long, default_value = "artifacts/trajectory.csv")]
    output: PathBuf,

    /// Summary JSON path (defaults to `<output stem>_summary.json`)
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum Method {
    Adaptive,
    Rk4,
}

impl Method {
    fn key(self) -> &'static str {
        match self {
            Method::Adaptive => "adaptive",
            Method::Rk4 => "rk4",
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let params = collect_parameters(&cli)?;
    let config = Simulator::default().resolve(&params)?;
    let trajectory = Simulator::run_config(&config, &RunControl::default())?;

    let mut writer = export_trajectory::writer_for_path(&cli.output)
        .with_context(|| format!("cannot open {}", cli.output.display()))?;
    export_trajectory::write_trajectory(writer.as_mut(), &trajectory)?;
    drop(writer);

    let to_stdout = cli.output == Path::new("-");
    let Some(summary) = TrajectorySummary::from_trajectory(&trajectory) else {
        return Err(anyhow::anyhow!("simulation produced no samples"));
    };

    let summary_path = match (&cli.summary, to_stdout) {
        (Some(path), _) => Some(path.clone()),
        (None, false) => Some(export_summary::sidecar_path(&cli.output)),
        (None, true) => None,
    };
    if let Some(path) = &summary_path {
        let generated_utc = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let meta = export_summary::Metadata {
            generated_utc: &generated_utc,
            integrator: config.integrator.name(),
            time_step_s: config.initial.time_step,
            max_time_s: config.initial.max_time,
        };
        export_summary::write_sidecar(path, &meta, &summary)
            .with_context(|| format!("cannot write {}", path.display()))?;
    }

    let report = render_report(&config, &summary, &cli.output, summary_path.as_deref());
    if to_stdout {
        eprint!("{report}");
    } else {
        print!("{report}");
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Config file first, then any flag given on the command line.
fn collect_parameters(cli: &Cli) -> anyhow::Result<ParameterMap> {
    let mut params = match &cli.config {
        Some(path) => load_parameters(path)
            .with_context(|| format!("cannot load {}", path.display()))?,
        None => ParameterMap::new(),
    };

    let numeric = [
        (keys::X0, cli.x0),
        (keys::Y0, cli.y0),
        (keys::VX0, cli.vx0),
        (keys::VY0, cli.vy0),
        (keys::MASS, cli.mass),
        (keys::CROSS_SECTIONAL_AREA, cli.cross_sectional_area),
        (keys::TIME_STEP, cli.time_step),
        (keys::MAX_TIME, cli.max_time),
        (keys::GRAVITY, cli.gravity),
        (keys::AIR_DENSITY, cli.air_density),
        (keys::DRAG_COEFFICIENT, cli.drag_coefficient),
        (keys::WIND_SPEED, cli.wind_speed),
        (keys::WIND_DIRECTION, cli.wind_direction),
    ];
    for (key, value) in numeric {
        if let Some(value) = value {
            params.insert(key, value);
        }
    }
    if cli.altitude_variation {
        params.insert(keys::ALTITUDE_VARIATION, true);
    }
    if cli.truncate_at_ground {
        params.insert(keys::TRUNCATE_AT_GROUND, true);
    }
    if let Some(method) = cli.integrator {
        params.insert(keys::INTEGRATOR, method.key());
    }
    Ok(params)
}

fn render_report(
    config: &SimulationConfig,
    summary: &TrajectorySummary,
    output: &Path,
    summary_path: Option<&Path>,
) -> String {
    let mut out = String::new();
    let mut line = |label: &str, value: String| {
        out.push_str(&format!("{label:<16}: {value}\n"));
    };
    line("Integrator", config.integrator.name().to_string());
    line(
        "Samples",
        format!(
            "{} (dt = {} s, horizon {} s)",
            summary.sample_count, config.initial.time_step, config.initial.max_time
        ),
    );
    line(
        "Apex",
        format!(
            "y = {:.3} m at t = {:.2} s (x = {:.3} m)",
            summary.apex.y_m, summary.apex.time_s, summary.apex.x_m
        ),
    );
    line(
        "Final sample",
        format!(
            "t = {:.2} s, x = {:.3} m, y = {:.3} m",
            summary.final_sample.time_s, summary.final_sample.x_m, summary.final_sample.y_m
        ),
    );
    line("Range", format!("{:.3} m", summary.range_m));
    line(
        "Ground crossing",
        match summary.ground_crossing {
            Some(c) => format!("t = {:.3} s, x = {:.3} m", c.time_s, c.x_m),
            None => "none within horizon".to_string(),
        },
    );
    line("Peak speed", format!("{:.3} m/s", summary.peak_speed_m_s));
    line("CSV", output.display().to_string());
    if let Some(path) = summary_path {
        line("Summary JSON", path.display().to_string());
    }
    format!("=== Trajectory Summary ===\n{out}")
}
