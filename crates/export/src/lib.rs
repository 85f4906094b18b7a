//! Export helpers for CSV and JSON artifacts.

pub mod trajectory {
    use std::fs::{self, File};
    use std::io::{self, BufWriter, Write};
    use std::path::Path;

    use traj_simulation::{Trajectory, TrajectorySample};

    pub const HEADER: &str = "time_s,x_m,y_m,vx_m_s,vy_m_s";

    /// Create a writer for the target path, handling stdout (`-`) by convention.
    pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
        if path == Path::new("-") {
            return Ok(Box::new(BufWriter::new(io::stdout())));
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }

    pub fn write_header(writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)
    }

    /// Serialize one sample, matching the header ordering.
    pub fn write_sample(writer: &mut dyn Write, sample: &TrajectorySample) -> io::Result<()> {
        writeln!(
            writer,
            "{},{},{},{},{}",
            sample.time, sample.x, sample.y, sample.vx, sample.vy
        )
    }

    /// Header plus one row per sample.
    pub fn write_trajectory(writer: &mut dyn Write, trajectory: &Trajectory) -> io::Result<()> {
        write_header(writer)?;
        for sample in trajectory {
            write_sample(writer, sample)?;
        }
        writer.flush()
    }
}

pub mod summary {
    use serde::Serialize;
    use serde_json::to_writer_pretty;
    use std::fs::{self, File};
    use std::io::{self, Write};
    use std::path::{Path, PathBuf};

    use traj_simulation::{GroundCrossing, SamplePoint, TrajectorySummary};

    /// Metadata describing the run that produced a trajectory.
    #[derive(Debug)]
    pub struct Metadata<'a> {
        pub generated_utc: &'a str,
        pub integrator: &'a str,
        pub time_step_s: f64,
        pub max_time_s: f64,
    }

    #[derive(Serialize)]
    struct SummarySidecar<'a> {
        generated_utc: &'a str,
        integrator: &'a str,
        time_step_s: f64,
        max_time_s: f64,
        sample_count: usize,
        apex: &'a SamplePoint,
        final_sample: &'a SamplePoint,
        range_m: f64,
        flight_time_s: Option<f64>,
        ground_crossing: Option<&'a GroundCrossing>,
        peak_speed_m_s: f64,
    }

    /// `<stem>_summary.json` next to the CSV output.
    pub fn sidecar_path(output: &Path) -> PathBuf {
        let parent = output.parent().unwrap_or_else(|| Path::new("."));
        let stem = output
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("trajectory");
        parent.join(format!("{}_summary.json", stem))
    }

    /// Pretty-print the summary JSON to any writer.
    pub fn write_summary(
        writer: &mut dyn Write,
        meta: &Metadata<'_>,
        summary: &TrajectorySummary,
    ) -> io::Result<()> {
        let sidecar = SummarySidecar {
            generated_utc: meta.generated_utc,
            integrator: meta.integrator,
            time_step_s: meta.time_step_s,
            max_time_s: meta.max_time_s,
            sample_count: summary.sample_count,
            apex: &summary.apex,
            final_sample: &summary.final_sample,
            range_m: summary.range_m,
            flight_time_s: summary.flight_time_s(),
            ground_crossing: summary.ground_crossing.as_ref(),
            peak_speed_m_s: summary.peak_speed_m_s,
        };
        to_writer_pretty(&mut *writer, &sidecar)?;
        writeln!(writer)
    }

    /// Write the summary JSON sidecar to `path`, creating parent directories.
    pub fn write_sidecar(
        path: &Path,
        meta: &Metadata<'_>,
        summary: &TrajectorySummary,
    ) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = File::create(path)?;
        write_summary(&mut file, meta, summary)
    }
}
