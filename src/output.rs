//! CSV trajectory writer, mirroring the shape of a state-vector sequence
//! produced by [`crate::driver::solve`] into a file a plotting tool can
//! open directly.

use std::io;
use std::path::Path;

/// Write `trajectory` (one row per state, `t0 + i*h` as the time column) to
/// `path` as CSV with a header row `t,y0,y1,...`.
pub fn write_trajectory_csv<P: AsRef<Path>>(
    path: P,
    t0: f64,
    h: f64,
    trajectory: &[Vec<f64>],
) -> io::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let dim = trajectory.first().map(|row| row.len()).unwrap_or(0);
    let mut header = vec!["t".to_string()];
    header.extend((0..dim).map(|i| format!("y{i}")));
    writer.write_record(&header)?;

    for (i, state) in trajectory.iter().enumerate() {
        let t = t0 + i as f64 * h;
        let mut record = vec![format!("{t:.10e}")];
        record.extend(state.iter().map(|v| format!("{v:.10e}")));
        writer.write_record(&record)?;
    }

    writer.flush()
}
