//! CSV time series for per-frame scalar outputs.

use crate::error::ConfigError;
use std::fs::File;
use std::path::Path;

/// Appends per-frame scalar samples to a CSV file.
///
/// One row per frame: frame index, normalized time, then one column per
/// channel (EMF, net force components, and so on). Accumulating the series
/// is the animation driver's fold over the ordered frame sequence; this
/// writer only records the values it is handed.
pub struct TimeSeriesWriter {
    writer: csv::Writer<File>,
}

impl TimeSeriesWriter {
    /// Creates the file and writes the header row.
    pub fn create<P: AsRef<Path>>(
        path: P,
        channels: &[&str],
    ) -> Result<TimeSeriesWriter, ConfigError> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        let mut header = vec!["frame".to_string(), "t".to_string()];
        header.extend(channels.iter().map(|c| c.to_string()));
        writer.write_record(&header)?;

        Ok(TimeSeriesWriter { writer })
    }

    /// Appends one frame's samples.
    pub fn append(&mut self, frame: u64, t: f64, values: &[f64]) -> Result<(), ConfigError> {
        let mut record = vec![frame.to_string(), format!("{}", t)];
        record.extend(values.iter().map(|v| format!("{}", v)));
        self.writer.write_record(&record)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), ConfigError> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn test_time_series_rows() {
        let path = std::env::temp_dir().join("linmag_time_series_test.csv");

        let mut writer =
            TimeSeriesWriter::create(&path, &["emf", "net_fx", "net_fy"]).expect("file created");
        writer.append(0, 0.0, &[6.0, 0.1, -0.2]).expect("row written");
        writer.append(1, 0.005, &[5.5, 0.2, -0.1]).expect("row written");
        writer.flush().expect("flushed");
        std::mem::drop(writer);

        let contents = std::fs::read_to_string(&path).expect("file readable");
        std::fs::remove_file(&path).ok();

        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "frame,t,emf,net_fx,net_fy");
        assert!(lines[1].starts_with("0,0,6"));
    }
}
