//! CSV recording of emitted samples
//!
//! Produces the same layout the host application exports, so a simulated
//! session can be diffed against what the host captured.

use crate::error::{Result, SimError};
use crate::signal::frame::format_distance;
use crate::signal::Sample;
use chrono::Local;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const CSV_HEADER: &str = "ID,Timestamp,Distance(cm)";

/// Writes one CSV row per emitted sample
pub struct Recorder<W: Write> {
    writer: W,
    path: String,
    rows: u64,
}

impl Recorder<BufWriter<File>> {
    /// Create (or truncate) a CSV file and write the header
    pub fn create(path: &Path) -> Result<Self> {
        let label = path.display().to_string();
        let file = File::create(path).map_err(|source| SimError::Record {
            path: label.clone(),
            source,
        })?;
        Self::new(BufWriter::new(file), label)
    }
}

impl<W: Write> Recorder<W> {
    pub fn new(writer: W, path: String) -> Result<Self> {
        let mut recorder = Self {
            writer,
            path,
            rows: 0,
        };
        recorder.write_line(CSV_HEADER.to_string())?;
        Ok(recorder)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn record(&mut self, sample: &Sample) -> Result<()> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        self.write_line(format!(
            "{},{},{}",
            sample.sequence,
            timestamp,
            format_distance(sample.distance)
        ))?;
        self.rows += 1;
        Ok(())
    }

    fn write_line(&mut self, line: String) -> Result<()> {
        writeln!(self.writer, "{}", line)
            .and_then(|_| self.writer.flush())
            .map_err(|source| SimError::Record {
                path: self.path.clone(),
                source,
            })
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample(sequence: u64, distance: f64) -> Sample {
        Sample {
            sequence,
            raw: distance,
            distance,
        }
    }

    #[test]
    fn test_header_and_rows() {
        let mut recorder = Recorder::new(Vec::new(), "memory".to_string()).unwrap();
        recorder.record(&sample(0, 147.321)).unwrap();
        recorder.record(&sample(1, 10.0)).unwrap();
        assert_eq!(recorder.rows(), 2);

        let text = String::from_utf8(recorder.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);

        let fields: Vec<&str> = lines[1].split(',').collect();
        assert_eq!(fields[0], "0");
        assert_eq!(fields[1].len(), "2026-01-01 00:00:00".len());
        assert_eq!(fields[2], "147.32");
        assert!(lines[2].ends_with(",10.00"));
    }

    #[test]
    fn test_create_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.csv");
        let mut recorder = Recorder::create(&path).unwrap();
        recorder.record(&sample(0, 150.0)).unwrap();
        drop(recorder);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with(CSV_HEADER));
        assert!(content.contains(",150.00\n"));
    }

    #[test]
    fn test_create_in_missing_dir() {
        let err = Recorder::create(Path::new("/nonexistent/dir/session.csv"))
            .err()
            .unwrap();
        assert!(matches!(err, SimError::Record { .. }));
    }
}
