//! Frame-rate/latency histogram logging and optional CSV export, in the
//! same spirit as the workspace's per-frame timing diagnostics.

use std::path::Path;

use hdrhistogram::Histogram;

/// Tracks per-frame processing latency and periodically logs percentiles.
pub struct FrameTelemetry {
    latency_us: Histogram<u64>,
    csv_writer: Option<csv::Writer<std::fs::File>>,
    frames_since_report: u64,
    report_every: u64,
}

impl FrameTelemetry {
    pub fn new(csv_path: Option<&Path>, report_every: u64) -> std::io::Result<Self> {
        let csv_writer = match csv_path {
            Some(path) => {
                let mut writer = csv::Writer::from_path(path)?;
                writer.write_record(["frame_index", "latency_us"])?;
                writer.flush()?;
                Some(writer)
            }
            None => None,
        };

        Ok(FrameTelemetry {
            latency_us: Histogram::new(3).expect("fixed histogram parameters are valid"),
            csv_writer,
            frames_since_report: 0,
            report_every,
        })
    }

    pub fn record(&mut self, frame_index: u64, latency: std::time::Duration) {
        let micros = latency.as_micros().min(u64::MAX as u128) as u64;
        let _ = self.latency_us.record(micros);

        if let Some(writer) = &mut self.csv_writer {
            if writer.write_record(&[frame_index.to_string(), micros.to_string()]).is_ok() {
                let _ = writer.flush();
            }
        }

        self.frames_since_report += 1;
        if self.frames_since_report >= self.report_every {
            self.frames_since_report = 0;
            tracing::info!(
                p50_us = self.latency_us.value_at_quantile(0.5),
                p99_us = self.latency_us.value_at_quantile(0.99),
                max_us = self.latency_us.max(),
                "frame latency"
            );
        }
    }
}
