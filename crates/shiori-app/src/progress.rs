use shiori_core::progress::ProgressSink;

/// Reports per-clipping progress through the log
#[derive(Debug, Default)]
pub struct LogProgress {
    processed: usize,
    finished: bool,
}

impl LogProgress {
    pub fn processed(&self) -> usize {
        self.processed
    }
}

impl ProgressSink for LogProgress {
    fn update(&mut self, label: &str, count: usize) {
        self.processed = count;
        let preview: String = label.chars().take(24).collect();
        tracing::info!("[{}] {}", count, preview);
    }

    fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        tracing::info!("Processed {} highlights", self.processed);
    }
}
