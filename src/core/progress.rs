use std::time::Instant;

pub const REPORT_EVERY: usize = 100;

/// 吞吐量與剩餘時間的進度列
pub struct Progress {
    total: usize,
    processed: usize,
    last_reported: usize,
    started: Instant,
}

impl Progress {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            processed: 0,
            last_reported: 0,
            started: Instant::now(),
        }
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    /// 已在先前執行中完成的 POI，只計數不輸出
    pub fn skip(&mut self) {
        self.processed += 1;
    }

    pub fn advance(&mut self) -> Option<String> {
        self.processed += 1;
        if self.processed % REPORT_EVERY == 0 || self.processed == self.total {
            Some(self.report_line())
        } else {
            None
        }
    }

    /// 最後一筆若是略過的 POI，補印完成進度
    pub fn finish(&mut self) -> Option<String> {
        if self.last_reported == self.processed {
            None
        } else {
            Some(self.report_line())
        }
    }

    fn report_line(&mut self) -> String {
        self.last_reported = self.processed;
        format_progress(
            self.processed,
            self.total,
            self.started.elapsed().as_secs_f64(),
        )
    }
}

pub fn format_progress(processed: usize, total: usize, elapsed_secs: f64) -> String {
    let pps = processed as f64 / elapsed_secs.max(1e-6);
    let remaining = total.saturating_sub(processed) as f64;
    let eta = remaining / pps.max(1e-6);
    format!(
        "[{}/{}] ok | {:.2} POI/s | ETA ~ {}m {}s",
        processed,
        total,
        pps,
        (eta / 60.0) as u64,
        (eta % 60.0) as u64
    )
}
