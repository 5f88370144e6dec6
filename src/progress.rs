//! Progress reporting for conversions.
//!
//! A [`ProgressSink`] receives integer percentages synchronously, on the task
//! that runs the conversion. Any `FnMut(u8)` closure is a sink.

/// Receiver of conversion progress, in percent (0-100).
pub trait ProgressSink {
    fn report(&mut self, percent: u8);
}

impl<F> ProgressSink for F
where
    F: FnMut(u8),
{
    fn report(&mut self, percent: u8) {
        self(percent)
    }
}

/// Wraps an optional sink and only forwards strictly increasing values.
pub struct Progress<'a> {
    sink: Option<&'a mut dyn ProgressSink>,
    last: Option<u8>,
}

impl<'a> Progress<'a> {
    pub fn new(sink: Option<&'a mut dyn ProgressSink>) -> Self {
        Self { sink, last: None }
    }

    /// Reports `percent`, clamped to 100. Values not above the last reported
    /// one are dropped.
    pub fn report(&mut self, percent: u8) {
        let percent = percent.min(100);
        if self.last.is_some_and(|last| percent <= last) {
            return;
        }
        self.last = Some(percent);
        if let Some(sink) = self.sink.as_mut() {
            sink.report(percent);
        }
    }

    /// Reports the share of `done` out of `total` mapped onto `[from, to]`.
    /// With `total == 0` the range is complete and `to` is reported.
    pub fn report_fraction(&mut self, from: u8, to: u8, done: usize, total: usize) {
        if total == 0 {
            self.report(to);
            return;
        }
        let span = usize::from(to.saturating_sub(from));
        let step = span * done.min(total) / total;
        self.report(from + step as u8);
    }

    pub fn last(&self) -> Option<u8> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_is_strictly_increasing() {
        let mut seen = Vec::new();
        let mut sink = |p: u8| seen.push(p);
        let mut progress = Progress::new(Some(&mut sink));
        for value in [10, 40, 40, 30, 50, 100, 100, 120] {
            progress.report(value);
        }
        assert_eq!(progress.last(), Some(100));
        drop(progress);
        assert_eq!(seen, vec![10, 40, 50, 100]);
    }

    #[test]
    fn test_report_fraction() {
        let mut seen = Vec::new();
        let mut sink = |p: u8| seen.push(p);
        let mut progress = Progress::new(Some(&mut sink));
        progress.report(50);
        for done in 1..=3 {
            progress.report_fraction(50, 100, done, 3);
        }
        drop(progress);
        assert_eq!(seen, vec![50, 66, 83, 100]);
    }

    #[test]
    fn test_report_fraction_with_zero_total() {
        let mut seen = Vec::new();
        let mut sink = |p: u8| seen.push(p);
        let mut progress = Progress::new(Some(&mut sink));
        progress.report(50);
        progress.report_fraction(50, 100, 0, 0);
        drop(progress);
        assert_eq!(seen, vec![50, 100]);
    }

    #[test]
    fn test_progress_without_sink() {
        let mut progress = Progress::new(None);
        progress.report(10);
        assert_eq!(progress.last(), Some(10));
    }
}
