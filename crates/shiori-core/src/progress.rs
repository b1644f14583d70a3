/// Receiver of per-clipping progress updates
pub trait ProgressSink {
    /// `count` increases by one with every call
    fn update(&mut self, label: &str, count: usize);

    fn finish(&mut self);
}

/// Drops every signal (diagnostic runs)
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn update(&mut self, _label: &str, _count: usize) {}

    fn finish(&mut self) {}
}

/// Numbers updates and sends `finish` exactly once, also on early return
pub struct ProgressGuard<'a> {
    sink: &'a mut dyn ProgressSink,
    count: usize,
}

impl<'a> ProgressGuard<'a> {
    pub fn new(sink: &'a mut dyn ProgressSink) -> Self {
        Self { sink, count: 0 }
    }

    pub fn tick(&mut self, label: &str) {
        self.count += 1;
        self.sink.update(label, self.count);
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl Drop for ProgressGuard<'_> {
    fn drop(&mut self) {
        self.sink.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        updates: Vec<(String, usize)>,
        finished: usize,
    }

    impl ProgressSink for Recorder {
        fn update(&mut self, label: &str, count: usize) {
            self.updates.push((label.to_string(), count));
        }

        fn finish(&mut self) {
            self.finished += 1;
        }
    }

    #[test]
    fn counts_monotonically_and_finishes_once() {
        let mut recorder = Recorder::default();
        {
            let mut guard = ProgressGuard::new(&mut recorder);
            guard.tick("a");
            guard.tick("b");
            assert_eq!(guard.count(), 2);
        }

        assert_eq!(
            recorder.updates,
            vec![("a".to_string(), 1), ("b".to_string(), 2)]
        );
        assert_eq!(recorder.finished, 1);
    }

    #[test]
    fn finishes_on_early_return() {
        fn fails(sink: &mut dyn ProgressSink) -> Result<(), ()> {
            let mut guard = ProgressGuard::new(sink);
            guard.tick("only");
            Err(())
        }

        let mut recorder = Recorder::default();
        assert!(fails(&mut recorder).is_err());
        assert_eq!(recorder.finished, 1);
    }
}
