use indicatif::{ProgressBar, ProgressStyle};

/// Lightweight progress reporting for long-running pipeline stages. The
/// driver invokes these around per-roaster work; the resolution logic itself
/// never touches the display layer.
pub trait Progress {
    /// Called at the start with the number of items, if known.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when one item (a roaster) completes.
    fn item_done(&mut self, _label: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Terminal progress bar, one tick per completed roaster.
#[derive(Default)]
pub struct BarProgress {
    bar: Option<ProgressBar>,
}

impl Progress for BarProgress {
    fn begin(&mut self, total: usize) {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:40}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        self.bar = Some(bar);
    }

    fn log(&mut self, msg: &str) {
        match &self.bar {
            Some(bar) => bar.println(msg),
            None => log::info!("{msg}"),
        }
    }

    fn item_done(&mut self, label: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(label.to_string());
            bar.inc(1);
        }
    }

    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}
