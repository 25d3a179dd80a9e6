//! Progress bar style and live statistics for the Poincaré run.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use gyromap_particle::{ErrorCause, MappingParameters, Status};

/// The Poincaré map calculation progress bar style.
const POINCARE_PBAR_STYLE: &str = concat!(
    "{msg}\n", // for the live statistics
    "{elapsed_precise} ",
    "[{wide_bar:.cyan/blue}] ",
    "{spinner:.bold} ",
    "{pos:>2}/{len:2} ",
    "({eta}) ",
);

/// The Poincaré map progress bar chars (filled, current, to do).
const POINCARE_PROGRESS_CHARS: &str = "#>-";

pub(crate) struct PoincarePbar {
    pbar: ProgressBar,
    params: MappingParameters,
    length: usize,
    // Live statistics
    mapped: AtomicUsize,
    escaped: AtomicUsize,
    cancelled: AtomicUsize,
    failed: AtomicUsize,
}

impl PoincarePbar {
    /// Initializes the progress bar.
    pub(crate) fn new(length: usize, params: &MappingParameters) -> Self {
        let style = ProgressStyle::with_template(POINCARE_PBAR_STYLE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars(POINCARE_PROGRESS_CHARS);
        let pbar = ProgressBar::new(length as u64).with_style(style);
        pbar.enable_steady_tick(Duration::from_millis(100));
        Self {
            pbar,
            params: *params,
            length,
            mapped: AtomicUsize::default(),
            escaped: AtomicUsize::default(),
            cancelled: AtomicUsize::default(),
            failed: AtomicUsize::default(),
        }
    }

    /// Prints an informative message before the ticking starts.
    pub(crate) fn print_prelude(&self) {
        self.pbar.println(format!(
            "Using {} threads for {} particles",
            rayon::current_num_threads(),
            self.length
        ));
        self.pbar.println(format!(
            "Integrating with {:?} = {:.4} for {} intersections",
            self.params.section, self.params.alpha, self.params.intersections,
        ));
    }

    /// Increases the wrapped pbar, as well as the live statistics.
    pub(crate) fn inc(&self, status: &Status) {
        self.pbar.inc(1);
        match status {
            Status::Mapped => self.mapped.fetch_add(1, Ordering::SeqCst),
            Status::Errored(ErrorCause::LeftDomain) => self.escaped.fetch_add(1, Ordering::SeqCst),
            Status::Errored(ErrorCause::Cancelled) => {
                self.cancelled.fetch_add(1, Ordering::SeqCst)
            }
            Status::Errored(..) => self.failed.fetch_add(1, Ordering::SeqCst),
            _ => 0, // ignored
        };
        self.pbar.set_message(format!(
            concat!(
                "Mapped = {}\n",
                "Escaped = {}\n",
                "Cancelled = {}\n",
                "Failed = {}",
            ),
            self.mapped.load(Ordering::SeqCst),
            self.escaped.load(Ordering::SeqCst),
            self.cancelled.load(Ordering::SeqCst),
            self.failed.load(Ordering::SeqCst),
        ));
    }

    pub(crate) fn finish(&self) {
        self.pbar.finish();
    }
}
