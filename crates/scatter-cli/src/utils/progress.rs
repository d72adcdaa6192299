use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use xscatter::engine::progress::{Progress, ProgressCallback};

const SPINNER_TICK_MS: u64 = 80;

struct PhaseBar {
    bar: ProgressBar,
    phase: Option<(&'static str, Instant)>,
}

impl PhaseBar {
    fn start_phase(&mut self, name: &'static str) {
        self.bar.reset();
        self.bar.set_length(0);
        self.bar.set_style(spinner_style());
        self.bar.set_prefix(name);
        self.bar.set_message("");
        self.bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
        self.phase = Some((name, Instant::now()));
    }

    fn finish_phase(&mut self) {
        self.bar.disable_steady_tick();
        match self.phase.take() {
            Some((name, started)) => {
                let elapsed = started.elapsed();
                debug!(phase = name, elapsed_ms = elapsed.as_millis() as u64, "Phase finished.");
                self.bar
                    .finish_with_message(format!("done in {:.2}s", elapsed.as_secs_f64()));
            }
            None => self.bar.finish(),
        }
    }

    fn start_task(&mut self, total_steps: u64) {
        self.bar.disable_steady_tick();
        self.bar.reset();
        self.bar.set_length(total_steps);
        self.bar.set_position(0);
        self.bar.set_style(bar_style());
    }

    fn finish_task(&mut self) {
        if let Some(length) = self.bar.length() {
            self.bar.set_position(length);
        }
        self.bar.finish();
    }
}

/// Renders engine progress on stderr.
///
/// Each phase (preparation, then one pass per backend) shows as a spinner prefixed with the
/// phase name. Inside a backend pass the bar counts molecules for the reference backend and
/// molecule blocks for the accelerated one. A finished phase leaves its wall time behind.
#[derive(Clone)]
pub struct CliProgressHandler {
    state: Arc<Mutex<PhaseBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    /// A handler that never draws; used with `--quiet`.
    pub fn hidden() -> Self {
        Self::with_draw_target(ProgressDrawTarget::hidden())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), target).with_style(spinner_style());
        bar.finish_and_clear();

        Self {
            state: Arc::new(Mutex::new(PhaseBar { bar, phase: None })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = Arc::clone(&self.state);

        Box::new(move |progress: Progress| {
            let Ok(mut state) = state.lock() else {
                warn!("Progress state mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => state.start_phase(name),
                Progress::PhaseFinish => state.finish_phase(),
                Progress::TaskStart { total_steps } => state.start_task(total_steps),
                Progress::TaskIncrement => state.bar.inc(1),
                Progress::TaskFinish => state.finish_task(),
            }
        })
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {prefix:<12} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{prefix:<12} [{bar:40.cyan/blue}] {pos}/{len} {per_sec} ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn handler_starts_finished_and_outside_any_phase() {
        let handler = CliProgressHandler::hidden();
        let state = handler.state.lock().unwrap();
        assert_eq!(state.bar.length(), Some(0));
        assert!(state.bar.is_finished());
        assert!(state.phase.is_none());
    }

    #[test]
    fn backend_pass_is_labelled_with_phase_and_reports_wall_time() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart {
            name: "accelerated",
        });
        {
            let state = handler.state.lock().unwrap();
            assert_eq!(state.bar.prefix(), "accelerated");
            assert!(!state.bar.is_finished());
        }

        callback(Progress::TaskStart { total_steps: 4 });
        callback(Progress::TaskIncrement);
        callback(Progress::TaskIncrement);
        {
            let state = handler.state.lock().unwrap();
            assert_eq!(state.bar.length(), Some(4));
            assert_eq!(state.bar.position(), 2);
            assert_eq!(state.bar.prefix(), "accelerated");
        }

        callback(Progress::TaskFinish);
        {
            let state = handler.state.lock().unwrap();
            assert!(state.bar.is_finished());
            assert_eq!(state.bar.position(), 4);
        }

        callback(Progress::PhaseFinish);
        let state = handler.state.lock().unwrap();
        assert!(state.bar.message().starts_with("done in "));
        assert!(state.bar.message().ends_with('s'));
        assert!(state.phase.is_none());
    }

    #[test]
    fn new_phase_resets_previous_task_count() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart { name: "reference" });
        callback(Progress::TaskStart { total_steps: 3 });
        callback(Progress::TaskIncrement);
        callback(Progress::TaskFinish);
        callback(Progress::PhaseFinish);
        callback(Progress::PhaseStart {
            name: "accelerated",
        });

        let state = handler.state.lock().unwrap();
        assert_eq!(state.bar.position(), 0);
        assert_eq!(state.bar.length(), Some(0));
        assert_eq!(state.bar.prefix(), "accelerated");
    }

    #[test]
    fn callback_accepts_block_increments_from_worker_threads() {
        let handler = CliProgressHandler::hidden();
        let callback = Arc::new(handler.get_callback());
        callback(Progress::TaskStart { total_steps: 8 });

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let callback = Arc::clone(&callback);
                thread::spawn(move || {
                    callback(Progress::TaskIncrement);
                    callback(Progress::TaskIncrement);
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(handler.state.lock().unwrap().bar.position(), 8);
    }
}
