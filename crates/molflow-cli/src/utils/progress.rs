use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use molflow::engine::progress::{Phase, Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{info, warn};

const SPINNER_TICK: Duration = Duration::from_millis(80);

/// What the counted steps of a phase are, for the bar's unit label.
fn step_unit(phase: Option<Phase>) -> &'static str {
    match phase {
        Some(Phase::Embedding) => "iterations",
        Some(Phase::BatchLayout) => "molecules",
        _ => "steps",
    }
}

#[derive(Debug)]
struct LayoutProgressState {
    bar: ProgressBar,
    phase: Option<Phase>,
    completed: Vec<Phase>,
}

impl LayoutProgressState {
    fn apply(&mut self, event: Progress) {
        match event {
            Progress::PhaseStart(phase) => {
                self.phase = Some(phase);
                self.bar.reset();
                self.bar.set_length(0);
                self.bar.set_style(spinner_style());
                self.bar.set_message(phase.label());
                self.bar.enable_steady_tick(SPINNER_TICK);
            }
            Progress::StepsStart { total } => {
                self.bar.disable_steady_tick();
                self.bar.set_style(steps_style(step_unit(self.phase)));
                self.bar.set_length(total);
                self.bar.set_position(0);
            }
            Progress::Step => self.bar.inc(1),
            Progress::StepsFinish => {
                if let Some(total) = self.bar.length() {
                    self.bar.set_position(total);
                }
            }
            Progress::PhaseFinish(phase) => {
                self.bar.disable_steady_tick();
                self.bar.finish_and_clear();
                self.completed.push(phase);
                self.phase = None;
            }
            Progress::Notice(text) => {
                info!("{}", text);
                self.bar.suspend(|| eprintln!("  note: {}", text));
            }
        }
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn steps_style(unit: &str) -> ProgressStyle {
    let template = format!(
        "{{msg:<16}} [{{bar:36.cyan/blue}}] {{pos}}/{{len}} {} ({{elapsed}})",
        unit
    );
    ProgressStyle::with_template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}

/// Shows the layout pipeline on stderr: a spinner per phase and a counted bar for
/// relaxation iterations and batch molecules.
#[derive(Clone)]
pub struct CliProgressHandler {
    state: Arc<Mutex<LayoutProgressState>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), target);
        Self {
            state: Arc::new(Mutex::new(LayoutProgressState {
                bar,
                phase: None,
                completed: Vec::new(),
            })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = Arc::clone(&self.state);
        Box::new(move |event: Progress| match state.lock() {
            Ok(mut state) => state.apply(event),
            Err(_) => warn!("Progress display lock was poisoned; dropping {:?}.", event),
        })
    }

    /// Phases that have finished so far, in order.
    pub fn completed_phases(&self) -> Vec<Phase> {
        self.state
            .lock()
            .map(|state| state.completed.clone())
            .unwrap_or_default()
    }

    /// Removes any bar still drawn.
    pub fn clear(&self) {
        if let Ok(state) = self.state.lock() {
            state.bar.finish_and_clear();
        }
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
