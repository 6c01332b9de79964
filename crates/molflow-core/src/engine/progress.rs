use std::fmt;

/// Stages of the layout pipeline that report progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Parsing,
    /// Force-directed relaxation; its steps are iterations.
    Embedding,
    Normalization,
    /// Independent layouts of a batch; its steps are molecules.
    BatchLayout,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Parsing => "Parsing",
            Phase::Embedding => "Relaxing layout",
            Phase::Normalization => "Normalizing",
            Phase::BatchLayout => "Batch layout",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    PhaseStart(Phase),
    PhaseFinish(Phase),

    /// Start of the counted work of the running phase.
    StepsStart { total: u64 },
    Step,
    StepsFinish,

    /// A note for the user, such as the number of skipped notation tokens.
    Notice(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards progress events to an optional callback. A reporter without a callback
/// discards every event, which is what library callers get by default.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    /// Runs `work` between the start and finish events of `phase`.
    pub fn phase<T>(&self, phase: Phase, work: impl FnOnce() -> T) -> T {
        self.report(Progress::PhaseStart(phase));
        let result = work();
        self.report(Progress::PhaseFinish(phase));
        result
    }
}
