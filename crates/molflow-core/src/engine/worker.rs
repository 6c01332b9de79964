use crate::core::models::graph::MoleculeGraph;
use crate::core::notation::parse;
use crate::engine::config::EmbeddingConfig;
use crate::engine::embedding::embed_with;
use crate::engine::error::EngineError;
use crate::engine::normalize::normalize;
use crate::engine::progress::ProgressReporter;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use tracing::{debug, trace};

/// Monotonically increasing tag of a layout submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

struct LayoutJob {
    generation: Generation,
    input: String,
}

/// A normalized layout computed off the calling thread.
#[derive(Debug, Clone)]
pub struct LayoutResult {
    pub generation: Generation,
    pub input: String,
    pub graph: Arc<MoleculeGraph>,
}

/// Runs parse, embed and normalize on a dedicated background thread.
///
/// Jobs and results travel over channels; the worker shares no mutable state with its
/// owner. Only the result of the most recent submission is ever delivered: results of
/// older generations are dropped on receipt, and the thread skips queued jobs that a
/// newer submission has already superseded.
pub struct LayoutWorker {
    jobs: Option<Sender<LayoutJob>>,
    results: Receiver<LayoutResult>,
    latest: Generation,
    outstanding: bool,
    handle: Option<JoinHandle<()>>,
}

impl LayoutWorker {
    /// Starts the background thread.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] for an invalid configuration, or
    /// [`EngineError::WorkerSpawn`] if the thread cannot be started.
    pub fn spawn(config: EmbeddingConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let (job_tx, job_rx) = mpsc::channel::<LayoutJob>();
        let (result_tx, result_rx) = mpsc::channel::<LayoutResult>();

        let handle = thread::Builder::new()
            .name("molflow-layout".to_string())
            .spawn(move || run_worker(job_rx, result_tx, config))
            .map_err(EngineError::WorkerSpawn)?;

        Ok(Self {
            jobs: Some(job_tx),
            results: result_rx,
            latest: Generation::default(),
            outstanding: false,
            handle: Some(handle),
        })
    }

    /// Queues a layout of `input` and returns its generation, superseding every
    /// earlier submission.
    pub fn submit(&mut self, input: &str) -> Result<Generation, EngineError> {
        let generation = self.latest.next();
        let sender = self.jobs.as_ref().ok_or(EngineError::WorkerDisconnected)?;
        sender
            .send(LayoutJob {
                generation,
                input: input.to_string(),
            })
            .map_err(|_| EngineError::WorkerDisconnected)?;
        self.latest = generation;
        self.outstanding = true;
        trace!(generation = generation.value(), "Layout job submitted.");
        Ok(generation)
    }

    /// Generation of the most recent submission.
    pub fn latest(&self) -> Generation {
        self.latest
    }

    /// Whether the latest submission has not been delivered yet.
    pub fn is_busy(&self) -> bool {
        self.outstanding
    }

    /// Returns the latest result if it is ready, without blocking.
    pub fn poll(&mut self) -> Result<Option<LayoutResult>, EngineError> {
        loop {
            match self.results.try_recv() {
                Ok(result) => {
                    if let Some(result) = self.accept(result) {
                        return Ok(Some(result));
                    }
                }
                Err(TryRecvError::Empty) => return Ok(None),
                Err(TryRecvError::Disconnected) => return Err(EngineError::WorkerDisconnected),
            }
        }
    }

    /// Blocks until the latest submission completes. Returns `None` when nothing is
    /// outstanding.
    pub fn wait(&mut self) -> Result<Option<LayoutResult>, EngineError> {
        while self.outstanding {
            let result = self
                .results
                .recv()
                .map_err(|_| EngineError::WorkerDisconnected)?;
            if let Some(result) = self.accept(result) {
                return Ok(Some(result));
            }
        }
        Ok(None)
    }

    fn accept(&mut self, result: LayoutResult) -> Option<LayoutResult> {
        if result.generation == self.latest {
            self.outstanding = false;
            Some(result)
        } else {
            debug!(
                stale = result.generation.value(),
                latest = self.latest.value(),
                "Discarding stale layout result."
            );
            None
        }
    }
}

impl Drop for LayoutWorker {
    fn drop(&mut self) {
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run_worker(jobs: Receiver<LayoutJob>, results: Sender<LayoutResult>, config: EmbeddingConfig) {
    let reporter = ProgressReporter::new();
    while let Ok(mut job) = jobs.recv() {
        while let Ok(newer) = jobs.try_recv() {
            trace!(skipped = job.generation.value(), "Superseded layout job skipped.");
            job = newer;
        }

        let mut graph = parse(&job.input);
        embed_with(&mut graph, &config, &reporter);
        normalize(&mut graph);

        let result = LayoutResult {
            generation: job.generation,
            input: job.input,
            graph: Arc::new(graph),
        };
        if results.send(result).is_err() {
            break;
        }
    }
    trace!("Layout worker stopped.");
}
