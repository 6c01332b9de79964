use crate::core::models::graph::MoleculeGraph;
use crate::core::notation::parse;
use crate::engine::cache::LayoutCache;
use crate::engine::config::{LayoutConfig, ProjectionConfig};
use crate::engine::embedding::embed_with;
use crate::engine::error::EngineError;
use crate::engine::normalize::normalize;
use crate::engine::progress::ProgressReporter;
use crate::engine::projection::{Camera, Projector, RenderPrimitive};
use crate::engine::worker::{Generation, LayoutWorker};
use crate::workflows::render::{RenderPort, draw_primitives};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Pitch is limited to straight up and straight down.
pub const MAX_PITCH: f64 = 90.0;

/// Outcome of [`ViewerSession::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// The layout is current and frames show it.
    Ready,
    /// The layout is being computed in the background; frames keep showing the previous
    /// molecule until [`ViewerSession::poll`] reports it.
    Pending(Generation),
}

/// Interactive viewer state: the current molecule, the camera and a layout cache.
///
/// Layouts run once per distinct input; rotation only re-projects the cached graph.
/// Superseded layouts stay cached only until `cache_capacity` newer inputs push them out.
/// Molecules above the configured offload threshold are laid out on a background
/// worker so the caller stays responsive.
pub struct ViewerSession {
    config: LayoutConfig,
    projector: Projector,
    view_scale: f64,
    camera: Camera,
    cache: LayoutCache,
    worker: Option<LayoutWorker>,
    current: Option<(String, Arc<MoleculeGraph>)>,
    pending: Option<(Generation, String)>,
}

impl ViewerSession {
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if either configuration is invalid.
    pub fn new(
        config: LayoutConfig,
        projection: ProjectionConfig,
        view_scale: f64,
    ) -> Result<Self, EngineError> {
        config.embedding.validate()?;
        projection.validate()?;
        let cache = LayoutCache::with_capacity(config.cache_capacity);
        Ok(Self {
            config,
            projector: Projector::new(projection),
            view_scale,
            camera: Camera::default(),
            cache,
            worker: None,
            current: None,
            pending: None,
        })
    }

    pub fn camera(&self) -> Camera {
        self.camera
    }

    /// The notation of the molecule frames currently show.
    pub fn current_input(&self) -> Option<&str> {
        self.current.as_ref().map(|(input, _)| input.as_str())
    }

    pub fn current_graph(&self) -> Option<&Arc<MoleculeGraph>> {
        self.current.as_ref().map(|(_, graph)| graph)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cached_layouts(&self) -> usize {
        self.cache.len()
    }

    /// Makes `input` the displayed molecule, laying it out if it is not cached.
    #[instrument(skip_all, name = "session_load", fields(input = %input))]
    pub fn load(&mut self, input: &str) -> Result<LoadStatus, EngineError> {
        if let Some(graph) = self.cache.get(input) {
            debug!("Layout cache hit.");
            self.pending = None;
            self.current = Some((input.to_string(), graph));
            return Ok(LoadStatus::Ready);
        }

        let mut graph = parse(input);
        if graph.atom_count() > self.config.offload_threshold {
            if self.worker.is_none() {
                self.worker = Some(LayoutWorker::spawn(self.config.embedding.clone())?);
            }
            let generation = self
                .worker
                .as_mut()
                .ok_or(EngineError::WorkerDisconnected)?
                .submit(input)?;
            info!(
                atoms = graph.atom_count(),
                generation = generation.value(),
                "Offloading layout to the background worker."
            );
            self.pending = Some((generation, input.to_string()));
            return Ok(LoadStatus::Pending(generation));
        }

        embed_with(&mut graph, &self.config.embedding, &ProgressReporter::new());
        normalize(&mut graph);
        let graph = self.cache.insert(input, graph);
        self.pending = None;
        self.current = Some((input.to_string(), graph));
        Ok(LoadStatus::Ready)
    }

    /// Collects a finished background layout. Returns `true` when the displayed
    /// molecule changed.
    pub fn poll(&mut self) -> Result<bool, EngineError> {
        let Some(worker) = self.worker.as_mut() else {
            return Ok(false);
        };
        match worker.poll()? {
            Some(result) => Ok(self.adopt(result.generation, &result.input, result.graph)),
            None => Ok(false),
        }
    }

    /// Blocks until the pending background layout, if any, is ready.
    pub fn wait(&mut self) -> Result<bool, EngineError> {
        let Some(worker) = self.worker.as_mut() else {
            return Ok(false);
        };
        match worker.wait()? {
            Some(result) => Ok(self.adopt(result.generation, &result.input, result.graph)),
            None => Ok(false),
        }
    }

    fn adopt(&mut self, generation: Generation, input: &str, graph: Arc<MoleculeGraph>) -> bool {
        self.cache.insert_shared(input, Arc::clone(&graph));
        match &self.pending {
            Some((pending, _)) if *pending == generation => {
                self.pending = None;
                self.current = Some((input.to_string(), graph));
                true
            }
            _ => false,
        }
    }

    /// Sets an absolute camera orientation.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidCamera`] for non-finite angles; the camera is left
    /// unchanged.
    pub fn set_camera(&mut self, pitch: f64, yaw: f64) -> Result<(), EngineError> {
        let requested = Camera::new(pitch, yaw);
        if !requested.is_finite() {
            return Err(EngineError::InvalidCamera { pitch, yaw });
        }
        self.camera = Camera::new(
            pitch.clamp(-MAX_PITCH, MAX_PITCH),
            yaw.rem_euclid(360.0),
        );
        Ok(())
    }

    /// Rotates the camera by the given deltas (degrees).
    pub fn rotate(&mut self, delta_pitch: f64, delta_yaw: f64) -> Result<(), EngineError> {
        if !delta_pitch.is_finite() || !delta_yaw.is_finite() {
            return Err(EngineError::InvalidCamera {
                pitch: delta_pitch,
                yaw: delta_yaw,
            });
        }
        self.set_camera(self.camera.pitch + delta_pitch, self.camera.yaw + delta_yaw)
    }

    /// Projects the current molecule. Empty when nothing is loaded yet.
    pub fn frame(&self) -> Vec<RenderPrimitive> {
        match &self.current {
            Some((_, graph)) => self.projector.project(graph, &self.camera, self.view_scale),
            None => Vec::new(),
        }
    }

    /// Projects the current molecule into `port`. Returns how many primitives were drawn.
    pub fn render<P: RenderPort + ?Sized>(&self, port: &mut P) -> usize {
        let primitives = self.frame();
        draw_primitives(&primitives, &self.camera, port);
        primitives.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::layout::layout;
    use crate::workflows::render::PrimitiveRecorder;

    fn session(offload_threshold: usize) -> ViewerSession {
        let config = LayoutConfig {
            offload_threshold,
            ..LayoutConfig::default()
        };
        ViewerSession::new(config, ProjectionConfig::default(), 100.0).unwrap()
    }

    fn session_keeping(cache_capacity: usize) -> ViewerSession {
        let config = LayoutConfig {
            cache_capacity,
            ..LayoutConfig::default()
        };
        ViewerSession::new(config, ProjectionConfig::default(), 100.0).unwrap()
    }

    #[test]
    fn small_molecules_are_ready_immediately() {
        let mut session = session(60);
        assert!(session.frame().is_empty());
        assert_eq!(session.load("CCO").unwrap(), LoadStatus::Ready);
        assert_eq!(session.current_input(), Some("CCO"));
        assert_eq!(session.frame().len(), 5);
        assert_eq!(**session.current_graph().unwrap(), layout("CCO"));
    }

    #[test]
    fn reloading_uses_the_cache() {
        let mut session = session(60);
        session.load("CCO").unwrap();
        let first = Arc::clone(session.current_graph().unwrap());
        session.load("C=O").unwrap();
        session.load("CCO").unwrap();
        assert!(Arc::ptr_eq(&first, session.current_graph().unwrap()));
        assert_eq!(session.cached_layouts(), 2);
    }

    #[test]
    fn superseded_layouts_are_released() {
        let mut session = session_keeping(1);
        session.load("CCO").unwrap();
        let ethanol = Arc::downgrade(session.current_graph().unwrap());
        session.load("C=O").unwrap();

        assert_eq!(session.cached_layouts(), 1);
        assert!(ethanol.upgrade().is_none());
    }

    #[test]
    fn cache_never_exceeds_its_capacity() {
        let mut session = session_keeping(2);
        for input in ["C", "CC", "CCC", "CCCC", "CCO"] {
            session.load(input).unwrap();
            assert!(session.cached_layouts() <= 2);
        }
        assert_eq!(session.current_input(), Some("CCO"));
        assert_eq!(session.load("CCCC").unwrap(), LoadStatus::Ready);
    }

    #[test]
    fn rotation_reprojects_without_relayout() {
        let mut session = session(60);
        session.load("CC(=O)O").unwrap();
        let graph = Arc::clone(session.current_graph().unwrap());
        let before = session.frame();
        session.rotate(30.0, 45.0).unwrap();
        let after = session.frame();
        assert_ne!(before, after);
        assert!(Arc::ptr_eq(&graph, session.current_graph().unwrap()));
    }

    #[test]
    fn camera_rejects_non_finite_input() {
        let mut session = session(60);
        session.rotate(10.0, 20.0).unwrap();
        assert!(matches!(
            session.rotate(f64::NAN, 0.0),
            Err(EngineError::InvalidCamera { .. })
        ));
        assert!(session.set_camera(0.0, f64::INFINITY).is_err());
        assert_eq!(session.camera(), Camera::new(10.0, 20.0));
    }

    #[test]
    fn camera_clamps_pitch_and_wraps_yaw() {
        let mut session = session(60);
        session.set_camera(120.0, -30.0).unwrap();
        assert_eq!(session.camera(), Camera::new(90.0, 330.0));
        session.rotate(-200.0, 400.0).unwrap();
        assert_eq!(session.camera(), Camera::new(-90.0, 10.0));
    }

    #[test]
    fn large_molecules_are_offloaded() {
        let mut session = session(2);
        session.load("C").unwrap();
        let status = session.load("CCCC").unwrap();
        assert!(matches!(status, LoadStatus::Pending(_)));
        assert!(session.is_pending());
        // Frames keep showing the previous molecule while the layout runs.
        assert_eq!(session.current_input(), Some("C"));

        assert!(session.wait().unwrap());
        assert!(!session.is_pending());
        assert_eq!(session.current_input(), Some("CCCC"));
        assert_eq!(**session.current_graph().unwrap(), layout("CCCC"));
    }

    #[test]
    fn superseded_background_layouts_are_not_displayed() {
        let mut session = session(2);
        session.load("CCCCCC").unwrap();
        session.load("CCCC").unwrap();
        assert!(session.wait().unwrap());
        assert_eq!(session.current_input(), Some("CCCC"));
    }

    #[test]
    fn render_replays_the_frame_into_a_port() {
        let mut session = session(60);
        session.load("C#N").unwrap();
        let mut recorder = PrimitiveRecorder::new();
        let drawn = session.render(&mut recorder);
        assert_eq!(drawn, 5);
        assert_eq!(recorder.primitives(), session.frame().as_slice());
    }
}
