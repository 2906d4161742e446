//! EDIST2 Detector: Error-Distance Drift Detection with Model Replacement
//!
//! Drives the window state machine over the instance stream:
//!
//! ```text
//! FillingGlobal ──▶ FillingCurrent ──▶ Evaluating ──┐
//!                        ▲                          │
//!                        └──────────────────────────┘
//! ```
//!
//! - **Control**: current is pooled into global
//! - **Warning**: current is pooled into the shadow window and the
//!   background classifier learns the triggering instance
//! - **Drift**: shadow (or current) replaces global and the background
//!   classifier replaces the active one

use std::mem;

use tracing::{debug, info};

use super::config::EdistConfig;
use super::level::{level_test, DriftLevel, LevelTest};
use super::window::ErrorWindow;
use crate::error::Result;
use crate::learners::Classifier;

/// What a single training step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The instance was absorbed by the global or current window
    Filling,
    /// Both windows were complete and were compared
    Evaluated(DriftLevel),
}

/// Record of a confirmed drift and model swap
#[derive(Debug, Clone, PartialEq)]
pub struct DriftEvent {
    /// Stream index of the instance that triggered the swap
    pub index: u64,
    /// Global mean error distance before replacement
    pub global_mu: f64,
    /// Current mean error distance
    pub current_mu: f64,
    /// Mean difference μ_d
    pub mu_d: f64,
    /// Standard error δ_d
    pub delta_d: f64,
}

/// Verdict counts since the last reset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetectorSummary {
    /// Instances seen
    pub instances: u64,
    /// Window comparisons performed
    pub evaluations: usize,
    /// Control verdicts
    pub controls: usize,
    /// Warning verdicts
    pub warnings: usize,
    /// Drift verdicts (model swaps)
    pub drifts: usize,
}

/// EDIST2 drift-aware wrapper around an incremental classifier
#[derive(Debug, Clone)]
pub struct Edist2<C: Classifier> {
    config: EdistConfig,
    /// Untrained learner both models are instantiated from
    prototype: C,
    /// Serves predictions
    classifier: C,
    /// Learns during Warning, promoted on Drift
    background: C,
    global: Option<ErrorWindow<C::Instance>>,
    current: Option<ErrorWindow<C::Instance>>,
    shadow: Option<ErrorWindow<C::Instance>>,
    /// Instances seen, 1-based once the first arrives
    index: u64,
    last_level: Option<DriftLevel>,
    events: Vec<DriftEvent>,
    summary: DetectorSummary,
}

impl<C: Classifier> Edist2<C> {
    /// Create a detector around `base_learner`
    ///
    /// The configuration is validated here and fixed afterwards. The base
    /// learner is copied and reset for both the active and the background
    /// model.
    pub fn new(config: EdistConfig, base_learner: C) -> Result<Self> {
        config.validate()?;

        let mut prototype = base_learner;
        prototype.reset_learning();

        Ok(Self {
            classifier: prototype.clone(),
            background: prototype.clone(),
            prototype,
            config,
            global: None,
            current: None,
            shadow: None,
            index: 0,
            last_level: None,
            events: Vec::new(),
            summary: DetectorSummary::default(),
        })
    }

    /// Return to the initial state with freshly reset models
    pub fn reset_learning(&mut self) {
        self.classifier = self.fresh_learner();
        self.background = self.fresh_learner();
        self.global = None;
        self.current = None;
        self.shadow = None;
        self.index = 0;
        self.last_level = None;
        self.events.clear();
        self.summary = DetectorSummary::default();
    }

    /// Process one labeled instance
    ///
    /// The active classifier is tested on the instance to feed the
    /// windows, the windows are compared when both are complete, and the
    /// active classifier is then trained on the instance in every case.
    ///
    /// A classifier error is returned as soon as it occurs. Window and
    /// verdict bookkeeping done before the failure is not rolled back.
    pub fn train_on_instance(
        &mut self,
        instance: &C::Instance,
    ) -> std::result::Result<StepOutcome, C::Error> {
        self.index += 1;
        self.summary.instances = self.index;
        let index = self.index;
        let max_n = self.config.max_errors_per_window;

        let global = self
            .global
            .get_or_insert_with(|| ErrorWindow::new(max_n, 0));

        let outcome = if !global.is_completed() {
            Self::fill(global, &self.classifier, instance, index)?;
            StepOutcome::Filling
        } else {
            let current = self
                .current
                .get_or_insert_with(|| ErrorWindow::new(max_n, index - 1));

            if !current.is_completed() {
                Self::fill(current, &self.classifier, instance, index)?;
                StepOutcome::Filling
            } else {
                let test = level_test(global, current);
                // Fresh current window, error recency carried over.
                let seed = current.last_error_index();
                let finished = mem::replace(current, ErrorWindow::new(max_n, seed));
                self.apply(test, finished, instance)?;
                StepOutcome::Evaluated(test.level)
            }
        };

        self.classifier.train(instance)?;
        Ok(outcome)
    }

    /// Record `instance` in a filling window, counting it if misclassified
    fn fill(
        window: &mut ErrorWindow<C::Instance>,
        classifier: &C,
        instance: &C::Instance,
        index: u64,
    ) -> std::result::Result<(), C::Error> {
        window.append(instance.clone());
        if !classifier.correctly_classifies(instance)? {
            window.update(index);
            if window.is_completed() {
                debug!(index, mu = window.mu(), delta = window.delta(), "window completed");
            }
        }
        Ok(())
    }

    /// Act on a verdict for the completed window `finished`
    fn apply(
        &mut self,
        test: LevelTest,
        finished: ErrorWindow<C::Instance>,
        instance: &C::Instance,
    ) -> std::result::Result<(), C::Error> {
        let pooling = self.config.pooling;
        self.last_level = Some(test.level);
        self.summary.evaluations += 1;

        debug!(
            index = self.index,
            level = ?test.level,
            mu_d = test.mu_d,
            delta_d = test.delta_d,
            epsilon = test.epsilon,
            "windows compared"
        );

        match test.level {
            DriftLevel::Control => {
                self.summary.controls += 1;
                // The shadow window survives Control verdicts.
                if let Some(global) = self.global.as_mut() {
                    global.absorb(finished, pooling);
                }
            }
            DriftLevel::Warning => {
                self.summary.warnings += 1;
                if let Some(shadow) = self.shadow.as_mut() {
                    shadow.absorb(finished, pooling);
                } else {
                    info!(index = self.index, mu_d = test.mu_d, "warning: shadow window opened");
                    self.shadow = Some(finished);
                }
                self.background.train(instance)?;
            }
            DriftLevel::Drift => {
                self.summary.drifts += 1;
                let global_mu = self.global.as_ref().map_or(0.0, |g| g.mu());
                self.events.push(DriftEvent {
                    index: self.index,
                    global_mu,
                    current_mu: finished.mu(),
                    mu_d: test.mu_d,
                    delta_d: test.delta_d,
                });

                let from_shadow = self.shadow.is_some();
                self.global = Some(self.shadow.take().unwrap_or(finished));

                let fresh = self.fresh_learner();
                self.classifier = mem::replace(&mut self.background, fresh);

                info!(
                    index = self.index,
                    mu_d = test.mu_d,
                    from_shadow,
                    "drift: background model promoted"
                );
            }
        }
        Ok(())
    }

    fn fresh_learner(&self) -> C {
        let mut learner = self.prototype.clone();
        learner.reset_learning();
        learner
    }

    /// Per-class scores from the active classifier
    pub fn predict(&self, instance: &C::Instance) -> std::result::Result<Vec<f64>, C::Error> {
        self.classifier.predict(instance)
    }

    /// Whether the active classifier gets `instance` right
    pub fn correctly_classifies(
        &self,
        instance: &C::Instance,
    ) -> std::result::Result<bool, C::Error> {
        self.classifier.correctly_classifies(instance)
    }

    /// Configuration in use
    pub fn config(&self) -> &EdistConfig {
        &self.config
    }

    /// Instances seen so far
    pub fn stream_index(&self) -> u64 {
        self.index
    }

    /// Classifier serving predictions
    pub fn active_classifier(&self) -> &C {
        &self.classifier
    }

    /// Classifier being trained during Warning
    pub fn background_classifier(&self) -> &C {
        &self.background
    }

    /// Reference window, absent before the first instance
    pub fn global(&self) -> Option<&ErrorWindow<C::Instance>> {
        self.global.as_ref()
    }

    /// Window being compared against global
    pub fn current(&self) -> Option<&ErrorWindow<C::Instance>> {
        self.current.as_ref()
    }

    /// Speculative window accumulated during Warning
    pub fn shadow(&self) -> Option<&ErrorWindow<C::Instance>> {
        self.shadow.as_ref()
    }

    /// Most recent verdict
    pub fn last_level(&self) -> Option<DriftLevel> {
        self.last_level
    }

    /// Every confirmed drift, oldest first
    pub fn drift_events(&self) -> &[DriftEvent] {
        &self.events
    }

    /// Verdict counts
    pub fn summary(&self) -> DetectorSummary {
        self.summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edist::config::PoolingFormula;
    use crate::error::EdistError;
    use std::collections::BTreeSet;
    use std::fmt;

    /// Instance whose misclassification is decided by the stream script
    #[derive(Debug, Clone, PartialEq)]
    struct Tick {
        index: u64,
        misclassified: bool,
    }

    #[derive(Debug)]
    struct ScriptError;

    impl fmt::Display for ScriptError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "scripted failure")
        }
    }

    impl std::error::Error for ScriptError {}

    /// Classifier that counts its training and fails on request
    #[derive(Debug, Clone, Default)]
    struct Scripted {
        trained: Vec<u64>,
        fail_at: Option<u64>,
    }

    impl Classifier for Scripted {
        type Instance = Tick;
        type Error = ScriptError;

        fn train(&mut self, instance: &Tick) -> std::result::Result<(), ScriptError> {
            if self.fail_at == Some(instance.index) {
                return Err(ScriptError);
            }
            self.trained.push(instance.index);
            Ok(())
        }

        fn predict(&self, instance: &Tick) -> std::result::Result<Vec<f64>, ScriptError> {
            Ok(if instance.misclassified { vec![1.0, 0.0] } else { vec![0.0, 1.0] })
        }

        fn correctly_classifies(&self, instance: &Tick) -> std::result::Result<bool, ScriptError> {
            Ok(!instance.misclassified)
        }

        fn reset_learning(&mut self) {
            self.trained.clear();
        }
    }

    /// Error positions obtained by accumulating gaps
    fn schedule(gaps: &[u64]) -> BTreeSet<u64> {
        gaps.iter()
            .scan(0u64, |pos, g| {
                *pos += g;
                Some(*pos)
            })
            .collect()
    }

    fn feed(detector: &mut Edist2<Scripted>, errors: &BTreeSet<u64>, upto: u64) -> Vec<StepOutcome> {
        (detector.stream_index() + 1..=upto)
            .map(|i| {
                let tick = Tick {
                    index: i,
                    misclassified: errors.contains(&i),
                };
                detector.train_on_instance(&tick).unwrap()
            })
            .collect()
    }

    /// Steady gaps, a moderately tighter window, then much tighter errors
    fn degrading_stream() -> BTreeSet<u64> {
        let mut gaps = Vec::new();
        for _ in 0..3 {
            gaps.extend_from_slice(&[6, 14, 10]);
        }
        gaps.extend_from_slice(&[4, 4, 11]);
        for _ in 0..3 {
            gaps.extend_from_slice(&[2, 3, 2]);
        }
        schedule(&gaps)
    }

    fn detector(max_errors: usize) -> Edist2<Scripted> {
        Edist2::new(EdistConfig::with_max_errors(max_errors), Scripted::default()).unwrap()
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let err = Edist2::new(EdistConfig::with_max_errors(0), Scripted::default()).unwrap_err();
        assert!(matches!(err, EdistError::InvalidConfig(_)));
    }

    #[test]
    fn test_global_fills_first() {
        let mut det = detector(3);
        assert!(det.global().is_none());

        let errors = schedule(&[2, 3, 4]);
        let outcomes = feed(&mut det, &errors, 9);
        assert!(outcomes.iter().all(|o| *o == StepOutcome::Filling));

        let global = det.global().unwrap();
        assert!(global.is_completed());
        assert!((global.mu() - 3.0).abs() < 1e-12);
        assert!((global.delta() - 0.629_152_9).abs() < 1e-6);
        assert_eq!(global.buffer().len(), 9);
        assert!(det.current().is_none());

        // Next instance opens the current window seeded at the previous index.
        feed(&mut det, &errors, 10);
        let current = det.current().unwrap();
        assert_eq!(current.buffer().len(), 1);
        assert_eq!(current.last_error_index(), 9);
        assert_eq!(current.n(), 0);
    }

    #[test]
    fn test_active_trained_on_every_instance() {
        let mut det = detector(2);
        let errors = schedule(&[5, 5, 5, 5, 5, 5, 5, 5]);
        feed(&mut det, &errors, 40);
        assert_eq!(det.active_classifier().trained.len(), 40);
        assert_eq!(det.summary().instances, 40);
    }

    #[test]
    fn test_control_pools_into_global() {
        let mut det = detector(3);
        let errors = degrading_stream();
        let outcomes = feed(&mut det, &errors, 109);

        let evaluated: Vec<_> = outcomes
            .iter()
            .enumerate()
            .filter_map(|(i, o)| match o {
                StepOutcome::Evaluated(level) => Some((i as u64 + 1, *level)),
                StepOutcome::Filling => None,
            })
            .collect();
        assert_eq!(
            evaluated,
            vec![(61, DriftLevel::Control), (91, DriftLevel::Control)]
        );

        let global = det.global().unwrap();
        assert_eq!(global.n(), 9);
        assert!((global.mu() - 10.0).abs() < 1e-9);
        assert!((global.delta() - 2.0).abs() < 1e-9);
        assert_eq!(global.last_error_index(), 90);
        // Instances 61 and 91 triggered evaluations and were not buffered.
        assert_eq!(global.buffer().len(), 89);
        assert!(det.shadow().is_none());
    }

    #[test]
    fn test_warning_then_drift_swaps_models() {
        let mut det = detector(3);
        let errors = degrading_stream();

        feed(&mut det, &errors, 110);
        assert_eq!(det.last_level(), Some(DriftLevel::Warning));
        let shadow = det.shadow().unwrap();
        assert_eq!(shadow.n(), 3);
        assert!((shadow.mu() - 19.0 / 3.0).abs() < 1e-9);
        assert_eq!(shadow.buffer().len(), 18);
        assert_eq!(det.background_classifier().trained, vec![110]);

        // Current restarts empty, seeded with the finished window's last error.
        let current = det.current().unwrap();
        assert_eq!(current.n(), 0);
        assert_eq!(current.last_error_index(), 109);
        assert!(current.buffer().is_empty());

        feed(&mut det, &errors, 117);
        assert_eq!(det.last_level(), Some(DriftLevel::Drift));

        // The pre-trained background model is now serving.
        assert_eq!(det.active_classifier().trained, vec![110, 117]);
        assert!(det.background_classifier().trained.is_empty());

        // Shadow promoted to global.
        assert!(det.shadow().is_none());
        let global = det.global().unwrap();
        assert_eq!(global.n(), 3);
        assert!((global.mu() - 19.0 / 3.0).abs() < 1e-9);
        assert_eq!(global.last_error_index(), 109);
        assert_eq!(global.buffer().first().map(|t| t.index), Some(92));

        let events = det.drift_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].index, 117);
        assert!((events[0].global_mu - 10.0).abs() < 1e-9);
        assert!((events[0].current_mu - 7.0 / 3.0).abs() < 1e-9);

        let summary = det.summary();
        assert_eq!(summary.evaluations, 4);
        assert_eq!(summary.controls, 2);
        assert_eq!(summary.warnings, 1);
        assert_eq!(summary.drifts, 1);
    }

    #[test]
    fn test_repeated_warning_extends_shadow() {
        let mut det = detector(3);
        let mut gaps = vec![6, 14, 10];
        gaps.extend_from_slice(&[4, 4, 11]);
        gaps.extend_from_slice(&[4, 4, 11]);
        let errors = schedule(&gaps);

        let outcomes = feed(&mut det, &errors, 69);
        let evaluated: Vec<_> = outcomes
            .iter()
            .enumerate()
            .filter_map(|(i, o)| match o {
                StepOutcome::Evaluated(level) => Some((i as u64 + 1, *level)),
                StepOutcome::Filling => None,
            })
            .collect();
        assert_eq!(
            evaluated,
            vec![(50, DriftLevel::Warning), (69, DriftLevel::Warning)]
        );

        let shadow = det.shadow().unwrap();
        assert_eq!(shadow.n(), 6);
        assert!((shadow.mu() - 19.0 / 3.0).abs() < 1e-9);
        assert_eq!(shadow.last_error_index(), 68);

        // First window's instances 31..=49, then the second's 51..=68.
        let expected: Vec<u64> = (31..=49).chain(51..=68).collect();
        let buffered: Vec<u64> = shadow.buffer().iter().map(|t| t.index).collect();
        assert_eq!(buffered, expected);

        assert_eq!(det.background_classifier().trained, vec![50, 69]);
        assert_eq!(det.global().unwrap().n(), 3);
        assert_eq!(det.summary().warnings, 2);
        assert_eq!(det.summary().drifts, 0);
    }

    #[test]
    fn test_single_error_windows() {
        let mut det = detector(1);
        let errors = schedule(&[5, 5, 1, 1, 1]);

        let outcomes = feed(&mut det, &errors, 13);
        assert_eq!(outcomes[10], StepOutcome::Evaluated(DriftLevel::Control));
        assert_eq!(outcomes[12], StepOutcome::Evaluated(DriftLevel::Drift));
        assert_eq!(
            outcomes
                .iter()
                .filter(|o| matches!(o, StepOutcome::Evaluated(_)))
                .count(),
            2
        );

        // Zero spread in every window: the smaller gap alone triggers drift.
        let event = &det.drift_events()[0];
        assert_eq!(event.index, 13);
        assert_eq!(event.delta_d, 0.0);
        assert!((event.mu_d - 3.0).abs() < 1e-12);

        let global = det.global().unwrap();
        assert_eq!(global.n(), 1);
        assert!((global.mu() - 2.0).abs() < 1e-12);
        assert_eq!(global.last_error_index(), 12);
        assert_eq!(det.active_classifier().trained, vec![13]);
    }

    #[test]
    fn test_drift_without_shadow_promotes_current() {
        let mut det = detector(3);
        // Evenly spaced errors every 10, then every 2.
        let mut gaps = vec![10; 6];
        gaps.extend_from_slice(&[2; 6]);
        let errors = schedule(&gaps);

        let outcomes = feed(&mut det, &errors, 67);
        assert_eq!(outcomes.last(), Some(&StepOutcome::Evaluated(DriftLevel::Drift)));

        let global = det.global().unwrap();
        assert!((global.mu() - 2.0).abs() < 1e-12);
        assert_eq!(global.n(), 3);
        assert_eq!(global.last_error_index(), 66);
        assert!(det.shadow().is_none());

        // Background never trained: the active model starts over.
        assert_eq!(det.active_classifier().trained, vec![67]);
    }

    #[test]
    fn test_improvement_stays_in_control() {
        let mut det = detector(3);
        let mut gaps = vec![3; 3];
        gaps.extend_from_slice(&[20; 9]);
        let errors = schedule(&gaps);

        feed(&mut det, &errors, 200);
        let summary = det.summary();
        assert!(summary.evaluations > 0);
        assert_eq!(summary.warnings, 0);
        assert_eq!(summary.drifts, 0);
    }

    #[test]
    fn test_shadow_survives_control() {
        let mut det = detector(3);
        let errors = degrading_stream();
        feed(&mut det, &errors, 110);
        assert!(det.shadow().is_some());

        // Return to the reference error spacing: Control verdicts only.
        let last = *errors.iter().next_back().unwrap();
        let mut tail: BTreeSet<u64> = errors.iter().copied().filter(|&e| e <= 109).collect();
        let mut pos = 109;
        while pos < last + 400 {
            pos += 10;
            tail.insert(pos);
        }
        let outcomes = feed(&mut det, &tail, pos);
        assert!(outcomes
            .iter()
            .all(|o| !matches!(o, StepOutcome::Evaluated(DriftLevel::Drift))));
        assert!(outcomes.contains(&StepOutcome::Evaluated(DriftLevel::Control)));
        assert!(det.shadow().is_some());
    }

    #[test]
    fn test_literal_pooling_changes_reference() {
        let config = EdistConfig::with_max_errors(3).pooling(PoolingFormula::Literal);
        let mut det = Edist2::new(config, Scripted::default()).unwrap();
        let errors = degrading_stream();
        feed(&mut det, &errors, 61);

        assert_eq!(det.last_level(), Some(DriftLevel::Control));
        assert_eq!(det.global().unwrap().mu(), 0.0);
        assert_eq!(det.global().unwrap().n(), 6);
    }

    #[test]
    fn test_collaborator_error_propagates() {
        let learner = Scripted {
            trained: Vec::new(),
            fail_at: Some(4),
        };
        let mut det = Edist2::new(EdistConfig::with_max_errors(3), learner).unwrap();
        for i in 1..4 {
            let tick = Tick { index: i, misclassified: false };
            assert!(det.train_on_instance(&tick).is_ok());
        }
        let tick = Tick { index: 4, misclassified: false };
        assert!(det.train_on_instance(&tick).is_err());
    }

    #[test]
    fn test_background_failure_keeps_prior_bookkeeping() {
        let learner = Scripted {
            trained: Vec::new(),
            fail_at: Some(50),
        };
        let mut det = Edist2::new(EdistConfig::with_max_errors(3), learner).unwrap();
        let mut gaps = vec![6, 14, 10];
        gaps.extend_from_slice(&[4, 4, 11]);
        let errors = schedule(&gaps);
        feed(&mut det, &errors, 49);

        let tick = Tick { index: 50, misclassified: false };
        assert!(det.train_on_instance(&tick).is_err());

        assert_eq!(det.last_level(), Some(DriftLevel::Warning));
        assert_eq!(det.shadow().map(|w| w.n()), Some(3));
        assert_eq!(det.current().map(|w| w.n()), Some(0));
        assert_eq!(det.summary().warnings, 1);
        assert!(det.background_classifier().trained.is_empty());
    }

    #[test]
    fn test_predict_delegates_to_active() {
        let det = detector(3);
        let tick = Tick { index: 1, misclassified: true };
        assert_eq!(det.predict(&tick).unwrap(), vec![1.0, 0.0]);
        assert!(!det.correctly_classifies(&tick).unwrap());
    }

    #[test]
    fn test_detects_label_reversal_with_naive_bayes() {
        use crate::learners::GaussianNaiveBayes;
        use crate::streams::{GaussianDriftStream, InstanceStream};

        let mut stream = GaussianDriftStream::new(2, 2.0, vec![3001], 17);
        let learner = GaussianNaiveBayes::new(2, 2);
        let mut det = Edist2::new(EdistConfig::with_max_errors(10), learner).unwrap();

        for _ in 0..4000 {
            let x = stream.next_instance();
            det.train_on_instance(&x).unwrap();
        }

        assert!(
            det.drift_events()
                .iter()
                .any(|e| (3001..3500).contains(&e.index)),
            "no drift shortly after the reversal: {:?}",
            det.drift_events()
        );
    }

    #[test]
    fn test_reset_learning_restores_initial_state() {
        let mut det = detector(3);
        let errors = degrading_stream();
        feed(&mut det, &errors, 117);

        det.reset_learning();
        assert_eq!(det.stream_index(), 0);
        assert!(det.global().is_none());
        assert!(det.current().is_none());
        assert!(det.shadow().is_none());
        assert!(det.active_classifier().trained.is_empty());
        assert!(det.drift_events().is_empty());
        assert_eq!(det.summary(), DetectorSummary::default());
    }
}
