//! Sweep construction and execution.
//!
//! An [`Experiment`] couples a source set, a scatterer set and an
//! optional detector set. Factorial sweeps visit the Cartesian product
//! of every participating axis and return a dense tensor whose axis
//! order is the concatenation of the sets' own axis orders; sequential
//! sweeps advance all moving axes in lockstep and return a vector.
//!
//! Cells are independent, so both modes dispatch across the rayon
//! thread pool and fail fast on the first construction error.

use log::{debug, info};
use ndarray::{Array1, ArrayD, IxDyn};
use rayon::prelude::*;

use crate::address;
use crate::error::ExperimentError;
use crate::measure::Measure;
use crate::parameters::{DetectorSet, ScattererSet, SourceSet};

/// A configured sweep over source, scatterer and detector axes.
#[derive(Debug, Clone)]
pub struct Experiment {
    pub source: SourceSet,
    pub scatterer: ScattererSet,
    pub detector: Option<DetectorSet>,
}

impl Experiment {
    /// Axis names of the factorial tensor for `measure`, in storage
    /// order. Detector axes appear only when the measure involves the
    /// detector.
    pub fn axis_names(&self, measure: Measure) -> Vec<&'static str> {
        let mut names = self.source.axis_names();
        names.extend(self.scatterer.axis_names());
        if let Some(detector) = self.participating_detector(measure) {
            names.extend(detector.axis_names());
        }
        names
    }

    fn participating_detector(&self, measure: Measure) -> Option<&DetectorSet> {
        if measure.needs_detector() {
            self.detector.as_ref()
        } else {
            None
        }
    }

    /// Check the sweep without evaluating any cell: the measure must be
    /// defined for the scatterer family, every participating axis must
    /// hold at least one value, and coupling requires a detector set.
    pub fn validate(&self, measure: Measure) -> Result<(), ExperimentError> {
        if !measure.supported_by(self.scatterer.family()) {
            return Err(ExperimentError::UnsupportedMeasure {
                measure,
                family: self.scatterer.family(),
            });
        }
        if measure.needs_detector() && self.detector.is_none() {
            return Err(ExperimentError::MissingDetector { measure });
        }
        self.source.validate()?;
        self.scatterer.validate()?;
        if let Some(detector) = self.participating_detector(measure) {
            detector.validate()?;
        }
        Ok(())
    }

    /// Evaluate `measure` over the Cartesian product of every
    /// participating axis.
    pub fn factorial(&self, measure: Measure) -> Result<ArrayD<f64>, ExperimentError> {
        self.validate(measure)?;
        let detector_set = self.participating_detector(measure);

        let source_shape = self.source.shape();
        let scatterer_shape = self.scatterer.shape();
        let detector_shape = detector_set.map(|set| set.shape()).unwrap_or_default();
        let shape: Vec<usize> = source_shape
            .iter()
            .chain(&scatterer_shape)
            .chain(&detector_shape)
            .copied()
            .collect();

        let scatterer_total = self.scatterer.total_combinations();
        let detector_total = detector_set.map_or(1, DetectorSet::total_combinations);
        let total: usize = shape.iter().product();

        debug!(
            "set shapes: source {:?}, scatterer {:?}, detector {:?}",
            source_shape, scatterer_shape, detector_shape
        );
        info!("factorial sweep of {} over {} cells", measure, total);

        let data = (0..total)
            .into_par_iter()
            .map(|flat| -> Result<f64, ExperimentError> {
                let source_step = flat / (scatterer_total * detector_total);
                let scatterer_step = flat / detector_total % scatterer_total;
                let detector_step = flat % detector_total;

                let source = self
                    .source
                    .element_at(&address::unflatten(&source_shape, source_step))?;
                let scatterer = self.scatterer.element_at(
                    &address::unflatten(&scatterer_shape, scatterer_step),
                    &source,
                )?;
                let detector = match detector_set {
                    Some(set) => {
                        Some(set.element_at(&address::unflatten(&detector_shape, detector_step))?)
                    }
                    None => None,
                };
                Ok(measure.evaluate(&scatterer, detector.as_ref()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        ArrayD::from_shape_vec(IxDyn(&shape), data)
            .map_err(|err| ExperimentError::Shape(err.to_string()))
    }

    /// Evaluate `measure` stepwise, advancing every moving axis
    /// together.
    ///
    /// The step count is set by the source wavelength axis; every other
    /// axis must either match it or hold a single broadcast value.
    pub fn sequential(&self, measure: Measure) -> Result<Array1<f64>, ExperimentError> {
        self.validate(measure)?;
        let detector_set = self.participating_detector(measure);

        let length = self.source.wavelength.len();
        self.source.validate_sequential(length)?;
        self.scatterer.validate_sequential(length)?;
        if let Some(set) = detector_set {
            set.validate_sequential(length)?;
        }

        info!("sequential sweep of {} over {} steps", measure, length);

        let data = (0..length)
            .into_par_iter()
            .map(|step| -> Result<f64, ExperimentError> {
                let source = self.source.sequential_element_at(step)?;
                let scatterer = self.scatterer.sequential_element_at(step, &source)?;
                let detector = match detector_set {
                    Some(set) => Some(set.sequential_element_at(step)?),
                    None => None,
                };
                Ok(measure.evaluate(&scatterer, detector.as_ref()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Array1::from_vec(data))
    }
}
