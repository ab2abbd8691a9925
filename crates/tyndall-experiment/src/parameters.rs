//! Parameter axes for combinatorial and sequential sweeps.
//!
//! Each set bundles the value lists for one participant of a sweep
//! (source, scatterer, detector). A set knows its own axis order, can
//! build the concrete core object for any multi-index, and validates
//! itself before a sweep dispatches.
//!
//! In sequential mode an axis either moves with the step index or, when
//! it holds exactly one value, broadcasts that value to every step.

use num_complex::Complex64;

use tyndall_core::{
    CoreShell, Cylinder, Detector, Gaussian, ModeId, ScatterError, ScattererKind, Sphere,
};

use crate::error::ExperimentError;

fn pick<T>(axis: &[T], step: usize) -> &T {
    if axis.len() == 1 {
        &axis[0]
    } else {
        &axis[step]
    }
}

fn ensure_filled<T>(
    set: &'static str,
    axis: &'static str,
    values: &[T],
) -> Result<(), ExperimentError> {
    if values.is_empty() {
        Err(ExperimentError::EmptyAxis { set, axis })
    } else {
        Ok(())
    }
}

fn ensure_sequential<T>(
    set: &'static str,
    axis: &'static str,
    values: &[T],
    expected: usize,
) -> Result<(), ExperimentError> {
    if values.len() == expected || values.len() == 1 {
        Ok(())
    } else {
        Err(ExperimentError::SequentialLengthMismatch {
            set,
            axis,
            expected,
            got: values.len(),
        })
    }
}

/// Source axes: wavelength, Jones vector, numerical aperture, power.
#[derive(Debug, Clone)]
pub struct SourceSet {
    pub wavelength: Vec<f64>,
    pub jones_vector: Vec<[Complex64; 2]>,
    pub numerical_aperture: Vec<f64>,
    pub optical_power: Vec<f64>,
}

impl SourceSet {
    pub fn axis_names(&self) -> Vec<&'static str> {
        vec![
            "wavelength",
            "jones_vector",
            "source_numerical_aperture",
            "optical_power",
        ]
    }

    pub fn shape(&self) -> Vec<usize> {
        vec![
            self.wavelength.len(),
            self.jones_vector.len(),
            self.numerical_aperture.len(),
            self.optical_power.len(),
        ]
    }

    pub fn total_combinations(&self) -> usize {
        self.shape().iter().product()
    }

    pub fn validate(&self) -> Result<(), ExperimentError> {
        ensure_filled("source", "wavelength", &self.wavelength)?;
        ensure_filled("source", "jones_vector", &self.jones_vector)?;
        ensure_filled("source", "numerical_aperture", &self.numerical_aperture)?;
        ensure_filled("source", "optical_power", &self.optical_power)
    }

    pub fn validate_sequential(&self, expected: usize) -> Result<(), ExperimentError> {
        ensure_sequential("source", "wavelength", &self.wavelength, expected)?;
        ensure_sequential("source", "jones_vector", &self.jones_vector, expected)?;
        ensure_sequential(
            "source",
            "numerical_aperture",
            &self.numerical_aperture,
            expected,
        )?;
        ensure_sequential("source", "optical_power", &self.optical_power, expected)
    }

    pub fn element_at(&self, index: &[usize]) -> Result<Gaussian, ScatterError> {
        Gaussian::new(
            self.wavelength[index[0]],
            self.jones_vector[index[1]],
            self.numerical_aperture[index[2]],
            self.optical_power[index[3]],
        )
    }

    pub fn sequential_element_at(&self, step: usize) -> Result<Gaussian, ScatterError> {
        Gaussian::new(
            *pick(&self.wavelength, step),
            *pick(&self.jones_vector, step),
            *pick(&self.numerical_aperture, step),
            *pick(&self.optical_power, step),
        )
    }
}

/// Scatterer geometry families a sweep can range over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScattererFamily {
    Sphere,
    Cylinder,
    CoreShell,
}

impl std::fmt::Display for ScattererFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ScattererFamily::Sphere => "sphere",
            ScattererFamily::Cylinder => "cylinder",
            ScattererFamily::CoreShell => "core-shell",
        };
        f.write_str(name)
    }
}

/// Homogeneous sphere axes: diameter, index, medium index.
#[derive(Debug, Clone)]
pub struct SphereSet {
    pub diameter: Vec<f64>,
    pub index: Vec<Complex64>,
    pub medium_index: Vec<f64>,
}

/// Cylinder axes: diameter, index, medium index.
#[derive(Debug, Clone)]
pub struct CylinderSet {
    pub diameter: Vec<f64>,
    pub index: Vec<Complex64>,
    pub medium_index: Vec<f64>,
}

/// Core-shell axes: core diameter, shell width, core index, shell
/// index, medium index.
#[derive(Debug, Clone)]
pub struct CoreShellSet {
    pub core_diameter: Vec<f64>,
    pub shell_width: Vec<f64>,
    pub core_index: Vec<Complex64>,
    pub shell_index: Vec<Complex64>,
    pub medium_index: Vec<f64>,
}

/// The scatterer block of a sweep, tagged by geometry family.
#[derive(Debug, Clone)]
pub enum ScattererSet {
    Sphere(SphereSet),
    Cylinder(CylinderSet),
    CoreShell(CoreShellSet),
}

impl ScattererSet {
    pub fn family(&self) -> ScattererFamily {
        match self {
            ScattererSet::Sphere(_) => ScattererFamily::Sphere,
            ScattererSet::Cylinder(_) => ScattererFamily::Cylinder,
            ScattererSet::CoreShell(_) => ScattererFamily::CoreShell,
        }
    }

    pub fn axis_names(&self) -> Vec<&'static str> {
        match self {
            ScattererSet::Sphere(_) | ScattererSet::Cylinder(_) => {
                vec!["diameter", "index", "medium_index"]
            }
            ScattererSet::CoreShell(_) => vec![
                "core_diameter",
                "shell_width",
                "core_index",
                "shell_index",
                "medium_index",
            ],
        }
    }

    pub fn shape(&self) -> Vec<usize> {
        match self {
            ScattererSet::Sphere(set) => {
                vec![set.diameter.len(), set.index.len(), set.medium_index.len()]
            }
            ScattererSet::Cylinder(set) => {
                vec![set.diameter.len(), set.index.len(), set.medium_index.len()]
            }
            ScattererSet::CoreShell(set) => vec![
                set.core_diameter.len(),
                set.shell_width.len(),
                set.core_index.len(),
                set.shell_index.len(),
                set.medium_index.len(),
            ],
        }
    }

    pub fn total_combinations(&self) -> usize {
        self.shape().iter().product()
    }

    pub fn validate(&self) -> Result<(), ExperimentError> {
        match self {
            ScattererSet::Sphere(set) => {
                ensure_filled("scatterer", "diameter", &set.diameter)?;
                ensure_filled("scatterer", "index", &set.index)?;
                ensure_filled("scatterer", "medium_index", &set.medium_index)
            }
            ScattererSet::Cylinder(set) => {
                ensure_filled("scatterer", "diameter", &set.diameter)?;
                ensure_filled("scatterer", "index", &set.index)?;
                ensure_filled("scatterer", "medium_index", &set.medium_index)
            }
            ScattererSet::CoreShell(set) => {
                ensure_filled("scatterer", "core_diameter", &set.core_diameter)?;
                ensure_filled("scatterer", "shell_width", &set.shell_width)?;
                ensure_filled("scatterer", "core_index", &set.core_index)?;
                ensure_filled("scatterer", "shell_index", &set.shell_index)?;
                ensure_filled("scatterer", "medium_index", &set.medium_index)
            }
        }
    }

    pub fn validate_sequential(&self, expected: usize) -> Result<(), ExperimentError> {
        match self {
            ScattererSet::Sphere(set) => {
                ensure_sequential("scatterer", "diameter", &set.diameter, expected)?;
                ensure_sequential("scatterer", "index", &set.index, expected)?;
                ensure_sequential("scatterer", "medium_index", &set.medium_index, expected)
            }
            ScattererSet::Cylinder(set) => {
                ensure_sequential("scatterer", "diameter", &set.diameter, expected)?;
                ensure_sequential("scatterer", "index", &set.index, expected)?;
                ensure_sequential("scatterer", "medium_index", &set.medium_index, expected)
            }
            ScattererSet::CoreShell(set) => {
                ensure_sequential("scatterer", "core_diameter", &set.core_diameter, expected)?;
                ensure_sequential("scatterer", "shell_width", &set.shell_width, expected)?;
                ensure_sequential("scatterer", "core_index", &set.core_index, expected)?;
                ensure_sequential("scatterer", "shell_index", &set.shell_index, expected)?;
                ensure_sequential("scatterer", "medium_index", &set.medium_index, expected)
            }
        }
    }

    pub fn element_at(
        &self,
        index: &[usize],
        source: &Gaussian,
    ) -> Result<ScattererKind, ScatterError> {
        match self {
            ScattererSet::Sphere(set) => Sphere::new(
                set.diameter[index[0]],
                set.index[index[1]],
                set.medium_index[index[2]],
                source.clone(),
                None,
            )
            .map(Into::into),
            ScattererSet::Cylinder(set) => Cylinder::new(
                set.diameter[index[0]],
                set.index[index[1]],
                set.medium_index[index[2]],
                source.clone(),
                None,
            )
            .map(Into::into),
            ScattererSet::CoreShell(set) => CoreShell::new(
                set.core_diameter[index[0]],
                set.shell_width[index[1]],
                set.core_index[index[2]],
                set.shell_index[index[3]],
                set.medium_index[index[4]],
                source.clone(),
                None,
            )
            .map(Into::into),
        }
    }

    pub fn sequential_element_at(
        &self,
        step: usize,
        source: &Gaussian,
    ) -> Result<ScattererKind, ScatterError> {
        match self {
            ScattererSet::Sphere(set) => Sphere::new(
                *pick(&set.diameter, step),
                *pick(&set.index, step),
                *pick(&set.medium_index, step),
                source.clone(),
                None,
            )
            .map(Into::into),
            ScattererSet::Cylinder(set) => Cylinder::new(
                *pick(&set.diameter, step),
                *pick(&set.index, step),
                *pick(&set.medium_index, step),
                source.clone(),
                None,
            )
            .map(Into::into),
            ScattererSet::CoreShell(set) => CoreShell::new(
                *pick(&set.core_diameter, step),
                *pick(&set.shell_width, step),
                *pick(&set.core_index, step),
                *pick(&set.shell_index, step),
                *pick(&set.medium_index, step),
                source.clone(),
                None,
            )
            .map(Into::into),
        }
    }
}

/// Detector axes: mode, sampling, rotation, numerical aperture, phi
/// offset, gamma offset, polarisation filter. The coherence switches
/// apply to the whole set.
#[derive(Debug, Clone)]
pub struct DetectorSet {
    pub mode: Vec<ModeId>,
    pub sampling: Vec<usize>,
    pub rotation: Vec<f64>,
    pub numerical_aperture: Vec<f64>,
    pub phi_offset: Vec<f64>,
    pub gamma_offset: Vec<f64>,
    pub polarization_filter: Vec<Option<f64>>,
    pub coherent: bool,
    pub mean_coupling: bool,
}

impl DetectorSet {
    pub fn axis_names(&self) -> Vec<&'static str> {
        vec![
            "mode",
            "sampling",
            "rotation",
            "detector_numerical_aperture",
            "phi_offset",
            "gamma_offset",
            "polarization_filter",
        ]
    }

    pub fn shape(&self) -> Vec<usize> {
        vec![
            self.mode.len(),
            self.sampling.len(),
            self.rotation.len(),
            self.numerical_aperture.len(),
            self.phi_offset.len(),
            self.gamma_offset.len(),
            self.polarization_filter.len(),
        ]
    }

    pub fn total_combinations(&self) -> usize {
        self.shape().iter().product()
    }

    pub fn validate(&self) -> Result<(), ExperimentError> {
        ensure_filled("detector", "mode", &self.mode)?;
        ensure_filled("detector", "sampling", &self.sampling)?;
        ensure_filled("detector", "rotation", &self.rotation)?;
        ensure_filled("detector", "numerical_aperture", &self.numerical_aperture)?;
        ensure_filled("detector", "phi_offset", &self.phi_offset)?;
        ensure_filled("detector", "gamma_offset", &self.gamma_offset)?;
        ensure_filled("detector", "polarization_filter", &self.polarization_filter)
    }

    pub fn validate_sequential(&self, expected: usize) -> Result<(), ExperimentError> {
        ensure_sequential("detector", "mode", &self.mode, expected)?;
        ensure_sequential("detector", "sampling", &self.sampling, expected)?;
        ensure_sequential("detector", "rotation", &self.rotation, expected)?;
        ensure_sequential(
            "detector",
            "numerical_aperture",
            &self.numerical_aperture,
            expected,
        )?;
        ensure_sequential("detector", "phi_offset", &self.phi_offset, expected)?;
        ensure_sequential("detector", "gamma_offset", &self.gamma_offset, expected)?;
        ensure_sequential(
            "detector",
            "polarization_filter",
            &self.polarization_filter,
            expected,
        )
    }

    pub fn element_at(&self, index: &[usize]) -> Result<Detector, ScatterError> {
        Detector::new(
            self.mode[index[0]],
            self.sampling[index[1]],
            self.numerical_aperture[index[3]],
            self.phi_offset[index[4]],
            self.gamma_offset[index[5]],
            self.rotation[index[2]],
            self.polarization_filter[index[6]],
            self.coherent,
            self.mean_coupling,
        )
    }

    pub fn sequential_element_at(&self, step: usize) -> Result<Detector, ScatterError> {
        Detector::new(
            *pick(&self.mode, step),
            *pick(&self.sampling, step),
            *pick(&self.numerical_aperture, step),
            *pick(&self.phi_offset, step),
            *pick(&self.gamma_offset, step),
            *pick(&self.rotation, step),
            *pick(&self.polarization_filter, step),
            self.coherent,
            self.mean_coupling,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jones_x() -> [Complex64; 2] {
        [Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)]
    }

    fn source_set() -> SourceSet {
        SourceSet {
            wavelength: vec![0.633, 0.8],
            jones_vector: vec![jones_x()],
            numerical_aperture: vec![0.2],
            optical_power: vec![1.0],
        }
    }

    #[test]
    fn shapes_follow_the_axis_order() {
        assert_eq!(source_set().shape(), vec![2, 1, 1, 1]);
        assert_eq!(source_set().total_combinations(), 2);

        let sphere = ScattererSet::Sphere(SphereSet {
            diameter: vec![0.2, 0.3, 0.4],
            index: vec![Complex64::new(1.5, 0.0)],
            medium_index: vec![1.0, 1.33],
        });
        assert_eq!(sphere.shape(), vec![3, 1, 2]);
        assert_eq!(sphere.family(), ScattererFamily::Sphere);
        assert_eq!(sphere.axis_names().len(), sphere.shape().len());
    }

    #[test]
    fn empty_axes_are_reported_by_name() {
        let mut set = source_set();
        set.optical_power.clear();
        match set.validate() {
            Err(ExperimentError::EmptyAxis { set, axis }) => {
                assert_eq!(set, "source");
                assert_eq!(axis, "optical_power");
            }
            other => panic!("expected EmptyAxis, got {other:?}"),
        }
    }

    #[test]
    fn sequential_validation_accepts_moving_and_broadcast_axes() {
        let set = source_set();
        assert!(set.validate_sequential(2).is_ok());
        assert!(matches!(
            set.validate_sequential(3),
            Err(ExperimentError::SequentialLengthMismatch {
                axis: "wavelength",
                expected: 3,
                got: 2,
                ..
            })
        ));
    }

    #[test]
    fn broadcast_axes_repeat_their_single_value() {
        let set = source_set();
        let first = set.sequential_element_at(0).unwrap();
        let second = set.sequential_element_at(1).unwrap();
        assert_ne!(first.wavelength, second.wavelength);
        assert_eq!(first.numerical_aperture, second.numerical_aperture);
    }

    #[test]
    fn detector_axis_order_maps_to_the_constructor() {
        let set = DetectorSet {
            mode: vec![ModeId::parse("NC00").unwrap()],
            sampling: vec![50, 100],
            rotation: vec![0.0],
            numerical_aperture: vec![0.2],
            phi_offset: vec![0.0],
            gamma_offset: vec![0.0],
            polarization_filter: vec![None],
            coherent: false,
            mean_coupling: true,
        };
        assert_eq!(set.shape(), vec![1, 2, 1, 1, 1, 1, 1]);
        let detector = set.element_at(&[0, 1, 0, 0, 0, 0, 0]).unwrap();
        assert_eq!(detector.sampling(), 100);
        assert!(!detector.coherent());
        assert!(detector.mean_coupling());
    }
}
