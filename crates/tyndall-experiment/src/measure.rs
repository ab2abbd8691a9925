//! Named observables a sweep can evaluate.

use std::fmt;
use std::str::FromStr;

use num_complex::Complex64;

use tyndall_core::{Detector, Scatterer, ScattererKind};

use crate::error::ExperimentError;
use crate::parameters::ScattererFamily;

/// One scalar observable per sweep cell.
///
/// Coefficient measures report the modulus of the named partial-wave
/// coefficient: `a1`..`b3` address the first three multipole orders of
/// spherical geometries, `a11`..`b23` the first three orders of each
/// cylindrical coefficient family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    Qsca,
    Qext,
    Qabs,
    Qpr,
    Qback,
    Qforward,
    Qratio,
    Csca,
    Cext,
    Cabs,
    Cpr,
    Cback,
    Cforward,
    Cratio,
    G,
    A1,
    A2,
    A3,
    B1,
    B2,
    B3,
    A11,
    A12,
    A13,
    A21,
    A22,
    A23,
    B11,
    B12,
    B13,
    B21,
    B22,
    B23,
    Coupling,
}

fn spherical_an(scatterer: &ScattererKind) -> &[Complex64] {
    match scatterer {
        ScattererKind::Sphere(sphere) => sphere.an(),
        ScattererKind::CoreShell(coated) => coated.an(),
        ScattererKind::Cylinder(_) => {
            panic!("multipole coefficient measures are not defined for cylinders")
        }
    }
}

fn spherical_bn(scatterer: &ScattererKind) -> &[Complex64] {
    match scatterer {
        ScattererKind::Sphere(sphere) => sphere.bn(),
        ScattererKind::CoreShell(coated) => coated.bn(),
        ScattererKind::Cylinder(_) => {
            panic!("multipole coefficient measures are not defined for cylinders")
        }
    }
}

fn qback_of(scatterer: &ScattererKind) -> f64 {
    match scatterer {
        ScattererKind::Sphere(sphere) => sphere.qback(),
        ScattererKind::CoreShell(coated) => coated.qback(),
        ScattererKind::Cylinder(_) => {
            panic!("backscatter measures are not defined for cylinders")
        }
    }
}

fn qforward_of(scatterer: &ScattererKind) -> f64 {
    match scatterer {
        ScattererKind::Sphere(sphere) => sphere.qforward(),
        ScattererKind::CoreShell(coated) => coated.qforward(),
        ScattererKind::Cylinder(_) => {
            panic!("forward-scatter measures are not defined for cylinders")
        }
    }
}

fn cylinder_of(scatterer: &ScattererKind) -> &tyndall_core::Cylinder {
    match scatterer {
        ScattererKind::Cylinder(cylinder) => cylinder,
        _ => panic!("cylindrical coefficient measures are only defined for cylinders"),
    }
}

impl Measure {
    pub const ALL: [Measure; 34] = [
        Measure::Qsca,
        Measure::Qext,
        Measure::Qabs,
        Measure::Qpr,
        Measure::Qback,
        Measure::Qforward,
        Measure::Qratio,
        Measure::Csca,
        Measure::Cext,
        Measure::Cabs,
        Measure::Cpr,
        Measure::Cback,
        Measure::Cforward,
        Measure::Cratio,
        Measure::G,
        Measure::A1,
        Measure::A2,
        Measure::A3,
        Measure::B1,
        Measure::B2,
        Measure::B3,
        Measure::A11,
        Measure::A12,
        Measure::A13,
        Measure::A21,
        Measure::A22,
        Measure::A23,
        Measure::B11,
        Measure::B12,
        Measure::B13,
        Measure::B21,
        Measure::B22,
        Measure::B23,
        Measure::Coupling,
    ];

    /// Whether this observable is defined for the given geometry.
    pub fn supported_by(&self, family: ScattererFamily) -> bool {
        use Measure::*;
        match family {
            ScattererFamily::Sphere | ScattererFamily::CoreShell => !matches!(
                self,
                A11 | A12 | A13 | A21 | A22 | A23 | B11 | B12 | B13 | B21 | B22 | B23
            ),
            ScattererFamily::Cylinder => matches!(
                self,
                Qsca | Qext
                    | Qabs
                    | Csca
                    | Cext
                    | Cabs
                    | G
                    | A11
                    | A12
                    | A13
                    | A21
                    | A22
                    | A23
                    | B11
                    | B12
                    | B13
                    | B21
                    | B22
                    | B23
                    | Coupling
            ),
        }
    }

    pub fn needs_detector(&self) -> bool {
        matches!(self, Measure::Coupling)
    }

    /// Evaluate one cell.
    ///
    /// # Panics
    ///
    /// Panics if called with a geometry the measure is not defined for
    /// or without a detector where one is required; sweeps reject those
    /// combinations before dispatch.
    pub fn evaluate(&self, scatterer: &ScattererKind, detector: Option<&Detector>) -> f64 {
        match self {
            Measure::Qsca => scatterer.qsca(),
            Measure::Qext => scatterer.qext(),
            Measure::Qabs => scatterer.qabs(),
            Measure::Qpr => scatterer.qpr(),
            Measure::Qback => qback_of(scatterer),
            Measure::Qforward => qforward_of(scatterer),
            Measure::Qratio => qback_of(scatterer) / qforward_of(scatterer),
            Measure::Csca => scatterer.csca(),
            Measure::Cext => scatterer.cext(),
            Measure::Cabs => scatterer.cabs(),
            Measure::Cpr => scatterer.cpr(),
            Measure::Cback => qback_of(scatterer) * scatterer.area(),
            Measure::Cforward => qforward_of(scatterer) * scatterer.area(),
            Measure::Cratio => {
                qback_of(scatterer) / qforward_of(scatterer) * scatterer.area()
            }
            Measure::G => scatterer.g(),
            Measure::A1 => spherical_an(scatterer)[0].norm(),
            Measure::A2 => spherical_an(scatterer)[1].norm(),
            Measure::A3 => spherical_an(scatterer)[2].norm(),
            Measure::B1 => spherical_bn(scatterer)[0].norm(),
            Measure::B2 => spherical_bn(scatterer)[1].norm(),
            Measure::B3 => spherical_bn(scatterer)[2].norm(),
            Measure::A11 => cylinder_of(scatterer).a1n()[1].norm(),
            Measure::A12 => cylinder_of(scatterer).a1n()[2].norm(),
            Measure::A13 => cylinder_of(scatterer).a1n()[3].norm(),
            Measure::A21 => cylinder_of(scatterer).a2n()[1].norm(),
            Measure::A22 => cylinder_of(scatterer).a2n()[2].norm(),
            Measure::A23 => cylinder_of(scatterer).a2n()[3].norm(),
            Measure::B11 => cylinder_of(scatterer).b1n()[1].norm(),
            Measure::B12 => cylinder_of(scatterer).b1n()[2].norm(),
            Measure::B13 => cylinder_of(scatterer).b1n()[3].norm(),
            Measure::B21 => cylinder_of(scatterer).b2n()[1].norm(),
            Measure::B22 => cylinder_of(scatterer).b2n()[2].norm(),
            Measure::B23 => cylinder_of(scatterer).b2n()[3].norm(),
            Measure::Coupling => {
                let Some(detector) = detector else {
                    panic!("coupling requested without a detector");
                };
                detector.coupling(scatterer)
            }
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Measure::Qsca => "qsca",
            Measure::Qext => "qext",
            Measure::Qabs => "qabs",
            Measure::Qpr => "qpr",
            Measure::Qback => "qback",
            Measure::Qforward => "qforward",
            Measure::Qratio => "qratio",
            Measure::Csca => "csca",
            Measure::Cext => "cext",
            Measure::Cabs => "cabs",
            Measure::Cpr => "cpr",
            Measure::Cback => "cback",
            Measure::Cforward => "cforward",
            Measure::Cratio => "cratio",
            Measure::G => "g",
            Measure::A1 => "a1",
            Measure::A2 => "a2",
            Measure::A3 => "a3",
            Measure::B1 => "b1",
            Measure::B2 => "b2",
            Measure::B3 => "b3",
            Measure::A11 => "a11",
            Measure::A12 => "a12",
            Measure::A13 => "a13",
            Measure::A21 => "a21",
            Measure::A22 => "a22",
            Measure::A23 => "a23",
            Measure::B11 => "b11",
            Measure::B12 => "b12",
            Measure::B13 => "b13",
            Measure::B21 => "b21",
            Measure::B22 => "b22",
            Measure::B23 => "b23",
            Measure::Coupling => "coupling",
        };
        f.write_str(name)
    }
}

impl FromStr for Measure {
    type Err = ExperimentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        Measure::ALL
            .iter()
            .find(|measure| measure.to_string() == lowered)
            .copied()
            .ok_or_else(|| ExperimentError::UnknownMeasure(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_parsing() {
        for measure in Measure::ALL {
            assert_eq!(measure.to_string().parse::<Measure>().unwrap(), measure);
        }
        // Parsing tolerates the capitalised spellings common in the
        // literature.
        assert_eq!("Qsca".parse::<Measure>().unwrap(), Measure::Qsca);
        assert_eq!("QBACK".parse::<Measure>().unwrap(), Measure::Qback);
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert!(matches!(
            "qfoo".parse::<Measure>(),
            Err(ExperimentError::UnknownMeasure(name)) if name == "qfoo"
        ));
    }

    #[test]
    fn support_matrix_follows_the_geometry() {
        assert!(Measure::Qpr.supported_by(ScattererFamily::Sphere));
        assert!(Measure::Qpr.supported_by(ScattererFamily::CoreShell));
        assert!(!Measure::Qpr.supported_by(ScattererFamily::Cylinder));
        assert!(!Measure::Qback.supported_by(ScattererFamily::Cylinder));
        assert!(Measure::A1.supported_by(ScattererFamily::Sphere));
        assert!(!Measure::A1.supported_by(ScattererFamily::Cylinder));
        assert!(Measure::A11.supported_by(ScattererFamily::Cylinder));
        assert!(!Measure::A11.supported_by(ScattererFamily::Sphere));
        for family in [
            ScattererFamily::Sphere,
            ScattererFamily::Cylinder,
            ScattererFamily::CoreShell,
        ] {
            assert!(Measure::Qsca.supported_by(family));
            assert!(Measure::Coupling.supported_by(family));
        }
    }

    #[test]
    fn only_coupling_needs_a_detector() {
        for measure in Measure::ALL {
            assert_eq!(measure.needs_detector(), measure == Measure::Coupling);
        }
    }
}
