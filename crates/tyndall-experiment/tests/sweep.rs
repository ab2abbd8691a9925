//! End-to-end sweep checks against directly constructed scatterers and
//! detectors, plus independently computed reference values for a 300 nm
//! glass sphere in a 633 nm beam.

use approx::assert_relative_eq;
use ndarray::IxDyn;
use num_complex::Complex64;

use tyndall_core::{Cylinder, Detector, Gaussian, ModeId, Scatterer, Sphere};
use tyndall_experiment::{
    CylinderSet, DetectorSet, Experiment, ExperimentError, Measure, ScattererSet, SourceSet,
    SphereSet,
};

fn x_jones() -> [Complex64; 2] {
    [Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)]
}

fn source_set(wavelength: Vec<f64>) -> SourceSet {
    SourceSet {
        wavelength,
        jones_vector: vec![x_jones()],
        numerical_aperture: vec![0.2],
        optical_power: vec![1.0],
    }
}

fn glass_sphere_set(diameter: Vec<f64>) -> ScattererSet {
    ScattererSet::Sphere(SphereSet {
        diameter,
        index: vec![Complex64::new(1.5, 0.0)],
        medium_index: vec![1.0],
    })
}

#[test]
fn factorial_tensor_has_one_axis_per_parameter() {
    let half = std::f64::consts::FRAC_1_SQRT_2;
    let diagonal_jones = [Complex64::new(half, 0.0), Complex64::new(half, 0.0)];
    let y_jones = [Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)];
    let experiment = Experiment {
        source: SourceSet {
            wavelength: vec![0.633, 0.8],
            jones_vector: vec![x_jones(), y_jones, diagonal_jones],
            numerical_aperture: vec![0.2],
            optical_power: vec![1.0],
        },
        scatterer: ScattererSet::Sphere(SphereSet {
            diameter: vec![0.2, 0.3, 0.4, 0.5],
            index: vec![Complex64::new(1.5, 0.0)],
            medium_index: vec![1.0],
        }),
        detector: None,
    };

    let tensor = experiment.factorial(Measure::Qsca).unwrap();
    assert_eq!(tensor.shape(), &[2, 3, 1, 1, 4, 1, 1]);
    assert_eq!(tensor.len(), 24);
    assert!(tensor.iter().all(|value| value.is_finite()));
    assert_eq!(
        experiment.axis_names(Measure::Qsca),
        vec![
            "wavelength",
            "jones_vector",
            "source_numerical_aperture",
            "optical_power",
            "diameter",
            "index",
            "medium_index",
        ]
    );

    // A far-corner cell agrees with the same scatterer built by hand.
    let source = Gaussian::new(0.8, diagonal_jones, 0.2, 1.0).unwrap();
    let sphere = Sphere::new(0.5, Complex64::new(1.5, 0.0), 1.0, source, None).unwrap();
    assert_relative_eq!(
        tensor[IxDyn(&[1, 2, 0, 0, 3, 0, 0])],
        sphere.qsca(),
        max_relative = 1e-12
    );
}

#[test]
fn factorial_reproduces_the_reference_sphere() {
    let experiment = Experiment {
        source: source_set(vec![0.633]),
        scatterer: glass_sphere_set(vec![0.3]),
        detector: None,
    };

    let qsca = experiment.factorial(Measure::Qsca).unwrap();
    assert_eq!(qsca.len(), 1);
    assert_relative_eq!(
        qsca[IxDyn(&[0, 0, 0, 0, 0, 0, 0])],
        0.73684085841321538,
        max_relative = 1e-9
    );

    // Lossless sphere: extinction equals scattering.
    let qext = experiment.factorial(Measure::Qext).unwrap();
    assert_relative_eq!(
        qext[IxDyn(&[0, 0, 0, 0, 0, 0, 0])],
        0.73684085841321538,
        max_relative = 1e-9
    );
}

#[test]
fn coupling_sweeps_span_the_detector_axes() {
    let detector = DetectorSet {
        mode: vec![
            ModeId::parse("NC00").unwrap(),
            ModeId::parse("LP01").unwrap(),
        ],
        sampling: vec![50],
        rotation: vec![0.0],
        numerical_aperture: vec![0.2],
        phi_offset: vec![0.0],
        gamma_offset: vec![0.0],
        polarization_filter: vec![None],
        coherent: true,
        mean_coupling: false,
    };
    let experiment = Experiment {
        source: source_set(vec![0.633]),
        scatterer: glass_sphere_set(vec![0.3]),
        detector: Some(detector),
    };

    let tensor = experiment.factorial(Measure::Coupling).unwrap();
    assert_eq!(tensor.ndim(), 14);
    // The mode axis is the first detector axis.
    assert_eq!(tensor.shape()[7], 2);

    let mut nc_cell = vec![0usize; 14];
    assert_relative_eq!(
        tensor[IxDyn(&nc_cell)],
        9.303684372933897e-5,
        max_relative = 1e-9
    );
    nc_cell[7] = 1;
    assert_relative_eq!(
        tensor[IxDyn(&nc_cell)],
        2.0410346814447013e-5,
        max_relative = 1e-9
    );

    // The mode cell agrees with a directly built detector.
    let source = Gaussian::new(0.633, x_jones(), 0.2, 1.0).unwrap();
    let sphere = Sphere::new(0.3, Complex64::new(1.5, 0.0), 1.0, source, None).unwrap();
    let direct = Detector::new(
        ModeId::parse("LP01").unwrap(),
        50,
        0.2,
        0.0,
        0.0,
        0.0,
        None,
        true,
        false,
    )
    .unwrap();
    assert_relative_eq!(
        tensor[IxDyn(&nc_cell)],
        direct.coupling(&sphere),
        max_relative = 1e-12
    );
}

#[test]
fn factorial_results_are_deterministic() {
    let experiment = Experiment {
        source: source_set(vec![0.633, 0.8]),
        scatterer: glass_sphere_set(vec![0.2, 0.3]),
        detector: None,
    };
    let first = experiment.factorial(Measure::Qext).unwrap();
    let second = experiment.factorial(Measure::Qext).unwrap();
    assert_eq!(first, second);
}

#[test]
fn cylinder_coefficient_measures_read_the_first_orders() {
    let experiment = Experiment {
        source: source_set(vec![0.633]),
        scatterer: ScattererSet::Cylinder(CylinderSet {
            diameter: vec![0.3],
            index: vec![Complex64::new(1.5, 0.0)],
            medium_index: vec![1.0],
        }),
        detector: None,
    };

    let source = Gaussian::new(0.633, x_jones(), 0.2, 1.0).unwrap();
    let cylinder = Cylinder::new(0.3, Complex64::new(1.5, 0.0), 1.0, source, None).unwrap();

    let b11 = experiment.factorial(Measure::B11).unwrap();
    assert_relative_eq!(
        b11[IxDyn(&[0, 0, 0, 0, 0, 0, 0])],
        cylinder.b1n()[1].norm(),
        max_relative = 1e-12
    );
    let a21 = experiment.factorial(Measure::A21).unwrap();
    assert_relative_eq!(
        a21[IxDyn(&[0, 0, 0, 0, 0, 0, 0])],
        cylinder.a2n()[1].norm(),
        max_relative = 1e-12
    );
}

#[test]
fn sequential_sweeps_move_axes_in_lockstep() {
    let experiment = Experiment {
        source: source_set(vec![0.5, 0.6, 0.7, 0.8, 0.9]),
        scatterer: glass_sphere_set(vec![0.2, 0.25, 0.3, 0.35, 0.4]),
        detector: None,
    };

    let series = experiment.sequential(Measure::Qsca).unwrap();
    assert_eq!(series.len(), 5);

    // Step 2 pairs the third wavelength with the third diameter while
    // the single-valued axes broadcast.
    let source = Gaussian::new(0.7, x_jones(), 0.2, 1.0).unwrap();
    let sphere = Sphere::new(0.3, Complex64::new(1.5, 0.0), 1.0, source, None).unwrap();
    assert_relative_eq!(series[2], sphere.qsca(), max_relative = 1e-12);
}

#[test]
fn sequential_length_mismatches_are_rejected() {
    let experiment = Experiment {
        source: source_set(vec![0.5, 0.6, 0.7, 0.8, 0.9]),
        scatterer: glass_sphere_set(vec![0.2, 0.25, 0.3, 0.35, 0.4, 0.45]),
        detector: None,
    };
    assert!(matches!(
        experiment.sequential(Measure::Qsca),
        Err(ExperimentError::SequentialLengthMismatch {
            set: "scatterer",
            axis: "diameter",
            expected: 5,
            got: 6,
        })
    ));
}

#[test]
fn sequential_coupling_matches_the_detector_estimate() {
    let wavelengths = [0.633, 0.8];
    let phi_offsets = [0.0, 0.4];
    let experiment = Experiment {
        source: source_set(wavelengths.to_vec()),
        scatterer: glass_sphere_set(vec![0.3]),
        detector: Some(DetectorSet {
            mode: vec![ModeId::parse("NC00").unwrap()],
            sampling: vec![50],
            rotation: vec![0.0],
            numerical_aperture: vec![0.2],
            phi_offset: phi_offsets.to_vec(),
            gamma_offset: vec![0.0],
            polarization_filter: vec![None],
            coherent: true,
            mean_coupling: false,
        }),
    };

    let series = experiment.sequential(Measure::Coupling).unwrap();
    assert_eq!(series.len(), 2);

    for step in 0..2 {
        let source = Gaussian::new(wavelengths[step], x_jones(), 0.2, 1.0).unwrap();
        let sphere = Sphere::new(0.3, Complex64::new(1.5, 0.0), 1.0, source, None).unwrap();
        let detector = Detector::new(
            ModeId::parse("NC00").unwrap(),
            50,
            0.2,
            phi_offsets[step],
            0.0,
            0.0,
            None,
            true,
            false,
        )
        .unwrap();
        assert_relative_eq!(
            series[step],
            detector.coupling(&sphere),
            max_relative = 1e-12
        );
    }
}
