//! TOML configuration deserialisation for sweep jobs.
//!
//! Every sweep axis accepts either a scalar or a list; scalars behave
//! as single-element axes. Angles are given in degrees and converted to
//! radians when the job is built.

use num_complex::Complex64;
use serde::Deserialize;

/// Top-level job configuration.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    pub source: SourceConfig,
    pub scatterer: ScattererConfig,
    pub detector: Option<DetectorConfig>,
    pub sweep: SweepConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// A scalar or a list of scalars.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ValueOrList<T> {
    Single(T),
    List(Vec<T>),
}

impl<T: Clone> ValueOrList<T> {
    pub fn to_vec(&self) -> Vec<T> {
        match self {
            ValueOrList::Single(value) => vec![value.clone()],
            ValueOrList::List(values) => values.clone(),
        }
    }
}

impl<T: Default> Default for ValueOrList<T> {
    fn default() -> Self {
        ValueOrList::Single(T::default())
    }
}

/// Source parameters from TOML.
#[derive(Debug, Deserialize)]
pub struct SourceConfig {
    /// Vacuum wavelengths, same length unit as the scatterer sizes.
    pub wavelength: ValueOrList<f64>,
    pub polarization: ValueOrList<PolarizationSpec>,
    pub numerical_aperture: ValueOrList<f64>,
    #[serde(default = "default_power")]
    pub optical_power: ValueOrList<f64>,
}

fn default_power() -> ValueOrList<f64> {
    ValueOrList::Single(1.0)
}

/// Beam polarisation: a named Jones vector or an angle in degrees.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PolarizationSpec {
    Angle(f64),
    Named(String),
}

impl PolarizationSpec {
    pub fn to_jones(&self) -> anyhow::Result<[Complex64; 2]> {
        const INV_SQRT_2: f64 = std::f64::consts::FRAC_1_SQRT_2;
        match self {
            PolarizationSpec::Angle(degrees) => {
                let angle = degrees.to_radians();
                Ok([
                    Complex64::new(angle.cos(), 0.0),
                    Complex64::new(angle.sin(), 0.0),
                ])
            }
            PolarizationSpec::Named(name) => match name.as_str() {
                "x" => Ok([Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)]),
                "y" => Ok([Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)]),
                "rcp" => Ok([
                    Complex64::new(INV_SQRT_2, 0.0),
                    Complex64::new(0.0, INV_SQRT_2),
                ]),
                "lcp" => Ok([
                    Complex64::new(INV_SQRT_2, 0.0),
                    Complex64::new(0.0, -INV_SQRT_2),
                ]),
                other => anyhow::bail!(
                    "unknown polarisation '{}' (expected x, y, rcp, lcp, or an angle in degrees)",
                    other
                ),
            },
        }
    }

    pub fn label(&self) -> String {
        match self {
            PolarizationSpec::Angle(degrees) => format!("{}deg", degrees),
            PolarizationSpec::Named(name) => name.clone(),
        }
    }
}

/// Refractive index entry: a real number or a string like "1.5+0.01i".
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IndexSpec {
    Real(f64),
    Text(String),
}

impl IndexSpec {
    pub fn to_complex(&self) -> anyhow::Result<Complex64> {
        match self {
            IndexSpec::Real(value) => Ok(Complex64::new(*value, 0.0)),
            IndexSpec::Text(text) => text.trim().parse::<Complex64>().map_err(|_| {
                anyhow::anyhow!(
                    "cannot parse refractive index '{}' (expected forms like \"1.5\" or \"1.5+0.01i\")",
                    text
                )
            }),
        }
    }

    pub fn label(&self) -> String {
        match self {
            IndexSpec::Real(value) => format!("{}", value),
            IndexSpec::Text(text) => text.trim().to_string(),
        }
    }
}

/// Scatterer geometry from TOML, selected by `kind`.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ScattererConfig {
    Sphere {
        diameter: ValueOrList<f64>,
        index: ValueOrList<IndexSpec>,
        #[serde(default = "default_medium")]
        medium_index: ValueOrList<f64>,
    },
    Cylinder {
        diameter: ValueOrList<f64>,
        index: ValueOrList<IndexSpec>,
        #[serde(default = "default_medium")]
        medium_index: ValueOrList<f64>,
    },
    CoreShell {
        core_diameter: ValueOrList<f64>,
        shell_width: ValueOrList<f64>,
        core_index: ValueOrList<IndexSpec>,
        shell_index: ValueOrList<IndexSpec>,
        #[serde(default = "default_medium")]
        medium_index: ValueOrList<f64>,
    },
}

fn default_medium() -> ValueOrList<f64> {
    ValueOrList::Single(1.0)
}

/// Detector parameters from TOML. All angles are degrees.
#[derive(Debug, Deserialize)]
pub struct DetectorConfig {
    /// Mode codes such as "LP01", "HG11", "LG02", "NC00".
    pub mode: ValueOrList<String>,
    #[serde(default = "default_sampling")]
    pub sampling: ValueOrList<usize>,
    pub numerical_aperture: ValueOrList<f64>,
    #[serde(default)]
    pub phi_offset: ValueOrList<f64>,
    #[serde(default)]
    pub gamma_offset: ValueOrList<f64>,
    #[serde(default)]
    pub rotation: ValueOrList<f64>,
    /// Polarisation filter angles; omit for an unfiltered detector.
    pub polarization_filter: Option<ValueOrList<f64>>,
    #[serde(default = "default_true")]
    pub coherent: bool,
    #[serde(default)]
    pub mean_coupling: bool,
}

fn default_sampling() -> ValueOrList<usize> {
    ValueOrList::Single(200)
}

fn default_true() -> bool {
    true
}

/// Sweep selection from TOML.
#[derive(Debug, Deserialize)]
pub struct SweepConfig {
    /// Measure name, e.g. "qsca", "coupling", "b11".
    pub measure: String,
    #[serde(default)]
    pub mode: SweepMode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SweepMode {
    #[default]
    Factorial,
    Sequential,
}

impl SweepMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SweepMode::Factorial => "factorial",
            SweepMode::Sequential => "sequential",
        }
    }
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Output file path (default: "output/sweep.csv").
    #[serde(default = "default_output_path")]
    pub path: String,
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            format: OutputFormat::Csv,
        }
    }
}

fn default_output_path() -> String {
    "output/sweep.csv".into()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

/// Load and parse a TOML job file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<JobConfig> {
    use anyhow::Context;

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read job file '{}'", path.display()))?;
    let config: JobConfig = toml::from_str(&content)
        .with_context(|| format!("cannot parse job file '{}'", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPHERE_JOB: &str = r#"
        [source]
        wavelength = [0.633, 0.8]
        polarization = "x"
        numerical_aperture = 0.2

        [scatterer]
        kind = "sphere"
        diameter = [0.2, 0.3]
        index = ["1.5+0.01i", 1.4]

        [sweep]
        measure = "qsca"
    "#;

    #[test]
    fn scalars_and_lists_both_deserialise() {
        let job: JobConfig = toml::from_str(SPHERE_JOB).unwrap();
        assert_eq!(job.source.wavelength.to_vec(), vec![0.633, 0.8]);
        assert_eq!(job.source.numerical_aperture.to_vec(), vec![0.2]);
        assert_eq!(job.source.optical_power.to_vec(), vec![1.0]);
        assert_eq!(job.sweep.mode, SweepMode::Factorial);
        assert_eq!(job.output.format, OutputFormat::Csv);
        assert!(job.detector.is_none());
    }

    #[test]
    fn scatterer_kind_selects_the_geometry() {
        let job: JobConfig = toml::from_str(SPHERE_JOB).unwrap();
        match job.scatterer {
            ScattererConfig::Sphere { diameter, index, medium_index } => {
                assert_eq!(diameter.to_vec(), vec![0.2, 0.3]);
                assert_eq!(index.to_vec().len(), 2);
                assert_eq!(medium_index.to_vec(), vec![1.0]);
            }
            other => panic!("expected a sphere, got {other:?}"),
        }
    }

    #[test]
    fn index_entries_parse_real_and_complex_forms() {
        let real = IndexSpec::Real(1.4);
        assert_eq!(real.to_complex().unwrap(), Complex64::new(1.4, 0.0));

        let complex = IndexSpec::Text("1.5+0.01i".into());
        assert_eq!(complex.to_complex().unwrap(), Complex64::new(1.5, 0.01));
        assert_eq!(complex.label(), "1.5+0.01i");

        let bad = IndexSpec::Text("glass".into());
        assert!(bad.to_complex().is_err());
    }

    #[test]
    fn polarisation_names_map_to_jones_vectors() {
        let x = PolarizationSpec::Named("x".into()).to_jones().unwrap();
        assert_eq!(x, [Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)]);

        let rcp = PolarizationSpec::Named("rcp".into()).to_jones().unwrap();
        assert!((rcp[0].norm() - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-15);
        assert!((rcp[1] - Complex64::new(0.0, std::f64::consts::FRAC_1_SQRT_2)).norm() < 1e-15);

        let diagonal = PolarizationSpec::Angle(45.0).to_jones().unwrap();
        assert!((diagonal[0].re - diagonal[1].re).abs() < 1e-15);

        assert!(PolarizationSpec::Named("vertical".into()).to_jones().is_err());
    }

    #[test]
    fn detector_tables_deserialise_with_defaults() {
        let text = r#"
            mode = ["LP01", "NC00"]
            numerical_aperture = 0.4
            phi_offset = [0.0, 30.0]
        "#;
        let detector: DetectorConfig = toml::from_str(text).unwrap();
        assert_eq!(detector.mode.to_vec(), vec!["LP01", "NC00"]);
        assert_eq!(detector.sampling.to_vec(), vec![200]);
        assert_eq!(detector.phi_offset.to_vec(), vec![0.0, 30.0]);
        assert_eq!(detector.rotation.to_vec(), vec![0.0]);
        assert!(detector.polarization_filter.is_none());
        assert!(detector.coherent);
        assert!(!detector.mean_coupling);
    }
}
