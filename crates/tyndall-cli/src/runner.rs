//! Sweep runner: builds an experiment from a job file and writes the
//! results out.

use std::path::Path;

use anyhow::Result;
use ndarray::{Array1, ArrayD, Dimension};
use serde::Serialize;

use tyndall_core::ModeId;
use tyndall_experiment::{
    CoreShellSet, CylinderSet, DetectorSet, Experiment, Measure, ScattererFamily, ScattererSet,
    SourceSet, SphereSet,
};

use crate::config::{DetectorConfig, JobConfig, ScattererConfig, SourceConfig, SweepMode};

/// Results of one sweep, with printable labels for every axis position.
pub struct SweepOutput {
    pub measure: Measure,
    pub mode: SweepMode,
    pub axis_names: Vec<&'static str>,
    pub axis_labels: Vec<Vec<String>>,
    pub values: SweepValues,
}

pub enum SweepValues {
    Factorial(ArrayD<f64>),
    Sequential(Array1<f64>),
}

/// Run a full sweep from a parsed job configuration.
pub fn run_sweep(job: &JobConfig) -> Result<SweepOutput> {
    let (experiment, measure, labels) = build_experiment(job)?;

    println!("  measure: {}", measure);
    println!("  scatterer: {}", experiment.scatterer.family());

    let values = match job.sweep.mode {
        SweepMode::Factorial => {
            let tensor = experiment.factorial(measure)?;
            println!("  cells: {} (shape {:?})", tensor.len(), tensor.shape());
            SweepValues::Factorial(tensor)
        }
        SweepMode::Sequential => {
            let series = experiment.sequential(measure)?;
            println!("  steps: {}", series.len());
            SweepValues::Sequential(series)
        }
    };

    Ok(SweepOutput {
        measure,
        mode: job.sweep.mode,
        axis_names: experiment.axis_names(measure),
        axis_labels: labels,
        values,
    })
}

/// Build the experiment and check it without evaluating any cell.
pub fn validate_job(job: &JobConfig) -> Result<()> {
    let (experiment, measure, _) = build_experiment(job)?;
    experiment.validate(measure)?;
    Ok(())
}

fn build_experiment(job: &JobConfig) -> Result<(Experiment, Measure, Vec<Vec<String>>)> {
    let measure: Measure = job.sweep.measure.parse()?;

    let (source, source_labels) = build_source(&job.source)?;
    let (scatterer, scatterer_labels) = build_scatterer(&job.scatterer)?;

    let mut labels = source_labels;
    labels.extend(scatterer_labels);

    let detector = match &job.detector {
        Some(cfg) => {
            let (set, detector_labels) = build_detector(cfg)?;
            if measure.needs_detector() {
                labels.extend(detector_labels);
            }
            Some(set)
        }
        None => None,
    };

    let experiment = Experiment {
        source,
        scatterer,
        detector,
    };
    Ok((experiment, measure, labels))
}

fn build_source(cfg: &SourceConfig) -> Result<(SourceSet, Vec<Vec<String>>)> {
    let wavelength = cfg.wavelength.to_vec();
    let polarization = cfg.polarization.to_vec();
    let numerical_aperture = cfg.numerical_aperture.to_vec();
    let optical_power = cfg.optical_power.to_vec();

    let labels = vec![
        float_labels(&wavelength),
        polarization.iter().map(|p| p.label()).collect(),
        float_labels(&numerical_aperture),
        float_labels(&optical_power),
    ];

    let jones_vector = polarization
        .iter()
        .map(|p| p.to_jones())
        .collect::<Result<Vec<_>>>()?;

    let set = SourceSet {
        wavelength,
        jones_vector,
        numerical_aperture,
        optical_power,
    };
    Ok((set, labels))
}

fn build_scatterer(cfg: &ScattererConfig) -> Result<(ScattererSet, Vec<Vec<String>>)> {
    match cfg {
        ScattererConfig::Sphere {
            diameter,
            index,
            medium_index,
        } => {
            let diameter = diameter.to_vec();
            let index = index.to_vec();
            let medium_index = medium_index.to_vec();
            let labels = vec![
                float_labels(&diameter),
                index.iter().map(|spec| spec.label()).collect(),
                float_labels(&medium_index),
            ];
            let index = index
                .iter()
                .map(|spec| spec.to_complex())
                .collect::<Result<Vec<_>>>()?;
            let set = ScattererSet::Sphere(SphereSet {
                diameter,
                index,
                medium_index,
            });
            Ok((set, labels))
        }
        ScattererConfig::Cylinder {
            diameter,
            index,
            medium_index,
        } => {
            let diameter = diameter.to_vec();
            let index = index.to_vec();
            let medium_index = medium_index.to_vec();
            let labels = vec![
                float_labels(&diameter),
                index.iter().map(|spec| spec.label()).collect(),
                float_labels(&medium_index),
            ];
            let index = index
                .iter()
                .map(|spec| spec.to_complex())
                .collect::<Result<Vec<_>>>()?;
            let set = ScattererSet::Cylinder(CylinderSet {
                diameter,
                index,
                medium_index,
            });
            Ok((set, labels))
        }
        ScattererConfig::CoreShell {
            core_diameter,
            shell_width,
            core_index,
            shell_index,
            medium_index,
        } => {
            let core_diameter = core_diameter.to_vec();
            let shell_width = shell_width.to_vec();
            let core_index = core_index.to_vec();
            let shell_index = shell_index.to_vec();
            let medium_index = medium_index.to_vec();
            let labels = vec![
                float_labels(&core_diameter),
                float_labels(&shell_width),
                core_index.iter().map(|spec| spec.label()).collect(),
                shell_index.iter().map(|spec| spec.label()).collect(),
                float_labels(&medium_index),
            ];
            let core_index = core_index
                .iter()
                .map(|spec| spec.to_complex())
                .collect::<Result<Vec<_>>>()?;
            let shell_index = shell_index
                .iter()
                .map(|spec| spec.to_complex())
                .collect::<Result<Vec<_>>>()?;
            let set = ScattererSet::CoreShell(CoreShellSet {
                core_diameter,
                shell_width,
                core_index,
                shell_index,
                medium_index,
            });
            Ok((set, labels))
        }
    }
}

fn build_detector(cfg: &DetectorConfig) -> Result<(DetectorSet, Vec<Vec<String>>)> {
    let mode_codes = cfg.mode.to_vec();
    let mode = mode_codes
        .iter()
        .map(|code| ModeId::parse(code))
        .collect::<Result<Vec<_>, _>>()?;
    let sampling = cfg.sampling.to_vec();
    let rotation_deg = cfg.rotation.to_vec();
    let numerical_aperture = cfg.numerical_aperture.to_vec();
    let phi_deg = cfg.phi_offset.to_vec();
    let gamma_deg = cfg.gamma_offset.to_vec();
    let filter_deg: Vec<Option<f64>> = match &cfg.polarization_filter {
        Some(list) => list.to_vec().into_iter().map(Some).collect(),
        None => vec![None],
    };

    let labels = vec![
        mode_codes,
        sampling.iter().map(|s| format!("{}", s)).collect(),
        float_labels(&rotation_deg),
        float_labels(&numerical_aperture),
        float_labels(&phi_deg),
        float_labels(&gamma_deg),
        filter_deg
            .iter()
            .map(|filter| match filter {
                Some(degrees) => format!("{}deg", degrees),
                None => "none".to_string(),
            })
            .collect(),
    ];

    let set = DetectorSet {
        mode,
        sampling,
        rotation: to_radians(&rotation_deg),
        numerical_aperture,
        phi_offset: to_radians(&phi_deg),
        gamma_offset: to_radians(&gamma_deg),
        polarization_filter: filter_deg
            .into_iter()
            .map(|filter| filter.map(f64::to_radians))
            .collect(),
        coherent: cfg.coherent,
        mean_coupling: cfg.mean_coupling,
    };
    Ok((set, labels))
}

fn float_labels(values: &[f64]) -> Vec<String> {
    values.iter().map(|v| format!("{}", v)).collect()
}

fn to_radians(degrees: &[f64]) -> Vec<f64> {
    degrees.iter().map(|d| d.to_radians()).collect()
}

fn broadcast_label(labels: &[String], step: usize) -> &str {
    if labels.len() == 1 {
        &labels[0]
    } else {
        &labels[step]
    }
}

/// Write sweep results to a CSV file with a metadata header.
pub fn write_csv(output: &SweepOutput, path: &Path) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::File::create(path)?;

    writeln!(file, "# Tyndall Scattering Sweeps — {}", output.measure)?;
    writeln!(file, "# Version: {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(file, "# mode: {}", output.mode.as_str())?;
    match &output.values {
        SweepValues::Factorial(tensor) => writeln!(file, "# shape: {:?}", tensor.shape())?,
        SweepValues::Sequential(series) => writeln!(file, "# steps: {}", series.len())?,
    }
    writeln!(file, "#")?;
    writeln!(file, "{},{}", output.axis_names.join(","), output.measure)?;

    match &output.values {
        SweepValues::Factorial(tensor) => {
            for (index, value) in tensor.indexed_iter() {
                let row: Vec<&str> = index
                    .slice()
                    .iter()
                    .zip(&output.axis_labels)
                    .map(|(&i, labels)| labels[i].as_str())
                    .collect();
                writeln!(file, "{},{:.9e}", row.join(","), value)?;
            }
        }
        SweepValues::Sequential(series) => {
            for (step, value) in series.iter().enumerate() {
                let row: Vec<&str> = output
                    .axis_labels
                    .iter()
                    .map(|labels| broadcast_label(labels, step))
                    .collect();
                writeln!(file, "{},{:.9e}", row.join(","), value)?;
            }
        }
    }

    println!("Results written to: {}", path.display());
    Ok(())
}

#[derive(Serialize)]
struct JsonAxis<'a> {
    name: &'a str,
    values: &'a [String],
}

#[derive(Serialize)]
struct JsonSweep<'a> {
    measure: String,
    mode: &'a str,
    shape: Vec<usize>,
    axes: Vec<JsonAxis<'a>>,
    values: Vec<f64>,
}

/// Write sweep results to a JSON file.
pub fn write_json(output: &SweepOutput, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let (shape, values) = match &output.values {
        SweepValues::Factorial(tensor) => {
            (tensor.shape().to_vec(), tensor.iter().copied().collect())
        }
        SweepValues::Sequential(series) => (vec![series.len()], series.to_vec()),
    };
    let axes = output
        .axis_names
        .iter()
        .zip(&output.axis_labels)
        .map(|(&name, labels)| JsonAxis {
            name,
            values: labels,
        })
        .collect();

    let document = JsonSweep {
        measure: output.measure.to_string(),
        mode: output.mode.as_str(),
        shape,
        axes,
        values,
    };

    let json = serde_json::to_string_pretty(&document)
        .map_err(|e| anyhow::anyhow!("JSON serialisation error: {}", e))?;
    std::fs::write(path, json)?;

    println!("Results (JSON) written to: {}", path.display());
    Ok(())
}

/// Print the measure table for the `measures` subcommand.
pub fn print_measures() {
    let families = [
        ScattererFamily::Sphere,
        ScattererFamily::Cylinder,
        ScattererFamily::CoreShell,
    ];
    println!("Available measures:");
    println!();
    for measure in Measure::ALL {
        let supported: Vec<String> = families
            .iter()
            .filter(|family| measure.supported_by(**family))
            .map(|family| family.to_string())
            .collect();
        let note = if measure.needs_detector() {
            "  (requires a detector)"
        } else {
            ""
        };
        println!("  {:<10} {}{}", measure.to_string(), supported.join(", "), note);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jobs_build_into_experiments_with_radian_angles() {
        let text = r#"
            [source]
            wavelength = 0.633
            polarization = "x"
            numerical_aperture = 0.2

            [scatterer]
            kind = "sphere"
            diameter = [0.2, 0.3]
            index = 1.5

            [detector]
            mode = "NC00"
            sampling = 50
            numerical_aperture = 0.4
            phi_offset = 30.0

            [sweep]
            measure = "coupling"
        "#;
        let job: JobConfig = toml::from_str(text).unwrap();
        let (experiment, measure, labels) = build_experiment(&job).unwrap();

        assert_eq!(measure, Measure::Coupling);
        assert!(experiment.validate(measure).is_ok());
        assert_eq!(labels.len(), 14);
        assert_eq!(labels[4], vec!["0.2", "0.3"]);

        let detector = experiment.detector.as_ref().unwrap();
        assert!((detector.phi_offset[0] - 30f64.to_radians()).abs() < 1e-15);
        assert_eq!(detector.polarization_filter, vec![None]);
    }

    #[test]
    fn detector_labels_are_skipped_for_scalar_measures() {
        let text = r#"
            [source]
            wavelength = 0.633
            polarization = "y"
            numerical_aperture = 0.2

            [scatterer]
            kind = "cylinder"
            diameter = 0.3
            index = "1.5+0.01i"

            [detector]
            mode = "LP01"
            numerical_aperture = 0.4

            [sweep]
            measure = "qsca"
        "#;
        let job: JobConfig = toml::from_str(text).unwrap();
        let (experiment, measure, labels) = build_experiment(&job).unwrap();

        assert_eq!(labels.len(), 7);
        assert_eq!(experiment.axis_names(measure).len(), 7);
        // The detector set is still built; it just does not contribute
        // axes to a scalar measure.
        assert!(experiment.detector.is_some());
    }
}
