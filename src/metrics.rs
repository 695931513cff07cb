use std::fmt;
use std::fs;
use std::path::Path;

/// Held-out regression error of a trained pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelMetrics {
    pub mae: f64,
    pub rmse: f64,
    pub r_squared: f64,
}

impl ModelMetrics {
    /// Panics if the slices differ in length or are empty.
    pub fn compute(actuals: &[f64], predictions: &[f64]) -> Self {
        assert_eq!(actuals.len(), predictions.len());
        assert!(!actuals.is_empty());

        let n = actuals.len() as f64;
        let mae = actuals
            .iter()
            .zip(predictions)
            .map(|(a, p)| (a - p).abs())
            .sum::<f64>()
            / n;
        let ss_res = actuals
            .iter()
            .zip(predictions)
            .map(|(a, p)| (a - p).powi(2))
            .sum::<f64>();
        let mean = actuals.iter().sum::<f64>() / n;
        let ss_tot = actuals.iter().map(|a| (a - mean).powi(2)).sum::<f64>();

        let r_squared = if ss_tot > 0.0 {
            1.0 - ss_res / ss_tot
        } else if ss_res == 0.0 {
            1.0
        } else {
            0.0
        };

        Self {
            mae,
            rmse: (ss_res / n).sqrt(),
            r_squared,
        }
    }

    /// Writes the three-line text report.
    pub fn write_report<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        if let Some(parent) = path.as_ref().parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_string())
    }
}

impl fmt::Display for ModelMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MAE: {:.2}", self.mae)?;
        writeln!(f, "RMSE: {:.2}", self.rmse)?;
        writeln!(f, "R2 Score: {:.2}", self.r_squared)
    }
}
