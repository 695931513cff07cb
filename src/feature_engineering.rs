use crate::data_loader::{CategoricalColumn, FeatureTable, NumericColumn};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Per-column standardization fitted on training data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub columns: Vec<String>,
    pub means: Vec<f64>,
    pub scales: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(columns: &[NumericColumn]) -> Self {
        let mut means = Vec::with_capacity(columns.len());
        let mut scales = Vec::with_capacity(columns.len());

        for column in columns {
            let n = column.values.len().max(1) as f64;
            let mean = column.values.iter().sum::<f64>() / n;
            let var = column
                .values
                .iter()
                .map(|x| (x - mean).powi(2))
                .sum::<f64>()
                / n;
            // Constant columns pass through centred but unscaled.
            let scale = if var > 0.0 { var.sqrt() } else { 1.0 };
            means.push(mean);
            scales.push(scale);
        }

        Self {
            columns: columns.iter().map(|c| c.name.clone()).collect(),
            means,
            scales,
        }
    }

    pub fn transform(&self, column_index: usize, value: f64) -> f64 {
        (value - self.means[column_index]) / self.scales[column_index]
    }
}

/// Category list for one column. The first (alphabetically smallest) category
/// is the dropped reference and encodes as all zeros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTable {
    pub column: String,
    pub categories: Vec<String>,
}

impl CategoryTable {
    fn fit(column: &CategoricalColumn) -> Self {
        let mut categories = column.values.clone();
        categories.sort();
        categories.dedup();
        Self {
            column: column.name.clone(),
            categories,
        }
    }

    /// Encoded width: one slot per category except the dropped first one.
    pub fn width(&self) -> usize {
        self.categories.len().saturating_sub(1)
    }

    /// Slot set to 1.0 for `value`. `None` for the dropped category and for
    /// categories never seen during fitting.
    pub fn slot(&self, value: &str) -> Option<usize> {
        match self.categories.binary_search_by(|c| c.as_str().cmp(value)) {
            Ok(0) | Err(_) => None,
            Ok(index) => Some(index - 1),
        }
    }

    pub fn feature_names(&self) -> impl Iterator<Item = String> + '_ {
        self.categories
            .iter()
            .skip(1)
            .map(move |category| format!("{}_{}", self.column, category))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    pub tables: Vec<CategoryTable>,
}

impl OneHotEncoder {
    pub fn fit(columns: &[CategoricalColumn]) -> Self {
        Self {
            tables: columns.iter().map(CategoryTable::fit).collect(),
        }
    }

    pub fn width(&self) -> usize {
        self.tables.iter().map(CategoryTable::width).sum()
    }
}

/// Scaler for the numerical group followed by the encoder for the categorical
/// group; the output matrix lays the groups out in that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preprocessor {
    pub scaler: StandardScaler,
    pub encoder: OneHotEncoder,
}

impl Preprocessor {
    pub fn fit(features: &FeatureTable) -> Self {
        let preprocessor = Self {
            scaler: StandardScaler::fit(&features.numerical),
            encoder: OneHotEncoder::fit(&features.categorical),
        };
        debug!(
            numerical = preprocessor.scaler.columns.len(),
            encoded = preprocessor.encoder.width(),
            "Preprocessor fitted"
        );
        preprocessor
    }

    pub fn numerical_columns(&self) -> &[String] {
        &self.scaler.columns
    }

    pub fn categorical_columns(&self) -> Vec<String> {
        self.encoder.tables.iter().map(|t| t.column.clone()).collect()
    }

    pub fn n_features_out(&self) -> usize {
        self.scaler.columns.len() + self.encoder.width()
    }

    /// Numerical names unchanged, then `<column>_<category>` per encoded slot.
    pub fn feature_names(&self) -> Vec<String> {
        self.scaler
            .columns
            .iter()
            .cloned()
            .chain(self.encoder.tables.iter().flat_map(|table| table.feature_names()))
            .collect()
    }

    /// Columns of `features` are matched by position to the fitted ones; build
    /// the table with [`FeatureTable::select`] using this preprocessor's column
    /// names.
    pub fn transform(&self, features: &FeatureTable) -> Array2<f64> {
        let mut out = Array2::zeros((features.height(), self.n_features_out()));

        for (index, column) in features.numerical.iter().enumerate() {
            for (row, &value) in column.values.iter().enumerate() {
                out[[row, index]] = self.scaler.transform(index, value);
            }
        }

        let mut offset = self.scaler.columns.len();
        for (table, column) in self.encoder.tables.iter().zip(&features.categorical) {
            for (row, value) in column.values.iter().enumerate() {
                if let Some(slot) = table.slot(value) {
                    out[[row, offset + slot]] = 1.0;
                }
            }
            offset += table.width();
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn table() -> FeatureTable {
        let df = df!(
            "age" => [18i64, 20, 22, 24],
            "sleep_hours" => [7.0, 7.0, 7.0, 7.0],
            "gender" => ["Male", "Female", "Other", "Female"],
            "diet_quality" => ["Good", "Poor", "Fair", "Good"]
        )
        .unwrap();
        FeatureTable::from_frame(&df).unwrap()
    }

    #[test]
    fn test_scaler_uses_population_statistics() {
        let scaler = StandardScaler::fit(&table().numerical);
        assert_eq!(scaler.means, vec![21.0, 7.0]);
        assert!((scaler.scales[0] - 5.0f64.sqrt()).abs() < 1e-12);
        assert_eq!(scaler.scales[1], 1.0);
        assert_eq!(scaler.transform(1, 7.0), 0.0);
    }

    #[test]
    fn test_feature_names_drop_first_category() {
        let preprocessor = Preprocessor::fit(&table());
        assert_eq!(
            preprocessor.feature_names(),
            [
                "age",
                "sleep_hours",
                "gender_Male",
                "gender_Other",
                "diet_quality_Good",
                "diet_quality_Poor",
            ]
        );
        assert_eq!(preprocessor.n_features_out(), 6);
    }

    #[test]
    fn test_transform_layout() {
        let features = table();
        let preprocessor = Preprocessor::fit(&features);
        let x = preprocessor.transform(&features);

        assert_eq!(x.dim(), (4, 6));
        let column_mean = x.column(0).sum() / 4.0;
        assert!(column_mean.abs() < 1e-12);
        // Female / Poor
        assert_eq!(x.row(1).to_vec()[2..], [0.0, 0.0, 0.0, 1.0]);
        // Male / Good
        assert_eq!(x.row(0).to_vec()[2..], [1.0, 0.0, 1.0, 0.0]);
        // Other / Fair: Fair is the dropped reference
        assert_eq!(x.row(2).to_vec()[2..], [0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_unseen_category_encodes_as_zeros() {
        let preprocessor = Preprocessor::fit(&table());
        let df = df!(
            "age" => [21i64],
            "sleep_hours" => [7.0],
            "gender" => ["Unknown"],
            "diet_quality" => ["Excellent"]
        )
        .unwrap();
        let features = FeatureTable::select(
            &df,
            preprocessor.numerical_columns(),
            &preprocessor.categorical_columns(),
        )
        .unwrap();

        let x = preprocessor.transform(&features);
        assert_eq!(x.row(0).to_vec(), vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_single_category_column_has_no_width() {
        let table = CategoryTable {
            column: "part_time_job".to_string(),
            categories: vec!["No".to_string()],
        };
        assert_eq!(table.width(), 0);
        assert_eq!(table.slot("No"), None);
        assert_eq!(table.feature_names().count(), 0);
    }
}
