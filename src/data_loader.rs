use polars::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use glob::glob;
use tracing::{debug, info};

use crate::error::{FrameError, TrainingError};

#[derive(Debug, Clone, PartialEq)]
pub struct NumericColumn {
    pub name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalColumn {
    pub name: String,
    pub values: Vec<String>,
}

/// Feature columns pulled out of a frame, split into numerical and categorical
/// groups.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    pub numerical: Vec<NumericColumn>,
    pub categorical: Vec<CategoricalColumn>,
    height: usize,
}

impl FeatureTable {
    /// Partitions every column of `df` by dtype: integer and floating point
    /// columns are numerical, string columns categorical. Any other dtype is
    /// rejected.
    pub fn from_frame(df: &DataFrame) -> Result<Self, FrameError> {
        let mut numerical = Vec::new();
        let mut categorical = Vec::new();

        for column in df.get_columns() {
            let name = column.name().to_string();
            let dtype = column.dtype();
            if dtype.is_numeric() {
                numerical.push(numeric_column(df, &name)?);
            } else if matches!(dtype, DataType::String) {
                categorical.push(categorical_column(df, &name)?);
            } else {
                return Err(FrameError::UnsupportedColumn {
                    column: name,
                    dtype: dtype.to_string(),
                });
            }
        }
        debug!(
            numerical = numerical.len(),
            categorical = categorical.len(),
            "Partitioned feature columns"
        );

        Ok(Self {
            numerical,
            categorical,
            height: df.height(),
        })
    }

    /// Selects named columns from `df`, casting numerical ones to `f64`.
    pub fn select(
        df: &DataFrame,
        numerical: &[String],
        categorical: &[String],
    ) -> Result<Self, FrameError> {
        Ok(Self {
            numerical: numerical
                .iter()
                .map(|name| numeric_column(df, name))
                .collect::<Result<_, _>>()?,
            categorical: categorical
                .iter()
                .map(|name| categorical_column(df, name))
                .collect::<Result<_, _>>()?,
            height: df.height(),
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.numerical.is_empty() && self.categorical.is_empty()
    }

    pub fn numerical_names(&self) -> Vec<String> {
        self.numerical.iter().map(|c| c.name.clone()).collect()
    }

    pub fn categorical_names(&self) -> Vec<String> {
        self.categorical.iter().map(|c| c.name.clone()).collect()
    }

    /// Rows at `rows`, in that order.
    pub fn take(&self, rows: &[usize]) -> Self {
        Self {
            numerical: self
                .numerical
                .iter()
                .map(|c| NumericColumn {
                    name: c.name.clone(),
                    values: rows.iter().map(|&r| c.values[r]).collect(),
                })
                .collect(),
            categorical: self
                .categorical
                .iter()
                .map(|c| CategoricalColumn {
                    name: c.name.clone(),
                    values: rows.iter().map(|&r| c.values[r].clone()).collect(),
                })
                .collect(),
            height: rows.len(),
        }
    }
}

fn lookup<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series, FrameError> {
    df.column(name)
        .map(|column| column.as_materialized_series())
        .map_err(|_| FrameError::MissingColumn(name.to_string()))
}

fn numeric_column(df: &DataFrame, name: &str) -> Result<NumericColumn, FrameError> {
    let series = lookup(df, name)?.cast(&DataType::Float64)?;
    let values: Option<Vec<f64>> = series.f64()?.into_iter().collect();
    let values = values.ok_or_else(|| FrameError::MissingValues {
        column: name.to_string(),
        count: series.null_count(),
    })?;
    Ok(NumericColumn {
        name: name.to_string(),
        values,
    })
}

fn categorical_column(df: &DataFrame, name: &str) -> Result<CategoricalColumn, FrameError> {
    let series = lookup(df, name)?;
    let values: Option<Vec<String>> = series
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect();
    let values = values.ok_or_else(|| FrameError::MissingValues {
        column: name.to_string(),
        count: series.null_count(),
    })?;
    Ok(CategoricalColumn {
        name: name.to_string(),
        values,
    })
}

/// Features plus the regression target, row-aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub features: FeatureTable,
    pub target: Vec<f64>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }

    pub fn take(&self, rows: &[usize]) -> Self {
        Self {
            features: self.features.take(rows),
            target: rows.iter().map(|&r| self.target[r]).collect(),
        }
    }

    /// Shuffles row indices with `seed` and holds out `ceil(test_size * rows)`
    /// of them. Returns `(train, test)`.
    pub fn train_test_split(&self, test_size: f64, seed: u64) -> Result<(Self, Self), TrainingError> {
        let rows = self.len();
        let test = ((rows as f64 * test_size).ceil() as usize).min(rows);
        let train = rows - test;
        if train < 2 || test < 2 {
            return Err(TrainingError::SplitTooSmall { rows, train, test });
        }

        let mut indices: Vec<usize> = (0..rows).collect();
        indices.shuffle(&mut StdRng::seed_from_u64(seed));
        let (test_rows, train_rows) = indices.split_at(test);
        debug!(train, test, seed, "Split dataset");

        Ok((self.take(train_rows), self.take(test_rows)))
    }
}

/// DataLoader reads one or more CSV files holding the student dataset
pub struct DataLoader {
    paths: Vec<PathBuf>,
    id_column: String,
    target_column: String,
}

impl DataLoader {
    /// Creates a new DataLoader from a CSV path or glob pattern
    pub fn new<P: AsRef<Path>>(
        path_pattern: P,
        id_column: &str,
        target_column: &str,
    ) -> Result<Self, TrainingError> {
        let path = path_pattern.as_ref();
        // An existing file is taken literally; brackets in its name are not a class.
        if path.is_file() {
            info!("Loading CSV file: {}", path.display());
            return Ok(Self {
                paths: vec![path.to_path_buf()],
                id_column: id_column.to_string(),
                target_column: target_column.to_string(),
            });
        }

        let pattern = path.to_string_lossy().into_owned();
        info!("Loading CSV files matching pattern: {}", pattern);

        let mut paths: Vec<PathBuf> = glob(&pattern)?.filter_map(Result::ok).collect();
        if paths.is_empty() {
            return Err(TrainingError::NoFilesMatched(pattern));
        }
        paths.sort();
        debug!(?paths, "Matched data files");

        Ok(Self {
            paths,
            id_column: id_column.to_string(),
            target_column: target_column.to_string(),
        })
    }

    /// Reads and stacks every matched file.
    pub fn load_frame(&self) -> Result<DataFrame, TrainingError> {
        let mut frames = self.paths.iter().map(|path| read_csv(path));
        let mut df = match frames.next() {
            Some(first) => first?,
            None => return Err(TrainingError::EmptyDataset),
        };
        for frame in frames {
            df.vstack_mut(&frame?)?;
        }
        debug!("DataFrame shape: {:?}", df.shape());
        Ok(df)
    }

    /// Drops the id column, separates the target and partitions the features.
    pub fn load_dataset(&self) -> Result<Dataset, TrainingError> {
        let df = self.load_frame()?;
        if df.height() == 0 {
            return Err(TrainingError::EmptyDataset);
        }

        let target = numeric_column(&df, &self.target_column)?.values;
        let features = df
            .drop(&self.id_column)
            .map_err(|_| FrameError::MissingColumn(self.id_column.clone()))?
            .drop(&self.target_column)?;

        let features = FeatureTable::from_frame(&features)?;
        if features.is_empty() {
            return Err(TrainingError::NoFeatures);
        }
        info!(
            rows = target.len(),
            numerical = ?features.numerical_names(),
            categorical = ?features.categorical_names(),
            "Dataset loaded"
        );

        Ok(Dataset { features, target })
    }
}

fn read_csv(path: &Path) -> Result<DataFrame, TrainingError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(df)
}
