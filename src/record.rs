//! The student record submitted for prediction, and its training column layout.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Column names of the 14 features, in dataset and validation order.
pub const FEATURE_COLUMNS: [&str; 14] = [
    "age",
    "gender",
    "study_hours_per_day",
    "social_media_hours",
    "netflix_hours",
    "part_time_job",
    "attendance_percentage",
    "sleep_hours",
    "diet_quality",
    "exercise_frequency",
    "parental_education_level",
    "internet_quality",
    "mental_health_rating",
    "extracurricular_participation",
];

pub const GENDERS: [&str; 3] = ["Male", "Female", "Other"];
pub const YES_NO: [&str; 2] = ["Yes", "No"];
pub const QUALITY_LEVELS: [&str; 3] = ["Poor", "Fair", "Good"];
pub const EDUCATION_LEVELS: [&str; 4] = ["None", "Primary", "Secondary", "Higher"];

/// One student's lifestyle attributes.
///
/// Enumerated attributes stay raw strings: membership is checked by
/// [`crate::validation::validate`], not by the type system, so that an
/// out-of-set value can be reported back to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub age: i64,
    pub gender: String,
    pub study_hours_per_day: f64,
    pub social_media_hours: f64,
    pub netflix_hours: f64,
    pub part_time_job: String,
    pub attendance_percentage: f64,
    pub sleep_hours: f64,
    pub diet_quality: String,
    pub exercise_frequency: i64,
    pub parental_education_level: String,
    pub internet_quality: String,
    pub mental_health_rating: i64,
    pub extracurricular_participation: String,
}

impl Default for StudentRecord {
    /// The initial values of the prediction form.
    fn default() -> Self {
        Self {
            age: 20,
            gender: GENDERS[0].to_string(),
            study_hours_per_day: 2.0,
            social_media_hours: 2.0,
            netflix_hours: 1.0,
            part_time_job: YES_NO[0].to_string(),
            attendance_percentage: 90.0,
            sleep_hours: 7.0,
            diet_quality: QUALITY_LEVELS[0].to_string(),
            exercise_frequency: 3,
            parental_education_level: EDUCATION_LEVELS[0].to_string(),
            internet_quality: QUALITY_LEVELS[0].to_string(),
            mental_health_rating: 5,
            extracurricular_participation: YES_NO[0].to_string(),
        }
    }
}

impl StudentRecord {
    /// Single-row frame with the same column names and dtypes the trainer reads
    /// from the CSV.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        df!(
            "age" => [self.age],
            "gender" => [self.gender.as_str()],
            "study_hours_per_day" => [self.study_hours_per_day],
            "social_media_hours" => [self.social_media_hours],
            "netflix_hours" => [self.netflix_hours],
            "part_time_job" => [self.part_time_job.as_str()],
            "attendance_percentage" => [self.attendance_percentage],
            "sleep_hours" => [self.sleep_hours],
            "diet_quality" => [self.diet_quality.as_str()],
            "exercise_frequency" => [self.exercise_frequency],
            "parental_education_level" => [self.parental_education_level.as_str()],
            "internet_quality" => [self.internet_quality.as_str()],
            "mental_health_rating" => [self.mental_health_rating],
            "extracurricular_participation" => [self.extracurricular_participation.as_str()]
        )
    }

    /// Study, social media, Netflix and sleep hours, in chart order.
    pub fn activity_hours(&self) -> [f64; 4] {
        [
            self.study_hours_per_day,
            self.social_media_hours,
            self.netflix_hours,
            self.sleep_hours,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_has_feature_columns_in_order() {
        let df = StudentRecord::default().to_frame().unwrap();
        assert_eq!(df.shape(), (1, 14));
        let names: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, FEATURE_COLUMNS);
    }

    #[test]
    fn test_frame_dtypes_follow_field_types() {
        let df = StudentRecord::default().to_frame().unwrap();
        assert_eq!(df.column("age").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("sleep_hours").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("gender").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_record_reads_from_json() {
        let json = r#"{
            "age": 20, "gender": "Male", "study_hours_per_day": 2.0,
            "social_media_hours": 2.0, "netflix_hours": 1.0, "part_time_job": "No",
            "attendance_percentage": 90.0, "sleep_hours": 7.0, "diet_quality": "Good",
            "exercise_frequency": 3, "parental_education_level": "Higher",
            "internet_quality": "Good", "mental_health_rating": 5,
            "extracurricular_participation": "Yes"
        }"#;
        let record: StudentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.part_time_job, "No");
        assert_eq!(record.activity_hours(), [2.0, 2.0, 1.0, 7.0]);
    }
}
