//! Range and membership checks for a submitted [`StudentRecord`].
//!
//! The rules run in the record's field order and stop at the first failure, so
//! when several fields are invalid the reported one is always the earliest.

use crate::error::ValidationError;
use crate::record::{StudentRecord, EDUCATION_LEVELS, GENDERS, QUALITY_LEVELS, YES_NO};

struct Rule {
    field: &'static str,
    check: fn(&StudentRecord) -> bool,
    message: &'static str,
}

const RULES: [Rule; 14] = [
    Rule {
        field: "age",
        check: |r| within(r.age, 10, 100),
        message: "Edad fuera de rango (10-100 años).",
    },
    Rule {
        field: "gender",
        check: |r| GENDERS.contains(&r.gender.as_str()),
        message: "Género inválido.",
    },
    Rule {
        field: "study_hours_per_day",
        check: |r| within(r.study_hours_per_day, 0.0, 10.0),
        message: "Horas de estudio fuera de rango (0-10).",
    },
    Rule {
        field: "social_media_hours",
        check: |r| within(r.social_media_hours, 0.0, 10.0),
        message: "Horas en redes sociales fuera de rango (0-10).",
    },
    Rule {
        field: "netflix_hours",
        check: |r| within(r.netflix_hours, 0.0, 10.0),
        message: "Horas en Netflix fuera de rango (0-10).",
    },
    Rule {
        field: "part_time_job",
        check: |r| YES_NO.contains(&r.part_time_job.as_str()),
        message: "Valor inválido para trabajo de medio tiempo.",
    },
    Rule {
        field: "attendance_percentage",
        check: |r| within(r.attendance_percentage, 0.0, 100.0),
        message: "Porcentaje de asistencia fuera de rango (0-100%).",
    },
    Rule {
        field: "sleep_hours",
        check: |r| within(r.sleep_hours, 0.0, 12.0),
        message: "Horas de sueño fuera de rango (0-12).",
    },
    Rule {
        field: "diet_quality",
        check: |r| QUALITY_LEVELS.contains(&r.diet_quality.as_str()),
        message: "Valor inválido para calidad de dieta.",
    },
    Rule {
        field: "exercise_frequency",
        check: |r| within(r.exercise_frequency, 0, 14),
        message: "Frecuencia de ejercicio fuera de rango (0-14).",
    },
    Rule {
        field: "parental_education_level",
        check: |r| EDUCATION_LEVELS.contains(&r.parental_education_level.as_str()),
        message: "Nivel educativo de los padres inválido.",
    },
    Rule {
        field: "internet_quality",
        check: |r| QUALITY_LEVELS.contains(&r.internet_quality.as_str()),
        message: "Valor inválido para calidad del internet.",
    },
    Rule {
        field: "mental_health_rating",
        check: |r| within(r.mental_health_rating, 1, 10),
        message: "Estado de salud mental fuera de rango (1-10).",
    },
    Rule {
        field: "extracurricular_participation",
        check: |r| YES_NO.contains(&r.extracurricular_participation.as_str()),
        message: "Valor inválido para participación extracurricular.",
    },
];

// Inclusive on both ends; NaN compares false and is rejected.
fn within<T: PartialOrd>(value: T, min: T, max: T) -> bool {
    min <= value && value <= max
}

/// Checks every field of `record`, returning the first violation.
pub fn validate(record: &StudentRecord) -> Result<(), ValidationError> {
    match RULES.iter().find(|rule| !(rule.check)(record)) {
        Some(rule) => Err(ValidationError {
            field: rule.field,
            message: rule.message,
        }),
        None => Ok(()),
    }
}
