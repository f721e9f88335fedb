use serde::Deserialize;
use ts_rs::TS;

use super::entities::GradeType;

fn default_max_value() -> f64 {
    20.0
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct CreateGradeRequest {
    pub student_id: i64,
    pub subject_id: i64,
    pub class_id: i64,
    pub term_id: i64,
    pub value: f64,
    #[serde(default = "default_max_value")]
    pub max_value: f64,
    pub grade_type: GradeType,
    pub description: Option<String>,
}

impl CreateGradeRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_grade_value(self.value, self.max_value)
    }
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct UpdateGradeRequest {
    pub value: Option<f64>,
    pub max_value: Option<f64>,
    pub grade_type: Option<GradeType>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeListQuery {
    pub class_id: Option<i64>,
    pub student_id: Option<i64>,
    pub term_id: Option<i64>,
    pub subject_id: Option<i64>,
    #[serde(skip)]
    #[ts(skip)]
    pub published_only: bool,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct PublishGradesRequest {
    pub class_id: i64,
    pub term_id: i64,
}

/// 分值必须在 `[0, max_value]` 且满分为正
pub fn validate_grade_value(value: f64, max_value: f64) -> Result<(), &'static str> {
    if !max_value.is_finite() || max_value <= 0.0 {
        return Err("max_value must be greater than 0");
    }
    if !value.is_finite() || value < 0.0 || value > max_value {
        return Err("Grade value must be between 0 and max_value");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_bounds() {
        assert!(validate_grade_value(0.0, 20.0).is_ok());
        assert!(validate_grade_value(20.0, 20.0).is_ok());
        assert!(validate_grade_value(20.5, 20.0).is_err());
        assert!(validate_grade_value(-1.0, 20.0).is_err());
        assert!(validate_grade_value(5.0, 0.0).is_err());
        assert!(validate_grade_value(f64::NAN, 20.0).is_err());
    }
}
