use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::encoding::{
    City, CompanySize, CompanyType, EducationLevel, EnrolledUniversity, Gender, MajorDiscipline,
    RelevantExperience,
};

pub const CITY_DEVELOPMENT_INDEX: RangeInclusive<f64> = 0.0..=1.0;
pub const EXPERIENCE_YEARS: RangeInclusive<u8> = 0..=20;
pub const LAST_NEW_JOB_YEARS: RangeInclusive<u8> = 0..=5;
pub const TRAINING_HOURS: RangeInclusive<u16> = 0..=300;

/// Candidate attributes captured by a single form submission. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub city: City,
    pub city_development_index: f64,
    pub gender: Gender,
    #[serde(rename = "relevent_experience", alias = "relevant_experience")]
    pub relevant_experience: RelevantExperience,
    pub enrolled_university: EnrolledUniversity,
    pub education_level: EducationLevel,
    pub major_discipline: MajorDiscipline,
    /// Years of work experience.
    pub experience: u8,
    pub company_size: CompanySize,
    pub company_type: CompanyType,
    /// Years since the candidate last changed jobs.
    pub last_new_job: u8,
    pub training_hours: u16,
}

impl Default for CandidateProfile {
    fn default() -> Self {
        Self {
            city: City::City1,
            city_development_index: 0.5,
            gender: Gender::Male,
            relevant_experience: RelevantExperience::Has,
            enrolled_university: EnrolledUniversity::NoEnrollment,
            education_level: EducationLevel::Graduate,
            major_discipline: MajorDiscipline::Stem,
            experience: 2,
            company_size: CompanySize::Unknown,
            company_type: CompanyType::Unknown,
            last_new_job: 1,
            training_hours: 50,
        }
    }
}

impl CandidateProfile {
    /// Check the numeric inputs against the bounds the form enforces.
    pub fn validate(&self) -> Result<(), ProfileError> {
        let index = self.city_development_index;
        if !index.is_finite() || !CITY_DEVELOPMENT_INDEX.contains(&index) {
            return Err(ProfileError::OutOfRange {
                field: "city_development_index",
                value: index.to_string(),
                min: CITY_DEVELOPMENT_INDEX.start().to_string(),
                max: CITY_DEVELOPMENT_INDEX.end().to_string(),
            });
        }

        check_bounds("experience", self.experience, &EXPERIENCE_YEARS)?;
        check_bounds("last_new_job", self.last_new_job, &LAST_NEW_JOB_YEARS)?;
        check_bounds("training_hours", self.training_hours, &TRAINING_HOURS)?;
        Ok(())
    }
}

fn check_bounds<T>(
    field: &'static str,
    value: T,
    range: &RangeInclusive<T>,
) -> Result<(), ProfileError>
where
    T: PartialOrd + ToString,
{
    if range.contains(&value) {
        return Ok(());
    }

    Err(ProfileError::OutOfRange {
        field,
        value: value.to_string(),
        min: range.start().to_string(),
        max: range.end().to_string(),
    })
}

/// Numeric input outside the range the form allows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("{field} must be between {min} and {max} (found {value})")]
    OutOfRange {
        field: &'static str,
        value: String,
        min: String,
        max: String,
    },
}
