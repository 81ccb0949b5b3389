use serde::{Deserialize, Serialize};

use super::profile::CandidateProfile;

pub const FEATURE_COUNT: usize = 12;

/// Column order the classifier was trained on.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "city",
    "city_development_index",
    "gender",
    "relevent_experience",
    "enrolled_university",
    "education_level",
    "major_discipline",
    "experience",
    "company_size",
    "company_type",
    "last_new_job",
    "training_hours",
];

/// Positionally fixed numeric encoding of a [`CandidateProfile`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn from_profile(profile: &CandidateProfile) -> Self {
        Self([
            f64::from(profile.city.code()),
            profile.city_development_index,
            f64::from(profile.gender.code()),
            f64::from(profile.relevant_experience.code()),
            f64::from(profile.enrolled_university.code()),
            f64::from(profile.education_level.code()),
            f64::from(profile.major_discipline.code()),
            f64::from(profile.experience),
            f64::from(profile.company_size.code()),
            f64::from(profile.company_type.code()),
            f64::from(profile.last_new_job),
            f64::from(profile.training_hours),
        ])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }
}

impl From<&CandidateProfile> for FeatureVector {
    fn from(profile: &CandidateProfile) -> Self {
        Self::from_profile(profile)
    }
}
