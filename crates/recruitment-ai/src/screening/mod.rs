//! Candidate screening: closed-domain encoding, feature assembly, and classifier verdicts.

pub mod encoding;
pub mod features;
pub mod loader;
pub mod model;
pub mod profile;
pub mod router;
pub mod session;
pub mod views;

pub use encoding::{
    encode, Categorical, CategoricalField, City, CompanySize, CompanyType, EducationLevel,
    EncodingError, EnrolledUniversity, Gender, MajorDiscipline, RelevantExperience,
};
pub use features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use loader::{load_artifact, ClassifierCache, ClassifierStatus, ModelUnavailable};
pub use model::{ArtifactError, Classifier, ModelArtifact, PredictionError};
pub use profile::{CandidateProfile, ProfileError};
pub use router::screening_router;
pub use session::{InferenceSession, ScreeningOutcome, SessionError, Verdict};
