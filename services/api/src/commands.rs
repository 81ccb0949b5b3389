use clap::Args;
use recruitment_ai::config::{AppConfig, ModelConfig};
use recruitment_ai::error::AppError;
use recruitment_ai::screening::router::PredictionView;
use recruitment_ai::screening::{
    encode, CandidateProfile, CategoricalField, ClassifierCache, FeatureVector, InferenceSession,
    ScreeningOutcome, SessionError,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    /// Candidate profile JSON file
    #[arg(long)]
    pub(crate) profile: PathBuf,
    /// Model artifact (defaults to APP_MODEL_PATH or the bundled path)
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
    /// Emit the prediction as JSON instead of a text summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct EncodeArgs {
    /// Candidate profile JSON file to turn into a feature vector
    #[arg(long, conflicts_with_all = ["field", "value"], required_unless_present = "field")]
    pub(crate) profile: Option<PathBuf>,
    /// Categorical field name (e.g. company_size)
    #[arg(long, value_parser = crate::infra::parse_field, requires = "value")]
    pub(crate) field: Option<CategoricalField>,
    /// Label to look up in the field's code table
    #[arg(long, requires = "field")]
    pub(crate) value: Option<String>,
}

pub(crate) fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let PredictArgs {
        profile,
        model,
        json,
    } = args;

    let model = match model {
        Some(path) => ModelConfig::new(path)?,
        None => AppConfig::load()?.model,
    };
    let profile = read_profile(&profile)?;

    let session = InferenceSession::new(Arc::new(ClassifierCache::from_path(model.path.clone())));
    let outcome = session.submit(&profile)?;

    if json {
        let view = PredictionView::from(outcome);
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        render_outcome(&model.path, &outcome);
    }

    Ok(())
}

pub(crate) fn run_encode(args: EncodeArgs) -> Result<(), AppError> {
    let EncodeArgs {
        profile,
        field,
        value,
    } = args;

    if let (Some(field), Some(value)) = (field, value) {
        let code = encode(field, &value)?;
        println!("{field} '{value}' -> {code}");
        return Ok(());
    }

    if let Some(path) = profile {
        let profile = read_profile(&path)?;
        profile.validate().map_err(SessionError::from)?;
        render_vector(&FeatureVector::from_profile(&profile));
    }

    Ok(())
}

pub(crate) fn read_profile(path: &Path) -> Result<CandidateProfile, AppError> {
    let raw = fs::read_to_string(path)?;
    let profile = serde_json::from_str(&raw)?;
    Ok(profile)
}

fn render_outcome(model_path: &Path, outcome: &ScreeningOutcome) {
    println!("Candidate recruitment prediction");
    println!("Model: {}", model_path.display());
    render_vector(&outcome.features);
    println!(
        "\nVerdict: {} ({})",
        outcome.verdict.message(),
        outcome.verdict.label()
    );
    println!("Evaluated at {}", outcome.evaluated_at.to_rfc3339());
}

fn render_vector(features: &FeatureVector) {
    println!("\nFeature vector");
    for (index, (name, value)) in features.named().enumerate() {
        println!("- [{index:>2}] {name}: {value}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SCENARIO_PROFILE: &str = r#"{
        "city": "city_2",
        "city_development_index": 0.5,
        "gender": "Male",
        "relevent_experience": "Has",
        "enrolled_university": "no_enrollment",
        "education_level": "Graduate",
        "major_discipline": "STEM",
        "experience": 2,
        "company_size": "Unknown",
        "company_type": "Unknown",
        "last_new_job": 1,
        "training_hours": 50
    }"#;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    fn read_profile_parses_aliases() {
        let file = write_temp(SCENARIO_PROFILE);
        let profile = read_profile(file.path()).expect("profile parses");
        assert_eq!(
            FeatureVector::from_profile(&profile).as_slice(),
            &[1.0, 0.5, 1.0, 1.0, 0.0, 1.0, 5.0, 2.0, 8.0, 0.0, 1.0, 50.0]
        );
    }

    #[test]
    fn read_profile_rejects_unknown_labels() {
        let file = write_temp(&SCENARIO_PROFILE.replace("city_2", "city_7"));
        assert!(matches!(read_profile(file.path()), Err(AppError::Json(_))));
    }

    #[test]
    fn predict_reports_missing_model() {
        let profile = write_temp(SCENARIO_PROFILE);
        let dir = tempfile::tempdir().expect("tempdir");
        let args = PredictArgs {
            profile: profile.path().to_path_buf(),
            model: Some(dir.path().join("missing.json")),
            json: false,
        };

        let err = run_predict(args).expect_err("model is missing");
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn encode_rejects_labels_outside_the_table() {
        let args = EncodeArgs {
            profile: None,
            field: Some(CategoricalField::CompanyType),
            value: Some("Conglomerate".to_string()),
        };
        assert!(matches!(run_encode(args), Err(AppError::Encoding(_))));
    }
}
