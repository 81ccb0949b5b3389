use metrics_exporter_prometheus::PrometheusHandle;
use recruitment_ai::screening::CategoricalField;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_field(raw: &str) -> Result<CategoricalField, String> {
    CategoricalField::from_name(raw).ok_or_else(|| {
        let known: Vec<&str> = CategoricalField::ordered()
            .into_iter()
            .map(CategoricalField::name)
            .collect();
        format!(
            "unknown categorical field '{raw}' (expected one of: {})",
            known.join(", ")
        )
    })
}
