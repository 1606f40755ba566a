use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::{debug, info, info_span};

use calc_engine::{
    MortgageInput, MortgageQuote, PreviewOptions, QuoteCheck, RouteResponse, SeedPolicy,
    cross_check, mortgage,
};
use calc_model::{
    ConfigModel, DistanceParams, VehicleClass, distance_starter, layered_starter,
};
use calc_session::{
    ConfigEvent, ConfiguratorSession, DistancePreview, DistanceSession, Measurement, Preview,
    SessionContext,
};

/// Preview interactions replayed on top of a stored document.
#[derive(Debug, Clone, Default)]
pub struct PreviewRequest {
    pub view: Option<String>,
    pub toggles: Vec<String>,
    pub seed_policy: SeedPolicy,
    pub show_rear: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarterKind {
    Layered,
    Distance,
}

pub fn load_config(path: &Path) -> Result<ConfigModel> {
    read_config(path).with_context(|| format!("load configuration {}", path.display()))
}

pub fn load_params(path: &Path) -> Result<DistanceParams> {
    read_json(path).with_context(|| format!("load tariff {}", path.display()))
}

pub fn load_response(path: &Path) -> Result<RouteResponse> {
    read_json(path).with_context(|| format!("load route response {}", path.display()))
}

/// Goes through [`ConfigModel::from_json`] so stored documents get the same
/// id checks as a session load.
fn read_config(path: &Path) -> Result<ConfigModel> {
    let text = fs::read_to_string(path).context("read file")?;
    Ok(ConfigModel::from_json(&text)?)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).context("read file")?;
    let value = serde_json::from_str(&text).context("parse json")?;
    Ok(value)
}

/// Calculator name shown in logs: the document's file stem.
fn context_for(path: &Path) -> SessionContext {
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    SessionContext::default().with_name(name)
}

pub fn run_preview(path: &Path, request: &PreviewRequest) -> Result<Preview> {
    let model = load_config(path)?;
    let span = info_span!("preview", config = %path.display());
    let _guard = span.enter();
    let options = PreviewOptions::new().with_seed_policy(request.seed_policy);
    let mut session = ConfiguratorSession::new(context_for(path), model, options);
    apply_preview_request(&mut session, request)?;
    Ok(session.preview().clone())
}

/// Replays the rear override, view choice and toggles, in that order.
pub fn apply_preview_request(
    session: &mut ConfiguratorSession,
    request: &PreviewRequest,
) -> Result<()> {
    if let Some(show) = request.show_rear {
        session.apply(ConfigEvent::RearViewToggled { show })?;
    }
    if let Some(key) = &request.view {
        session
            .apply(ConfigEvent::ViewSelected { key: key.clone() })
            .with_context(|| format!("select view `{key}`"))?;
    }
    for id in &request.toggles {
        session
            .apply(ConfigEvent::OptionToggled { id: id.clone() })
            .with_context(|| format!("toggle option `{id}`"))?;
    }
    debug!(toggles = request.toggles.len(), "preview request replayed");
    Ok(())
}

pub fn run_quote(
    path: &Path,
    distance_km: f64,
    vehicle: VehicleClass,
    round_trip: bool,
) -> Result<DistancePreview> {
    let params = load_params(path)?;
    let mut session = DistanceSession::new(context_for(path), params);
    let preview = session
        .set_measurement(Measurement {
            distance_km,
            vehicle,
            round_trip,
        })
        .context("price distance")?;
    Ok(preview.clone())
}

pub fn run_verify(
    params_path: &Path,
    response_path: &Path,
    vehicle: VehicleClass,
    round_trip: bool,
) -> Result<QuoteCheck> {
    let params = load_params(params_path)?;
    let response = load_response(response_path)?;
    let check = cross_check(&params, vehicle, round_trip, &response)
        .context("replay route response")?;
    info!(
        consistent = check.is_consistent(),
        mismatches = check.mismatches.len(),
        "route response verified"
    );
    Ok(check)
}

pub fn run_mortgage(amount: f64, rate: f64, years: u32) -> Result<MortgageQuote> {
    let quote = mortgage(MortgageInput {
        amount,
        rate,
        years,
    })
    .context("compute mortgage")?;
    Ok(quote)
}

pub fn starter_json(kind: StarterKind) -> Result<String> {
    let json = match kind {
        StarterKind::Layered => layered_starter().to_json_pretty()?,
        StarterKind::Distance => distance_starter().to_json_pretty()?,
    };
    Ok(json)
}
