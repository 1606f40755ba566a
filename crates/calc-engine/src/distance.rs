//! Distance calculator pricing and the routing service contract.
//!
//! The routing service measures the route and prices it with the same
//! formula as [`quote`]. Its response can be replayed locally with
//! [`cross_check`] to make sure the preview shows exactly what the service
//! charged.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use calc_model::{DistanceParams, VehicleClass};

use crate::error::{EngineError, Result};

/// Line items of a distance quote, each exactly as used in the total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceQuote {
    pub one_way_km: f64,
    /// Kilometres charged: doubled for a round trip.
    pub effective_km: f64,
    pub coefficient: f64,
    pub base: f64,
    pub km: f64,
    pub load: f64,
    pub total: f64,
}

/// Prices a measured one-way distance.
///
/// Loading and unloading are charged once even for a round trip.
pub fn quote(
    params: &DistanceParams,
    distance_km: f64,
    vehicle: VehicleClass,
    round_trip: bool,
) -> Result<DistanceQuote> {
    if !distance_km.is_finite() || distance_km < 0.0 {
        return Err(EngineError::InvalidDistance(distance_km));
    }
    let coefficient = params.coefficient(vehicle)?;
    let effective_km = if round_trip {
        distance_km * 2.0
    } else {
        distance_km
    };
    let km = effective_km * params.price_per_km * coefficient;
    let load = params.load_sum();
    let total = params.base_price + km + load;
    debug!(%vehicle, round_trip, effective_km, total, "distance quote");
    Ok(DistanceQuote {
        one_way_km: distance_km,
        effective_km,
        coefficient,
        base: params.base_price,
        km,
        load,
        total,
    })
}

/// [`quote`] for a raw vehicle class key.
pub fn quote_for(
    params: &DistanceParams,
    distance_km: f64,
    vehicle: &str,
    round_trip: bool,
) -> Result<DistanceQuote> {
    let vehicle: VehicleClass = vehicle.parse()?;
    quote(params, distance_km, vehicle, round_trip)
}

/// Tariff line shown before any route is measured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TariffSummary {
    pub base: f64,
    pub price_per_km: f64,
    pub load: f64,
}

pub fn tariff_summary(params: &DistanceParams) -> TariffSummary {
    TariffSummary {
        base: params.base_price,
        price_per_km: params.price_per_km,
        load: params.load_sum(),
    }
}

/// Request sent to the routing service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    pub from: String,
    pub to: String,
    pub vehicle: VehicleClass,
    pub round_trip: bool,
    /// Calculator whose usage counter the service increments. Empty for
    /// operator previews.
    #[serde(default)]
    pub calculator_id: String,
}

impl RouteRequest {
    /// Builds a request; both addresses must be non-blank.
    pub fn new(
        from: &str,
        to: &str,
        vehicle: VehicleClass,
        round_trip: bool,
        calculator_id: impl Into<String>,
    ) -> Result<Self> {
        let from = from.trim();
        let to = to.trim();
        if from.is_empty() {
            return Err(EngineError::MissingRouteEndpoint("from"));
        }
        if to.is_empty() {
            return Err(EngineError::MissingRouteEndpoint("to"));
        }
        Ok(Self {
            from: from.to_string(),
            to: to.to_string(),
            vehicle,
            round_trip,
            calculator_id: calculator_id.into(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    pub lat: f64,
    pub lon: f64,
}

/// Response of the routing service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResponse {
    pub distance_one_way_km: f64,
    pub distance_total_km: f64,
    pub price_base: f64,
    pub price_km: f64,
    pub price_load: f64,
    pub price_total: f64,
    #[serde(default)]
    pub route: Vec<RoutePoint>,
}

/// A line item where the service and the local formula disagree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuoteMismatch {
    pub field: &'static str,
    pub local: f64,
    pub remote: f64,
}

/// Outcome of replaying a service response with the local formula.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteCheck {
    pub local: DistanceQuote,
    pub mismatches: Vec<QuoteMismatch>,
}

impl QuoteCheck {
    pub fn is_consistent(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Recomputes a service response from its one-way distance.
pub fn cross_check(
    params: &DistanceParams,
    vehicle: VehicleClass,
    round_trip: bool,
    response: &RouteResponse,
) -> Result<QuoteCheck> {
    let local = quote(params, response.distance_one_way_km, vehicle, round_trip)?;
    let pairs = [
        ("distanceTotalKm", local.effective_km, response.distance_total_km),
        ("priceBase", local.base, response.price_base),
        ("priceKm", local.km, response.price_km),
        ("priceLoad", local.load, response.price_load),
        ("priceTotal", local.total, response.price_total),
    ];
    let mismatches: Vec<QuoteMismatch> = pairs
        .into_iter()
        .filter(|(_, local, remote)| !same_amount(*local, *remote))
        .map(|(field, local, remote)| QuoteMismatch {
            field,
            local,
            remote,
        })
        .collect();
    if !mismatches.is_empty() {
        warn!(count = mismatches.len(), "route response disagrees with local tariff");
    }
    Ok(QuoteCheck { local, mismatches })
}

/// Equal up to float noise from JSON transport.
fn same_amount(local: f64, remote: f64) -> bool {
    let scale = local.abs().max(remote.abs()).max(1.0);
    (local - remote).abs() <= scale * 1e-9
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn tariff() -> DistanceParams {
        DistanceParams {
            base_price: 1500.0,
            price_per_km: 45.0,
            loading_price: 200.0,
            unloading_price: 200.0,
            ..DistanceParams::default()
        }
    }

    #[test]
    fn round_trip_medium_truck() {
        let quote = quote(&tariff(), 10.0, VehicleClass::Medium, true).unwrap();
        assert!(close(quote.effective_km, 20.0));
        assert!(close(quote.km, 1080.0));
        assert!(close(quote.load, 400.0));
        assert!(close(quote.total, 2980.0));
    }

    #[test]
    fn one_way_charges_load_once() {
        let quote = quote(&tariff(), 10.0, VehicleClass::Small, false).unwrap();
        assert!(close(quote.effective_km, 10.0));
        assert!(close(quote.km, 450.0));
        assert!(close(quote.total, 2350.0));
    }

    #[test]
    fn unknown_class_is_rejected() {
        let err = quote_for(&tariff(), 10.0, "bicycle", false).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Model(calc_model::ModelError::UnknownVehicleClass(_))
        ));
    }

    #[test]
    fn negative_distance_is_rejected() {
        assert!(matches!(
            quote(&tariff(), -1.0, VehicleClass::Small, false),
            Err(EngineError::InvalidDistance(_))
        ));
        assert!(quote(&tariff(), f64::INFINITY, VehicleClass::Small, false).is_err());
    }

    #[test]
    fn route_request_requires_both_addresses() {
        assert!(matches!(
            RouteRequest::new("  ", "Tver", VehicleClass::Small, false, ""),
            Err(EngineError::MissingRouteEndpoint("from"))
        ));
        assert!(matches!(
            RouteRequest::new("Moscow", "", VehicleClass::Small, false, ""),
            Err(EngineError::MissingRouteEndpoint("to"))
        ));
        let request =
            RouteRequest::new(" Moscow ", "Tver", VehicleClass::Large, true, "calc_2").unwrap();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["from"], "Moscow");
        assert_eq!(json["vehicle"], "large");
        assert_eq!(json["roundTrip"], true);
        assert_eq!(json["calculatorId"], "calc_2");
    }

    #[test]
    fn cross_check_reports_each_line() {
        let response = RouteResponse {
            distance_one_way_km: 10.0,
            distance_total_km: 20.0,
            price_base: 1500.0,
            price_km: 1080.0,
            price_load: 400.0,
            price_total: 2980.0,
            route: vec![],
        };
        let check = cross_check(&tariff(), VehicleClass::Medium, true, &response).unwrap();
        assert!(check.is_consistent());

        let stale = RouteResponse {
            price_km: 900.0,
            price_total: 2800.0,
            ..response
        };
        let check = cross_check(&tariff(), VehicleClass::Medium, true, &stale).unwrap();
        let fields: Vec<&str> = check.mismatches.iter().map(|m| m.field).collect();
        assert_eq!(fields, vec!["priceKm", "priceTotal"]);
    }
}
