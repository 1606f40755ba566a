//! Editing session for a distance calculator.
//!
//! Tariff edits refresh the tariff line and, once a route has been measured,
//! re-price that route locally. Route measurements come from the routing
//! service through a request ticket; late answers to superseded requests are
//! dropped.

use tracing::{debug, info, warn};

use calc_engine::{
    DistanceQuote, QuoteCheck, RoutePoint, RouteRequest, RouteResponse, TariffSummary,
    cross_check, quote, tariff_summary,
};
use calc_model::{DistanceParams, VehicleClass};

use crate::context::SessionContext;
use crate::dirty::DirtyTracker;
use crate::error::{Result, SessionError};
use crate::event::DistanceEvent;
use crate::requests::{Completion, RequestKind, RequestTicket, RequestTracker};

/// A measured job: one-way distance and how it is driven.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub distance_km: f64,
    pub vehicle: VehicleClass,
    pub round_trip: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DistancePreview {
    pub tariff: TariffSummary,
    pub measurement: Option<Measurement>,
    /// Local quote for the measurement under the current tariff.
    pub quote: Option<DistanceQuote>,
    pub route: Vec<RoutePoint>,
    /// Comparison with the service's own pricing. Cleared by tariff edits,
    /// since the service prices with the stored tariff.
    pub check: Option<QuoteCheck>,
}

#[derive(Debug)]
pub struct DistanceSession {
    context: SessionContext,
    params: DistanceParams,
    measurement: Option<Measurement>,
    route: Vec<RoutePoint>,
    check: Option<QuoteCheck>,
    pending_route: Option<RouteRequest>,
    preview: DistancePreview,
    dirty: DirtyTracker,
    requests: RequestTracker,
}

impl DistanceSession {
    pub fn new(context: SessionContext, params: DistanceParams) -> Self {
        let preview = DistancePreview {
            tariff: tariff_summary(&params),
            measurement: None,
            quote: None,
            route: Vec::new(),
            check: None,
        };
        Self {
            context,
            params,
            measurement: None,
            route: Vec::new(),
            check: None,
            pending_route: None,
            preview,
            dirty: DirtyTracker::new(),
            requests: RequestTracker::new(),
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn params(&self) -> &DistanceParams {
        &self.params
    }

    pub fn preview(&self) -> &DistancePreview {
        &self.preview
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.is_dirty()
    }

    /// Applies a tariff edit and returns the refreshed preview.
    pub fn apply(&mut self, event: DistanceEvent) -> Result<&DistancePreview> {
        let name = event.name();
        let mut params = self.params.clone();
        match event {
            DistanceEvent::BasePriceChanged(value) => {
                params.base_price = checked_amount("basePrice", value)?;
            }
            DistanceEvent::PricePerKmChanged(value) => {
                params.price_per_km = checked_amount("pricePerKm", value)?;
            }
            DistanceEvent::LoadingPriceChanged(value) => {
                params.loading_price = checked_amount("loadingPrice", value)?;
            }
            DistanceEvent::UnloadingPriceChanged(value) => {
                params.unloading_price = checked_amount("unloadingPrice", value)?;
            }
            DistanceEvent::CoefficientChanged { vehicle, value } => {
                params.vehicle_coefficients.set(vehicle, value);
                if let Err(error) = params.coefficient(vehicle) {
                    warn!(calculator = self.context.label(), event = name, %error, "edit rejected");
                    return Err(error.into());
                }
            }
        }
        // A new tariff invalidates any comparison with the service's pricing.
        let tariff_changed = params != self.params;
        self.params = params;
        if tariff_changed {
            self.dirty.mark_dirty();
            self.check = None;
        }
        debug!(calculator = self.context.label(), event = name, "tariff edit applied");
        self.recompute()?;
        Ok(&self.preview)
    }

    /// Uses a distance measured elsewhere, without a routing round trip.
    pub fn set_measurement(&mut self, measurement: Measurement) -> Result<&DistancePreview> {
        quote(
            &self.params,
            measurement.distance_km,
            measurement.vehicle,
            measurement.round_trip,
        )?;
        self.measurement = Some(measurement);
        self.route.clear();
        self.check = None;
        self.requests.cancel(RequestKind::Price);
        self.pending_route = None;
        self.recompute()?;
        Ok(&self.preview)
    }

    /// Clears the measured route, as the preview's reset button does.
    pub fn reset_route(&mut self) -> &DistancePreview {
        self.measurement = None;
        self.route.clear();
        self.check = None;
        self.requests.cancel(RequestKind::Price);
        self.pending_route = None;
        self.preview = self.snapshot(None);
        &self.preview
    }

    fn recompute(&mut self) -> Result<()> {
        let quote = match self.measurement {
            Some(m) => Some(quote(&self.params, m.distance_km, m.vehicle, m.round_trip)?),
            None => None,
        };
        self.preview = self.snapshot(quote);
        Ok(())
    }

    fn snapshot(&self, quote: Option<DistanceQuote>) -> DistancePreview {
        DistancePreview {
            tariff: tariff_summary(&self.params),
            measurement: self.measurement,
            quote,
            route: self.route.clone(),
            check: self.check.clone(),
        }
    }

    /// Builds the routing request for a preview calculation.
    pub fn request_route(
        &mut self,
        from: &str,
        to: &str,
        vehicle: VehicleClass,
        round_trip: bool,
    ) -> Result<(RequestTicket, RouteRequest)> {
        let calculator_id = self.context.calculator_id.clone().unwrap_or_default();
        let request = RouteRequest::new(from, to, vehicle, round_trip, calculator_id)?;
        // Reject a tariff the local formula cannot price before asking.
        self.params.coefficient(vehicle)?;
        let ticket = self.requests.begin(RequestKind::Price);
        debug!(calculator = self.context.label(), seq = ticket.seq(), %vehicle, "route requested");
        self.pending_route = Some(request.clone());
        Ok((ticket, request))
    }

    /// Applies a routing answer unless a newer request superseded it.
    pub fn complete_route(
        &mut self,
        ticket: RequestTicket,
        response: RouteResponse,
    ) -> Result<Completion> {
        if !self.requests.finish(ticket) {
            warn!(calculator = self.context.label(), seq = ticket.seq(), "discarding stale route");
            return Ok(Completion::Discarded);
        }
        let Some(request) = self.pending_route.take() else {
            return Ok(Completion::Discarded);
        };
        let check = cross_check(&self.params, request.vehicle, request.round_trip, &response)?;
        info!(
            calculator = self.context.label(),
            distance_km = response.distance_one_way_km,
            total = response.price_total,
            consistent = check.is_consistent(),
            "route priced"
        );
        self.measurement = Some(Measurement {
            distance_km: response.distance_one_way_km,
            vehicle: request.vehicle,
            round_trip: request.round_trip,
        });
        self.route = response.route;
        self.check = Some(check);
        self.recompute()?;
        Ok(Completion::Applied)
    }

    /// Records a failed routing call; the previous result is hidden.
    pub fn fail_route(&mut self, ticket: RequestTicket) -> Completion {
        if !self.requests.finish(ticket) {
            return Completion::Discarded;
        }
        self.pending_route = None;
        self.reset_route();
        Completion::Applied
    }

    pub fn save_payload(&self) -> Result<String> {
        Ok(self.params.to_json_pretty()?)
    }

    pub fn begin_load(&mut self) -> RequestTicket {
        self.requests.begin(RequestKind::Load)
    }

    pub fn complete_load(&mut self, ticket: RequestTicket, json: &str) -> Result<Completion> {
        if !self.requests.finish(ticket) {
            warn!(calculator = self.context.label(), seq = ticket.seq(), "discarding stale load");
            return Ok(Completion::Discarded);
        }
        self.params = DistanceParams::from_json(json)?;
        self.check = None;
        self.dirty.mark_clean();
        info!(calculator = self.context.label(), "tariff loaded");
        if let Err(error) = self.recompute() {
            // The stored tariff cannot price the current measurement.
            self.reset_route();
            return Err(error);
        }
        Ok(Completion::Applied)
    }

    pub fn begin_save(&mut self) -> Result<(RequestTicket, String)> {
        let payload = self.save_payload()?;
        let ticket = self.requests.begin(RequestKind::Save);
        self.dirty.start_save();
        Ok((ticket, payload))
    }

    pub fn complete_save(&mut self, ticket: RequestTicket) -> Completion {
        if !self.requests.finish(ticket) {
            return Completion::Discarded;
        }
        self.dirty.save_complete();
        info!(calculator = self.context.label(), "tariff saved");
        Completion::Applied
    }

    pub fn fail_save(&mut self, ticket: RequestTicket) -> Completion {
        if !self.requests.finish(ticket) {
            return Completion::Discarded;
        }
        self.dirty.save_failed();
        Completion::Applied
    }
}

fn checked_amount(field: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(SessionError::InvalidAmount { field, value });
    }
    Ok(value)
}
