//! Integration tests for edit/preview synchronisation.

use proptest::prelude::*;

use calc_engine::{PreviewOptions, Resolver, RouteResponse, SeedPolicy, price_breakdown};
use calc_model::{
    ConfigModel, DistanceParams, Money, VehicleClass, distance_starter, layered_starter,
};
use calc_session::{
    Completion, ConfigEvent, ConfiguratorSession, DistanceEvent, DistanceSession, Measurement,
    SessionContext, SessionError,
};

fn configurator(model: ConfigModel) -> ConfiguratorSession {
    ConfiguratorSession::new(SessionContext::new("calc_1"), model, PreviewOptions::default())
}

fn distance_session() -> DistanceSession {
    let params = DistanceParams {
        loading_price: 200.0,
        unloading_price: 200.0,
        ..distance_starter()
    };
    DistanceSession::new(SessionContext::new("calc_2"), params)
}

#[test]
fn building_a_product_from_scratch() {
    let mut session = configurator(ConfigModel::new());
    assert!(session.preview().composition.is_empty_product());
    assert_eq!(session.preview().price.total, Money::ZERO);

    session
        .apply(ConfigEvent::ViewAdded { key: "front".into() })
        .unwrap();
    session
        .apply(ConfigEvent::ViewImageChanged {
            key: "front".into(),
            image: "/img/front.png".into(),
        })
        .unwrap();
    session
        .apply(ConfigEvent::BasePriceChanged {
            price: Money::new(90_000),
        })
        .unwrap();
    session.apply(ConfigEvent::OptionAdded).unwrap();
    session
        .apply(ConfigEvent::OptionRenamed {
            from: "option_1".into(),
            to: "tow_hook".into(),
        })
        .unwrap();
    session
        .apply(ConfigEvent::OptionPriceChanged {
            id: "tow_hook".into(),
            price: Money::new(3000),
        })
        .unwrap();
    session
        .apply(ConfigEvent::OptionLayerChanged {
            id: "tow_hook".into(),
            view: "front".into(),
            image: "/img/front_hook.png".into(),
        })
        .unwrap();
    let preview = session
        .apply(ConfigEvent::OptionDefaultChanged {
            id: "tow_hook".into(),
            default_selected: true,
        })
        .unwrap();

    assert_eq!(preview.active_view.as_deref(), Some("front"));
    assert_eq!(
        preview.composition.images(),
        vec!["/img/front.png", "/img/front_hook.png"]
    );
    assert_eq!(preview.price.total, Money::new(93_000));
    assert!(session.is_dirty());
}

#[test]
fn removing_an_active_option_updates_price_and_stack() {
    let mut session = configurator(layered_starter());
    assert_eq!(session.preview().price.total, Money::new(40_000));

    let preview = session
        .apply(ConfigEvent::OptionRemoved {
            id: "frame_tent".into(),
        })
        .unwrap();
    assert_eq!(preview.price.total, Money::ZERO);
    assert_eq!(preview.composition.images(), vec!["/img/trailer_front_base.png"]);
    assert!(!session.selection().is_active("frame_tent"));
}

#[test]
fn emptied_selection_is_not_reseeded() {
    let mut session = configurator(layered_starter());
    let preview = session
        .apply(ConfigEvent::OptionToggled {
            id: "frame_tent".into(),
        })
        .unwrap();
    assert_eq!(preview.price.options_total, Money::ZERO);

    // Any later edit must not bring the default back.
    let preview = session
        .apply(ConfigEvent::BaseDescriptionChanged {
            description: "Updated".into(),
        })
        .unwrap();
    assert_eq!(preview.price.options_total, Money::ZERO);
    assert_eq!(preview.description, "Updated");
}

#[test]
fn legacy_policy_reseeds_an_emptied_selection() {
    let mut session = ConfiguratorSession::new(
        SessionContext::default(),
        layered_starter(),
        PreviewOptions::new().with_seed_policy(SeedPolicy::WhenEmpty),
    );
    let preview = session
        .apply(ConfigEvent::OptionToggled {
            id: "frame_tent".into(),
        })
        .unwrap();
    assert_eq!(preview.price.options_total, Money::new(40_000));
}

#[test]
fn hiding_the_active_rear_view_falls_back_to_front() {
    let mut session = configurator(layered_starter());
    session
        .apply(ConfigEvent::ViewSelected { key: "rear".into() })
        .unwrap();
    assert_eq!(session.preview().active_view.as_deref(), Some("rear"));

    let preview = session
        .apply(ConfigEvent::RearViewToggled { show: false })
        .unwrap();
    assert_eq!(preview.active_view.as_deref(), Some("front"));
    assert_eq!(preview.visible_views, vec!["front".to_string()]);

    session
        .apply(ConfigEvent::RearViewToggled { show: true })
        .unwrap();
    assert_eq!(
        session.model().view_image("rear"),
        Some("/img/trailer_rear_base.png")
    );
}

#[test]
fn unknown_targets_are_typed_errors() {
    let mut session = configurator(layered_starter());
    let err = session
        .apply(ConfigEvent::OptionToggled { id: "ghost".into() })
        .unwrap_err();
    assert!(matches!(err, SessionError::Model(_)));
    let err = session
        .apply(ConfigEvent::ViewAdded { key: "front".into() })
        .unwrap_err();
    assert!(err.to_string().contains("already exists"));
}

#[test]
fn stale_load_is_discarded() {
    let mut session = configurator(ConfigModel::new());
    let first = session.begin_load();
    let second = session.begin_load();

    let newer = r#"{"baseViews": {"front": "/img/new.png"}, "basePrice": 10}"#;
    let older = r#"{"baseViews": {"front": "/img/old.png"}, "basePrice": 99}"#;
    assert_eq!(session.complete_load(second, newer).unwrap(), Completion::Applied);
    assert_eq!(session.complete_load(first, older).unwrap(), Completion::Discarded);

    assert_eq!(session.preview().price.total, Money::new(10));
    assert_eq!(session.preview().composition.images(), vec!["/img/new.png"]);
    assert!(!session.is_dirty());
}

#[test]
fn save_payload_contains_only_the_document() {
    let mut session = configurator(layered_starter());
    session
        .apply(ConfigEvent::OptionToggled {
            id: "spare_wheel".into(),
        })
        .unwrap();
    let (ticket, payload) = session.begin_save().unwrap();
    let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
    let mut keys: Vec<&str> = value
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec!["baseDescription", "basePrice", "baseViews", "options", "showRear"]
    );
    assert_eq!(session.complete_save(ticket), Completion::Applied);
}

#[test]
fn edits_during_a_save_stay_unsaved() {
    let mut session = configurator(layered_starter());
    session
        .apply(ConfigEvent::BasePriceChanged {
            price: Money::new(1),
        })
        .unwrap();
    let (first, _) = session.begin_save().unwrap();
    session
        .apply(ConfigEvent::BasePriceChanged {
            price: Money::new(2),
        })
        .unwrap();
    assert_eq!(session.complete_save(first), Completion::Applied);
    assert!(session.is_dirty());

    let (second, _) = session.begin_save().unwrap();
    assert_eq!(session.fail_save(second), Completion::Applied);
    assert!(session.is_dirty());
}

#[test]
fn distance_quote_example() {
    let mut session = distance_session();
    let preview = session
        .set_measurement(Measurement {
            distance_km: 10.0,
            vehicle: VehicleClass::Medium,
            round_trip: true,
        })
        .unwrap();
    let quote = preview.quote.expect("quote");
    assert!((quote.effective_km - 20.0).abs() < 1e-9);
    assert!((quote.km - 1080.0).abs() < 1e-9);
    assert!((quote.load - 400.0).abs() < 1e-9);
    assert!((quote.total - 2980.0).abs() < 1e-9);
}

#[test]
fn tariff_edits_reprice_the_measured_route() {
    let mut session = distance_session();
    session
        .set_measurement(Measurement {
            distance_km: 10.0,
            vehicle: VehicleClass::Small,
            round_trip: false,
        })
        .unwrap();
    let preview = session.apply(DistanceEvent::PricePerKmChanged(50.0)).unwrap();
    let quote = preview.quote.expect("quote");
    assert!((quote.km - 500.0).abs() < 1e-9);
    assert!((preview.tariff.price_per_km - 50.0).abs() < 1e-9);
    assert!(session.is_dirty());

    let err = session
        .apply(DistanceEvent::CoefficientChanged {
            vehicle: VehicleClass::Small,
            value: 0.0,
        })
        .unwrap_err();
    assert!(matches!(err, SessionError::Model(_)));
    assert!((session.params().vehicle_coefficients.small - 1.0).abs() < 1e-9);

    assert!(
        session
            .apply(DistanceEvent::LoadingPriceChanged(f64::NAN))
            .is_err()
    );
}

#[test]
fn route_round_trip_with_stale_answer() {
    let mut session = distance_session();
    assert!(
        session
            .request_route("", "Tver", VehicleClass::Small, false)
            .is_err()
    );

    let (old_ticket, _) = session
        .request_route("Moscow", "Klin", VehicleClass::Small, false)
        .unwrap();
    let (ticket, request) = session
        .request_route("Moscow", "Tver", VehicleClass::Medium, true)
        .unwrap();
    assert_eq!(request.calculator_id, "calc_2");

    let response = RouteResponse {
        distance_one_way_km: 10.0,
        distance_total_km: 20.0,
        price_base: 1500.0,
        price_km: 1080.0,
        price_load: 400.0,
        price_total: 2980.0,
        route: vec![],
    };
    let late = RouteResponse {
        distance_one_way_km: 85.0,
        ..response.clone()
    };
    assert_eq!(
        session.complete_route(ticket, response).unwrap(),
        Completion::Applied
    );
    assert_eq!(
        session.complete_route(old_ticket, late).unwrap(),
        Completion::Discarded
    );

    let preview = session.preview();
    assert!(preview.check.as_ref().expect("check").is_consistent());
    let measurement = preview.measurement.expect("measurement");
    assert!((measurement.distance_km - 10.0).abs() < 1e-9);
    assert!((preview.quote.expect("quote").total - 2980.0).abs() < 1e-9);

    // The service priced with the stored tariff, so an edit drops the check.
    let preview = session.apply(DistanceEvent::BasePriceChanged(1000.0)).unwrap();
    assert!(preview.check.is_none());
    assert!((preview.quote.expect("quote").total - 2480.0).abs() < 1e-9);
}

#[test]
fn failed_route_hides_the_previous_result() {
    let mut session = distance_session();
    session
        .set_measurement(Measurement {
            distance_km: 3.0,
            vehicle: VehicleClass::Large,
            round_trip: false,
        })
        .unwrap();
    let (ticket, _) = session
        .request_route("A", "B", VehicleClass::Large, false)
        .unwrap();
    assert_eq!(session.fail_route(ticket), Completion::Applied);
    assert!(session.preview().quote.is_none());
}

#[derive(Debug, Clone)]
enum Step {
    AddOption,
    RemoveFirst,
    ToggleFirst,
    SetPrice(u16),
    SetOrder(i8),
    SetDefault(bool),
    ToggleRear(bool),
    SelectRear,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::AddOption),
        Just(Step::RemoveFirst),
        Just(Step::ToggleFirst),
        any::<u16>().prop_map(Step::SetPrice),
        any::<i8>().prop_map(Step::SetOrder),
        any::<bool>().prop_map(Step::SetDefault),
        any::<bool>().prop_map(Step::ToggleRear),
        Just(Step::SelectRear),
    ]
}

fn to_event(session: &ConfiguratorSession, step: &Step) -> ConfigEvent {
    let first = session
        .model()
        .options()
        .first()
        .map(|option| option.id.clone())
        .unwrap_or_default();
    match step {
        Step::AddOption => ConfigEvent::OptionAdded,
        Step::RemoveFirst => ConfigEvent::OptionRemoved { id: first },
        Step::ToggleFirst => ConfigEvent::OptionToggled { id: first },
        Step::SetPrice(price) => ConfigEvent::OptionPriceChanged {
            id: first,
            price: Money::new(u64::from(*price)),
        },
        Step::SetOrder(order) => ConfigEvent::OptionOrderChanged {
            id: first,
            order: i64::from(*order),
        },
        Step::SetDefault(value) => ConfigEvent::OptionDefaultChanged {
            id: first,
            default_selected: *value,
        },
        Step::ToggleRear(show) => ConfigEvent::RearViewToggled { show: *show },
        Step::SelectRear => ConfigEvent::ViewSelected { key: "rear".into() },
    }
}

proptest! {
    #[test]
    fn preview_always_matches_a_fresh_computation(
        steps in prop::collection::vec(step(), 1..30),
    ) {
        let mut session = configurator(layered_starter());
        let resolver = Resolver::default();
        for step in &steps {
            let event = to_event(&session, step);
            // Rejections are fine; the preview must be consistent either way.
            let _ = session.apply(event);

            let model = session.model();
            let selection = session.selection();
            prop_assert_eq!(
                &session.preview().composition,
                &resolver.composite(model, selection)
            );
            prop_assert_eq!(&session.preview().price, &price_breakdown(model, selection));
            let expected_total: u64 = model.base_price().units()
                + model
                    .options()
                    .iter()
                    .filter(|option| selection.is_active(&option.id))
                    .map(|option| option.price.units())
                    .sum::<u64>();
            prop_assert_eq!(session.preview().price.total.units(), expected_total);
        }
    }
}
