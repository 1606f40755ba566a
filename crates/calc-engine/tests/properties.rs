//! Property tests for composition and pricing.

use proptest::prelude::*;

use calc_engine::{
    Resolver, composite, price_breakdown, quote, resolve_active_options, visible_view_keys,
};
use calc_model::{ConfigModel, DistanceParams, LayerOption, Money, SelectionState, VehicleClass};

#[derive(Debug, Clone)]
struct OptionShape {
    price: u32,
    order: i8,
    default_selected: bool,
    has_front_layer: bool,
}

fn option_shape() -> impl Strategy<Value = OptionShape> {
    (any::<u32>(), -3i8..4, any::<bool>(), any::<bool>()).prop_map(
        |(price, order, default_selected, has_front_layer)| OptionShape {
            price,
            order,
            default_selected,
            has_front_layer,
        },
    )
}

fn build_model(base: u32, shapes: &[OptionShape]) -> ConfigModel {
    let mut model = ConfigModel::new()
        .with_view("front", "/img/front.png")
        .with_view("rear", "/img/rear.png");
    model.set_base_price(Money::new(u64::from(base)));
    for (index, shape) in shapes.iter().enumerate() {
        let mut option = LayerOption::new(
            format!("opt_{index}"),
            format!("Option {index}"),
            Money::new(u64::from(shape.price)),
        )
        .with_order(i64::from(shape.order))
        .with_default(shape.default_selected);
        if shape.has_front_layer {
            option = option.with_layer("front", format!("/img/front_{index}.png"));
        }
        model = model.with_option(option);
    }
    model
}

fn selection(shapes: &[OptionShape], mask: &[bool]) -> SelectionState {
    let mut state = SelectionState::new();
    for (index, _) in shapes.iter().enumerate() {
        if mask.get(index).copied().unwrap_or(false) {
            state.activate(&format!("opt_{index}"));
        }
    }
    state
}

proptest! {
    #[test]
    fn total_is_base_plus_active_prices(
        base in any::<u32>(),
        shapes in prop::collection::vec(option_shape(), 0..8),
        mask in prop::collection::vec(any::<bool>(), 8),
    ) {
        let model = build_model(base, &shapes);
        let state = selection(&shapes, &mask);
        let expected: u64 = u64::from(base)
            + shapes
                .iter()
                .enumerate()
                .filter(|(index, _)| mask[*index])
                .map(|(_, shape)| u64::from(shape.price))
                .sum::<u64>();
        let breakdown = price_breakdown(&model, &state);
        prop_assert_eq!(breakdown.total, Money::new(expected));
        prop_assert_eq!(breakdown.base + breakdown.options_total, breakdown.total);
    }

    #[test]
    fn resolving_options_is_idempotent(
        shapes in prop::collection::vec(option_shape(), 0..8),
        toggles in prop::collection::vec(0usize..8, 0..6),
    ) {
        let model = build_model(0, &shapes);
        let mut state = SelectionState::new();
        let first = resolve_active_options(&model, &mut state).clone();
        let second = resolve_active_options(&model, &mut state).clone();
        prop_assert_eq!(&first, &second);

        for index in toggles {
            if index < shapes.len() {
                state.toggle(&format!("opt_{index}"));
            }
        }
        let after_toggles = resolve_active_options(&model, &mut state).clone();
        let again = resolve_active_options(&model, &mut state).clone();
        prop_assert_eq!(after_toggles, again);
    }

    #[test]
    fn paint_order_follows_order_field(
        shapes in prop::collection::vec(option_shape(), 0..8),
    ) {
        let forward = build_model(0, &shapes);
        let mut state = SelectionState::new();
        for index in 0..shapes.len() {
            state.activate(&format!("opt_{index}"));
        }
        let composition = composite(&forward, &state);
        let orders: Vec<i64> = composition
            .layers()
            .iter()
            .skip(1)
            .map(|layer| {
                let calc_engine::LayerSource::Option(id) = &layer.source else {
                    panic!("base layer must come first");
                };
                forward.option(id).expect("painted option exists").order
            })
            .collect();
        let mut sorted = orders.clone();
        sorted.sort_unstable();
        prop_assert_eq!(orders, sorted);
    }

    #[test]
    fn distance_total_adds_up(
        distance in 0.0f64..5000.0,
        round_trip in any::<bool>(),
        base in 0.0f64..10_000.0,
        per_km in 0.0f64..500.0,
        loading in 0.0f64..1000.0,
    ) {
        let params = DistanceParams {
            base_price: base,
            price_per_km: per_km,
            loading_price: loading,
            unloading_price: loading,
            ..DistanceParams::default()
        };
        for vehicle in VehicleClass::ALL {
            let quote = quote(&params, distance, vehicle, round_trip).unwrap();
            prop_assert_eq!(quote.total, quote.base + quote.km + quote.load);
            let expected_km = if round_trip { distance * 2.0 } else { distance };
            prop_assert_eq!(quote.effective_km, expected_km);
            prop_assert_eq!(quote.load, loading * 2.0);
        }
    }
}

#[test]
fn lower_order_paints_first_regardless_of_insertion_time() {
    let mut model = ConfigModel::new().with_view("front", "");
    model
        .push_option(
            LayerOption::new("second", "Second", Money::ZERO)
                .with_order(2)
                .with_layer("front", "/img/2.png"),
        )
        .unwrap();
    model
        .push_option(
            LayerOption::new("first", "First", Money::ZERO)
                .with_order(1)
                .with_layer("front", "/img/1.png"),
        )
        .unwrap();
    let mut state = SelectionState::new();
    state.activate("second");
    state.activate("first");
    assert_eq!(
        composite(&model, &state).images(),
        vec!["/img/1.png", "/img/2.png"]
    );
}

#[test]
fn equal_orders_paint_in_list_position() {
    let model = ConfigModel::new()
        .with_view("front", "/img/base.png")
        .with_option(
            LayerOption::new("awning", "Awning", Money::new(10))
                .with_order(5)
                .with_layer("front", "/img/awning.png"),
        )
        .with_option(
            LayerOption::new("ladder", "Ladder", Money::new(20))
                .with_order(5)
                .with_layer("front", "/img/ladder.png"),
        )
        .with_option(
            LayerOption::new("tow_hook", "Tow hook", Money::new(30))
                .with_order(1)
                .with_layer("front", "/img/hook.png"),
        );
    let mut state = SelectionState::new();
    state.activate("ladder");
    state.activate("tow_hook");
    state.activate("awning");
    assert_eq!(
        composite(&model, &state).images(),
        vec![
            "/img/base.png",
            "/img/hook.png",
            "/img/awning.png",
            "/img/ladder.png"
        ]
    );
    let breakdown = price_breakdown(&model, &state);
    let lines: Vec<&str> = breakdown
        .lines
        .iter()
        .map(|line| line.id.as_str())
        .collect();
    assert_eq!(lines, vec!["tow_hook", "awning", "ladder"]);
}

#[test]
fn rear_flag_round_trip_keeps_image() {
    let mut model = ConfigModel::new()
        .with_view("front", "/img/front.png")
        .with_view("rear", "/img/rear.png");
    model.set_show_rear_view(false);
    assert_eq!(visible_view_keys(&model), vec!["front"]);
    model.set_show_rear_view(true);
    assert_eq!(visible_view_keys(&model), vec!["front", "rear"]);
    assert_eq!(model.view_image("rear"), Some("/img/rear.png"));
}

#[test]
fn tow_hook_has_no_side_layer() {
    let model = ConfigModel::new()
        .with_view("front", "/img/front.png")
        .with_view("side", "/img/side.png")
        .with_option(
            LayerOption::new("tow_hook", "Tow hook", Money::new(3000))
                .with_default(true)
                .with_layer("front", "/img/front_hook.png"),
        );
    let resolver = Resolver::default();
    let mut state = SelectionState::new();
    resolver.refresh(&model, &mut state);
    state.set_active_view(Some("side".to_string()));

    let composition = resolver.composite(&model, &state);
    assert_eq!(composition.view(), Some("side"));
    assert_eq!(composition.images(), vec!["/img/side.png"]);
    assert_eq!(price_breakdown(&model, &state).options_total, Money::new(3000));
}
