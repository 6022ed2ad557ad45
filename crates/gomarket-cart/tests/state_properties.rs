//! Property tests for cart transitions.

use std::collections::HashSet;

use gomarket_cart::{CartState, ProductDescriptor, ProductId};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Add { id: u8, title: String, price: u16 },
    Increment(u8),
    Decrement(u8),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..6, "[a-z]{1,8}", any::<u16>())
            .prop_map(|(id, title, price)| Op::Add { id, title, price }),
        (0u8..6).prop_map(Op::Increment),
        (0u8..6).prop_map(Op::Decrement),
    ]
}

fn apply(state: &CartState, op: &Op) -> CartState {
    match op {
        Op::Add { id, title, price } => state.with_added(ProductDescriptor::new(
            id.to_string(),
            title.clone(),
            format!("https://img/{}", id),
            f64::from(*price),
        )),
        Op::Increment(id) => state.with_incremented(&ProductId::new(id.to_string())),
        Op::Decrement(id) => state.with_decremented(&ProductId::new(id.to_string())),
    }
}

proptest! {
    #[test]
    fn ids_stay_unique_and_quantities_positive(ops in prop::collection::vec(op(), 0..64)) {
        let mut state = CartState::new();
        for op in &ops {
            state = apply(&state, op);

            let ids: HashSet<_> = state.iter().map(|i| i.id.clone()).collect();
            prop_assert_eq!(ids.len(), state.len());
            prop_assert!(state.iter().all(|i| i.quantity >= 1));
        }
    }

    #[test]
    fn increment_only_touches_quantity(ops in prop::collection::vec(op(), 1..32), target in 0u8..6) {
        let state = ops.iter().fold(CartState::new(), |s, op| apply(&s, op));
        let id = ProductId::new(target.to_string());
        let next = state.with_incremented(&id);

        prop_assert_eq!(next.len(), state.len());
        for (before, after) in state.iter().zip(next.iter()) {
            prop_assert_eq!(&before.id, &after.id);
            prop_assert_eq!(&before.title, &after.title);
            prop_assert_eq!(&before.image_url, &after.image_url);
            prop_assert_eq!(before.price, after.price);
            let expected = if before.id == id { before.quantity + 1 } else { before.quantity };
            prop_assert_eq!(after.quantity, expected);
        }
    }

    #[test]
    fn decrement_at_one_removes(ops in prop::collection::vec(op(), 1..32), target in 0u8..6) {
        let state = ops.iter().fold(CartState::new(), |s, op| apply(&s, op));
        let id = ProductId::new(target.to_string());
        let next = state.with_decremented(&id);

        match state.get(&id) {
            Some(item) if item.quantity == 1 => prop_assert!(!next.contains(&id)),
            Some(item) => prop_assert_eq!(next.get(&id).map(|i| i.quantity), Some(item.quantity - 1)),
            None => prop_assert_eq!(&next, &state),
        }
    }

    #[test]
    fn add_refreshes_metadata(ops in prop::collection::vec(op(), 1..32), target in 0u8..6, price in any::<u16>()) {
        let state = ops.iter().fold(CartState::new(), |s, op| apply(&s, op));
        let id = ProductId::new(target.to_string());
        let descriptor = ProductDescriptor::new(id.clone(), "fresh", "https://img/fresh", f64::from(price));
        let next = state.with_added(descriptor);

        let item = next.get(&id).unwrap();
        prop_assert_eq!(item.title.as_str(), "fresh");
        prop_assert_eq!(item.image_url.as_str(), "https://img/fresh");
        prop_assert_eq!(item.price, f64::from(price));
        prop_assert_eq!(item.quantity, state.get(&id).map_or(1, |i| i.quantity + 1));
    }

    #[test]
    fn snapshot_decodes_to_same_state(ops in prop::collection::vec(op(), 0..32)) {
        let state = ops.iter().fold(CartState::new(), |s, op| apply(&s, op));
        let json = serde_json::to_vec(&state).unwrap();
        let back: CartState = serde_json::from_slice(&json).unwrap();
        prop_assert_eq!(back, state);
    }
}
