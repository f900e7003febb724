#[cfg(test)]
mod tests {
    use crate::accounts::{Account, TargetAllocations};
    use crate::portfolio::holdings::Position;
    use crate::portfolio::rebalancing::{
        min_liquidity_for_full_buy_only_coverage, plan_account_rebalance,
        plan_buy_only_rebalance, plan_full_rebalance, RebalanceKind,
    };
    use crate::quotes::PriceMap;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn held(asset: &str, quantity: Decimal, price: Decimal) -> Position {
        Position::new(asset, quantity, price, price)
    }

    fn quotes(entries: &[(&str, Decimal)]) -> PriceMap {
        entries
            .iter()
            .map(|(id, p)| (id.to_string(), *p))
            .collect()
    }

    // ============================================================================
    // Full rebalance
    // ============================================================================

    #[test]
    fn test_position_on_target_is_balanced() {
        let positions = vec![held("AAPL", dec!(10), dec!(100))];
        let targets = TargetAllocations::new().with("AAPL", dec!(50));

        let actions = plan_full_rebalance(&positions, &targets, dec!(2000), &PriceMap::new());

        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].target_value, dec!(1000));
        assert_eq!(actions[0].shares, Decimal::ZERO);
        assert_eq!(actions[0].kind, RebalanceKind::Balanced);
    }

    #[test]
    fn test_buys_underweight_and_sells_overweight() {
        let positions = vec![held("A", dec!(80), dec!(10)), held("B", dec!(10), dec!(20))];
        let targets = TargetAllocations::new().with("A", dec!(50)).with("B", dec!(50));

        let actions = plan_full_rebalance(&positions, &targets, dec!(1000), &PriceMap::new());

        let a = actions.iter().find(|a| a.asset_id == "A").unwrap();
        assert_eq!(a.kind, RebalanceKind::Sell);
        assert_eq!(a.shares, dec!(-30));
        assert_eq!(a.amount, dec!(-300));

        let b = actions.iter().find(|a| a.asset_id == "B").unwrap();
        assert_eq!(b.kind, RebalanceKind::Buy);
        assert_eq!(b.shares, dec!(15));
        assert_eq!(b.amount, dec!(300));
    }

    #[test]
    fn test_halfway_rounds_away_from_zero() {
        let targets = TargetAllocations::new().with("UP", dec!(25)).with("DOWN", dec!(25));
        let positions = vec![held("DOWN", dec!(5), dec!(10))];
        let prices = quotes(&[("UP", dec!(10))]);

        let actions = plan_full_rebalance(&positions, &targets, dec!(100), &prices);

        // 25 / 10 = 2.5 shares either way
        let up = actions.iter().find(|a| a.asset_id == "UP").unwrap();
        assert_eq!(up.shares, dec!(3));
        let down = actions.iter().find(|a| a.asset_id == "DOWN").unwrap();
        assert_eq!(down.shares, dec!(-3));
    }

    #[test]
    fn test_untargeted_empty_positions_are_omitted() {
        let positions = vec![
            held("GONE", Decimal::ZERO, dec!(10)),
            held("KEEP", dec!(1), dec!(10)),
        ];
        let targets = TargetAllocations::new();

        let actions = plan_full_rebalance(&positions, &targets, dec!(10), &PriceMap::new());

        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].asset_id, "KEEP");
        assert_eq!(actions[0].kind, RebalanceKind::Sell);
    }

    #[test]
    fn test_target_without_price_is_balanced() {
        let targets = TargetAllocations::new().with("NEW", dec!(100));
        let actions = plan_full_rebalance(&[], &targets, dec!(1000), &PriceMap::new());
        assert_eq!(actions[0].kind, RebalanceKind::Balanced);
        assert_eq!(actions[0].amount, Decimal::ZERO);
    }

    #[test]
    fn test_full_rebalance_lands_within_one_share_of_target() {
        let positions = vec![
            held("A", dec!(13), dec!(37)),
            held("B", dec!(2), dec!(410)),
            held("C", dec!(55), dec!(3.3)),
        ];
        let targets = TargetAllocations::new()
            .with("A", dec!(40))
            .with("B", dec!(35))
            .with("C", dec!(25));
        let total: Decimal = positions.iter().map(|p| p.current_value).sum();

        for action in plan_full_rebalance(&positions, &targets, total, &PriceMap::new()) {
            let post = action.current_value + action.amount;
            assert!((post - action.target_value).abs() <= action.price);
        }
    }

    // ============================================================================
    // Buy-only
    // ============================================================================

    #[test]
    fn test_buy_only_splits_cash_by_gap() {
        let targets = TargetAllocations::new().with("A", dec!(60)).with("B", dec!(40));
        let prices = quotes(&[("A", dec!(10)), ("B", dec!(20))]);

        let plan = plan_buy_only_rebalance(&[], &targets, dec!(100), &prices);

        assert_eq!(plan.actions.len(), 2);
        assert_eq!(plan.actions[0].asset_id, "A");
        assert_eq!(plan.actions[0].shares, dec!(6));
        assert_eq!(plan.actions[0].cash_spent, dec!(60));
        assert_eq!(plan.actions[1].shares, dec!(2));
        assert_eq!(plan.actions[1].cash_spent, dec!(40));
        assert_eq!(plan.leftover_cash, Decimal::ZERO);
    }

    #[test]
    fn test_leftover_goes_to_largest_remainder() {
        // 50/50 on 100 cash: A gets 50/30 = 1.67 shares, B gets 50/40 = 1.25
        let targets = TargetAllocations::new().with("A", dec!(50)).with("B", dec!(50));
        let prices = quotes(&[("A", dec!(30)), ("B", dec!(40))]);

        let plan = plan_buy_only_rebalance(&[], &targets, dec!(100), &prices);

        let a = plan.actions.iter().find(|a| a.asset_id == "A").unwrap();
        let b = plan.actions.iter().find(|a| a.asset_id == "B").unwrap();
        assert_eq!(a.shares, dec!(2));
        assert_eq!(b.shares, dec!(1));
        assert_eq!(plan.total_spent, dec!(100));
        assert_eq!(plan.leftover_cash, Decimal::ZERO);
    }

    #[test]
    fn test_leftover_below_price_stays_cash() {
        // Only A is underweight: 45 at price 10 floors to 4 shares, 5 left.
        let positions = vec![held("B", dec!(1), dec!(55))];
        let targets = TargetAllocations::new().with("A", dec!(100));
        let prices = quotes(&[("A", dec!(10))]);
        let plan = plan_buy_only_rebalance(&positions, &targets, dec!(45), &prices);

        assert_eq!(plan.actions.len(), 1);
        assert_eq!(plan.actions[0].shares, dec!(4));
        assert_eq!(plan.leftover_cash, dec!(5));
    }

    #[test]
    fn test_no_underweight_assets_keeps_cash() {
        let positions = vec![held("A", dec!(100), dec!(10))];
        let targets = TargetAllocations::new().with("A", dec!(10));

        let plan = plan_buy_only_rebalance(&positions, &targets, dec!(50), &PriceMap::new());

        assert!(plan.actions.is_empty());
        assert_eq!(plan.leftover_cash, dec!(50));
    }

    #[test]
    fn test_zero_cash_does_nothing() {
        let targets = TargetAllocations::new().with("A", dec!(100));
        let prices = quotes(&[("A", dec!(1))]);
        let plan = plan_buy_only_rebalance(&[], &targets, Decimal::ZERO, &prices);
        assert!(plan.actions.is_empty());
        assert_eq!(plan.total_spent, Decimal::ZERO);
    }

    // ============================================================================
    // Required liquidity
    // ============================================================================

    #[test]
    fn test_required_liquidity_uses_binding_asset() {
        // A at 600 with 30% target implies a 2000 portfolio.
        let positions = vec![held("A", dec!(60), dec!(10)), held("B", dec!(40), dec!(10))];
        let targets = TargetAllocations::new().with("A", dec!(30)).with("B", dec!(70));

        let needed = min_liquidity_for_full_buy_only_coverage(&positions, &targets);
        assert_eq!(needed, dec!(1000));
    }

    #[test]
    fn test_required_liquidity_floors_at_zero() {
        let positions = vec![held("A", dec!(50), dec!(10)), held("B", dec!(50), dec!(10))];
        let targets = TargetAllocations::new().with("A", dec!(50)).with("B", dec!(50));
        assert_eq!(
            min_liquidity_for_full_buy_only_coverage(&positions, &targets),
            Decimal::ZERO
        );
        assert_eq!(
            min_liquidity_for_full_buy_only_coverage(&[], &TargetAllocations::new()),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_required_liquidity_is_enough_for_buy_only() {
        let positions = vec![held("A", dec!(60), dec!(10)), held("B", dec!(40), dec!(10))];
        let targets = TargetAllocations::new().with("A", dec!(30)).with("B", dec!(70));
        let needed = min_liquidity_for_full_buy_only_coverage(&positions, &targets);

        let plan = plan_buy_only_rebalance(&positions, &targets, needed, &PriceMap::new());
        assert_eq!(plan.actions.len(), 1);
        assert_eq!(plan.actions[0].asset_id, "B");
        assert_eq!(plan.actions[0].shares, dec!(100));
    }

    // ============================================================================
    // Account bundle
    // ============================================================================

    #[test]
    fn test_account_plan_includes_cash_reserve() {
        let mut account = Account::new("acc", "Main");
        account.cash_reserve = dec!(100);
        account.target_allocations =
            TargetAllocations::new().with("A", dec!(60)).with("B", dec!(40));
        let prices = quotes(&[("A", dec!(10)), ("B", dec!(20))]);

        let plan = plan_account_rebalance(&account, &[], &prices);

        assert_eq!(plan.invested_value, Decimal::ZERO);
        assert_eq!(plan.full.len(), 2);
        assert_eq!(plan.full[0].shares, dec!(6));
        assert_eq!(plan.full[1].shares, dec!(2));
        assert_eq!(plan.buy_only.total_spent, dec!(100));
        assert_eq!(plan.required_liquidity, Decimal::ZERO);
    }

    proptest! {
        #[test]
        fn prop_buy_only_never_exceeds_cash(
            cash_cents in 0u32..10_000_000,
            assets in prop::collection::vec((1u32..10_000, 0u32..100, 0u32..50), 1..8),
        ) {
            let cash = Decimal::new(cash_cents as i64, 2);
            let mut targets = TargetAllocations::new();
            let mut positions = Vec::new();
            let mut prices = PriceMap::new();
            for (i, (price_cents, target, qty)) in assets.iter().enumerate() {
                let id = format!("ASSET{}", i);
                let price = Decimal::new(*price_cents as i64, 2);
                targets.set(&id, Decimal::from(*target));
                prices.insert(id.clone(), price);
                if *qty > 0 {
                    positions.push(held(&id, Decimal::from(*qty), price));
                }
            }

            let plan = plan_buy_only_rebalance(&positions, &targets, cash, &prices);
            prop_assert!(plan.total_spent <= cash);
            prop_assert!(plan.leftover_cash >= Decimal::ZERO);
            prop_assert!(plan.actions.iter().all(|a| a.shares > Decimal::ZERO));
        }
    }
}
