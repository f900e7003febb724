#[cfg(test)]
mod tests {
    use crate::assets::{AssetClass, AssetDefinition};
    use crate::goals::Goal;
    use crate::portfolio::holdings::{aggregate, aggregate_account, replay_transactions, summarize};
    use crate::quotes::PriceMap;
    use crate::transactions::{Direction, Transaction};
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn tx(id: &str, asset: &str, direction: Direction, qty: Decimal, price: Decimal) -> Transaction {
        Transaction {
            id: id.to_string(),
            asset_id: asset.to_string(),
            quantity: qty,
            unit_price: price,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            direction,
            account_id: None,
            cash_source_id: None,
        }
    }

    fn buy(asset: &str, qty: Decimal, price: Decimal) -> Transaction {
        tx("b", asset, Direction::Buy, qty, price)
    }

    fn sell(asset: &str, qty: Decimal, price: Decimal) -> Transaction {
        tx("s", asset, Direction::Sell, qty, price)
    }

    fn prices(entries: &[(&str, Decimal)]) -> PriceMap {
        entries
            .iter()
            .map(|(id, p)| (id.to_string(), *p))
            .collect()
    }

    // --- Cost basis ---

    #[test]
    fn test_weighted_average_cost_on_buys() {
        let ledger = vec![buy("AAPL", dec!(10), dec!(100)), buy("AAPL", dec!(5), dec!(130))];
        let states = replay_transactions(&ledger);
        let state = &states["AAPL"];
        assert_eq!(state.quantity, dec!(15));
        assert_eq!(state.average_cost, dec!(110));
    }

    #[test]
    fn test_sell_keeps_average_cost() {
        let ledger = vec![
            buy("AAPL", dec!(10), dec!(100)),
            buy("AAPL", dec!(5), dec!(130)),
            sell("AAPL", dec!(7), dec!(200)),
        ];
        let state = &replay_transactions(&ledger)["AAPL"];
        assert_eq!(state.quantity, dec!(8));
        assert_eq!(state.average_cost, dec!(110));
        assert_eq!(state.total_cost, dec!(880));
    }

    #[test]
    fn test_buy_after_sell_uses_remaining_cost() {
        let ledger = vec![
            buy("X", dec!(10), dec!(10)),
            sell("X", dec!(5), dec!(20)),
            buy("X", dec!(5), dec!(30)),
        ];
        let state = &replay_transactions(&ledger)["X"];
        // (5 × 10 + 5 × 30) / 10
        assert_eq!(state.average_cost, dec!(20));
    }

    #[test]
    fn test_selling_to_zero_resets_average_cost() {
        let ledger = vec![buy("X", dec!(3), dec!(10)), sell("X", dec!(3), dec!(12))];
        let state = &replay_transactions(&ledger)["X"];
        assert_eq!(state.quantity, Decimal::ZERO);
        assert_eq!(state.average_cost, Decimal::ZERO);
    }

    #[test]
    fn test_oversell_goes_negative_and_keeps_cost() {
        let ledger = vec![buy("X", dec!(2), dec!(10)), sell("X", dec!(5), dec!(10))];
        let state = &replay_transactions(&ledger)["X"];
        assert_eq!(state.quantity, dec!(-3));
        assert_eq!(state.average_cost, dec!(10));
    }

    #[test]
    fn test_asset_ids_group_case_insensitively() {
        let ledger = vec![buy("vwce", dec!(1), dec!(100)), buy(" VWCE", dec!(1), dec!(120))];
        let holdings = aggregate(&ledger, &[], &PriceMap::new());
        assert_eq!(holdings.positions.len(), 1);
        assert_eq!(holdings.positions[0].asset_id, "VWCE");
        assert_eq!(holdings.positions[0].quantity, dec!(2));
    }

    // --- Pricing ---

    #[test]
    fn test_quote_takes_precedence() {
        let ledger = vec![buy("AAPL", dec!(10), dec!(100))];
        let holdings = aggregate(&ledger, &[], &prices(&[("aapl", dec!(150))]));
        let position = holdings.position("AAPL").unwrap();
        assert_eq!(position.current_price, dec!(150));
        assert_eq!(position.current_value, dec!(1500));
        assert_eq!(position.unrealized_gain, dec!(500));
        assert_eq!(position.unrealized_gain_percent, dec!(50));
    }

    #[test]
    fn test_missing_quote_falls_back_to_last_transaction_price() {
        let ledger = vec![buy("X", dec!(10), dec!(100)), buy("X", dec!(10), dec!(120))];
        let holdings = aggregate(&ledger, &[], &PriceMap::new());
        let position = holdings.position("X").unwrap();
        assert_eq!(position.average_cost, dec!(110));
        assert_eq!(position.current_price, dec!(120));
    }

    #[test]
    fn test_zero_quote_is_ignored() {
        let ledger = vec![buy("X", dec!(1), dec!(50))];
        let holdings = aggregate(&ledger, &[], &prices(&[("X", Decimal::ZERO)]));
        assert_eq!(holdings.position("X").unwrap().current_price, dec!(50));
    }

    #[test]
    fn test_falls_back_to_average_cost_without_any_price() {
        let ledger = vec![buy("GIFT", dec!(5), Decimal::ZERO)];
        let holdings = aggregate(&ledger, &[], &PriceMap::new());
        let position = holdings.position("GIFT").unwrap();
        assert_eq!(position.current_price, Decimal::ZERO);
        assert_eq!(position.current_value, Decimal::ZERO);
        assert_eq!(position.unrealized_gain_percent, Decimal::ZERO);
    }

    // --- Classification ---

    #[test]
    fn test_definitions_resolve_class_and_label() {
        let ledger = vec![buy("AGG", dec!(1), dec!(100)), buy("MYSTERY", dec!(1), dec!(10))];
        let defs = vec![AssetDefinition::new("agg", "US Aggregate", AssetClass::Bond, "Medium")];
        let holdings = aggregate(&ledger, &defs, &PriceMap::new());

        let agg = holdings.position("AGG").unwrap();
        assert_eq!(agg.label, "US Aggregate");
        assert_eq!(agg.class, AssetClass::Bond);
        assert_eq!(agg.goal, Goal::Security);

        let mystery = holdings.position("MYSTERY").unwrap();
        assert_eq!(mystery.label, "MYSTERY");
        assert_eq!(mystery.class, AssetClass::Stock);
        assert_eq!(mystery.sub_class, "International");
        assert_eq!(mystery.goal, Goal::Growth);
    }

    // --- Summary ---

    #[test]
    fn test_summary_totals_and_class_allocation() {
        let ledger = vec![buy("VWCE", dec!(10), dec!(100)), buy("AGG", dec!(10), dec!(50))];
        let defs = vec![AssetDefinition::new("AGG", "Bonds", AssetClass::Bond, "Long")];
        let holdings = aggregate(
            &ledger,
            &defs,
            &prices(&[("VWCE", dec!(150)), ("AGG", dec!(50))]),
        );
        let summary = &holdings.summary;
        assert_eq!(summary.total_value, dec!(2000));
        assert_eq!(summary.total_cost, dec!(1500));
        assert_eq!(summary.total_gain, dec!(500));
        assert_eq!(summary.total_gain_percent.round_dp(4), dec!(33.3333));

        assert_eq!(summary.class_allocations.len(), 2);
        assert_eq!(summary.class_allocations[0].class, AssetClass::Stock);
        assert_eq!(summary.class_allocations[0].percentage, dec!(75));
        assert_eq!(summary.class_allocations[1].class, AssetClass::Bond);
        assert_eq!(summary.class_allocations[1].percentage, dec!(25));
    }

    #[test]
    fn test_empty_summary_has_no_nan() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_value, Decimal::ZERO);
        assert_eq!(summary.total_gain_percent, Decimal::ZERO);
        assert!(summary.class_allocations.is_empty());
    }

    #[test]
    fn test_zero_value_portfolio_reports_zero_percentages() {
        let ledger = vec![buy("X", dec!(1), dec!(10)), sell("X", dec!(1), dec!(10))];
        let holdings = aggregate(&ledger, &[], &PriceMap::new());
        assert_eq!(holdings.summary.total_value, Decimal::ZERO);
        assert_eq!(holdings.summary.class_allocations[0].percentage, Decimal::ZERO);
    }

    #[test]
    fn test_aggregate_account_filters_ledger() {
        let mut a = buy("X", dec!(1), dec!(10));
        a.account_id = Some("acc-1".to_string());
        let mut b = buy("Y", dec!(1), dec!(10));
        b.account_id = Some("acc-2".to_string());
        let c = buy("Z", dec!(1), dec!(10));

        let holdings = aggregate_account(&[a, b, c], "acc-1", &[], &PriceMap::new());
        assert_eq!(holdings.positions.len(), 1);
        assert_eq!(holdings.positions[0].asset_id, "X");
    }

    // --- Properties ---

    fn buy_strategy() -> impl Strategy<Value = (u32, u32)> {
        (1u32..1000, 0u32..1_000_000)
    }

    proptest! {
        #[test]
        fn prop_average_cost_matches_weighted_mean(buys in prop::collection::vec(buy_strategy(), 1..20)) {
            let ledger: Vec<Transaction> = buys
                .iter()
                .map(|(q, cents)| buy("P", Decimal::from(*q), Decimal::new(*cents as i64, 2)))
                .collect();
            let total_qty: Decimal = ledger.iter().map(|t| t.quantity).sum();
            let total_cost: Decimal = ledger.iter().map(|t| t.quantity * t.unit_price).sum();

            let state = &replay_transactions(&ledger)["P"];
            prop_assert_eq!(state.average_cost, total_cost / total_qty);
        }

        #[test]
        fn prop_sell_never_changes_average_cost(
            buys in prop::collection::vec(buy_strategy(), 1..10),
            sell_qty in 1u32..500,
        ) {
            let mut ledger: Vec<Transaction> = buys
                .iter()
                .map(|(q, cents)| buy("P", Decimal::from(*q), Decimal::new(*cents as i64, 2)))
                .collect();
            let before = replay_transactions(&ledger)["P"].clone();
            ledger.push(sell("P", Decimal::from(sell_qty), dec!(1)));
            let after = &replay_transactions(&ledger)["P"];

            prop_assert_eq!(after.quantity, before.quantity - Decimal::from(sell_qty));
            if !after.quantity.is_zero() {
                prop_assert_eq!(after.average_cost, before.average_cost);
            }
        }

        #[test]
        fn prop_aggregation_is_idempotent(buys in prop::collection::vec(buy_strategy(), 0..15)) {
            let ledger: Vec<Transaction> = buys
                .iter()
                .enumerate()
                .map(|(i, (q, cents))| {
                    let asset = if i % 2 == 0 { "A" } else { "b" };
                    buy(asset, Decimal::from(*q), Decimal::new(*cents as i64, 2))
                })
                .collect();
            let first = aggregate(&ledger, &[], &PriceMap::new());
            let second = aggregate(&ledger, &[], &PriceMap::new());
            prop_assert_eq!(first, second);
        }
    }
}
