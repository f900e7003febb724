#[cfg(test)]
mod tests {
    use crate::accounts::Account;
    use crate::assets::{AssetClass, AssetDefinition};
    use crate::goals::Goal;
    use crate::portfolio::allocation::{account_values, allocation_by_goal, primary_goal};
    use crate::portfolio::holdings::Position;
    use crate::quotes::PriceMap;
    use crate::transactions::{Direction, Transaction};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn position(asset: &str, class: AssetClass, sub: &str, value: Decimal) -> Position {
        Position::new(asset, dec!(1), value, value).with_class(class, sub)
    }

    fn buy_in(account: &str, asset: &str, qty: Decimal, price: Decimal) -> Transaction {
        Transaction {
            id: format!("{}-{}", account, asset),
            asset_id: asset.to_string(),
            quantity: qty,
            unit_price: price,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            direction: Direction::Buy,
            account_id: Some(account.to_string()),
            cash_source_id: None,
        }
    }

    #[test]
    fn test_allocation_by_goal_covers_every_goal() {
        let positions = vec![
            position("VWCE", AssetClass::Stock, "International", dec!(600)),
            position("BOT", AssetClass::Bond, "Short", dec!(300)),
            position("CASH", AssetClass::Cash, "", dec!(100)),
        ];
        let allocations = allocation_by_goal(&positions);

        assert_eq!(allocations.len(), 3);
        assert_eq!(allocations[0].goal, Goal::Growth);
        assert_eq!(allocations[0].percentage, dec!(60));
        assert_eq!(allocations[1].goal, Goal::Protection);
        assert_eq!(allocations[1].value, dec!(400));
        assert_eq!(allocations[1].percentage, dec!(40));
        assert_eq!(allocations[2].goal, Goal::Security);
        assert_eq!(allocations[2].percentage, Decimal::ZERO);
    }

    #[test]
    fn test_allocation_by_goal_zero_total() {
        let allocations = allocation_by_goal(&[]);
        assert!(allocations.iter().all(|a| a.percentage.is_zero()));
    }

    #[test]
    fn test_primary_goal_picks_largest_bucket() {
        let positions = vec![
            position("VWCE", AssetClass::Stock, "International", dec!(100)),
            position("BTP", AssetClass::Bond, "Long", dec!(900)),
        ];
        assert_eq!(primary_goal(&positions), Goal::Security);
    }

    #[test]
    fn test_primary_goal_defaults_to_growth() {
        assert_eq!(primary_goal(&[]), Goal::Growth);
    }

    #[test]
    fn test_primary_goal_tie_resolves_in_goal_order() {
        let positions = vec![
            position("BOT", AssetClass::Bond, "Short", dec!(500)),
            position("BTP", AssetClass::Bond, "Long", dec!(500)),
        ];
        assert_eq!(primary_goal(&positions), Goal::Protection);
    }

    #[test]
    fn test_account_values_split_ledger_by_account() {
        let ledger = vec![
            buy_in("growth", "VWCE", dec!(10), dec!(100)),
            buy_in("safe", "BOT", dec!(20), dec!(50)),
        ];
        let mut safe = Account::new("safe", "Emergency");
        safe.cash_reserve = dec!(250);
        let accounts = vec![Account::new("growth", "Long term"), safe];
        let defs = vec![AssetDefinition::new("BOT", "Short bond", AssetClass::Bond, "Short")];

        let values = account_values(&ledger, &accounts, &defs, &PriceMap::new());

        assert_eq!(values.len(), 2);
        assert_eq!(values[0].account_id, "growth");
        assert_eq!(values[0].total_value, dec!(1000));
        assert_eq!(values[0].primary_goal, Goal::Growth);
        assert_eq!(values[1].invested_value, dec!(1000));
        assert_eq!(values[1].total_value, dec!(1250));
        assert_eq!(values[1].primary_goal, Goal::Protection);
    }
}
