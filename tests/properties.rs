//! Property tests for the even-distribution and workload-splitting kernels
//! across randomized inputs, per spec §8.

use pacer::ids::LineItemId;
use pacer::planned_spend::{even_distribution, PlannedSpend};
use pacer::snapshot::Record;
use pacer::spend::Spend;
use pacer::splitter::split;
use pacer::time_slot::TIME_SLOTS;
use proptest::prelude::*;

proptest! {
    #[test]
    fn even_distribution_sums_to_the_input(val in 0i64..=10_000_000) {
        let dist = even_distribution(val);
        prop_assert_eq!(dist.len(), TIME_SLOTS);
        prop_assert_eq!(dist.iter().sum::<i64>(), val);
    }

    #[test]
    fn even_distribution_spread_is_at_most_one(val in 0i64..=10_000_000) {
        let dist = even_distribution(val);
        let max = *dist.iter().max().unwrap();
        let min = *dist.iter().min().unwrap();
        prop_assert!(max - min <= 1);
    }

    #[test]
    fn even_distribution_is_non_negative_for_non_positive_input(val in -10_000_000i64..=0) {
        let dist = even_distribution(val);
        prop_assert!(dist.iter().all(|&v| v == 0));
    }

    #[test]
    fn splitter_never_emits_less_than_one_unit_per_consumer(
        n in 1usize..20,
        daily_budget in 0i64..(50_000 * 1440),
        spent in 0i64..50_000,
    ) {
        let consumers: Vec<String> = (0..n).map(|i| format!("consumer-{i}")).collect();
        let planned = PlannedSpend::new();
        let id = LineItemId::new();
        planned.load_records(&[Record { line_item_id: id, daily_budget }]);
        let spend = Spend::new();
        spend.set(id, spent);

        let result = split(&consumers, &planned, &spend, 0);
        for fragments in result.values() {
            if let Some(&share) = fragments.get(&id) {
                prop_assert!(share >= 1);
            }
        }
    }

    #[test]
    fn splitter_gives_every_consumer_the_same_fragment_for_a_line_item(
        n in 1usize..20,
        daily_budget in 0i64..(50_000 * 1440),
    ) {
        let consumers: Vec<String> = (0..n).map(|i| format!("consumer-{i}")).collect();
        let planned = PlannedSpend::new();
        let id = LineItemId::new();
        planned.load_records(&[Record { line_item_id: id, daily_budget }]);
        let spend = Spend::new();

        let result = split(&consumers, &planned, &spend, 0);
        let shares: Vec<Option<i64>> = result.values().map(|f| f.get(&id).copied()).collect();
        prop_assert!(shares.windows(2).all(|w| w[0] == w[1]));
    }
}
