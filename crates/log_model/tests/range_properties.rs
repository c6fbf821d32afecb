use proptest::prelude::*;

use log_model::RangeSet;

fn fragment_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (1usize..30).prop_map(|a| a.to_string()),
        (1usize..30, 0usize..15).prop_map(|(a, extra)| format!("{a}-{}", a + extra)),
        (1usize..30).prop_map(|a| format!("{a}-")),
        (1usize..30).prop_map(|b| format!("-{b}")),
    ]
}

proptest! {
    #[test]
    fn parsed_sets_are_sorted_disjoint_and_clipped(
        fragments in prop::collection::vec(fragment_strategy(), 1..6),
        bound in 0usize..25,
    ) {
        let expr = fragments.join(",");
        let set = RangeSet::parse(&expr, bound).expect("well-formed expression");

        let mut previous_end: Option<usize> = None;
        for (start, end) in set.intervals() {
            prop_assert!(*start >= 1);
            prop_assert!(*end <= bound);
            prop_assert!(start <= end);
            if let Some(previous) = previous_end {
                // Disjoint and non-adjacent, otherwise they would have merged.
                prop_assert!(*start > previous + 1);
            }
            previous_end = Some(*end);
        }
    }

    #[test]
    fn canonical_form_is_a_fixed_point(
        fragments in prop::collection::vec(fragment_strategy(), 1..6),
        bound in 1usize..25,
    ) {
        let expr = fragments.join(",");
        let set = RangeSet::parse(&expr, bound).expect("well-formed expression");
        prop_assume!(!set.is_empty());

        let reparsed = RangeSet::parse(&set.to_string(), bound).expect("canonical form");
        prop_assert_eq!(set, reparsed);
    }

    #[test]
    fn membership_matches_the_index_iterator(
        fragments in prop::collection::vec(fragment_strategy(), 1..6),
        bound in 1usize..25,
    ) {
        let expr = fragments.join(",");
        let set = RangeSet::parse(&expr, bound).expect("well-formed expression");

        let from_iterator: Vec<usize> = set.indices().collect();
        let from_membership: Vec<usize> = (1..=bound).filter(|i| set.contains(*i)).collect();
        prop_assert_eq!(from_iterator, from_membership);
    }
}
