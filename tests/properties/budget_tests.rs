use proptest::prelude::*;

use plint::config::BudgetConfig;
use plint::core::budget::BudgetStatus;
use plint::core::tokens::{ApproxCounter, TokenCounter};

proptest! {
    #[test]
    fn test_count_is_deterministic(text in "\\PC*") {
        let counter = ApproxCounter;
        prop_assert_eq!(counter.count(&text), counter.count(&text));
    }

    #[test]
    fn test_count_is_monotone(a in "\\PC*", b in "\\PC*") {
        let counter = ApproxCounter;
        let joined = format!("{a}{b}");
        prop_assert!(counter.count(&joined) >= counter.count(&a));
        prop_assert!(counter.count(&joined) >= counter.count(&b));
    }

    #[test]
    fn test_status_is_monotone_in_body(body in 0usize..5000, extra in 0usize..5000) {
        let limits = BudgetConfig::default();
        let lower = BudgetStatus::from_body(body, &limits);
        let higher = BudgetStatus::from_body(body + extra, &limits);
        prop_assert!(higher >= lower);
    }
}

#[cfg(feature = "tiktoken")]
mod precise {
    use proptest::prelude::*;

    use plint::core::tokens::{TiktokenCounter, TokenCounter};

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn test_precise_count_is_deterministic(text in "\\PC{0,200}") {
            let counter = TiktokenCounter::new().expect("cl100k_base");
            prop_assert_eq!(counter.count(&text), counter.count(&text));
        }
    }
}
