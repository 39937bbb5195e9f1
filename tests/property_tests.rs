use proptest::prelude::*;

use mmvii::batch::process;
use mmvii::expr::{evaluate, insert_implicit_multiplication};
use mmvii::format::format_time;
use mmvii::{timer, Environment, Number};

proptest! {
    /// Evaluation reports errors as values; it never panics.
    #[test]
    fn evaluate_does_not_panic(s in "[0-9a-z+\\-*/^%(). ]{0,24}") {
        let _ = evaluate(&s, &Environment::new(), None);
    }

    #[test]
    fn process_does_not_panic(s in "\\PC{0,32}") {
        let _ = process(&s, &mut Environment::new());
    }

    #[test]
    fn timer_parse_does_not_panic(s in "[0-9x,{}\\- ]{0,7}") {
        let _ = timer::parse(&s);
    }

    /// Rewriting twice changes nothing the first pass did not.
    #[test]
    fn implicit_multiplication_is_idempotent(s in "[0-9a-c()+]{0,16}") {
        let once = insert_implicit_multiplication(&s);
        prop_assert_eq!(insert_implicit_multiplication(&once), once);
    }

    #[test]
    fn clock_round_trip(secs in 0u64..360_000) {
        let shown = format_time(secs);
        let (mins, rest) = shown.split_once(':').unwrap();
        prop_assert_eq!(rest.len(), 2);
        prop_assert!(mins.len() >= 2);
        let back = mins.parse::<u64>().unwrap() * 60 + rest.parse::<u64>().unwrap();
        prop_assert_eq!(back, secs);
    }

    #[test]
    fn integer_sums_stay_exact(a in -1_000_000i64..1_000_000, b in -1_000_000i64..1_000_000) {
        let expr = format!("{}+({})", a, b);
        prop_assert_eq!(evaluate(&expr, &Environment::new(), None), Ok(Number::Int(a + b)));
    }

    #[test]
    fn ranges_are_inclusive(start in -50i64..50, end in -50i64..50) {
        let mut env = Environment::new();
        process("f(x)=x", &mut env);
        let out = process(&format!("f(x) | x={}..{}", start, end), &mut env);
        prop_assert_eq!(out.len() as i64, (end - start).abs() + 1);
        prop_assert_eq!(out.first().map(ToString::to_string), Some(start.to_string()));
        prop_assert_eq!(out.last().map(ToString::to_string), Some(end.to_string()));
    }
}
