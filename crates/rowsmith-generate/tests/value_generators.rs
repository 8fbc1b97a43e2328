use chrono::NaiveDate;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rowsmith_core::{CategorySource, Charset, ColumnRule, NumericInput};
use rowsmith_generate::{Cell, Sentinel, alphabet, generate_cell, generate_value};

fn range(min: impl Into<NumericInput>, max: impl Into<NumericInput>, places: Option<u32>) -> ColumnRule {
    ColumnRule::Range {
        min: min.into(),
        max: max.into(),
        decimal_places: places,
    }
}

#[test]
fn degenerate_range_repeats_the_bound() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let rule = range("18", "18", Some(0));
    for _ in 0..20 {
        assert_eq!(generate_value(&rule, &mut rng), "18");
    }
}

#[test]
fn malformed_rules_render_sentinels() {
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    assert_eq!(
        generate_cell(&range("10", "1", None), &mut rng),
        Cell::Sentinel(Sentinel::InvalidRange)
    );
    assert_eq!(
        generate_cell(&range("", "5", None), &mut rng),
        Cell::Sentinel(Sentinel::InvalidRange)
    );
    assert_eq!(
        generate_value(
            &ColumnRule::Categorical {
                values: " , ,".into()
            },
            &mut rng
        ),
        "NO_CATEGORIES"
    );
    assert_eq!(
        generate_value(
            &ColumnRule::Date {
                min_date: "2024-13-01".to_string(),
                max_date: "2024-12-31".to_string(),
                format: None,
            },
            &mut rng
        ),
        "INVALID_DATE_RANGE"
    );
}

#[test]
fn date_rule_uses_default_format_when_blank() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let rule = ColumnRule::Date {
        min_date: "2024-05-17".to_string(),
        max_date: "2024-05-17".to_string(),
        format: Some(String::new()),
    };
    assert_eq!(generate_value(&rule, &mut rng), "2024-05-17");
}

#[test]
fn same_seed_gives_same_values() {
    let rule = ColumnRule::UniqueId {
        length: 16,
        charset: Charset::All,
    };
    let mut a = ChaCha8Rng::seed_from_u64(99);
    let mut b = ChaCha8Rng::seed_from_u64(99);
    for _ in 0..10 {
        assert_eq!(generate_value(&rule, &mut a), generate_value(&rule, &mut b));
    }
}

proptest! {
    #[test]
    fn range_values_stay_in_bounds(
        min in -1_000i32..=1_000,
        span in 0i32..=1_000,
        places in 0u32..=6,
        seed in any::<u64>()
    ) {
        let max = min + span;
        let rule = range(f64::from(min), f64::from(max), Some(places));
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let value = generate_value(&rule, &mut rng);

        let parsed: f64 = value.parse().expect("numeric output");
        prop_assert!(parsed >= f64::from(min) && parsed <= f64::from(max), "{value}");
        let decimals = value.split_once('.').map_or(0, |(_, frac)| frac.len());
        prop_assert_eq!(decimals, places as usize);
    }

    #[test]
    fn categorical_values_come_from_the_list(
        values in proptest::collection::vec("[a-z]{1,8}", 1..8),
        seed in any::<u64>()
    ) {
        let source = CategorySource::Csv(values.join(" , "));
        let rule = ColumnRule::Categorical { values: source };
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let value = generate_value(&rule, &mut rng);
        prop_assert!(values.contains(&value));
    }

    #[test]
    fn unique_ids_use_the_charset(
        length in 0i64..=64,
        charset in prop_oneof![
            Just(Charset::Numbers),
            Just(Charset::Alphanumeric),
            Just(Charset::All)
        ],
        seed in any::<u64>()
    ) {
        let rule = ColumnRule::UniqueId { length, charset };
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let value = generate_value(&rule, &mut rng);
        prop_assert_eq!(value.len(), length as usize);
        let symbols = alphabet(charset);
        prop_assert!(value.bytes().all(|byte| symbols.contains(&byte)));
    }

    #[test]
    fn dates_stay_in_bounds(
        start in 0u64..=20_000,
        span in 0u64..=3_650,
        seed in any::<u64>()
    ) {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("epoch");
        let min = epoch + chrono::Days::new(start);
        let max = min + chrono::Days::new(span);
        let rule = ColumnRule::Date {
            min_date: min.format("%Y-%m-%d").to_string(),
            max_date: max.format("%Y-%m-%d").to_string(),
            format: None,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let value = generate_value(&rule, &mut rng);
        let parsed = NaiveDate::parse_from_str(&value, "%Y-%m-%d").expect("date output");
        prop_assert!(parsed >= min && parsed <= max, "{value}");
    }
}
