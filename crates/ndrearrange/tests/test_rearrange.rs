//! End-to-end tests for `rearrange`.
//!
//! Covers:
//! - Shape scenarios (transpose, split, merge, ellipsis, literals)
//! - Round-trips on random tensors
//! - Repeat/broadcast of output-only axes
//! - Error classification (pattern, shape, axis)

use approx::assert_relative_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rstest::rstest;

use ndrearrange::{
    AxisError, DenseTensor, Hints, Pattern, PatternError, RearrangeError, ShapeError, c64,
    rearrange,
};
use ndrearrange::resolve::resolve_input_lengths;

fn hints(pairs: &[(&str, usize)]) -> Hints {
    pairs.iter().copied().collect()
}

fn iota(shape: &[usize]) -> DenseTensor<f64> {
    let len: usize = shape.iter().product();
    DenseTensor::from_vec((0..len).map(|x| x as f64).collect(), shape).unwrap()
}

#[rstest]
#[case::transpose(&[3, 4], "h w -> w h", &[], &[4, 3])]
#[case::split(&[12, 10], "(h w) c -> h w c", &[("h", 3), ("w", 4)], &[3, 4, 10])]
#[case::split_inferred(&[12, 10], "(h w) c -> h w c", &[("h", 3)], &[3, 4, 10])]
#[case::merge(&[3, 4, 5], "a b c -> (a b) c", &[], &[12, 5])]
#[case::merge_all(&[2, 3, 4], "a b c -> (c b a)", &[], &[24])]
#[case::split_and_merge(&[6, 5], "(a b) c -> b (a c)", &[("a", 2)], &[3, 10])]
#[case::ellipsis(&[8, 3], "... c -> c ...", &[], &[3, 8])]
#[case::literal_input(&[3, 1, 5], "a 1 c -> c a", &[], &[5, 3])]
#[case::unit_broadcast(&[3, 1, 5], "a 1 c -> a b c", &[("b", 4)], &[3, 4, 5])]
#[case::new_leading_axis(&[2, 3], "a b -> r a b", &[("r", 2)], &[2, 2, 3])]
#[case::identity(&[2, 3, 4], "a b c -> a b c", &[], &[2, 3, 4])]
fn test_output_shape(
    #[case] shape: &[usize],
    #[case] pattern: &str,
    #[case] pairs: &[(&str, usize)],
    #[case] expected: &[usize],
) {
    let x = iota(shape);
    let y = rearrange(&x, pattern, &hints(pairs)).unwrap();
    assert_eq!(y.shape(), expected);

    let planned = Pattern::parse(pattern)
        .unwrap()
        .output_shape(shape, &hints(pairs))
        .unwrap();
    assert_eq!(planned, expected);
}

#[rstest]
#[case(&[1, 1])]
#[case(&[2, 7])]
#[case(&[5, 3])]
fn test_transpose_matches_permutedims(#[case] shape: &[usize]) {
    let mut rng = StdRng::seed_from_u64(7);
    let x: DenseTensor<f64> = DenseTensor::randn_with_rng(shape, &mut rng);

    let y = rearrange(&x, "a b -> b a", &Hints::new()).unwrap();
    assert_eq!(y.shape(), &[shape[1], shape[0]]);
    assert_eq!(y, x.permutedims(&[1, 0]).unwrap());

    let back = rearrange(&y, "b a -> a b", &Hints::new()).unwrap();
    assert_eq!(back, x);
}

#[test]
fn test_transpose_complex() {
    let mut rng = StdRng::seed_from_u64(11);
    let x: DenseTensor<c64> = DenseTensor::random_with_rng(&[3, 4], &mut rng);
    let y = x.rearrange("a b -> b a", &Hints::new()).unwrap();
    for i in 0..3 {
        for j in 0..4 {
            assert_eq!(x.get(&[i, j]), y.get(&[j, i]));
        }
    }
}

#[test]
fn test_split_merge_round_trip() {
    let mut rng = StdRng::seed_from_u64(3);
    let x: DenseTensor<f64> = DenseTensor::randn_with_rng(&[12, 10], &mut rng);
    let h = hints(&[("h", 3), ("w", 4)]);

    let split = rearrange(&x, "(h w) c -> h w c", &h).unwrap();
    assert_eq!(split.shape(), &[3, 4, 10]);
    for i in 0..3 {
        for j in 0..4 {
            for c in 0..10 {
                assert_eq!(split.get(&[i, j, c]), x.get(&[i * 4 + j, c]));
            }
        }
    }

    let merged = rearrange(&split, "h w c -> (h w) c", &Hints::new()).unwrap();
    assert_eq!(merged.shape(), &[12, 10]);
    assert_eq!(merged, x);
}

#[test]
fn test_channels_last_to_channels_first() {
    let mut rng = StdRng::seed_from_u64(5);
    let x: DenseTensor<f64> = DenseTensor::randn_with_rng(&[2, 6, 3], &mut rng);

    let y = rearrange(&x, "b (h w) c -> b c h w", &hints(&[("w", 2)])).unwrap();
    assert_eq!(y.shape(), &[2, 3, 3, 2]);
    for b in 0..2 {
        for c in 0..3 {
            for h in 0..3 {
                for w in 0..2 {
                    assert_eq!(y.get(&[b, c, h, w]), x.get(&[b, h * 2 + w, c]));
                }
            }
        }
    }

    let total: f64 = x.data().iter().sum();
    let moved: f64 = y.data().iter().sum();
    assert_relative_eq!(total, moved, max_relative = 1e-12);
}

#[test]
fn test_element_count_preserved() {
    let x = iota(&[4, 6, 5]);
    let y = rearrange(&x, "a (b c) d -> (d b) c a", &hints(&[("c", 3)])).unwrap();
    assert_eq!(y.len(), x.len());

    let mut sorted = y.into_vec();
    sorted.sort_by(f64::total_cmp);
    assert_eq!(sorted, x.into_vec());
}

#[test]
fn test_unit_axis_is_repeated() {
    let mut rng = StdRng::seed_from_u64(13);
    let x: DenseTensor<f64> = DenseTensor::randn_with_rng(&[3, 1, 5], &mut rng);

    let y = rearrange(&x, "a 1 c -> a b c", &hints(&[("b", 4)])).unwrap();
    assert_eq!(y.shape(), &[3, 4, 5]);
    for a in 0..3 {
        for b in 0..4 {
            for c in 0..5 {
                assert_eq!(y.get(&[a, b, c]), x.get(&[a, 0, c]));
            }
        }
    }
    assert_relative_eq!(
        y.data().iter().sum::<f64>(),
        4.0 * x.data().iter().sum::<f64>(),
        max_relative = 1e-12
    );
}

#[test]
fn test_input_is_not_modified() {
    let x = iota(&[2, 3]);
    let before = x.clone();
    let _ = rearrange(&x, "a b -> b a", &Hints::new()).unwrap();
    let _ = rearrange(&x, "a b -> (a b)", &Hints::new()).unwrap();
    assert_eq!(x, before);
}

#[test]
fn test_plan_reuse() {
    let pattern: Pattern = "b (h w) -> b w h".parse().unwrap();
    let plan = pattern.plan(&[2, 6], &hints(&[("h", 2)])).unwrap();

    let mut rng = StdRng::seed_from_u64(17);
    for _ in 0..3 {
        let x: DenseTensor<f64> = DenseTensor::randn_with_rng(&[2, 6], &mut rng);
        let direct = pattern.apply(&x, &hints(&[("h", 2)])).unwrap();
        assert_eq!(plan.execute(&x).unwrap(), direct);
    }
}

// Errors

#[rstest]
#[case("a b -> b -> a")]
#[case("a b b a")]
#[case("a (b -> a b")]
#[case("a b) -> a b")]
#[case("a ((b c)) -> a b c")]
#[case("a b! -> a b")]
#[case("a a -> a")]
#[case("a 0 -> a")]
#[case("höhe b -> b höhe")]
fn test_pattern_errors(#[case] pattern: &str) {
    let x = iota(&[2, 3]);
    let err = rearrange(&x, pattern, &Hints::new()).unwrap_err();
    assert!(err.is_pattern_error(), "{pattern}: {err}");
}

#[test]
fn test_two_separators() {
    let err = Pattern::parse("a -> b -> c").unwrap_err();
    assert_eq!(err, PatternError::SeparatorCount { found: 2 });
}

#[test]
fn test_unknown_output_axis() {
    let x = iota(&[3, 4]);
    let err = rearrange(&x, "a b -> a b q", &Hints::new()).unwrap_err();
    assert_eq!(
        err,
        RearrangeError::Axis(AxisError::UnknownOutputAxis {
            name: "q".to_string()
        })
    );
}

#[rstest]
#[case::rank(&[3, 4], "a b c -> a b c", &[])]
#[case::hint_disagrees(&[3, 4], "a b -> b a", &[("a", 5)])]
#[case::literal_disagrees(&[3, 4], "a 2 -> a", &[])]
#[case::indivisible(&[10, 3], "(h w) c -> h w c", &[("h", 3)])]
#[case::group_hints_disagree(&[12, 3], "(h w) c -> h w c", &[("h", 3), ("w", 5)])]
#[case::dropped(&[3, 4], "a b -> b", &[])]
#[case::group_hint_overflow(&[12, 10], "(h w) c -> h w c", &[("h", (1 << 63) + 6), ("w", 2)])]
#[case::repeat_overflow(&[2], "a -> (a r)", &[("r", usize::MAX)])]
#[case::output_size_overflow(&[2], "a -> a r s", &[("r", 1 << 32), ("s", 1 << 32)])]
fn test_shape_errors(
    #[case] shape: &[usize],
    #[case] pattern: &str,
    #[case] pairs: &[(&str, usize)],
) {
    let x = iota(shape);
    let err = rearrange(&x, pattern, &hints(pairs)).unwrap_err();
    assert!(err.is_shape_error(), "{pattern}: {err}");
}

#[rstest]
#[case::underdetermined(&[12, 3], "(h w) c -> h w c", &[])]
#[case::output_group_member(&[3, 4], "a b -> (a r) b", &[])]
#[case::zero_hint(&[3, 4], "a b -> a b", &[("a", 0)])]
#[case::zero_group_hint(&[12], "(h w) -> h w", &[("h", 0)])]
fn test_axis_errors(
    #[case] shape: &[usize],
    #[case] pattern: &str,
    #[case] pairs: &[(&str, usize)],
) {
    let x = iota(shape);
    let err = rearrange(&x, pattern, &hints(pairs)).unwrap_err();
    assert!(err.is_axis_error(), "{pattern}: {err}");
}

#[test]
fn test_invalid_hint_name() {
    let x = iota(&[3, 4]);
    let err = rearrange(&x, "a b -> b a", &hints(&[("not a name", 2)])).unwrap_err();
    assert_eq!(
        err,
        RearrangeError::Pattern(PatternError::InvalidHintName {
            name: "not a name".to_string()
        })
    );
}

#[test]
fn test_resolver_validates_hints() {
    let pattern = Pattern::parse("(h w) -> h w").unwrap();
    let err = resolve_input_lengths(&[12], pattern.input(), &hints(&[("h", 0)])).unwrap_err();
    assert!(err.is_axis_error());
}

#[test]
fn test_indivisible_group_details() {
    let x = iota(&[10, 3]);
    let err = rearrange(&x, "(h w) c -> h w c", &hints(&[("h", 3)])).unwrap_err();
    assert_eq!(
        err,
        RearrangeError::Shape(ShapeError::IndivisibleGroup {
            group: "(h w)".to_string(),
            dim: 0,
            actual: 10,
            known: 3,
        })
    );
}
