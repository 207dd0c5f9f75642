//! Assertion macros for floats and ordered sequences.

/// Assert that two floating-point values are within `tolerance`.
///
/// ```rust
/// use pienoon_test_helpers::assert_approx_eq;
///
/// assert_approx_eq!(1.0f32, 1.0001, 0.001);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $tolerance:expr $(,)?) => {
        let left = $left;
        let right = $right;
        let tolerance = $tolerance;
        let diff = (left - right).abs();
        if !(diff <= tolerance) {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}`,\n  tolerance: `{:?}`",
                left, right, diff, tolerance
            );
        }
    };
    ($left:expr, $right:expr, $tolerance:expr, $($arg:tt)+) => {
        let left = $left;
        let right = $right;
        let tolerance = $tolerance;
        let diff = (left - right).abs();
        if !(diff <= tolerance) {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}`,\n  tolerance: `{:?}`: {}",
                left, right, diff, tolerance, format_args!($($arg)+)
            );
        }
    };
}

/// Assert that a collection is sorted in ascending order.
///
/// ```rust
/// use pienoon_test_helpers::assert_sorted;
///
/// assert_sorted!(&[1.0, 2.0, 2.0, 4.0]);
/// ```
#[macro_export]
macro_rules! assert_sorted {
    ($collection:expr $(,)?) => {
        let collection = $collection;
        let mut iter = collection.iter();
        if let Some(mut prev) = iter.next() {
            for (i, curr) in iter.enumerate() {
                if prev > curr {
                    panic!(
                        "assertion failed: collection is not sorted\n  first unsorted pair at index {}: {:?} > {:?}",
                        i, prev, curr
                    );
                }
                prev = curr;
            }
        }
    };
}

/// Assert that `actual` lists the same items as `expected`, in order.
///
/// Prints both sequences in full on failure, which reads better than the
/// default `assert_eq!` output for long event logs.
///
/// ```rust
/// use pienoon_test_helpers::assert_sequence;
///
/// assert_sequence!(vec!["load a", "load b"], ["load a", "load b"]);
/// ```
#[macro_export]
macro_rules! assert_sequence {
    ($actual:expr, $expected:expr $(,)?) => {
        let actual: Vec<_> = $actual.into_iter().collect();
        let expected: Vec<_> = $expected.into_iter().collect();
        if actual.len() != expected.len()
            || actual.iter().zip(expected.iter()).any(|(a, e)| a != e)
        {
            panic!(
                "assertion failed: sequences differ\n  actual: {:#?}\nexpected: {:#?}",
                actual, expected
            );
        }
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_approx_eq_passes() {
        assert_approx_eq!(1.0f32, 1.0005, 0.001);
    }

    #[test]
    #[should_panic(expected = "left ≈ right")]
    fn test_approx_eq_fails() {
        assert_approx_eq!(1.0f32, 1.1, 0.001);
    }

    #[test]
    #[should_panic(expected = "left ≈ right")]
    fn test_approx_eq_fails_on_nan() {
        assert_approx_eq!(f32::NAN, 1.0, 0.001);
    }

    #[test]
    #[should_panic(expected = "not sorted")]
    fn test_sorted_fails() {
        assert_sorted!(&[3, 1, 2]);
    }

    #[test]
    #[should_panic(expected = "sequences differ")]
    fn test_sequence_fails() {
        assert_sequence!(vec![1, 2], [1, 3]);
    }
}
