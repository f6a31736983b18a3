#![forbid(unsafe_code)]

pub use init_tracing::init_test_tracing;
pub use pretty_assertions;

pub mod fixtures;

mod init_tracing;

/// Workaround for `pretty_assertions::assert_eq` arguments appearing
/// in a (slightly?) unnatural order. The _expected_ expression ideally comes first,
/// in order to show the most sensible colored diff.
/// This macro makes expected and actual explicit, and supports any order by using keyword arguments.
#[macro_export]
macro_rules! expect_eq {
    (expected = $expected:expr, actual = $actual:expr $(,)?) => {
        $crate::pretty_assertions::assert_eq!($expected, $actual);
    };
    (actual = $actual:expr, expected = $expected:expr $(,)?) => {
        $crate::pretty_assertions::assert_eq!($expected, $actual);
    };
}

/// Assert that a `Result` is an error whose display output matches `$msg`.
#[macro_export]
macro_rules! assert_error_msg {
    ($e:expr, $msg:expr) => {
        match $e {
            Ok(v) => panic!("Expected error, was Ok({v:?})"),
            Err(e) => $crate::pretty_assertions::assert_eq!($msg, format!("{e}").trim()),
        }
    };
}
