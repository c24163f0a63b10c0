//! Custom assertion macros

/// Assert that a result is ok and return the value
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $message:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $message, e),
        }
    };
}

/// Assert that a result is an error, optionally of a given shape
macro_rules! assert_err {
    ($result:expr) => {
        assert!($result.is_err(), "Expected Err, got Ok");
    };
    ($result:expr, $pattern:pat) => {
        match $result {
            Err($pattern) => {}
            Ok(value) => panic!("Expected Err, got Ok: {:?}", value),
            Err(e) => panic!("Expected different error variant, got: {:?}", e),
        }
    };
}

/// Assert that message ids form the contiguous range `first..=last`
macro_rules! assert_ids {
    ($messages:expr, $first:expr, $last:expr) => {
        let ids: Vec<u64> = $messages.iter().map(|m| m.id).collect();
        let expected: Vec<u64> = ($first..=$last).collect();
        pretty_assertions::assert_eq!(ids, expected);
    };
}
