/// Asserts that every height sample of a terrain equals the given value.
#[macro_export]
macro_rules! assert_heights_all {
    ($terrain:expr, $value:expr) => {
        let heights = &$terrain.heights;
        for (i, h) in heights.as_slice().iter().enumerate() {
            assert_eq!(
                *h, $value,
                "Height sample {} is {} instead of {}",
                i, h, $value
            );
        }
    };
}

/// Asserts that a terrain carries exactly the given number of tree instances.
#[macro_export]
macro_rules! assert_tree_count {
    ($terrain:expr, $count:expr) => {
        assert_eq!(
            $terrain.instances.len(),
            $count,
            "Tree instance count mismatch"
        );
    };
}
