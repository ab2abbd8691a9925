//! Mixed-radix addressing between flat cell numbers and multi-indices.
//!
//! Sweep results are dense row-major tensors; the parallel driver hands
//! each worker a flat cell number and these helpers translate it to the
//! per-axis indices of the parameter sets.

/// Row-major offset of `index` within a tensor of extents `shape`.
///
/// # Panics
///
/// Panics if the ranks differ or any index reaches past its extent.
pub fn flatten(shape: &[usize], index: &[usize]) -> usize {
    assert_eq!(shape.len(), index.len(), "rank mismatch");
    let mut flat = 0;
    for (&extent, &idx) in shape.iter().zip(index) {
        assert!(idx < extent, "index {idx} out of bounds for extent {extent}");
        flat = flat * extent + idx;
    }
    flat
}

/// Invert [`flatten`].
///
/// # Panics
///
/// Panics if `flat` reaches past the tensor's cell count.
pub fn unflatten(shape: &[usize], mut flat: usize) -> Vec<usize> {
    let mut index = vec![0; shape.len()];
    for (slot, &extent) in index.iter_mut().zip(shape).rev() {
        *slot = flat % extent;
        flat /= extent;
    }
    assert_eq!(flat, 0, "flat offset out of bounds for shape");
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_is_row_major() {
        assert_eq!(flatten(&[2, 3, 4], &[0, 0, 0]), 0);
        assert_eq!(flatten(&[2, 3, 4], &[0, 0, 1]), 1);
        assert_eq!(flatten(&[2, 3, 4], &[0, 1, 0]), 4);
        assert_eq!(flatten(&[2, 3, 4], &[1, 2, 3]), 23);
        assert_eq!(flatten(&[], &[]), 0);
    }

    #[test]
    fn every_cell_round_trips() {
        let shape = [3, 1, 4, 2];
        for flat in 0..shape.iter().product() {
            let index = unflatten(&shape, flat);
            assert_eq!(flatten(&shape, &index), flat);
        }
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn flatten_rejects_out_of_range_indices() {
        flatten(&[2, 3], &[1, 3]);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn unflatten_rejects_overflowing_offsets() {
        unflatten(&[2, 3], 6);
    }
}
