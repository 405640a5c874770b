//! Position arithmetic for the post-order MMR layout.
//!
//! Every function here works on sizes and positions only; none of them touch
//! a store. The running example used in the docs is an MMR with 11 leaves
//! (size 19):
//!
//! ```text
//!           14
//!        /       \
//!      6          13
//!    /   \       /   \
//!   2     5     9     12     17
//!  / \   /  \  / \   /  \   /  \
//! 0   1 3   4 7   8 10  11 15  16 18
//! ```

/// Convert a 0-based leaf index to its MMR position.
///
/// # Safety (arithmetic)
///
/// Overflows when `index >= 2^63 - 1`. Callers must validate indices
/// before calling (e.g. check `index < mmr_size_to_leaf_count(mmr_size)`).
pub fn leaf_index_to_pos(index: u64) -> u64 {
    // size after this leaf, minus the merges it triggers, minus itself
    leaf_index_to_mmr_size(index) - (index + 1).trailing_zeros() as u64 - 1
}

/// Compute the MMR size after inserting `index + 1` leaves.
///
/// # Safety (arithmetic)
///
/// Overflows when `index >= 2^63 - 1` because `2 * leaves_count` exceeds
/// `u64::MAX`.
pub fn leaf_index_to_mmr_size(index: u64) -> u64 {
    let leaves_count = index + 1;
    // one peak per set bit of the leaf count
    let peak_count = leaves_count.count_ones() as u64;
    2 * leaves_count - peak_count
}

/// Return the height of the node at `pos`.
///
/// Leaf positions have height 0; internal nodes have height > 0.
pub fn pos_height_in_tree(mut pos: u64) -> u8 {
    if pos == 0 {
        return 0;
    }

    let mut peak_size = u64::MAX >> pos.leading_zeros();
    while peak_size > 0 {
        if pos >= peak_size {
            pos -= peak_size;
        }
        peak_size >>= 1;
    }
    pos as u8
}

/// Returns the heights of the peaks in the MMR as a bitmap.
///
/// For the 11-leaf example (size 19) this is `0b1011`: peaks at heights 3, 1
/// and 0. Numerically the bitmap equals the leaf count.
///
/// When `mmr_size` is not reachable by pushes, the bitmap of the largest
/// valid prefix is returned (size 6 yields `0b11`, the map of size 4).
pub fn get_peak_map(mmr_size: u64) -> u64 {
    if mmr_size == 0 {
        return 0;
    }

    let mut remaining = mmr_size;
    let mut peak_size = u64::MAX >> remaining.leading_zeros();
    let mut peak_map = 0;
    while peak_size > 0 {
        peak_map <<= 1;
        if remaining >= peak_size {
            remaining -= peak_size;
            peak_map |= 1;
        }
        peak_size >>= 1;
    }

    peak_map
}

/// Returns the positions of the peaks, left to right.
///
/// For the 11-leaf example (size 19) this is `[14, 17, 18]`. As with
/// [`get_peak_map`], an unreachable size yields the peaks of the largest
/// valid prefix (size 6 yields `[2, 3]`).
pub fn get_peaks(mmr_size: u64) -> Vec<u64> {
    if mmr_size == 0 {
        return vec![];
    }

    let leading_zeros = mmr_size.leading_zeros();
    let mut remaining = mmr_size;
    let mut peak_size = u64::MAX >> leading_zeros;
    let mut peaks = Vec::with_capacity(64 - leading_zeros as usize);
    let mut peaks_sum = 0;
    while peak_size > 0 {
        if remaining >= peak_size {
            remaining -= peak_size;
            peaks.push(peaks_sum + peak_size - 1);
            peaks_sum += peak_size;
        }
        peak_size >>= 1;
    }
    peaks
}

/// Whether some sequence of pushes produces an MMR of exactly `mmr_size`
/// positions.
///
/// Valid sizes decompose into perfect subtrees with nothing left over:
/// 0, 1, 3, 4, 7, 8, 10, 11, 15, ...
pub fn is_valid_mmr_size(mmr_size: u64) -> bool {
    if mmr_size == 0 {
        return true;
    }

    let mut remaining = mmr_size;
    let mut peak_size = u64::MAX >> remaining.leading_zeros();
    while peak_size > 0 {
        if remaining >= peak_size {
            remaining -= peak_size;
        }
        peak_size >>= 1;
    }
    remaining == 0
}

/// Build the storage key for an MMR element at a given position.
///
/// Format: raw u64 big-endian (8 bytes), so lexicographic key order in a
/// key-value store matches position order.
pub fn mmr_node_key(pos: u64) -> [u8; 8] {
    pos.to_be_bytes()
}

/// Returns the number of merges pushing one more leaf triggers, given the
/// current leaf count.
///
/// Root bagging is not included.
pub fn merge_count_for_push(leaf_count: u64) -> u32 {
    leaf_count.trailing_ones()
}

/// Derive the number of leaves from `mmr_size`.
pub fn mmr_size_to_leaf_count(mmr_size: u64) -> u64 {
    get_peak_map(mmr_size)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_get_peaks() {
        assert_eq!(get_peaks(0), Vec::<u64>::new());
        assert_eq!(get_peaks(1), vec![0]);
        assert_eq!(get_peaks(3), vec![2]);
        assert_eq!(get_peaks(4), vec![2, 3]);
        assert_eq!(get_peaks(7), vec![6]);
        assert_eq!(get_peaks(8), vec![6, 7]);
        assert_eq!(get_peaks(10), vec![6, 9]);
        assert_eq!(get_peaks(11), vec![6, 9, 10]);
        assert_eq!(get_peaks(19), vec![14, 17, 18]);
    }

    #[test]
    fn test_get_peaks_invalid_size() {
        assert_eq!(get_peaks(2), vec![0]);
        assert_eq!(get_peaks(6), vec![2, 3]);
    }

    #[test]
    fn test_get_peak_map() {
        assert_eq!(get_peak_map(0), 0);
        assert_eq!(get_peak_map(1), 0b1);
        assert_eq!(get_peak_map(3), 0b10);
        assert_eq!(get_peak_map(4), 0b11);
        assert_eq!(get_peak_map(7), 0b100);
        assert_eq!(get_peak_map(19), 0b1011);
        assert_eq!(get_peak_map(6), 0b11);
    }

    #[test]
    fn test_pos_height_in_tree() {
        let heights = [0, 0, 1, 0, 0, 1, 2, 0, 0, 1, 0, 0, 1, 2, 3, 0, 0, 1, 0];
        for (pos, height) in heights.iter().enumerate() {
            assert_eq!(pos_height_in_tree(pos as u64), *height, "pos {}", pos);
        }
    }

    #[test]
    fn test_leaf_index_conversions() {
        let positions = [0, 1, 3, 4, 7, 8, 10, 11, 15, 16, 18];
        for (index, pos) in positions.iter().enumerate() {
            assert_eq!(leaf_index_to_pos(index as u64), *pos);
        }
        assert_eq!(leaf_index_to_mmr_size(0), 1);
        assert_eq!(leaf_index_to_mmr_size(1), 3);
        assert_eq!(leaf_index_to_mmr_size(2), 4);
        assert_eq!(leaf_index_to_mmr_size(3), 7);
        assert_eq!(leaf_index_to_mmr_size(10), 19);
    }

    #[test]
    fn test_is_valid_mmr_size() {
        let valid = [0, 1, 3, 4, 7, 8, 10, 11, 15, 16, 18, 19];
        for size in 0..20 {
            assert_eq!(is_valid_mmr_size(size), valid.contains(&size), "size {}", size);
        }
    }

    #[test]
    fn test_merge_count_for_push() {
        assert_eq!(merge_count_for_push(0), 0);
        assert_eq!(merge_count_for_push(1), 1);
        assert_eq!(merge_count_for_push(2), 0);
        assert_eq!(merge_count_for_push(3), 2);
        assert_eq!(merge_count_for_push(4), 0);
        assert_eq!(merge_count_for_push(7), 3);
    }

    #[test]
    fn test_mmr_size_to_leaf_count() {
        assert_eq!(mmr_size_to_leaf_count(0), 0);
        assert_eq!(mmr_size_to_leaf_count(1), 1);
        assert_eq!(mmr_size_to_leaf_count(3), 2);
        assert_eq!(mmr_size_to_leaf_count(4), 3);
        assert_eq!(mmr_size_to_leaf_count(7), 4);
        assert_eq!(mmr_size_to_leaf_count(19), 11);
    }

    #[test]
    fn test_mmr_node_key_orders_like_positions() {
        assert_eq!(mmr_node_key(1), [0, 0, 0, 0, 0, 0, 0, 1]);
        assert!(mmr_node_key(255) < mmr_node_key(256));
    }

    proptest! {
        #[test]
        fn peaks_follow_peak_map(leaf_count in 1u64..1_000_000) {
            let size = leaf_index_to_mmr_size(leaf_count - 1);
            let peaks = get_peaks(size);
            let peak_map = get_peak_map(size);

            prop_assert!(is_valid_mmr_size(size));
            prop_assert_eq!(peak_map, leaf_count);
            prop_assert_eq!(peaks.len() as u32, peak_map.count_ones());
            prop_assert!(peaks.windows(2).all(|w| w[0] < w[1]));
            prop_assert_eq!(*peaks.last().unwrap(), size - 1);
            // the leftmost peak is the tallest one
            prop_assert_eq!(
                pos_height_in_tree(peaks[0]) as u32,
                63 - peak_map.leading_zeros()
            );
        }
    }
}
