//! Helpers for ordering competitors before a bracket is generated.
//!
//! A [`SingleElimination`] bracket treats its input as ordered by seed and never reorders it.
//! These functions produce and adjust that order.
//!
//! [`SingleElimination`]: crate::SingleElimination
use crate::Competitor;

/// Returns the standard bracket order of the seeds `1..=size`.
///
/// Neighbouring seeds in the returned order meet in the first round. The order places the
/// top seeds as far apart as possible, so seed 1 and 2 can only meet in the final.
///
/// `size` must be a power of two. Returns an empty order for `0`.
///
/// # Examples
///
/// ```
/// # use easybracket_core::seeding::standard_order;
/// assert_eq!(standard_order(8), vec![1, 8, 4, 5, 2, 7, 3, 6]);
/// ```
pub fn standard_order(size: usize) -> Vec<usize> {
    debug_assert!(size == 0 || size.is_power_of_two());

    if size == 0 {
        return Vec::new();
    }

    let mut order = Vec::with_capacity(size);
    order.push(1);

    while order.len() < size {
        // Every seed is paired with the seed that sums up to the next field size plus one.
        let sum = order.len() * 2 + 1;
        order = order
            .into_iter()
            .flat_map(|seed| [seed, sum - seed])
            .collect();
    }

    order
}

/// Sorts the competitors by their seed rank. Unseeded competitors are placed after all seeded
/// ones. The sort is stable.
pub fn sort_by_seed(competitors: &mut [Competitor]) {
    competitors.sort_by_key(|competitor| (competitor.seed.is_none(), competitor.seed));
}

/// Assigns the seed rank of every competitor from its current position.
pub fn assign_seeds(competitors: &mut [Competitor]) {
    for (index, competitor) in competitors.iter_mut().enumerate() {
        competitor.seed = Some(index as u32 + 1);
    }
}

/// Moves the element at `index` one position up. Returns `false` if the element is already
/// first or `index` is out-of-bounds.
pub fn move_up<T>(list: &mut [T], index: usize) -> bool {
    if index == 0 || index >= list.len() {
        return false;
    }

    list.swap(index, index - 1);
    true
}

/// Moves the element at `index` one position down. Returns `false` if the element is already
/// last or `index` is out-of-bounds.
pub fn move_down<T>(list: &mut [T], index: usize) -> bool {
    if index >= list.len().saturating_sub(1) {
        return false;
    }

    list.swap(index, index + 1);
    true
}
