// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Range slicing
//!
//! A range `[start_id, end_id]` (inclusive) is cut into
//! `(end_id - start_id) / unit + 1` partitions. Partition `i` starts at
//! `start_id + i * unit` and ends `unit - 1` ids later, except the last one,
//! which is clipped to `end_id`. Division truncates toward zero; inverted
//! ranges and non-positive units are rejected rather than given a meaning.

use std::iter::FusedIterator;

use crate::{GeneratorError, Result};

/// Inclusive sub-interval of a range, materialized as one manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Partition {
    pub start: i64,
    pub end: i64,
}

impl Partition {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Number of ids covered
    pub fn len(&self) -> u64 {
        (self.end as i128 - self.start as i128 + 1) as u64
    }

    /// Never true for partitions produced by [`partitions`]
    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    pub fn contains(&self, id: i64) -> bool {
        self.start <= id && id <= self.end
    }
}

fn check_bounds(start_id: i64, end_id: i64, unit: i64) -> Result<()> {
    if unit <= 0 {
        return Err(GeneratorError::InvalidUnit(unit));
    }
    if end_id < start_id {
        return Err(GeneratorError::InvertedRange { start_id, end_id });
    }
    Ok(())
}

/// Number of partitions for a range
pub fn partition_count(start_id: i64, end_id: i64, unit: i64) -> Result<usize> {
    check_bounds(start_id, end_id, unit)?;

    let span = end_id as i128 - start_id as i128;
    let count = span / unit as i128 + 1;
    usize::try_from(count).map_err(|_| GeneratorError::PartitionOverflow {
        start_id,
        end_id,
        unit,
    })
}

/// Lazily enumerate the partitions of a range, in ascending order
pub fn partitions(start_id: i64, end_id: i64, unit: i64) -> Result<Partitions> {
    let remaining = partition_count(start_id, end_id, unit)?;
    Ok(Partitions {
        next_start: start_id as i128,
        end_id,
        unit,
        remaining,
    })
}

/// Iterator returned by [`partitions`]
#[derive(Debug, Clone)]
pub struct Partitions {
    // i128 so `start + unit` cannot overflow near i64::MAX
    next_start: i128,
    end_id: i64,
    unit: i64,
    remaining: usize,
}

impl Iterator for Partitions {
    type Item = Partition;

    fn next(&mut self) -> Option<Partition> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let start = self.next_start;
        let end = (start + self.unit as i128 - 1).min(self.end_id as i128);
        self.next_start += self.unit as i128;

        Some(Partition::new(start as i64, end as i64))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Partitions {}

impl FusedIterator for Partitions {}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn collect(start_id: i64, end_id: i64, unit: i64) -> Vec<(i64, i64)> {
        partitions(start_id, end_id, unit)
            .unwrap()
            .map(|p| (p.start, p.end))
            .collect()
    }

    #[test]
    fn test_last_partition_is_clipped() {
        assert_eq!(collect(0, 99, 40), vec![(0, 39), (40, 79), (80, 99)]);
    }

    #[test]
    fn test_exact_multiple() {
        assert_eq!(collect(0, 79, 40), vec![(0, 39), (40, 79)]);
        assert_eq!(partition_count(0, 79, 40).unwrap(), 2);
    }

    #[test]
    fn test_single_id_range() {
        assert_eq!(collect(5, 5, 40), vec![(5, 5)]);
    }

    #[test]
    fn test_unit_of_one() {
        assert_eq!(collect(3, 6, 1), vec![(3, 3), (4, 4), (5, 5), (6, 6)]);
    }

    #[test]
    fn test_negative_ids() {
        assert_eq!(collect(-10, 3, 5), vec![(-10, -6), (-5, -1), (0, 3)]);
    }

    #[test]
    fn test_range_at_i64_max_does_not_overflow() {
        let parts = collect(i64::MAX - 4, i64::MAX, 3);
        assert_eq!(parts, vec![(i64::MAX - 4, i64::MAX - 2), (i64::MAX - 1, i64::MAX)]);
    }

    #[test]
    fn test_zero_unit_rejected() {
        assert!(matches!(partition_count(0, 9, 0), Err(GeneratorError::InvalidUnit(0))));
        assert!(matches!(partitions(0, 9, -2), Err(GeneratorError::InvalidUnit(-2))));
    }

    #[test]
    fn test_inverted_range_rejected() {
        assert!(matches!(
            partition_count(10, 9, 40),
            Err(GeneratorError::InvertedRange { start_id: 10, end_id: 9 })
        ));
    }

    #[test]
    fn test_exact_size() {
        let iter = partitions(0, 99, 40).unwrap();
        assert_eq!(iter.len(), 3);
    }

    #[test]
    fn test_partition_len_and_contains() {
        let partition = Partition::new(80, 99);
        assert_eq!(partition.len(), 20);
        assert!(!partition.is_empty());
        assert!(partition.contains(80));
        assert!(partition.contains(99));
        assert!(!partition.contains(100));
    }

    proptest! {
        #[test]
        fn partitions_tile_the_range(
            start_id in -1_000_000i64..1_000_000,
            span in 0i64..5_000,
            unit in 1i64..600,
        ) {
            let end_id = start_id + span;
            let parts: Vec<Partition> = partitions(start_id, end_id, unit).unwrap().collect();

            prop_assert_eq!(parts.len(), partition_count(start_id, end_id, unit).unwrap());
            prop_assert_eq!(parts.len() as i64, span / unit + 1);
            prop_assert_eq!(parts.first().unwrap().start, start_id);
            prop_assert_eq!(parts.last().unwrap().end, end_id);

            for pair in parts.windows(2) {
                // contiguous: no gap, no overlap
                prop_assert_eq!(pair[1].start, pair[0].end + 1);
            }
            for part in &parts[..parts.len() - 1] {
                prop_assert_eq!(part.len(), unit as u64);
            }
            let last = parts.last().unwrap();
            prop_assert!(last.len() >= 1 && last.len() <= unit as u64);
        }

        #[test]
        fn partitions_never_exceed_end(
            start_id in any::<i64>(),
            unit in 1i64..i64::MAX,
        ) {
            let end_id = start_id.saturating_add(unit / 2);
            for part in partitions(start_id, end_id, unit).unwrap() {
                prop_assert!(part.end <= end_id);
                prop_assert!(part.start <= part.end);
            }
        }
    }
}
