//! Reverse a stretch of one route.

use super::{Candidate, Move};

pub(super) fn collect(routes: &[Vec<usize>], found: &mut Vec<Candidate>) {
    for (vehicle, route) in routes.iter().enumerate() {
        for start in 0..route.len() {
            for end in start + 1..route.len() {
                let mut reversed = route.clone();
                if let Some(stretch) = reversed.get_mut(start..=end) {
                    stretch.reverse();
                }
                found.push(Candidate {
                    kind: Move::TwoOpt {
                        vehicle,
                        start,
                        end,
                    },
                    moved: route.get(start..=end).map(<[usize]>::to_vec).unwrap_or_default(),
                    changes: vec![(vehicle, reversed)],
                });
            }
        }
    }
}
