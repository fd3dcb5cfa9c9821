//! Greedy, capped dead reckoning toward pickup targets
//!
//! The agent moves on a plane in fixed steps: forward along +y, left and
//! right along x. There is no obstacle model and no turning; each axis is
//! closed independently, lateral first, with at most
//! `max_steps_per_axis` inserted steps per axis.

use geo::{EuclideanDistance, Point};

use crate::core::config::ExpansionConfig;
use crate::core::types::{Action, Position, RawAction};

/// Expands a raw action list using the configured geometry
pub struct SequenceExpander<'a> {
    config: &'a ExpansionConfig,
}

impl<'a> SequenceExpander<'a> {
    pub fn new(config: &'a ExpansionConfig) -> Self {
        Self { config }
    }

    /// Expand `actions`, approaching `targets` in nearest-first order
    ///
    /// Each target is claimed by at most one pickup. Malformed entries are
    /// copied through and never move the agent.
    pub fn expand(&self, actions: &[RawAction], targets: &[Position]) -> Vec<RawAction> {
        let cfg = self.config;
        let mut expanded = Vec::with_capacity(actions.len());
        let mut position = Point::new(cfg.origin[0], cfg.origin[1]);
        let mut claimed = vec![false; targets.len()];

        for (i, entry) in actions.iter().enumerate() {
            expanded.push(entry.clone());
            self.advance(&mut position, entry);

            let next_is_pickup = actions
                .get(i + 1)
                .is_some_and(|next| next.is(&cfg.pickup_action));
            if !next_is_pickup {
                continue;
            }

            let before = expanded.len();
            match claim_nearest(position, targets, &mut claimed) {
                Some(target) => self.approach(&mut position, target, &mut expanded),
                None if entry.is(&cfg.scan_action) => {
                    for _ in 0..cfg.legacy_approach_steps {
                        self.push_move(&mut position, &cfg.forward_action, &mut expanded);
                    }
                }
                None => {}
            }

            tracing::debug!(
                "Inserted {} movement action(s) before pickup at index {}",
                expanded.len() - before,
                i + 1
            );
        }

        expanded
    }

    /// Close the lateral gap, then the forward gap
    fn approach(&self, position: &mut Position, target: Position, out: &mut Vec<RawAction>) {
        let cfg = self.config;

        let dx = target.x() - position.x();
        if dx.abs() > cfg.alignment_threshold {
            let lateral = if dx > 0.0 {
                &cfg.right_action
            } else {
                &cfg.left_action
            };
            for _ in 0..cfg.max_steps_per_axis {
                self.push_move(position, lateral, out);
                if (target.x() - position.x()).abs() <= cfg.arrival_tolerance {
                    break;
                }
            }
        }

        // Forward is the only longitudinal move, so a target behind the
        // agent is left alone on this axis.
        let dy = target.y() - position.y();
        if dy > cfg.alignment_threshold {
            for _ in 0..cfg.max_steps_per_axis {
                self.push_move(position, &cfg.forward_action, out);
                if (target.y() - position.y()).abs() <= cfg.arrival_tolerance {
                    break;
                }
            }
        }
    }

    fn push_move(&self, position: &mut Position, name: &str, out: &mut Vec<RawAction>) {
        let action = RawAction::Token(Action::new(name));
        self.advance(position, &action);
        out.push(action);
    }

    /// Apply the displacement of one action, if it is a movement
    fn advance(&self, position: &mut Position, entry: &RawAction) {
        let cfg = self.config;
        let step = cfg.step_size;

        let delta = if entry.is(&cfg.forward_action) {
            Point::new(0.0, step)
        } else if entry.is(&cfg.left_action) {
            Point::new(-step, 0.0)
        } else if entry.is(&cfg.right_action) {
            Point::new(step, 0.0)
        } else {
            return;
        };

        *position = *position + delta;
    }
}

/// Claim the unclaimed target closest to `position`
fn claim_nearest(position: Position, targets: &[Position], claimed: &mut [bool]) -> Option<Position> {
    let (index, target) = targets
        .iter()
        .enumerate()
        .filter(|(i, _)| !claimed[*i])
        .min_by(|(_, a), (_, b)| {
            position
                .euclidean_distance(*a)
                .total_cmp(&position.euclidean_distance(*b))
        })?;

    claimed[index] = true;
    Some(*target)
}
