use crate::machine::KpiMachine;
use crate::stagger::Stagger;

/// Fraction of the sentinel card that must be visible before the group fires.
pub const VISIBILITY_THRESHOLD: f64 = 0.18;

// Observers report ratios with a little float noise around the threshold.
const RATIO_SLACK: f64 = 1e-3;

/// Fires the KPI group at most once per page load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GroupTrigger {
    fired: bool,
}

impl GroupTrigger {
    pub fn new() -> Self {
        GroupTrigger::default()
    }

    /// Returns `true` the first time only.
    pub fn fire(&mut self) -> bool {
        if self.fired {
            return false;
        }
        self.fired = true;
        true
    }

    /// Fire and arm every card with the stagger delay of its sibling index.
    /// Indices count every card in the group, including ones that were
    /// skipped, so gaps keep their slot. Returns the `(index, delay)`
    /// schedule, empty when the trigger already fired.
    pub fn fire_into<'a, I>(&mut self, cards: I, now_ms: f64, stagger: Stagger) -> Vec<(usize, u32)>
    where
        I: IntoIterator<Item = (usize, &'a mut KpiMachine)>,
    {
        if !self.fire() {
            return Vec::new();
        }
        cards
            .into_iter()
            .filter_map(|(i, card)| {
                let delay = stagger.delay_for(i);
                card.arm(now_ms, delay).then_some((i, delay))
            })
            .collect()
    }
}

/// Whether an observer entry counts as "in view".
pub fn crosses_threshold(is_intersecting: bool, ratio: f64, threshold: f64) -> bool {
    is_intersecting && ratio + RATIO_SLACK >= threshold
}

/// Setup-time fallback: the sentinel's top edge is already above the bottom
/// of the viewport. `rect_top` is relative to the viewport.
pub fn in_view_on_load(scroll_y: f64, viewport_h: f64, rect_top: f64) -> bool {
    let doc_top = rect_top + scroll_y;
    scroll_y + viewport_h >= doc_top
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LandingConfig;
    use crate::machine::KpiPhase;

    fn cards(n: usize) -> Vec<KpiMachine> {
        let cfg = LandingConfig::default();
        (0..n)
            .map(|i| KpiMachine::from_config(10.0 * i as f64, &cfg))
            .collect()
    }

    #[test]
    fn fires_once() {
        let mut t = GroupTrigger::new();
        assert!(t.fire());
        assert!(!t.fire());
        assert!(!t.fire());
    }

    #[test]
    fn fire_into_arms_cards_in_dom_order() {
        let mut t = GroupTrigger::new();
        let mut group = cards(4);
        let sched = t.fire_into(group.iter_mut().enumerate(), 500.0, Stagger::default());
        assert_eq!(sched, vec![(0, 0), (1, 120), (2, 240), (3, 360)]);
        assert!(
            t.fire_into(group.iter_mut().enumerate(), 900.0, Stagger::default())
                .is_empty()
        );
    }

    #[test]
    fn skipped_cards_keep_their_slot() {
        // DOM order: card 0, card 1 without a ring (skipped), card 2
        let mut t = GroupTrigger::new();
        let mut group = cards(2);
        let indexed = [0usize, 2].into_iter().zip(group.iter_mut());
        let sched = t.fire_into(indexed, 0.0, Stagger::default());
        assert_eq!(sched, vec![(0, 0), (2, 240)]);
        assert_eq!(group[1].phase(), KpiPhase::Armed { start_at_ms: 240.0 });
    }

    #[test]
    fn each_card_starts_within_one_frame_of_its_slot() {
        const FRAME: f64 = 16.7;
        let mut t = GroupTrigger::new();
        let mut group = cards(5);
        let fired_at = 1000.0;
        t.fire_into(group.iter_mut().enumerate(), fired_at, Stagger::default());

        let mut started = vec![None; group.len()];
        let mut now = fired_at;
        while started.iter().any(Option::is_none) {
            for (i, card) in group.iter_mut().enumerate() {
                if started[i].is_none() && card.start(now).is_some() {
                    started[i] = Some(now);
                }
            }
            now += FRAME;
        }
        for (i, at) in started.into_iter().enumerate() {
            let at = at.unwrap() - fired_at;
            let slot = 120.0 * i as f64;
            assert!(at >= slot, "card {i} started early at {at}");
            assert!(at <= slot + FRAME, "card {i} started late at {at}");
        }
    }

    #[test]
    fn threshold_check() {
        assert!(crosses_threshold(true, 0.18, VISIBILITY_THRESHOLD));
        assert!(crosses_threshold(true, 0.1795, VISIBILITY_THRESHOLD));
        assert!(crosses_threshold(true, 1.0, VISIBILITY_THRESHOLD));
        assert!(!crosses_threshold(true, 0.05, VISIBILITY_THRESHOLD));
        assert!(!crosses_threshold(false, 0.5, VISIBILITY_THRESHOLD));
    }

    #[test]
    fn fallback_visibility() {
        // sentinel 300px below the fold
        assert!(!in_view_on_load(0.0, 800.0, 1100.0));
        assert!(in_view_on_load(0.0, 800.0, 600.0));
        // restored scroll position already past the grid
        assert!(in_view_on_load(2000.0, 800.0, -400.0));
        assert!(in_view_on_load(0.0, 800.0, 800.0));
    }
}
