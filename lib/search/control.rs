use crate::search::{Limits, Score};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Controls the search flow.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ControlFlow {
    /// Continue searching.
    Continue,
    /// Do not start another iteration.
    Stop,
    /// Interrupt searching immediately.
    Abort,
}

/// A shareable handle that asks an ongoing search to stop.
#[derive(Debug, Default, Clone)]
pub struct Stopper(Arc<AtomicBool>);

impl Stopper {
    /// Requests the search to stop as soon as possible.
    #[inline(always)]
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Clears a previous stop request.
    #[inline(always)]
    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }

    /// Whether a stop was requested.
    #[inline(always)]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// The search control.
#[derive(Debug)]
pub struct Control<'a> {
    stopper: &'a Stopper,
    limits: Limits,
    budget: Duration,
    timestamp: Instant,
    nodes: u64,
}

impl<'a> Control<'a> {
    /// Sets up the controller for a new search.
    #[inline(always)]
    pub fn new(stopper: &'a Stopper, limits: Limits) -> Self {
        Control {
            stopper,
            budget: limits.max_time(),
            limits,
            timestamp: Instant::now(),
            nodes: 0,
        }
    }

    /// The time elapsed so far.
    #[inline(always)]
    pub fn elapsed(&self) -> Duration {
        Instant::now()
            .saturating_duration_since(self.timestamp)
            .max(Duration::from_nanos(1))
    }

    /// The nodes visited so far.
    #[inline(always)]
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Whether a stop was requested from outside.
    #[inline(always)]
    pub fn is_stopped(&self) -> bool {
        self.stopper.is_stopped()
    }

    /// Counts a node and decides whether the search may expand it.
    #[inline(always)]
    pub fn check(&mut self) -> ControlFlow {
        if self.stopper.is_stopped() || self.nodes >= self.limits.max_nodes() {
            return ControlFlow::Abort;
        }

        self.nodes += 1;
        if self.elapsed() >= self.budget {
            return ControlFlow::Abort;
        }

        ControlFlow::Continue
    }

    /// Decides whether another iteration is worth starting.
    ///
    /// `ahead` banks time by settling for a smaller share of the budget.
    pub fn iterate(&self, score: Score, ahead: bool) -> ControlFlow {
        if score.is_mate() {
            return ControlFlow::Stop;
        } else if self.budget == Duration::MAX {
            return ControlFlow::Continue;
        }

        let elapsed = self.elapsed();
        let share = if ahead { 3 } else { 2 };
        if elapsed > self.budget / share {
            return ControlFlow::Stop;
        }

        let remaining = self.budget.saturating_sub(elapsed);
        if elapsed.saturating_mul(4) > remaining {
            return ControlFlow::Stop;
        }

        ControlFlow::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::Ply;
    use std::thread;
    use test_strategy::proptest;

    #[proptest]
    fn measures_time_elapsed(l: Limits) {
        let stopper = Stopper::default();
        let ctrl = Control::new(&stopper, l);
        let duration = Duration::from_millis(1);
        thread::sleep(duration);
        assert!(ctrl.elapsed() >= duration);
    }

    #[proptest]
    fn time_elapsed_is_always_positive(l: Limits) {
        let stopper = Stopper::default();
        let ctrl = Control::new(&stopper, l);
        assert!(ctrl.elapsed() > Duration::ZERO);
    }

    #[test]
    fn aborts_if_time_is_up() {
        let stopper = Stopper::default();
        let mut ctrl = Control::new(&stopper, Limits::time(Duration::ZERO));
        assert_eq!(ctrl.check(), ControlFlow::Abort);
        assert_eq!(ctrl.check(), ControlFlow::Abort);
    }

    #[proptest]
    fn counts_nodes_searched(#[strategy(1u64..)] n: u64) {
        let stopper = Stopper::default();
        let mut ctrl = Control::new(&stopper, Limits::nodes(n));
        assert_eq!(ctrl.nodes(), 0);
        assert_eq!(ctrl.check(), ControlFlow::Continue);
        assert_eq!(ctrl.nodes(), 1);
    }

    #[test]
    fn aborts_if_node_count_is_reached() {
        let stopper = Stopper::default();
        let mut ctrl = Control::new(&stopper, Limits::nodes(1));
        assert_eq!(ctrl.check(), ControlFlow::Continue);
        assert_eq!(ctrl.check(), ControlFlow::Abort);
        assert_eq!(ctrl.check(), ControlFlow::Abort);
    }

    #[test]
    fn aborts_upon_request() {
        let stopper = Stopper::default();
        let mut ctrl = Control::new(&stopper, Limits::none());
        assert_eq!(ctrl.check(), ControlFlow::Continue);
        stopper.stop();
        assert_eq!(ctrl.check(), ControlFlow::Abort);
        stopper.reset();
        assert_eq!(ctrl.check(), ControlFlow::Continue);
    }

    #[proptest]
    fn stops_iterating_once_mate_is_found(#[strategy(0..16u16)] p: Ply, ahead: bool) {
        let stopper = Stopper::default();
        let ctrl = Control::new(&stopper, Limits::none());
        assert_eq!(ctrl.iterate(Score::mating(p), ahead), ControlFlow::Stop);
        assert_eq!(ctrl.iterate(Score::mated(p), ahead), ControlFlow::Stop);
    }

    #[proptest]
    fn keeps_iterating_without_a_time_budget(
        #[filter(!#s.is_mate())] s: Score,
        ahead: bool,
    ) {
        let stopper = Stopper::default();
        let ctrl = Control::new(&stopper, Limits::depth(5));
        assert_eq!(ctrl.iterate(s, ahead), ControlFlow::Continue);
    }

    #[test]
    fn stops_iterating_once_the_budget_is_spent() {
        let stopper = Stopper::default();
        let ctrl = Control::new(&stopper, Limits::time(Duration::from_millis(2)));
        thread::sleep(Duration::from_millis(2));
        assert_eq!(ctrl.iterate(Score::DRAW, false), ControlFlow::Stop);
    }

    #[test]
    fn stops_iterating_if_next_depth_would_not_fit() {
        let stopper = Stopper::default();
        let ctrl = Control::new(&stopper, Limits::time(Duration::from_millis(40)));
        thread::sleep(Duration::from_millis(10));
        assert_eq!(ctrl.iterate(Score::DRAW, false), ControlFlow::Stop);
    }

    #[test]
    fn keeps_iterating_early_in_a_generous_budget() {
        let stopper = Stopper::default();
        let ctrl = Control::new(&stopper, Limits::time(Duration::from_secs(3600)));
        assert_eq!(ctrl.iterate(Score::DRAW, true), ControlFlow::Continue);
    }
}
