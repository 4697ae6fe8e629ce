use crate::search::{Depth, MAX_DEPTH};

/// Two moves per remaining depth that recently caused a beta cutoff.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Killers<M> {
    slots: Box<[[Option<M>; 2]]>,
}

impl<M: Clone> Default for Killers<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Clone> Killers<M> {
    /// An empty table covering depths `0..=MAX_DEPTH`.
    pub fn new() -> Self {
        Killers {
            slots: vec![[None, None]; MAX_DEPTH as usize + 1].into_boxed_slice(),
        }
    }

    /// Forgets every recorded move.
    #[inline(always)]
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = [None, None]);
    }

    /// The killers at `depth`, most recent first.
    #[inline(always)]
    pub fn get(&self, depth: Depth) -> [Option<&M>; 2] {
        match self.slots.get(depth as usize) {
            None => [None, None],
            Some([a, b]) => [a.as_ref(), b.as_ref()],
        }
    }
}

impl<M: Clone + Eq> Killers<M> {
    /// Records a cutoff move at `depth`, pushing the previous first slot to the second.
    #[inline(always)]
    pub fn record(&mut self, m: M, depth: Depth) {
        let Some(slot) = self.slots.get_mut(depth as usize) else {
            return;
        };

        if slot[0].as_ref() != Some(&m) {
            slot[1] = slot[0].replace(m);
        }
    }
}
