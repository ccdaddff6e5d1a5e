use std::collections::VecDeque;
use std::sync::Mutex;

use crate::physics::CollisionEvent;

/// A mutex-guarded FIFO of collision events (§4.5). Producer pushes at tick end
/// under the lock; consumer dequeues events whose timestep has become "ready"
/// relative to its own display tick.
pub struct CollisionQueue {
    inner: Mutex<VecDeque<CollisionEvent>>,
}

impl CollisionQueue {
    pub fn new() -> Self {
        CollisionQueue { inner: Mutex::new(VecDeque::new()) }
    }

    pub fn push_many(&self, events: impl IntoIterator<Item = CollisionEvent>) {
        let mut guard = self.inner.lock().unwrap();
        guard.extend(events);
    }

    /// Dequeues every event with `timestep < (display_tick + lookahead) * scale`
    /// (§4.5), in FIFO order.
    pub fn drain_ready(&self, display_tick: i64, lookahead: i64, scale: i64) -> Vec<CollisionEvent> {
        let cutoff = (display_tick + lookahead) * scale;
        let mut guard = self.inner.lock().unwrap();
        let mut ready = Vec::new();
        while let Some(front) = guard.front() {
            if front.timestep < cutoff {
                ready.push(guard.pop_front().unwrap());
            } else {
                break;
            }
        }
        ready
    }

    pub fn mutex(&self) -> &Mutex<VecDeque<CollisionEvent>> {
        &self.inner
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CollisionQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(timestep: i64) -> CollisionEvent {
        CollisionEvent { a: 0, b: 1, timestep, overlap_time: 0.1 }
    }

    #[test]
    fn test_push_and_len() {
        let q = CollisionQueue::new();
        q.push_many([event(1), event(2)]);
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn test_drain_ready_respects_cutoff() {
        let q = CollisionQueue::new();
        q.push_many([event(10), event(60), event(110)]);
        // scale=50, lookahead=0, display_tick=1 => cutoff=50
        let ready = q.drain_ready(1, 0, 50);
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].timestep, 10);
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn test_drain_ready_is_fifo() {
        let q = CollisionQueue::new();
        q.push_many([event(0), event(1), event(2)]);
        let ready = q.drain_ready(100, 0, 1);
        let timesteps: Vec<i64> = ready.iter().map(|e| e.timestep).collect();
        assert_eq!(timesteps, vec![0, 1, 2]);
    }
}
