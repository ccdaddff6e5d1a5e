use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex};

use slotmap::{new_key_type, SlotMap};
use tracing::trace;

use crate::particle::ParticleId;
use crate::position::Position;

new_key_type! { struct NodeKey; }

struct Node {
    particle: ParticleId,
    position: Position,
    prev: Option<NodeKey>,
    next: Option<NodeKey>,
    prev_for_particle: Option<NodeKey>,
    next_for_particle: Option<NodeKey>,
}

#[derive(Clone, Copy, Default)]
struct Chain {
    head: Option<NodeKey>,
    tail: Option<NodeKey>,
}

struct Inner {
    nodes: SlotMap<NodeKey, Node>,
    global: Chain,
    per_particle: HashMap<ParticleId, Chain>,
}

impl Inner {
    fn unlink_and_remove(&mut self, key: NodeKey) -> Node {
        let node = self.nodes.remove(key).expect("node key must be valid");

        match node.prev {
            Some(p) => self.nodes[p].next = node.next,
            None => self.global.head = node.next,
        }
        match node.next {
            Some(n) => self.nodes[n].prev = node.prev,
            None => self.global.tail = node.prev,
        }

        match node.prev_for_particle {
            Some(p) => self.nodes[p].next_for_particle = node.next_for_particle,
            None => {
                let chain = self.per_particle.entry(node.particle).or_default();
                chain.head = node.next_for_particle;
            }
        }
        match node.next_for_particle {
            Some(n) => self.nodes[n].prev_for_particle = node.prev_for_particle,
            None => {
                let chain = self.per_particle.entry(node.particle).or_default();
                chain.tail = node.prev_for_particle;
            }
        }

        node
    }
}

/// The original source's `MultiQueue`, re-architected per §9 as an arena plus
/// index-based links instead of raw pointers: nodes live in a `SlotMap`, and
/// both the global chain and every particle's sub-chain are `Option<NodeKey>`
/// pairs rather than cyclic pointers stored on the particle itself.
///
/// Bounded, thread-safe, doubly-linked: `push_tail` is the sole suspension point
/// in the whole system (§5), gated by `max_size` and woken by `not_full`.
pub struct PositionQueue {
    inner: Mutex<Inner>,
    not_full: Condvar,
    max_size: usize,
}

impl PositionQueue {
    pub fn new(max_size: usize) -> Self {
        PositionQueue {
            inner: Mutex::new(Inner {
                nodes: SlotMap::with_key(),
                global: Chain::default(),
                per_particle: HashMap::new(),
            }),
            not_full: Condvar::new(),
            max_size,
        }
    }

    /// Producer-side. Blocks on `not_full` while the queue is at capacity and the
    /// simulation is still running; returns immediately without enqueuing if
    /// `running` flips to `false` while waiting, so `stop()` can unblock a
    /// parked producer thread (§5 cancellation).
    pub fn push_tail(&self, particle: ParticleId, position: Position, running: &AtomicBool) {
        let mut guard = self.inner.lock().unwrap();

        while guard.nodes.len() >= self.max_size && running.load(Ordering::SeqCst) {
            trace!(particle, size = guard.nodes.len(), "producer blocking on queue backpressure");
            guard = self.not_full.wait(guard).unwrap();
        }

        if !running.load(Ordering::SeqCst) {
            return;
        }

        let prev_global_tail = guard.global.tail;
        let prev_particle_tail = guard.per_particle.entry(particle).or_default().tail;

        let key = guard.nodes.insert(Node {
            particle,
            position,
            prev: prev_global_tail,
            next: None,
            prev_for_particle: prev_particle_tail,
            next_for_particle: None,
        });

        match prev_global_tail {
            Some(tail) => guard.nodes[tail].next = Some(key),
            None => guard.global.head = Some(key),
        }
        guard.global.tail = Some(key);

        match prev_particle_tail {
            Some(tail) => guard.nodes[tail].next_for_particle = Some(key),
            None => guard.per_particle.entry(particle).or_default().head = Some(key),
        }
        guard.per_particle.entry(particle).or_default().tail = Some(key);
    }

    /// Consumer-side. Discards (and frees) every node in `particle`'s chain whose
    /// timestep is below `n`, then pops and returns the first remaining node,
    /// whatever its timestep. Returns `None` if the particle has no queued node.
    /// Wakes any producer blocked on backpressure before returning, including
    /// when the return value is the result of pure discard (§4.4).
    pub fn pop_timestep_n(&self, n: i64, particle: ParticleId) -> Option<Position> {
        let mut guard = self.inner.lock().unwrap();
        let mut popped = None;

        loop {
            let head = match guard.per_particle.get(&particle).and_then(|c| c.head) {
                Some(h) => h,
                None => break,
            };
            let timestep = guard.nodes[head].position.timestep;
            let node = guard.unlink_and_remove(head);
            if timestep >= n {
                popped = Some(node.position);
                break;
            }
        }

        if popped.is_some() {
            trace!(particle, n, "consumer popped a position, waking producer");
        }
        drop(guard);
        self.not_full.notify_all();
        popped
    }

    pub fn size(&self) -> usize {
        self.inner.lock().unwrap().nodes.len()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Wakes every producer parked on backpressure, used by `Simulation::stop()`
    /// so a blocked producer thread notices the cancellation flag (§5).
    pub fn notify_all(&self) {
        self.not_full.notify_all();
    }
}
