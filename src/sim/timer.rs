//! Cancellable one-shot and repeating timers
//!
//! Single-threaded scheduler driven by the frame loop. Runs on real time, so
//! freezing the simulation does not freeze pending timers.

use serde::{Deserialize, Serialize};

/// Shortest repeat interval; keeps `advance` bounded
const MIN_INTERVAL: f64 = 1e-3;

/// Handle to a scheduled timer. Carries a generation so a stale handle
/// never touches a timer that reused its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle {
    idx: u32,
    generation: u32,
}

#[derive(Debug, Clone)]
struct Scheduled<T> {
    payload: T,
    /// Absolute fire time
    deadline: f64,
    /// Repeat interval (None = one-shot)
    interval: Option<f64>,
    /// Schedule order, breaks deadline ties
    seq: u64,
}

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    timer: Option<Scheduled<T>>,
}

/// Timer scheduler
#[derive(Debug, Clone)]
pub struct Timers<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    now: f64,
    next_seq: u64,
}

impl<T: Clone> Default for Timers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Timers<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            now: 0.0,
            next_seq: 0,
        }
    }

    /// Fire once after `delay` seconds
    pub fn schedule_once(&mut self, delay: f32, payload: T) -> TimerHandle {
        let deadline = self.now + f64::from(delay.max(0.0));
        self.insert(payload, deadline, None)
    }

    /// Fire every `interval` seconds; `fire_now` makes the first firing due
    /// on the next `advance`
    pub fn schedule_repeating(&mut self, interval: f32, payload: T, fire_now: bool) -> TimerHandle {
        let interval = f64::from(interval).max(MIN_INTERVAL);
        let deadline = if fire_now { self.now } else { self.now + interval };
        self.insert(payload, deadline, Some(interval))
    }

    /// Cancel a timer. Returns false if the handle is stale.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.slots.get_mut(handle.idx as usize) {
            Some(slot) if slot.generation == handle.generation && slot.timer.is_some() => {
                slot.timer = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(handle.idx);
                true
            }
            _ => false,
        }
    }

    /// Cancel every pending timer
    pub fn cancel_all(&mut self) {
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if slot.timer.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(idx as u32);
            }
        }
    }

    /// Whether the handle still refers to a pending timer
    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.slots
            .get(handle.idx as usize)
            .is_some_and(|slot| slot.generation == handle.generation && slot.timer.is_some())
    }

    /// Number of pending timers
    pub fn pending(&self) -> usize {
        self.slots.iter().filter(|s| s.timer.is_some()).count()
    }

    /// Seconds elapsed since creation
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Advance the clock by `dt` seconds and return everything that fired,
    /// in firing order. Repeating timers fire once per elapsed interval.
    pub fn advance(&mut self, dt: f32) -> Vec<(TimerHandle, T)> {
        self.now += f64::from(dt.max(0.0));
        let now = self.now;

        let mut fired: Vec<(f64, u64, TimerHandle, T)> = Vec::new();
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            let Some(timer) = slot.timer.as_mut() else {
                continue;
            };
            let handle = TimerHandle {
                idx: idx as u32,
                generation: slot.generation,
            };
            let interval = timer.interval;
            match interval {
                Some(interval) => {
                    while timer.deadline <= now {
                        fired.push((timer.deadline, timer.seq, handle, timer.payload.clone()));
                        timer.deadline += interval;
                    }
                }
                None => {
                    if timer.deadline <= now {
                        fired.push((timer.deadline, timer.seq, handle, timer.payload.clone()));
                        slot.timer = None;
                        slot.generation = slot.generation.wrapping_add(1);
                        self.free.push(idx as u32);
                    }
                }
            }
        }

        fired.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        fired
            .into_iter()
            .map(|(_, _, handle, payload)| (handle, payload))
            .collect()
    }

    fn insert(&mut self, payload: T, deadline: f64, interval: Option<f64>) -> TimerHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        let timer = Scheduled {
            payload,
            deadline,
            interval,
            seq,
        };

        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx as usize].timer = Some(timer);
                idx
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    timer: Some(timer),
                });
                (self.slots.len() - 1) as u32
            }
        };

        TimerHandle {
            idx,
            generation: self.slots[idx as usize].generation,
        }
    }
}
