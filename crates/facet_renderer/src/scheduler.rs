//! Bounded frames-in-flight.
//!
//! At most [`MAX_FRAMES_IN_FLIGHT`] frames may be submitted and not yet
//! completed by the GPU.  Each frame holds a [`FramePermit`] from
//! [`FrameScheduler::acquire`] until its work is done:
//!
//! * a permit that is submitted hands its slot to the queue's
//!   `on_submitted_work_done` callback, which releases it;
//! * a permit that is dropped without being submitted (the frame failed
//!   while recording) releases its slot immediately.
//!
//! A slot is only handed out again after the frame holding it has released
//! it, so the permit's [`slot`] can index per-frame resources such as the
//! scene's uniform buffers.  Freed slots are reused in the order they were
//! released.
//!
//! [`slot`]: FramePermit::slot

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Triple buffering.
pub const MAX_FRAMES_IN_FLIGHT: usize = 3;

/// Counting semaphore over the in-flight slots.  Unlike a bare counter it
/// remembers which slot ids are free.
#[derive(Debug)]
pub struct FrameSemaphore {
    free: Mutex<VecDeque<usize>>,
    freed: Condvar,
    limit: usize,
}

impl FrameSemaphore {
    pub fn new(limit: usize) -> Self {
        Self {
            free: Mutex::new((0..limit).collect()),
            freed: Condvar::new(),
            limit,
        }
    }

    fn slots(&self) -> MutexGuard<'_, VecDeque<usize>> {
        // the queue stays consistent even if a holder panicked
        self.free.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks until a slot is free, then takes it.
    pub fn acquire(&self) -> usize {
        let mut free = self.slots();
        loop {
            if let Some(slot) = free.pop_front() {
                return slot;
            }
            free = self.freed.wait(free).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Takes a slot if one frees up within `timeout`.
    pub fn acquire_timeout(&self, timeout: Duration) -> Option<usize> {
        let free = self.slots();
        let (mut free, _) = self
            .freed
            .wait_timeout_while(free, timeout, |free| free.is_empty())
            .unwrap_or_else(PoisonError::into_inner);
        free.pop_front()
    }

    pub fn try_acquire(&self) -> Option<usize> {
        self.slots().pop_front()
    }

    /// Returns `slot` to the pool.  Unknown or already free slots are
    /// ignored.
    pub fn release(&self, slot: usize) {
        let mut free = self.slots();
        if slot >= self.limit || free.contains(&slot) {
            log::error!("frame slot {slot} released but not held");
            return;
        }
        free.push_back(slot);
        self.freed.notify_one();
    }

    pub fn available(&self) -> usize {
        self.slots().len()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

/// Hands out frame slots and keeps the in-flight count bounded.
pub struct FrameScheduler {
    semaphore: Arc<FrameSemaphore>,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(MAX_FRAMES_IN_FLIGHT)
    }
}

impl FrameScheduler {
    pub fn new(frames_in_flight: usize) -> Self {
        Self {
            semaphore: Arc::new(FrameSemaphore::new(frames_in_flight.max(1))),
        }
    }

    /// Waits for a free slot.  While waiting the device is polled so that
    /// completion callbacks of earlier frames get a chance to run.
    pub fn acquire(&mut self, device: &wgpu::Device) -> FramePermit {
        let slot = match self.semaphore.try_acquire() {
            Some(slot) => slot,
            None => {
                log::trace!("all frame slots busy; waiting on the GPU");
                loop {
                    let _ = device.poll(wgpu::Maintain::Wait);
                    if let Some(slot) = self.semaphore.acquire_timeout(Duration::from_millis(1)) {
                        break slot;
                    }
                }
            }
        };
        self.issue(slot)
    }

    /// Waits for a free slot without driving a device.  Some other thread
    /// must be completing frames for this to return.
    pub fn acquire_blocking(&mut self) -> FramePermit {
        let slot = self.semaphore.acquire();
        self.issue(slot)
    }

    fn issue(&self, slot: usize) -> FramePermit {
        FramePermit {
            semaphore: Some(self.semaphore.clone()),
            slot,
        }
    }

    pub fn frames_in_flight(&self) -> usize {
        self.semaphore.limit() - self.semaphore.available()
    }

    pub fn semaphore(&self) -> &Arc<FrameSemaphore> {
        &self.semaphore
    }
}

/// One acquired frame slot.
#[must_use = "dropping a permit frees its slot immediately"]
pub struct FramePermit {
    semaphore: Option<Arc<FrameSemaphore>>,
    slot: usize,
}

impl FramePermit {
    #[inline]
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Submits `commands` and releases the slot once the GPU has finished
    /// them.
    pub fn submit<I>(mut self, queue: &wgpu::Queue, commands: I) -> wgpu::SubmissionIndex
    where
        I: IntoIterator<Item = wgpu::CommandBuffer>,
    {
        let index = queue.submit(commands);
        if let Some(semaphore) = self.semaphore.take() {
            let slot = self.slot;
            queue.on_submitted_work_done(move || {
                log::trace!("frame slot {slot} completed");
                semaphore.release(slot);
            });
        }
        index
    }
}

impl Drop for FramePermit {
    fn drop(&mut self) {
        if let Some(semaphore) = self.semaphore.take() {
            log::trace!("frame slot {} abandoned", self.slot);
            semaphore.release(self.slot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    #[test]
    fn semaphore_counts_down_and_up() {
        let s = FrameSemaphore::new(2);
        let a = s.try_acquire().unwrap();
        let b = s.try_acquire().unwrap();
        assert_ne!(a, b);
        assert_eq!(s.try_acquire(), None);
        s.release(a);
        assert_eq!(s.available(), 1);
        // double and unknown releases are ignored
        s.release(a);
        s.release(7);
        assert_eq!(s.available(), 1);
        s.release(b);
        assert_eq!(s.available(), 2);
    }

    #[test]
    fn producer_is_throttled_until_a_frame_completes() {
        let mut scheduler = FrameScheduler::default();
        let permits: Vec<_> = (0..MAX_FRAMES_IN_FLIGHT)
            .map(|_| scheduler.acquire_blocking())
            .collect();
        assert_eq!(scheduler.frames_in_flight(), MAX_FRAMES_IN_FLIGHT);
        assert_eq!(
            scheduler
                .semaphore()
                .acquire_timeout(Duration::from_millis(20)),
            None
        );

        let completed = Arc::new(AtomicBool::new(false));
        let flag = completed.clone();
        let gpu = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            flag.store(true, Ordering::SeqCst);
            // completing the oldest frame frees its slot
            drop(permits);
        });

        let permit = scheduler.acquire_blocking();
        assert!(completed.load(Ordering::SeqCst));
        assert_eq!(permit.slot(), 0);
        gpu.join().unwrap();
    }

    #[test]
    fn slots_rotate_and_dropped_permits_are_returned() {
        let mut scheduler = FrameScheduler::new(3);
        let slots: Vec<usize> = (0..7)
            .map(|_| {
                let p = scheduler.acquire_blocking();
                p.slot()
            })
            .collect();
        assert_eq!(slots, vec![0, 1, 2, 0, 1, 2, 0]);
        assert_eq!(scheduler.frames_in_flight(), 0);
    }

    #[test]
    fn in_flight_never_exceeds_the_limit() {
        let mut scheduler = FrameScheduler::new(2);
        let a = scheduler.acquire_blocking();
        let b = scheduler.acquire_blocking();
        assert_eq!(scheduler.frames_in_flight(), 2);
        assert_eq!(scheduler.semaphore().try_acquire(), None);
        drop(a);
        let c = scheduler.acquire_blocking();
        assert_eq!(scheduler.frames_in_flight(), 2);
        assert_ne!(b.slot(), c.slot());
    }

    #[test]
    fn abandoned_frame_does_not_hand_out_a_busy_slot() {
        let mut scheduler = FrameScheduler::new(3);
        let first = scheduler.acquire_blocking();
        let second = scheduler.acquire_blocking();
        let failed = scheduler.acquire_blocking();
        let failed_slot = failed.slot();
        drop(failed);

        let next = scheduler.acquire_blocking();
        assert_ne!(next.slot(), first.slot());
        assert_ne!(next.slot(), second.slot());
        assert_eq!(next.slot(), failed_slot);
        assert_eq!(scheduler.frames_in_flight(), 3);
    }

    #[test]
    fn slots_come_back_in_completion_order() {
        let mut scheduler = FrameScheduler::new(3);
        let p0 = scheduler.acquire_blocking();
        let p1 = scheduler.acquire_blocking();
        let p2 = scheduler.acquire_blocking();
        let (s0, s1, s2) = (p0.slot(), p1.slot(), p2.slot());
        drop(p2);
        drop(p0);
        assert_eq!(scheduler.acquire_blocking().slot(), s2);
        let again = scheduler.acquire_blocking();
        assert_eq!(again.slot(), s0);
        assert_ne!(again.slot(), s1);
        drop(p1);
    }
}
