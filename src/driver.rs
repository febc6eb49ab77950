//! A paced, pausable background runner for a [Simulation].
//!
//! The simulation is shared behind a mutex. Each tick runs with the lock held,
//! so anything reading through [Driver::read] sees either the state before a
//! tick or the state after it, never a partially applied one.

use crate::Simulation;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Drives a simulation on a background thread, one tick per interval.
pub struct Driver {
    /// The simulation being driven.
    sim: Arc<Mutex<Simulation>>,
    /// Cleared to ask the background thread to stop after its current tick.
    running: Arc<AtomicBool>,
    /// The background thread, which yields the number of ticks it simulated.
    handle: Option<JoinHandle<usize>>,
}

impl Driver {
    /// Creates a driver for the given simulation. Nothing runs until [Driver::start].
    pub fn new(sim: Simulation) -> Self {
        Self {
            sim: Arc::new(Mutex::new(sim)),
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// Starts ticking every `interval` until every vehicle has arrived,
    /// `max_frames` ticks have run, or the driver is paused.
    /// Returns `false` if the driver was already running.
    pub fn start(&mut self, interval: Duration, max_frames: usize) -> bool {
        if self.is_running() {
            return false;
        }
        self.join();

        self.running.store(true, Ordering::Release);
        let sim = self.sim.clone();
        let running = self.running.clone();
        self.handle = Some(thread::spawn(move || {
            let mut frames = 0;
            while frames < max_frames && running.load(Ordering::Acquire) {
                {
                    let mut sim = lock(&sim);
                    if sim.all_arrived() {
                        break;
                    }
                    sim.step();
                }
                frames += 1;
                thread::sleep(interval);
            }
            running.store(false, Ordering::Release);
            log::debug!("driver stopped after {frames} ticks");
            frames
        }));
        true
    }

    /// Whether the background thread is still ticking.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stops ticking once the current tick completes.
    /// Returns the number of ticks simulated since the last start.
    pub fn pause(&mut self) -> usize {
        self.running.store(false, Ordering::Release);
        self.join()
    }

    /// Blocks until the current run finishes by itself.
    /// Returns the number of ticks simulated since the last start.
    pub fn wait(&mut self) -> usize {
        self.join()
    }

    /// Pauses the driver and resets the simulation to its initial state.
    pub fn reset(&mut self) {
        self.pause();
        lock(&self.sim).reset();
    }

    /// Reads the simulation between ticks.
    pub fn read<R>(&self, f: impl FnOnce(&Simulation) -> R) -> R {
        f(&*lock(&self.sim))
    }

    /// Stops the driver and hands back the simulation.
    pub fn into_inner(mut self) -> Simulation {
        self.pause();
        lock(&self.sim).clone()
    }

    fn join(&mut self) -> usize {
        self.handle
            .take()
            .map(|handle| handle.join().unwrap_or_default())
            .unwrap_or_default()
    }
}

impl Drop for Driver {
    fn drop(&mut self) {
        self.pause();
    }
}

/// Locks the simulation, recovering it if a previous holder panicked.
/// Ticks are infallible, so the state behind a poisoned lock is still consistent.
fn lock(sim: &Mutex<Simulation>) -> MutexGuard<'_, Simulation> {
    sim.lock().unwrap_or_else(PoisonError::into_inner)
}
