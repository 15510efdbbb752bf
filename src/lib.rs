//! Randomized round scheduler for the letter carousel.
//!
//! A run picks a random number of rounds, emits one random index per round at
//! a fixed interval, and signals completion half an interval after the final
//! pick. The draw logic lives in [`RoundRun`], a pure state machine driven by
//! an injected [`RandomSource`], so every observable property can be checked
//! without timers. [`schedule`] wires a run to browser timers and hands back a
//! cancellation handle.

use gloo_timers::callback::{Interval, Timeout};
use log::{debug, warn};
use rand::Rng;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

pub mod storage;

/// Default scheduling parameters.
pub mod defaults {
    pub const MIN_ROUNDS: u32 = 4;
    pub const MAX_ROUNDS: u32 = 7;
    pub const WAIT_DURATION_MS: u32 = 4000;
}

/// Source of uniform random values in `[0, 1)`.
///
/// Injected into the scheduler so tests can script exact draw sequences.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

/// The ambient thread RNG, used outside of tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_unit(&mut self) -> f64 {
        rand::rng().random::<f64>()
    }
}

/// Uniform integer in the closed interval `[min, max]`.
///
/// Callers must ensure `min <= max`.
pub fn random_int_in(source: &mut dyn RandomSource, min: usize, max: usize) -> usize {
    (source.next_unit() * (max + 1 - min) as f64 + min as f64).floor() as usize
}

/// Immutable per-run configuration, captured when a run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleParams {
    pub min_index: usize,
    pub max_index: usize,
    /// Optional subset the last round must draw from.
    pub allowed_final: Option<Vec<usize>>,
    pub min_rounds: u32,
    pub max_rounds: u32,
    pub wait_duration_ms: u32,
}

impl ScheduleParams {
    pub fn new(min_index: usize, max_index: usize) -> Self {
        Self {
            min_index,
            max_index,
            allowed_final: None,
            min_rounds: defaults::MIN_ROUNDS,
            max_rounds: defaults::MAX_ROUNDS,
            wait_duration_ms: defaults::WAIT_DURATION_MS,
        }
    }

    pub fn rounds(mut self, min: u32, max: u32) -> Self {
        self.min_rounds = min;
        self.max_rounds = max;
        self
    }

    pub fn wait_duration(mut self, ms: u32) -> Self {
        self.wait_duration_ms = ms;
        self
    }

    pub fn allowed_final(mut self, indexes: Vec<usize>) -> Self {
        self.allowed_final = Some(indexes);
        self
    }

    /// Delay between the final pick and the completion signal.
    pub fn completion_delay_ms(&self) -> u32 {
        self.wait_duration_ms / 2
    }

    fn range_len(&self) -> usize {
        self.max_index - self.min_index + 1
    }
}

/// One emitted index. `is_last` marks the terminating round; the completion
/// signal follows `completion_delay_ms` later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pick {
    pub index: usize,
    pub is_last: bool,
}

/// In-flight state of a single scheduling run.
///
/// The selected-set tracks indexes already emitted this run. When it covers
/// the whole range it is cleared at the top of the next round, so repeats
/// become allowed; a run also terminates as soon as the set covers the range
/// after a draw, whichever comes first.
pub struct RoundRun {
    params: ScheduleParams,
    selected: HashSet<usize>,
    rounds: u32,
    number_of_rounds: u32,
    done: bool,
}

impl RoundRun {
    /// Draws the round count and the first pick (emitted with no delay).
    ///
    /// Returns `None` after a warning when the range is inverted; no run is
    /// created and no callbacks should fire. An empty final-pick constraint
    /// is also warned about and ignored.
    pub fn start(params: ScheduleParams, source: &mut dyn RandomSource) -> Option<(Self, Pick)> {
        if params.max_index < params.min_index {
            warn!("scheduling requested with invalid range: max_index < min_index");
            return None;
        }

        let mut params = params;
        if matches!(params.allowed_final.as_deref(), Some([])) {
            warn!("empty final pick constraint, falling back to unconstrained selection");
            params.allowed_final = None;
        }

        let min_rounds = params.min_rounds.min(params.max_rounds) as usize;
        let max_rounds = params.max_rounds.max(params.min_rounds) as usize;
        let number_of_rounds = random_int_in(source, min_rounds, max_rounds).max(1) as u32;
        debug!("starting run with {} rounds", number_of_rounds);

        let mut run = Self {
            params,
            selected: HashSet::new(),
            rounds: 0,
            number_of_rounds,
            done: false,
        };

        // A one-round run makes the synchronous first emission also the
        // final one, so the constraint applies to it.
        let is_last = number_of_rounds == 1;
        let index = if is_last && run.params.allowed_final.is_some() {
            run.draw_final(source)
        } else {
            run.draw_unselected(source, false)
        };
        run.selected.insert(index);
        run.rounds = 1;
        run.done = is_last;

        Some((run, Pick { index, is_last }))
    }

    /// Performs one timer round. Returns `None` once the run has terminated.
    pub fn tick(&mut self, source: &mut dyn RandomSource) -> Option<Pick> {
        if self.done {
            return None;
        }

        let mut repeats_allowed = false;
        if self.selected.len() == self.params.range_len() {
            self.selected.clear();
            repeats_allowed = true;
        }

        let final_round = self.rounds + 1 == self.number_of_rounds;
        let index = if final_round && self.params.allowed_final.is_some() {
            self.draw_final(source)
        } else {
            self.draw_unselected(source, repeats_allowed)
        };
        self.selected.insert(index);
        self.rounds += 1;

        let exhausted = self.selected.len() == self.params.range_len();
        let is_last = self.rounds == self.number_of_rounds || exhausted;
        self.done = is_last;

        Some(Pick { index, is_last })
    }

    pub fn number_of_rounds(&self) -> u32 {
        self.number_of_rounds
    }

    /// Rejection-samples the index range, retrying on collisions with the
    /// selected-set unless the set was just cleared.
    fn draw_unselected(&self, source: &mut dyn RandomSource, repeats_allowed: bool) -> usize {
        loop {
            let candidate = random_int_in(source, self.params.min_index, self.params.max_index);
            if repeats_allowed || !self.selected.contains(&candidate) {
                return candidate;
            }
        }
    }

    /// Draws the final round from the allowed subset, preferring entries not
    /// yet selected this run and falling back to the whole subset.
    fn draw_final(&self, source: &mut dyn RandomSource) -> usize {
        let allowed = self
            .params
            .allowed_final
            .as_deref()
            .expect("final constraint checked by caller");
        let fresh: Vec<usize> = allowed
            .iter()
            .copied()
            .filter(|index| !self.selected.contains(index))
            .collect();
        let pool: &[usize] = if fresh.is_empty() { allowed } else { &fresh };
        pool[random_int_in(source, 0, pool.len() - 1)]
    }
}

/// Owner of the timers behind an in-flight run.
///
/// Dropping (or cancelling) the handle clears both the round interval and the
/// pending completion timeout, so no callback fires after teardown.
pub struct ScheduleHandle {
    interval: Rc<RefCell<Option<Interval>>>,
    completion: Rc<RefCell<Option<Timeout>>>,
}

impl ScheduleHandle {
    pub fn cancel(&self) {
        self.interval.borrow_mut().take();
        self.completion.borrow_mut().take();
    }
}

impl Drop for ScheduleHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Starts a timed run with the ambient RNG. See [`schedule_with`].
pub fn schedule<F, G>(params: ScheduleParams, on_index: F, on_last: G) -> Option<ScheduleHandle>
where
    F: Fn(usize) + 'static,
    G: Fn(bool) + 'static,
{
    schedule_with(params, ThreadRandom, on_index, on_last)
}

/// Starts a timed run: the first pick is emitted synchronously, subsequent
/// rounds fire every `wait_duration_ms`, and `on_last(true)` fires once, half
/// an interval after the terminating pick. Returns `None` (after a warning,
/// with neither callback invoked) when the index range is inverted.
pub fn schedule_with<R, F, G>(
    params: ScheduleParams,
    mut source: R,
    on_index: F,
    on_last: G,
) -> Option<ScheduleHandle>
where
    R: RandomSource + 'static,
    F: Fn(usize) + 'static,
    G: Fn(bool) + 'static,
{
    let wait = params.wait_duration_ms;
    let completion_delay = params.completion_delay_ms();

    let (mut run, first) = RoundRun::start(params, &mut source)?;
    on_index(first.index);

    let interval_slot: Rc<RefCell<Option<Interval>>> = Rc::new(RefCell::new(None));
    let completion_slot: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));
    let on_last = Rc::new(on_last);

    if first.is_last {
        arm_completion(&completion_slot, completion_delay, on_last);
        return Some(ScheduleHandle {
            interval: interval_slot,
            completion: completion_slot,
        });
    }

    let interval = {
        let interval_slot = interval_slot.clone();
        let completion_slot = completion_slot.clone();
        Interval::new(wait, move || {
            let Some(pick) = run.tick(&mut source) else {
                return;
            };
            on_index(pick.index);
            if pick.is_last {
                // The terminating round clears its own interval exactly once.
                interval_slot.borrow_mut().take();
                arm_completion(&completion_slot, completion_delay, on_last.clone());
            }
        })
    };
    interval_slot.borrow_mut().replace(interval);

    Some(ScheduleHandle {
        interval: interval_slot,
        completion: completion_slot,
    })
}

fn arm_completion<G>(slot: &Rc<RefCell<Option<Timeout>>>, delay_ms: u32, on_last: Rc<G>)
where
    G: Fn(bool) + 'static,
{
    let timeout = Timeout::new(delay_ms, move || on_last(true));
    slot.borrow_mut().replace(timeout);
}
