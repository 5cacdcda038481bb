//! Transition-table quadrature decoding state machine.
//!
//! A quadrature encoder's two channels form a 2-bit state, encoded here as
//! `(A << 1) | B`, that steps through the Gray-code cycle `0 → 1 → 3 → 2 → 0`
//! as the shaft turns forward. [`QuadratureDecoder`] classifies every
//! observed state change against a fixed 4×4 table: a single-bit change is a
//! valid ±1 step, an identical state is a no-op, and a double-bit change is
//! physically impossible for correctly sampled quadrature and is counted as
//! a **missed pulse** rather than applied to the position.
//!
//! The decoder always resynchronizes to the observed state, even after a
//! missed pulse, so one glitch never cascades into misclassifying the edges
//! that follow it.

use core::cell::RefCell;
use core::f64::consts::TAU;

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embassy_sync::blocking_mutex::Mutex;

use crate::error::DecoderError;

/// Sentinel marking a double-bit (invalid) transition in the table.
const MISSED: i8 = 2;

/// Transition classification, indexed `[last_state][new_state]`.
///
/// Rows and columns are the 2-bit `(A << 1) | B` states. Entries are the
/// position delta for valid transitions (forward cycle `0 → 1 → 3 → 2 → 0`
/// is +1, its reverse -1), `0` for identical states, and [`MISSED`] for the
/// diagonal pairs `0 ↔ 3` and `1 ↔ 2` where both bits changed at once.
const TRANSITION_TABLE: [[i8; 4]; 4] = [
    [0, 1, -1, MISSED],
    [-1, 0, MISSED, 1],
    [1, MISSED, 0, -1],
    [MISSED, -1, 1, 0],
];

/// Mutable decoder fields, guarded as one unit.
///
/// Position and missed-pulse updates are mutually exclusive alternatives
/// per transition, so the three fields must only ever change together
/// inside a single critical section.
struct DecoderState {
    /// Most recently accepted `(A << 1) | B` state, always in `0..=3`.
    last_state: u8,
    /// Accumulated position in counts since the last reset. `i64` so that
    /// overflow is not a practical concern at physical edge rates.
    position: i64,
    /// Transitions classified as invalid since the last reset.
    missed_pulses: u64,
}

/// Lookup-table quadrature decoder with missed-pulse detection.
///
/// All methods take `&self`: the shared fields live behind an
/// `embassy-sync` blocking mutex, so a single decoder stored in a
/// `static` can be driven from GPIO interrupt handlers while an
/// application task reads the position concurrently. The mutex is held
/// only for the O(1) table lookup and integer update, never across the
/// floating-point radian conversion or any logging.
///
/// The mutex flavour is generic; the default [`CriticalSectionRawMutex`]
/// is safe across interrupt priorities and executors.
///
/// # Example
///
/// ```
/// use embassy_sync::blocking_mutex::raw::NoopRawMutex;
/// use quadrature_decoder::QuadratureDecoder;
///
/// let decoder: QuadratureDecoder<NoopRawMutex> = QuadratureDecoder::new(4).unwrap();
/// decoder.initialize_state(false, false);
///
/// // One full forward Gray cycle: 0 → 1 → 3 → 2 → 0.
/// decoder.on_channel_b_edge(true);
/// decoder.on_channel_a_edge(true);
/// decoder.on_channel_b_edge(false);
/// decoder.on_channel_a_edge(false);
///
/// assert_eq!(decoder.read_position(false), core::f64::consts::TAU);
/// ```
pub struct QuadratureDecoder<M: RawMutex = CriticalSectionRawMutex> {
    /// Quadrature counts per shaft revolution; fixes the radian scale.
    cpr: u32,
    state: Mutex<M, RefCell<DecoderState>>,
}

impl<M: RawMutex> QuadratureDecoder<M> {
    /// Create a decoder with the given counts-per-revolution.
    ///
    /// `last_state` starts at 0 (both channels low); call
    /// [`initialize_state`](Self::initialize_state) before the first edge
    /// if the pins may be in another state, otherwise the first edge can
    /// be misclassified as a transition from the assumed default.
    ///
    /// # Errors
    /// [`DecoderError::ZeroCountsPerRevolution`] if `counts_per_revolution`
    /// is 0, which would make the radian conversion divide by zero.
    pub fn new(counts_per_revolution: u32) -> Result<Self, DecoderError> {
        if counts_per_revolution == 0 {
            return Err(DecoderError::ZeroCountsPerRevolution);
        }

        Ok(Self {
            cpr: counts_per_revolution,
            state: Mutex::new(RefCell::new(DecoderState {
                last_state: 0,
                position: 0,
                missed_pulses: 0,
            })),
        })
    }

    /// Counts-per-revolution this decoder was constructed with.
    pub fn counts_per_revolution(&self) -> u32 {
        self.cpr
    }

    // ── State updates ────────────────────────────────────────────────

    /// Seed `last_state` from both channels' current levels.
    ///
    /// Bypasses the transition table and leaves the position and
    /// missed-pulse count untouched. Intended to be called once, before
    /// any edge is processed, so the decoder starts synchronized to the
    /// encoder's true state.
    pub fn initialize_state(&self, level_a: bool, level_b: bool) {
        let state = ((level_a as u8) << 1) | level_b as u8;
        self.state.lock(|s| s.borrow_mut().last_state = state);
    }

    /// Process a debounced edge on channel A.
    ///
    /// `level` is the channel's new logic level. The new 2-bit state is
    /// reconstructed by replacing the A bit of `last_state`, which assumes
    /// channel B has not changed since the last accepted state — guaranteed
    /// as long as the caller delivers one call per genuine level change.
    pub fn on_channel_a_edge(&self, level: bool) {
        self.apply(|last| (last & 0b01) | ((level as u8) << 1));
    }

    /// Process a debounced edge on channel B.
    ///
    /// Counterpart of [`on_channel_a_edge`](Self::on_channel_a_edge):
    /// replaces the B bit of `last_state` and keeps the A bit.
    pub fn on_channel_b_edge(&self, level: bool) {
        self.apply(|last| (last & 0b10) | level as u8);
    }

    /// Process a polled sample of both channel levels.
    ///
    /// For callers that read both pins periodically instead of reacting to
    /// per-channel edges. Unlike the edge handlers this can present a
    /// double-bit change, which is exactly what happens when the poll rate
    /// is too slow to catch an intermediate state — the decoder counts it
    /// as a missed pulse and resynchronizes.
    pub fn sample(&self, level_a: bool, level_b: bool) {
        let state = ((level_a as u8) << 1) | level_b as u8;
        self.apply(|_| state);
    }

    /// Shared update procedure for all state-change entry points.
    ///
    /// `new_state` is computed from `last_state` *inside* the critical
    /// section, then the transition is classified and applied: a valid
    /// delta moves the position, an invalid one bumps the missed-pulse
    /// counter, and `last_state` is updated unconditionally either way so
    /// decoding tracks the true physical state even after a glitch.
    fn apply(&self, new_state: impl FnOnce(u8) -> u8) {
        let missed = self.state.lock(|s| {
            let mut s = s.borrow_mut();
            let new_state = new_state(s.last_state) & 0b11;
            let transition = TRANSITION_TABLE[s.last_state as usize][new_state as usize];

            if transition == MISSED {
                s.missed_pulses += 1;
            } else {
                s.position += transition as i64;
            }
            s.last_state = new_state;

            transition == MISSED
        });

        // Log outside the critical section to keep it short.
        #[cfg(feature = "defmt")]
        if missed {
            defmt::warn!("quadrature transition skipped a state; missed pulse counted");
        }
        #[cfg(not(feature = "defmt"))]
        let _ = missed;
    }

    // ── Access ───────────────────────────────────────────────────────

    /// Reset the accumulated position and missed-pulse count to zero.
    ///
    /// `last_state` is left untouched — the decoder stays synchronized to
    /// the physical encoder; only the measurement window restarts.
    pub fn zero(&self) {
        self.state.lock(|s| {
            let mut s = s.borrow_mut();
            s.position = 0;
            s.missed_pulses = 0;
        });
    }

    /// Read the accumulated position in raw counts.
    ///
    /// With `reset` the position and missed-pulse count are zeroed
    /// atomically with the read, so no concurrent edge can land between
    /// the capture and the reset.
    pub fn read_count(&self, reset: bool) -> i64 {
        self.state.lock(|s| {
            let mut s = s.borrow_mut();
            let count = s.position;
            if reset {
                s.position = 0;
                s.missed_pulses = 0;
            }
            count
        })
    }

    /// Read the accumulated position as an angle in radians.
    ///
    /// Positive angles are the forward Gray-code direction. The radian
    /// conversion `count / cpr * τ` happens after the lock is released.
    /// Reset semantics are those of [`read_count`](Self::read_count).
    pub fn read_position(&self, reset: bool) -> f64 {
        let count = self.read_count(reset);
        count as f64 / self.cpr as f64 * TAU
    }

    /// Number of transitions classified as invalid since the last reset.
    pub fn missed_pulse_count(&self) -> u64 {
        self.state.lock(|s| s.borrow().missed_pulses)
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────
