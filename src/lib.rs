//! Quadrature encoder decoding with missed-pulse detection.
//!
//! This crate provides [`QuadratureDecoder`], a lookup-table state machine
//! that turns the raw edge stream of a quadrature encoder's A/B channels
//! into a signed accumulated position, while counting physically-impossible
//! transitions (both channels changing at once) as missed pulses instead of
//! letting them corrupt the position.
//!
//! All shared state lives behind an `embassy-sync` blocking mutex, so a
//! single decoder can be driven from GPIO interrupt handlers while an
//! application task reads the position concurrently. Every operation is a
//! bounded table lookup plus integer arithmetic — no edge handler ever
//! blocks on the reader or on I/O.
//!
//! # Quick Start
//!
//! ```ignore
//! use quadrature_decoder::QuadratureDecoder;
//! use static_cell::StaticCell;
//!
//! static DECODER: StaticCell<QuadratureDecoder> = StaticCell::new();
//!
//! // 2048 counts per revolution, seeded with the pins' current levels.
//! let decoder = DECODER.init(QuadratureDecoder::new(2048).unwrap());
//! decoder.initialize_state(pin_a.is_high(), pin_b.is_high());
//!
//! // From the channel A edge task / ISR:
//! decoder.on_channel_a_edge(pin_a.is_high());
//!
//! // From the application task:
//! let angle = decoder.read_position(false); // radians
//! let missed = decoder.missed_pulse_count();
//! ```
//!
//! # Input contract
//!
//! The edge handlers reconstruct the full 2-bit state from a single
//! channel's new level, assuming the other channel has not changed since
//! the last accepted state. This holds exactly when the caller delivers one
//! call per genuine (debounced) level change per channel. Callers that poll
//! both pins instead should use [`QuadratureDecoder::sample`], which
//! accepts both levels at once and reports a missed pulse whenever the
//! poll was too slow to catch an intermediate state.
//!
//! # Crate Features
//!
//! - **`defmt`** — structured logging of decoder anomalies via [`defmt`].

#![no_std]

#[cfg(test)]
extern crate std;

pub mod decoder;
pub mod error;

// ── Re-exports for convenience ───────────────────────────────────────────

pub use decoder::QuadratureDecoder;
pub use error::DecoderError;
