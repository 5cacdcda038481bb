//! pico-quadrature
//!
//! Quadrature decoder integration firmware for the Raspberry Pi Pico 2.
//! Two GPIO inputs carry the encoder's A/B channels; an edge-monitor task
//! per channel forwards every level change into the shared
//! [`QuadratureDecoder`], and a reporting task logs the accumulated angle
//! and missed-pulse count once a second via defmt.
//!
//! # Wiring
//!
//! | Signal | Pico 2 Pin | Notes                       |
//! |--------|------------|-----------------------------|
//! | ENC A  | GP14       | Pull-up enabled             |
//! | ENC B  | GP15       | Pull-up enabled             |

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Input, Pull};
use embassy_time::{Duration, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use quadrature_decoder::QuadratureDecoder;

/// Counts per revolution of the attached encoder (2048 CPR magnetic).
const ENCODER_CPR: u32 = 2048;

/// Tell the RP2350 Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = embassy_rp::block::ImageDef::secure_exe();

/// Shared decoder — written by both edge tasks, read by the report task.
/// The decoder serialises access internally, so tasks only need `&'static`.
static DECODER: StaticCell<QuadratureDecoder> = StaticCell::new();

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Channel A edge monitor: one decoder call per level change.
#[embassy_executor::task]
async fn channel_a_task(mut pin: Input<'static>, decoder: &'static QuadratureDecoder) {
    loop {
        pin.wait_for_any_edge().await;
        decoder.on_channel_a_edge(pin.is_high());
    }
}

/// Channel B edge monitor: one decoder call per level change.
#[embassy_executor::task]
async fn channel_b_task(mut pin: Input<'static>, decoder: &'static QuadratureDecoder) {
    loop {
        pin.wait_for_any_edge().await;
        decoder.on_channel_b_edge(pin.is_high());
    }
}

/// Periodic position report over defmt.
#[embassy_executor::task]
async fn report_task(decoder: &'static QuadratureDecoder) {
    loop {
        Timer::after(Duration::from_secs(1)).await;

        let angle = decoder.read_position(false);
        let missed = decoder.missed_pulse_count();
        info!(
            "position: {} rad ({} counts), missed pulses: {}",
            angle,
            decoder.read_count(false),
            missed
        );
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("pico-quadrature starting, CPR = {}", ENCODER_CPR);

    let pin_a = Input::new(p.PIN_14, Pull::Up);
    let pin_b = Input::new(p.PIN_15, Pull::Up);

    let decoder = DECODER.init(
        QuadratureDecoder::new(ENCODER_CPR).expect("CPR constant is non-zero"),
    );

    // Seed with the pins' true levels so the first edge is classified
    // against the encoder's actual starting state.
    decoder.initialize_state(pin_a.is_high(), pin_b.is_high());

    spawner.spawn(channel_a_task(pin_a, decoder)).unwrap();
    spawner.spawn(channel_b_task(pin_b, decoder)).unwrap();
    spawner.spawn(report_task(decoder)).unwrap();

    info!("All tasks spawned");
}
