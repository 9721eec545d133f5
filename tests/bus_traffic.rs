//! Bus-traffic tests for the TLV320AIC3254 driver.
//!
//! Every test runs the driver against an I²C mock with an exact transaction
//! expectation list, so the register sequences, page-select minimisation
//! and failure behaviour are all checked byte for byte.

use embedded_hal::i2c::ErrorKind;
use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
use tlv320aic3254::{registers, Aic3254, Error, DEFAULT_OUTPUT_PERCENT};

const ADDR: u8 = 0x18;

/// One register write on the currently selected page.
fn write(offset: u8, value: u8) -> I2cTransaction {
    I2cTransaction::write(ADDR, vec![offset, value])
}

/// A page-select write.
fn select(page: u8) -> I2cTransaction {
    write(0, page)
}

/// The identity read: the device echoes the selected page (0) when present.
fn identity_read(id: u8) -> I2cTransaction {
    I2cTransaction::write_read(ADDR, vec![0], vec![id])
}

const N1_DC_BLOCK: [u8; 3] = [0x80, 0x00, 0x01];
const D1_DC_BLOCK: [u8; 3] = [0x7F, 0xB0, 0xFE];
const ZERO: [u8; 3] = [0x00, 0x00, 0x00];

/// The ADC filter-coefficient rewrite, parameterised by the N1/D1 bytes
/// (N0 is unity in both the engaged and bypassed states).
fn filter_transactions(n1: [u8; 3], d1: [u8; 3]) -> Vec<I2cTransaction> {
    let mut t = vec![
        write(81, 0x00), // ADCs down before touching coefficients
        write(61, 0x01), // PRB_R1 (programmable IIR)
        select(8),
        write(24, 0x7F),
        write(25, 0xFF),
        write(26, 0xFF),
    ];
    for (i, byte) in n1.iter().enumerate() {
        t.push(write(28 + i as u8, *byte));
    }
    for (i, byte) in d1.iter().enumerate() {
        t.push(write(32 + i as u8, *byte));
    }
    t.push(select(9));
    t.extend([write(32, 0x7F), write(33, 0xFF), write(34, 0xFF)]);
    for (i, byte) in n1.iter().enumerate() {
        t.push(write(36 + i as u8, *byte));
    }
    for (i, byte) in d1.iter().enumerate() {
        t.push(write(40 + i as u8, *byte));
    }
    t.push(select(0));
    t.push(write(81, 0xC0)); // ADCs back up
    t
}

/// The full `configure` sequence. The leading page select is unconditional,
/// so this holds from any prior cache state.
fn configure_transactions(use_pll: bool) -> Vec<I2cTransaction> {
    let mut t = vec![select(0), write(1, 0x01)];
    if use_pll {
        t.extend([
            write(4, 0x03), // PLL_CLKIN = MCLK, CODEC_CLKIN = PLL_CLK
            write(5, 0x11), // P = 1, R = 1, PLL down
            write(6, 0x04), // J = 4
            write(7, 0x00), // D = 0
            write(8, 0x00),
            write(5, 0x91), // PLL up
        ]);
    }
    t.extend([
        // DAC clock tree and audio interface
        write(11, 0x81),
        write(12, 0x82),
        write(13, 0x00),
        write(14, 0x80),
        write(27, 0x00),
        write(28, 0x00),
        // analog power, common mode, routing, output drivers
        select(1),
        write(1, 0x08),
        write(2, 0x01),
        write(10, 0x08),
        write(14, 0x08),
        write(15, 0x08),
        write(12, 0x08),
        write(13, 0x08),
        write(16, 0x00),
        write(17, 0x00),
        write(18, 0x06),
        write(19, 0x06),
        write(9, 0x0C),
        // DAC digital path
        select(0),
        write(63, 0xD4),
        write(64, 0x00),
        write(65, 0x00),
        write(66, 0x00),
        // ADC clock tree
        write(18, 0x81),
        write(19, 0x82),
        write(20, 0x80),
        // input routing
        select(1),
        write(52, 0x40),
        write(55, 0x40),
        write(54, 0x40),
        write(57, 0x40),
        write(59, 0x80),
        write(60, 0x80),
        select(0),
    ]);
    // capture path: engage the high-pass filter, power up the ADCs
    t.extend(filter_transactions(N1_DC_BLOCK, D1_DC_BLOCK));
    t.extend([write(81, 0xC0), write(82, 0x00)]);
    t
}

/// The full `initialize` sequence for a device that answers the identity
/// read with `id`.
fn initialize_transactions(id: u8) -> Vec<I2cTransaction> {
    let mut t = vec![select(0), identity_read(id)];
    if id == 0 {
        // safety mute of the line-out drivers, then back to page 0 for
        // the baseline level write
        t.extend([select(1), write(18, 0x40), write(19, 0x40), select(0)]);
    }
    // baseline level: both channels at the bottom of the range, unmuted
    t.extend([write(64, 0x00), write(65, 0x81), write(66, 0x81)]);
    t.extend(configure_transactions(false));
    // default post-initialisation level: 58% -> 0xD2
    t.extend([write(64, 0x00), write(65, 0xD2), write(66, 0xD2)]);
    t
}

/// Build an initialised driver whose mock expects the bring-up traffic
/// followed by `extra`.
fn ready_codec(extra: &[I2cTransaction]) -> (Aic3254<I2cMock, NoopDelay>, I2cMock) {
    let mut expected = initialize_transactions(0x00);
    expected.extend_from_slice(extra);
    let i2c = I2cMock::new(&expected);
    let mut codec = Aic3254::new(i2c.clone(), NoopDelay);
    codec.initialize().unwrap();
    (codec, i2c)
}

#[test]
fn page_select_emitted_only_on_page_change() {
    let expected = [
        select(0), // cold start: cache is unknown
        write(64, 0x01),
        write(65, 0x02), // same page, no select
        select(1),
        write(16, 0x03),
        select(0),
        write(66, 0x04),
    ];
    let mut i2c = I2cMock::new(&expected);
    let mut codec = Aic3254::new(i2c.clone(), NoopDelay);
    codec.write_register(registers::DAC_MUTE, 0x01).unwrap();
    codec
        .write_register(registers::DAC_VOLUME_LEFT, 0x02)
        .unwrap();
    codec.write_register(registers::HPL_GAIN, 0x03).unwrap();
    codec
        .write_register(registers::DAC_VOLUME_RIGHT, 0x04)
        .unwrap();
    i2c.done();
}

#[test]
fn initialize_matches_device_bring_up() {
    let mut i2c = I2cMock::new(&initialize_transactions(0x00));
    let mut codec = Aic3254::new(i2c.clone(), NoopDelay);
    codec.initialize().unwrap();
    i2c.done();
}

#[test]
fn initialize_continues_after_identity_mismatch() {
    // A wrong identity value skips the safety mute but must not abort the
    // bring-up.
    let mut i2c = I2cMock::new(&initialize_transactions(0x42));
    let mut codec = Aic3254::new(i2c.clone(), NoopDelay);
    codec.initialize().unwrap();
    i2c.done();
}

#[test]
fn initialize_fails_fatally_on_bus_error() {
    // The very first transaction (the identity page select) fails; the
    // whole bring-up must fail, not report partial success.
    let expected = [select(0).with_error(ErrorKind::Other)];
    let mut i2c = I2cMock::new(&expected);
    let mut codec = Aic3254::new(i2c.clone(), NoopDelay);
    assert_eq!(codec.initialize(), Err(Error::Bus(ErrorKind::Other)));
    // The failure leaves the driver unconfigured.
    assert_eq!(codec.set_mute(false, false), Err(Error::NotConfigured));
    i2c.done();
}

#[test]
fn runtime_controls_gated_until_configured() {
    let mut i2c = I2cMock::new(&[]);
    let mut codec = Aic3254::new(i2c.clone(), NoopDelay);
    assert_eq!(codec.set_output_levels(50, 50), Err(Error::NotConfigured));
    assert_eq!(codec.set_mute(true, true), Err(Error::NotConfigured));
    assert_eq!(codec.set_high_pass_filter(true), Err(Error::NotConfigured));
    i2c.done();
}

#[test]
fn output_levels_write_gain_and_clear_mute() {
    let extra = [
        // set_output_levels(0, 100): clear mute, then per-channel gains
        write(64, 0x00),
        write(65, 0x81),
        write(66, 0x0D),
        // out-of-range input behaves exactly like 100
        write(64, 0x00),
        write(65, 0x0D),
        write(66, 0x0D),
        // the default level maps to -23 dB on both channels
        write(64, 0x00),
        write(65, 0xD2),
        write(66, 0xD2),
    ];
    let (mut codec, mut i2c) = ready_codec(&extra);
    codec.set_output_levels(0, 100).unwrap();
    codec.set_output_levels(150, 200).unwrap();
    codec
        .set_output_levels(DEFAULT_OUTPUT_PERCENT, DEFAULT_OUTPUT_PERCENT)
        .unwrap();
    i2c.done();
}

#[test]
fn mute_composes_a_single_register_write() {
    let extra = [
        write(64, 0x08), // left only
        write(64, 0x04), // right only
        write(64, 0x0C), // both
        write(64, 0x00), // neither
    ];
    let (mut codec, mut i2c) = ready_codec(&extra);
    codec.set_mute(true, false).unwrap();
    codec.set_mute(false, true).unwrap();
    codec.set_mute(true, true).unwrap();
    codec.set_mute(false, false).unwrap();
    i2c.done();
}

#[test]
fn high_pass_toggle_rewrites_coefficients() {
    // Bypassing zeroes N1 and D1; re-engaging restores the DC-blocking
    // values. The processing-block write (register 61) carries the same
    // value in both directions.
    let mut extra = filter_transactions(ZERO, ZERO);
    extra.extend(filter_transactions(N1_DC_BLOCK, D1_DC_BLOCK));
    let (mut codec, mut i2c) = ready_codec(&extra);
    codec.set_high_pass_filter(false).unwrap();
    codec.set_high_pass_filter(true).unwrap();
    i2c.done();
}

#[test]
fn high_pass_reapply_is_idempotent() {
    let mut extra = filter_transactions(N1_DC_BLOCK, D1_DC_BLOCK);
    extra.extend(filter_transactions(N1_DC_BLOCK, D1_DC_BLOCK));
    let (mut codec, mut i2c) = ready_codec(&extra);
    codec.set_high_pass_filter(true).unwrap();
    codec.set_high_pass_filter(true).unwrap();
    i2c.done();
}

#[test]
fn configure_with_pll_programs_the_dividers() {
    // Drive configure() directly, as a PLL-clocked board would, and check
    // that it unlocks the runtime controls on its own.
    let mut expected = configure_transactions(true);
    expected.push(write(64, 0x00));
    let mut i2c = I2cMock::new(&expected);
    let mut codec = Aic3254::new(i2c.clone(), NoopDelay);
    codec.configure(true).unwrap();
    codec.set_mute(false, false).unwrap();
    i2c.done();
}

#[test]
fn failed_page_switch_leaves_the_cache_cold() {
    // The first select fails; the retry must emit a fresh page select
    // rather than assume the switch happened.
    let expected = [
        select(0).with_error(ErrorKind::Other),
        select(0),
        write(64, 0x0C),
    ];
    let mut i2c = I2cMock::new(&expected);
    let mut codec = Aic3254::new(i2c.clone(), NoopDelay);
    assert_eq!(
        codec.write_register(registers::DAC_MUTE, 0x0C),
        Err(Error::Bus(ErrorKind::Other))
    );
    codec.write_register(registers::DAC_MUTE, 0x0C).unwrap();
    i2c.done();
}

#[test]
fn read_register_uses_the_page_cache_too() {
    let expected = [
        select(0),
        identity_read(0x00),
        // second read on the same page: no select
        I2cTransaction::write_read(ADDR, vec![81], vec![0xC0]),
    ];
    let mut i2c = I2cMock::new(&expected);
    let mut codec = Aic3254::new(i2c.clone(), NoopDelay);
    assert_eq!(codec.read_register(registers::PAGE_SELECT).unwrap(), 0x00);
    assert_eq!(codec.read_register(registers::ADC_SETUP).unwrap(), 0xC0);
    i2c.done();
}
