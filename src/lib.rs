//! # TLV320AIC3254 Driver
//!
//! This is a driver for the Texas Instruments TLV320AIC3254 stereo audio
//! CODEC.
//!
//! Specifically, this driver is for setting the registers in the
//! TLV320AIC3254 over I²C - this driver does not handle the digital audio
//! interface (I²S, or similar).
//!
//! The TLV320AIC3254 exposes a *paged* register space: offset 0 of every
//! page is a page-select register, and all other transactions address an
//! offset within the currently selected page. The [`Aic3254`] object caches
//! the selected page so that a page-select transaction only goes out on the
//! bus when the target register lives on a different page than the previous
//! one.
//!
//! The driver brings the device from reset into a streaming-ready state
//! ([`Aic3254::initialize`]) and then offers runtime control of the output
//! level, per-channel DAC mute, and a DC-blocking high-pass filter on the
//! capture path.
//!
//! # Example
//!
//! You might set up the CODEC like this:
//!
//! ```ignore
//! let mut codec = tlv320aic3254::Aic3254::new(i2c, delay);
//! codec.initialize()?;                // reset, clocking, routing, filter
//! codec.set_output_levels(75, 75)?;   // percent, per channel
//! codec.set_high_pass_filter(false)?; // bypass the DC-blocking filter
//! codec.set_mute(true, false)?;       // mute the left channel only
//! ```

#![no_std]
#![deny(unsafe_code)]
#![deny(missing_docs)]

pub mod registers;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::registers as reg;
use crate::registers::Register;

//
// Public Types
//

/// Errors this driver can produce.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error<E> {
    /// An I²C transaction failed or timed out.
    ///
    /// The device may be partway through a multi-register sequence and
    /// cannot be assumed to be in a known state; the safe recovery is to
    /// run [`Aic3254::initialize`] again from reset. The driver never
    /// retries a transaction.
    Bus(E),
    /// A runtime control was called before [`Aic3254::initialize`] (or
    /// [`Aic3254::configure`]) had completed.
    NotConfigured,
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Error::Bus(error)
    }
}

/// Driver for the TLV320AIC3254 register interface.
///
/// Owns the I²C bus handle, a delay provider for the settling waits during
/// bring-up, and the page-select cache. One instance per device; the page
/// cache is not synchronised, so concurrent callers must serialise whole
/// operations externally.
pub struct Aic3254<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    /// Last page selected on the bus. `None` until the first select, so a
    /// cold start always emits one.
    current_page: Option<u8>,
    /// Set once a configuration sequence has run to completion. Gates the
    /// runtime volume/mute/filter controls.
    configured: bool,
}

//
// Private Types
//

/// One entry of a bring-up sequence.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Action {
    /// A paged register write.
    Write(Register, u8),
    /// An unconditional page select, as the datasheet sequence spells out
    /// at section boundaries.
    SelectPage(u8),
    /// A settling wait.
    DelayMs(u32),
}

/// Coefficients for the first-order IIR section of the ADC processing
/// block, as 24-bit two's-complement Q23 words.
struct IirCoefficients {
    n0: u32,
    n1: u32,
    d1: u32,
}

//
// Public Data
//

/// Baseline output level written at the end of [`Aic3254::initialize`],
/// in percent.
pub const DEFAULT_OUTPUT_PERCENT: u8 = 58;

//
// Private Data
//

/// DAC mute register: bit 3 mutes the left channel, bit 2 the right.
const DAC_MUTE_LEFT: u8 = 1 << 3;
const DAC_MUTE_RIGHT: u8 = 1 << 2;

/// Output driver gain registers: bit 6 mutes the driver.
const DRIVER_MUTE: u8 = 0b100_0000;

/// ADC channel setup register values: bits 7 and 6 power the left and
/// right channels.
const ADC_POWER_UP: u8 = 0b1100_0000;
const ADC_POWER_DOWN: u8 = 0b0000_0000;

/// Processing block PRB_R1, the one with the programmable first-order IIR
/// section on the ADC path.
const ADC_PRB_WITH_IIR: u8 = 0x01;

/// DC-blocking high-pass filter at fc ≈ 3.7 Hz, fs = 44.1 kHz.
///
/// Implements `H(z) = (1 - z⁻¹) / (1 - α·z⁻¹)` with
/// `α = exp(-2π·fc/fs) ≈ 0.999472`:
///
/// * N0 = +1.0 · 2²³ = `0x7FFFFF`
/// * N1 = -1.0 · 2²³ = `0x800001`
/// * D1 = α · 2²³ ≈ `0x7FB0FE`
const DC_BLOCK: IirCoefficients = IirCoefficients {
    n0: 0x7F_FFFF,
    n1: 0x80_0001,
    d1: 0x7F_B0FE,
};

/// All-pass identity filter: unity N0, zero N1 and D1.
const ALL_PASS: IirCoefficients = IirCoefficients {
    n0: 0x7F_FFFF,
    n1: 0x00_0000,
    d1: 0x00_0000,
};

/// Software reset, then wait for the device to come back. It is not
/// guaranteed responsive before the delay elapses.
const POWER_ON: &[Action] = &[
    Action::SelectPage(0),
    Action::Write(reg::RESET, 0x01),
    Action::DelayMs(10),
];

/// PLL_CLKIN = MCLK, CODEC_CLKIN = PLL_CLK, with P = 1, R = 1, J = 4,
/// D = 0. The dividers are programmed with the PLL powered down, then the
/// power-up write starts the lock.
const PLL_SETUP: &[Action] = &[
    Action::Write(reg::CLOCK_MUX, 0x03),
    Action::Write(reg::PLL_P_R, 0x11),
    Action::Write(reg::PLL_J, 0x04),
    Action::Write(reg::PLL_D_MSB, 0x00),
    Action::Write(reg::PLL_D_LSB, 0x00),
    Action::Write(reg::PLL_P_R, 0x91),
    Action::DelayMs(10),
];

/// The main bring-up program, following the datasheet's recommended order:
/// DAC clock tree, audio interface, analog power and routing, output
/// drivers, DAC digital path, ADC clock tree, input routing.
const MAIN_SETUP: &[Action] = &[
    // DAC clock tree: NDAC = 1, MDAC = 2, DOSR = 128
    Action::Write(reg::NDAC, 0x81),
    Action::Write(reg::MDAC, 0x82),
    Action::Write(reg::DOSR_MSB, 0x00),
    Action::Write(reg::DOSR_LSB, 0x80),
    // Audio interface: I2S, 16-bit words, no data offset
    Action::Write(reg::INTERFACE_1, 0x00),
    Action::Write(reg::INTERFACE_2, 0x00),
    // Analog blocks
    Action::SelectPage(1),
    Action::Write(reg::POWER_CONFIG, 0b0000_1000), // disable coarse AVDD generation
    Action::Write(reg::LDO_CONTROL, 0x01),         // master analog power control
    Action::Write(reg::COMMON_MODE, 0x08),         // output CM = 1.65 V (LDOIN / 2)
    // Route the DACs to both the line and headphone outputs
    Action::Write(reg::LOL_ROUTE, 0x08),
    Action::Write(reg::LOR_ROUTE, 0x08),
    Action::Write(reg::HPL_ROUTE, 0x08),
    Action::Write(reg::HPR_ROUTE, 0x08),
    // Unmute the output drivers: headphones at 0 dB, line out at +6 dB
    Action::Write(reg::HPL_GAIN, 0x00),
    Action::Write(reg::HPR_GAIN, 0x00),
    Action::Write(reg::LOL_GAIN, 0x06),
    Action::Write(reg::LOR_GAIN, 0x06),
    Action::Write(reg::OUTPUT_POWER, 0b0000_1100), // power up HPL, HPR, LOL, LOR
    Action::DelayMs(10),                           // depop and soft-stepping
    // DAC digital path
    Action::SelectPage(0),
    Action::Write(reg::DAC_SETUP, 0b1101_0100),
    Action::Write(reg::DAC_MUTE, 0x00),
    Action::Write(reg::DAC_VOLUME_LEFT, 0x00), // 0 dB
    Action::Write(reg::DAC_VOLUME_RIGHT, 0x00),
    // ADC clock tree: NADC = 1, MADC = 2, AOSR = 128
    Action::Write(reg::NADC, 0x81),
    Action::Write(reg::MADC, 0x82),
    Action::Write(reg::AOSR, 0x80),
    // Input routing: IN1 to the mic PGAs, PGA volume at its default
    Action::SelectPage(1),
    Action::Write(reg::MIC_PGA_LEFT_POS, 0b0100_0000),
    Action::Write(reg::MIC_PGA_RIGHT_POS, 0b0100_0000),
    Action::Write(reg::MIC_PGA_LEFT_NEG, 0b0100_0000),
    Action::Write(reg::MIC_PGA_RIGHT_NEG, 0b0100_0000),
    Action::Write(reg::MIC_PGA_LEFT_VOLUME, 0x80),
    Action::Write(reg::MIC_PGA_RIGHT_VOLUME, 0x80),
    Action::SelectPage(0),
];

//
// impls on Public Types
//

impl<I2C, D> Aic3254<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// The fixed I²C address of the TLV320AIC3254.
    pub const DEFAULT_ADDRESS: u8 = 0x18;

    /// Create a new TLV320AIC3254 driver using the default I²C address.
    ///
    /// No bus traffic happens until [`Aic3254::initialize`] (or one of the
    /// register primitives) is called.
    pub fn new(i2c: I2C, delay: D) -> Aic3254<I2C, D> {
        Self::new_with_address(i2c, delay, Self::DEFAULT_ADDRESS)
    }

    /// Create a new driver with a specific I²C address.
    pub fn new_with_address(i2c: I2C, delay: D, address: u8) -> Aic3254<I2C, D> {
        Aic3254 {
            i2c,
            delay,
            address,
            current_page: None,
            configured: false,
        }
    }

    /// Bring the device from reset into a streaming-ready state.
    ///
    /// Runs the identity check, a baseline mute of the output level, the
    /// full configuration sequence (with the MCLK input driving the CODEC
    /// directly, no PLL), and finally sets both channels to
    /// [`DEFAULT_OUTPUT_PERCENT`]. Call exactly once, before any of the
    /// runtime controls.
    ///
    /// A failed identity check is reported over defmt but does not abort
    /// the bring-up; a failed bus transaction does.
    pub fn initialize(&mut self) -> Result<(), Error<I2C::Error>> {
        self.identify()?;
        self.write_levels(0, 0)?;
        self.configure(false)?;
        self.write_levels(DEFAULT_OUTPUT_PERCENT, DEFAULT_OUTPUT_PERCENT)
    }

    /// Check that the device responds at its identity register.
    ///
    /// Selects page 0 and reads the page-select register back; a
    /// responding TLV320AIC3254 echoes the selected page. On success the
    /// line-out driver gain registers are muted as a precaution, so that
    /// nothing audible escapes before [`Aic3254::configure`] sets real
    /// gains. Returns whether the device was found; an absent device is
    /// *not* an error.
    pub fn identify(&mut self) -> Result<bool, Error<I2C::Error>> {
        self.select_page(0)?;
        let id = self.read_register(reg::PAGE_SELECT)?;
        let present = id == 0;
        if present {
            #[cfg(feature = "defmt")]
            defmt::info!("TLV320AIC3254 found");
            self.write_register(reg::LOL_GAIN, DRIVER_MUTE)?;
            self.write_register(reg::LOR_GAIN, DRIVER_MUTE)?;
        } else {
            #[cfg(feature = "defmt")]
            defmt::warn!("TLV320AIC3254 not found (identity register 0x{:02x})", id);
        }
        Ok(present)
    }

    /// Run the full configuration sequence on a freshly reset device.
    ///
    /// With `use_pll` set, the external master clock is routed through the
    /// PLL (P = 1, R = 1, J = 4, D = 0); otherwise MCLK drives the CODEC
    /// directly. The sequence must run to completion with no interleaved
    /// register writes, so do not call the runtime controls from another
    /// context while this is in flight.
    ///
    /// On success the driver is marked configured and the runtime controls
    /// become available. [`Aic3254::initialize`] calls this with the PLL
    /// disabled; call it directly only on boards that need the PLL.
    pub fn configure(&mut self, use_pll: bool) -> Result<(), Error<I2C::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("Configuring TLV320AIC3254, use_pll={}", use_pll);
        self.run(POWER_ON)?;
        if use_pll {
            self.run(PLL_SETUP)?;
        }
        self.run(MAIN_SETUP)?;
        // Capture path: engage the DC-blocking filter, then power up the
        // ADC channels and zero the fine gain.
        self.load_adc_filter(&DC_BLOCK)?;
        self.write_register(reg::ADC_SETUP, ADC_POWER_UP)?;
        self.write_register(reg::ADC_FINE_GAIN, 0x00)?;
        self.configured = true;
        Ok(())
    }

    /// Set the output level of both channels, as a percentage.
    ///
    /// Values above 100 are clamped. The percentage maps linearly onto the
    /// DAC digital volume range of -63.5 dB to +6.5 dB in half-dB steps
    /// (register values -127 to +13, two's complement).
    ///
    /// Every level change also clears the DAC mute register for *both*
    /// channels; a caller that wants a channel to stay muted across a
    /// level change must call [`Aic3254::set_mute`] again afterwards.
    pub fn set_output_levels(&mut self, left: u8, right: u8) -> Result<(), Error<I2C::Error>> {
        if !self.configured {
            return Err(Error::NotConfigured);
        }
        self.write_levels(left, right)
    }

    /// Mute or unmute the DAC channels.
    ///
    /// Writes the whole mute register in one transaction, superseding the
    /// unmute side effect of [`Aic3254::set_output_levels`].
    pub fn set_mute(&mut self, mute_left: bool, mute_right: bool) -> Result<(), Error<I2C::Error>> {
        if !self.configured {
            return Err(Error::NotConfigured);
        }
        self.write_register(reg::DAC_MUTE, mute_mask(mute_left, mute_right))
    }

    /// Engage or bypass the DC-blocking high-pass filter on the ADC path.
    ///
    /// Rewrites the first-order IIR coefficients of both channels; engaged
    /// uses the ~3.7 Hz DC-blocking set, bypassed an all-pass identity.
    /// The ADC channels are powered down for the duration of the rewrite
    /// and powered back up afterwards, so expect a short capture gap.
    /// Re-applying the current state is harmless.
    pub fn set_high_pass_filter(&mut self, engaged: bool) -> Result<(), Error<I2C::Error>> {
        if !self.configured {
            return Err(Error::NotConfigured);
        }
        let coefficients = if engaged { &DC_BLOCK } else { &ALL_PASS };
        self.load_adc_filter(coefficients)?;
        #[cfg(feature = "defmt")]
        defmt::info!("ADC high-pass filter engaged={}", engaged);
        Ok(())
    }

    /// Write a register, selecting its page first if needed.
    ///
    /// At most one page-select transaction goes out per call, and none at
    /// all when the cached page already matches. On a bus failure the page
    /// cache keeps its previous value, so a later write re-selects rather
    /// than trusting a select that may not have reached the device.
    pub fn write_register(
        &mut self,
        register: Register,
        value: u8,
    ) -> Result<(), Error<I2C::Error>> {
        if self.current_page != Some(register.page()) {
            self.select_page(register.page())?;
        }
        self.bus_write(register.offset(), value)
    }

    /// Read a register, selecting its page first if needed.
    pub fn read_register(&mut self, register: Register) -> Result<u8, Error<I2C::Error>> {
        if self.current_page != Some(register.page()) {
            self.select_page(register.page())?;
        }
        let mut buffer = [0u8; 1];
        self.i2c
            .write_read(self.address, &[register.offset()], &mut buffer)?;
        Ok(buffer[0])
    }

    /// Unconditionally select a register page and update the page cache.
    ///
    /// The coefficient loaders use this together with raw same-page writes
    /// instead of re-deriving the page from a full logical address on
    /// every byte.
    pub fn select_page(&mut self, page: u8) -> Result<(), Error<I2C::Error>> {
        self.bus_write(reg::PAGE_SELECT.offset(), page)?;
        self.current_page = Some(page);
        Ok(())
    }

    /// Single raw write of an offset on the currently selected page.
    fn bus_write(&mut self, offset: u8, value: u8) -> Result<(), Error<I2C::Error>> {
        self.i2c.write(self.address, &[offset, value])?;
        Ok(())
    }

    /// Step through one bring-up table.
    fn run(&mut self, actions: &[Action]) -> Result<(), Error<I2C::Error>> {
        for action in actions {
            match *action {
                Action::Write(register, value) => self.write_register(register, value)?,
                Action::SelectPage(page) => self.select_page(page)?,
                Action::DelayMs(ms) => self.delay.delay_ms(ms),
            }
        }
        Ok(())
    }

    /// Level write shared by `set_output_levels` and the bring-up, which
    /// needs it before the configured flag is set.
    fn write_levels(&mut self, left: u8, right: u8) -> Result<(), Error<I2C::Error>> {
        self.write_register(reg::DAC_MUTE, 0x00)?;
        self.write_register(reg::DAC_VOLUME_LEFT, level_to_gain(left))?;
        self.write_register(reg::DAC_VOLUME_RIGHT, level_to_gain(right))
    }

    /// Rewrite the ADC IIR coefficient banks of both channels.
    ///
    /// The ADC channels must be powered down while the coefficient
    /// registers change, so the whole rewrite is bracketed by a power
    /// cycle. Left coefficients live on page 8, right on page 9.
    fn load_adc_filter(&mut self, coefficients: &IirCoefficients) -> Result<(), Error<I2C::Error>> {
        self.write_register(reg::ADC_SETUP, ADC_POWER_DOWN)?;
        self.write_register(reg::ADC_PRB, ADC_PRB_WITH_IIR)?;
        self.load_coefficients(
            [
                reg::ADC_COEFF_LEFT_N0,
                reg::ADC_COEFF_LEFT_N1,
                reg::ADC_COEFF_LEFT_D1,
            ],
            coefficients,
        )?;
        self.load_coefficients(
            [
                reg::ADC_COEFF_RIGHT_N0,
                reg::ADC_COEFF_RIGHT_N1,
                reg::ADC_COEFF_RIGHT_D1,
            ],
            coefficients,
        )?;
        self.select_page(0)?;
        self.write_register(reg::ADC_SETUP, ADC_POWER_UP)
    }

    /// Write one channel's N0/N1/D1 coefficient slots, three bytes each
    /// (MSB, MID, LSB), with a single page select up front.
    fn load_coefficients(
        &mut self,
        slots: [Register; 3],
        coefficients: &IirCoefficients,
    ) -> Result<(), Error<I2C::Error>> {
        self.select_page(slots[0].page())?;
        let words = [coefficients.n0, coefficients.n1, coefficients.d1];
        for (slot, word) in slots.into_iter().zip(words) {
            for (index, byte) in coefficient_bytes(word).into_iter().enumerate() {
                self.bus_write(slot.offset() + index as u8, byte)?;
            }
        }
        Ok(())
    }
}

//
// Private Functions
//

/// Map a 0..=100 percentage onto the DAC digital volume register encoding.
///
/// 0 maps to -63.5 dB (`0x81`) and 100 to +6.5 dB (`0x0D`); the register
/// counts in half-dB steps from -127 to +13, two's complement.
const fn level_to_gain(percent: u8) -> u8 {
    let mut clamped = percent as i32;
    if clamped > 100 {
        clamped = 100;
    }
    let mut signed = -127 + clamped * 140 / 100;
    if signed > 13 {
        signed = 13;
    }
    if signed < -127 {
        signed = -127;
    }
    (signed as i8) as u8
}

/// Compose the DAC mute register value.
const fn mute_mask(mute_left: bool, mute_right: bool) -> u8 {
    let mut mask = 0;
    if mute_left {
        mask |= DAC_MUTE_LEFT;
    }
    if mute_right {
        mask |= DAC_MUTE_RIGHT;
    }
    mask
}

/// Split a 24-bit coefficient word into MSB, MID and LSB bytes.
const fn coefficient_bytes(word: u32) -> [u8; 3] {
    [(word >> 16) as u8, (word >> 8) as u8, word as u8]
}
