//! The TLV320AIC3254 register map.
//!
//! The device exposes a paged register space: a page-select register at
//! offset 0 of every page picks one of the 128-byte banks, and all other
//! transactions address an offset within the currently selected page.
//! Constants here follow the datasheet names and use decimal offsets to
//! match the datasheet tables.
//!
//! Page 0 holds clocking, DAC and ADC configuration, page 1 the analog
//! routing and power blocks, and pages 8 and 9 the left and right ADC
//! processing-block coefficient banks.

/// A logical register address: a page number plus an offset within that
/// page.
///
/// The physical address used by the datasheet is `page * 128 + offset`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Register {
    page: u8,
    offset: u8,
}

impl Register {
    /// Create a register address.
    ///
    /// Offsets are 7-bit; passing `offset >= 128` is a caller error and
    /// fails compilation when used in a `const` context.
    pub const fn new(page: u8, offset: u8) -> Register {
        assert!(offset < 128, "register offset must be below 128");
        Register { page, offset }
    }

    /// The page this register lives on.
    pub const fn page(self) -> u8 {
        self.page
    }

    /// The offset within the page.
    pub const fn offset(self) -> u8 {
        self.offset
    }

    /// The flat physical address, as printed in the datasheet.
    pub const fn physical(self) -> u16 {
        self.page as u16 * 128 + self.offset as u16
    }
}

/// Page select. Present at offset 0 of every page.
pub const PAGE_SELECT: Register = Register::new(0, 0);
/// Software reset.
pub const RESET: Register = Register::new(0, 1);
/// Clock setting register 1: multiplexers for PLL and codec clock input.
pub const CLOCK_MUX: Register = Register::new(0, 4);
/// Clock setting register 2: PLL power, P and R dividers.
pub const PLL_P_R: Register = Register::new(0, 5);
/// Clock setting register 3: PLL J multiplier.
pub const PLL_J: Register = Register::new(0, 6);
/// Clock setting register 4: PLL D multiplier, MSB.
pub const PLL_D_MSB: Register = Register::new(0, 7);
/// Clock setting register 5: PLL D multiplier, LSB.
pub const PLL_D_LSB: Register = Register::new(0, 8);
/// Clock setting register 6: NDAC divider power and value.
pub const NDAC: Register = Register::new(0, 11);
/// Clock setting register 7: MDAC divider power and value.
pub const MDAC: Register = Register::new(0, 12);
/// DAC oversampling ratio, MSB.
pub const DOSR_MSB: Register = Register::new(0, 13);
/// DAC oversampling ratio, LSB.
pub const DOSR_LSB: Register = Register::new(0, 14);
/// Clock setting register 8: NADC divider power and value.
pub const NADC: Register = Register::new(0, 18);
/// Clock setting register 9: MADC divider power and value.
pub const MADC: Register = Register::new(0, 19);
/// ADC oversampling ratio.
pub const AOSR: Register = Register::new(0, 20);
/// Clock setting register 10: CLKOUT multiplexer.
pub const CLKOUT_MUX: Register = Register::new(0, 25);
/// Clock setting register 11: CLKOUT M divider.
pub const CLKOUT_M: Register = Register::new(0, 26);
/// Audio interface setting register 1: protocol, word length, direction.
pub const INTERFACE_1: Register = Register::new(0, 27);
/// Audio interface setting register 2: data offset.
pub const INTERFACE_2: Register = Register::new(0, 28);
/// Audio interface setting register 3: clock polarity and source.
pub const INTERFACE_3: Register = Register::new(0, 29);
/// Clock setting register 12: BCLK N divider.
pub const BCLK_N: Register = Register::new(0, 30);
/// Audio interface setting register 4: secondary bit clock.
pub const INTERFACE_4: Register = Register::new(0, 31);
/// Audio interface setting register 5: secondary word clock.
pub const INTERFACE_5: Register = Register::new(0, 32);
/// Audio interface setting register 6: secondary clock multiplexers.
pub const INTERFACE_6: Register = Register::new(0, 33);
/// GPIO/MFP5 function control.
pub const GPIO_CONTROL: Register = Register::new(0, 52);
/// DOUT/MFP2 function control.
pub const DOUT_CONTROL: Register = Register::new(0, 53);
/// DIN/MFP1 function control.
pub const DIN_CONTROL: Register = Register::new(0, 54);
/// MISO/MFP4 function control.
pub const MISO_CONTROL: Register = Register::new(0, 55);
/// SCLK/MFP3 function control.
pub const SCLK_CONTROL: Register = Register::new(0, 56);
/// DAC signal-processing block selection.
pub const DAC_PRB: Register = Register::new(0, 60);
/// ADC signal-processing block selection.
pub const ADC_PRB: Register = Register::new(0, 61);
/// DAC channel setup: power, data path, soft-stepping.
pub const DAC_SETUP: Register = Register::new(0, 63);
/// DAC channel mute and volume-control configuration.
pub const DAC_MUTE: Register = Register::new(0, 64);
/// Left DAC digital volume control.
pub const DAC_VOLUME_LEFT: Register = Register::new(0, 65);
/// Right DAC digital volume control.
pub const DAC_VOLUME_RIGHT: Register = Register::new(0, 66);
/// Left beep generator.
pub const BEEP_LEFT: Register = Register::new(0, 71);
/// Right beep generator.
pub const BEEP_RIGHT: Register = Register::new(0, 72);
/// ADC channel setup: power and soft-stepping.
pub const ADC_SETUP: Register = Register::new(0, 81);
/// ADC fine gain adjust and mute.
pub const ADC_FINE_GAIN: Register = Register::new(0, 82);
/// Left ADC digital volume control.
pub const ADC_VOLUME_LEFT: Register = Register::new(0, 83);
/// Right ADC digital volume control.
pub const ADC_VOLUME_RIGHT: Register = Register::new(0, 84);
/// Left channel AGC control registers 1-7.
pub const AGC_LEFT_1: Register = Register::new(0, 86);
/// See [`AGC_LEFT_1`].
pub const AGC_LEFT_2: Register = Register::new(0, 87);
/// See [`AGC_LEFT_1`].
pub const AGC_LEFT_3: Register = Register::new(0, 88);
/// See [`AGC_LEFT_1`].
pub const AGC_LEFT_4: Register = Register::new(0, 89);
/// See [`AGC_LEFT_1`].
pub const AGC_LEFT_5: Register = Register::new(0, 90);
/// See [`AGC_LEFT_1`].
pub const AGC_LEFT_6: Register = Register::new(0, 91);
/// See [`AGC_LEFT_1`].
pub const AGC_LEFT_7: Register = Register::new(0, 92);
/// Right channel AGC control registers 1-7.
pub const AGC_RIGHT_1: Register = Register::new(0, 94);
/// See [`AGC_RIGHT_1`].
pub const AGC_RIGHT_2: Register = Register::new(0, 95);
/// See [`AGC_RIGHT_1`].
pub const AGC_RIGHT_3: Register = Register::new(0, 96);
/// See [`AGC_RIGHT_1`].
pub const AGC_RIGHT_4: Register = Register::new(0, 97);
/// See [`AGC_RIGHT_1`].
pub const AGC_RIGHT_5: Register = Register::new(0, 98);
/// See [`AGC_RIGHT_1`].
pub const AGC_RIGHT_6: Register = Register::new(0, 99);
/// See [`AGC_RIGHT_1`].
pub const AGC_RIGHT_7: Register = Register::new(0, 100);

/// Power configuration: weak AVDD connection.
pub const POWER_CONFIG: Register = Register::new(1, 1);
/// LDO control: analog block power.
pub const LDO_CONTROL: Register = Register::new(1, 2);
/// Left playback configuration (PowerTune mode).
pub const PLAYBACK_LEFT: Register = Register::new(1, 3);
/// Right playback configuration (PowerTune mode).
pub const PLAYBACK_RIGHT: Register = Register::new(1, 4);
/// Output driver power control: HPL, HPR, LOL, LOR.
pub const OUTPUT_POWER: Register = Register::new(1, 9);
/// Common-mode control: output common-mode voltage.
pub const COMMON_MODE: Register = Register::new(1, 10);
/// HPL routing selection.
pub const HPL_ROUTE: Register = Register::new(1, 12);
/// HPR routing selection.
pub const HPR_ROUTE: Register = Register::new(1, 13);
/// LOL routing selection.
pub const LOL_ROUTE: Register = Register::new(1, 14);
/// LOR routing selection.
pub const LOR_ROUTE: Register = Register::new(1, 15);
/// HPL driver gain and mute.
pub const HPL_GAIN: Register = Register::new(1, 16);
/// HPR driver gain and mute.
pub const HPR_GAIN: Register = Register::new(1, 17);
/// LOL driver gain and mute.
pub const LOL_GAIN: Register = Register::new(1, 18);
/// LOR driver gain and mute.
pub const LOR_GAIN: Register = Register::new(1, 19);
/// Headphone driver startup control.
pub const HEADPHONE_STARTUP: Register = Register::new(1, 20);
/// Microphone bias configuration.
pub const MIC_BIAS: Register = Register::new(1, 51);
/// Left mic PGA positive terminal input routing.
pub const MIC_PGA_LEFT_POS: Register = Register::new(1, 52);
/// Left mic PGA negative terminal input routing.
pub const MIC_PGA_LEFT_NEG: Register = Register::new(1, 54);
/// Right mic PGA positive terminal input routing.
pub const MIC_PGA_RIGHT_POS: Register = Register::new(1, 55);
/// Right mic PGA negative terminal input routing.
pub const MIC_PGA_RIGHT_NEG: Register = Register::new(1, 57);
/// Floating input configuration.
pub const FLOATING_INPUT: Register = Register::new(1, 58);
/// Left mic PGA volume control.
pub const MIC_PGA_LEFT_VOLUME: Register = Register::new(1, 59);
/// Right mic PGA volume control.
pub const MIC_PGA_RIGHT_VOLUME: Register = Register::new(1, 60);
/// Analog reference power-up configuration.
pub const REFERENCE_POWER: Register = Register::new(1, 123);

/// Left ADC IIR coefficient N0, MSB. MID and LSB bytes follow at the
/// next two offsets (datasheet coefficient C4).
pub const ADC_COEFF_LEFT_N0: Register = Register::new(8, 24);
/// Left ADC IIR coefficient N1, MSB (C5).
pub const ADC_COEFF_LEFT_N1: Register = Register::new(8, 28);
/// Left ADC IIR coefficient D1, MSB (C6).
pub const ADC_COEFF_LEFT_D1: Register = Register::new(8, 32);
/// Right ADC IIR coefficient N0, MSB (C36).
pub const ADC_COEFF_RIGHT_N0: Register = Register::new(9, 32);
/// Right ADC IIR coefficient N1, MSB (C37).
pub const ADC_COEFF_RIGHT_N1: Register = Register::new(9, 36);
/// Right ADC IIR coefficient D1, MSB (C38).
pub const ADC_COEFF_RIGHT_D1: Register = Register::new(9, 40);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn physical_addresses_match_datasheet() {
        assert_eq!(RESET.physical(), 1);
        assert_eq!(AOSR.physical(), 20);
        assert_eq!(ADC_SETUP.physical(), 81);
        assert_eq!(POWER_CONFIG.physical(), 129);
        assert_eq!(LOL_GAIN.physical(), 146);
        assert_eq!(REFERENCE_POWER.physical(), 251);
        assert_eq!(ADC_COEFF_LEFT_N0.physical(), 8 * 128 + 24);
        assert_eq!(ADC_COEFF_RIGHT_D1.physical(), 9 * 128 + 40);
    }

    #[test]
    fn register_splits_page_and_offset() {
        let r = Register::new(9, 40);
        assert_eq!(r.page(), 9);
        assert_eq!(r.offset(), 40);
    }
}
