//! AS1130 address map.
//!
//! Every memory access first writes the bank identifier into the
//! register-selection address, then addresses a byte inside that bank.

/// Address of the register-selection register.
pub const REGISTER_SELECTION: u8 = 0xfd;

/// Number of on/off frame banks.
pub const NUM_FRAMES: u8 = 36;

/// Number of blink & PWM set banks.
pub const NUM_PWM_SETS: u8 = 6;

/// Size in bytes of one on/off frame (and of the blink area of a PWM set).
pub const FRAME_SIZE: usize = 24;

/// First PWM value inside a blink & PWM set.
pub const PWM_VALUES_START: u8 = 0x18;

/// One past the last PWM value inside a blink & PWM set.
pub const PWM_VALUES_END: u8 = 0x9c;

/// Number of dot correction registers, one per current source.
pub const DOT_CORRECTION_SIZE: usize = 12;

/// Independent byte-addressable regions inside the chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MemoryBank {
    /// No bank, used for the connectivity probe.
    Nop,
    /// On/off frame with the given index (0..36).
    OnOffFrame(u8),
    /// Blink & PWM set with the given index (0..6).
    BlinkAndPwmSet(u8),
    DotCorrection,
    Control,
}

impl MemoryBank {
    const ON_OFF_FRAME_BASE: u8 = 0x01;
    const BLINK_AND_PWM_SET_BASE: u8 = 0x40;

    /// Identifier written to the register-selection register.
    ///
    /// Only meaningful when [`is_valid`](Self::is_valid) holds.
    pub const fn id(&self) -> u8 {
        match self {
            MemoryBank::Nop => 0x00,
            MemoryBank::OnOffFrame(frame) => Self::ON_OFF_FRAME_BASE.wrapping_add(*frame),
            MemoryBank::BlinkAndPwmSet(set) => Self::BLINK_AND_PWM_SET_BASE.wrapping_add(*set),
            MemoryBank::DotCorrection => 0x80,
            MemoryBank::Control => 0xc0,
        }
    }

    /// False for indexed banks whose index lies outside the chip's range.
    pub const fn is_valid(&self) -> bool {
        match self {
            MemoryBank::OnOffFrame(frame) => *frame < NUM_FRAMES,
            MemoryBank::BlinkAndPwmSet(set) => *set < NUM_PWM_SETS,
            _ => true,
        }
    }
}

/// Registers of the control bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ControlRegister {
    Picture = 0x00,
    Movie = 0x01,
    MovieMode = 0x02,
    FrameTimeScroll = 0x03,
    DisplayOption = 0x04,
    CurrentSource = 0x05,
    Config = 0x06,
    InterruptMask = 0x07,
    InterruptFrameDefinition = 0x08,
    ShutdownAndOpenShort = 0x09,
    InterfaceMonitoring = 0x0a,
    ClockSynchronization = 0x0b,
    InterruptStatus = 0x0e,
    Status = 0x0f,
}

impl ControlRegister {
    /// First of the 24 open-LED status registers.
    pub const OPEN_LED_START: u8 = 0x20;

    pub const fn addr(self) -> u8 {
        self as u8
    }
}

/// Named bitfields of the control registers.
///
/// Each field knows the register it lives in and its mask, so a mask can
/// never be applied to the wrong register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    PictureAddress,
    PictureDisplay,
    PictureBlink,

    MovieAddress,
    MovieDisplay,
    MovieBlink,

    /// Number of movie frames minus one.
    MovieFrames,
    /// Movie ends with the last frame instead of the first one.
    MovieEndWithLast,
    /// When set, all blink bits are ignored.
    MovieBlinkDisabled,

    FrameDelay,
    ScrollEnable,
    ScrollLeft,
    ScrollBlockSize5Led,
    FrameFade,

    ScanLimit,
    BlinkFrequency,
    MovieLoops,

    MemoryConfiguration,
    CommonAddress,
    DotCorrection,
    LedErrorCorrection,
    LowVddStatus,
    LowVddReset,

    /// Set for normal operation, clear for shutdown.
    Shutdown,
    Initialize,
    ManualTest,
    AutoTest,
    TestAll,

    TestOn,
    MovieOn,
    DisplayedFrame,
}

impl Field {
    pub const fn register(self) -> ControlRegister {
        use Field::*;
        match self {
            PictureAddress | PictureDisplay | PictureBlink => ControlRegister::Picture,
            MovieAddress | MovieDisplay | MovieBlink => ControlRegister::Movie,
            MovieFrames | MovieEndWithLast | MovieBlinkDisabled => ControlRegister::MovieMode,
            FrameDelay | ScrollEnable | ScrollLeft | ScrollBlockSize5Led | FrameFade => {
                ControlRegister::FrameTimeScroll
            }
            ScanLimit | BlinkFrequency | MovieLoops => ControlRegister::DisplayOption,
            MemoryConfiguration | CommonAddress | DotCorrection | LedErrorCorrection
            | LowVddStatus | LowVddReset => ControlRegister::Config,
            Shutdown | Initialize | ManualTest | AutoTest | TestAll => {
                ControlRegister::ShutdownAndOpenShort
            }
            TestOn | MovieOn | DisplayedFrame => ControlRegister::Status,
        }
    }

    pub const fn mask(self) -> u8 {
        use Field::*;
        match self {
            PictureAddress | MovieAddress | MovieFrames => 0x3f,
            PictureDisplay | MovieDisplay | MovieEndWithLast => 0x40,
            PictureBlink | MovieBlink | MovieBlinkDisabled => 0x80,

            FrameDelay => 0x0f,
            ScrollEnable => 0x10,
            ScrollLeft => 0x20,
            ScrollBlockSize5Led => 0x40,
            FrameFade => 0x80,

            ScanLimit => 0x0f,
            BlinkFrequency => 0x10,
            MovieLoops => 0xe0,

            MemoryConfiguration => 0x07,
            CommonAddress => 0x08,
            DotCorrection => 0x10,
            LedErrorCorrection => 0x20,
            LowVddStatus => 0x40,
            LowVddReset => 0x80,

            Shutdown => 0x01,
            Initialize => 0x02,
            ManualTest => 0x04,
            AutoTest => 0x08,
            TestAll => 0x10,

            TestOn => 0x01,
            MovieOn => 0x02,
            DisplayedFrame => 0xfc,
        }
    }

    /// Position of the lowest bit of the field.
    pub const fn shift(self) -> u8 {
        self.mask().trailing_zeros() as u8
    }
}

/// Interrupt bits. The interrupt mask and interrupt status registers share
/// the same layout.
pub struct InterruptFlags;
impl InterruptFlags {
    pub const MOVIE_FINISHED: u8 = 1 << 0;
    pub const SHORT_TEST_ERROR: u8 = 1 << 1;
    pub const OPEN_TEST_ERROR: u8 = 1 << 2;
    pub const LOW_VDD: u8 = 1 << 3;
    pub const OVER_TEMPERATURE: u8 = 1 << 4;
    pub const POWER_ON_RESET: u8 = 1 << 5;
    pub const WATCHDOG: u8 = 1 << 6;
    pub const SELECTED_PICTURE: u8 = 1 << 7;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_ids() {
        assert_eq!(MemoryBank::Nop.id(), 0x00);
        assert_eq!(MemoryBank::OnOffFrame(0).id(), 0x01);
        assert_eq!(MemoryBank::OnOffFrame(35).id(), 0x24);
        assert_eq!(MemoryBank::BlinkAndPwmSet(0).id(), 0x40);
        assert_eq!(MemoryBank::BlinkAndPwmSet(5).id(), 0x45);
        assert_eq!(MemoryBank::DotCorrection.id(), 0x80);
        assert_eq!(MemoryBank::Control.id(), 0xc0);
    }

    #[test]
    fn test_bank_validity() {
        assert!(MemoryBank::OnOffFrame(35).is_valid());
        assert!(!MemoryBank::OnOffFrame(36).is_valid());
        assert!(MemoryBank::BlinkAndPwmSet(5).is_valid());
        assert!(!MemoryBank::BlinkAndPwmSet(6).is_valid());
        assert!(MemoryBank::Control.is_valid());
    }

    #[test]
    fn test_field_shift() {
        assert_eq!(Field::FrameDelay.shift(), 0);
        assert_eq!(Field::MovieLoops.shift(), 5);
        assert_eq!(Field::DisplayedFrame.shift(), 2);
        assert_eq!(Field::LowVddReset.shift(), 7);
    }

    #[test]
    fn test_fields_of_one_register_do_not_overlap() {
        use Field::*;
        let fields = [
            FrameDelay,
            ScrollEnable,
            ScrollLeft,
            ScrollBlockSize5Led,
            FrameFade,
        ];
        let mut seen = 0u8;
        for field in fields {
            assert_eq!(field.register(), ControlRegister::FrameTimeScroll);
            assert_eq!(seen & field.mask(), 0);
            seen |= field.mask();
        }
        assert_eq!(seen, 0xff);
    }
}
