//! Driver for the ams AS1130 132-LED matrix driver (12 current sources with 11
//! LEDs each), written for a 24x5 LED matrix.
//!
//! The chip keeps all display state in its own memory: up to 36 on/off frames,
//! up to 6 blink & PWM sets, a dot correction table and the control registers.
//! The driver holds no copy of that state; every setting that touches a shared
//! control register is a read-modify-write on the chip.
//!
//! ```ignore
//! let config = ConfigBuilder::new().current(Current::Current10mA).build();
//! let mut matrix = As1130::new_with_i2c(i2c, DEFAULT_ADDRESS, &config);
//!
//! matrix.init()?;
//! matrix.set_on_off_frame_all_on(0, 0)?;
//! matrix.set_blink_and_pwm_set_all(0, false, 0xff)?;
//! matrix.start_picture(0, false)?;
//! matrix.start_chip()?;
//! ```

#![cfg_attr(not(test), no_std)]

mod configuration;
mod control;
pub mod frame;
pub mod interface;
pub mod memory;
pub mod register;

pub use configuration::{Config, ConfigBuilder, ReadPolicy};
pub use frame::{Bitmap24x5, NativeFrame};
pub use interface::DEFAULT_ADDRESS;

use embedded_hal::delay::DelayNs;
use interface::Interface;
use log::{debug, warn};
use memory::Memory;
use register::{
    ControlRegister, Field, InterruptFlags, MemoryBank, DOT_CORRECTION_SIZE, NUM_FRAMES,
    PWM_VALUES_END, PWM_VALUES_START,
};

/// Error enum for the AS1130 driver
#[derive(Debug)]
pub enum Error<IE> {
    /// An interface related error has occured
    Interface(IE),

    /// The chip delivered less data than requested and the driver is
    /// configured with [`ReadPolicy::Strict`].
    ShortRead,

    /// A manual LED test did not finish within the configured number of polls.
    TestTimeout,

    /// Frame or PWM set index outside the chip's memory.
    InvalidIndex,
}

#[cfg(feature = "defmt")]
impl<IE> defmt::Format for Error<IE> {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Error::Interface(_) => defmt::write!(fmt, "Interface error"),
            Error::ShortRead => defmt::write!(fmt, "Short read"),
            Error::TestTimeout => defmt::write!(fmt, "LED test timeout"),
            Error::InvalidIndex => defmt::write!(fmt, "Invalid frame or PWM set index"),
        }
    }
}

pub trait ToRegisterValue<T> {
    fn register_value(&self) -> T;
}

/// Split of the chip's RAM between on/off frames and blink & PWM sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RamConfiguration {
    /// 36 frames, 1 PWM set
    Config1,
    /// 30 frames, 2 PWM sets
    Config2,
    /// 24 frames, 3 PWM sets
    Config3,
    /// 18 frames, 4 PWM sets
    Config4,
    /// 12 frames, 5 PWM sets
    Config5,
    /// 6 frames, 6 PWM sets
    Config6,
}

impl RamConfiguration {
    /// Number of blink & PWM sets available in this configuration.
    pub const fn pwm_set_count(&self) -> u8 {
        match self {
            RamConfiguration::Config1 => 1,
            RamConfiguration::Config2 => 2,
            RamConfiguration::Config3 => 3,
            RamConfiguration::Config4 => 4,
            RamConfiguration::Config5 => 5,
            RamConfiguration::Config6 => 6,
        }
    }

    /// Number of on/off frames available in this configuration.
    pub const fn frame_count(&self) -> u8 {
        NUM_FRAMES - (self.pwm_set_count() - 1) * 6
    }
}

impl ToRegisterValue<u8> for RamConfiguration {
    fn register_value(&self) -> u8 {
        self.pwm_set_count()
    }
}

/// Current source setting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Current {
    Current0mA,
    Current5mA,
    Current10mA,
    #[default]
    Current15mA,
    Current20mA,
    Current25mA,
    Current30mA,
}

impl ToRegisterValue<u8> for Current {
    fn register_value(&self) -> u8 {
        match self {
            Current::Current0mA => 0x00,
            Current::Current5mA => 0x2b,
            Current::Current10mA => 0x55,
            Current::Current15mA => 0x80,
            Current::Current20mA => 0xaa,
            Current::Current25mA => 0xd5,
            Current::Current30mA => 0xff,
        }
    }
}

/// Number of current-source sections that are scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScanLimit {
    Sections1,
    Sections2,
    Sections3,
    Sections4,
    Sections5,
    Sections6,
    Sections7,
    Sections8,
    Sections9,
    Sections10,
    Sections11,
    /// All 12 sections
    Full,
}

impl ToRegisterValue<u8> for ScanLimit {
    fn register_value(&self) -> u8 {
        match self {
            ScanLimit::Sections1 => 0,
            ScanLimit::Sections2 => 1,
            ScanLimit::Sections3 => 2,
            ScanLimit::Sections4 => 3,
            ScanLimit::Sections5 => 4,
            ScanLimit::Sections6 => 5,
            ScanLimit::Sections7 => 6,
            ScanLimit::Sections8 => 7,
            ScanLimit::Sections9 => 8,
            ScanLimit::Sections10 => 9,
            ScanLimit::Sections11 => 10,
            ScanLimit::Full => 11,
        }
    }
}

/// Number of times a movie is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MovieLoopCount {
    Loops1,
    Loops2,
    Loops3,
    Loops4,
    Loops5,
    Loops6,
    Endless,
}

impl ToRegisterValue<u8> for MovieLoopCount {
    fn register_value(&self) -> u8 {
        match self {
            MovieLoopCount::Loops1 => 1,
            MovieLoopCount::Loops2 => 2,
            MovieLoopCount::Loops3 => 3,
            MovieLoopCount::Loops4 => 4,
            MovieLoopCount::Loops5 => 5,
            MovieLoopCount::Loops6 => 6,
            MovieLoopCount::Endless => 7,
        }
    }
}

/// Frequency of the clock output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockFrequency {
    Clock1MHz,
    Clock500kHz,
    Clock125kHz,
    Clock32kHz,
}

impl ToRegisterValue<u8> for ClockFrequency {
    fn register_value(&self) -> u8 {
        match self {
            ClockFrequency::Clock1MHz => 0x00,
            ClockFrequency::Clock500kHz => 0x04,
            ClockFrequency::Clock125kHz => 0x08,
            ClockFrequency::Clock32kHz => 0x0c,
        }
    }
}

/// Clock synchronization between several chips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Synchronization {
    Off,
    /// Use the clock of another chip
    In,
    /// Provide the clock to other chips
    Out,
}

impl ToRegisterValue<u8> for Synchronization {
    fn register_value(&self) -> u8 {
        match self {
            Synchronization::Off => 0x00,
            Synchronization::In => 0x01,
            Synchronization::Out => 0x02,
        }
    }
}

/// Blink period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkFrequency {
    Blink1_5s,
    Blink3s,
}

/// Frame shown after the last loop of a movie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MovieEndFrame {
    FirstFrame,
    LastFrame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScrollingDirection {
    Right,
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScrollingBlockSize {
    /// Scroll the whole matrix LED by LED
    FullMatrix,
    /// Scroll in blocks of 5 LEDs
    FiveLedBlocks,
}

/// Result of the last open LED test for a single LED
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedStatus {
    /// The index does not address a LED
    Disabled,
    Open,
    Ok,
}

/// Contents of the status register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    test_running: bool,
    movie_running: bool,
    displayed_frame: u8,
}

impl Status {
    pub(crate) fn from_reg_value(value: u8) -> Self {
        Status {
            test_running: value & Field::TestOn.mask() != 0,
            movie_running: value & Field::MovieOn.mask() != 0,
            displayed_frame: (value & Field::DisplayedFrame.mask())
                >> Field::DisplayedFrame.shift(),
        }
    }

    /// True while an open/short LED test is running.
    pub fn test_running(&self) -> bool {
        self.test_running
    }

    /// True while a movie is played.
    pub fn movie_running(&self) -> bool {
        self.movie_running
    }

    /// Index of the frame currently shown.
    pub fn displayed_frame(&self) -> u8 {
        self.displayed_frame
    }
}

/// Holds the pending interrupts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptStatus(u8);

macro_rules! interrupt_flag_fn {
    ($name:ident, $flag:expr, $doc:literal) => {
        #[doc = $doc]
        pub fn $name(&self) -> bool {
            self.0 & $flag != 0
        }
    };
}

impl InterruptStatus {
    pub(crate) fn from_reg_value(value: u8) -> Self {
        InterruptStatus(value)
    }

    /// Raw register value
    pub fn bits(&self) -> u8 {
        self.0
    }

    interrupt_flag_fn!(
        movie_finished,
        InterruptFlags::MOVIE_FINISHED,
        "The movie finished its last loop"
    );
    interrupt_flag_fn!(
        short_test_error,
        InterruptFlags::SHORT_TEST_ERROR,
        "The last LED test found a shorted LED"
    );
    interrupt_flag_fn!(
        open_test_error,
        InterruptFlags::OPEN_TEST_ERROR,
        "The last LED test found an open LED"
    );
    interrupt_flag_fn!(low_vdd, InterruptFlags::LOW_VDD, "Supply voltage too low");
    interrupt_flag_fn!(
        over_temperature,
        InterruptFlags::OVER_TEMPERATURE,
        "Over temperature detected"
    );
    interrupt_flag_fn!(
        power_on_reset,
        InterruptFlags::POWER_ON_RESET,
        "A power-on reset happened"
    );
    interrupt_flag_fn!(
        watchdog,
        InterruptFlags::WATCHDOG,
        "The interface monitoring timed out"
    );
    interrupt_flag_fn!(
        selected_picture,
        InterruptFlags::SELECTED_PICTURE,
        "The frame selected as interrupt frame was shown"
    );
}

/// Converts a frame delay in milliseconds into the 4 bit frame delay field,
/// one step being roughly 32.5ms.
pub const fn frame_delay_ticks(delay_ms: u16) -> u8 {
    let ticks = delay_ms as u32 * 10 / 325;
    if ticks > 0x0f {
        0x0f
    } else {
        ticks as u8
    }
}

/// Highest LED index that addresses a LED.
const MAX_LED_INDEX: u8 = 0xba;

/// Highest LED number inside a current-source section.
const MAX_SECTION_LED: u8 = 0x0a;

/// Driver for the AS1130.
///
/// The driver owns its interface, so every compound bus operation runs
/// without interleaving from other users of the same chip.
pub struct As1130<I> {
    memory: Memory<I>,
    config: Config,
}

impl<I2C, IE> As1130<interface::I2cInterface<I2C>>
where
    I2C: embedded_hal::i2c::I2c<Error = IE>,
{
    pub fn new_with_i2c(i2c: I2C, address: u8, config: &Config) -> Self {
        As1130::new(interface::I2cInterface::new(i2c, address), config)
    }
}

impl<I> As1130<I> {
    /// Create a new AS1130 driver instance using `interface`. No bus traffic
    /// happens until the first operation.
    pub fn new(interface: I, config: &Config) -> Self {
        As1130 {
            memory: Memory::new(interface, config.read_policy),
            config: config.clone(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Raw memory and control register access.
    pub fn memory(&mut self) -> &mut Memory<I> {
        &mut self.memory
    }
}

impl<I, IE> As1130<I>
where
    I: Interface<Error = Error<IE>>,
{
    /// Checks if the chip acknowledges its address.
    pub fn is_chip_connected(&mut self) -> bool {
        self.memory.probe()
    }

    /// Writes the startup settings of the configuration to the chip. The chip
    /// stays in shutdown until [`As1130::start_chip`] is called.
    pub fn init(&mut self) -> Result<(), Error<IE>> {
        debug!("initializing AS1130");

        self.set_ram_configuration(self.config.ram_configuration)?;
        self.set_current_source(self.config.current)?;
        self.set_scan_limit(self.config.scan_limit)?;
        self.set_clock_synchronization(
            self.config.synchronization,
            self.config.clock_frequency,
        )?;

        Ok(())
    }

    fn frame_bank(frame_index: u8) -> Result<MemoryBank, Error<IE>> {
        let bank = MemoryBank::OnOffFrame(frame_index);
        bank.is_valid().then_some(bank).ok_or(Error::InvalidIndex)
    }

    fn pwm_set_bank(set_index: u8) -> Result<MemoryBank, Error<IE>> {
        let bank = MemoryBank::BlinkAndPwmSet(set_index);
        bank.is_valid().then_some(bank).ok_or(Error::InvalidIndex)
    }

    fn check_pwm_set(set_index: u8) -> Result<(), Error<IE>> {
        Self::pwm_set_bank(set_index).map(|_| ())
    }

    /// Sets the RAM configuration. Has to be set before any frame or PWM set
    /// is written.
    pub fn set_ram_configuration(
        &mut self,
        ram_configuration: RamConfiguration,
    ) -> Result<(), Error<IE>> {
        self.memory.write_field(
            Field::MemoryConfiguration,
            ram_configuration.register_value(),
        )
    }

    /// Writes `bitmap` into on/off frame `frame_index`, displayed with the PWM
    /// set `pwm_set`.
    pub fn set_on_off_frame(
        &mut self,
        frame_index: u8,
        bitmap: &Bitmap24x5,
        pwm_set: u8,
    ) -> Result<(), Error<IE>> {
        let bank = Self::frame_bank(frame_index)?;
        Self::check_pwm_set(pwm_set)?;

        let frame = frame::encode_on_off_frame(bitmap, pwm_set);
        self.memory.write_bytes(bank, 0, frame.as_bytes())
    }

    /// Switches every LED of on/off frame `frame_index` on.
    pub fn set_on_off_frame_all_on(
        &mut self,
        frame_index: u8,
        pwm_set: u8,
    ) -> Result<(), Error<IE>> {
        let bank = Self::frame_bank(frame_index)?;
        Self::check_pwm_set(pwm_set)?;

        let frame = frame::encode_all_on_frame(pwm_set);
        self.memory.write_bytes(bank, 0, frame.as_bytes())
    }

    /// Switches every LED of on/off frame `frame_index` off.
    pub fn set_on_off_frame_all_off(
        &mut self,
        frame_index: u8,
        pwm_set: u8,
    ) -> Result<(), Error<IE>> {
        let bank = Self::frame_bank(frame_index)?;
        Self::check_pwm_set(pwm_set)?;

        let frame = frame::encode_all_off_frame(pwm_set);
        self.memory.write_bytes(bank, 0, frame.as_bytes())
    }

    /// Sets the blink bits of blink & PWM set `set_index`. LEDs set in `bitmap`
    /// blink while blinking is enabled.
    pub fn set_blink_frame(&mut self, set_index: u8, bitmap: &Bitmap24x5) -> Result<(), Error<IE>> {
        let bank = Self::pwm_set_bank(set_index)?;

        let frame = frame::encode_blink_frame(bitmap);
        self.memory.write_bytes(bank, 0, frame.as_bytes())
    }

    /// Sets the blink bit of every LED in set `set_index` to `does_blink` and
    /// every PWM value to `pwm_value`.
    pub fn set_blink_and_pwm_set_all(
        &mut self,
        set_index: u8,
        does_blink: bool,
        pwm_value: u8,
    ) -> Result<(), Error<IE>> {
        let bank = Self::pwm_set_bank(set_index)?;

        let segment = if does_blink { [0xff, 0x07] } else { [0x00, 0x00] };
        for offset in (0..register::FRAME_SIZE as u8).step_by(2) {
            self.memory.write_bytes(bank, offset, &segment)?;
        }

        for offset in PWM_VALUES_START..PWM_VALUES_END {
            self.memory.write_byte(bank, offset, pwm_value)?;
        }

        Ok(())
    }

    /// Writes the dot correction value of each of the 12 current-source sections.
    pub fn set_dot_correction(
        &mut self,
        data: &[u8; DOT_CORRECTION_SIZE],
    ) -> Result<(), Error<IE>> {
        self.memory.write_bytes(MemoryBank::DotCorrection, 0, data)
    }

    /// Sets the interrupt mask, see [`InterruptFlags`](register::InterruptFlags).
    pub fn set_interrupt_mask(&mut self, mask: u8) -> Result<(), Error<IE>> {
        self.memory.write_register(ControlRegister::InterruptMask, mask)
    }

    /// Sets the frame which raises the selected-picture interrupt.
    pub fn set_interrupt_frame(&mut self, last_frame: u8) -> Result<(), Error<IE>> {
        Self::frame_bank(last_frame)?;

        self.memory
            .write_register(ControlRegister::InterruptFrameDefinition, last_frame)
    }

    /// Configures the interface monitoring. `timeout` uses the lower 6 bits.
    pub fn set_interface_monitoring(
        &mut self,
        timeout: u8,
        enabled: bool,
    ) -> Result<(), Error<IE>> {
        let value = (timeout & 0x3f) << 1 | u8::from(enabled);
        self.memory
            .write_register(ControlRegister::InterfaceMonitoring, value)
    }

    pub fn set_clock_synchronization(
        &mut self,
        synchronization: Synchronization,
        clock_frequency: ClockFrequency,
    ) -> Result<(), Error<IE>> {
        self.memory.write_register(
            ControlRegister::ClockSynchronization,
            synchronization.register_value() | clock_frequency.register_value(),
        )
    }

    pub fn set_current_source(&mut self, current: Current) -> Result<(), Error<IE>> {
        self.memory
            .write_register(ControlRegister::CurrentSource, current.register_value())
    }

    pub fn set_scan_limit(&mut self, scan_limit: ScanLimit) -> Result<(), Error<IE>> {
        self.memory
            .write_field(Field::ScanLimit, scan_limit.register_value())
    }

    /// Enables or disables blinking for all frames.
    pub fn set_blink_enabled(&mut self, enabled: bool) -> Result<(), Error<IE>> {
        self.memory.set_flag(Field::MovieBlinkDisabled, !enabled)
    }

    /// Displays on/off frame `frame_index` as a still picture.
    pub fn start_picture(&mut self, frame_index: u8, blink_all: bool) -> Result<(), Error<IE>> {
        Self::frame_bank(frame_index)?;

        let mut value = Field::PictureDisplay.mask() | (frame_index & Field::PictureAddress.mask());
        if blink_all {
            value |= Field::PictureBlink.mask();
        }
        self.memory.write_register(ControlRegister::Picture, value)
    }

    pub fn stop_picture(&mut self) -> Result<(), Error<IE>> {
        self.memory.write_register(ControlRegister::Picture, 0x00)
    }

    pub fn set_movie_end_frame(&mut self, movie_end_frame: MovieEndFrame) -> Result<(), Error<IE>> {
        self.memory.set_flag(
            Field::MovieEndWithLast,
            movie_end_frame == MovieEndFrame::LastFrame,
        )
    }

    /// Sets the number of frames of a movie. A count of 0 is treated as 1.
    pub fn set_movie_frame_count(&mut self, count: u8) -> Result<(), Error<IE>> {
        if count > NUM_FRAMES {
            return Err(Error::InvalidIndex);
        }

        self.memory
            .write_field(Field::MovieFrames, count.saturating_sub(1))
    }

    /// Sets the time each movie frame is shown, see [`frame_delay_ticks`].
    pub fn set_frame_delay_ms(&mut self, delay_ms: u16) -> Result<(), Error<IE>> {
        self.memory
            .write_field(Field::FrameDelay, frame_delay_ticks(delay_ms))
    }

    pub fn set_scrolling_enabled(&mut self, enable: bool) -> Result<(), Error<IE>> {
        self.memory.set_flag(Field::ScrollEnable, enable)
    }

    pub fn set_scrolling_block_size(
        &mut self,
        block_size: ScrollingBlockSize,
    ) -> Result<(), Error<IE>> {
        self.memory.set_flag(
            Field::ScrollBlockSize5Led,
            block_size == ScrollingBlockSize::FiveLedBlocks,
        )
    }

    pub fn set_scrolling_direction(
        &mut self,
        direction: ScrollingDirection,
    ) -> Result<(), Error<IE>> {
        self.memory
            .set_flag(Field::ScrollLeft, direction == ScrollingDirection::Left)
    }

    pub fn set_frame_fading_enabled(&mut self, enable: bool) -> Result<(), Error<IE>> {
        self.memory.set_flag(Field::FrameFade, enable)
    }

    pub fn set_blink_frequency(&mut self, frequency: BlinkFrequency) -> Result<(), Error<IE>> {
        self.memory
            .set_flag(Field::BlinkFrequency, frequency == BlinkFrequency::Blink3s)
    }

    pub fn set_movie_loop_count(&mut self, loop_count: MovieLoopCount) -> Result<(), Error<IE>> {
        self.memory
            .write_field(Field::MovieLoops, loop_count.register_value())
    }

    /// Plays a movie starting at on/off frame `first_frame_index`.
    pub fn start_movie(&mut self, first_frame_index: u8, blink_all: bool) -> Result<(), Error<IE>> {
        Self::frame_bank(first_frame_index)?;

        let mut value =
            Field::MovieDisplay.mask() | (first_frame_index & Field::MovieAddress.mask());
        if blink_all {
            value |= Field::MovieBlink.mask();
        }
        self.memory.write_register(ControlRegister::Movie, value)
    }

    pub fn stop_movie(&mut self) -> Result<(), Error<IE>> {
        self.memory.write_register(ControlRegister::Movie, 0x00)
    }

    /// Reset the chip when the supply voltage drops too low.
    pub fn set_low_vdd_reset_enabled(&mut self, enabled: bool) -> Result<(), Error<IE>> {
        self.memory.set_flag(Field::LowVddReset, enabled)
    }

    /// Report a low supply voltage on the IRQ pin.
    pub fn set_low_vdd_status_enabled(&mut self, enabled: bool) -> Result<(), Error<IE>> {
        self.memory.set_flag(Field::LowVddStatus, enabled)
    }

    /// Switch off LEDs found open or shorted by the last LED test.
    pub fn set_led_error_correction_enabled(&mut self, enabled: bool) -> Result<(), Error<IE>> {
        self.memory.set_flag(Field::LedErrorCorrection, enabled)
    }

    pub fn set_dot_correction_enabled(&mut self, enabled: bool) -> Result<(), Error<IE>> {
        self.memory.set_flag(Field::DotCorrection, enabled)
    }

    /// Test all LEDs instead of only the ones switched on in the current frame.
    pub fn set_test_all_leds_enabled(&mut self, enabled: bool) -> Result<(), Error<IE>> {
        self.memory.set_flag(Field::TestAll, enabled)
    }

    /// Run a LED test on every startup of the chip.
    pub fn set_automatic_test_enabled(&mut self, enabled: bool) -> Result<(), Error<IE>> {
        self.memory.set_flag(Field::AutoTest, enabled)
    }

    /// Leaves shutdown and starts normal operation.
    pub fn start_chip(&mut self) -> Result<(), Error<IE>> {
        debug!("starting AS1130");
        self.memory.set_flag(Field::Shutdown, true)
    }

    /// Enters shutdown. All memory is retained.
    pub fn stop_chip(&mut self) -> Result<(), Error<IE>> {
        debug!("stopping AS1130");
        self.memory.set_flag(Field::Shutdown, false)
    }

    /// Runs a manual open/short LED test and blocks until the chip finished it.
    ///
    /// The status is polled every `test_poll_interval_ms`. With `max_test_polls`
    /// configured, the test is abandoned with [`Error::TestTimeout`] once that many
    /// polls reported a running test.
    pub fn run_manual_test<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<IE>> {
        debug!("starting manual LED test");
        self.memory.set_flag(Field::ManualTest, true)?;

        let mut polls: u32 = 0;
        while self.is_led_test_running()? {
            polls = polls.saturating_add(1);
            if self.config.max_test_polls.is_some_and(|max| polls >= max) {
                warn!("manual LED test still running after {} polls", polls);
                self.memory.set_flag(Field::ManualTest, false)?;
                return Err(Error::TestTimeout);
            }
            delay.delay_ms(self.config.test_poll_interval_ms);
        }

        self.memory.set_flag(Field::ManualTest, false)?;
        debug!("manual LED test finished after {} polls", polls);

        Ok(())
    }

    /// Gets the result of the last LED test for `led_index`.
    ///
    /// The high nibble of `led_index` selects the current-source section
    /// (0x0..=0xB), the low nibble the LED inside it (0x0..=0xA). Other values
    /// are reported as [`LedStatus::Disabled`].
    pub fn get_led_status(&mut self, led_index: u8) -> Result<LedStatus, Error<IE>> {
        if led_index > MAX_LED_INDEX || (led_index & 0x0f) > MAX_SECTION_LED {
            return Ok(LedStatus::Disabled);
        }

        let offset = ControlRegister::OPEN_LED_START + (led_index >> 3);
        let mask = 1 << (led_index & 0x7);
        let value = self.memory.read_control_offset(offset)?;

        if value & mask == 0 {
            Ok(LedStatus::Open)
        } else {
            Ok(LedStatus::Ok)
        }
    }

    pub fn is_led_test_running(&mut self) -> Result<bool, Error<IE>> {
        Ok(self.memory.read_field(Field::TestOn)? != 0)
    }

    pub fn is_movie_running(&mut self) -> Result<bool, Error<IE>> {
        Ok(self.memory.read_field(Field::MovieOn)? != 0)
    }

    /// Index of the frame currently shown.
    pub fn get_displayed_frame(&mut self) -> Result<u8, Error<IE>> {
        self.memory.read_field(Field::DisplayedFrame)
    }

    pub fn get_status(&mut self) -> Result<Status, Error<IE>> {
        let value = self.memory.read_register(ControlRegister::Status)?;
        Ok(Status::from_reg_value(value))
    }

    /// Reads the pending interrupts. Reading clears them on the chip.
    pub fn get_interrupt_status(&mut self) -> Result<InterruptStatus, Error<IE>> {
        let value = self
            .memory
            .read_register(ControlRegister::InterruptStatus)?;
        Ok(InterruptStatus::from_reg_value(value))
    }
}

impl<I2C: embedded_hal::i2c::I2c> As1130<interface::I2cInterface<I2C>> {
    /// Destroys the driver and releases the owned `I2c`-interface.
    pub fn release(self) -> I2C {
        self.memory.release().release()
    }
}

#[cfg(test)]
impl As1130<interface::mock::MockInterface> {
    /// Destroys the drivers and returns the owned [`MockInterface`].
    pub fn release(self) -> interface::mock::MockInterface {
        self.memory.release()
    }
}
