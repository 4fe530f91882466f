use crate::{ClockFrequency, Current, RamConfiguration, ScanLimit, Synchronization};

/// Behaviour of memory reads when the chip delivers fewer bytes than requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadPolicy {
    /// Short reads yield 0. A zero register and a failed read look the same.
    #[default]
    Lenient,
    /// Short reads fail with [`Error::ShortRead`](crate::Error::ShortRead).
    Strict,
}

/// Driver configuration, created with [`ConfigBuilder`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub(crate) read_policy: ReadPolicy,
    pub(crate) test_poll_interval_ms: u32,
    pub(crate) max_test_polls: Option<u32>,

    // written by `As1130::init`
    pub(crate) ram_configuration: RamConfiguration,
    pub(crate) current: Current,
    pub(crate) scan_limit: ScanLimit,
    pub(crate) clock_frequency: ClockFrequency,
    pub(crate) synchronization: Synchronization,
}

impl Default for Config {
    fn default() -> Self {
        ConfigBuilder::new().build()
    }
}

impl Config {
    pub fn read_policy(&self) -> ReadPolicy {
        self.read_policy
    }

    pub fn test_poll_interval_ms(&self) -> u32 {
        self.test_poll_interval_ms
    }

    pub fn max_test_polls(&self) -> Option<u32> {
        self.max_test_polls
    }
}

/// Builder for creating the driver configuration.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    configuration: Config,
}

macro_rules! builder_property {
    ($field:ident, $field_type:ty, $doc:literal) => {
        #[doc = $doc]
        pub fn $field(mut self, $field: $field_type) -> Self {
            self.configuration.$field = $field;
            self
        }
    };
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            configuration: Config {
                read_policy: ReadPolicy::Lenient,
                test_poll_interval_ms: 10,
                max_test_polls: None,

                ram_configuration: RamConfiguration::Config1,
                current: Current::Current15mA,
                scan_limit: ScanLimit::Full,
                clock_frequency: ClockFrequency::Clock1MHz,
                synchronization: Synchronization::Off,
            },
        }
    }

    builder_property!(
        read_policy,
        ReadPolicy,
        "Handling of reads that return less data than requested"
    );
    builder_property!(
        test_poll_interval_ms,
        u32,
        "Delay between status polls while a manual LED test runs"
    );
    builder_property!(
        max_test_polls,
        Option<u32>,
        "Maximum number of status polls before a manual LED test is abandoned. `None` polls forever"
    );

    builder_property!(
        ram_configuration,
        RamConfiguration,
        "RAM configuration, splitting memory between frames and PWM sets"
    );
    builder_property!(current, Current, "Current source setting");
    builder_property!(
        scan_limit,
        ScanLimit,
        "Number of scanned current-source sections"
    );
    builder_property!(
        clock_frequency,
        ClockFrequency,
        "Frequency of the clock output"
    );
    builder_property!(
        synchronization,
        Synchronization,
        "Clock synchronization mode"
    );

    pub fn build(self) -> Config {
        self.configuration
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
