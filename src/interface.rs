use embedded_hal::i2c;

use crate::Error;

/// Default 7-bit I2C address of the AS1130.
pub const DEFAULT_ADDRESS: u8 = 0x30;

/// Byte-transaction access to a single chip.
///
/// Every call is one complete bus transaction against a fixed target.
pub trait Interface {
    type Error;

    /// Writes `bytes` in a single transaction.
    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Reads up to `buffer.len()` bytes in a single transaction and returns the
    /// number of bytes the target actually delivered.
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error>;
}

pub struct I2cInterface<I2C> {
    pub(crate) i2c: I2C,
    pub(crate) address: u8,
}

impl<I2C> I2cInterface<I2C> {
    /// `address` is the 7bit i2c address, excluding the R/W bit.
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }
}

impl<I2C: i2c::I2c> I2cInterface<I2C> {
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C, IE> Interface for I2cInterface<I2C>
where
    I2C: i2c::I2c<Error = IE>,
{
    type Error = Error<IE>;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.i2c
            .write(self.address, bytes)
            .map_err(Error::Interface)
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        // embedded-hal reads either fill the whole buffer or fail
        self.i2c
            .read(self.address, buffer)
            .map_err(Error::Interface)?;

        Ok(buffer.len())
    }
}


#[cfg(test)]
pub(crate) mod mock {
    use super::Interface;
    use crate::Error;

    #[derive(Debug)]
    #[allow(dead_code)]
    pub(crate) enum Access {
        /// Expect a write of exactly these bytes.
        Write(Vec<u8>),
        /// Expect a write of these bytes and fail it.
        FailWrite(Vec<u8>),
        /// Expect a read and deliver these bytes. Fewer bytes than requested
        /// simulate a short read.
        Read(Vec<u8>),
        /// Expect a read and fail it.
        FailRead,
    }

    #[derive(Debug)]
    pub(crate) struct MockInterface {
        expected_accesses: Vec<Access>,
    }

    impl MockInterface {
        pub fn new(mut accesses: Vec<Access>) -> Self {
            // reverse order so we can just pop() them
            accesses.reverse();

            Self {
                expected_accesses: accesses,
            }
        }

        pub fn done(&self) {
            assert!(
                self.expected_accesses.is_empty(),
                "Not all expected bus accesses were executed: {:x?}",
                self.expected_accesses
            );
        }
    }

    impl Interface for MockInterface {
        type Error = Error<()>;

        fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
            match self.expected_accesses.pop() {
                Some(Access::Write(expected)) => {
                    assert_eq!(
                        expected, bytes,
                        "Expected write of {expected:x?} but got {bytes:x?}"
                    );
                    Ok(())
                }
                Some(Access::FailWrite(expected)) => {
                    assert_eq!(
                        expected, bytes,
                        "Expected write of {expected:x?} but got {bytes:x?}"
                    );
                    Err(Error::Interface(()))
                }
                Some(access) => {
                    panic!("Unexpected bus access when expecting Write({bytes:x?}): {access:?}")
                }
                None => panic!("Bus access beyond the list of expected accesses: Write({bytes:x?})"),
            }
        }

        fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error> {
            match self.expected_accesses.pop() {
                Some(Access::Read(data)) => {
                    let count = data.len().min(buffer.len());
                    buffer[..count].copy_from_slice(&data[..count]);
                    Ok(count)
                }
                Some(Access::FailRead) => Err(Error::Interface(())),
                Some(access) => panic!("Unexpected bus access when expecting Read: {access:?}"),
                None => panic!("Bus access beyond the list of expected accesses: Read"),
            }
        }
    }
}
