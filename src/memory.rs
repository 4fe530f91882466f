//! Bank-select-then-access protocol.
//!
//! The chip reuses one address range for all of its memory banks, so every
//! access is a compound operation: the bank identifier goes to the
//! register-selection address first, then the byte offset (and data) follow
//! in a separate transaction.

use log::{trace, warn};

use crate::configuration::ReadPolicy;
use crate::interface::Interface;
use crate::register::{MemoryBank, REGISTER_SELECTION};
use crate::Error;

/// Byte-level access to the chip's memory banks.
pub struct Memory<I> {
    interface: I,
    read_policy: ReadPolicy,
}

impl<I> Memory<I> {
    pub fn new(interface: I, read_policy: ReadPolicy) -> Self {
        Self {
            interface,
            read_policy,
        }
    }

    pub fn read_policy(&self) -> ReadPolicy {
        self.read_policy
    }

    pub fn release(self) -> I {
        self.interface
    }
}

impl<I, IE> Memory<I>
where
    I: Interface<Error = Error<IE>>,
{
    /// Makes `bank` the target of the following addressed access.
    ///
    /// Fails with [`Error::InvalidIndex`] without touching the bus if the bank
    /// index lies outside the chip's range.
    pub fn select_bank(&mut self, bank: MemoryBank) -> Result<(), Error<IE>> {
        if !bank.is_valid() {
            return Err(Error::InvalidIndex);
        }

        trace!("select bank {:?}", bank);
        self.interface.write(&[REGISTER_SELECTION, bank.id()])
    }

    /// Writes a single byte at `offset` inside `bank`.
    pub fn write_byte(
        &mut self,
        bank: MemoryBank,
        offset: u8,
        value: u8,
    ) -> Result<(), Error<IE>> {
        self.select_bank(bank)?;
        self.interface.write(&[offset, value])
    }

    /// Writes `data` to consecutive offsets starting at `start`.
    ///
    /// The chip has no auto-increment across a bank select, so every byte is a
    /// full select-then-write sequence. Data that would run past offset 0xff is
    /// rejected with [`Error::InvalidIndex`] before anything is written.
    pub fn write_bytes(
        &mut self,
        bank: MemoryBank,
        start: u8,
        data: &[u8],
    ) -> Result<(), Error<IE>> {
        if data.len() > 0x100 - usize::from(start) {
            return Err(Error::InvalidIndex);
        }

        for (offset, value) in (start..=u8::MAX).zip(data.iter()) {
            self.write_byte(bank, offset, *value)?;
        }

        Ok(())
    }

    /// Reads a single byte at `offset` inside `bank`.
    ///
    /// If the chip delivers no data, [`ReadPolicy::Lenient`] yields 0 and
    /// [`ReadPolicy::Strict`] fails with [`Error::ShortRead`].
    pub fn read_byte(&mut self, bank: MemoryBank, offset: u8) -> Result<u8, Error<IE>> {
        self.select_bank(bank)?;
        self.interface.write(&[offset])?;

        let mut buffer = [0u8; 1];
        let count = self.interface.read(&mut buffer)?;

        if count < buffer.len() {
            match self.read_policy {
                ReadPolicy::Lenient => {
                    warn!("short read at {:?}+{:#04x}, using 0", bank, offset);
                    return Ok(0);
                }
                ReadPolicy::Strict => return Err(Error::ShortRead),
            }
        }

        Ok(buffer[0])
    }

    /// Issues a bank select of the no-op bank and reports whether the chip
    /// acknowledged it.
    pub fn probe(&mut self) -> bool {
        self.select_bank(MemoryBank::Nop).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::mock::{Access, MockInterface};

    #[test]
    fn test_write_byte_selects_bank_first() {
        let interface = MockInterface::new(vec![
            Access::Write(vec![0xfd, 0x05]),
            Access::Write(vec![0x03, 0xaa]),
        ]);
        let mut memory = Memory::new(interface, ReadPolicy::Lenient);

        memory
            .write_byte(MemoryBank::OnOffFrame(4), 0x03, 0xaa)
            .unwrap();

        memory.release().done();
    }

    #[test]
    fn test_write_byte_aborts_on_failed_select() {
        let interface = MockInterface::new(vec![Access::FailWrite(vec![0xfd, 0xc0])]);
        let mut memory = Memory::new(interface, ReadPolicy::Lenient);

        let result = memory.write_byte(MemoryBank::Control, 0x00, 0x41);
        assert!(matches!(result, Err(Error::Interface(()))));

        memory.release().done();
    }

    #[test]
    fn test_write_byte_reports_failed_data_write() {
        let interface = MockInterface::new(vec![
            Access::Write(vec![0xfd, 0xc0]),
            Access::FailWrite(vec![0x00, 0x41]),
        ]);
        let mut memory = Memory::new(interface, ReadPolicy::Lenient);

        let result = memory.write_byte(MemoryBank::Control, 0x00, 0x41);
        assert!(matches!(result, Err(Error::Interface(()))));

        memory.release().done();
    }

    #[test]
    fn test_write_bytes() {
        let interface = MockInterface::new(vec![
            Access::Write(vec![0xfd, 0x80]),
            Access::Write(vec![0x00, 0x10]),
            Access::Write(vec![0xfd, 0x80]),
            Access::Write(vec![0x01, 0x20]),
            Access::Write(vec![0xfd, 0x80]),
            Access::Write(vec![0x02, 0x30]),
        ]);
        let mut memory = Memory::new(interface, ReadPolicy::Lenient);

        memory
            .write_bytes(MemoryBank::DotCorrection, 0, &[0x10, 0x20, 0x30])
            .unwrap();

        memory.release().done();
    }

    #[test]
    fn test_invalid_bank_is_rejected_without_bus_traffic() {
        let interface = MockInterface::new(vec![]);
        let mut memory = Memory::new(interface, ReadPolicy::Lenient);

        let result = memory.write_byte(MemoryBank::OnOffFrame(0xff), 0, 0);
        assert!(matches!(result, Err(Error::InvalidIndex)));

        let result = memory.read_byte(MemoryBank::OnOffFrame(36), 0);
        assert!(matches!(result, Err(Error::InvalidIndex)));

        let result = memory.select_bank(MemoryBank::BlinkAndPwmSet(6));
        assert!(matches!(result, Err(Error::InvalidIndex)));

        memory.release().done();
    }

    #[test]
    fn test_write_bytes_up_to_last_offset() {
        let interface = MockInterface::new(vec![
            Access::Write(vec![0xfd, 0xc0]),
            Access::Write(vec![0xfe, 0x11]),
            Access::Write(vec![0xfd, 0xc0]),
            Access::Write(vec![0xff, 0x22]),
        ]);
        let mut memory = Memory::new(interface, ReadPolicy::Lenient);

        memory
            .write_bytes(MemoryBank::Control, 0xfe, &[0x11, 0x22])
            .unwrap();

        memory.release().done();
    }

    #[test]
    fn test_write_bytes_past_last_offset_is_rejected() {
        let interface = MockInterface::new(vec![]);
        let mut memory = Memory::new(interface, ReadPolicy::Lenient);

        let result = memory.write_bytes(MemoryBank::Control, 0xfe, &[0x11; 4]);
        assert!(matches!(result, Err(Error::InvalidIndex)));

        let result = memory.write_bytes(MemoryBank::DotCorrection, 0, &[0; 0x101]);
        assert!(matches!(result, Err(Error::InvalidIndex)));

        memory.release().done();
    }

    #[test]
    fn test_read_byte() {
        let interface = MockInterface::new(vec![
            Access::Write(vec![0xfd, 0xc0]),
            Access::Write(vec![0x0f]),
            Access::Read(vec![0x5a]),
        ]);
        let mut memory = Memory::new(interface, ReadPolicy::Lenient);

        assert_eq!(memory.read_byte(MemoryBank::Control, 0x0f).unwrap(), 0x5a);

        memory.release().done();
    }

    #[test]
    fn test_short_read_is_zero_when_lenient() {
        let interface = MockInterface::new(vec![
            Access::Write(vec![0xfd, 0xc0]),
            Access::Write(vec![0x0f]),
            Access::Read(vec![]),
        ]);
        let mut memory = Memory::new(interface, ReadPolicy::Lenient);

        assert_eq!(memory.read_byte(MemoryBank::Control, 0x0f).unwrap(), 0);

        memory.release().done();
    }

    #[test]
    fn test_short_read_fails_when_strict() {
        let interface = MockInterface::new(vec![
            Access::Write(vec![0xfd, 0xc0]),
            Access::Write(vec![0x0f]),
            Access::Read(vec![]),
        ]);
        let mut memory = Memory::new(interface, ReadPolicy::Strict);

        let result = memory.read_byte(MemoryBank::Control, 0x0f);
        assert!(matches!(result, Err(Error::ShortRead)));

        memory.release().done();
    }

    #[test]
    fn test_read_byte_aborts_on_failed_offset_write() {
        let interface = MockInterface::new(vec![
            Access::Write(vec![0xfd, 0xc0]),
            Access::FailWrite(vec![0x0f]),
        ]);
        let mut memory = Memory::new(interface, ReadPolicy::Lenient);

        let result = memory.read_byte(MemoryBank::Control, 0x0f);
        assert!(matches!(result, Err(Error::Interface(()))));

        memory.release().done();
    }

    #[test]
    fn test_read_failure_is_propagated() {
        let interface = MockInterface::new(vec![
            Access::Write(vec![0xfd, 0xc0]),
            Access::Write(vec![0x0f]),
            Access::FailRead,
        ]);
        let mut memory = Memory::new(interface, ReadPolicy::Lenient);

        let result = memory.read_byte(MemoryBank::Control, 0x0f);
        assert!(matches!(result, Err(Error::Interface(()))));

        memory.release().done();
    }

    #[test]
    fn test_probe() {
        let interface = MockInterface::new(vec![
            Access::Write(vec![0xfd, 0x00]),
            Access::FailWrite(vec![0xfd, 0x00]),
        ]);
        let mut memory = Memory::new(interface, ReadPolicy::Lenient);

        assert!(memory.probe());
        assert!(!memory.probe());

        memory.release().done();
    }
}
