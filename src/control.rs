//! Read-modify-write access to the registers of the control bank.

use crate::interface::Interface;
use crate::memory::Memory;
use crate::register::{ControlRegister, Field, MemoryBank};
use crate::Error;

impl<I, IE> Memory<I>
where
    I: Interface<Error = Error<IE>>,
{
    pub fn read_register(&mut self, register: ControlRegister) -> Result<u8, Error<IE>> {
        self.read_byte(MemoryBank::Control, register.addr())
    }

    pub fn write_register(
        &mut self,
        register: ControlRegister,
        value: u8,
    ) -> Result<(), Error<IE>> {
        self.write_byte(MemoryBank::Control, register.addr(), value)
    }

    /// Reads an arbitrary control-bank offset, e.g. one of the open-LED registers.
    pub fn read_control_offset(&mut self, offset: u8) -> Result<u8, Error<IE>> {
        self.read_byte(MemoryBank::Control, offset)
    }

    /// Replaces the bits selected by `mask` with `value & mask`, keeping all
    /// other bits of the register as read from the chip.
    pub fn update_bits(
        &mut self,
        register: ControlRegister,
        mask: u8,
        value: u8,
    ) -> Result<(), Error<IE>> {
        let current = self.read_register(register)?;
        self.write_register(register, (current & !mask) | (value & mask))
    }

    pub fn set_bits(&mut self, register: ControlRegister, mask: u8) -> Result<(), Error<IE>> {
        self.update_bits(register, mask, mask)
    }

    pub fn clear_bits(&mut self, register: ControlRegister, mask: u8) -> Result<(), Error<IE>> {
        self.update_bits(register, mask, 0)
    }

    pub fn set_or_clear_bits(
        &mut self,
        register: ControlRegister,
        mask: u8,
        set: bool,
    ) -> Result<(), Error<IE>> {
        if set {
            self.set_bits(register, mask)
        } else {
            self.clear_bits(register, mask)
        }
    }

    /// Writes `value` (not yet shifted) into `field`.
    pub fn write_field(&mut self, field: Field, value: u8) -> Result<(), Error<IE>> {
        self.update_bits(field.register(), field.mask(), value << field.shift())
    }

    /// Reads `field`, shifted down to bit 0.
    pub fn read_field(&mut self, field: Field) -> Result<u8, Error<IE>> {
        let value = self.read_register(field.register())?;
        Ok((value & field.mask()) >> field.shift())
    }

    pub fn set_flag(&mut self, field: Field, set: bool) -> Result<(), Error<IE>> {
        self.set_or_clear_bits(field.register(), field.mask(), set)
    }
}
