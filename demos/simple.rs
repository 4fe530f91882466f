use as1130::{
    interface::Interface, As1130, Bitmap24x5, ConfigBuilder, Current, Error, MovieLoopCount,
    ScrollingDirection,
};
use embedded_hal_mock::eh1::delay::NoopDelay;

/// Stand-in for a real chip on the bus, replace with an `I2cInterface` from your HAL.
struct SimulatedChip {
    memory: Vec<[u8; 256]>,
    bank: usize,
    offset: usize,
}

impl SimulatedChip {
    fn new() -> Self {
        Self {
            memory: vec![[0; 256]; 256],
            bank: 0,
            offset: 0,
        }
    }
}

impl Interface for SimulatedChip {
    type Error = Error<()>;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        match bytes {
            [0xfd, bank] => self.bank = *bank as usize,
            [offset] => self.offset = *offset as usize,
            [offset, value] => self.memory[self.bank][*offset as usize] = *value,
            _ => return Err(Error::Interface(())),
        }
        Ok(())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        buffer[0] = self.memory[self.bank][self.offset];
        Ok(1)
    }
}

fn main() -> Result<(), Error<()>> {
    let mut delay = NoopDelay::new();

    let config = ConfigBuilder::new()
        .current(Current::Current10mA)
        .max_test_polls(Some(100))
        .build();
    let mut matrix = As1130::new(SimulatedChip::new(), &config);

    if !matrix.is_chip_connected() {
        println!("no chip found");
        return Ok(());
    }

    matrix.init()?;
    matrix.set_blink_and_pwm_set_all(0, false, 0xff)?;

    // a diagonal stripe, one frame per column offset
    for frame in 0..5u8 {
        let mut bitmap = Bitmap24x5::new();
        for x in 0..Bitmap24x5::WIDTH {
            let y = (x + frame as usize) % Bitmap24x5::HEIGHT;
            bitmap.set(x, y, true);
        }
        matrix.set_on_off_frame(frame, &bitmap, 0)?;
    }

    matrix.set_movie_frame_count(5)?;
    matrix.set_frame_delay_ms(100)?;
    matrix.set_movie_loop_count(MovieLoopCount::Endless)?;
    matrix.set_scrolling_direction(ScrollingDirection::Left)?;
    matrix.start_movie(0, false)?;
    matrix.start_chip()?;

    matrix.run_manual_test(&mut delay)?;
    for led in [0x00, 0x0a, 0x5a, 0xba] {
        println!("LED {led:#04x}: {:?}", matrix.get_led_status(led)?);
    }

    Ok(())
}
