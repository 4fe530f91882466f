//! Conversion of a 24x5 LED bitmap into the chip's packed frame layout.
//!
//! A native frame consists of 12 segments of two bytes, one segment per
//! current source. The first byte holds LEDs 0..8 of the segment, the low bits
//! of the second byte hold LEDs 8..10. Bits 5..7 of byte 1 select the PWM set
//! used by the frame.
//!
//! LEDs are enumerated column by column (`index = y + 5 * x`), following the
//! wiring of the 24x5 matrix.

use crate::register::FRAME_SIZE;

const LEDS_PER_SEGMENT: usize = 10;
const NUM_SEGMENTS: usize = 12;
const PWM_SET_SHIFT: u8 = 5;
const PWM_SET_MASK: u8 = 0x07;

/// On/off state of a 24x5 LED matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bitmap24x5 {
    // bit `x` of `rows[y]`
    rows: [u32; Self::HEIGHT],
}

impl Bitmap24x5 {
    pub const WIDTH: usize = 24;
    pub const HEIGHT: usize = 5;

    const ROW_MASK: u32 = (1 << Self::WIDTH) - 1;

    /// Creates a bitmap with all LEDs off.
    pub const fn new() -> Self {
        Self {
            rows: [0; Self::HEIGHT],
        }
    }

    /// Creates a bitmap with all LEDs on.
    pub const fn all_on() -> Self {
        Self {
            rows: [Self::ROW_MASK; Self::HEIGHT],
        }
    }

    /// Creates a bitmap from three bytes per row, the most significant bit of
    /// each byte being the leftmost LED.
    pub fn from_rows(data: &[u8; 15]) -> Self {
        let mut bitmap = Self::new();
        for (row, bytes) in bitmap.rows.iter_mut().zip(data.chunks_exact(3)) {
            *row = u32::from(bytes[0]).reverse_bits() >> 24
                | (u32::from(bytes[1]).reverse_bits() >> 16)
                | (u32::from(bytes[2]).reverse_bits() >> 8);
        }
        bitmap
    }

    /// Returns whether the LED at column `x`, row `y` is on.
    ///
    /// # Panics
    ///
    /// Panics if `x >= WIDTH` or `y >= HEIGHT`.
    pub fn get(&self, x: usize, y: usize) -> bool {
        assert!(x < Self::WIDTH && y < Self::HEIGHT);
        self.rows[y] & (1 << x) != 0
    }

    /// Switches the LED at column `x`, row `y` on or off.
    ///
    /// # Panics
    ///
    /// Panics if `x >= WIDTH` or `y >= HEIGHT`.
    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        assert!(x < Self::WIDTH && y < Self::HEIGHT);
        if on {
            self.rows[y] |= 1 << x;
        } else {
            self.rows[y] &= !(1 << x);
        }
    }

    pub fn clear(&mut self) {
        self.rows = [0; Self::HEIGHT];
    }

    /// Iterates over the coordinates of all LEDs that are on.
    pub fn iter_on(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..Self::HEIGHT).flat_map(move |y| {
            (0..Self::WIDTH)
                .filter(move |x| self.rows[y] & (1 << x) != 0)
                .map(move |x| (x, y))
        })
    }
}

/// One frame in the chip's native 24 byte layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NativeFrame([u8; FRAME_SIZE]);

impl NativeFrame {
    const fn empty(pwm_set: u8) -> Self {
        let mut data = [0; FRAME_SIZE];
        data[1] = (pwm_set & PWM_SET_MASK) << PWM_SET_SHIFT;
        Self(data)
    }

    pub const fn as_bytes(&self) -> &[u8; FRAME_SIZE] {
        &self.0
    }

    fn set_led(&mut self, led_index: usize) {
        let segment = led_index / LEDS_PER_SEGMENT;
        let segment_led = led_index % LEDS_PER_SEGMENT;
        let mut byte = segment * 2;
        if segment_led >= 8 {
            byte += 1;
        }
        self.0[byte] |= 1 << (segment_led & 0x7);
    }
}

impl AsRef<[u8]> for NativeFrame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Linear LED index of the matrix position `(x, y)`.
pub const fn led_index(x: usize, y: usize) -> usize {
    y + Bitmap24x5::HEIGHT * x
}

fn encode_leds(bitmap: &Bitmap24x5, frame: &mut NativeFrame) {
    for (x, y) in bitmap.iter_on() {
        frame.set_led(led_index(x, y));
    }
}

/// Encodes `bitmap` as an on/off frame displayed with PWM set `pwm_set`.
pub fn encode_on_off_frame(bitmap: &Bitmap24x5, pwm_set: u8) -> NativeFrame {
    let mut frame = NativeFrame::empty(pwm_set);
    encode_leds(bitmap, &mut frame);
    frame
}

/// Encodes the blink bits of a blink & PWM set. Set bits blink.
pub fn encode_blink_frame(bitmap: &Bitmap24x5) -> NativeFrame {
    let mut frame = NativeFrame([0; FRAME_SIZE]);
    encode_leds(bitmap, &mut frame);
    frame
}

/// On/off frame with every LED of every segment switched on.
pub const fn encode_all_on_frame(pwm_set: u8) -> NativeFrame {
    let mut frame = NativeFrame::empty(pwm_set);
    frame.0[0] = 0xff;
    frame.0[1] |= 0x03;
    let mut segment = 1;
    while segment < NUM_SEGMENTS {
        frame.0[segment * 2] = 0xff;
        frame.0[segment * 2 + 1] = 0x07;
        segment += 1;
    }
    frame
}

/// On/off frame with every LED switched off.
pub const fn encode_all_off_frame(pwm_set: u8) -> NativeFrame {
    NativeFrame::empty(pwm_set)
}

#[cfg(feature = "graphics")]
mod graphics {
    use core::convert::Infallible;

    use embedded_graphics::pixelcolor::BinaryColor;
    use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Pixel, Size};

    use super::Bitmap24x5;

    impl OriginDimensions for Bitmap24x5 {
        fn size(&self) -> Size {
            Size::new(Self::WIDTH as u32, Self::HEIGHT as u32)
        }
    }

    impl DrawTarget for Bitmap24x5 {
        type Color = BinaryColor;
        type Error = Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(point, color) in pixels {
                let (Ok(x), Ok(y)) = (usize::try_from(point.x), usize::try_from(point.y)) else {
                    continue;
                };
                if x < Self::WIDTH && y < Self::HEIGHT {
                    self.set(x, y, color.is_on());
                }
            }

            Ok(())
        }
    }
}
