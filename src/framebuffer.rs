use std::io::Write;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    /// Packs into the buffer's pixel format: B in the low byte, G in the
    /// middle, R in the high byte, top byte unused.
    pub fn pack(self) -> u32 {
        self.b as u32 | (self.g as u32) << 8 | (self.r as u32) << 16
    }
}

fn unpack(pixel: u32) -> (u8, u8, u8) {
    ((pixel >> 16) as u8, (pixel >> 8) as u8, pixel as u8)
}

/// Row-major packed 32-bit pixel buffer, presented to the terminal as
/// truecolor half-block cells (one terminal row carries two pixel rows).
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
    output_buf: Vec<u8>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width * height) as usize;
        Self {
            width,
            height,
            pixels: vec![0; len],
            output_buf: Vec::with_capacity(len * 20),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Overwrites the pixel at (x, y). Coordinates outside the buffer are
    /// silently clipped.
    pub fn put(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.width || y >= self.height {
            return;
        }
        self.pixels[(y * self.width + x) as usize] = color.pack();
    }

    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        self.pixels[(y * self.width + x) as usize]
    }

    pub fn present(&mut self, out: &mut impl Write) -> std::io::Result<()> {
        self.output_buf.clear();
        self.output_buf.extend_from_slice(b"\x1b[H"); // Move to home

        // The terminal sits at its default colors after the reset at each
        // line end, so the cache must be empty there, not primed with a
        // sentinel a real pixel could match
        let mut prev_top: Option<(u8, u8, u8)> = None;
        let mut prev_bot: Option<(u8, u8, u8)> = None;

        for y in (0..self.height).step_by(2) {
            for x in 0..self.width {
                let top = unpack(self.pixel(x, y));
                let bot = if y + 1 < self.height {
                    unpack(self.pixel(x, y + 1))
                } else {
                    (0, 0, 0)
                };

                // Only emit color codes if changed
                if prev_top != Some(top) {
                    write!(self.output_buf, "\x1b[48;2;{};{};{}m", top.0, top.1, top.2)?;
                    prev_top = Some(top);
                }
                if prev_bot != Some(bot) {
                    write!(self.output_buf, "\x1b[38;2;{};{};{}m", bot.0, bot.1, bot.2)?;
                    prev_bot = Some(bot);
                }
                self.output_buf.extend_from_slice("▄".as_bytes());
            }
            self.output_buf.extend_from_slice(b"\x1b[0m");
            prev_top = None;
            prev_bot = None;
            if y + 2 < self.height {
                self.output_buf.extend_from_slice(b"\r\n");
            }
        }

        out.write_all(&self.output_buf)?;
        out.flush()?;
        Ok(())
    }
}
