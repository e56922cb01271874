use crate::framebuffer::{Color, FrameBuffer};
use crate::rng::Xoroshiro128Plus;

/// Chance that a freshly spawned star expands and twinkles over its life
/// instead of staying a static square.
const EXPANSION_FREQUENCY: f32 = 0.1;

const DIM_GRAY: Color = Color { r: 155, g: 155, b: 155 };
const WHITE: Color = Color { r: 255, g: 255, b: 255 };

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Shape {
    Square,
    Circle,
    Diamond,
    Twinkle,
}

/// One star: a render primitive plus the lifecycle state machine that walks
/// it through its expansion stages. A star is dead while
/// `remaining_lifetime <= 0` and gets recycled in place by the world.
pub struct Star {
    pub(crate) remaining_lifetime: f32,
    pub(crate) x: u32,
    pub(crate) y: u32,
    pub(crate) size: u32,
    pub(crate) shape: Shape,
    pub(crate) should_progress: bool,
    pub(crate) max_lifetime: f32,
    pub(crate) expand_stage: u8,
}

impl Default for Star {
    fn default() -> Self {
        Self {
            remaining_lifetime: 0.0,
            x: 0,
            y: 0,
            size: 0,
            shape: Shape::Square,
            should_progress: false,
            max_lifetime: 0.0,
            expand_stage: 0,
        }
    }
}

impl Star {
    /// Rerolls every field, turning a dead slot back into a live star.
    pub fn initialize(
        &mut self,
        rng: &mut Xoroshiro128Plus,
        world_width: u32,
        world_height: u32,
        max_size: u32,
        max_lifetime: f32,
    ) {
        self.x = (rng.next_f32() * (world_width - 1) as f32) as u32;
        self.y = (rng.next_f32() * (world_height - 1) as f32) as u32;

        self.size = (rng.next_f32() * max_size as f32) as u32;
        if self.size == 0 {
            self.size = 1;
        }

        self.should_progress = rng.next_f32() <= EXPANSION_FREQUENCY;
        self.shape = Shape::Square;

        // Clamp so no star dies almost immediately after spawning
        self.max_lifetime = (rng.next_f32() * max_lifetime).max(max_lifetime * 0.25);
        self.remaining_lifetime = self.max_lifetime;
        self.expand_stage = 0;
    }

    /// Burns lifetime and, for progressing stars, advances the expansion
    /// stage by at most one step when the remaining-lifetime fraction drops
    /// past the current stage's threshold.
    pub fn tick(&mut self, delta_time: f32) {
        self.remaining_lifetime -= delta_time;

        if !self.should_progress {
            return;
        }

        let remaining_percent = self.remaining_lifetime / self.max_lifetime;
        let threshold = match self.expand_stage {
            0 => 0.4,
            1 => 0.3,
            2 => 0.2,
            3 => 0.1,
            4 => 0.05,
            // Stage 5 is terminal, only lifetime keeps draining
            _ => return,
        };
        if remaining_percent > threshold {
            return;
        }

        self.expand_stage += 1;
        match self.expand_stage {
            1 | 2 => {
                // A size of 1 has to step up by one, multiplying by 1.5 and
                // flooring would leave it stuck at 1
                if self.size == 1 {
                    self.size += 1;
                } else {
                    self.size = (self.size as f32 * 1.5) as u32;
                }
                self.shape = Shape::Circle;
            }
            3 => {
                self.size = (self.size as f32 * 2.0) as u32;
                self.shape = Shape::Diamond;
            }
            4 => {
                self.shape = Shape::Square;
            }
            _ => {
                self.size = (self.size as f32 * 1.2) as u32;
                self.shape = Shape::Twinkle;
            }
        }
    }

    /// Young stars fade in dim, then burn white for the rest of their life.
    /// The black branch is unreachable from the render path (dead stars are
    /// filtered first) but kept so the function stays total.
    pub fn color(&self) -> Color {
        let remaining_percent = self.remaining_lifetime / self.max_lifetime;

        if remaining_percent <= 0.0 {
            return Color::BLACK;
        }
        if remaining_percent >= 0.9 {
            return DIM_GRAY;
        }
        WHITE
    }

    pub fn render(&self, buffer: &mut FrameBuffer) {
        if self.remaining_lifetime <= 0.0 {
            return;
        }

        let color = self.color();
        let half_size = self.size as f32 * 0.5;
        let quarter_size = half_size * 0.5;
        let eighth_size = quarter_size * 0.5;
        let radius_squared = half_size * half_size;

        let lo = (-half_size) as i32;
        let hi = (half_size + 0.5) as i32;
        for dy in lo..hi {
            for dx in lo..hi {
                let included = match self.shape {
                    Shape::Square => true,
                    Shape::Circle => (dy * dy + dx * dx) as f32 <= radius_squared,
                    Shape::Diamond => inside_diamond(dx, dy, half_size),
                    Shape::Twinkle => {
                        inside_twinkle(dx, dy, half_size, quarter_size, eighth_size)
                    }
                };

                if included {
                    buffer.put(self.x as i32 + dx, self.y as i32 + dy, color);
                }
            }
        }
    }
}

/// Manhattan-distance diamond of the given half extent.
fn inside_diamond(dx: i32, dy: i32, half_size: f32) -> bool {
    let dx_abs = dx.abs() as f32;
    let dy_abs = dy.abs() as f32;
    half_size - dx_abs - dy_abs > 0.0
}

/// Diamond core cut out of the center plus diagonal rays. Small stars drop
/// the banded diagonal test for an exact one, a band narrower than a pixel
/// would otherwise swallow the rays entirely.
fn inside_twinkle(dx: i32, dy: i32, half_size: f32, quarter_size: f32, eighth_size: f32) -> bool {
    let dx_abs = dx.abs() as f32;
    let dy_abs = dy.abs() as f32;

    let on_diagonal = if eighth_size >= 2.0 {
        dx_abs - eighth_size - dy_abs < 0.0 && dx_abs + eighth_size - dy_abs > 0.0
    } else {
        dy_abs == dx_abs
    };

    let outside_center = quarter_size - dx_abs - dy_abs < 0.0;

    outside_center && (half_size - dx_abs - dy_abs > 0.0 || on_diagonal)
}
