use crate::framebuffer::FrameBuffer;
use crate::rng::Xoroshiro128Plus;
use crate::star::Star;

pub const MIN_STAR_COUNT: u32 = 100;
pub const DEFAULT_STAR_COUNT: u32 = 300;
pub const MAX_STAR_COUNT: u32 = 500;

/// Fraction of capacity that may spawn in a single frame.
const MAX_SPAWN_RATE: f32 = 0.1;
const MAX_LIFETIME: f32 = 5.0;
const MAX_SIZE: u32 = 5;

/// Fixed-capacity pool of stars. Slots are recycled in place, no allocation
/// happens after construction and slot indices stay stable across frames.
pub struct World {
    width: u32,
    height: u32,
    capacity: u32,
    live_count: u32,
    stars: Vec<Star>,
    rng: Xoroshiro128Plus,
}

impl World {
    pub fn new(width: u32, height: u32, max_star_count: u32, seed: u64) -> Self {
        Self {
            width,
            height,
            capacity: max_star_count,
            live_count: 0,
            stars: (0..max_star_count).map(|_| Star::default()).collect(),
            rng: Xoroshiro128Plus::new(seed),
        }
    }

    /// Advances and renders every live star and fills a random budget of
    /// dead slots with fresh ones, all in one pass over the pool.
    pub fn tick(&mut self, delta_time: f32, buffer: &mut FrameBuffer) {
        let mut to_spawn = 0u32;
        let slack = self.capacity - self.live_count;
        if slack > 0 {
            to_spawn = (self.rng.next_f32() * self.capacity as f32 * MAX_SPAWN_RATE) as u32;
            if to_spawn == 0 {
                to_spawn = (self.capacity as f32 * (MAX_SPAWN_RATE * 0.5)) as u32;

                // Ensure something spawns even when half the rate still
                // rounds down to zero
                if to_spawn == 0 {
                    to_spawn = 1;
                }
            }
            to_spawn = to_spawn.min(slack);
        }

        // Splitting tick from render (and spawning into a separate loop)
        // could vectorize better, but that would need profiling to justify
        for star in &mut self.stars {
            if star.remaining_lifetime > 0.0 {
                star.tick(delta_time);
                star.render(buffer);

                if star.remaining_lifetime <= 0.0 {
                    self.live_count -= 1;
                }
            } else if to_spawn > 0 {
                star.initialize(&mut self.rng, self.width, self.height, MAX_SIZE, MAX_LIFETIME);
                star.render(buffer);

                self.live_count += 1;
                to_spawn -= 1;
            }
        }
    }

    pub fn live_count(&self) -> u32 {
        self.live_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_populates_within_bounds() {
        let mut world = World::new(50, 50, 100, 9);
        let mut buffer = FrameBuffer::new(50, 50);
        buffer.clear();
        world.tick(0.016, &mut buffer);

        assert!(world.live_count() > 0);
        assert!(world.live_count() <= 100);
        for star in world.stars.iter().filter(|s| s.remaining_lifetime > 0.0) {
            assert!(star.x < 50);
            assert!(star.y < 50);
        }
    }

    #[test]
    fn live_count_never_exceeds_capacity() {
        let mut world = World::new(64, 64, 100, 1234);
        let mut buffer = FrameBuffer::new(64, 64);
        for _ in 0..2000 {
            buffer.clear();
            world.tick(0.016, &mut buffer);
            assert!(world.live_count() <= 100);
            let alive = world
                .stars
                .iter()
                .filter(|s| s.remaining_lifetime > 0.0)
                .count();
            assert_eq!(alive as u32, world.live_count());
        }
    }

    #[test]
    fn tiny_pool_falls_back_to_spawning_one() {
        // Capacity 3: both the random budget and the half-rate fallback
        // round to zero, so the forced minimum of one applies
        let mut world = World::new(32, 32, 3, 42);
        let mut buffer = FrameBuffer::new(32, 32);
        world.tick(0.016, &mut buffer);
        assert_eq!(world.live_count(), 1);
    }

    #[test]
    fn deaths_free_slots_for_recycling() {
        let mut world = World::new(32, 32, 10, 7);
        let mut buffer = FrameBuffer::new(32, 32);
        world.tick(0.016, &mut buffer);
        let spawned = world.live_count();
        assert!(spawned > 0);

        // One huge step kills everything spawned so far; the same pass may
        // refill other slots, never more than capacity
        world.tick(100.0, &mut buffer);
        assert!(world.live_count() <= 10);

        // Dead slots are reused in place on later ticks
        world.tick(0.016, &mut buffer);
        assert!(world.live_count() > 0);
    }

    #[test]
    fn full_pool_spawns_nothing() {
        let mut world = World::new(32, 32, 5, 3);
        let mut buffer = FrameBuffer::new(32, 32);
        // Small pools fill up after a few ticks of the forced single spawn
        for _ in 0..10 {
            buffer.clear();
            world.tick(0.001, &mut buffer);
        }
        assert_eq!(world.live_count(), 5);
        world.tick(0.001, &mut buffer);
        assert_eq!(world.live_count(), 5);
    }
}
