use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyCode},
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::env;
use std::io::{stdout, BufWriter};
use std::time::{Duration, Instant};

mod framebuffer;
mod rng;
mod star;
mod world;

use framebuffer::FrameBuffer;
use world::World;

struct Options {
    star_count: u32,
    seed: Option<u64>,
}

fn print_usage() {
    eprintln!("starsaver - Twinkling night-sky terminal screensaver");
    eprintln!();
    eprintln!("Usage: starsaver [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!(
        "  --stars N  Maximum star count, {}-{} (values outside the range use the default {})",
        world::MIN_STAR_COUNT,
        world::MAX_STAR_COUNT,
        world::DEFAULT_STAR_COUNT
    );
    eprintln!("  --seed N   Seed the random source for a reproducible sky");
    eprintln!();
    eprintln!("Press 'q', ESC, or Ctrl+C to exit");
}

/// Out-of-range counts silently fall back to the default; only a value that
/// is not a number at all is a usage error.
fn parse_star_count(arg: &str) -> Option<u32> {
    let count: u32 = arg.parse().ok()?;
    if (world::MIN_STAR_COUNT..=world::MAX_STAR_COUNT).contains(&count) {
        Some(count)
    } else {
        Some(world::DEFAULT_STAR_COUNT)
    }
}

fn session_seed(options: &Options) -> u64 {
    options.seed.unwrap_or_else(|| fastrand::u64(..))
}

/// Half-block cells give two pixel rows per terminal row. A degenerate
/// report of zero columns or rows would leave the world nothing to sample
/// positions from, so clamp to one cell.
fn surface_dimensions(cols: u16, rows: u16) -> (u32, u32) {
    (u32::from(cols).max(1), u32::from(rows).max(1) * 2)
}

fn run(options: &Options) -> std::io::Result<()> {
    let stdout = stdout();
    let mut stdout = BufWriter::with_capacity(1024 * 64, stdout);

    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All))?;

    let (cols, rows) = terminal::size()?;
    let (width, height) = surface_dimensions(cols, rows);
    let mut world = World::new(width, height, options.star_count, session_seed(options));
    let mut buffer = FrameBuffer::new(width, height);

    let mut last_frame = Instant::now();
    let mut accumulator = 0.0f32;
    const FIXED_DT: f32 = 1.0 / 60.0;

    loop {
        if event::poll(Duration::from_millis(1))? {
            match event::read()? {
                Event::Key(key_event) => {
                    if key_event.code == KeyCode::Char('q')
                        || key_event.code == KeyCode::Esc
                        || (key_event.code == KeyCode::Char('c')
                            && key_event.modifiers.contains(event::KeyModifiers::CONTROL))
                    {
                        break;
                    }
                }
                Event::Resize(cols, rows) => {
                    // Full session reset: the previous pass has finished by
                    // the time we get here, so tearing both down is safe
                    let (width, height) = surface_dimensions(cols, rows);
                    world = World::new(width, height, options.star_count, session_seed(options));
                    buffer = FrameBuffer::new(width, height);
                    execute!(stdout, Clear(ClearType::All))?;
                }
                _ => {}
            }
        }

        let now = Instant::now();
        let frame_time = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;

        accumulator += frame_time;
        if accumulator > FIXED_DT * 3.0 {
            accumulator = FIXED_DT * 3.0;
        }

        while accumulator >= FIXED_DT {
            buffer.clear();
            world.tick(FIXED_DT, &mut buffer);
            accumulator -= FIXED_DT;
        }

        buffer.present(&mut stdout)?;
    }

    execute!(stdout, Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut options = Options {
        star_count: world::DEFAULT_STAR_COUNT,
        seed: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--stars" => {
                if i + 1 < args.len() {
                    if let Some(count) = parse_star_count(&args[i + 1]) {
                        options.star_count = count;
                        i += 2;
                    } else {
                        eprintln!("Invalid star count: {}", args[i + 1]);
                        std::process::exit(1);
                    }
                } else {
                    eprintln!("--stars requires a count");
                    std::process::exit(1);
                }
            }
            "--seed" => {
                if i + 1 < args.len() {
                    match args[i + 1].parse() {
                        Ok(seed) => {
                            options.seed = Some(seed);
                            i += 2;
                        }
                        Err(_) => {
                            eprintln!("Invalid seed: {}", args[i + 1]);
                            std::process::exit(1);
                        }
                    }
                } else {
                    eprintln!("--seed requires a value");
                    std::process::exit(1);
                }
            }
            "help" | "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            arg => {
                eprintln!("Unknown option: {arg}");
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        }
    }

    run(&options)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_count_in_range_is_accepted() {
        assert_eq!(parse_star_count("100"), Some(100));
        assert_eq!(parse_star_count("500"), Some(500));
        assert_eq!(parse_star_count("250"), Some(250));
    }

    #[test]
    fn star_count_out_of_range_falls_back_to_default() {
        assert_eq!(parse_star_count("99"), Some(world::DEFAULT_STAR_COUNT));
        assert_eq!(parse_star_count("501"), Some(world::DEFAULT_STAR_COUNT));
        assert_eq!(parse_star_count("0"), Some(world::DEFAULT_STAR_COUNT));
    }

    #[test]
    fn star_count_that_is_not_a_number_is_rejected() {
        assert_eq!(parse_star_count("many"), None);
        assert_eq!(parse_star_count("-5"), None);
        assert_eq!(parse_star_count(""), None);
    }

    #[test]
    fn zero_sized_terminal_is_clamped_to_one_cell() {
        assert_eq!(surface_dimensions(0, 0), (1, 2));
        assert_eq!(surface_dimensions(0, 24), (1, 48));
        assert_eq!(surface_dimensions(80, 0), (80, 2));
        assert_eq!(surface_dimensions(80, 24), (80, 48));
    }
}
