use anyhow::Result;
use birdbrain_core::config::SimConfig;
use birdbrain_core::render::{self, Frame, Paint};
use birdbrain_core::world::{TickInput, World};
use clap::Parser;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode},
    execute, queue,
    style::{self, Color},
    terminal,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

/// Watch a population evolve through the obstacle course, or play a
/// single bird yourself.
#[derive(Parser, Debug)]
#[command(name = "birdbrain")]
struct Args {
    /// Play one human-controlled bird (space to jump) instead of
    /// watching the population evolve.
    #[arg(long)]
    human: bool,
    /// RNG seed.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(Clone, Copy, PartialEq, Eq)]
struct Rgb(u8, u8, u8);

const SKY: Rgb = Rgb(40, 44, 52);
const WALL: Rgb = Rgb(80, 170, 60);
const BIRD: Rgb = Rgb(220, 60, 50);
const GROUND: Rgb = Rgb(140, 95, 50);

fn paint_color(paint: Paint) -> Rgb {
    match paint {
        Paint::Wall => WALL,
        Paint::Bird => BIRD,
        Paint::Ground => GROUND,
    }
}

/// Terminal pixel buffer rendered with half blocks, two pixels per cell.
struct PixelBuf {
    w: usize,
    h: usize,
    px: Vec<Rgb>,
}

impl PixelBuf {
    fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![SKY; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px = vec![SKY; w * h];
    }

    fn clear(&mut self) {
        self.px.fill(SKY);
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for py in y.max(0)..(y + h).min(self.h as i32) {
            for px in x.max(0)..(x + w).min(self.w as i32) {
                self.px[py as usize * self.w + px as usize] = c;
            }
        }
    }

    fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        for row in 0..self.h / 2 {
            for col in 0..self.w {
                let top = self.px[row * 2 * self.w + col];
                let bot = self.px[(row * 2 + 1) * self.w + col];
                queue!(
                    out,
                    style::SetForegroundColor(Color::Rgb {
                        r: top.0,
                        g: top.1,
                        b: top.2
                    }),
                    style::SetBackgroundColor(Color::Rgb {
                        r: bot.0,
                        g: bot.1,
                        b: bot.2
                    }),
                    style::Print('\u{2580}'), // ▀
                )?;
            }
            queue!(out, style::ResetColor, style::Print("\r\n"))?;
        }
        Ok(())
    }
}

/// Scale a world frame into the pixel buffer.
fn blit(frame: &Frame, buf: &mut PixelBuf) {
    buf.clear();
    let sx = buf.w as f64 / frame.width;
    let sy = buf.h as f64 / frame.height;
    for rect in &frame.rects {
        buf.fill_rect(
            (rect.x * sx).round() as i32,
            (rect.y * sy).round() as i32,
            ((rect.w * sx).round() as i32).max(1),
            ((rect.h * sy).round() as i32).max(1),
            paint_color(rect.paint),
        );
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = if args.human {
        SimConfig {
            seed: args.seed,
            population_size: 1,
            keep_count: 1,
            clones_per_survivor: 0,
            ..SimConfig::default()
        }
    } else {
        SimConfig {
            seed: args.seed,
            ..SimConfig::default()
        }
    };
    let mut world = World::try_new(config)?;

    terminal::enable_raw_mode()?;
    let mut out = stdout();
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
    )?;
    let result = run(&mut world, args.human, &mut out);
    execute!(
        out,
        terminal::LeaveAlternateScreen,
        cursor::Show,
        terminal::EnableLineWrap,
    )?;
    terminal::disable_raw_mode()?;
    result
}

fn run(world: &mut World, human: bool, out: &mut io::Stdout) -> Result<()> {
    let (cols, rows) = terminal::size()?;
    // Last row is the status line; the rest is the playfield.
    let mut buf = PixelBuf::new(cols as usize, rows.saturating_sub(1) as usize * 2);

    let frame_dur = Duration::from_millis(33); // ~30 fps
    let mut jump_pressed = false;

    loop {
        let frame_start = Instant::now();

        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => jump_pressed = true,
                    _ => {}
                },
                Event::Resize(c, r) => {
                    buf.resize(c as usize, r.saturating_sub(1) as usize * 2);
                }
                _ => {}
            }
        }

        // The jump flag is consumed by exactly one tick.
        let input = if human {
            TickInput::human(std::mem::take(&mut jump_pressed))
        } else {
            TickInput::none()
        };
        let report = world.step(input);

        blit(&render::build_frame(world), &mut buf);
        buf.render(out)?;

        let stats = world.population_stats();
        let status = if human {
            format!(
                " distance {:>6.0}   best {:>6.0}   run {}   [space] jump  [q] quit",
                report.leader_x, stats.best_fitness_ever, stats.epoch,
            )
        } else {
            format!(
                " epoch {:>3}   alive {:>4}/{}   x {:>6.0}   best {:>6.0}   [q] quit",
                stats.epoch,
                report.alive_count,
                stats.population_size,
                report.leader_x,
                stats.best_fitness_ever,
            )
        };
        queue!(
            out,
            cursor::MoveTo(0, buf.h as u16 / 2),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::Print(&status),
        )?;
        out.flush()?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
}
