use std::{path::PathBuf, time};

use anyhow::{bail, Context};
use chip8::{Chip8, Key};
use clap::{command, Parser};

#[derive(Parser, Debug)]
#[command(version, about = "Run a CHIP-8 ROM without a window", long_about = None)]
struct Args {
    #[arg(short, long, value_name = "PATH", help = "Load ROM into memory", value_hint = clap::ValueHint::FilePath)]
    load: PathBuf,
    #[arg(long, default_value_t = 600, help = "Number of 60 Hz frames to run")]
    frames: u64,
    #[arg(long, default_value_t = 11, help = "Instructions executed per frame")]
    ops_per_cycle: usize,
    #[arg(long, help = "Seed for the random number generator")]
    seed: Option<u64>,
    #[arg(long, default_value = "", help = "Keyboard labels held down for the whole run, e.g. \"qe\"")]
    hold: String,
    #[arg(long, default_value_t = 60, help = "Frame rate, 0 runs unpaced")]
    fps: u32,
    #[arg(long, help = "Print registers and memory after the run")]
    dump_memory: bool,
}

/// Map each character of `labels` to a keypad index
fn held_keys(labels: &str) -> anyhow::Result<Vec<usize>> {
    let mut keys = Vec::new();
    for label in labels.chars() {
        let Some(index) = Key::from_label(&label.to_string()).index() else {
            bail!("'{}' is not mapped to a keypad key", label);
        };
        keys.push(index as usize);
    }
    Ok(keys)
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut chip8 = match args.seed {
        Some(seed) => Chip8::with_seed(seed),
        None => Chip8::new(),
    }
    .ops_per_cycle(args.ops_per_cycle);

    chip8
        .load_rom_from_file(&args.load)
        .context("load rom from file")?;

    for key in held_keys(&args.hold).context("parse held keys")? {
        chip8.set_key(key, true);
    }

    let frame_interval = (args.fps > 0).then(|| time::Duration::from_secs(1) / args.fps);

    for frame in 0..args.frames {
        let frame_start = time::Instant::now();

        chip8.cycle();
        if chip8.is_sound_playing() {
            log::debug!("frame {}: sound on", frame);
        }
        if chip8.is_fb_dirty() {
            chip8.fb();
            log::trace!("frame {}: display updated", frame);
        }

        if let Some(interval) = frame_interval {
            if let Some(remaining) = interval.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(remaining);
            }
        }
    }

    print!("{}", chip8.render_text());
    if args.dump_memory {
        println!("{}", chip8);
    }
    Ok(())
}

fn main() -> std::process::ExitCode {
    env_logger::init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("error: {:?}", e);
        return std::process::ExitCode::FAILURE;
    }
    std::process::ExitCode::SUCCESS
}
