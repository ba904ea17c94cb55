//! This example writes the first frame of a GIF to a file of its own.
//!
//! Basic usage: `cargo run --example extract -- GIF_FILE`
//!
//! Set `RUST_LOG=debug` to see the blocks that were found and skipped. More usage and arguments
//! can be listed by running `cargo run --example extract -- --help`

use anyhow::Context;
use clap::Parser;
use gif_first_frame::FrameExtractor;
use log::info;
use std::{fs, path::PathBuf};

#[derive(Parser)]
struct Args {
    /// Where to write the extracted frame, defaults to `<GIF_FILE stem>.first.gif`
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Log the offset of every frame in the source
    #[clap(long)]
    list: bool,

    /// GIF file
    gif_file: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let data = fs::read(&args.gif_file)
        .with_context(|| format!("failed to read {}", args.gif_file.display()))?;
    let extractor = FrameExtractor::new(&data);

    if args.list {
        let offsets = extractor.frame_offsets()?;
        info!("{} frames", offsets.len());
        for (idx, offset) in offsets.iter().enumerate() {
            info!("frame {} at byte {}", idx, offset);
        }
    }

    let frame = extractor.extract()?;
    let output = args
        .output
        .unwrap_or_else(|| args.gif_file.with_extension("first.gif"));
    fs::write(&output, frame.bytes())
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "wrote {} bytes of {} to {}",
        frame.bytes().len(),
        frame.media_type(),
        output.display()
    );
    Ok(())
}
