//! Allocation walkthrough on a small yard.
//!
//! Loads a track description (the built-in yard below, or a file given on the
//! command line), places three trains on it and prints what each one was
//! granted and why.
//!
//! ```text
//! j0 --west(10)-- j1 --east(10)-- j2
//!                 |
//!            south(8)
//!                 |
//!                 j3
//! ```
//!
//! # Usage
//!
//! ```sh
//! cargo run --example allocation_demo
//! RUST_LOG=rs_interlock=trace cargo run --example allocation_demo
//! ```
//!
//! A custom track file must contain the yard's sections for the trains below
//! to fit on it.

use anyhow::Context;
use rs_interlock::{
    Allocator, Branch, Config, Endpoint, Junction, ReaderConfig, Route, Segment, Track,
    TrackReader,
};
use tracing_subscriber::EnvFilter;

const YARD: &str = "\
# length  junction branch  junction branch
10 j0 FACING  j1 NORMAL
10 j1 FACING  j2 FACING
8  j3 FACING  j1 REVERSE
";

fn endpoint(junction: &str, branch: Branch) -> anyhow::Result<Endpoint> {
    Ok(Endpoint::new(Junction::new(junction)?, branch))
}

/// A single-segment route on the section leaving `from`.
fn on(track: &Track, from: &Endpoint, start: u32, end: u32) -> anyhow::Result<Route> {
    let section = track
        .section_at(from)
        .with_context(|| format!("no section at {from}"))?;
    Ok(Route::single(Segment::new(
        section.clone(),
        from.clone(),
        start,
        end,
    )?))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::default().with_reader(
        ReaderConfig::default()
            .with_skip_blank_lines(true)
            .with_comment_prefix('#'),
    );
    let reader = TrackReader::new(config.reader.clone());
    let track = match std::env::args().nth(1) {
        Some(path) => reader
            .read(&path)
            .with_context(|| format!("loading {path}"))?,
        None => reader.parse(YARD)?,
    };

    println!("Track ({} sections):", track.len());
    println!("{track}");
    println!();

    let j0 = endpoint("j0", Branch::Facing)?;
    let j1 = endpoint("j1", Branch::Facing)?;
    let j3 = endpoint("j3", Branch::Facing)?;

    // Trains 0 and 1 both head for j1; train 2 sits just past it.
    let occupied = [
        on(&track, &j0, 0, 2)?,
        on(&track, &j3, 0, 2)?,
        on(&track, &j1, 4, 6)?,
    ];
    let requested = [
        on(&track, &j0, 0, 10)?,
        on(&track, &j3, 0, 8)?,
        on(&track, &j1, 4, 10)?,
    ];

    let allocator = Allocator::new(&track).with_config(config.allocator);
    let report = allocator.allocate_with_report(&occupied, &requested)?;

    for (train, decision) in report.decisions.iter().enumerate() {
        println!("{decision}");
        for segment in &report.routes[train] {
            println!("    {segment}");
        }
    }
    Ok(())
}
