use anyhow::Result;
use clap::Parser;
use fumble::{Args, RngDice, default_log_level, flub_midi_bytes, read_midi_file, write_midi_file};
use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(default_log_level(args.verbose))
        .parse_default_env()
        .init();

    let config = args.flub_config();
    debug!("Flub config: {:?}", config);

    let rng = match args.seed {
        Some(seed) => {
            info!("Seeding the dice with {}..!", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };
    let mut dice = RngDice(rng);

    info!("Reading MIDI file: '{}'...", args.input.display());
    let bytes = read_midi_file(&args.input)?;

    let (output, song, report) = flub_midi_bytes(&bytes, &config, &mut dice)?;

    info!(
        "Flubbed {} of {} note(s) across {} track(s) in '{}' ({} forced by held keys)..!",
        report.flubbed,
        report.note_ons,
        report.tracks,
        song.title.as_deref().unwrap_or("<unknown>"),
        report.forced
    );

    if report.orphaned_note_offs > 0 {
        debug!("Ignored {} orphaned note-off(s)", report.orphaned_note_offs);
    }

    if args.dry_run {
        info!("Dry run, not writing '{}'..!", args.output.display());
        return Ok(());
    }

    write_midi_file(&args.output, &output)?;
    info!("Wrote flubbed song to '{}'..!", args.output.display());

    Ok(())
}
