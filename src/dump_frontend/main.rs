//! Decodes a `.cdg` file and writes the displayed frames as PNG images.
//!
//! By default a frame is written every `interval` seconds of playback, as long as anything on
//! screen changed. With `--seek` only the frames at the given positions are written, in the order
//! provided (seeking backwards is allowed).
//!
//! With `--compare` the frames of the previous run are moved to an `old` directory and compared
//! to the new ones via a `Blake2s` hash. Any frames which differ are printed to the output.

use std::fs::{create_dir_all, remove_dir_all, rename, File};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

use anyhow::{anyhow, bail, Context};
use gumdrop::Options;
use log::*;
use memmap2::Mmap;
use simplelog::{CombinedLogger, Config, TermLogger, TerminalMode};

use cdgplayer::dumping::{calculate_hashes, changed_frames, spawn_writer, FrameDumper};
use cdgplayer::storage::{DumpSettings, FileStorage, Storage, SETTINGS_FILENAME};
use cdgplayer_core::hardware::pack::{PACKS_PER_SECOND, PACK_SIZE};
use cdgplayer_core::hardware::renderer::FrameBuffer;
use cdgplayer_core::{packs_for_seconds, CdgDecoder, DecoderOptions};

use crate::options::AppOptions;

mod options;

const OLD_FRAMES_DIRECTORY: &str = "old/";
const NEW_FRAMES_DIRECTORY: &str = "new/";

fn main() -> anyhow::Result<()> {
    let options: AppOptions = AppOptions::parse_args_default_or_exit();
    let level = LevelFilter::from_str(&options.log_level).unwrap_or(LevelFilter::Info);
    CombinedLogger::init(vec![TermLogger::new(level, Config::default(), TerminalMode::Mixed)])?;

    let storage = FileStorage::new();
    let mut settings: DumpSettings = storage
        .as_ref()
        .and_then(|s| s.get_value(SETTINGS_FILENAME))
        .unwrap_or_default();
    apply_overrides(&mut settings, &options);

    if options.save_defaults {
        match &storage {
            Some(storage) => {
                storage
                    .save_value(SETTINGS_FILENAME, &settings)
                    .context("Could not save the new defaults")?;
                info!(
                    "Saved defaults to {:?}",
                    storage.get_dirs().config_dir().join(SETTINGS_FILENAME)
                );
            }
            None => warn!("No configuration directory available, defaults were not saved"),
        }
    }

    let output_dir = prepare_output(&settings.output_dir, options.compare)?;

    let file = File::open(&options.cdg_path).with_context(|| format!("Could not open {:?}", options.cdg_path))?;
    if file.metadata()?.len() < PACK_SIZE as u64 {
        bail!("{:?} doesn't contain a single CD+G pack", options.cdg_path);
    }
    // The file is only read, and we don't expect anyone to truncate it underneath us.
    let stream = unsafe { Mmap::map(&file)? };
    let total_packs = stream.len() / PACK_SIZE;
    info!(
        "Loaded {:?}: {} packs ({:.1}s)",
        options.cdg_path,
        total_packs,
        total_packs as f64 / PACKS_PER_SECOND as f64
    );

    let start = Instant::now();
    let (sender, writer) = spawn_writer(output_dir.clone());
    let mut dumper = FrameDumper::new(sender, settings.partial_updates);
    let mut decoder = CdgDecoder::new(DecoderOptions::default());
    let mut frame = FrameBuffer::new();

    if options.seek.is_empty() {
        let step = packs_for_seconds(settings.interval).max(1);
        let mut target = 0;
        while target < total_packs {
            target = (target + step).min(total_packs);
            decoder.decode_to(&stream, target)?;
            decoder.present(&mut frame, &mut dumper);
            dumper.finish(&frame, target as f64 / PACKS_PER_SECOND as f64, false)?;
        }
    } else {
        for &position in options.seek.iter() {
            let mut target = packs_for_seconds(position);
            if target > total_packs {
                warn!("Seek position {:.2}s lies past the end of the file, clamping", position);
                target = total_packs;
            }
            decoder.decode_to(&stream, target)?;
            decoder.present(&mut frame, &mut dumper);
            dumper.finish(&frame, position, true)?;
        }
    }

    let frames_sent = dumper.frames_sent();
    // Dropping the sender lets the writer thread drain the channel and exit.
    drop(dumper);
    let written = writer.join().map_err(|_| anyhow!("Frame writer thread panicked"))?;
    info!(
        "Wrote {}/{} frames to {:?} in {:?}",
        written,
        frames_sent,
        output_dir,
        start.elapsed()
    );

    if options.compare {
        compare_with_previous(&settings.output_dir)?;
    }

    Ok(())
}

fn apply_overrides(settings: &mut DumpSettings, options: &AppOptions) {
    if let Some(output_dir) = &options.output_dir {
        settings.output_dir = output_dir.clone();
    }
    if let Some(interval) = options.interval {
        settings.interval = interval;
    }
    if options.full_updates {
        settings.partial_updates = false;
    }
}

/// Creates the directory the frames will be written to.
///
/// When comparing, the frames of the previous run are moved to the `old` directory first.
fn prepare_output(base: impl AsRef<Path>, compare: bool) -> anyhow::Result<PathBuf> {
    let base = base.as_ref();
    if !compare {
        create_dir_all(base)?;
        return Ok(base.to_path_buf());
    }

    let old = base.join(OLD_FRAMES_DIRECTORY);
    let new = base.join(NEW_FRAMES_DIRECTORY);
    if old.exists() {
        remove_dir_all(&old)?;
    }
    if new.exists() {
        rename(&new, &old)?;
    }
    create_dir_all(&new)?;
    Ok(new)
}

fn compare_with_previous(base: impl AsRef<Path>) -> anyhow::Result<()> {
    let old_hashes = calculate_hashes(base.as_ref().join(OLD_FRAMES_DIRECTORY)).unwrap_or_default();
    let new_hashes = calculate_hashes(base.as_ref().join(NEW_FRAMES_DIRECTORY)).unwrap_or_default();

    if old_hashes.is_empty() {
        info!("No previous run to compare against");
        return Ok(());
    }

    let changed = changed_frames(&old_hashes, &new_hashes);
    for path in changed.iter() {
        println!("Change in file: {:?}", path);
    }
    for path in new_hashes.keys().filter(|path| !old_hashes.contains_key(*path)) {
        println!("File now available: {:?}", path);
    }
    info!("{} of {} frames changed", changed.len(), old_hashes.len());

    Ok(())
}
