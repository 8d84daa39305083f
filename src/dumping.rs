//! Turns rendered CD+G frames into PNG files.
//!
//! The decoder runs on the calling thread and hands finished frames over a bounded channel to a
//! writer thread, so PNG encoding never holds up decoding for long.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs::{read_dir, File};
use std::io;
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

use anyhow::{anyhow, Context};
use blake2::{Blake2s, Digest};
use cdgplayer_core::hardware::renderer::{BlockRect, DisplaySink, FrameBuffer, RESOLUTION_HEIGHT, RESOLUTION_WIDTH};
use crossbeam::channel::*;
use image::{ImageBuffer, Rgba};

pub struct DumpedFrame {
    pub index: usize,
    pub position: f64,
    pub frame: FrameBuffer,
    /// Empty if the entire frame changed.
    pub regions: Vec<BlockRect>,
}

/// [DisplaySink] which collects the changes of one `present` call, to be shipped off with
/// [FrameDumper::finish].
pub struct FrameDumper {
    sender: Sender<DumpedFrame>,
    partial_updates: bool,
    pending_full: bool,
    pending_regions: Vec<BlockRect>,
    frames_sent: usize,
}

impl FrameDumper {
    pub fn new(sender: Sender<DumpedFrame>, partial_updates: bool) -> Self {
        FrameDumper {
            sender,
            partial_updates,
            pending_full: false,
            pending_regions: Vec::new(),
            frames_sent: 0,
        }
    }

    /// Sends `frame` to the writer if anything was presented since the last call, or if `force` is set.
    pub fn finish(&mut self, frame: &FrameBuffer, position: f64, force: bool) -> anyhow::Result<()> {
        if !force && !self.pending_full && self.pending_regions.is_empty() {
            return Ok(());
        }

        let regions = if self.pending_full {
            Vec::new()
        } else {
            std::mem::take(&mut self.pending_regions)
        };
        self.pending_full = false;
        self.pending_regions.clear();

        self.sender
            .send(DumpedFrame {
                index: self.frames_sent,
                position,
                frame: frame.clone(),
                regions,
            })
            .map_err(|_| anyhow!("Frame writer thread stopped unexpectedly"))?;
        self.frames_sent += 1;
        Ok(())
    }

    pub fn frames_sent(&self) -> usize {
        self.frames_sent
    }
}

impl DisplaySink for FrameDumper {
    fn supports_partial_updates(&self) -> bool {
        self.partial_updates
    }

    fn present_full(&mut self, _frame: &FrameBuffer) {
        self.pending_full = true;
    }

    fn present_block(&mut self, _frame: &FrameBuffer, rect: BlockRect) {
        self.pending_regions.push(rect);
    }
}

/// Spawns the PNG writer thread, which runs until the sending side is dropped.
///
/// # Returns
///
/// The thread handle, yielding the amount of frames written.
pub fn spawn_writer(output_dir: PathBuf) -> (Sender<DumpedFrame>, JoinHandle<usize>) {
    let (sender, receiver) = bounded::<DumpedFrame>(4);
    let handle = std::thread::spawn(move || {
        let mut written = 0;
        for dumped in receiver.iter() {
            let file_name = output_dir.join(format!("frame_{:05}.png", dumped.index));
            match save_frame(&dumped.frame, &file_name) {
                Ok(()) => {
                    written += 1;
                    log::debug!(
                        "Wrote {:?} at {:.2}s ({})",
                        file_name,
                        dumped.position,
                        describe_regions(&dumped.regions)
                    );
                }
                Err(e) => log::error!("Failed to write frame {:?} due to: {:?}", file_name, e),
            }
        }
        written
    });

    (sender, handle)
}

fn describe_regions(regions: &[BlockRect]) -> String {
    if regions.is_empty() {
        "full frame".to_string()
    } else {
        format!("{} blocks", regions.len())
    }
}

pub fn save_frame(frame: &FrameBuffer, file_name: impl AsRef<Path>) -> anyhow::Result<()> {
    let buffer: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_raw(RESOLUTION_WIDTH as u32, RESOLUTION_HEIGHT as u32, frame.as_bytes().to_vec())
            .ok_or_else(|| anyhow!("Framebuffer has an unexpected size"))?;

    buffer
        .save(file_name.as_ref())
        .with_context(|| format!("Could not save {:?}", file_name.as_ref()))
}

/// Hashes every `.png` in `directory` with Blake2s, keyed by file stem.
pub fn calculate_hashes(directory: impl AsRef<Path>) -> anyhow::Result<HashMap<OsString, String>> {
    let files = list_files_with_extension(directory, ".png")?;
    let mut result = HashMap::with_capacity(files.len());

    if files.is_empty() {
        return Err(anyhow!("There are no image files to hash"));
    }

    for path in files.iter() {
        let mut file = File::open(path)?;
        let mut hasher = Blake2s::new();
        io::copy(&mut file, &mut hasher)?;
        let hash = hasher.finalize();

        if let Some(stem) = path.file_stem() {
            result.insert(stem.to_os_string(), format!("{:x}", hash));
        }
    }

    Ok(result)
}

/// Names of all frames whose hash differs between `old` and `new`, or which only exist in `old`.
pub fn changed_frames(old: &HashMap<OsString, String>, new: &HashMap<OsString, String>) -> Vec<OsString> {
    let mut result: Vec<OsString> = old
        .iter()
        .filter(|(path, hash)| new.get(*path).filter(|t| t == hash).is_none())
        .map(|(path, _)| path.clone())
        .collect();
    result.sort();
    result
}

fn list_files_with_extension(path: impl AsRef<Path>, extension: impl AsRef<str>) -> anyhow::Result<Vec<PathBuf>> {
    let mut result = Vec::new();
    if path.as_ref().is_dir() {
        for entry in read_dir(path)? {
            let path = entry?.path();
            if path.is_dir() {
                result.extend(list_files_with_extension(&path, extension.as_ref())?);
            } else if path.to_str().filter(|t| t.ends_with(extension.as_ref())).is_some() {
                result.push(path);
            }
        }
    }
    Ok(result)
}
