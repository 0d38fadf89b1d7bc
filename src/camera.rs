//! Timelapse camera — periodic stills via `libcamera-still`.
//!
//! Frames land in the images directory as `image_NNN.jpg`, zero-padded and
//! numbered in capture order so they sort lexicographically for assembly
//! into a video. When the frame count gains a digit, every existing frame
//! is renamed to the wider padding first so the ordering property holds
//! across the rollover.
//!
//! Capture failures are logged and skipped; a missing camera never stops
//! climate control.

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::thread;
use std::time::Duration;

use log::{info, warn};

const FRAME_PREFIX: &str = "image_";
const FRAME_SUFFIX: &str = ".jpg";

/// Timelapse capture loop.
pub struct Timelapse {
    dir: PathBuf,
    interval: Duration,
    /// Number of frames already on disk; the next capture is `count + 1`.
    count: u64,
    /// Current zero-pad width of the on-disk names.
    pad: usize,
}

impl Timelapse {
    /// Scan the images directory and resume numbering after the highest
    /// existing frame.
    pub fn new(dir: PathBuf, interval: Duration) -> std::io::Result<Self> {
        fs::create_dir_all(&dir)?;
        let mut count = 0;
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if let Some(n) = parse_frame(&entry.file_name().to_string_lossy()) {
                count = count.max(n);
            }
        }
        let pad = digits(count.max(1));
        info!(
            "timelapse resuming at frame {} in {}",
            count + 1,
            dir.display()
        );
        Ok(Self {
            dir,
            interval,
            count,
            pad,
        })
    }

    /// Capture forever at the configured interval.
    pub fn run(mut self) {
        loop {
            self.capture_frame();
            thread::sleep(self.interval);
        }
    }

    fn capture_frame(&mut self) {
        let next = self.count + 1;
        let pad = digits(next);
        if pad > self.pad {
            self.repad(pad);
        }

        let path = self.dir.join(frame_name(next, self.pad));
        let status = Command::new("libcamera-still")
            .arg("-o")
            .arg(&path)
            .args(["-v", "0", "--immediate", "--vflip", "--hflip"])
            .status();
        match status {
            Ok(status) if status.success() => {
                self.count = next;
            }
            Ok(status) => warn!("libcamera-still exited with {status}, skipping frame {next}"),
            Err(e) => warn!("failed to run libcamera-still: {e}"),
        }
    }

    /// Rename every existing frame to the new pad width.
    fn repad(&mut self, pad: usize) {
        info!("frame numbers reached {} digits, renaming existing frames", pad);
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("cannot list {} for renaming: {e}", self.dir.display());
                return;
            }
        };
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some(n) = parse_frame(&name) {
                let wider = frame_name(n, pad);
                if wider != name {
                    if let Err(e) = fs::rename(entry.path(), self.dir.join(&wider)) {
                        warn!("failed to rename {name} to {wider}: {e}");
                    }
                }
            }
        }
        self.pad = pad;
    }
}

/// `image_007.jpg` for index 7 at pad 3.
fn frame_name(index: u64, pad: usize) -> String {
    format!("{FRAME_PREFIX}{index:0pad$}{FRAME_SUFFIX}")
}

/// Inverse of [`frame_name`]; `None` for anything that is not a frame.
fn parse_frame(name: &str) -> Option<u64> {
    name.strip_prefix(FRAME_PREFIX)?
        .strip_suffix(FRAME_SUFFIX)?
        .parse()
        .ok()
}

/// Decimal digit count, for the pad width.
fn digits(n: u64) -> usize {
    n.to_string().len()
}
