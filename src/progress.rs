//! Progress reporting, handed to stages as an explicit sink.

use indicatif::{ProgressBar, ProgressStyle};

/// Byte-oriented bar for a source of known size; spinner when the size is
/// unknown (compressed input). Hidden entirely in quiet mode.
pub fn bytes(len: Option<u64>, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    match len {
        Some(len) => {
            let pb = ProgressBar::new(len);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{bar:40} {bytes}/{total_bytes}")
                    .unwrap(),
            );
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner} {bytes}")
                    .unwrap(),
            );
            pb
        }
    }
}

/// Item-count bar for in-memory passes.
pub fn count(len: u64, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40} {pos}/{len}")
            .unwrap(),
    );
    pb
}
