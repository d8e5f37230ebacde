//! Fast-start remuxing: copy streams into a new MP4 with the index up front.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Where the remuxed copy of `src` is written: `{src}.processing`.
pub fn remux_output_path(src: &Path) -> PathBuf {
    let mut path = src.as_os_str().to_owned();
    path.push(".processing");
    PathBuf::from(path)
}

/// Arguments for `ffmpeg`: stream copy, `faststart` flag, MP4 container.
pub fn remux_args(src: &Path, dst: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-y".into(), "-i".into(), src.as_os_str().to_owned()];
    args.extend(
        ["-c", "copy", "-movflags", "faststart", "-f", "mp4"]
            .iter()
            .map(OsString::from),
    );
    args.push(dst.as_os_str().to_owned());
    args
}
