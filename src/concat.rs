//! Streaming concatenation of candidate files into a single output file.
//!
//! Each file is written as a header line, its raw bytes, and one separating newline:
//!
//! ```text
//! // ===== File: ./sub/dir/name.ext =====
//! <bytes>
//! ```

use crate::cancel::CancellationToken;
use crate::error::Dir2TxtError;
use crate::types::FileCandidate;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Component, Path};

/// Bytes copied per read while streaming a file.
pub const CHUNK_SIZE: usize = 128 * 1024;
/// Files written between two write progress reports.
pub const WRITE_PROGRESS_INTERVAL: usize = 20;

/// The header line (including its newline) announcing `file` in the output.
///
/// The path is shown relative to `source_root` as `./a/b.txt`. A file outside the
/// root keeps its full path.
pub fn header_for(file: &Path, source_root: &Path) -> String {
    let relative = match file.strip_prefix(source_root) {
        Ok(rel) => slash_joined(rel),
        Err(_) => file.to_string_lossy().into_owned(),
    };
    let relative = if relative.starts_with('/') {
        relative
    } else {
        format!("/{}", relative)
    };
    format!("// ===== File: .{} =====\n", relative)
}

fn slash_joined(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Writes `files` in order into `destination`, replacing anything already there.
///
/// Parent directories are created as needed. Cancellation is checked before each file
/// and between chunks; a cancelled run leaves whatever was written so far in place.
/// `on_progress` receives `(files_done, bytes_written)` every
/// [`WRITE_PROGRESS_INTERVAL`] files and once at the end. Returns the total number of
/// bytes written, headers included.
pub fn concatenate(
    files: &[FileCandidate],
    destination: &Path,
    source_root: &Path,
    token: &CancellationToken,
    mut on_progress: impl FnMut(usize, u64),
) -> Result<u64, Dir2TxtError> {
    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Dir2TxtError::io(parent, e))?;
    }
    let out = File::create(destination).map_err(|e| Dir2TxtError::io(destination, e))?;
    let mut out = BufWriter::new(out);
    let mut written: u64 = 0;
    let mut done = 0;
    let mut buf = vec![0u8; CHUNK_SIZE];
    for file in files {
        token.check()?;
        let header = header_for(&file.path, source_root);
        write_all(&mut out, header.as_bytes(), destination)?;
        written += header.len() as u64;
        written += stream_file(&file.path, &mut out, &mut buf, destination, token)?;
        write_all(&mut out, b"\n", destination)?;
        written += 1;
        done += 1;
        if done % WRITE_PROGRESS_INTERVAL == 0 {
            on_progress(done, written);
        }
    }
    out.flush().map_err(|e| Dir2TxtError::io(destination, e))?;
    on_progress(done, written);
    #[cfg(feature = "logging")]
    tracing::debug!("Concatenated {} files ({} bytes) into {}", done, written, destination.display());
    Ok(written)
}

fn stream_file(
    path: &Path,
    out: &mut impl Write,
    buf: &mut [u8],
    destination: &Path,
    token: &CancellationToken,
) -> Result<u64, Dir2TxtError> {
    let mut input = File::open(path).map_err(|e| Dir2TxtError::io(path, e))?;
    let mut copied = 0;
    loop {
        let n = match input.read(buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(Dir2TxtError::io(path, e)),
        };
        write_all(out, &buf[..n], destination)?;
        copied += n as u64;
        token.check()?;
    }
    Ok(copied)
}

fn write_all(out: &mut impl Write, bytes: &[u8], destination: &Path) -> Result<(), Dir2TxtError> {
    out.write_all(bytes)
        .map_err(|e| Dir2TxtError::io(destination, e))
}

/// Appends `text` as UTF-8 to the end of an existing `destination`.
///
/// Returns the number of bytes appended.
pub fn append_string(text: &str, destination: &Path) -> Result<u64, Dir2TxtError> {
    let mut out = OpenOptions::new()
        .write(true)
        .open(destination)
        .map_err(|e| Dir2TxtError::io(destination, e))?;
    out.seek(SeekFrom::End(0))
        .map_err(|e| Dir2TxtError::io(destination, e))?;
    out.write_all(text.as_bytes())
        .map_err(|e| Dir2TxtError::io(destination, e))?;
    Ok(text.len() as u64)
}
