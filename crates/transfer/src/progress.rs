//! Byte-counted progress reporting.
//!
//! A [`ProgressTracker`] lives for exactly one top-level transfer. It is lent
//! by `&mut` to a [`ProgressWriter`] (downloads) or [`ProgressReader`]
//! (uploads) around each file, and every chunk that passes through the adapter
//! advances the counter and notifies the caller's [`ProgressHandler`].

use std::io::{self, Read, Write};

use crate::report::Direction;

/// Snapshot handed to a [`ProgressHandler`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProgressUpdate {
    current: u64,
    total: u64,
    message: String,
}

impl ProgressUpdate {
    /// Creates an update.
    #[must_use]
    pub const fn new(current: u64, total: u64, message: String) -> Self {
        Self {
            current,
            total,
            message,
        }
    }

    /// Bytes moved so far in this transfer.
    #[must_use]
    pub const fn current(&self) -> u64 {
        self.current
    }

    /// Bytes expected for the whole transfer, fixed after sizing.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Human-readable description of the current step.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Receives progress notifications.
///
/// Closures taking `&ProgressUpdate` implement the trait:
///
/// ```
/// use transfer::{ProgressHandler, ProgressUpdate};
///
/// let mut seen = Vec::new();
/// let mut handler = |update: &ProgressUpdate| seen.push(update.current());
/// handler.on_progress(&ProgressUpdate::new(3, 10, String::new()));
/// assert_eq!(seen, vec![3]);
/// ```
pub trait ProgressHandler {
    /// Handles one update. Calls arrive with non-decreasing `current`.
    fn on_progress(&mut self, update: &ProgressUpdate);
}

impl<F> ProgressHandler for F
where
    F: FnMut(&ProgressUpdate),
{
    fn on_progress(&mut self, update: &ProgressUpdate) {
        self(update);
    }
}

/// Per-transfer accumulator of transferred bytes.
pub struct ProgressTracker<'h> {
    current: u64,
    total: u64,
    handler: Option<&'h mut dyn ProgressHandler>,
}

impl<'h> ProgressTracker<'h> {
    /// Creates a tracker at zero for a transfer of `total` bytes.
    #[must_use]
    pub fn new(total: u64, handler: Option<&'h mut dyn ProgressHandler>) -> Self {
        Self {
            current: 0,
            total,
            handler,
        }
    }

    /// Bytes counted so far.
    #[must_use]
    pub const fn current(&self) -> u64 {
        self.current
    }

    /// Bytes expected.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Sends an update without moving the counter.
    pub fn announce(&mut self, message: &str) {
        if let Some(handler) = self.handler.as_deref_mut() {
            handler.on_progress(&ProgressUpdate::new(
                self.current,
                self.total,
                message.to_owned(),
            ));
        }
    }

    /// Adds `bytes` to the counter and sends an update described by `label`.
    pub fn advance(&mut self, bytes: u64, label: &FileLabel<'_>) {
        self.current = self.current.saturating_add(bytes);
        if let Some(handler) = self.handler.as_deref_mut() {
            let message = label.message(self.current, self.total);
            handler.on_progress(&ProgressUpdate::new(self.current, self.total, message));
        }
    }
}

/// Names the file currently moving, for per-chunk messages.
#[derive(Clone, Copy, Debug)]
pub struct FileLabel<'a> {
    direction: Direction,
    source: &'a str,
    destination: &'a str,
}

impl<'a> FileLabel<'a> {
    /// Creates a label for a copy from `source` to `destination`.
    #[must_use]
    pub const fn new(direction: Direction, source: &'a str, destination: &'a str) -> Self {
        Self {
            direction,
            source,
            destination,
        }
    }

    fn message(&self, current: u64, total: u64) -> String {
        let verb = match self.direction {
            Direction::Download => "Downloading",
            Direction::Upload => "Uploading",
        };
        format!(
            "{verb} file: {} to {} - {current}/{total} bytes",
            self.source, self.destination
        )
    }
}

/// [`Write`] adapter that counts every byte written into the tracker.
pub struct ProgressWriter<'t, 'h, W> {
    inner: W,
    tracker: &'t mut ProgressTracker<'h>,
    label: FileLabel<'t>,
}

impl<'t, 'h, W: Write> ProgressWriter<'t, 'h, W> {
    /// Wraps `inner`.
    pub fn new(inner: W, tracker: &'t mut ProgressTracker<'h>, label: FileLabel<'t>) -> Self {
        Self {
            inner,
            tracker,
            label,
        }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for ProgressWriter<'_, '_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        if written > 0 {
            self.tracker.advance(written as u64, &self.label);
        }
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// [`Read`] adapter that counts every byte read into the tracker.
pub struct ProgressReader<'t, 'h, R> {
    inner: R,
    tracker: &'t mut ProgressTracker<'h>,
    label: FileLabel<'t>,
}

impl<'t, 'h, R: Read> ProgressReader<'t, 'h, R> {
    /// Wraps `inner`.
    pub fn new(inner: R, tracker: &'t mut ProgressTracker<'h>, label: FileLabel<'t>) -> Self {
        Self {
            inner,
            tracker,
            label,
        }
    }
}

impl<R: Read> Read for ProgressReader<'_, '_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.inner.read(buf)?;
        if read > 0 {
            self.tracker.advance(read as u64, &self.label);
        }
        Ok(read)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_without_handler_still_counts() {
        let mut tracker = ProgressTracker::new(10, None);
        tracker.announce("start");
        tracker.advance(4, &FileLabel::new(Direction::Download, "a", "b"));
        assert_eq!(tracker.current(), 4);
        assert_eq!(tracker.total(), 10);
    }

    #[test]
    fn writer_reports_each_write_with_cumulative_count() {
        let mut updates = Vec::new();
        let mut handler = |update: &ProgressUpdate| updates.push(update.clone());
        let mut tracker = ProgressTracker::new(6, Some(&mut handler));
        tracker.announce("Starting file download");

        let label = FileLabel::new(Direction::Download, "/pub/a.txt", "out/a.txt");
        let mut writer = ProgressWriter::new(Vec::new(), &mut tracker, label);
        writer.write_all(b"abc").unwrap();
        writer.write_all(b"def").unwrap();
        assert_eq!(writer.into_inner(), b"abcdef");
        assert_eq!(tracker.current(), 6);
        drop(tracker);

        assert_eq!(updates.len(), 3);
        assert_eq!(updates[0], ProgressUpdate::new(0, 6, "Starting file download".into()));
        assert_eq!(
            updates[2].message(),
            "Downloading file: /pub/a.txt to out/a.txt - 6/6 bytes"
        );
        assert!(updates.windows(2).all(|pair| pair[0].current() <= pair[1].current()));
    }

    #[test]
    fn reader_reports_upload_chunks() {
        let mut messages = Vec::new();
        let mut handler = |update: &ProgressUpdate| messages.push(update.message().to_owned());
        let mut tracker = ProgressTracker::new(5, Some(&mut handler));

        let label = FileLabel::new(Direction::Upload, "local/b.bin", "/up/b.bin");
        let mut reader = ProgressReader::new(&b"hello"[..], &mut tracker, label);
        let mut sink = Vec::new();
        reader.read_to_end(&mut sink).unwrap();
        drop(tracker);

        assert_eq!(
            messages.last().map(String::as_str),
            Some("Uploading file: local/b.bin to /up/b.bin - 5/5 bytes")
        );
    }
}
