use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Percentage of an upload that has been sent, rounded to the nearest integer.
pub fn upload_percent(loaded: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let percent = (loaded.min(total) as f64 * 100.0 / total as f64).round();
    percent as u8
}

/// A single-file `multipart/form-data` body streamed from disk.
pub(crate) struct MultipartFile {
    pub content_type: String,
    pub content_length: u64,
    pub body: Box<dyn Read + Send>,
}

impl MultipartFile {
    pub fn open(field: &str, path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        let file_length = file.metadata()?.len();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().replace('"', "%22"))
            .unwrap_or_else(|| "upload".to_string());
        let candidates = (0..BOUNDARY_ATTEMPTS).map(boundary);
        let boundary = choose_boundary(path, candidates, SCAN_CHUNK)?;
        let head = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .into_bytes();
        let tail = format!("\r\n--{boundary}--\r\n").into_bytes();
        let content_length = head.len() as u64 + file_length + tail.len() as u64;
        Ok(Self {
            content_type: format!("multipart/form-data; boundary={boundary}"),
            content_length,
            body: Box::new(Cursor::new(head).chain(file).chain(Cursor::new(tail))),
        })
    }
}

const BOUNDARY_ATTEMPTS: u32 = 8;
const SCAN_CHUNK: usize = 64 * 1024;

fn boundary(attempt: u32) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    format!("slide-roi-{nanos:x}-{:x}-{attempt}", std::process::id())
}

/// First candidate that does not occur anywhere in the file at `path`.
pub(crate) fn choose_boundary(
    path: &Path,
    candidates: impl IntoIterator<Item = String>,
    chunk_size: usize,
) -> io::Result<String> {
    for candidate in candidates {
        if !file_contains(path, candidate.as_bytes(), chunk_size)? {
            return Ok(candidate);
        }
        log::debug!("boundary {candidate} occurs in {}", path.display());
    }
    Err(io::Error::other(format!(
        "no multipart boundary fits {}",
        path.display()
    )))
}

fn file_contains(path: &Path, needle: &[u8], chunk_size: usize) -> io::Result<bool> {
    if needle.is_empty() {
        return Ok(true);
    }
    let mut file = File::open(path)?;
    let mut chunk = vec![0; chunk_size.max(1)];
    let mut window = Vec::with_capacity(chunk.len() + needle.len());
    loop {
        let read = match file.read(&mut chunk) {
            Ok(0) => return Ok(false),
            Ok(read) => read,
            Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
            Err(error) => return Err(error),
        };
        window.extend_from_slice(&chunk[..read]);
        if window.windows(needle.len()).any(|part| part == needle) {
            return Ok(true);
        }
        // Keep a tail long enough for a match split across reads.
        let keep = (needle.len() - 1).min(window.len());
        window.drain(..window.len() - keep);
    }
}

/// Reports upload progress as bytes are pulled by the HTTP client.
pub(crate) struct ProgressReader<'a, R> {
    inner: R,
    loaded: u64,
    total: u64,
    chunk_size: usize,
    last_percent: Option<u8>,
    on_progress: &'a mut dyn FnMut(u8),
}

impl<'a, R: Read> ProgressReader<'a, R> {
    pub fn new(inner: R, total: u64, chunk_size: usize, on_progress: &'a mut dyn FnMut(u8)) -> Self {
        Self {
            inner,
            loaded: 0,
            total,
            chunk_size: chunk_size.max(1),
            last_percent: None,
            on_progress,
        }
    }
}

impl<R: Read> Read for ProgressReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let limit = buf.len().min(self.chunk_size);
        let read = self.inner.read(&mut buf[..limit])?;
        self.loaded += read as u64;
        let percent = upload_percent(self.loaded, self.total);
        if self.last_percent != Some(percent) {
            self.last_percent = Some(percent);
            (self.on_progress)(percent);
        }
        Ok(read)
    }
}
