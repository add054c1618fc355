//! Buffered line iteration over a file or an in-memory byte range.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

/// Read block size for file-backed input.
pub const DEFAULT_BLOCK_SIZE: usize = 4 * 1024 * 1024;

enum Source<'a> {
    Slice {
        data: &'a [u8],
        pos: usize,
    },
    File {
        file: File,
        buf: Vec<u8>,
        start: usize,
        end: usize,
        eof: bool,
    },
}

/// Line-oriented reader over a file or a borrowed byte range.
///
/// `next_line` yields a view that is valid until the next call. Trailing
/// `\r` is stripped, line numbers are 1-indexed and monotonically
/// increasing. A line spanning two block refills is reassembled into a
/// scratch buffer; otherwise the view points directly into the read
/// buffer (or the borrowed slice).
pub struct BufferedReader<'a> {
    source: Source<'a>,
    scratch: Vec<u8>,
    line_no: usize,
}

enum Fetched {
    /// Byte range into the file buffer.
    Buffered(usize, usize),
    /// The line was assembled in the scratch buffer.
    Scratch,
    Eof,
}

impl<'a> BufferedReader<'a> {
    /// Wrap a borrowed byte range.
    pub fn from_slice(data: &'a [u8]) -> Self {
        BufferedReader {
            source: Source::Slice { data, pos: 0 },
            scratch: Vec::new(),
            line_no: 0,
        }
    }

    /// Open a file with the default block size.
    pub fn open(path: impl AsRef<Path>) -> Result<BufferedReader<'static>> {
        Self::open_with_block_size(path, DEFAULT_BLOCK_SIZE)
    }

    pub fn open_with_block_size(
        path: impl AsRef<Path>,
        block_size: usize,
    ) -> Result<BufferedReader<'static>> {
        let file = File::open(path)?;
        Ok(BufferedReader {
            source: Source::File {
                file,
                buf: vec![0; block_size.max(1)],
                start: 0,
                end: 0,
                eof: false,
            },
            scratch: Vec::new(),
            line_no: 0,
        })
    }

    /// Current line number, 1-indexed; 0 before the first line.
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    /// Yield the next line and its 1-indexed number, or `None` at end of
    /// input. The returned view is invalidated by the next call.
    pub fn next_line(&mut self) -> Result<Option<(&str, usize)>> {
        if let Source::Slice { data, pos } = &mut self.source {
            if *pos >= data.len() {
                return Ok(None);
            }
            let rest = &data[*pos..];
            let (len, advance) = match memchr::memchr(b'\n', rest) {
                Some(i) => (i, i + 1),
                None => (rest.len(), rest.len()),
            };
            let line = strip_cr(&rest[..len]);
            *pos += advance;
            self.line_no += 1;
            return Ok(Some((to_str(line, self.line_no)?, self.line_no)));
        }

        self.scratch.clear();
        let fetched = self.fetch_file_line()?;
        match fetched {
            Fetched::Buffered(lo, hi) => {
                self.line_no += 1;
                let Source::File { buf, .. } = &self.source else {
                    unreachable!()
                };
                let line = strip_cr(&buf[lo..hi]);
                Ok(Some((to_str(line, self.line_no)?, self.line_no)))
            }
            Fetched::Scratch => {
                self.line_no += 1;
                let line = strip_cr(&self.scratch);
                Ok(Some((to_str(line, self.line_no)?, self.line_no)))
            }
            Fetched::Eof => Ok(None),
        }
    }

    fn fetch_file_line(&mut self) -> Result<Fetched> {
        loop {
            let Source::File {
                file,
                buf,
                start,
                end,
                eof,
            } = &mut self.source
            else {
                unreachable!()
            };

            if *start >= *end {
                if *eof {
                    break;
                }
                let n = file.read(buf)?;
                *start = 0;
                *end = n;
                if n == 0 {
                    *eof = true;
                    break;
                }
            }

            match memchr::memchr(b'\n', &buf[*start..*end]) {
                Some(i) => {
                    let lo = *start;
                    *start += i + 1;
                    if self.scratch.is_empty() {
                        return Ok(Fetched::Buffered(lo, lo + i));
                    }
                    self.scratch.extend_from_slice(&buf[lo..lo + i]);
                    return Ok(Fetched::Scratch);
                }
                None => {
                    self.scratch.extend_from_slice(&buf[*start..*end]);
                    *start = *end;
                }
            }
        }
        if self.scratch.is_empty() {
            Ok(Fetched::Eof)
        } else {
            Ok(Fetched::Scratch)
        }
    }
}

fn strip_cr(line: &[u8]) -> &[u8] {
    match line.last() {
        Some(b'\r') => &line[..line.len() - 1],
        _ => line,
    }
}

fn to_str(bytes: &[u8], line_no: usize) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|_| Error::parse("invalid UTF-8 in input", line_no))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn iterates_slice_lines_with_crlf() {
        let mut r = BufferedReader::from_slice(b"a\r\nb\nc");
        assert_eq!(r.next_line().unwrap(), Some(("a", 1)));
        assert_eq!(r.next_line().unwrap(), Some(("b", 2)));
        assert_eq!(r.next_line().unwrap(), Some(("c", 3)));
        assert_eq!(r.next_line().unwrap(), None);
    }

    #[test]
    fn reassembles_line_across_blocks() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        let long = "x".repeat(50);
        writeln!(f, "{long}").unwrap();
        writeln!(f, "tail").unwrap();
        f.flush().unwrap();

        // Block far smaller than the first line forces scratch assembly.
        let mut r = BufferedReader::open_with_block_size(f.path(), 8).unwrap();
        let (line, no) = r.next_line().unwrap().unwrap();
        assert_eq!(line, long);
        assert_eq!(no, 1);
        assert_eq!(r.next_line().unwrap(), Some(("tail", 2)));
        assert_eq!(r.next_line().unwrap(), None);
    }

    #[test]
    fn final_line_without_newline() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"a\nlast").unwrap();
        f.flush().unwrap();
        let mut r = BufferedReader::open(f.path()).unwrap();
        assert_eq!(r.next_line().unwrap(), Some(("a", 1)));
        assert_eq!(r.next_line().unwrap(), Some(("last", 2)));
        assert_eq!(r.next_line().unwrap(), None);
    }
}
