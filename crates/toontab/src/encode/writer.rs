//! Growable output buffer with the string-escape helper.

pub(crate) struct WriteBuffer {
    out: String,
}

impl WriteBuffer {
    pub fn new() -> Self {
        WriteBuffer {
            out: String::with_capacity(1024),
        }
    }

    pub fn push(&mut self, c: char) {
        self.out.push(c);
    }

    pub fn push_str(&mut self, s: &str) {
        self.out.push_str(s);
    }

    pub fn indent(&mut self, columns: usize) {
        for _ in 0..columns {
            self.out.push(' ');
        }
    }

    /// Append `s` double-quoted, escaping `" \ \n \r \t` by name and any
    /// other character below `0x20` as `\u00XX`.
    pub fn push_escaped(&mut self, s: &str) {
        self.out.reserve(s.len() + 2);
        self.out.push('"');
        for ch in s.chars() {
            match ch {
                '"' => self.out.push_str("\\\""),
                '\\' => self.out.push_str("\\\\"),
                '\n' => self.out.push_str("\\n"),
                '\r' => self.out.push_str("\\r"),
                '\t' => self.out.push_str("\\t"),
                c if (c as u32) < 0x20 => {
                    use std::fmt::Write as _;
                    let _ = write!(self.out, "\\u{:04x}", c as u32);
                }
                c => self.out.push(c),
            }
        }
        self.out.push('"');
    }

    pub fn into_string(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_named_and_control_characters() {
        let mut buf = WriteBuffer::new();
        buf.push_escaped("a\"b\\c\nd\x01");
        assert_eq!(buf.into_string(), "\"a\\\"b\\\\c\\nd\\u0001\"");
    }
}
