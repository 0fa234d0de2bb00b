//! Content line output with folding.

use crate::constants::MAX_LINE_OCTETS;
use crate::ics::LineEnding;

/// Accumulates `NAME:value` content lines.
///
/// Lines longer than [`MAX_LINE_OCTETS`] are folded onto continuation
/// lines that start with a single space. Folds never split a UTF-8
/// character.
pub(crate) struct LineWriter {
    out: String,
    ending: LineEnding,
}

impl LineWriter {
    pub fn new(ending: LineEnding) -> Self {
        LineWriter {
            out: String::new(),
            ending,
        }
    }

    pub fn property(&mut self, name: &str, value: &str) {
        let eol = self.ending.as_str();
        let mut octets = 0;

        for c in name.chars().chain(std::iter::once(':')).chain(value.chars()) {
            let len = c.len_utf8();
            if octets + len > MAX_LINE_OCTETS {
                self.out.push_str(eol);
                self.out.push(' ');
                octets = 1;
            }
            self.out.push(c);
            octets += len;
        }

        self.out.push_str(eol);
    }

    pub fn begin(&mut self, component: &str) {
        self.property("BEGIN", component);
    }

    pub fn end(&mut self, component: &str) {
        self.property("END", component);
    }

    pub fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_lines_are_not_folded() {
        let mut w = LineWriter::new(LineEnding::Crlf);
        w.property("SUMMARY", "Midterm");
        assert_eq!(w.finish(), "SUMMARY:Midterm\r\n");
    }

    #[test]
    fn long_lines_fold_at_75_octets() {
        let mut w = LineWriter::new(LineEnding::Crlf);
        let value = "x".repeat(200);
        w.property("DESCRIPTION", &value);
        let out = w.finish();

        for line in out.split("\r\n").filter(|l| !l.is_empty()) {
            assert!(line.len() <= 75, "line too long: {}", line.len());
        }
        let unfolded = out.replace("\r\n ", "");
        assert_eq!(unfolded, format!("DESCRIPTION:{}\r\n", value));
    }

    #[test]
    fn folding_respects_multibyte_characters() {
        let mut w = LineWriter::new(LineEnding::Lf);
        let value = "日本語".repeat(20);
        w.property("LOCATION", &value);
        let out = w.finish();

        for line in out.split('\n').filter(|l| !l.is_empty()) {
            assert!(line.len() <= 75);
        }
        assert_eq!(out.replace("\n ", ""), format!("LOCATION:{}\n", value));
    }
}
