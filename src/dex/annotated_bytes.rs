//! Collector and renderer for annotated hex dumps.

use std::io::Write;

use crate::dex::error::DexError;

struct Annotation {
    offset: usize,
    length: usize,
    indent: usize,
    text: String,
}

/// Accumulates annotations against byte ranges of a buffer, then renders
/// them as a width-wrapped hex dump with the annotation text alongside the
/// first line of each range.
///
/// The cursor starts at 0. `annotate` records a range at the cursor and
/// advances past it; `skip_to` jumps the cursor forward over bytes that get
/// no annotation of their own. `width` is the number of bytes shown per
/// dump line.
pub(crate) struct AnnotatedBytes {
    cursor: usize,
    indent: usize,
    width: usize,
    annotations: Vec<Annotation>,
}

impl AnnotatedBytes {
    pub fn new(width: usize) -> AnnotatedBytes {
        AnnotatedBytes {
            cursor: 0,
            indent: 0,
            width: width.max(1),
            annotations: vec![],
        }
    }

    /// Records `text` against the `length` bytes at the cursor, advancing
    /// the cursor. A length of 0 renders as a label-only line.
    pub fn annotate(&mut self, length: usize, text: String) {
        self.annotations.push(Annotation {
            offset: self.cursor,
            length,
            indent: self.indent,
            text,
        });
        self.cursor += length;
    }

    /// Moves the cursor forward to `offset`. The cursor never moves back;
    /// annotations are recorded in file order.
    pub fn skip_to(&mut self, offset: usize) {
        if offset > self.cursor {
            self.cursor = offset;
        }
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn deindent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// Renders every recorded annotation against `data`. Ranges running
    /// past the end of the buffer are rendered as far as the data allows,
    /// so a dump of a corrupt file still shows everything it can.
    pub fn write_annotations(&self, out: &mut dyn Write, data: &[u8]) -> Result<(), DexError> {
        for annotation in &self.annotations {
            self.write_annotation(out, data, annotation)
                .map_err(|e| DexError::SinkWrite { message: e.to_string() })?;
        }
        Ok(())
    }

    fn write_annotation(
        &self,
        out: &mut dyn Write,
        data: &[u8],
        annotation: &Annotation,
    ) -> std::io::Result<()> {
        let pad = "  ".repeat(annotation.indent);
        let hex_width = self.width * 3;

        let end = annotation
            .offset
            .saturating_add(annotation.length)
            .min(data.len());
        let first_line_end = end.min(annotation.offset.saturating_add(self.width));
        let hex = hex_bytes(data, annotation.offset, first_line_end);
        writeln!(
            out,
            "{:06x}: {:hex_width$}|{}{}",
            annotation.offset, hex, pad, annotation.text
        )?;

        // Continuation lines carry hex only
        let mut line = annotation.offset.saturating_add(self.width);
        while line < end {
            let line_end = end.min(line + self.width);
            writeln!(out, "{:06x}: {}", line, hex_bytes(data, line, line_end))?;
            line += self.width;
        }
        Ok(())
    }
}

fn hex_bytes(data: &[u8], start: usize, end: usize) -> String {
    let mut s = String::with_capacity((end.saturating_sub(start)) * 3);
    for b in &data[start.min(end)..end] {
        s.push_str(&format!("{:02x} ", b));
    }
    s
}
