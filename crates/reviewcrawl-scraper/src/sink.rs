//! Destinations for emitted review records.

use std::io::Write;

use reviewcrawl_core::ReviewRecord;

use crate::error::ScraperError;

/// Receives records in emission order.
///
/// A sink failure is the only error that stops a crawl.
pub trait ReviewSink {
    /// # Errors
    ///
    /// Returns [`ScraperError::Sink`] when the record cannot be stored.
    fn accept(&mut self, record: ReviewRecord) -> Result<(), ScraperError>;

    /// Called once after the last record.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Sink`] when buffered output cannot be flushed.
    fn finish(&mut self) -> Result<(), ScraperError> {
        Ok(())
    }
}

impl ReviewSink for Vec<ReviewRecord> {
    fn accept(&mut self, record: ReviewRecord) -> Result<(), ScraperError> {
        self.push(record);
        Ok(())
    }
}

/// Writes one JSON object per line.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> JsonLinesSink<W> {
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    #[must_use]
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReviewSink for JsonLinesSink<W> {
    fn accept(&mut self, record: ReviewRecord) -> Result<(), ScraperError> {
        serde_json::to_writer(&mut self.writer, &record)
            .map_err(|e| ScraperError::Sink(e.into()))?;
        self.writer.write_all(b"\n").map_err(ScraperError::Sink)?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ScraperError> {
        self.writer.flush().map_err(ScraperError::Sink)
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use reviewcrawl_core::ProductContext;

    use super::*;

    fn record(id: &str) -> ReviewRecord {
        let context = ProductContext::new("dewalt", Some("Drill".to_string()), None);
        let mut record = ReviewRecord::empty(&context, "bunnings");
        record.review_id = id.to_string();
        record
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn vec_sink_keeps_order() {
        let mut sink: Vec<ReviewRecord> = Vec::new();
        sink.accept(record("a")).unwrap();
        sink.accept(record("b")).unwrap();
        let ids: Vec<&str> = sink.iter().map(|r| r.review_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn json_lines_one_object_per_line() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.accept(record("r1")).unwrap();
        sink.accept(record("r2")).unwrap();
        sink.finish().unwrap();
        assert_eq!(sink.written(), 2);

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["review_id"], "r1");
        assert_eq!(first["product_brand"], "dewalt");
        assert_eq!(first["customer_name"], "Anonymous");
    }

    #[test]
    fn write_failure_is_a_sink_error() {
        let mut sink = JsonLinesSink::new(BrokenPipe);
        let err = sink.accept(record("r1")).unwrap_err();
        assert_eq!(err.kind(), "sink");
        assert_eq!(sink.written(), 0);
    }
}
