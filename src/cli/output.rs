/// Output formatting for per-file extraction results
///
/// - JSON: one pretty-printed array, written when the writer finishes
/// - NDJSON: one compact record per line, written as records arrive
use crate::extract::ExtractionResult;
use anyhow::Result;
use serde::Serialize;
use std::io::{self, Stdout, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Standard JSON array (pretty-printed)
    Json,

    /// Newline-delimited JSON (streaming)
    Ndjson,
}

/// Extraction result of one file, as written to the output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileExtraction {
    pub path: String,
    pub result: ExtractionResult,
}

pub struct OutputWriter<W: Write> {
    format: OutputFormat,
    writer: W,
    buffer: Vec<serde_json::Value>,
}

impl OutputWriter<Stdout> {
    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(format, io::stdout())
    }
}

impl<W: Write> OutputWriter<W> {
    pub fn new(format: OutputFormat, writer: W) -> Self {
        Self {
            format,
            writer,
            buffer: Vec::new(),
        }
    }

    /// Write one record; JSON output is buffered until `finish`
    pub fn write_record(&mut self, record: &FileExtraction) -> Result<()> {
        match self.format {
            OutputFormat::Ndjson => {
                writeln!(self.writer, "{}", serde_json::to_string(record)?)?;
                self.writer.flush()?;
            }
            OutputFormat::Json => self.buffer.push(serde_json::to_value(record)?),
        }
        Ok(())
    }

    pub fn write_batch(&mut self, records: &[FileExtraction]) -> Result<()> {
        for record in records {
            self.write_record(record)?;
        }
        Ok(())
    }

    /// Flush buffered JSON and hand back the underlying writer
    pub fn finish(mut self) -> Result<W> {
        if self.format == OutputFormat::Json {
            writeln!(self.writer, "{}", serde_json::to_string_pretty(&self.buffer)?)?;
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}
