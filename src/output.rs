//! @ai:module:intent Emit annotations as GitHub workflow commands, text or JSON lines
//! @ai:module:layer infrastructure
//! @ai:module:public_api OutputFormat, AnnotationSink, WorkflowCommandSink, TextSink, JsonSink, create_sink
//! @ai:module:depends_on annotation
//! @ai:module:stateless false

use crate::annotation::{AnnotationRecord, Severity};
use colored::Colorize;
use serde_json::json;
use std::io::{self, Write};

/// @ai:intent Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Github,
    Text,
    Json,
}

/// @ai:intent Receives annotations and operator messages; emissions are fire-and-forget
pub trait AnnotationSink {
    /// @ai:intent Emit one annotation
    fn annotate(&mut self, record: &AnnotationRecord) -> io::Result<()>;

    /// @ai:intent Emit an informational line for the operator
    fn info(&mut self, message: &str) -> io::Result<()>;

    /// @ai:intent Signal a fatal failure of the whole run
    fn fail(&mut self, message: &str) -> io::Result<()>;
}

/// @ai:intent Build the sink for the requested format
pub fn create_sink<'a, W: Write + 'a>(format: OutputFormat, writer: W) -> Box<dyn AnnotationSink + 'a> {
    match format {
        OutputFormat::Github => Box::new(WorkflowCommandSink::new(writer)),
        OutputFormat::Text => Box::new(TextSink::new(writer)),
        OutputFormat::Json => Box::new(JsonSink::new(writer)),
    }
}

/// @ai:intent Escape workflow command data
/// @ai:effects pure
pub fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// @ai:intent Escape a workflow command property value
/// @ai:effects pure
pub fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}

/// @ai:intent Render an annotation as a single `::severity props::body` line
/// @ai:post properties appear in title, file, line, col order; absent ones are omitted
/// @ai:effects pure
pub fn format_workflow_command(record: &AnnotationRecord) -> String {
    let mut props = Vec::new();

    if let Some(title) = record.title.as_deref().filter(|t| !t.is_empty()) {
        props.push(format!("title={}", escape_property(title)));
    }
    if let Some(file) = record.file.as_deref().filter(|f| !f.is_empty()) {
        props.push(format!("file={}", escape_property(file)));
    }
    if let Some(line) = record.line {
        props.push(format!("line={}", line));
    }
    if let Some(col) = record.column {
        props.push(format!("col={}", col));
    }

    let mut command = format!("::{}", record.severity.as_str());
    if !props.is_empty() {
        command.push(' ');
        command.push_str(&props.join(","));
    }
    command.push_str("::");
    command.push_str(&escape_data(&record.body));
    command
}

/// @ai:intent Writes GitHub Actions workflow commands
pub struct WorkflowCommandSink<W> {
    writer: W,
}

impl<W: Write> WorkflowCommandSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> AnnotationSink for WorkflowCommandSink<W> {
    fn annotate(&mut self, record: &AnnotationRecord) -> io::Result<()> {
        writeln!(self.writer, "{}", format_workflow_command(record))
    }

    fn info(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", message)
    }

    fn fail(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.writer, "::error::{}", escape_data(message))
    }
}

/// @ai:intent Writes colored, human-readable annotation lines
pub struct TextSink<W> {
    writer: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> AnnotationSink for TextSink<W> {
    fn annotate(&mut self, record: &AnnotationRecord) -> io::Result<()> {
        let severity_str = match record.severity {
            Severity::Error => "ERROR".red().bold(),
            Severity::Warning => "WARN".yellow().bold(),
            Severity::Notice => "NOTICE".blue(),
        };

        let mut location = record.file.clone().unwrap_or_else(|| "<unknown>".to_string());
        if let Some(line) = record.line {
            location.push_str(&format!(":{}", line));
            if let Some(col) = record.column {
                location.push_str(&format!(":{}", col));
            }
        }

        match &record.title {
            Some(title) => writeln!(self.writer, "{} {} - {}", severity_str, location.dimmed(), title)?,
            None => writeln!(self.writer, "{} {}", severity_str, location.dimmed())?,
        }

        for line in record.body.lines() {
            writeln!(self.writer, "  {}", line)?;
        }
        Ok(())
    }

    fn info(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", message)
    }

    fn fail(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.writer, "{} {}", "FATAL".red().bold(), message)
    }
}

/// @ai:intent Writes one JSON object per line
pub struct JsonSink<W> {
    writer: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> AnnotationSink for JsonSink<W> {
    fn annotate(&mut self, record: &AnnotationRecord) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        writeln!(self.writer)
    }

    fn info(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", json!({ "level": "info", "message": message }))
    }

    fn fail(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", json!({ "level": "fatal", "message": message }))
    }
}
