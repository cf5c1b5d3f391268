//! Console appender implementation

use crate::core::{Appender, LogLevel, OutputFormat, Record, Result, TimestampFormat};
use colored::Colorize;

pub struct ConsoleAppender {
    use_colors: bool,
    show_metadata: bool,
    timestamp_format: TimestampFormat,
    output_format: OutputFormat,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self {
            use_colors: true,
            show_metadata: false,
            timestamp_format: TimestampFormat::default(),
            output_format: OutputFormat::default(),
        }
    }

    /// Pretty, colored text when `pretty`, JSON lines otherwise
    pub fn for_mode(pretty: bool, show_metadata: bool) -> Self {
        let output_format = if pretty {
            OutputFormat::Text
        } else {
            OutputFormat::Json
        };
        Self::new()
            .with_output_format(output_format)
            .with_show_metadata(show_metadata)
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            ..Self::new()
        }
    }

    /// Set the output format for this appender
    ///
    /// # Example
    ///
    /// ```
    /// use rust_topic_logger::appenders::ConsoleAppender;
    /// use rust_topic_logger::OutputFormat;
    ///
    /// let appender = ConsoleAppender::new()
    ///     .with_output_format(OutputFormat::Json);
    /// ```
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Show `$`-prefixed metadata in text output
    #[must_use]
    pub fn with_show_metadata(mut self, show_metadata: bool) -> Self {
        self.show_metadata = show_metadata;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    pub fn output_format(&self) -> &OutputFormat {
        &self.output_format
    }

    pub fn shows_metadata(&self) -> bool {
        self.show_metadata
    }

    fn render(&self, record: &Record) -> String {
        match self.output_format {
            OutputFormat::Text if self.use_colors => {
                let level_str = format!("{:5}", record.level.to_str())
                    .color(record.level.color_code())
                    .to_string();
                OutputFormat::format_text(
                    record,
                    &self.timestamp_format,
                    self.show_metadata,
                    &level_str,
                )
            }
            _ => self
                .output_format
                .format(record, &self.timestamp_format, self.show_metadata),
        }
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, record: &Record) -> Result<()> {
        let output = self.render(record);

        // Route Error and Fatal levels to stderr, others to stdout
        match record.level {
            LogLevel::Error | LogLevel::Fatal => eprintln!("{}", output),
            _ => println!("{}", output),
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        use std::io::Write;
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
