use chrono::{DateTime, Utc};
use colored::*;
use log::{Level, LevelFilter, Metadata, Record};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::env;
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::{Duration, Instant};

static LAMBDA_LOGGER: Lazy<LambdaLogger> = Lazy::new(LambdaLogger::default);

/// Installs the logger configured from `LOG_FORMAT` / `LOG_LEVEL`.
pub fn init() -> Result<(), String> {
    init_with_config(LoggerConfig::from_env())
}

pub fn init_with_config(config: LoggerConfig) -> Result<(), String> {
    let level = config.level;
    LAMBDA_LOGGER.configure(config);

    log::set_logger(&*LAMBDA_LOGGER).map_err(|e| format!("Failed to set logger: {:?}", e))?;
    log::set_max_level(level);
    Ok(())
}

/// Tags every following log entry with the Lambda request id, until replaced.
pub fn set_request_id(request_id: Option<String>) {
    if let Ok(mut current) = LAMBDA_LOGGER.request_id.lock() {
        *current = request_id;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line, for CloudWatch.
    Json,
    /// Colored single-line text for local runs.
    Pretty,
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub level: LevelFilter,
    pub format: LogFormat,
    pub show_colors: bool,
    pub show_file_location: bool,
    pub timestamp_format: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl LoggerConfig {
    pub fn production() -> Self {
        Self {
            level: LevelFilter::Info,
            format: LogFormat::Json,
            show_colors: false,
            show_file_location: false,
            timestamp_format: "%Y-%m-%dT%H:%M:%S%.3fZ".to_string(),
        }
    }

    pub fn development() -> Self {
        Self {
            level: LevelFilter::Debug,
            format: LogFormat::Pretty,
            show_colors: true,
            show_file_location: true,
            timestamp_format: "%H:%M:%S%.3f".to_string(),
        }
    }

    pub fn from_env() -> Self {
        Self::from_vars(
            env::var("LOG_FORMAT").ok().as_deref(),
            env::var("LOG_LEVEL").ok().as_deref(),
        )
    }

    /// `format == "pretty"` picks the development layout; `level` accepts `log` filter names.
    pub fn from_vars(format: Option<&str>, level: Option<&str>) -> Self {
        let base = match format {
            Some("pretty") => Self::development(),
            _ => Self::production(),
        };

        match level.and_then(|name| name.trim().parse::<LevelFilter>().ok()) {
            Some(level) => base.with_level(level),
            None => base,
        }
    }

    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.show_colors = enabled;
        self
    }
}

fn level_badge(level: Level) -> (&'static str, Color) {
    match level {
        Level::Trace => ("🔍", Color::Cyan),
        Level::Debug => ("🐛", Color::Blue),
        Level::Info => ("💡", Color::Green),
        Level::Warn => ("⚠️", Color::Yellow),
        Level::Error => ("❌", Color::Red),
    }
}

/// One emitted line.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    #[serde(serialize_with = "serialize_level")]
    pub level: Level,
    pub target: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

fn serialize_level<S: serde::Serializer>(level: &Level, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(level.as_str())
}

impl LogEntry {
    fn from_record(record: &Record) -> Self {
        let location = match (record.file(), record.line()) {
            (Some(file), Some(line)) => Some(format!("{}:{}", file, line)),
            _ => None,
        };

        Self {
            timestamp: Utc::now(),
            level: record.level(),
            target: record.target().to_string(),
            message: record.args().to_string(),
            location,
            request_id: None,
            duration_ms: None,
        }
    }
}

#[derive(Default)]
pub struct LambdaLogger {
    config: Mutex<LoggerConfig>,
    request_id: Mutex<Option<String>>,
}

impl LambdaLogger {
    pub fn configure(&self, config: LoggerConfig) {
        if let Ok(mut current) = self.config.lock() {
            *current = config;
        }
    }

    fn render(&self, entry: &LogEntry, config: &LoggerConfig) -> String {
        if config.format == LogFormat::Json {
            return serde_json::to_string(entry).unwrap_or_default();
        }

        let paint = |text: String, color: Color| {
            if config.show_colors {
                text.color(color).to_string()
            } else {
                text
            }
        };
        let (emoji, color) = level_badge(entry.level);

        let mut line = format!(
            "{} [{}] {}: {}",
            paint(
                entry.timestamp.format(&config.timestamp_format).to_string(),
                Color::BrightBlack
            ),
            paint(format!("{} {}", emoji, entry.level), color),
            paint(entry.target.clone(), Color::BrightBlue),
            entry.message
        );

        if let Some(request_id) = &entry.request_id {
            line.push_str(&format!(" [req:{}]", paint(request_id.clone(), Color::BrightYellow)));
        }
        if let Some(duration) = entry.duration_ms {
            line.push_str(&format!(" [{}ms]", paint(duration.to_string(), Color::BrightMagenta)));
        }
        if let (true, Some(location)) = (config.show_file_location, &entry.location) {
            line.push_str(&format!(" ({})", paint(location.clone(), Color::BrightBlack)));
        }

        line
    }

    fn emit(&self, mut entry: LogEntry) {
        let Ok(config) = self.config.lock() else {
            return;
        };
        if entry.level > config.level {
            return;
        }

        if entry.request_id.is_none() {
            entry.request_id = self.request_id.lock().ok().and_then(|id| id.clone());
        }
        println!("{}", self.render(&entry, &config));
    }
}

impl log::Log for LambdaLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.config
            .lock()
            .map(|config| metadata.level() <= config.level)
            .unwrap_or(true)
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.emit(LogEntry::from_record(record));
        }
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
    }
}

/// Logs `"<name> completed"` with its duration when dropped.
pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn new(name: &str) -> Self {
        Self {
            start: Instant::now(),
            name: name.to_string(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    fn entry(&self) -> LogEntry {
        LogEntry {
            timestamp: Utc::now(),
            level: Level::Info,
            target: module_path!().to_string(),
            message: format!("⏱️  {} completed", self.name),
            location: None,
            request_id: None,
            duration_ms: Some(self.elapsed().as_millis() as u64),
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        LAMBDA_LOGGER.emit(self.entry());
    }
}

pub fn timer(name: &str) -> Timer {
    Timer::new(name)
}

pub fn log_startup_info(app_name: &str, version: &str) {
    log::info!("🚀 Starting {} v{}", app_name, version);
}

pub fn log_config_info(config: &crate::config::Config, family: crate::bedrock::ModelFamily) {
    log::info!(
        "⚙️  bucket={} model={} ({} family) prefix={} default_expiry={}s region={} keys={}",
        config.image_bucket,
        config.model_id,
        family,
        config.image_prefix,
        config.default_url_expiry_seconds,
        config.bedrock.region.as_deref().unwrap_or("(default chain)"),
        config.bedrock.access_key.is_some()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(level: Level) -> LogEntry {
        LogEntry {
            timestamp: Utc::now(),
            level,
            target: "bedrock_imagegen::storage".to_string(),
            message: "Stored image".to_string(),
            location: Some("src/storage/mod.rs:49".to_string()),
            request_id: Some("req-1".to_string()),
            duration_ms: None,
        }
    }

    #[test]
    fn test_config_from_vars() {
        let config = LoggerConfig::from_vars(None, None);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, LevelFilter::Info);

        let config = LoggerConfig::from_vars(Some("pretty"), Some("WARN"));
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.level, LevelFilter::Warn);

        let config = LoggerConfig::from_vars(Some("json"), Some("loud"));
        assert_eq!(config.level, LevelFilter::Info);
    }

    #[test]
    fn test_pretty_line() {
        let logger = LambdaLogger::default();
        let config = LoggerConfig::development().with_colors(false);

        let line = logger.render(&entry(Level::Info), &config);
        assert!(line.contains("[💡 INFO] bedrock_imagegen::storage: Stored image"));
        assert!(line.contains("[req:req-1]"));
        assert!(line.ends_with("(src/storage/mod.rs:49)"));
    }

    #[test]
    fn test_json_line() {
        let logger = LambdaLogger::default();
        let mut record = entry(Level::Warn);
        record.request_id = None;

        let line = logger.render(&record, &LoggerConfig::production());
        let json: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(json["level"], "WARN");
        assert_eq!(json["message"], "Stored image");
        assert!(json.get("request_id").is_none());
        assert!(json.get("duration_ms").is_none());
    }

    #[test]
    fn test_timer_entry_carries_duration() {
        let timer = Timer::new("s3 put_object");
        std::thread::sleep(Duration::from_millis(5));
        let entry = timer.entry();
        assert_eq!(entry.message, "⏱️  s3 put_object completed");
        assert!(entry.duration_ms.unwrap() >= 5);

        let line = LambdaLogger::default().render(&entry, &LoggerConfig::production());
        let json: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert!(json["duration_ms"].as_u64().unwrap() >= 5);
    }
}
