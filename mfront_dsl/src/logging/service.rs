//! Logging service and logger back ends

use super::codes::Code;
use super::config;
use super::events::{LogEvent, LogLevel};
use std::sync::{Arc, Mutex};

/// Simple logger trait
pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

/// Main logging service with configuration awareness
pub struct LoggingService {
    logger: Arc<dyn Logger>,
    min_level: LogLevel,
}

impl LoggingService {
    pub fn new(logger: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self { logger, min_level }
    }

    /// Create service from the runtime logging preferences
    pub fn with_config() -> Self {
        let min_level = config::get_min_log_level();
        let logger: Arc<dyn Logger> = if !config::use_console_logging() {
            Arc::new(NullLogger)
        } else if config::use_structured_logging() {
            Arc::new(StructuredLogger)
        } else {
            Arc::new(ConsoleLogger)
        };

        Self::new(logger, min_level)
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    pub fn log_event(&self, event: LogEvent) {
        if self.should_log(event.level) {
            self.logger.log(&event);
        }
    }

    pub fn log_error(&self, error_code: Code, message: &str) {
        self.log_event(LogEvent::error(error_code, message));
    }

    pub fn log_warning(&self, message: &str) {
        self.log_event(LogEvent::warning(message));
    }

    pub fn log_info(&self, message: &str) {
        self.log_event(LogEvent::info(message));
    }
}

/// Human readable console output, errors and warnings on stderr
pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, event: &LogEvent) {
        match event.level {
            LogLevel::Error | LogLevel::Warning => eprintln!("{}", event.format()),
            _ => println!("{}", event.format()),
        }
    }
}

/// One JSON object per line
pub struct StructuredLogger;

impl Logger for StructuredLogger {
    fn log(&self, event: &LogEvent) {
        let line = event.format_json().unwrap_or_else(|_| event.format());
        match event.level {
            LogLevel::Error | LogLevel::Warning => eprintln!("{}", line),
            _ => println!("{}", line),
        }
    }
}

/// Discards everything
pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _event: &LogEvent) {}
}

/// Memory logger for testing
pub struct MemoryLogger {
    events: Mutex<Vec<LogEvent>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    fn with_events<R>(&self, f: impl FnOnce(&mut Vec<LogEvent>) -> R) -> R {
        match self.events.lock() {
            Ok(mut guard) => f(&mut guard),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }

    pub fn get_events(&self) -> Vec<LogEvent> {
        self.with_events(|events| events.clone())
    }

    pub fn clear(&self) {
        self.with_events(|events| events.clear());
    }

    pub fn event_count(&self) -> usize {
        self.with_events(|events| events.len())
    }

    pub fn get_errors(&self) -> Vec<LogEvent> {
        self.with_events(|events| events.iter().filter(|e| e.is_error()).cloned().collect())
    }

    pub fn get_warnings(&self) -> Vec<LogEvent> {
        self.with_events(|events| events.iter().filter(|e| e.is_warning()).cloned().collect())
    }

    pub fn has_event_with_code(&self, code: Code) -> bool {
        self.with_events(|events| events.iter().any(|e| e.code == code))
    }

    pub fn get_summary(&self) -> EventSummary {
        self.with_events(|events| EventSummary {
            total_count: events.len(),
            error_count: events.iter().filter(|e| e.is_error()).count(),
            warning_count: events.iter().filter(|e| e.is_warning()).count(),
            info_count: events.iter().filter(|e| e.is_info()).count(),
            debug_count: events.iter().filter(|e| e.is_debug()).count(),
        })
    }
}

impl Default for MemoryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, event: &LogEvent) {
        let max_events = config::get_error_buffer_size();
        self.with_events(|events| {
            if events.len() >= max_events {
                let remove_count = events.len() - max_events + 1;
                events.drain(0..remove_count);
            }
            events.push(event.clone());
        });
    }
}

/// Summary of events in memory logger
#[derive(Debug, Clone)]
pub struct EventSummary {
    pub total_count: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    pub debug_count: usize,
}

impl EventSummary {
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.warning_count > 0
    }
}

/// Create the service used by the command line tool
pub fn create_configured_service() -> LoggingService {
    LoggingService::with_config()
}

/// Create a service writing to memory, returning both handles
pub fn create_test_logger(min_level: LogLevel) -> (LoggingService, Arc<MemoryLogger>) {
    let memory = Arc::new(MemoryLogger::new());
    let service = LoggingService::new(memory.clone(), min_level);
    (service, memory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_level_filtering() {
        let (service, memory) = create_test_logger(LogLevel::Warning);

        service.log_error(codes::dsl::MALFORMED_CONSTRUCT, "bad");
        service.log_warning("careful");
        service.log_info("ignored");

        let summary = memory.get_summary();
        assert_eq!(summary.total_count, 2);
        assert!(summary.has_errors());
        assert!(summary.has_warnings());
        assert_eq!(summary.info_count, 0);
    }

    #[test]
    fn test_memory_logger_code_lookup() {
        let (service, memory) = create_test_logger(LogLevel::Debug);
        service.log_event(LogEvent::success(
            codes::success::ANALYSIS_COMPLETE,
            "done",
        ));

        assert!(memory.has_event_with_code(codes::success::ANALYSIS_COMPLETE));
        assert!(!memory.has_event_with_code(codes::dsl::UNKNOWN_KEYWORD));
        memory.clear();
        assert_eq!(memory.event_count(), 0);
    }
}
