//! Appender trait for backend output destinations

use super::{error::Result, record::Record};

pub trait Appender: Send + Sync {
    fn append(&mut self, record: &Record) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
