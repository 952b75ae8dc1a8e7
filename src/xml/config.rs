use crate::error::{Error, ErrorKind, Result};

pub const DEFAULT_MAX_DEPTH: usize = 256;
pub const DEFAULT_MAX_SIZE: usize = 64 * 1024 * 1024; // 64MB

/// Limits applied while parsing project markup
#[derive(Debug, Clone, Copy)]
pub struct ParserConfig {
    /// Maximum element nesting depth
    pub max_depth: usize,
    /// Maximum input size in bytes
    pub max_size: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_size: DEFAULT_MAX_SIZE,
        }
    }
}

impl ParserConfig {
    pub fn validate_size(&self, size: usize) -> Result<()> {
        if size > self.max_size {
            return Err(Error::new(ErrorKind::MaxSizeExceeded { max: self.max_size }));
        }
        Ok(())
    }

    pub fn validate_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_depth {
            return Err(Error::new(ErrorKind::MaxDepthExceeded {
                max: self.max_depth,
            }));
        }
        Ok(())
    }
}
