use crate::constants::{
  DEFAULT_PASSWORD,
  DEFAULT_RETRY_LIMIT,
  PASSWORD_LEN,
  WINDOW_END,
  WINDOW_START,
};
use crate::error::Error;

/// Region of user memory the allocator hands out addresses from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WriteWindow {
  start: u16,
  end: u16,
}

impl WriteWindow {
  pub fn new(start: u16, end: u16) -> Result<Self, Error> {
    if start >= end {
      return Err(Error::InvalidWindow);
    }
    Ok(WriteWindow { start, end })
  }

  pub fn start(&self) -> u16 {
    self.start
  }

  pub fn end(&self) -> u16 {
    self.end
  }

  pub fn len(&self) -> usize {
    usize::from(self.end - self.start)
  }
}

impl Default for WriteWindow {
  fn default() -> Self {
    WriteWindow { start: WINDOW_START, end: WINDOW_END }
  }
}

/// 64-bit I2C password of the tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Password(pub [u8; PASSWORD_LEN]);

impl Default for Password {
  fn default() -> Self {
    Password(DEFAULT_PASSWORD)
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
  retry_limit: u8,
  pub window: WriteWindow,
  pub password: Password,
}

impl Config {
  pub fn new(retry_limit: u8, window: WriteWindow, password: Password) -> Result<Self, Error> {
    let mut config = Config { retry_limit: DEFAULT_RETRY_LIMIT, window, password };
    config.set_retry_limit(retry_limit)?;
    Ok(config)
  }

  pub fn retry_limit(&self) -> u8 {
    self.retry_limit
  }

  pub fn set_retry_limit(&mut self, retries: u8) -> Result<(), Error> {
    if retries == 0 {
      return Err(Error::InvalidRetryLimit);
    }
    self.retry_limit = retries;
    Ok(())
  }
}

impl Default for Config {
  fn default() -> Self {
    Config {
      retry_limit: DEFAULT_RETRY_LIMIT,
      window: WriteWindow::default(),
      password: Password::default(),
    }
  }
}
