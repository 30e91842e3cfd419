//! Command implementations.

pub mod configure;
pub mod parse;
pub mod validate;

pub use self::configure::execute_config;
pub use self::parse::execute_parse;
pub use self::validate::execute_validate;

use crate::error::Result;
use std::io::Read;

/// Read a file, or stdin when `path` is "-".
pub(crate) fn read_input(path: &str) -> Result<Vec<u8>> {
    if path == "-" {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read(path)?)
    }
}
