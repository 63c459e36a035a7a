//! Phone list import
//!
//! Turns an uploaded comma-separated file into the ordered list of call
//! targets the session controller works through. Format per line:
//! `id,number,name,notes`, with an optional header line.

mod reader;
mod target;

pub use reader::{import_file, parse_phone_list};
pub use target::CallTarget;
