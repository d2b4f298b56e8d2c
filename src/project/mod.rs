//! Project tree handling: existence checks and the Makefile fixup.

pub mod patcher;
pub mod validator;

pub use patcher::ensure_makefile_line;
pub use validator::validate_project;
