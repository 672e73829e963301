pub mod health;
pub mod codeblocks;
pub mod diagnostics;


pub use health::*;
pub use codeblocks::*;
pub use diagnostics::*;
