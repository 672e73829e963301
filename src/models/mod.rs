pub mod codeblock;
pub mod health;
pub mod diagnostics;
pub mod error;
pub mod messages;

pub use codeblock::*;
pub use health::*;
pub use diagnostics::*;
pub use error::*;
pub use messages::*;
