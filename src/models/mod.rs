pub mod enums;
pub mod paper;

pub use enums::PaperStatus;
pub use paper::{NewPaper, Paper};
