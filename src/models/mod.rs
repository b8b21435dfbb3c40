pub mod meal_log;
pub mod reminder;

pub use meal_log::*;
pub use reminder::*;
