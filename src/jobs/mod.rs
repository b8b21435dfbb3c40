pub mod meal_reminder;

pub use meal_reminder::{MealReminderJob, RunSummary};
