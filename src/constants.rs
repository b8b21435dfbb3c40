pub const REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DISPATCH_DELAY_MS: u64 = 1500;
pub const REMINDER_GRACE_MINS: i64 = 2 * 60;

pub const DEFAULT_UTC_OFFSET: &str = "+05:30";
pub const DEFAULT_MEAL_SCHEDULE: [(&str, &str); 6] = [
    ("Breakfast", "08:00"),
    ("Morning Snack", "10:30"),
    ("Lunch", "13:00"),
    ("Evening Snack", "16:30"),
    ("Dinner", "19:30"),
    ("Bedtime", "22:30"),
];
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";
pub const REMINDER_TEMPLATE: &str = "Reminder: please upload your {{meal}} meal photo today.";

pub const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";
pub const FIRESTORE_DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_TOKEN_LIFETIME_SECS: u64 = 3600;
pub const GOOGLE_TOKEN_REFRESH_MARGIN_SECS: u64 = 15 * 60;

pub const COLL_MEALS: &str = "meals";
pub const COLL_REMINDERS: &str = "reminders";
pub const FIELD_MEAL: &str = "meal";
pub const FIELD_TIMESTAMP: &str = "timestamp";
pub const FIELD_DATE: &str = "date";
pub const FIELD_CLAIMED_AT: &str = "claimedAt";

pub const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";
pub const WHATSAPP_ADDRESS_PREFIX: &str = "whatsapp:";
