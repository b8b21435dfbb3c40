pub mod fakes;
pub mod helper;

pub use fakes::FakeMarkers;
pub use fakes::FakeSender;
pub use fakes::FakeUploads;
pub use helper::civil_instant;
pub use helper::settings_with;
