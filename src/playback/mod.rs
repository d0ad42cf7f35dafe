pub mod clock;
pub mod driver;
pub mod timeline;

pub use clock::PlaybackClock;
pub use driver::{PlaybackDriver, PlaybackSettings, SideSettings, Tick};
pub use timeline::TrackTimeline;
