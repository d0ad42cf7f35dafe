pub mod error;
pub mod score;
pub mod smf;

pub use error::SetupError;
pub use score::{Score, ScoreReader, TempoMark};
pub use smf::SmfReader;
