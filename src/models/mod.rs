pub mod analysis;
pub mod breakdown;
pub mod candidate;
pub mod confidence;
pub mod error;
pub mod score;

pub use analysis::*;
pub use breakdown::*;
pub use candidate::*;
pub use confidence::*;
pub use error::*;
pub use score::*;
