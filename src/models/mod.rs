pub mod claim;
pub mod diagnostics;
pub mod participant;
pub mod sentence;
pub mod span;
pub mod turn;
pub mod utterance;

pub use claim::*;
pub use diagnostics::*;
pub use participant::*;
pub use sentence::*;
pub use span::*;
pub use turn::*;
pub use utterance::*;
