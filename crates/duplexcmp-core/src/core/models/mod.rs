pub mod conditions;
pub mod result;
pub mod sequence;

pub use conditions::ReactionConditions;
pub use result::DuplexResult;
pub use sequence::SequencePair;
