pub mod id;
pub mod timestamp;

pub use id::Id;
pub use timestamp::Timestamp;
