pub mod stage0_split;
pub mod stage1_chunk;
pub mod stage1_failsafe;
pub mod stage1_turns;
pub mod stage2_classify;
pub mod stage3_detect;
pub mod stage4_filter;
pub mod stage5_postprocess;

pub use stage0_split::*;
pub use stage1_chunk::*;
pub use stage1_failsafe::*;
pub use stage1_turns::*;
pub use stage2_classify::*;
pub use stage3_detect::*;
pub use stage4_filter::*;
pub use stage5_postprocess::*;
