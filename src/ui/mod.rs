pub mod chart;
pub mod markdown;
pub mod section;
pub mod simulator;
pub mod timeline;
