pub mod activity;
pub mod candidate;
pub mod company;
pub mod contact;
pub mod deal;
pub mod icp;
pub mod job;
pub mod screening;
pub mod sequence;
pub mod submission;
pub mod template;
