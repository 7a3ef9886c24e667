pub mod answer;
pub mod complete;
pub mod dispatch;
pub mod list;
pub mod next;
pub mod purge;
pub mod run;
pub mod shared;
pub mod show;
pub mod start;
