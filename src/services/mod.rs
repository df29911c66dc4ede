pub mod availability;
pub mod widget;
