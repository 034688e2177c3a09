pub mod add;
pub mod delete;
pub mod show;
pub mod update;
