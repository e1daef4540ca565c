pub mod frontend;
pub mod notice;
pub mod task_ops;
pub mod task_store;
