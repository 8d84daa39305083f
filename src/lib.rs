pub mod dumping;
pub mod storage;
