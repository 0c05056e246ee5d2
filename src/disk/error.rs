use thiserror::Error;

/// 块设备错误类型
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiskError {
    #[error("block {block} is out of range (device has {total} blocks)")]
    OutOfRange { block: usize, total: usize },
}

pub type Result<T> = std::result::Result<T, DiskError>;
