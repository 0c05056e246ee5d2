use thiserror::Error;

use crate::disk::{BlockId, DiskError};

/// 文件系统错误类型
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FileSystemError {
    #[error("File limit reached")]
    FileLimitReached, // 目录已满

    #[error("Not enough space on disk")]
    OutOfSpace { needed: usize, available: usize }, // 空闲块不足

    #[error("File not found")]
    NotFound(String), // 文件不存在

    #[error("File name too long ({len} bytes, max {max})")]
    NameTooLong { len: usize, max: usize },

    #[error("File name is empty")]
    EmptyName,

    #[error("File system corrupted at block {block}: {detail}")]
    Corrupted { block: BlockId, detail: String }, // 块链损坏

    #[error("Disk error: {0}")]
    Disk(#[from] DiskError), // 底层块设备错误
}

/// 文件系统统一结果类型
pub type Result<T> = std::result::Result<T, FileSystemError>;
