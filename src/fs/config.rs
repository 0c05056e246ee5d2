/// 目录最多容纳的文件数
pub const MAX_FILES: usize = 10;

/// 文件名存储区大小（字节），保留 1 字节作为结尾
pub const NAME_CAPACITY: usize = 16;

/// 文件名最大有效长度
pub const MAX_NAME_LEN: usize = NAME_CAPACITY - 1;
