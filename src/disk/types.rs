/// 每个逻辑块（Block）的大小：32 字节
/// 文件系统以“块”为最小读写单位。
pub const BLOCK_SIZE: usize = 32;

/// 内存磁盘总大小（单位：字节）
pub const DISK_SIZE: usize = 1024;

/// 磁盘中包含的块总数：1024B / 32B = 32 块
pub const NUM_BLOCKS: usize = DISK_SIZE / BLOCK_SIZE;

/// 定义一个逻辑块类型（每块 32 字节的字节数组）
/// 所有磁盘读写都以 Block 为单位进行。
pub type Block = [u8; BLOCK_SIZE];

/// 块编号，合法范围 0..NUM_BLOCKS
pub type BlockId = usize;
