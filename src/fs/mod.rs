use std::fmt;

use log::{debug, trace};

use crate::{
    disk::{Block, BlockDevice, BLOCK_SIZE},
    fs::{
        directory::{Directory, FileEntry, FileName},
        error::{FileSystemError, Result},
        fat::{AllocationTable, FatEntry},
    },
};

pub mod config;
pub mod directory;
pub mod error;
pub mod fat;

#[derive(Debug)]
pub struct FileSystem<D: BlockDevice> {
    disk: D,              // 底层块设备，只有文件系统能直接读写
    fat: AllocationTable, // 块分配与链接信息
    directory: Directory, // 扁平文件目录
}

/// 读出的文件内容，每个块对应一段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContents {
    pub chunks: Vec<Vec<u8>>,
}

impl fmt::Display for FileContents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 多字节字符可能跨块，先拼接再解码
        f.write_str(&String::from_utf8_lossy(&self.chunks.concat()))
    }
}

impl<D: BlockDevice> FileSystem<D> {
    /// 在一块已清零的设备上建立空文件系统
    pub fn new(disk: D) -> Self {
        debug!("file system over {} blocks", disk.block_count());
        Self {
            disk,
            fat: AllocationTable::new(),
            directory: Directory::new(),
        }
    }

    pub fn free_blocks(&self) -> usize {
        self.fat.free_blocks()
    }

    pub fn file_count(&self) -> usize {
        self.directory.len()
    }

    pub fn entries(&self) -> impl Iterator<Item = &FileEntry> {
        self.directory.iter()
    }

    /// 创建文件并写入内容
    ///
    /// 名字为空或超过 `MAX_NAME_LEN` 字节时直接拒绝；
    /// 空间不足时不会留下任何已占用的块。
    pub fn create(&mut self, name: &str, content: &[u8]) -> Result<&FileEntry> {
        if self.directory.is_full() {
            return Err(FileSystemError::FileLimitReached);
        }
        let name = FileName::new(name)?;

        let blocks_needed = content.len().div_ceil(BLOCK_SIZE);
        let chain = self.fat.allocate_chain(blocks_needed)?;

        for (&block, chunk) in chain.iter().zip(content.chunks(BLOCK_SIZE)) {
            let mut buf: Block = [0; BLOCK_SIZE];
            buf[..chunk.len()].copy_from_slice(chunk);
            self.disk.write_block(block, &buf)?;
        }

        debug!(
            "created {:?}: {} bytes in {} blocks, next free block {:?}",
            name,
            content.len(),
            chain.len(),
            self.fat.find_free_block()
        );
        self.directory.push(FileEntry {
            name,
            start_block: chain.first().copied(),
            size: content.len(),
        })
    }

    /// 按名字读取文件，沿块链逐块取出内容
    ///
    /// 每块只取到第一个 NUL 之前，与写入时的补零方式对应。
    pub fn read(&self, name: &str) -> Result<FileContents> {
        let entry = self
            .directory
            .find(name)
            .ok_or_else(|| FileSystemError::NotFound(name.to_string()))?;

        let mut chunks = Vec::new();
        let mut next = entry.start_block;
        let mut buf: Block = [0; BLOCK_SIZE];

        while let Some(block) = next {
            if chunks.len() >= self.disk.block_count() {
                return Err(FileSystemError::Corrupted {
                    block,
                    detail: "chain is longer than the disk".to_string(),
                });
            }

            self.disk.read_block(block, &mut buf)?;
            let end = buf.iter().position(|&b| b == 0).unwrap_or(BLOCK_SIZE);
            chunks.push(buf[..end].to_vec());
            trace!("read block {} of {:?}", block, entry.name);

            next = match self.fat.get(block) {
                Some(FatEntry::Next(following)) => Some(following),
                Some(FatEntry::End) => None,
                Some(FatEntry::Free) | None => {
                    return Err(FileSystemError::Corrupted {
                        block,
                        detail: "chain runs into a free block".to_string(),
                    })
                }
            };
        }

        Ok(FileContents { chunks })
    }
}
