use crate::disk::{
    block_device::BlockDevice,
    error::{DiskError, Result},
    types::{Block, BlockId, BLOCK_SIZE},
};

/// 驻留在内存缓冲区里的磁盘，只负责按块寻址
#[derive(Debug)]
pub struct RamDisk {
    bytes: Vec<u8>,      // 扁平化存储，块 i 位于 i * BLOCK_SIZE
    total_blocks: usize, // 块总数
    base_addr: u32,      // 缓冲区在内核堆中的起始地址
}

impl RamDisk {
    pub fn new(base_addr: u32, total_blocks: usize) -> Self {
        Self {
            bytes: vec![0u8; total_blocks * BLOCK_SIZE],
            total_blocks,
            base_addr,
        }
    }

    pub fn base_addr(&self) -> u32 {
        self.base_addr
    }

    /// 逐块清零整个磁盘，每清完一块回调一次
    pub fn format_with(&mut self, mut on_block: impl FnMut(BlockId)) {
        for (block_id, block) in self.bytes.chunks_mut(BLOCK_SIZE).enumerate() {
            block.fill(0);
            on_block(block_id);
        }
    }

    /// 按 strncpy 语义写入：遇到 NUL 或写满一块为止，其余字节补 0
    pub fn write_bytes(&mut self, block_id: BlockId, src: &[u8]) -> Result<()> {
        let range = self.block_range(block_id)?;
        let block = &mut self.bytes[range];
        let len = src
            .iter()
            .take(BLOCK_SIZE)
            .position(|&b| b == 0)
            .unwrap_or_else(|| src.len().min(BLOCK_SIZE));
        block[..len].copy_from_slice(&src[..len]);
        block[len..].fill(0);
        Ok(())
    }

    /// 借出一个块的只读视图
    pub fn block(&self, block_id: BlockId) -> Result<&[u8]> {
        let range = self.block_range(block_id)?;
        Ok(&self.bytes[range])
    }

    fn block_range(&self, block_id: BlockId) -> Result<std::ops::Range<usize>> {
        if block_id >= self.total_blocks {
            return Err(DiskError::OutOfRange {
                block: block_id,
                total: self.total_blocks,
            });
        }
        let start = block_id * BLOCK_SIZE;
        Ok(start..start + BLOCK_SIZE)
    }
}

impl BlockDevice for RamDisk {
    fn read_block(&self, block_id: BlockId, buf: &mut Block) -> Result<()> {
        buf.copy_from_slice(self.block(block_id)?);
        Ok(())
    }

    fn write_block(&mut self, block_id: BlockId, buf: &Block) -> Result<()> {
        self.write_bytes(block_id, buf)
    }

    fn block_count(&self) -> usize {
        self.total_blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disk::NUM_BLOCKS;

    #[test]
    fn short_write_pads_rest_of_block_with_zeros() {
        let mut disk = RamDisk::new(0x10000, NUM_BLOCKS);
        disk.write_bytes(3, &[0xAA; BLOCK_SIZE]).unwrap();
        disk.write_bytes(3, b"hi").unwrap();

        let mut buf = [0xFFu8; BLOCK_SIZE];
        disk.read_block(3, &mut buf).unwrap();
        assert_eq!(&buf[..2], b"hi");
        assert!(buf[2..].iter().all(|&b| b == 0));
    }

    #[test]
    fn write_stops_at_first_nul() {
        let mut disk = RamDisk::new(0x10000, NUM_BLOCKS);
        disk.write_bytes(0, b"ab\0cd").unwrap();
        let block = disk.block(0).unwrap();
        assert_eq!(&block[..2], b"ab");
        assert!(block[2..].iter().all(|&b| b == 0));
    }

    #[test]
    fn write_is_capped_at_block_size() {
        let mut disk = RamDisk::new(0x10000, NUM_BLOCKS);
        let long = [b'x'; BLOCK_SIZE + 8];
        disk.write_bytes(1, &long).unwrap();
        assert_eq!(disk.block(1).unwrap(), &long[..BLOCK_SIZE]);
        assert!(disk.block(2).unwrap().iter().all(|&b| b == 0));
    }

    #[test]
    fn format_zeroes_every_block() {
        let mut disk = RamDisk::new(0x10000, NUM_BLOCKS);
        for block in 0..NUM_BLOCKS {
            disk.write_bytes(block, b"dirty").unwrap();
        }

        let mut visited = Vec::new();
        disk.format_with(|block| visited.push(block));

        assert_eq!(visited, (0..NUM_BLOCKS).collect::<Vec<_>>());
        assert!((0..NUM_BLOCKS).all(|b| disk.block(b).unwrap().iter().all(|&x| x == 0)));
    }

    #[test]
    fn out_of_range_block_is_rejected() {
        let mut disk = RamDisk::new(0x10000, NUM_BLOCKS);
        let err = disk.write_bytes(NUM_BLOCKS, b"x").unwrap_err();
        assert_eq!(
            err,
            DiskError::OutOfRange {
                block: NUM_BLOCKS,
                total: NUM_BLOCKS
            }
        );
        assert!(disk.block(NUM_BLOCKS).is_err());
    }
}
