use crate::disk::{
    error::Result,
    types::{Block, BlockId},
};

pub trait BlockDevice {
    fn read_block(&self, block_id: BlockId, buf: &mut Block) -> Result<()>;
    fn write_block(&mut self, block_id: BlockId, buf: &Block) -> Result<()>;

    /// 设备包含的块数
    fn block_count(&self) -> usize;
}
