use log::{debug, warn};

use crate::{
    disk::{BlockId, NUM_BLOCKS},
    fs::error::{FileSystemError, Result},
};

/// 分配表中的一项，与磁盘块一一对应
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatEntry {
    Free,          // 未使用
    End,           // 已使用，且是链上最后一块
    Next(BlockId), // 已使用，指向链上的下一块
}

impl FatEntry {
    pub fn is_free(self) -> bool {
        matches!(self, FatEntry::Free)
    }
}

/// FAT 风格的块链表
#[derive(Debug)]
pub struct AllocationTable {
    entries: [FatEntry; NUM_BLOCKS], // 每一项描述一个块
    free_blocks: usize,              // 当前空闲块数
}

impl AllocationTable {
    pub fn new() -> Self {
        Self {
            entries: [FatEntry::Free; NUM_BLOCKS],
            free_blocks: NUM_BLOCKS,
        }
    }

    /// 从 0 号块开始线性扫描，返回编号最小的空闲块
    pub fn find_free_block(&self) -> Option<BlockId> {
        self.entries.iter().position(|entry| entry.is_free())
    }

    pub fn get(&self, block: BlockId) -> Option<FatEntry> {
        self.entries.get(block).copied()
    }

    pub fn free_blocks(&self) -> usize {
        self.free_blocks
    }

    /// 一次性分配 `count` 个块并串成链，返回按链顺序排列的块号
    ///
    /// 中途找不到空闲块时，本次已占用的块全部归还，表保持调用前的状态。
    pub fn allocate_chain(&mut self, count: usize) -> Result<Vec<BlockId>> {
        let mut staged = Vec::with_capacity(count);

        for _ in 0..count {
            match self.find_free_block() {
                Some(block) => {
                    self.set(block, FatEntry::End);
                    staged.push(block);
                }
                None => {
                    warn!(
                        "chain allocation of {} blocks failed after {}, rolling back",
                        count,
                        staged.len()
                    );
                    let available = staged.len();
                    for &block in &staged {
                        self.set(block, FatEntry::Free);
                    }
                    return Err(FileSystemError::OutOfSpace {
                        needed: count,
                        available,
                    });
                }
            }
        }

        for pair in staged.windows(2) {
            self.set(pair[0], FatEntry::Next(pair[1]));
        }

        debug!("allocated chain {:?}", staged);
        Ok(staged)
    }

    // 维护空闲计数
    fn set(&mut self, block: BlockId, entry: FatEntry) {
        let old = std::mem::replace(&mut self.entries[block], entry);
        match (old.is_free(), entry.is_free()) {
            (true, false) => self.free_blocks -= 1,
            (false, true) => self.free_blocks += 1,
            _ => {}
        }
    }
}

impl Default for AllocationTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fresh_table_is_all_free() {
        let fat = AllocationTable::new();
        assert_eq!(fat.free_blocks(), NUM_BLOCKS);
        assert_eq!(fat.find_free_block(), Some(0));
        assert!((0..NUM_BLOCKS).all(|b| fat.get(b) == Some(FatEntry::Free)));
        assert_eq!(fat.get(NUM_BLOCKS), None);
    }

    #[test]
    fn chain_is_linked_in_allocation_order() {
        let mut fat = AllocationTable::new();
        let chain = fat.allocate_chain(3).unwrap();

        assert_eq!(chain, vec![0, 1, 2]);
        assert_eq!(fat.get(0), Some(FatEntry::Next(1)));
        assert_eq!(fat.get(1), Some(FatEntry::Next(2)));
        assert_eq!(fat.get(2), Some(FatEntry::End));
        assert_eq!(fat.free_blocks(), NUM_BLOCKS - 3);
    }

    #[test]
    fn end_of_chain_is_not_reused() {
        let mut fat = AllocationTable::new();
        let first = fat.allocate_chain(1).unwrap();
        let second = fat.allocate_chain(1).unwrap();

        assert_eq!(first, vec![0]);
        assert_eq!(second, vec![1]);
        assert_eq!(fat.get(0), Some(FatEntry::End));
    }

    #[test]
    fn failed_allocation_rolls_back() {
        let mut fat = AllocationTable::new();
        fat.allocate_chain(NUM_BLOCKS - 2).unwrap();

        let err = fat.allocate_chain(3).unwrap_err();
        assert_eq!(
            err,
            FileSystemError::OutOfSpace {
                needed: 3,
                available: 2
            }
        );
        assert_eq!(fat.free_blocks(), 2);
        assert_eq!(fat.find_free_block(), Some(NUM_BLOCKS - 2));
        assert_eq!(fat.get(NUM_BLOCKS - 1), Some(FatEntry::Free));
    }

    #[test]
    fn zero_block_chain_touches_nothing() {
        let mut fat = AllocationTable::new();
        assert!(fat.allocate_chain(0).unwrap().is_empty());
        assert_eq!(fat.free_blocks(), NUM_BLOCKS);
    }

    proptest! {
        #[test]
        fn find_free_block_returns_lowest_free_index(
            used in proptest::collection::vec(any::<bool>(), NUM_BLOCKS)
        ) {
            let mut fat = AllocationTable::new();
            for (block, &in_use) in used.iter().enumerate() {
                if in_use {
                    fat.set(block, FatEntry::End);
                }
            }

            let expected = used.iter().position(|&in_use| !in_use);
            prop_assert_eq!(fat.find_free_block(), expected);
            prop_assert_eq!(
                fat.free_blocks(),
                used.iter().filter(|&&in_use| !in_use).count()
            );
        }
    }
}
