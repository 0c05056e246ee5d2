use log::debug;
use thiserror::Error;

/// 内核堆起始地址
pub const HEAP_START: u32 = 0x10000;

/// 内核堆上限（不含）
pub const HEAP_END: u32 = 0x0040_0000;

/// 页大小：4KB
pub const PAGE_SIZE: u32 = 0x1000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeapError {
    #[error("kernel heap exhausted: requested {requested} bytes, {remaining} left")]
    Exhausted { requested: usize, remaining: usize },
}

/// 一次分配的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    pub virt: u32, // 虚拟地址
    pub phys: u32, // 物理地址
}

pub trait PageAllocator {
    fn allocate(&mut self, size: usize, page_aligned: bool) -> Result<Allocation, HeapError>;
}

/// 只增不减的放置式分配器，地址恒等映射
#[derive(Debug)]
pub struct PlacementAllocator {
    next_free: u32, // 下一个可用地址
    end: u32,
}

impl PlacementAllocator {
    pub fn new() -> Self {
        Self::with_range(HEAP_START, HEAP_END)
    }

    pub fn with_range(start: u32, end: u32) -> Self {
        Self {
            next_free: start,
            end,
        }
    }

    #[cfg(test)]
    pub fn next_free(&self) -> u32 {
        self.next_free
    }
}

impl Default for PlacementAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl PageAllocator for PlacementAllocator {
    fn allocate(&mut self, size: usize, page_aligned: bool) -> Result<Allocation, HeapError> {
        let mut addr = self.next_free as u64;
        if page_aligned {
            addr = addr.next_multiple_of(PAGE_SIZE as u64);
        }

        let end = addr + size as u64;
        if end > self.end as u64 {
            return Err(HeapError::Exhausted {
                requested: size,
                remaining: (self.end as u64).saturating_sub(addr) as usize,
            });
        }

        // 上面已检查 end <= self.end，不会截断
        let addr = addr as u32;
        self.next_free = end as u32;
        debug!("kmalloc({}, aligned={}) -> {:#x}", size, page_aligned, addr);

        Ok(Allocation {
            virt: addr,
            phys: addr,
        })
    }
}
