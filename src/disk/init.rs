use indicatif::ProgressBar;
use log::debug;

use crate::{
    disk::{ram_disk::RamDisk, DISK_SIZE, NUM_BLOCKS},
    kernel::heap::{HeapError, PageAllocator},
};

/// 从内核堆申请磁盘缓冲区，并逐块清零
///
/// 进度条按块推进；测试中传入 `ProgressBar::hidden()` 即可静默。
pub fn initialize_ram_disk<H: PageAllocator>(
    heap: &mut H,
    progress: &ProgressBar,
) -> Result<RamDisk, HeapError> {
    let region = heap.allocate(DISK_SIZE, false)?;
    debug!(
        "ram disk backed by {} bytes at {:#x}",
        DISK_SIZE, region.virt
    );

    let mut disk = RamDisk::new(region.virt, NUM_BLOCKS);

    progress.set_length(NUM_BLOCKS as u64);
    disk.format_with(|_| progress.inc(1));
    progress.finish_and_clear();

    Ok(disk)
}
