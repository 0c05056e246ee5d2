pub mod console;
pub mod heap;
pub mod interrupts;

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use log::info;

use crate::{
    disk::{init::initialize_ram_disk, RamDisk},
    fs::FileSystem,
    kernel::{console::Console, heap::PageAllocator, interrupts::InterruptTable},
};

pub const WELCOME: &str = "Type something, it will go through the kernel\n\
Commands: END, PAGE, CREATE <filename> <content>, READ <filename>\n";

/// 一次内核会话：输出设备、内核堆和内存文件系统
#[derive(Debug)]
pub struct Kernel<C: Console, H: PageAllocator> {
    pub console: C,
    pub heap: H,
    pub fs: FileSystem<RamDisk>,
    halted: bool, // 停机后不再处理任何输入
}

impl<C: Console, H: PageAllocator> Kernel<C, H> {
    /// 装中断 -> 触发两个测试中断 -> 初始化文件系统 -> 打印欢迎信息
    pub fn boot(mut console: C, mut heap: H, progress: &ProgressBar) -> Result<Self> {
        let mut interrupts = InterruptTable::new();
        interrupts.install();
        for vector in [2, 3] {
            interrupts
                .raise(vector, &mut console)
                .with_context(|| format!("test interrupt {} failed", vector))?;
        }

        let disk = initialize_ram_disk(&mut heap, progress)
            .context("failed to allocate the ram disk")?;
        info!("ram disk at {:#x}", disk.base_addr());
        let fs = FileSystem::new(disk);
        console.emit("Filesystem initialized!\n");

        console.emit(WELCOME);
        console.prompt();

        Ok(Self {
            console,
            heap,
            fs,
            halted: false,
        })
    }

    pub fn halt(&mut self) {
        info!("cpu halted");
        self.halted = true;
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        disk::NUM_BLOCKS,
        kernel::{console::CaptureConsole, heap::PlacementAllocator},
    };

    #[test]
    fn boot_runs_the_startup_sequence() {
        let kernel = Kernel::boot(
            CaptureConsole::default(),
            PlacementAllocator::new(),
            &ProgressBar::hidden(),
        )
        .unwrap();

        assert_eq!(
            kernel.console.output,
            "received interrupt: 2\nNon Maskable Interrupt\n\
             received interrupt: 3\nBreakpoint\n\
             Filesystem initialized!\n\
             Type something, it will go through the kernel\n\
             Commands: END, PAGE, CREATE <filename> <content>, READ <filename>\n> "
        );
        assert!(!kernel.is_halted());
        assert_eq!(kernel.fs.free_blocks(), NUM_BLOCKS);
        assert_eq!(kernel.fs.file_count(), 0);
    }

    #[test]
    fn boot_fails_when_heap_cannot_hold_the_disk() {
        let result = Kernel::boot(
            CaptureConsole::default(),
            PlacementAllocator::with_range(0x1000, 0x1100),
            &ProgressBar::hidden(),
        );
        assert!(result.is_err());
    }
}
