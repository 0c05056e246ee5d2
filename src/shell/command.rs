use log::{debug, warn};

use crate::{
    fs::error::FileSystemError,
    kernel::{console::Console, heap::PageAllocator, Kernel},
};

/// `PAGE` 命令申请的字节数
pub const PAGE_REQUEST_SIZE: usize = 1000;

pub const USAGE_CREATE: &str = "Usage: CREATE <filename> <content>\n";
pub const UNKNOWN_COMMAND: &str = "Unknown command. Available: END, PAGE, CREATE, READ\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    End,
    Page,
    Create { name: String, content: String },
    Read(String),
    Usage,           // CREATE 缺少文件名或内容
    Unknown(String), // 无法识别的输入
}

/// 命令执行后会话是否继续
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Halt,
}

pub fn execute_command<C: Console, H: PageAllocator>(
    cmd: &Command,
    kernel: &mut Kernel<C, H>,
) -> Flow {
    match cmd {
        Command::End => {
            kernel.console.emit("Stopping the CPU. Bye!\n");
            kernel.halt();
            return Flow::Halt;
        }
        Command::Page => match kernel.heap.allocate(PAGE_REQUEST_SIZE, true) {
            Ok(page) => kernel.console.emit(&format!(
                "Page: {:#x}, physical address: {:#x}\n",
                page.virt, page.phys
            )),
            Err(e) => {
                warn!("PAGE failed: {}", e);
                kernel.console.emit_error(&format!("Error: {}!\n", e));
            }
        },
        Command::Create { name, content } => {
            match kernel.fs.create(name, content.as_bytes()).map(|_| ()) {
                Ok(_) => kernel.console.emit("File created successfully!\n"),
                Err(e) => report(kernel, &e),
            }
        }
        Command::Read(name) => match kernel.fs.read(name) {
            Ok(contents) => {
                kernel.console.emit("Contents of file: ");
                kernel.console.emit(&contents.to_string());
                kernel.console.emit("\n");
            }
            Err(e) => report(kernel, &e),
        },
        Command::Usage => kernel.console.emit(USAGE_CREATE),
        Command::Unknown(input) => {
            debug!("unknown command {:?}", input);
            kernel.console.emit(UNKNOWN_COMMAND);
        }
    }

    Flow::Continue
}

fn report<C: Console, H: PageAllocator>(kernel: &mut Kernel<C, H>, e: &FileSystemError) {
    if let FileSystemError::Corrupted { .. } | FileSystemError::Disk(_) = e {
        warn!("{}", e);
    }
    kernel.console.emit_error(&format!("Error: {}!\n", e));
}
