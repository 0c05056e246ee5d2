use log::info;
use thiserror::Error;

use crate::kernel::console::Console;

/// CPU 保留的异常向量数
pub const EXCEPTION_VECTORS: usize = 32;

const EXCEPTION_MESSAGES: [&str; EXCEPTION_VECTORS] = [
    "Division By Zero",
    "Debug",
    "Non Maskable Interrupt",
    "Breakpoint",
    "Into Detected Overflow",
    "Out of Bounds",
    "Invalid Opcode",
    "No Coprocessor",
    "Double Fault",
    "Coprocessor Segment Overrun",
    "Bad TSS",
    "Segment Not Present",
    "Stack Fault",
    "General Protection Fault",
    "Page Fault",
    "Unknown Interrupt",
    "Coprocessor Fault",
    "Alignment Check",
    "Machine Check",
    "Reserved",
    "Reserved",
    "Reserved",
    "Reserved",
    "Reserved",
    "Reserved",
    "Reserved",
    "Reserved",
    "Reserved",
    "Reserved",
    "Reserved",
    "Reserved",
    "Reserved",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InterruptError {
    #[error("interrupt {0} raised before handlers were installed")]
    NotInstalled(u8),

    #[error("no handler for interrupt {0}")]
    Unhandled(u8),
}

/// 异常向量表，只登记前 32 个 CPU 异常
#[derive(Debug, Default)]
pub struct InterruptTable {
    installed: bool,
}

impl InterruptTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(&mut self) {
        self.installed = true;
        info!("installed {} exception handlers", EXCEPTION_VECTORS);
    }

    /// 软件触发一个中断，交给对应的处理函数
    pub fn raise<C: Console>(&self, vector: u8, console: &mut C) -> Result<(), InterruptError> {
        if !self.installed {
            return Err(InterruptError::NotInstalled(vector));
        }
        let message = EXCEPTION_MESSAGES
            .get(vector as usize)
            .ok_or(InterruptError::Unhandled(vector))?;

        console.emit(&format!("received interrupt: {}\n{}\n", vector, message));
        Ok(())
    }
}
