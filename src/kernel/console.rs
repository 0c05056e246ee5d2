use std::io::{self, Write};

use colored::*;

/// 提示符
pub const PROMPT: &str = "> ";

/// 字符输出设备
pub trait Console {
    fn emit(&mut self, text: &str);

    fn emit_error(&mut self, text: &str) {
        self.emit(text);
    }

    fn prompt(&mut self) {
        self.emit(PROMPT);
    }
}

/// 终端输出
#[derive(Debug)]
pub struct TerminalConsole {
    line_editor: bool, // 提示符由行编辑器负责绘制
}

impl TerminalConsole {
    pub fn new(line_editor: bool) -> Self {
        Self { line_editor }
    }
}

impl Console for TerminalConsole {
    fn emit(&mut self, text: &str) {
        let mut stdout = io::stdout().lock();
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
    }

    fn emit_error(&mut self, text: &str) {
        self.emit(&text.red().to_string());
    }

    fn prompt(&mut self) {
        if !self.line_editor {
            self.emit(PROMPT);
        }
    }
}

/// 把输出收集到字符串里，供测试断言
#[cfg(test)]
#[derive(Debug, Default)]
pub struct CaptureConsole {
    pub output: String,
}

#[cfg(test)]
impl Console for CaptureConsole {
    fn emit(&mut self, text: &str) {
        self.output.push_str(text);
    }
}
