pub mod command;
pub mod parse;

use std::{
    borrow::Cow,
    io::{self, stdout, BufRead, IsTerminal},
};

use anyhow::{Context, Result};
use colored::*;
use crossterm::{
    cursor, execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use reedline::{
    default_emacs_keybindings, ColumnarMenu, DefaultCompleter, Emacs, FileBackedHistory, KeyCode,
    KeyModifiers, MenuBuilder, Prompt, PromptEditMode, PromptHistorySearch,
    PromptHistorySearchStatus, Reedline, ReedlineEvent, ReedlineMenu, Signal,
};

use crate::{
    config::ShellConfig,
    kernel::{
        console::{Console, TerminalConsole, PROMPT},
        heap::{PageAllocator, PlacementAllocator},
        Kernel,
    },
    shell::{
        command::{execute_command, Flow},
        parse::parse_command,
    },
};

const COMMANDS: [&str; 4] = ["END", "PAGE", "CREATE", "READ"];

/// 处理一行输入；停机之后的输入一律忽略
pub fn dispatch_line<C: Console, H: PageAllocator>(kernel: &mut Kernel<C, H>, line: &str) -> Flow {
    if kernel.is_halted() {
        return Flow::Halt;
    }

    let cmd = parse_command(line);
    let flow = execute_command(&cmd, kernel);
    if flow == Flow::Continue {
        kernel.console.prompt();
    }
    flow
}

/// 逐行执行，遇到 END 即停止，返回实际执行的行数
pub fn run_lines<C, H, I>(kernel: &mut Kernel<C, H>, lines: I) -> usize
where
    C: Console,
    H: PageAllocator,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut executed = 0;
    for line in lines {
        if kernel.is_halted() {
            break;
        }
        executed += 1;
        if dispatch_line(kernel, line.as_ref()) == Flow::Halt {
            break;
        }
    }
    executed
}

pub fn start_shell(config: &ShellConfig) -> Result<()> {
    if io::stdin().is_terminal() {
        run_interactive(config)
    } else {
        run_piped(io::stdin().lock())
    }
}

/// 非终端输入：提示符由内核自己输出
fn run_piped(input: impl BufRead) -> Result<()> {
    let mut kernel = Kernel::boot(
        TerminalConsole::new(false),
        PlacementAllocator::new(),
        &ProgressBar::hidden(),
    )?;
    let executed = feed_lines(&mut kernel, input)?;
    info!("piped session ran {} lines", executed);
    Ok(())
}

/// 把输入流逐行交给 `run_lines`；读取失败时停止并返回错误
fn feed_lines<C: Console, H: PageAllocator>(
    kernel: &mut Kernel<C, H>,
    input: impl BufRead,
) -> Result<usize> {
    let mut failure = None;
    let lines = input.lines().map_while(|line| match line {
        Ok(line) => Some(line),
        Err(e) => {
            failure = Some(e);
            None
        }
    });

    let executed = run_lines(kernel, lines);
    match failure {
        Some(e) => Err(e).context("failed to read from stdin"),
        None => Ok(executed),
    }
}

fn run_interactive(config: &ShellConfig) -> Result<()> {
    if config.banner {
        boot_banner()?;
    }

    let progress = ProgressBar::new(0).with_style(
        ProgressStyle::with_template("[{bar:40.cyan/blue}] {pos:>3}/{len} blocks")?
            .progress_chars("=> "),
    );
    let mut kernel = Kernel::boot(TerminalConsole::new(true), PlacementAllocator::new(), &progress)?;

    let mut line_editor = build_line_editor(config);
    let prompt = KernelPrompt::new();

    loop {
        match line_editor.read_line(&prompt) {
            Ok(Signal::Success(buffer)) => {
                if dispatch_line(&mut kernel, &buffer) == Flow::Halt {
                    break;
                }
            }
            Ok(Signal::CtrlD) => {
                println!("{}", "Exiting MiniFS...".yellow());
                break;
            }
            Ok(_) => continue,
            Err(e) => return Err(e).context("error reading line"),
        }
    }

    info!(
        "shell closed with {} files: {:?}",
        kernel.fs.file_count(),
        kernel.fs.entries().map(|e| e.name).collect::<Vec<_>>()
    );
    Ok(())
}

fn build_line_editor(config: &ShellConfig) -> Reedline {
    // 命令补全
    let commands = COMMANDS.iter().map(|c| c.to_string()).collect();
    let completer = DefaultCompleter::new_with_wordlen(commands, 2);
    let completion_menu = Box::new(ColumnarMenu::default().with_name("completion_menu"));

    let mut keybindings = default_emacs_keybindings();
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::UntilFound(vec![
            ReedlineEvent::Menu("completion_menu".to_string()),
            ReedlineEvent::MenuNext,
        ]),
    );

    let line_editor = Reedline::create()
        .with_completer(Box::new(completer))
        .with_menu(ReedlineMenu::EngineCompleter(completion_menu))
        .with_edit_mode(Box::new(Emacs::new(keybindings)));

    match FileBackedHistory::with_file(config.history_size, config.history_path.clone()) {
        Ok(history) => line_editor.with_history(Box::new(history)),
        Err(e) => {
            warn!(
                "history disabled, cannot open {}: {}",
                config.history_path.display(),
                e
            );
            line_editor
        }
    }
}

/// 左侧显示 user@host，指示符与内核提示符一致
struct KernelPrompt {
    left: String,
}

impl KernelPrompt {
    fn new() -> Self {
        let username = whoami::username();
        let hostname = whoami::fallible::hostname().unwrap_or_else(|_| whoami::devicename());
        Self {
            left: format!("{}@{} ", username, hostname),
        }
    }
}

impl Prompt for KernelPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.left)
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("MiniFS")
    }

    fn render_prompt_indicator(&self, _edit_mode: PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed(PROMPT)
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("::: ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!(
            "({}reverse-search: {}) ",
            prefix, history_search.term
        ))
    }
}

/// 清屏并打印开机画面
fn boot_banner() -> Result<()> {
    let mut stdout = stdout();
    execute!(
        stdout,
        Clear(ClearType::All),
        cursor::MoveTo(0, 0),
        SetForegroundColor(Color::Cyan),
        Print("MiniFS kernel console\n"),
        ResetColor
    )?;
    println!("{}", "[Booting: interrupts, ram disk, file system]".bright_yellow().bold());
    Ok(())
}
