use crate::shell::command::Command;

/// 在一行输入上逐段切分的游标
///
/// 每次调用从上一次停下的位置继续；游标只属于当前这一行。
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    line: &'a str,
    pos: Option<usize>, // None 表示已经切完
}

impl<'a> Cursor<'a> {
    pub fn new(line: &'a str) -> Self {
        Self { line, pos: Some(0) }
    }

    /// 跳过开头的分隔符，取出下一个记号，并吞掉结束它的那一个分隔符
    pub fn next_token(&mut self, delims: &[char]) -> Option<&'a str> {
        let rest = &self.line[self.pos?..];
        let start = rest.len() - rest.trim_start_matches(delims).len();
        let rest = &rest[start..];
        if rest.is_empty() {
            self.pos = None;
            return None;
        }

        let token_start = self.line.len() - rest.len();
        match rest.char_indices().find(|(_, c)| delims.contains(c)) {
            Some((end, delim)) => {
                self.pos = Some(token_start + end + delim.len_utf8());
                Some(&rest[..end])
            }
            None => {
                self.pos = None;
                Some(rest)
            }
        }
    }

    /// 余下的全部文本，原样返回；为空时视为没有
    pub fn remainder(&mut self) -> Option<&'a str> {
        self.next_token(&[])
    }
}

pub fn parse_command(input: &str) -> Command {
    match input {
        "END" => Command::End,
        "PAGE" => Command::Page,
        _ => {
            if let Some(args) = input.strip_prefix("CREATE ") {
                let mut cursor = Cursor::new(args);
                match (cursor.next_token(&[' ']), cursor.remainder()) {
                    (Some(name), Some(content)) => Command::Create {
                        name: name.to_string(),
                        content: content.to_string(),
                    },
                    _ => Command::Usage,
                }
            } else if let Some(name) = input.strip_prefix("READ ") {
                Command::Read(name.to_string())
            } else {
                Command::Unknown(input.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_resumes_where_it_stopped() {
        let mut cursor = Cursor::new("  one two  three");
        assert_eq!(cursor.next_token(&[' ']), Some("one"));
        assert_eq!(cursor.next_token(&[' ']), Some("two"));
        assert_eq!(cursor.remainder(), Some(" three"));
        assert_eq!(cursor.next_token(&[' ']), None);
    }

    #[test]
    fn cursor_is_exhausted_after_last_token() {
        let mut cursor = Cursor::new("only");
        assert_eq!(cursor.next_token(&[' ']), Some("only"));
        assert_eq!(cursor.remainder(), None);

        let mut cursor = Cursor::new("name ");
        assert_eq!(cursor.next_token(&[' ']), Some("name"));
        assert_eq!(cursor.remainder(), None);

        let mut cursor = Cursor::new("   ");
        assert_eq!(cursor.next_token(&[' ']), None);
    }

    #[test]
    fn exact_commands() {
        assert_eq!(parse_command("END"), Command::End);
        assert_eq!(parse_command("PAGE"), Command::Page);
        assert_eq!(parse_command("END "), Command::Unknown("END ".to_string()));
        assert_eq!(parse_command("end"), Command::Unknown("end".to_string()));
    }

    #[test]
    fn create_splits_name_from_content() {
        assert_eq!(
            parse_command("CREATE notes hello there world"),
            Command::Create {
                name: "notes".to_string(),
                content: "hello there world".to_string()
            }
        );
        assert_eq!(
            parse_command("CREATE   notes  padded"),
            Command::Create {
                name: "notes".to_string(),
                content: " padded".to_string()
            }
        );
    }

    #[test]
    fn create_without_content_is_a_usage_error() {
        assert_eq!(parse_command("CREATE x"), Command::Usage);
        assert_eq!(parse_command("CREATE x "), Command::Usage);
        assert_eq!(parse_command("CREATE "), Command::Usage);
        assert_eq!(parse_command("CREATE"), Command::Unknown("CREATE".to_string()));
    }

    #[test]
    fn read_takes_the_rest_verbatim() {
        assert_eq!(parse_command("READ a"), Command::Read("a".to_string()));
        assert_eq!(parse_command("READ  a "), Command::Read(" a ".to_string()));
        assert_eq!(parse_command("READ "), Command::Read(String::new()));
    }
}
