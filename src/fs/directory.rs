use std::fmt;

use crate::{
    disk::BlockId,
    fs::{
        config::{MAX_FILES, MAX_NAME_LEN, NAME_CAPACITY},
        error::{FileSystemError, Result},
    },
};

/// 定长存储的文件名
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FileName {
    bytes: [u8; NAME_CAPACITY],
    len: u8,
}

impl FileName {
    /// 超长的名字直接拒绝，不做截断
    pub fn new(name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(FileSystemError::EmptyName);
        }
        if name.len() > MAX_NAME_LEN {
            return Err(FileSystemError::NameTooLong {
                len: name.len(),
                max: MAX_NAME_LEN,
            });
        }
        let mut bytes = [0u8; NAME_CAPACITY];
        bytes[..name.len()].copy_from_slice(name.as_bytes());
        Ok(Self {
            bytes,
            len: name.len() as u8,
        })
    }

    pub fn as_str(&self) -> &str {
        // 只会由合法的 &str 构造
        std::str::from_utf8(&self.bytes[..self.len as usize]).unwrap_or_default()
    }
}

impl fmt::Debug for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// 一个目录项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileEntry {
    pub name: FileName,
    pub start_block: Option<BlockId>, // 空文件没有数据块
    pub size: usize,                  // 写入时的原始字节数
}

/// 扁平目录：定长、只追加、按插入顺序保存
#[derive(Debug)]
pub struct Directory {
    entries: [Option<FileEntry>; MAX_FILES],
    len: usize, // 下一个空位，只增不减
}

impl Directory {
    pub fn new() -> Self {
        Self {
            entries: [None; MAX_FILES],
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_full(&self) -> bool {
        self.len >= MAX_FILES
    }

    // 添加目录项，不检查重名
    pub fn push(&mut self, entry: FileEntry) -> Result<&FileEntry> {
        if self.is_full() {
            return Err(FileSystemError::FileLimitReached);
        }
        let slot = &mut self.entries[self.len];
        self.len += 1;
        Ok(&*slot.insert(entry))
    }

    // 按插入顺序查找第一个同名项
    pub fn find(&self, name: &str) -> Option<&FileEntry> {
        self.iter().find(|entry| entry.name.as_str() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries[..self.len].iter().flatten()
    }
}

impl Default for Directory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, start_block: Option<BlockId>, size: usize) -> FileEntry {
        FileEntry {
            name: FileName::new(name).unwrap(),
            start_block,
            size,
        }
    }

    #[test]
    fn names_are_bounded() {
        assert_eq!(FileName::new("notes.txt").unwrap().as_str(), "notes.txt");
        assert!(FileName::new(&"a".repeat(MAX_NAME_LEN)).is_ok());
        assert_eq!(
            FileName::new(&"a".repeat(MAX_NAME_LEN + 1)),
            Err(FileSystemError::NameTooLong {
                len: MAX_NAME_LEN + 1,
                max: MAX_NAME_LEN
            })
        );
        assert_eq!(FileName::new(""), Err(FileSystemError::EmptyName));
    }

    #[test]
    fn find_returns_first_match_in_insertion_order() {
        let mut dir = Directory::new();
        dir.push(entry("a", Some(0), 3)).unwrap();
        dir.push(entry("b", Some(1), 4)).unwrap();
        dir.push(entry("a", Some(2), 5)).unwrap();

        assert_eq!(dir.len(), 3);
        assert_eq!(dir.find("a").unwrap().start_block, Some(0));
        assert_eq!(dir.find("b").unwrap().size, 4);
        assert!(dir.find("A").is_none());
        assert!(dir.find("a ").is_none());
    }

    #[test]
    fn push_fails_once_full() {
        let mut dir = Directory::new();
        for i in 0..MAX_FILES {
            dir.push(entry(&format!("f{i}"), None, 0)).unwrap();
        }
        assert!(dir.is_full());
        assert_eq!(
            dir.push(entry("extra", None, 0)).unwrap_err(),
            FileSystemError::FileLimitReached
        );
        assert_eq!(dir.len(), MAX_FILES);
        assert_eq!(dir.iter().count(), MAX_FILES);
    }
}
