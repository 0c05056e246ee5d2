pub mod block_device;
pub mod error;
pub mod init;
pub mod ram_disk;
pub mod types;

pub use block_device::BlockDevice;
pub use error::DiskError;
pub use ram_disk::RamDisk;
pub use types::{Block, BlockId, BLOCK_SIZE, DISK_SIZE, NUM_BLOCKS};
