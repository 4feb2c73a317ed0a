//! 十位 62 进制 ID 生成器
//!
//! 用于生成订阅标识等内部短 ID。
//! ID 格式：10 位 62 进制字符串（0-9, a-z, A-Z）

use rand::Rng;
use std::time::{SystemTime, UNIX_EPOCH};

/// 62 进制字符集
const BASE62_CHARS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// ID 长度
const ID_LENGTH: usize = 10;

/// 生成 10 位 62 进制 ID
///
/// 使用时间戳 + 随机数组合，确保唯一性
///
/// # Example
///
/// ```
/// use jimu_core::utils::id::generate_id;
///
/// let id = generate_id();
/// assert_eq!(id.len(), 10);
/// ```
pub fn generate_id() -> String {
    let mut rng = rand::thread_rng();

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64;

    let random: u64 = rng.gen();

    // 组合时间戳和随机数
    let mut value = timestamp ^ random;

    // 转换为 62 进制
    let mut result = Vec::with_capacity(ID_LENGTH);
    for _ in 0..ID_LENGTH {
        let index = (value % 62) as usize;
        result.push(BASE62_CHARS[index]);
        value /= 62;
        if value == 0 {
            value = rng.gen();
        }
    }

    result.reverse();
    String::from_utf8(result).expect("base62 字符集始终是合法 UTF-8")
}

/// 验证 ID 格式是否有效
///
/// # Example
///
/// ```
/// use jimu_core::utils::id::is_valid_id;
///
/// assert!(is_valid_id("a1B2c3D4e5"));
/// assert!(!is_valid_id("too-short"));
/// ```
pub fn is_valid_id(id: &str) -> bool {
    id.len() == ID_LENGTH && id.bytes().all(|b| BASE62_CHARS.contains(&b))
}
