//! 文本文件读取, 自动匹配文件编码

use std::{fs, path::Path};

use chardet::{charset2encoding, detect};
use encoding::label::encoding_from_whatwg_label;
use encoding::DecoderTrap;
use log::{debug, error};

use crate::error::Error;

/// 读取文件内容， 自动匹配文件编码
pub fn read_text_auto(path: &Path) -> Result<String, Error> {
    let bytes = fs::read(path)?;
    decode_auto(&bytes)
}

/// 字节解码
///
/// 优先尝试 UTF-8, 失败时检测字符集 (GBK/Big5/ISO-8859-1 等)
pub fn decode_auto(bytes: &[u8]) -> Result<String, Error> {
    if let Ok(s) = std::str::from_utf8(bytes) {
        // 去掉 BOM
        return Ok(s.trim_start_matches('\u{feff}').to_string());
    }

    // detect charset of the file
    let result = detect(bytes);
    debug!("detected charset: {}, confidence: {}", result.0, result.1);

    if let Some(coder) = encoding_from_whatwg_label(charset2encoding(&result.0)) {
        let text = coder.decode(bytes, DecoderTrap::Ignore).map_err(|e| {
            error!("decode error, {e}");
            Error::Decode(e.to_string())
        })?;
        return Ok(text);
    }

    error!("file auto decode failed");
    Err(Error::Decode("file auto decode failed".to_string()))
}
