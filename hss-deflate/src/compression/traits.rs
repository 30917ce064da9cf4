//! 压缩接口定义
//!
//! 定义了容器载荷压缩算法需要实现的标准接口

use crate::error::{HssDeflateError, Result};
use crate::image_types::CompressionVersion;

/// 压缩接口trait
/// 每种算法对应容器头中的一个 `version` 值
pub trait CompressionInterface {
    /// 压缩数据
    ///
    /// # 参数
    /// - `data`: 要压缩的原始数据
    ///
    /// # 返回
    /// 压缩后的数据
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// 解压缩数据（主要用于验证）
    ///
    /// # 参数
    /// - `compressed_data`: 已压缩的数据
    ///
    /// # 返回
    /// 解压缩后的原始数据
    fn decompress(&self, compressed_data: &[u8]) -> Result<Vec<u8>>;

    /// 写入容器头的版本号
    fn version(&self) -> CompressionVersion;

    /// 获取压缩算法名称
    fn get_name(&self) -> &'static str;
}

/// 创建压缩器的工厂函数
pub fn create_compressor(
    version: CompressionVersion,
    level: u32,
) -> Result<Box<dyn CompressionInterface>> {
    match version {
        CompressionVersion::Deflate => Ok(Box::new(
            crate::compression::deflate::DeflateCompressor::new(level)?,
        )),
        CompressionVersion::FastLz => Err(HssDeflateError::UnsupportedVersion {
            version: version.into(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_deflate() {
        let compressor = create_compressor(CompressionVersion::Deflate, 9).unwrap();
        assert_eq!(compressor.version(), CompressionVersion::Deflate);
        assert_eq!(compressor.get_name(), "deflate");
    }

    #[test]
    fn test_factory_rejects_fastlz() {
        let result = create_compressor(CompressionVersion::FastLz, 9);
        assert!(matches!(
            result,
            Err(HssDeflateError::UnsupportedVersion { version: 1 })
        ));
    }
}
