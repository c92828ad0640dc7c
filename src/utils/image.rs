//! 图片编码
//!
//! 将 HWC 像素数据编码为 PNG, 再转为 base64, 供语言模型后端使用

use std::io::Cursor;

use base64::{engine::general_purpose, Engine};
use image::{DynamicImage, GrayImage, ImageFormat, RgbImage, RgbaImage};

use crate::error::Error;

/// 由 HWC 像素数据创建图像
pub fn pixels_to_image(
    width: u32,
    height: u32,
    channels: u32,
    pixels: Vec<u8>,
) -> Result<DynamicImage, Error> {
    let image = match channels {
        1 => {
            let img = GrayImage::from_raw(width, height, pixels).ok_or(Error::ImageBuffer)?;
            DynamicImage::ImageLuma8(img)
        }
        3 => {
            let img = RgbImage::from_raw(width, height, pixels).ok_or(Error::ImageBuffer)?;
            DynamicImage::ImageRgb8(img)
        }
        4 => {
            let img = RgbaImage::from_raw(width, height, pixels).ok_or(Error::ImageBuffer)?;
            DynamicImage::ImageRgba8(img)
        }
        _ => return Err(Error::UnsupportedNumberOfChannels(channels)),
    };
    Ok(image)
}

/// 图像编码为 PNG 后转为 base64 (不带 data url 前缀)
pub fn image_to_png_base64(image: &DynamicImage) -> Result<String, Error> {
    // 使用Cursor包装Vec<u8>以满足Seek trait要求
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(general_purpose::STANDARD.encode(buffer.into_inner()))
}

pub fn pixels_to_png_base64(
    width: u32,
    height: u32,
    channels: u32,
    pixels: Vec<u8>,
) -> Result<String, Error> {
    let image = pixels_to_image(width, height, channels, pixels)?;
    image_to_png_base64(&image)
}

#[cfg(test)]
mod tests {
    use image::GenericImageView;

    use super::*;

    #[test]
    fn test_pixels_to_png_base64() -> anyhow::Result<()> {
        let pixels = vec![255u8, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255];
        let encoded = pixels_to_png_base64(2, 2, 3, pixels)?;

        let bytes = general_purpose::STANDARD.decode(encoded)?;
        let decoded = image::load_from_memory(&bytes)?;
        assert_eq!(decoded.dimensions(), (2, 2));
        assert_eq!(decoded.to_rgb8().get_pixel(0, 0).0, [255, 0, 0]);
        Ok(())
    }

    #[test]
    fn test_pixels_buffer_too_small() {
        let result = pixels_to_image(4, 4, 3, vec![0u8; 10]);
        assert!(matches!(result, Err(Error::ImageBuffer)));
    }

    #[test]
    fn test_unsupported_channels() {
        let result = pixels_to_image(1, 1, 2, vec![0u8; 2]);
        assert!(matches!(result, Err(Error::UnsupportedNumberOfChannels(2))));
    }
}
