//! 图片张量

use log::debug;
use pyo3::{types::PyAnyMethods, Bound, PyAny};

use crate::{error::Error, utils::image::pixels_to_png_base64};

/// 图片张量转换为 base64 编码的 PNG
///
/// images: [batch, height, width, channels], 取值范围 0~1
pub fn image_tensor_to_png_base64(images: &Bound<'_, PyAny>) -> Result<Vec<String>, Error> {
    let shape = images.getattr("shape")?.extract::<Vec<usize>>()?;
    if shape.len() != 4 {
        return Err(Error::InvalidTensorShape(format!(
            "Expected [batch, height, width, channels] tensor, images shape: {shape:?}"
        )));
    }
    let (batch, height, width, channels) = (shape[0], shape[1], shape[2], shape[3]);
    debug!("image tensor shape: {shape:?}");

    let mut encoded = Vec::with_capacity(batch);
    for i in 0..batch {
        let pixels = images
            .call_method1("select", (0, i))?
            .call_method0("cpu")?
            .call_method1("clamp", (0.0, 1.0))?
            .call_method0("numpy")?
            .call_method1("__mul__", (255,))?
            .call_method1("astype", ("uint8",))?
            .call_method0("tobytes")?
            .extract::<Vec<u8>>()?;

        encoded.push(pixels_to_png_base64(
            width as u32,
            height as u32,
            channels as u32,
            pixels,
        )?);
    }
    Ok(encoded)
}
