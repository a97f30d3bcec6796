use crate::error::PictureCloudError;
use ddsfile::{AlphaMode, D3D10ResourceDimension, Dds, DxgiFormat, NewDxgiParams};
use half::f16;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub fn write_f32_texture(
    path: &Path,
    width: u32,
    height: u32,
    data: &[f32],
) -> Result<(), PictureCloudError> {
    let mut bytes = Vec::with_capacity(data.len() * 4);
    for &float_val in data {
        bytes.extend_from_slice(&float_val.to_le_bytes());
    }

    write_texture(path, width, height, DxgiFormat::R32G32B32A32_Float, bytes)
}

pub fn write_f16_texture(
    path: &Path,
    width: u32,
    height: u32,
    data: &[f16],
) -> Result<(), PictureCloudError> {
    let mut bytes = Vec::with_capacity(data.len() * 2);
    for &half_float in data {
        bytes.extend_from_slice(&half_float.to_bits().to_le_bytes());
    }

    write_texture(path, width, height, DxgiFormat::R16G16B16A16_Float, bytes)
}

fn write_texture(
    path: &Path,
    width: u32,
    height: u32,
    format: DxgiFormat,
    bytes: Vec<u8>,
) -> Result<(), PictureCloudError> {
    let params = NewDxgiParams {
        height,
        width,
        depth: None,
        format,
        mipmap_levels: Some(1),
        array_layers: Some(1),
        caps2: None,
        is_cubemap: false,
        resource_dimension: D3D10ResourceDimension::Texture2D,
        alpha_mode: AlphaMode::Unknown,
    };

    let mut dds = Dds::new_dxgi(params)?;
    dds.data = bytes;
    let mut writer = BufWriter::new(File::create(path)?);
    dds.write(&mut writer)?;
    writer.flush()?;
    Ok(())
}
