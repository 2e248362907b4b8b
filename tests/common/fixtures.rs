//! Test fixtures: small encoded images built in memory.

use std::io::Cursor;

/// Encode an 8-bit PNG with the given color type and raw rows
pub fn png_bytes(
    width: u32,
    height: u32,
    color: png::ColorType,
    data: &[u8],
    palette: Option<(&[u8], Option<&[u8]>)>,
) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(color);
        encoder.set_depth(png::BitDepth::Eight);
        if let Some((plte, trns)) = palette {
            encoder.set_palette(plte.to_vec());
            if let Some(trns) = trns {
                encoder.set_trns(trns.to_vec());
            }
        }
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(data).unwrap();
        writer.finish().unwrap();
    }
    buf.into_inner()
}

/// Fully transparent RGBA PNG (color channels black)
pub fn transparent_rgba_png(width: u32, height: u32) -> Vec<u8> {
    let data = vec![0u8; (width * height * 4) as usize];
    png_bytes(width, height, png::ColorType::Rgba, &data, None)
}

/// RGBA PNG whose left half is opaque red and right half fully transparent
pub fn half_transparent_png(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..height {
        for x in 0..width {
            if x < width / 2 {
                data.extend_from_slice(&[255, 0, 0, 255]);
            } else {
                data.extend_from_slice(&[0, 0, 0, 0]);
            }
        }
    }
    png_bytes(width, height, png::ColorType::Rgba, &data, None)
}

/// Opaque RGB gradient PNG
pub fn rgb_png(width: u32, height: u32) -> Vec<u8> {
    png_bytes(width, height, png::ColorType::Rgb, &gradient(width, height), None)
}

/// 8-bit grayscale PNG
pub fn gray_png(width: u32, height: u32) -> Vec<u8> {
    let data: Vec<u8> = (0..width * height).map(|i| (i * 7 % 256) as u8).collect();
    png_bytes(width, height, png::ColorType::Grayscale, &data, None)
}

/// Gray + alpha PNG, every pixel mid gray at half opacity
pub fn gray_alpha_png(width: u32, height: u32) -> Vec<u8> {
    let data: Vec<u8> = (0..width * height).flat_map(|_| [100, 128]).collect();
    png_bytes(width, height, png::ColorType::GrayscaleAlpha, &data, None)
}

/// Four-color palette PNG; with `transparent_first`, entry 0 has alpha 0
pub fn indexed_png(width: u32, height: u32, transparent_first: bool) -> Vec<u8> {
    let plte = [0, 0, 0, 255, 0, 0, 0, 255, 0, 0, 0, 255];
    let trns = [0u8];
    let indices: Vec<u8> = (0..width * height).map(|i| (i % 4) as u8).collect();
    png_bytes(
        width,
        height,
        png::ColorType::Indexed,
        &indices,
        Some((&plte[..], transparent_first.then_some(&trns[..]))),
    )
}

/// Baseline RGB JPEG of a gradient
pub fn rgb_jpeg(width: u16, height: u16) -> Vec<u8> {
    let mut out = Vec::new();
    let encoder = jpeg_encoder::Encoder::new(&mut out, 90);
    encoder
        .encode(
            &gradient(width as u32, height as u32),
            width,
            height,
            jpeg_encoder::ColorType::Rgb,
        )
        .unwrap();
    out
}

/// Grayscale JPEG
pub fn gray_jpeg(width: u16, height: u16) -> Vec<u8> {
    let data: Vec<u8> = (0..width as u32 * height as u32).map(|i| (i % 256) as u8).collect();
    let mut out = Vec::new();
    let encoder = jpeg_encoder::Encoder::new(&mut out, 90);
    encoder
        .encode(&data, width, height, jpeg_encoder::ColorType::Luma)
        .unwrap();
    out
}

fn gradient(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&[
                (x * 255 / width.max(1)) as u8,
                (y * 255 / height.max(1)) as u8,
                128,
            ]);
        }
    }
    data
}
