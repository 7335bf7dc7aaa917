// Host-side tests for image decoding.

#![allow(dead_code)]
mod decode {
    include!("../src/decode.rs");
}

use std::io::Cursor;

use decode::*;

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x * 16) as u8, (y * 16) as u8, 128, 255])
    });
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

#[test]
fn fit_within_keeps_small_images() {
    assert_eq!(fit_within(640, 480, 8192), (640, 480));
    assert_eq!(fit_within(8192, 8192, 8192), (8192, 8192));
}

#[test]
fn fit_within_scales_longest_side() {
    assert_eq!(fit_within(16384, 8192, 8192), (8192, 4096));
    assert_eq!(fit_within(1000, 4000, 1000), (250, 1000));
}

#[test]
fn decodes_png_to_rgba() {
    let img = decode_image(&png(8, 4), 8192).unwrap();
    assert_eq!((img.width, img.height), (8, 4));
    assert_eq!(img.rgba.len(), 8 * 4 * 4);
    // pixel (1, 2)
    let i = (2 * 8 + 1) * 4;
    assert_eq!(&img.rgba[i..i + 4], &[16, 32, 128, 255]);
}

#[test]
fn oversized_images_are_downscaled() {
    let img = decode_image(&png(16, 8), 4).unwrap();
    assert_eq!((img.width, img.height), (4, 2));
    assert_eq!(img.rgba.len(), 4 * 2 * 4);
}

#[test]
fn garbage_bytes_are_an_error() {
    assert!(decode_image(b"definitely not an image", 8192).is_err());
}
