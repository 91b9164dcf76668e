// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for the PaddleOCR models

use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use ndarray::Array4;

use super::detection::TextBox;

/// Square input size of the detection model
pub const OCR_INPUT_SIZE: u32 = 640;

/// Recognition model input height (PP-OCRv5 English model uses 48)
pub const REC_INPUT_HEIGHT: u32 = 48;

/// Maximum width for recognition model input
pub const REC_MAX_WIDTH: u32 = 320;

/// Mean values for normalization (ImageNet)
pub const MEAN: [f32; 3] = [0.485, 0.456, 0.406];

/// Std values for normalization (ImageNet)
pub const STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Gray used to letterbox images into the square detection input
const PAD_GRAY: Rgb<u8> = Rgb([128, 128, 128]);

/// Detection tensor plus the geometry needed to map boxes back
pub struct DetectionInput {
    /// NCHW tensor of shape [1, 3, 640, 640]
    pub tensor: Array4<f32>,
    /// Scale and padding applied to the source image
    pub info: PreprocessInfo,
}

/// Letterbox a label photo into the detection model's square input
pub fn prepare_detection_input(image: &DynamicImage) -> DetectionInput {
    DetectionInput {
        tensor: preprocess_for_detection(image),
        info: PreprocessInfo::new(image, OCR_INPUT_SIZE),
    }
}

/// Preprocess an image for text detection
///
/// Resized with aspect ratio preserved, padded to 640x640 with gray and
/// normalized with ImageNet mean/std into an NCHW tensor.
pub fn preprocess_for_detection(image: &DynamicImage) -> Array4<f32> {
    let padded = resize_with_padding(image, OCR_INPUT_SIZE).to_rgb8();
    to_normalized_tensor(&padded)
}

/// Preprocess a cropped text line for recognition
///
/// Height is fixed at 48; width follows the aspect ratio, clamped to
/// `[4, REC_MAX_WIDTH]`. PP-OCRv5 takes dynamic width so no padding.
pub fn preprocess_for_recognition(image: &DynamicImage) -> Array4<f32> {
    let (orig_w, orig_h) = image.dimensions();

    let scale = REC_INPUT_HEIGHT as f32 / orig_h.max(1) as f32;
    let new_width = ((orig_w as f32 * scale).round() as u32).clamp(4, REC_MAX_WIDTH);

    let resized = image
        .resize_exact(
            new_width,
            REC_INPUT_HEIGHT,
            image::imageops::FilterType::Lanczos3,
        )
        .to_rgb8();

    to_normalized_tensor(&resized)
}

fn to_normalized_tensor(rgb: &RgbImage) -> Array4<f32> {
    let (width, height) = rgb.dimensions();
    let mut tensor = Array4::zeros((1, 3, height as usize, width as usize));

    for (x, y, pixel) in rgb.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] =
                (pixel[c] as f32 / 255.0 - MEAN[c]) / STD[c];
        }
    }

    tensor
}

/// Resize image with aspect ratio preservation and centered gray padding
pub fn resize_with_padding(image: &DynamicImage, target_size: u32) -> DynamicImage {
    let (orig_w, orig_h) = image.dimensions();

    if orig_w == 0 || orig_h == 0 {
        return DynamicImage::ImageRgb8(RgbImage::from_pixel(target_size, target_size, PAD_GRAY));
    }

    let info = PreprocessInfo::new(image, target_size);
    let new_w = ((orig_w as f32 * info.scale).round() as u32).max(1);
    let new_h = ((orig_h as f32 * info.scale).round() as u32).max(1);

    let resized = image
        .resize_exact(new_w, new_h, image::imageops::FilterType::Lanczos3)
        .to_rgb8();

    let mut output = RgbImage::from_pixel(target_size, target_size, PAD_GRAY);
    image::imageops::overlay(
        &mut output,
        &resized,
        info.offset_x as i64,
        info.offset_y as i64,
    );

    DynamicImage::ImageRgb8(output)
}

/// Scale and offsets used during letterboxing
pub struct PreprocessInfo {
    /// Scale factor applied
    pub scale: f32,
    /// X offset from padding
    pub offset_x: u32,
    /// Y offset from padding
    pub offset_y: u32,
    /// Original image width
    pub original_width: u32,
    /// Original image height
    pub original_height: u32,
}

impl PreprocessInfo {
    pub fn new(image: &DynamicImage, target_size: u32) -> Self {
        let (orig_w, orig_h) = image.dimensions();

        if orig_w == 0 || orig_h == 0 {
            return Self {
                scale: 1.0,
                offset_x: 0,
                offset_y: 0,
                original_width: orig_w,
                original_height: orig_h,
            };
        }

        let scale = (target_size as f32 / orig_w as f32).min(target_size as f32 / orig_h as f32);
        let new_w = ((orig_w as f32 * scale).round() as u32).min(target_size);
        let new_h = ((orig_h as f32 * scale).round() as u32).min(target_size);

        Self {
            scale,
            offset_x: (target_size - new_w) / 2,
            offset_y: (target_size - new_h) / 2,
            original_width: orig_w,
            original_height: orig_h,
        }
    }

    /// Map a coordinate from detection space back to original image space
    pub fn map_to_original(&self, x: f32, y: f32) -> (f32, f32) {
        let orig_x = (x - self.offset_x as f32) / self.scale;
        let orig_y = (y - self.offset_y as f32) / self.scale;
        (orig_x, orig_y)
    }
}

/// Cut a detected text box out of the original image
///
/// Returns `None` when the box falls entirely in the padding or collapses
/// to less than a pixel after mapping.
pub fn crop_text_region(
    image: &DynamicImage,
    text_box: &TextBox,
    info: &PreprocessInfo,
) -> Option<DynamicImage> {
    let (x0, y0) = info.map_to_original(text_box.x, text_box.y);
    let (x1, y1) = info.map_to_original(text_box.x + text_box.width, text_box.y + text_box.height);

    let max_w = info.original_width as f32;
    let max_h = info.original_height as f32;
    let x0 = x0.clamp(0.0, max_w).floor() as u32;
    let y0 = y0.clamp(0.0, max_h).floor() as u32;
    let x1 = x1.clamp(0.0, max_w).ceil() as u32;
    let y1 = y1.clamp(0.0, max_h).ceil() as u32;

    if x1 <= x0 || y1 <= y0 {
        return None;
    }

    Some(image.crop_imm(x0, y0, x1 - x0, y1 - y0))
}
