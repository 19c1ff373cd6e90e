//! APNG decoding into an in-memory [`AnimationSequence`].
//!
//! Frame control chunks map directly onto frame rectangles, durations,
//! disposal and blend modes. Pixel data is normalized to RGBA8.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use apngkit_common::error::{ApngkitError, ApngkitResult};
use apngkit_sequence_model::frame::{BlendOp, DisposeOp, Frame, Rect};
use apngkit_sequence_model::sequence::AnimationSequence;

/// Delay denominator assumed when a frame control chunk stores zero.
const DEFAULT_DELAY_DEN: u16 = 100;

/// Decode the APNG (or plain PNG) at `path`.
pub fn load_sequence(path: &Path) -> ApngkitResult<AnimationSequence> {
    if !path.exists() {
        return Err(ApngkitError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path)?;
    let sequence = decode_apng(BufReader::new(file))
        .map_err(|e| ApngkitError::decode(format!("{}: {e}", path.display())))?;
    tracing::debug!(
        path = %path.display(),
        frames = sequence.summary().frame_count,
        "Decoded animation"
    );
    Ok(sequence)
}

/// Decode an APNG stream. A PNG without animation control becomes a
/// single-frame sequence.
pub fn decode_apng<R: Read>(input: R) -> ApngkitResult<AnimationSequence> {
    let mut decoder = png::Decoder::new(input);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info().map_err(decode_error)?;

    let (width, height) = (reader.info().width, reader.info().height);
    let animation = reader.info().animation_control;
    // A frame control chunk ahead of the image data makes the default
    // image the first animation frame.
    let default_is_frame = reader.info().frame_control.is_some();

    let mut buf = vec![0; reader.output_buffer_size()];

    let Some(animation) = animation else {
        let output = reader.next_frame(&mut buf).map_err(decode_error)?;
        let pixels = to_rgba8(output.color_type, &buf[..output.buffer_size()])?;
        let frame = Frame::new(
            Rect::full(width, height),
            pixels,
            0.0,
            DisposeOp::None,
            BlendOp::Source,
        );
        return AnimationSequence::new(width, height, vec![frame]);
    };

    if !default_is_frame {
        tracing::debug!("Skipping default image outside the animation");
        reader.next_frame(&mut buf).map_err(decode_error)?;
    }

    let mut frames = Vec::with_capacity(animation.num_frames as usize);
    for index in 0..animation.num_frames {
        let output = reader.next_frame(&mut buf).map_err(decode_error)?;
        let control = reader.info().frame_control.ok_or_else(|| {
            ApngkitError::decode(format!("frame {index} has no frame control chunk"))
        })?;

        let mut dispose_op = map_dispose(control.dispose_op);
        if index == 0 && dispose_op == DisposeOp::Previous {
            // Nothing precedes the first frame to restore.
            dispose_op = DisposeOp::Background;
        }

        frames.push(Frame::new(
            Rect::new(
                control.x_offset,
                control.y_offset,
                control.width,
                control.height,
            ),
            to_rgba8(output.color_type, &buf[..output.buffer_size()])?,
            delay_ms(control.delay_num, control.delay_den),
            dispose_op,
            map_blend(control.blend_op),
        ));
    }

    AnimationSequence::new(width, height, frames)
}

fn decode_error(err: png::DecodingError) -> ApngkitError {
    ApngkitError::decode(err.to_string())
}

fn delay_ms(num: u16, den: u16) -> f64 {
    let den = if den == 0 { DEFAULT_DELAY_DEN } else { den };
    f64::from(num) * 1000.0 / f64::from(den)
}

fn map_dispose(op: png::DisposeOp) -> DisposeOp {
    match op {
        png::DisposeOp::None => DisposeOp::None,
        png::DisposeOp::Background => DisposeOp::Background,
        png::DisposeOp::Previous => DisposeOp::Previous,
    }
}

fn map_blend(op: png::BlendOp) -> BlendOp {
    match op {
        png::BlendOp::Source => BlendOp::Source,
        png::BlendOp::Over => BlendOp::Over,
    }
}

/// Widen 8-bit decoder output to RGBA8.
fn to_rgba8(color_type: png::ColorType, data: &[u8]) -> ApngkitResult<Vec<u8>> {
    let rgba = match color_type {
        png::ColorType::Rgba => data.to_vec(),
        png::ColorType::Rgb => data
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        png::ColorType::GrayscaleAlpha => data
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        png::ColorType::Grayscale => data.iter().flat_map(|&g| [g, g, g, 255]).collect(),
        png::ColorType::Indexed => {
            return Err(ApngkitError::decode("palette image was not expanded"));
        }
    };
    Ok(rgba)
}
