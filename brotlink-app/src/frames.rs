//! Decoding of the `data:` URIs the backend sends frames and charts as.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum FrameError {
    #[error("not a base64 data URI")]
    NotDataUri,

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("payload is not a readable image: {0}")]
    Image(#[from] image::ImageError),
}

/// A decoded image payload, still in its encoded (PNG) form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Frame {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Decode `data:<mime>;base64,<payload>` and check the payload is an image.
///
/// A bare base64 string without the `data:` header is accepted too.
pub(crate) fn decode_data_uri(uri: &str) -> Result<Frame, FrameError> {
    let payload = match uri.strip_prefix("data:") {
        Some(rest) => {
            let (header, payload) = rest.split_once(',').ok_or(FrameError::NotDataUri)?;
            if !header.ends_with(";base64") {
                return Err(FrameError::NotDataUri);
            }
            payload
        }
        None => uri,
    };
    let bytes = BASE64.decode(payload.trim())?;
    let img = image::load_from_memory(&bytes)?;
    Ok(Frame {
        width: img.width(),
        height: img.height(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_png() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(3, 2, image::Rgb([0, 0, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn decodes_png_data_uri() {
        let png = tiny_png();
        let uri = format!("data:image/png;base64,{}", BASE64.encode(&png));
        let frame = decode_data_uri(&uri).unwrap();
        assert_eq!((frame.width, frame.height), (3, 2));
        assert_eq!(frame.bytes, png);
    }

    #[test]
    fn accepts_bare_base64() {
        let frame = decode_data_uri(&BASE64.encode(tiny_png())).unwrap();
        assert_eq!(frame.width, 3);
    }

    #[test]
    fn rejects_non_base64_uri() {
        assert!(matches!(
            decode_data_uri("data:text/plain,hello"),
            Err(FrameError::NotDataUri)
        ));
        assert!(matches!(
            decode_data_uri("data:image/png;base64"),
            Err(FrameError::NotDataUri)
        ));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            decode_data_uri("data:image/png;base64,!!!"),
            Err(FrameError::Base64(_))
        ));
        let not_an_image = BASE64.encode(b"hello world");
        assert!(matches!(
            decode_data_uri(&not_an_image),
            Err(FrameError::Image(_))
        ));
    }
}
