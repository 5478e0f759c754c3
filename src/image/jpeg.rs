use std::{
    env::{self, VarError},
    panic::catch_unwind,
    process,
    sync::OnceLock,
};

use image::ImageBuffer;

use super::Image;

/// Because computers, we support more than one JPEG decoding backend.
#[derive(Debug)]
enum JpegBackend {
    /// Uses the `mozjpeg` crate, a wrapper around Mozilla's libjpeg fork. Robust and fast-ish, but
    /// C.
    MozJpeg,
    /// Uses the `jpeg-decoder` crate (through `image`), a robust but slow pure-Rust JPEG decoder.
    JpegDecoder,
}

const DEFAULT_BACKEND: JpegBackend = JpegBackend::MozJpeg;

fn jpeg_backend() -> &'static JpegBackend {
    static BACKEND: OnceLock<JpegBackend> = OnceLock::new();
    BACKEND.get_or_init(|| {
        let backend = match env::var("AIRCANVAS_JPEG_BACKEND") {
            Ok(v) if v == "mozjpeg" => JpegBackend::MozJpeg,
            Ok(v) if v == "jpeg-decoder" => JpegBackend::JpegDecoder,
            Ok(v) => {
                eprintln!("invalid value set for `AIRCANVAS_JPEG_BACKEND` variable: '{v}'; exiting");
                process::exit(1);
            }
            Err(VarError::NotPresent) => DEFAULT_BACKEND,
            Err(VarError::NotUnicode(s)) => {
                eprintln!(
                    "invalid value set for `AIRCANVAS_JPEG_BACKEND` variable: {}; exiting",
                    s.to_string_lossy()
                );
                process::exit(1);
            }
        };
        log::debug!("using JPEG decode backend: {:?}", backend);
        backend
    })
}

pub(super) fn decode_jpeg(data: &[u8]) -> anyhow::Result<Image> {
    let buf = match jpeg_backend() {
        JpegBackend::MozJpeg => {
            // mozjpeg crate unfortunately reports errors only via unwinding
            let (buf, width, height) = catch_unwind(|| -> anyhow::Result<_> {
                let mut decompress = mozjpeg::Decompress::new_mem(data)?;

                // Tune settings for decode performance.
                decompress.do_fancy_upsampling(false);
                decompress.dct_method(mozjpeg::DctMethod::IntegerFast);

                let mut decompress = decompress.rgba()?;
                let buf = decompress
                    .read_scanlines_flat()
                    .ok_or_else(|| anyhow::anyhow!("failed to decode image"))?;
                Ok((buf, decompress.width(), decompress.height()))
            })
            .map_err(|payload| match payload.downcast::<String>() {
                Ok(string) => anyhow::Error::msg(string),
                Err(_) => anyhow::anyhow!("<unknown panic message>"),
            })??;

            ImageBuffer::from_raw(width.try_into().unwrap(), height.try_into().unwrap(), buf)
                .expect("failed to create ImageBuffer")
        }
        JpegBackend::JpegDecoder => {
            image::load_from_memory_with_format(data, image::ImageFormat::Jpeg)?.to_rgba8()
        }
    };

    Ok(Image { buf })
}
