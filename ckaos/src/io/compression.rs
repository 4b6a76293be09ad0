#[cfg(feature = "compression")]
mod inner {
    use std::fmt::Display;
    use std::io::{
        Read,
        Write,
    };
    use std::path::Path;

    use serde::{
        Deserialize,
        Serialize,
    };

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
    pub enum Compression {
        #[default]
        None,
        Gz,
        Zstd,
        Xz2,
        Bzip2,
    }

    impl Compression {
        /// Guesses the compression from the file extension.
        pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
            match path
                .as_ref()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.to_ascii_lowercase())
                .as_deref()
            {
                Some("gz") | Some("gzip") => Compression::Gz,
                Some("zst") | Some("zstd") => Compression::Zstd,
                Some("xz") => Compression::Xz2,
                Some("bz2") => Compression::Bzip2,
                _ => Compression::None,
            }
        }

        pub fn name(&self) -> &str {
            match self {
                Compression::None => "none",
                Compression::Gz => "gzip",
                Compression::Zstd => "zstd",
                Compression::Xz2 => "xz2",
                Compression::Bzip2 => "bzip2",
            }
        }

        pub fn default_level(&self) -> u32 {
            match self {
                Compression::None => 0,
                Compression::Gz => 6,
                Compression::Zstd => 3,
                Compression::Xz2 => 6,
                Compression::Bzip2 => 6,
            }
        }

        pub fn get_decoder<R: Read + 'static>(
            &self,
            handle: R,
        ) -> anyhow::Result<Box<dyn Read>> {
            let decoder: Box<dyn Read> = match self {
                Compression::Gz => Box::new(flate2::read::MultiGzDecoder::new(handle)),
                Compression::Zstd => Box::new(zstd::Decoder::new(handle)?),
                Compression::Xz2 => Box::new(xz2::read::XzDecoder::new(handle)),
                Compression::Bzip2 => Box::new(bzip2::read::BzDecoder::new(handle)),
                Compression::None => Box::new(handle),
            };
            Ok(decoder)
        }

        /// Encoders finish their stream when dropped.
        pub fn get_encoder<W: Write + 'static>(
            &self,
            handle: W,
            compression_level: u32,
        ) -> anyhow::Result<Box<dyn Write>> {
            let encoder: Box<dyn Write> = match self {
                Compression::Gz => Box::new(flate2::write::GzEncoder::new(
                    handle,
                    flate2::Compression::new(compression_level),
                )),
                Compression::Zstd => Box::new(
                    zstd::Encoder::new(handle, compression_level as i32)?.auto_finish(),
                ),
                Compression::Xz2 => Box::new(xz2::write::XzEncoder::new(
                    handle,
                    compression_level,
                )),
                Compression::Bzip2 => Box::new(bzip2::write::BzEncoder::new(
                    handle,
                    bzip2::Compression::new(compression_level),
                )),
                Compression::None => Box::new(handle),
            };
            Ok(encoder)
        }
    }

    impl Display for Compression {
        fn fmt(
            &self,
            f: &mut std::fmt::Formatter<'_>,
        ) -> std::fmt::Result {
            write!(f, "{}", self.name())
        }
    }

}

#[cfg(feature = "compression")]
pub use inner::*;
