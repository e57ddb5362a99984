use derive_more::{Display, From};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Display, From)]
pub enum Error {
    // -- Internals
    /// A drawing surface of the requested size could not be allocated
    #[display("unable to allocate a {width}x{height} drawing surface")]
    Surface { width: u32, height: u32 },

    // -- Externals
    #[from]
    #[display("{_0}")]
    Io(std::io::Error),
    #[from]
    #[display("{_0}")]
    Image(image::error::ImageError),
    #[from]
    #[display("{_0}")]
    Png(png::EncodingError),
}

impl std::error::Error for Error {}
