pub mod png_io;

pub use png_io::{decode_image, decode_png, encode_png, read_image, write_png, ImageFormat};
