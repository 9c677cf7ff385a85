pub mod info;
pub mod stream_upload;
