pub mod http_face_search;
pub mod png_frame_encoder;
