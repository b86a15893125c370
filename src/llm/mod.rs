pub mod gemini;
pub mod media;
