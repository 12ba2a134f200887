use rand::RngExt;

/// Generate a random 64-bit identifier as raw bytes
pub fn generate_id_bytes() -> [u8; 8] {
    let mut bytes = [0u8; 8];
    let mut rng = rand::rng();
    rng.fill(&mut bytes);
    bytes
}

/// Generate a random image identifier as 16 lowercase hex characters
pub fn generate_image_id() -> String {
    format_id(&generate_id_bytes())
}

/// Format raw identifier bytes as lowercase hex
pub fn format_id(bytes: &[u8]) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        // Writing into a String cannot fail
        let _ = write!(out, "{b:02x}");
    }
    out
}
