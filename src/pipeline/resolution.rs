//! Resolution metadata: recover the DPI pair from the image container.
//!
//! Decoders hand back pixels, not print density — the DPI the validator
//! compares against (300, 300) lives in container headers: the JFIF APP0
//! density fields for JPEG, the `pHYs` chunk for PNG. Both are tiny
//! fixed-layout records, so they are read directly from the byte stream
//! without decoding the image.
//!
//! Absence is meaningful: an upload without density metadata does not
//! satisfy "resolution = 300 DPI" and must draw the advisory warning, so
//! the reader returns `Option` rather than defaulting.

const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];
const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Read the declared resolution of a JPEG or PNG as a DPI pair.
///
/// Returns `None` when the container carries no density information, the
/// density is in an aspect-ratio-only form (JFIF unit 0, `pHYs` unit 0),
/// or the bytes are neither JPEG nor PNG.
pub fn read_dpi(bytes: &[u8]) -> Option<(u32, u32)> {
    if bytes.starts_with(&JPEG_SOI) {
        jpeg_dpi(bytes)
    } else if bytes.starts_with(&PNG_SIGNATURE) {
        png_dpi(bytes)
    } else {
        None
    }
}

/// Walk JPEG segments up to SOS looking for a JFIF APP0 density record.
///
/// APP0 layout after the 2-byte length: identifier "JFIF\0", version (2),
/// unit (1), Xdensity (2, BE), Ydensity (2, BE). Unit 1 is dots per inch,
/// unit 2 dots per centimetre.
fn jpeg_dpi(bytes: &[u8]) -> Option<(u32, u32)> {
    let mut i = 2;
    while i + 4 <= bytes.len() {
        if bytes[i] != 0xFF {
            return None; // corrupt marker stream
        }
        let marker = bytes[i + 1];
        if marker == 0xFF {
            i += 1; // fill byte
            continue;
        }
        // SOS: entropy-coded data follows, no APP0 can appear past here.
        if marker == 0xDA || marker == 0xD9 {
            return None;
        }
        let len = u16::from_be_bytes([bytes[i + 2], bytes[i + 3]]) as usize;
        if len < 2 || i + 2 + len > bytes.len() {
            return None;
        }
        let data = &bytes[i + 4..i + 2 + len];
        if marker == 0xE0 && data.len() >= 12 && &data[..5] == b"JFIF\0" {
            let unit = data[7];
            let x = u16::from_be_bytes([data[8], data[9]]) as u32;
            let y = u16::from_be_bytes([data[10], data[11]]) as u32;
            return match unit {
                1 => Some((x, y)),
                2 => Some((cm_to_inch(x), cm_to_inch(y))),
                _ => None,
            };
        }
        i += 2 + len;
    }
    None
}

/// Walk PNG chunks up to IDAT looking for a `pHYs` record.
///
/// `pHYs` data: X pixels-per-unit (4, BE), Y pixels-per-unit (4, BE),
/// unit (1; 1 = metre). 11811 px/m rounds to 300 DPI.
fn png_dpi(bytes: &[u8]) -> Option<(u32, u32)> {
    let mut i = PNG_SIGNATURE.len();
    while i + 8 <= bytes.len() {
        let len = u32::from_be_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]) as usize;
        let chunk_type = &bytes[i + 4..i + 8];
        let data_start = i + 8;
        if data_start + len > bytes.len() {
            return None;
        }
        match chunk_type {
            b"pHYs" if len == 9 => {
                let data = &bytes[data_start..data_start + 9];
                let x = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
                let y = u32::from_be_bytes([data[4], data[5], data[6], data[7]]);
                return match data[8] {
                    1 => Some((metre_to_inch(x), metre_to_inch(y))),
                    _ => None, // unit 0: aspect ratio only
                };
            }
            b"IDAT" | b"IEND" => return None,
            _ => {}
        }
        // length + type + data + CRC
        i = data_start + len + 4;
    }
    None
}

fn cm_to_inch(d: u32) -> u32 {
    (d as f64 * 2.54).round() as u32
}

fn metre_to_inch(d: u32) -> u32 {
    (d as f64 * 0.0254).round() as u32
}
