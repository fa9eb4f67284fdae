//! Minimal single-page PDF wrapper around a JPEG stream.
//!
//! The page's MediaBox is the image's pixel size (1px = 1pt) and the page
//! content paints one image XObject, `/Im1`, scaled to fill it. The JPEG bytes
//! are embedded as-is under `/DCTDecode`.
//!
//! ```text
//! 1 0 obj  Catalog
//! 2 0 obj  Pages (1 kid)
//! 3 0 obj  Page, MediaBox [0 0 W H], XObject /Im1
//! 4 0 obj  content stream: q W 0 0 H 0 0 cm /Im1 Do Q
//! 5 0 obj  Image XObject, DeviceRGB, 8 bpc, DCTDecode
//! ```
//!
//! Every `/Length` is the real byte length of its stream, and the xref table
//! carries the real byte offset of each object. This is not a general PDF
//! writer: no metadata, no compression of the content stream, no validation.

/// Number of objects in the document, excluding the free object 0.
const OBJECT_COUNT: usize = 5;

/// Wrap an encoded JPEG in a one-page PDF sized `width` x `height` points.
pub fn wrap_jpeg(jpeg: &[u8], width: u32, height: u32) -> Vec<u8> {
    let content = format!("q\n{width} 0 0 {height} 0 0 cm\n/Im1 Do\nQ\n");

    let mut out: Vec<u8> = Vec::with_capacity(jpeg.len() + 1024);
    let mut offsets = [0usize; OBJECT_COUNT];

    // Binary comment marks the file as binary for transfer tools
    out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

    offsets[0] = out.len();
    out.extend_from_slice(b"1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");

    offsets[1] = out.len();
    out.extend_from_slice(b"2 0 obj\n<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n");

    offsets[2] = out.len();
    out.extend_from_slice(
        format!(
            "3 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {width} {height}] \
             /Contents 4 0 R /Resources << /XObject << /Im1 5 0 R >> >> >>\nendobj\n"
        )
        .as_bytes(),
    );

    offsets[3] = out.len();
    out.extend_from_slice(
        format!(
            "4 0 obj\n<< /Length {} >>\nstream\n{content}endstream\nendobj\n",
            content.len()
        )
        .as_bytes(),
    );

    offsets[4] = out.len();
    out.extend_from_slice(
        format!(
            "5 0 obj\n<< /Type /XObject /Subtype /Image /Width {width} /Height {height} \
             /ColorSpace /DeviceRGB /BitsPerComponent 8 /Filter /DCTDecode /Length {} >>\nstream\n",
            jpeg.len()
        )
        .as_bytes(),
    );
    out.extend_from_slice(jpeg);
    out.extend_from_slice(b"\nendstream\nendobj\n");

    let xref_offset = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", OBJECT_COUNT + 1);
    for offset in offsets {
        xref.push_str(&format!("{offset:010} 00000 n \n"));
    }
    out.extend_from_slice(xref.as_bytes());
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            OBJECT_COUNT + 1
        )
        .as_bytes(),
    );

    out
}
