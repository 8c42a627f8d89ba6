// src/common/qr.rs

use image::{DynamicImage, ImageOutputFormat, Luma};
use qrcode::QrCode;
use uuid::Uuid;

use crate::common::error::AppError;

/// Prefixo impresso nos cartões das famílias.
pub const FAMILY_QR_PREFIX: &str = "smart-masjeedh:family:";

pub fn encode_family(family_id: Uuid) -> String {
    format!("{}{}", FAMILY_QR_PREFIX, family_id)
}

/// Extrai o ID da família de um payload lido pela câmera.
/// Convenção: "smart-masjeedh:family:<id>", o ID é o terceiro segmento separado por ':'.
pub fn decode_family(payload: &str) -> Result<Uuid, AppError> {
    let payload = payload.trim();
    if !payload.starts_with(FAMILY_QR_PREFIX) {
        return Err(AppError::InvalidQrPayload(payload.to_string()));
    }

    let raw_id = payload
        .split(':')
        .nth(2)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::InvalidQrPayload(payload.to_string()))?;

    Uuid::parse_str(raw_id).map_err(|_| AppError::InvalidQrPayload(payload.to_string()))
}

pub fn render_image(payload: &str) -> Result<DynamicImage, AppError> {
    let code = QrCode::new(payload.as_bytes())
        .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

    let image_buffer = code.render::<Luma<u8>>().min_dimensions(256, 256).build();
    Ok(DynamicImage::ImageLuma8(image_buffer))
}

pub fn render_png(payload: &str) -> Result<Vec<u8>, AppError> {
    let image = render_image(payload)?;
    let mut buffer = Vec::new();
    image
        .write_to(&mut buffer, ImageOutputFormat::Png)
        .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_round_trips_to_the_same_id() {
        let id = Uuid::new_v4();
        let payload = encode_family(id);
        assert_eq!(payload, format!("smart-masjeedh:family:{}", id));
        assert_eq!(decode_family(&payload).unwrap(), id);
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        let id = Uuid::new_v4();
        let payload = format!("  {}\n", encode_family(id));
        assert_eq!(decode_family(&payload).unwrap(), id);
    }

    #[test]
    fn rejects_foreign_payloads() {
        assert!(matches!(
            decode_family("https://example.com/family/1"),
            Err(AppError::InvalidQrPayload(_))
        ));
        assert!(matches!(
            decode_family("smart-masjeedh:event:6f1c2f1e-9f59-4ac9-9d43-3f4c0c7f2a10"),
            Err(AppError::InvalidQrPayload(_))
        ));
    }

    #[test]
    fn rejects_missing_or_malformed_id() {
        assert!(decode_family("smart-masjeedh:family:").is_err());
        assert!(decode_family("smart-masjeedh:family:FAM-001").is_err());
    }

    #[test]
    fn renders_a_png() {
        let png = render_png(&encode_family(Uuid::new_v4())).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }
}
