//! Module slots: decoding, owned images and building

use bytes::BufMut;

use super::cursor::Cursor;
use super::errors::PayloadError;
use super::record::TscStats;
use super::MODULE_HEADER_SIZE;
use std::fs;
use std::path::Path;

/// A performance module borrowed out of a slot: its descriptor and the
/// payload that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerfModule<'a> {
    pub descriptor: &'a str,
    pub payload: &'a [u8],
}

impl<'a> PerfModule<'a> {
    pub fn new(descriptor: &'a str, payload: &'a [u8]) -> Self {
        PerfModule {
            descriptor,
            payload,
        }
    }

    /// Decode the module slot at the start of `bytes`.
    ///
    /// Returns the module and the slot width in bytes. Bytes past the slot
    /// are left alone.
    pub fn decode(bytes: &'a [u8]) -> Result<(Self, usize), PayloadError> {
        let mut cursor = Cursor::new(bytes);
        let descriptor_len = cursor.read_u32("module header")? as usize;
        let payload_len = cursor.read_u32("module header")? as usize;

        let raw = cursor.take("module descriptor", descriptor_len)?;
        let descriptor = std::str::from_utf8(raw).map_err(|e| PayloadError::InvalidDescriptor {
            valid_up_to: e.valid_up_to(),
        })?;
        let payload = cursor.take("module payload", payload_len)?;

        Ok((PerfModule::new(descriptor, payload), cursor.offset()))
    }

    /// Width of the slot this module occupies when encoded.
    pub fn slot_width(&self) -> usize {
        MODULE_HEADER_SIZE + self.descriptor.len() + self.payload.len()
    }
}

/// An owned module image, typically loaded from a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleImage {
    bytes: Vec<u8>,
}

impl ModuleImage {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        ModuleImage { bytes }
    }

    /// Read an image from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PayloadError> {
        Ok(ModuleImage::from_bytes(fs::read(path)?))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Borrow the top-level module.
    pub fn module(&self) -> Result<PerfModule<'_>, PayloadError> {
        let (module, width) = PerfModule::decode(&self.bytes)?;
        if width < self.bytes.len() {
            tracing::warn!(
                "ignoring {} trailing bytes after module slot",
                self.bytes.len() - width
            );
        }
        Ok(module)
    }
}

/// Encodes module slots.
///
/// The builder writes records in the order they are added and does not check
/// them against the descriptor, so it can also produce deliberately broken
/// images.
///
/// ```
/// use perfmon::payload::{ModuleBuilder, TscStats};
///
/// let inner = ModuleBuilder::new("TSC y[1];").counter(TscStats::default());
/// let image = ModuleBuilder::new("MODULE * inner; TSC x[1];")
///     .module(inner)
///     .counter(TscStats::default())
///     .build();
/// assert_eq!(image.len(), 8 + 25 + (8 + 9 + 80) + 80);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModuleBuilder {
    descriptor: String,
    payload: Vec<u8>,
}

impl ModuleBuilder {
    pub fn new(descriptor: impl Into<String>) -> Self {
        ModuleBuilder {
            descriptor: descriptor.into(),
            payload: Vec::new(),
        }
    }

    /// Append one timestamp counter record.
    pub fn counter(mut self, stats: TscStats) -> Self {
        stats.put(&mut self.payload);
        self
    }

    /// Append several records in order.
    pub fn counters(self, stats: impl IntoIterator<Item = TscStats>) -> Self {
        stats.into_iter().fold(self, ModuleBuilder::counter)
    }

    /// Append a nested module slot.
    pub fn module(mut self, nested: ModuleBuilder) -> Self {
        self.payload.put_slice(&nested.build());
        self
    }

    /// Encode the slot. Header lengths saturate at `u32::MAX`, so descriptors
    /// and payloads past 4 GiB do not decode.
    pub fn build(&self) -> Vec<u8> {
        let descriptor_len = u32::try_from(self.descriptor.len()).unwrap_or(u32::MAX);
        let payload_len = u32::try_from(self.payload.len()).unwrap_or(u32::MAX);

        let mut out = Vec::with_capacity(
            MODULE_HEADER_SIZE + self.descriptor.len() + self.payload.len(),
        );
        out.put_u32_le(descriptor_len);
        out.put_u32_le(payload_len);
        out.put_slice(self.descriptor.as_bytes());
        out.put_slice(&self.payload);
        out
    }

    /// Encode into an owned image.
    pub fn image(&self) -> ModuleImage {
        ModuleImage::from_bytes(self.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::TSC_RECORD_SIZE;
    use bytes::Buf;

    #[test]
    fn test_decode_round_trip() {
        let bytes = ModuleBuilder::new("TSC a[1];")
            .counter(TscStats::default())
            .build();
        let (module, width) = PerfModule::decode(&bytes).unwrap();
        assert_eq!(module.descriptor, "TSC a[1];");
        assert_eq!(module.payload.len(), TSC_RECORD_SIZE);
        assert_eq!(width, bytes.len());
        assert_eq!(module.slot_width(), width);
    }

    #[test]
    fn test_build_header_layout() {
        let bytes = ModuleBuilder::new("TSC a[1];")
            .counter(TscStats::default())
            .build();
        let mut header = &bytes[..MODULE_HEADER_SIZE];
        assert_eq!(header.get_u32_le(), 9);
        assert_eq!(header.get_u32_le(), TSC_RECORD_SIZE as u32);
        assert_eq!(&bytes[MODULE_HEADER_SIZE..MODULE_HEADER_SIZE + 9], b"TSC a[1];");
    }

    #[test]
    fn test_decode_ignores_bytes_after_slot() {
        let mut bytes = ModuleBuilder::new("").build();
        bytes.extend_from_slice(&[0xff; 16]);
        let (module, width) = PerfModule::decode(&bytes).unwrap();
        assert_eq!(width, MODULE_HEADER_SIZE);
        assert!(module.payload.is_empty());
    }

    #[test]
    fn test_decode_truncated_header() {
        let err = PerfModule::decode(&[1, 0, 0]).unwrap_err();
        assert!(matches!(err, PayloadError::Truncated { what: "module header", .. }));
    }

    #[test]
    fn test_decode_truncated_payload() {
        let mut bytes = ModuleBuilder::new("TSC a[1];")
            .counter(TscStats::default())
            .build();
        bytes.truncate(bytes.len() - 1);
        let err = PerfModule::decode(&bytes).unwrap_err();
        assert!(matches!(
            err,
            PayloadError::Truncated {
                what: "module payload",
                needed: 80,
                available: 79
            }
        ));
    }

    #[test]
    fn test_decode_invalid_descriptor() {
        let mut bytes = Vec::new();
        bytes.put_u32_le(2);
        bytes.put_u32_le(0);
        bytes.put_slice(&[b'T', 0xff]);
        let err = PerfModule::decode(&bytes).unwrap_err();
        assert!(matches!(err, PayloadError::InvalidDescriptor { valid_up_to: 1 }));
    }

    #[test]
    fn test_image_module() {
        let image = ModuleBuilder::new("TSC a[0];").image();
        let module = image.module().unwrap();
        assert_eq!(module.descriptor, "TSC a[0];");
        assert!(module.payload.is_empty());
    }
}
